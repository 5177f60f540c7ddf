//! End-to-end composition: flat config in, effect bundle out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::ColorPalette;
use crate::context::{PointerSample, RuntimeContext, SurfaceTemplate};
use crate::directive::{ParticleDescriptor, StyleDirective, TransitionDescriptor};
use crate::effect::{generate_all, pointer_response, GenerateContext, ParticleBudget, PointerResponse};
use crate::error::EffectResult;
use crate::fingerprint::{fingerprint_inputs, Fingerprint};
use crate::normalize::{denormalize, normalize, normalize_value};
use crate::optimize::optimize;
use crate::profile::FlatConfig;
use crate::resolve::{particle_soft_cap, resolve};
use crate::serialize::{CssSerializer, DirectiveSerializer};
use crate::state::EffectState;
use crate::validate::{validate, ValidationReport};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Bundles kept by an [`EffectComposer`] before the cache is flushed.
pub const CACHE_CAPACITY: usize = 64;

// ============================================================================
// EffectBundle
// ============================================================================

/// Everything the rendering layer needs for one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct EffectBundle {
    pub directives: Vec<StyleDirective>,
    pub particles: Vec<ParticleDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionDescriptor>,
    pub validation: ValidationReport,
}

impl EffectBundle {
    /// Directives rendered as CSS text.
    pub fn to_css(&self) -> String {
        CssSerializer::new().serialize(&self.directives)
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.particles.is_empty() && self.transition.is_none()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

fn render_bundle(
    state: &EffectState,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
    runtime: &RuntimeContext,
    seed: u64,
    validation: ValidationReport,
) -> EffectBundle {
    let mut ctx = GenerateContext::new(state, palette, template, runtime, seed);
    if let Some(cap) = particle_soft_cap(state) {
        tracing::debug!(cap, "particle soft cap applied");
        ctx.set(ParticleBudget(cap));
    }

    let generated = generate_all(ctx);
    let directives = resolve(generated.directives, state, palette, template);

    tracing::debug!(
        directives = directives.len(),
        particles = generated.particles.len(),
        transition = generated.transition.is_some(),
        "bundle rendered"
    );
    EffectBundle {
        directives,
        particles: generated.particles,
        transition: generated.transition,
        validation,
    }
}

/// Generates, resolves and validates directives for a state as given.
///
/// No context optimization happens here; `runtime` only feeds the pointer
/// sample and the reduced-motion gate of pointer tracking. Identical inputs
/// produce identical bundles.
pub fn generate_directives(
    state: &EffectState,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
    runtime: &RuntimeContext,
    seed: u64,
) -> EffectBundle {
    render_bundle(state, palette, template, runtime, seed, validate(state))
}

/// Validates `state`, optimizes it for `runtime`, then generates.
///
/// The validation report describes the state as configured, before
/// optimization.
pub fn compose_state(
    state: &EffectState,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
    runtime: &RuntimeContext,
    seed: u64,
) -> EffectBundle {
    let validation = validate(state);
    let optimized = optimize(state, runtime);
    render_bundle(&optimized, palette, template, runtime, seed, validation)
}

/// The full pipeline from a flat JSON configuration.
///
/// Fails only when the configuration is structurally invalid.
pub fn compose(
    config: &Value,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
    runtime: &RuntimeContext,
    seed: u64,
) -> EffectResult<EffectBundle> {
    let state = normalize_value(config)?;
    Ok(compose_state(&state, palette, template, runtime, seed))
}

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types that can be configured from a [`FlatConfig`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &FlatConfig);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> FlatConfig;
}

// ============================================================================
// EffectComposer
// ============================================================================

/// Explicitly constructed composition engine for one surface.
///
/// Holds the effect state, palette, template, runtime context and seed, and
/// caches bundles by a fingerprint of all of them. Palette and template are
/// public; the fingerprint covers them, so editing them in place never
/// serves a stale bundle.
///
/// # Example
///
/// ```
/// use lumen_fx::{ColorPalette, EffectComposer, RuntimeContext};
/// use serde_json::json;
///
/// let mut composer = EffectComposer::new(ColorPalette::default());
/// composer.load(&json!({ "hoverEffect": true, "glassmorphism": true })).unwrap();
///
/// let bundle = composer.render();
/// assert!(bundle.validation.is_valid);
/// assert!(bundle.to_css().contains(".fx-card:hover"));
///
/// // Mobile drops hover
/// composer.set_runtime(RuntimeContext::new().mobile());
/// assert!(!composer.render().to_css().contains(".fx-card:hover"));
/// ```
#[derive(Debug, Clone)]
pub struct EffectComposer {
    state: EffectState,
    pub palette: ColorPalette,
    pub template: SurfaceTemplate,
    runtime: RuntimeContext,
    seed: u64,
    cache: HashMap<Fingerprint, EffectBundle>,
}

impl EffectComposer {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            state: EffectState::default(),
            palette,
            template: SurfaceTemplate::default(),
            runtime: RuntimeContext::default(),
            seed: DEFAULT_SEED,
            cache: HashMap::new(),
        }
    }

    pub fn with_template(mut self, template: SurfaceTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn state(&self) -> &EffectState {
        &self.state
    }

    pub fn set_state(&mut self, state: EffectState) {
        self.state = state;
    }

    /// Normalizes and installs a flat JSON configuration.
    ///
    /// On error the current state is kept.
    pub fn load(&mut self, config: &Value) -> EffectResult<()> {
        self.state = normalize_value(config)?;
        Ok(())
    }

    pub fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    pub fn set_runtime(&mut self, runtime: RuntimeContext) {
        self.runtime = runtime;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Changes the particle seed, e.g. once per session.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Composes the current inputs, serving repeated requests from the cache.
    pub fn render(&mut self) -> EffectBundle {
        let key = fingerprint_inputs(
            &self.state,
            &self.palette,
            &self.template,
            &self.runtime,
            self.seed,
        );
        if let Some(bundle) = self.cache.get(&key) {
            tracing::debug!(hi = key.hi, lo = key.lo, "cache hit");
            return bundle.clone();
        }

        let bundle = compose_state(
            &self.state,
            &self.palette,
            &self.template,
            &self.runtime,
            self.seed,
        );
        if self.cache.len() >= CACHE_CAPACITY {
            tracing::debug!(entries = self.cache.len(), "cache flushed");
            self.cache.clear();
        }
        self.cache.insert(key, bundle.clone());
        bundle
    }

    /// Pointer update for the current state, after context optimization.
    ///
    /// Returns `None` when pointer tracking is off for this context.
    pub fn pointer_response(&self, sample: &PointerSample) -> Option<PointerResponse> {
        if self.runtime.reduced_motion {
            return None;
        }
        let state = optimize(&self.state, &self.runtime);
        state
            .mouse_tracking
            .enabled
            .then(|| pointer_response(&state.mouse_tracking, sample))
    }

    /// Clears cached bundles. Useful for freeing memory.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl Configurable for EffectComposer {
    fn apply_profile(&mut self, profile: &FlatConfig) {
        self.state = normalize(profile);
    }

    fn export_profile(&self) -> FlatConfig {
        denormalize(&self.state)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TransitionType;
    use serde_json::json;

    fn compose_default(config: Value, runtime: RuntimeContext, seed: u64) -> EffectBundle {
        compose(
            &config,
            &ColorPalette::default(),
            &SurfaceTemplate::default(),
            &runtime,
            seed,
        )
        .unwrap()
    }

    fn busy() -> Value {
        json!({
            "hoverEffect": true,
            "glassmorphism": true,
            "subtleAnimations": true,
            "backgroundPatterns": true,
            "particles": true,
            "particleType": "constellation",
            "particleCount": 40,
            "mouseTracking": true,
            "transitions": true,
            "transitionType": "flip",
        })
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let a = compose_default(busy(), RuntimeContext::default(), 9);
        let b = compose_default(busy(), RuntimeContext::default(), 9);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.to_css(), b.to_css());

        let other = compose_default(busy(), RuntimeContext::default(), 10);
        assert_ne!(a.particles, other.particles);
    }

    #[test]
    fn all_disabled_is_empty_and_valid() {
        let state = EffectState::default();
        let bundle = generate_directives(
            &state,
            &ColorPalette::default(),
            &SurfaceTemplate::default().with_box_shadow("0 1px 2px black"),
            &RuntimeContext::default(),
            DEFAULT_SEED,
        );
        assert!(bundle.directives.is_empty());
        assert!(bundle.is_empty());
        assert!(bundle.validation.is_valid);
        assert!(bundle.validation.warnings.is_empty());
        assert_eq!(bundle.to_css(), "");
    }

    #[test]
    fn particles_are_soft_capped_with_many_companions() {
        let bundle = compose_default(
            json!({
                "particles": true,
                "particleCount": 60,
                "hoverEffect": true,
                "glassmorphism": true,
                "glowEffects": true,
            }),
            RuntimeContext::default(),
            1,
        );
        assert_eq!(bundle.particles.len(), 20);
        assert!(!bundle.validation.is_valid);
    }

    #[test]
    fn mobile_fifty_particles_stay_within_twenty() {
        let bundle = compose_default(
            json!({
                "particles": true,
                "particleCount": 50,
                "hoverEffect": true,
                "glassmorphism": true,
                "glowEffects": true,
            }),
            RuntimeContext::new().mobile(),
            1,
        );
        assert!(bundle.particles.len() <= 20, "{}", bundle.particles.len());
        assert!(!bundle.particles.is_empty());
    }

    #[test]
    fn reduced_motion_bundle() {
        let bundle = compose_default(
            json!({
                "particles": true,
                "subtleAnimations": true,
                "mouseTracking": true,
                "transitions": true,
                "transitionType": "cube",
                "transitionDuration": 900,
            }),
            RuntimeContext::new().reduced_motion(),
            1,
        );
        assert!(bundle.particles.is_empty());
        let transition = bundle.transition.as_ref().unwrap();
        assert_eq!(transition.kind, TransitionType::Fade);
        assert!(transition.duration_ms <= 300);
        assert!(!bundle.to_css().contains("fx-breathe"));
        assert!(!bundle.to_css().contains("--fx-tilt-x"));
    }

    #[test]
    fn structural_errors_surface() {
        let err = compose(
            &json!({ "particleCount": "many" }),
            &ColorPalette::default(),
            &SurfaceTemplate::default(),
            &RuntimeContext::default(),
            1,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("particleCount"));
    }

    #[test]
    fn bundle_json_is_camel_case() {
        let bundle = compose_default(busy(), RuntimeContext::default(), 3);
        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json["validation"]["isValid"].is_boolean());
        assert_eq!(json["transition"]["type"], "flip");
        assert!(json["particles"][0]["connections"].is_array());
    }

    #[test]
    fn composer_caches_by_inputs() {
        let mut composer = EffectComposer::new(ColorPalette::default());
        composer.load(&busy()).unwrap();

        let first = composer.render();
        let second = composer.render();
        assert_eq!(first, second);
        assert_eq!(composer.cache_len(), 1);

        composer.reseed(77);
        let reseeded = composer.render();
        assert_ne!(first.particles, reseeded.particles);
        assert_eq!(composer.cache_len(), 2);

        composer.palette.background = "#111111".into();
        composer.render();
        assert_eq!(composer.cache_len(), 3);

        composer.clear_cache();
        assert_eq!(composer.cache_len(), 0);
    }

    #[test]
    fn composer_matches_free_function() {
        let mut composer = EffectComposer::new(ColorPalette::default()).with_seed(5);
        composer.load(&busy()).unwrap();
        assert_eq!(composer.render(), compose_default(busy(), RuntimeContext::default(), 5));
    }

    #[test]
    fn failed_load_keeps_state() {
        let mut composer = EffectComposer::new(ColorPalette::default());
        composer.load(&json!({ "hoverEffect": true })).unwrap();
        assert!(composer.load(&json!({ "hoverEffect": "yes" })).is_err());
        assert!(composer.state().hover.enabled);
    }

    #[test]
    fn profile_roundtrip() {
        let mut composer = EffectComposer::new(ColorPalette::default());
        composer.load(&busy()).unwrap();
        let exported = composer.export_profile();

        let mut other = EffectComposer::new(ColorPalette::default());
        other.apply_profile(&exported);
        assert_eq!(other.state(), composer.state());
    }

    #[test]
    fn pointer_response_respects_context() {
        let mut composer = EffectComposer::new(ColorPalette::default());
        composer.load(&json!({ "mouseTracking": true })).unwrap();
        let sample = PointerSample::new(1.0, 0.5);
        assert!(composer.pointer_response(&sample).is_some());

        composer.set_runtime(RuntimeContext::new().reduced_motion());
        assert!(composer.pointer_response(&sample).is_none());
    }
}
