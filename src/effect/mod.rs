//! Style rule generators.
//!
//! Each effect family implements [`EffectGenerator`] on its slot config. A
//! generator is a pure function of its config and the [`GenerateContext`]:
//! it returns independent directives and may emit typed properties that
//! later generators read.
//!
//! # Pipeline order
//!
//! ```text
//! glass -> hover -> breathing -> patterns -> ambient -> gradient -> shapes
//!       -> particles -> pointer -> parallax -> glow -> overlay -> noise
//!       -> holographic -> aurora -> crystalline -> transition
//! ```
//!
//! Properties flow through the context, so for example the ambient container
//! splits its opacity budget once and the gradient and shapes layers only
//! read their share.

pub mod ambient;
pub mod breathing;
pub mod depth;
pub mod glass;
pub mod hover;
pub mod particles;
pub mod pattern;
pub mod pointer;
pub mod premium;
pub mod transition;

pub use particles::generate_particles;
pub use pointer::{pointer_response, PointerResponse};
pub use transition::transition_descriptor;

use std::any::{Any, TypeId};
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::ColorPalette;
use crate::context::{RuntimeContext, SurfaceTemplate};
use crate::directive::{ParticleDescriptor, StyleDirective, TransitionDescriptor};
use crate::state::{EffectFamily, EffectState, Slot};

/// Root selector for card-level effects.
pub const CARD: &str = ".fx-card";

/// Card hover state.
pub const CARD_HOVER: &str = ".fx-card:hover";

/// Root selector for slide-level effects.
pub const SLIDE: &str = ".fx-slide";

// ============================================================================
// Generate Context
// ============================================================================

/// Everything a generator may read, plus the seeded random source.
///
/// Generators communicate through a typed property bag instead of knowing
/// about each other.
pub struct GenerateContext<'a> {
    pub state: &'a EffectState,
    pub palette: &'a ColorPalette,
    pub template: &'a SurfaceTemplate,
    pub runtime: &'a RuntimeContext,
    pub rng: StdRng,
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    particles: Vec<ParticleDescriptor>,
    transition: Option<TransitionDescriptor>,
}

impl<'a> GenerateContext<'a> {
    pub fn new(
        state: &'a EffectState,
        palette: &'a ColorPalette,
        template: &'a SurfaceTemplate,
        runtime: &'a RuntimeContext,
        seed: u64,
    ) -> Self {
        Self {
            state,
            palette,
            template,
            runtime,
            rng: StdRng::seed_from_u64(seed),
            properties: HashMap::new(),
            particles: Vec::new(),
            transition: None,
        }
    }

    /// Sets a typed property that downstream generators can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream generator.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    pub fn push_particles(&mut self, particles: Vec<ParticleDescriptor>) {
        self.particles.extend(particles);
    }

    pub fn set_transition(&mut self, transition: TransitionDescriptor) {
        self.transition = Some(transition);
    }

    pub fn is_light(&self) -> bool {
        self.palette.is_light()
    }
}

// ============================================================================
// Common Properties
// ============================================================================

/// Maximum particle count decided before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleBudget(pub u32);

/// Opacity shares of the ambient container, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientBudget {
    pub gradient: f32,
    pub shapes: f32,
}

/// Emitted by the hover generator: the lift in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverLift(pub f32);

/// Emitted by the glass generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassSurface {
    pub radius: f32,
    pub alpha: f32,
}

// ============================================================================
// Generator Trait
// ============================================================================

/// A style rule generator for one effect family.
///
/// [`generate`](Self::generate) returns directives; property emission
/// happens in [`emit`](Self::emit), which runs right after it.
pub trait EffectGenerator: Slot {
    const FAMILY: EffectFamily;

    /// Whether the generator runs. Defaults to the slot's enabled flag.
    fn is_active(&self, _ctx: &GenerateContext) -> bool {
        self.enabled()
    }

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective>;

    fn emit(&self, _ctx: &mut GenerateContext) {}
}

/// Runs one generator if it is active and appends its directives.
pub fn apply<G: EffectGenerator>(
    generator: &G,
    ctx: &mut GenerateContext,
    out: &mut Vec<StyleDirective>,
) {
    if !generator.is_active(ctx) {
        return;
    }
    let directives = generator.generate(ctx);
    generator.emit(ctx);
    tracing::trace!(family = ?G::FAMILY, directives = directives.len(), "generated");
    out.extend(directives.into_iter().filter(|d| !d.is_empty()));
}

/// Raw generator output, before combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedEffects {
    pub directives: Vec<StyleDirective>,
    pub particles: Vec<ParticleDescriptor>,
    pub transition: Option<TransitionDescriptor>,
}

/// Runs every generator in pipeline order.
pub fn generate_all(mut ctx: GenerateContext) -> GeneratedEffects {
    let state = ctx.state;
    let mut out = Vec::new();

    apply(&state.glassmorphism, &mut ctx, &mut out);
    apply(&state.hover, &mut ctx, &mut out);
    apply(&state.subtle_animations, &mut ctx, &mut out);
    apply(&state.background_patterns, &mut ctx, &mut out);
    apply(&state.ambient, &mut ctx, &mut out);
    apply(&state.animated_gradient, &mut ctx, &mut out);
    apply(&state.floating_shapes, &mut ctx, &mut out);
    apply(&state.particles, &mut ctx, &mut out);
    apply(&state.mouse_tracking, &mut ctx, &mut out);
    apply(&state.parallax, &mut ctx, &mut out);
    apply(&state.glow, &mut ctx, &mut out);
    apply(&state.gradient_animation, &mut ctx, &mut out);
    apply(&state.noise, &mut ctx, &mut out);
    apply(&state.holographic, &mut ctx, &mut out);
    apply(&state.auroras, &mut ctx, &mut out);
    apply(&state.crystalline, &mut ctx, &mut out);
    apply(&state.transitions, &mut ctx, &mut out);

    GeneratedEffects {
        directives: out,
        particles: ctx.particles,
        transition: ctx.transition,
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub(crate) fn lerp(at_zero: f32, at_one: f32, t: f32) -> f32 {
    at_zero + (at_one - at_zero) * t.clamp(0.0, 1.0)
}

/// Descendant selector under a root.
pub(crate) fn within(root: &str, child: &str) -> String {
    format!("{root} {child}")
}

/// Absolutely positioned, non-interactive layer covering its parent.
pub(crate) fn overlay_layer(selector: impl Into<String>, family: EffectFamily) -> StyleDirective {
    StyleDirective::new(selector, family)
        .with("position", "absolute")
        .with("inset", "0")
        .with("pointer-events", "none")
        .with("border-radius", "inherit")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Runs one generator against a default palette and template.
    pub fn run<G: EffectGenerator>(
        state: &EffectState,
        generator: &G,
        runtime: &RuntimeContext,
    ) -> Vec<StyleDirective> {
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let mut ctx = GenerateContext::new(state, &palette, &template, runtime, 7);
        let mut out = Vec::new();
        apply(generator, &mut ctx, &mut out);
        out
    }

    pub fn find<'d>(directives: &'d [StyleDirective], selector: &str) -> &'d StyleDirective {
        directives
            .iter()
            .find(|d| d.selector == selector)
            .unwrap_or_else(|| panic!("no directive for {selector}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_bag_roundtrip() {
        let state = EffectState::default();
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let runtime = RuntimeContext::default();
        let mut ctx = GenerateContext::new(&state, &palette, &template, &runtime, 1);

        assert!(!ctx.has::<ParticleBudget>());
        ctx.set(ParticleBudget(12));
        assert_eq!(ctx.get::<ParticleBudget>(), Some(&ParticleBudget(12)));
        ctx.set(ParticleBudget(8));
        assert_eq!(ctx.get::<ParticleBudget>().map(|b| b.0), Some(8));
    }

    #[test]
    fn empty_state_generates_nothing() {
        let state = EffectState::default();
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let runtime = RuntimeContext::default();
        let ctx = GenerateContext::new(&state, &palette, &template, &runtime, 1);
        let out = generate_all(ctx);
        assert!(out.directives.is_empty());
        assert!(out.particles.is_empty());
        assert!(out.transition.is_none());
    }

    #[test]
    fn lerp_clamps() {
        assert_eq!(lerp(2.0, 8.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 8.0, 3.0), 8.0);
    }
}
