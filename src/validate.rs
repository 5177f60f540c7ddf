//! Non-fatal checks over a normalized state.
//!
//! Validation never blocks output: the composer always renders, and the
//! report travels alongside the directives as side information.

use serde::{Deserialize, Serialize};

use crate::state::{
    Choice, Direction, Easing, EffectState, GradientType, ParticleType, ShapeType, ThemeTier,
    TransitionType, Variant,
};

/// Above this many other active effects, particles trigger a performance warning.
pub const PARTICLE_COMPANION_LIMIT: usize = 2;

/// Above this many active effects in total, a general warning is raised.
pub const ACTIVE_EFFECT_LIMIT: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` iff `warnings` is empty.
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn recommend(&mut self, message: impl Into<String>) {
        self.recommendations.push(message.into());
    }
}

fn check_choice<T: Choice>(report: &mut ValidationReport, field: &str, variant: &Variant<T>) {
    if let Some(raw) = &variant.unrecognized {
        report.warn(format!(
            "unknown {} \"{raw}\" for {field}, using \"{}\"; accepted values: {}",
            T::KIND,
            variant.value.name(),
            T::accepted()
        ));
    }
}

/// Checks a state for performance and clarity hazards.
pub fn validate(state: &EffectState) -> ValidationReport {
    let mut report = ValidationReport::default();

    let active = state.active_count();
    let companions = state.active_besides_particles();

    if state.particles.enabled && companions > PARTICLE_COMPANION_LIMIT {
        report.warn(format!(
            "particles with {companions} other active effects may hurt rendering performance"
        ));
        report.recommend("reduce particle count or disable particles on mobile devices");
    }

    // Unrecognized strings were already substituted by the normalizer; these
    // warnings surface the substitution.
    check_choice::<ThemeTier>(&mut report, "theme", &state.theme);
    check_choice::<ParticleType>(&mut report, "particleType", &state.particles.kind);
    check_choice::<GradientType>(&mut report, "gradientType", &state.animated_gradient.kind);
    check_choice::<ShapeType>(&mut report, "shapeType", &state.floating_shapes.kind);
    check_choice::<TransitionType>(&mut report, "transitionType", &state.transitions.kind);
    check_choice::<Easing>(&mut report, "transitionEasing", &state.transitions.easing);
    check_choice::<Direction>(&mut report, "transitionDirection", &state.transitions.direction);

    if active > ACTIVE_EFFECT_LIMIT {
        report.warn(format!(
            "{active} active effects; more than {ACTIVE_EFFECT_LIMIT} may impact performance"
        ));
    }

    if state.glassmorphism.enabled && state.noise.enabled {
        report.recommend("noise texture over glass can reduce clarity; keep noise intensity low");
    }

    let kind = state.transitions.kind.value;
    if state.parallax.enabled && state.transitions.enabled && kind.is_3d() {
        report.warn(format!(
            "parallax combined with the 3D \"{}\" transition may cause motion sensitivity issues",
            kind.name()
        ));
        report.recommend("use a gentler transition such as fade or slide with parallax");
    }

    report.is_valid = report.warnings.is_empty();
    tracing::debug!(
        active,
        warnings = report.warnings.len(),
        recommendations = report.recommendations.len(),
        "validated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_value;
    use serde_json::json;

    #[test]
    fn empty_state_is_valid() {
        let report = validate(&EffectState::default());
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn particles_with_three_companions_warn() {
        let state = normalize_value(&json!({
            "particles": true,
            "hoverEffect": true,
            "glassmorphism": true,
            "glowEffects": true,
        }))
        .unwrap();
        let report = validate(&state);
        assert!(!report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("performance")), "{report:?}");
        assert!(report.recommendations.iter().any(|r| r.contains("mobile")));
    }

    #[test]
    fn transitions_count_as_a_companion() {
        let state = normalize_value(&json!({
            "particles": true,
            "hoverEffect": true,
            "glassmorphism": true,
            "transitions": true,
        }))
        .unwrap();
        let report = validate(&state);
        assert!(!report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("performance")), "{report:?}");
    }

    #[test]
    fn particles_with_two_companions_pass() {
        let state = normalize_value(&json!({
            "particles": true,
            "hoverEffect": true,
            "glassmorphism": true,
        }))
        .unwrap();
        assert!(validate(&state).is_valid);
    }

    #[test]
    fn unknown_particle_type_lists_accepted_values() {
        let state = normalize_value(&json!({ "particles": true, "particleType": "sparkle" })).unwrap();
        let report = validate(&state);
        assert_eq!(report.warnings.len(), 1);
        let warning = &report.warnings[0];
        assert!(warning.contains("sparkle"));
        assert!(warning.contains("floating, constellation, professional, creative"), "{warning}");
    }

    #[test]
    fn unknown_strings_in_other_slots_warn() {
        let state = normalize_value(&json!({
            "gradientType": "neon",
            "transitionEasing": "bouncy",
            "transitionDirection": "sideways",
        }))
        .unwrap();
        let report = validate(&state);
        assert_eq!(report.warnings.len(), 3, "{report:?}");
    }

    #[test]
    fn too_many_effects_warn() {
        let state = normalize_value(&json!({
            "hoverEffect": true,
            "glassmorphism": true,
            "glowEffects": true,
            "parallax": true,
            "crystalline": true,
        }))
        .unwrap();
        let report = validate(&state);
        assert!(report.warnings.iter().any(|w| w.contains("5 active effects")));
    }

    #[test]
    fn glass_and_noise_recommend_without_warning() {
        let state = normalize_value(&json!({ "glassmorphism": true, "noiseTexture": true })).unwrap();
        let report = validate(&state);
        assert!(report.is_valid);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn parallax_with_3d_transition_warns() {
        let state = normalize_value(&json!({
            "parallax": true,
            "transitions": true,
            "transitionType": "cube",
        }))
        .unwrap();
        let report = validate(&state);
        assert!(report.warnings.iter().any(|w| w.contains("motion sensitivity")));
        assert!(report.recommendations.iter().any(|r| r.contains("gentler")));

        let gentle = normalize_value(&json!({
            "parallax": true,
            "transitions": true,
            "transitionType": "slide",
        }))
        .unwrap();
        assert!(validate(&gentle).is_valid);
    }
}
