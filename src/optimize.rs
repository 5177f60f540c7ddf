//! Device and context degradation.
//!
//! [`optimize`] folds a [`RuntimeContext`] into a state. Rules apply in the
//! order mobile, presenting, reduced motion, low battery; each works on the
//! output of the previous one. Multiplicative adjustments are recorded in
//! [`Adjustments`](crate::state::Adjustments) so optimizing an already
//! optimized state with the same context changes nothing.

use crate::context::RuntimeContext;
use crate::state::{EffectState, TransitionType};

/// Particle ceiling on mobile devices.
pub const MOBILE_PARTICLE_CAP: u32 = 15;

/// Particle ceiling while presenting.
pub const PRESENTING_PARTICLE_CAP: u32 = 15;

/// Glass intensity factor on mobile devices.
pub const MOBILE_GLASS_SCALE: f32 = 0.7;

/// Breathing intensity factor while presenting.
pub const PRESENTING_ANIMATION_SCALE: f32 = 0.5;

/// Longest transition allowed under reduced motion, in milliseconds.
pub const REDUCED_MOTION_MAX_TRANSITION_MS: u32 = 300;

fn cap_particles(state: &mut EffectState, cap: u32) {
    if state.particles.count > cap {
        tracing::debug!(from = state.particles.count, to = cap, "particle count capped");
        state.particles.count = cap;
    }
}

fn optimize_mobile(state: &mut EffectState) {
    state.hover.enabled = false;
    if !state.adjustments.mobile {
        state.glassmorphism.intensity *= MOBILE_GLASS_SCALE;
        state.adjustments.mobile = true;
    }
    cap_particles(state, MOBILE_PARTICLE_CAP);
    state.parallax.enabled = false;
    state.holographic.enabled = false;
    state.auroras.enabled = false;
}

fn optimize_presenting(state: &mut EffectState) {
    cap_particles(state, PRESENTING_PARTICLE_CAP);
    if !state.adjustments.presenting {
        state.subtle_animations.intensity *= PRESENTING_ANIMATION_SCALE;
        state.adjustments.presenting = true;
    }
    state.noise.enabled = false;
}

fn optimize_reduced_motion(state: &mut EffectState) {
    state.subtle_animations.enabled = false;
    state.particles.enabled = false;
    state.transitions.kind.force(TransitionType::Fade);
    state.transitions.duration_ms = state
        .transitions
        .duration_ms
        .min(REDUCED_MOTION_MAX_TRANSITION_MS);
    state.gradient_animation.enabled = false;
    state.parallax.enabled = false;
    // Continuous loops; static background patterns stay.
    state.animated_gradient.enabled = false;
    state.floating_shapes.enabled = false;
    state.holographic.enabled = false;
    state.auroras.enabled = false;
    state.crystalline.enabled = false;
}

fn optimize_low_battery(state: &mut EffectState) {
    state.particles.enabled = false;
    state.gradient_animation.enabled = false;
    state.auroras.enabled = false;
    state.holographic.enabled = false;
}

/// Returns `state` adjusted for the device and viewing context.
pub fn optimize(state: &EffectState, ctx: &RuntimeContext) -> EffectState {
    let mut out = state.clone();

    if ctx.is_mobile {
        optimize_mobile(&mut out);
    }
    if ctx.is_presenting {
        optimize_presenting(&mut out);
    }
    if ctx.reduced_motion {
        optimize_reduced_motion(&mut out);
    }
    if ctx.is_low_battery() {
        optimize_low_battery(&mut out);
    }

    tracing::debug!(
        mobile = ctx.is_mobile,
        presenting = ctx.is_presenting,
        reduced_motion = ctx.reduced_motion,
        low_battery = ctx.is_low_battery(),
        before = state.active_count(),
        after = out.active_count(),
        "optimized"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_value;
    use serde_json::json;

    fn everything() -> EffectState {
        normalize_value(&json!({
            "theme": "premium",
            "hoverEffect": true,
            "glassmorphism": true,
            "subtleAnimations": true,
            "particles": true,
            "particleCount": 80,
            "parallax": true,
            "noiseTexture": true,
            "gradientAnimation": true,
            "holographic": true,
            "auroras": true,
            "transitions": true,
            "transitionType": "cube",
            "transitionDuration": 1200,
        }))
        .unwrap()
    }

    #[test]
    fn no_context_changes_nothing() {
        let state = everything();
        assert_eq!(optimize(&state, &RuntimeContext::default()), state);
    }

    #[test]
    fn mobile_drops_heavy_effects() {
        let out = optimize(&everything(), &RuntimeContext::new().mobile());
        assert!(!out.hover.enabled);
        assert!(!out.parallax.enabled);
        assert!(!out.holographic.enabled);
        assert!(!out.auroras.enabled);
        assert!((out.glassmorphism.intensity - 0.35).abs() < 1e-6);
        assert_eq!(out.particles.count, MOBILE_PARTICLE_CAP);
    }

    #[test]
    fn mobile_caps_fifty_particles_to_twenty_or_fewer() {
        let state = normalize_value(&json!({
            "particles": true,
            "particleCount": 50,
            "hoverEffect": true,
            "glassmorphism": true,
            "glowEffects": true,
        }))
        .unwrap();
        let out = optimize(&state, &RuntimeContext::new().mobile());
        assert!(out.particles.count <= 20, "{}", out.particles.count);
    }

    #[test]
    fn presenting_halves_animation_and_drops_noise() {
        let out = optimize(&everything(), &RuntimeContext::new().presenting());
        assert!((out.subtle_animations.intensity - 0.25).abs() < 1e-6);
        assert!(!out.noise.enabled);
        assert_eq!(out.particles.count, PRESENTING_PARTICLE_CAP);
    }

    #[test]
    fn reduced_motion_forces_fade() {
        let out = optimize(&everything(), &RuntimeContext::new().reduced_motion());
        assert!(!out.subtle_animations.enabled);
        assert!(!out.particles.enabled);
        assert!(!out.gradient_animation.enabled);
        assert!(!out.parallax.enabled);
        assert!(!out.animated_gradient.enabled);
        assert!(!out.floating_shapes.enabled);
        assert!(!out.holographic.enabled);
        assert!(!out.auroras.enabled);
        assert!(!out.crystalline.enabled);
        let patterned = normalize_value(&json!({ "backgroundPatterns": true })).unwrap();
        let out_patterned = optimize(&patterned, &RuntimeContext::new().reduced_motion());
        assert!(out_patterned.background_patterns.enabled);
        assert_eq!(out.transitions.kind.value, TransitionType::Fade);
        assert!(out.transitions.kind.is_recognized());
        assert_eq!(out.transitions.duration_ms, 300);

        let mut short = everything();
        short.transitions.duration_ms = 200;
        let out = optimize(&short, &RuntimeContext::new().reduced_motion());
        assert_eq!(out.transitions.duration_ms, 200);
    }

    #[test]
    fn reduced_motion_replaces_unrecognized_transition() {
        let state = normalize_value(&json!({ "transitions": true, "transitionType": "warp" })).unwrap();
        let out = optimize(&state, &RuntimeContext::new().reduced_motion());
        assert_eq!(out.transitions.kind.value, TransitionType::Fade);
        assert_eq!(out.transitions.kind.unrecognized, None);
    }

    #[test]
    fn low_battery_only_below_threshold() {
        let out = optimize(&everything(), &RuntimeContext::new().with_battery(15.0));
        assert!(!out.particles.enabled);
        assert!(!out.gradient_animation.enabled);
        assert!(!out.auroras.enabled);
        assert!(!out.holographic.enabled);

        let fine = optimize(&everything(), &RuntimeContext::new().with_battery(20.0));
        assert!(fine.particles.enabled);
    }

    #[test]
    fn optimizing_twice_is_a_no_op() {
        let contexts = [
            RuntimeContext::new().mobile(),
            RuntimeContext::new().presenting(),
            RuntimeContext::new().reduced_motion(),
            RuntimeContext::new().with_battery(5.0),
            RuntimeContext::new()
                .mobile()
                .presenting()
                .reduced_motion()
                .with_battery(5.0),
        ];
        for ctx in contexts {
            let once = optimize(&everything(), &ctx);
            let twice = optimize(&once, &ctx);
            assert_eq!(once, twice, "{ctx:?}");
        }
    }
}
