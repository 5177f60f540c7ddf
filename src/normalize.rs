//! Flat config <-> canonical state mapping.
//!
//! [`normalize`] applies the defaults table and clamps every numeric field to
//! its declared range. [`denormalize`] writes every field back out explicitly,
//! so `normalize(&denormalize(&s)) == s` for every state whose fields lie
//! in their declared ranges.

use serde_json::Value;

use crate::error::EffectResult;
use crate::profile::FlatConfig;
use crate::state::{
    Choice, Direction, EffectState, Easing, GradientType, ParticleType, ShapeType, ThemeTier,
    TransitionType, Variant, DEFAULT_INTENSITY,
};

// ============================================================================
// Defaults & Ranges
// ============================================================================

pub const DEFAULT_NOISE_INTENSITY: f32 = 0.3;
pub const DEFAULT_PARTICLE_SPEED: f32 = 3.0;
pub const DEFAULT_PARTICLE_SIZE: f32 = 4.0;
pub const DEFAULT_GRADIENT_SPEED: f32 = 3.0;
pub const DEFAULT_SHAPE_COUNT: u32 = 3;
pub const DEFAULT_SHAPE_SPEED: f32 = 2.0;
/// Percent, as stored by hosts.
pub const DEFAULT_AMBIENT_OPACITY_PERCENT: f32 = 30.0;
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 1.0;
pub const DEFAULT_MOUSE_SMOOTHING: f32 = 0.15;
pub const DEFAULT_GRADIENT_ANIMATION_SPEED: f32 = 3.0;
pub const DEFAULT_TRANSITION_DURATION_MS: u32 = 600;

pub const PARTICLE_COUNT_RANGE: (u32, u32) = (0, 100);
pub const SPEED_RANGE: (f32, f32) = (1.0, 5.0);
pub const PARTICLE_SIZE_RANGE: (f32, f32) = (1.0, 20.0);
pub const SHAPE_COUNT_RANGE: (u32, u32) = (1, 5);
pub const MOUSE_SENSITIVITY_RANGE: (f32, f32) = (0.1, 3.0);
pub const MOUSE_SMOOTHING_RANGE: (f32, f32) = (0.01, 1.0);
pub const TRANSITION_DURATION_RANGE: (u32, u32) = (100, 3000);

/// Default particle count for a template tier.
pub fn default_particle_count(tier: ThemeTier) -> u32 {
    match tier {
        ThemeTier::Card | ThemeTier::Professional => 30,
        ThemeTier::Premium => 50,
    }
}

// ============================================================================
// Field Helpers
// ============================================================================

fn flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

fn ranged(value: Option<f32>, default: f32, (min, max): (f32, f32)) -> f32 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(min, max))
        .unwrap_or(default)
}

fn unit(value: Option<f32>, default: f32) -> f32 {
    ranged(value, default, (0.0, 1.0))
}

fn count(value: Option<f32>, default: u32, (min, max): (u32, u32)) -> u32 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(min as f32, max as f32) as u32)
        .unwrap_or(default)
}

fn choice<T: Choice>(value: Option<&String>, default: T) -> Variant<T> {
    match value {
        Some(raw) => Variant::from_input(raw, default),
        None => Variant::known(default),
    }
}

/// Converts host percent to the internal `[0, 1]` scale.
///
/// The percent is carried as `f64`: `opacity * 100` of any `f32` opacity is
/// exact in `f64`, so percent -> fraction -> percent is lossless.
fn opacity_from_percent(value: Option<f64>) -> f32 {
    let percent = value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0))
        .unwrap_or(DEFAULT_AMBIENT_OPACITY_PERCENT as f64);
    (percent / 100.0) as f32
}

fn opacity_to_percent(opacity: f32) -> f64 {
    opacity as f64 * 100.0
}

// ============================================================================
// Normalize / Denormalize
// ============================================================================

/// Maps a flat config to the canonical state.
pub fn normalize(config: &FlatConfig) -> EffectState {
    let theme = choice(config.theme.as_ref(), ThemeTier::Card);
    let tier = theme.value;

    let mut state = EffectState {
        theme,
        ..EffectState::default()
    };

    state.hover.enabled = flag(config.hover_effect);
    state.hover.intensity = unit(config.hover_intensity, DEFAULT_INTENSITY);

    state.glassmorphism.enabled = flag(config.glassmorphism);
    state.glassmorphism.intensity = unit(config.glass_intensity, DEFAULT_INTENSITY);

    state.subtle_animations.enabled = flag(config.subtle_animations);
    state.subtle_animations.intensity = unit(config.animation_intensity, DEFAULT_INTENSITY);

    state.background_patterns.enabled = flag(config.background_patterns);
    state.background_patterns.intensity = unit(config.pattern_intensity, DEFAULT_INTENSITY);

    let particles = &mut state.particles;
    particles.enabled = flag(config.particles);
    particles.intensity = unit(config.particle_intensity, DEFAULT_INTENSITY);
    particles.kind = choice(config.particle_type.as_ref(), ParticleType::Floating);
    particles.count = count(
        config.particle_count,
        default_particle_count(tier),
        PARTICLE_COUNT_RANGE,
    );
    particles.speed = ranged(config.particle_speed, DEFAULT_PARTICLE_SPEED, SPEED_RANGE);
    particles.size = ranged(config.particle_size, DEFAULT_PARTICLE_SIZE, PARTICLE_SIZE_RANGE);

    let gradient = &mut state.animated_gradient;
    gradient.enabled = flag(config.animated_gradient);
    gradient.intensity = unit(config.gradient_intensity, DEFAULT_INTENSITY);
    gradient.kind = choice(config.gradient_type.as_ref(), GradientType::Aurora);
    gradient.speed = ranged(config.gradient_speed, DEFAULT_GRADIENT_SPEED, SPEED_RANGE);

    let shapes = &mut state.floating_shapes;
    shapes.enabled = flag(config.floating_shapes);
    shapes.intensity = unit(config.shape_intensity, DEFAULT_INTENSITY);
    shapes.kind = choice(config.shape_type.as_ref(), ShapeType::Circles);
    shapes.count = count(config.shape_count, DEFAULT_SHAPE_COUNT, SHAPE_COUNT_RANGE);
    shapes.speed = ranged(config.shape_speed, DEFAULT_SHAPE_SPEED, SPEED_RANGE);

    state.ambient.enabled = flag(config.ambient_effects);
    state.ambient.intensity = unit(config.ambient_intensity, DEFAULT_INTENSITY);
    state.ambient.opacity = opacity_from_percent(config.ambient_opacity);

    let pointer = &mut state.mouse_tracking;
    pointer.enabled = flag(config.mouse_tracking);
    pointer.intensity = unit(config.mouse_intensity, DEFAULT_INTENSITY);
    pointer.sensitivity = ranged(
        config.mouse_sensitivity,
        DEFAULT_MOUSE_SENSITIVITY,
        MOUSE_SENSITIVITY_RANGE,
    );
    pointer.smoothing = ranged(
        config.mouse_smoothing,
        DEFAULT_MOUSE_SMOOTHING,
        MOUSE_SMOOTHING_RANGE,
    );
    pointer.glow = config.mouse_glow.unwrap_or(true);
    pointer.tilt = config.mouse_tilt.unwrap_or(true);
    pointer.particles = flag(config.mouse_particles);

    state.parallax.enabled = flag(config.parallax);
    state.parallax.intensity = unit(config.parallax_intensity, DEFAULT_INTENSITY);

    state.glow.enabled = flag(config.glow_effects);
    state.glow.intensity = unit(config.glow_intensity, DEFAULT_INTENSITY);

    state.noise.enabled = flag(config.noise_texture);
    state.noise.intensity = unit(config.noise_intensity, DEFAULT_NOISE_INTENSITY);

    let overlay = &mut state.gradient_animation;
    overlay.enabled = flag(config.gradient_animation);
    overlay.intensity = unit(config.gradient_animation_intensity, DEFAULT_INTENSITY);
    overlay.speed = ranged(
        config.gradient_animation_speed,
        DEFAULT_GRADIENT_ANIMATION_SPEED,
        SPEED_RANGE,
    );

    state.holographic.enabled = flag(config.holographic);
    state.holographic.intensity = unit(config.holographic_intensity, DEFAULT_INTENSITY);

    state.auroras.enabled = flag(config.auroras);
    state.auroras.intensity = unit(config.aurora_intensity, DEFAULT_INTENSITY);

    state.crystalline.enabled = flag(config.crystalline);
    state.crystalline.intensity = unit(config.crystalline_intensity, DEFAULT_INTENSITY);

    let transitions = &mut state.transitions;
    transitions.enabled = flag(config.transitions);
    transitions.intensity = unit(config.transition_intensity, DEFAULT_INTENSITY);
    transitions.kind = choice(config.transition_type.as_ref(), TransitionType::Fade);
    transitions.duration_ms = count(
        config.transition_duration,
        DEFAULT_TRANSITION_DURATION_MS,
        TRANSITION_DURATION_RANGE,
    );
    transitions.easing = choice(config.transition_easing.as_ref(), Easing::EaseInOut);
    transitions.direction = choice(config.transition_direction.as_ref(), Direction::Right);

    tracing::debug!(
        theme = tier.name(),
        active = state.active_count(),
        "normalized effect config"
    );
    state
}

/// Validates the structure of an untyped config, then normalizes it.
pub fn normalize_value(value: &Value) -> EffectResult<EffectState> {
    let config = FlatConfig::from_value(value)?;
    Ok(normalize(&config))
}

/// Writes a state back to the flat form, every field explicit.
///
/// Optimizer bookkeeping ([`Adjustments`](crate::state::Adjustments)) is not
/// part of the flat form and is dropped.
pub fn denormalize(state: &EffectState) -> FlatConfig {
    FlatConfig {
        theme: Some(state.theme.as_input().to_string()),

        hover_effect: Some(state.hover.enabled),
        hover_intensity: Some(state.hover.intensity),

        glassmorphism: Some(state.glassmorphism.enabled),
        glass_intensity: Some(state.glassmorphism.intensity),

        subtle_animations: Some(state.subtle_animations.enabled),
        animation_intensity: Some(state.subtle_animations.intensity),

        background_patterns: Some(state.background_patterns.enabled),
        pattern_intensity: Some(state.background_patterns.intensity),

        particles: Some(state.particles.enabled),
        particle_intensity: Some(state.particles.intensity),
        particle_type: Some(state.particles.kind.as_input().to_string()),
        particle_count: Some(state.particles.count as f32),
        particle_speed: Some(state.particles.speed),
        particle_size: Some(state.particles.size),

        animated_gradient: Some(state.animated_gradient.enabled),
        gradient_intensity: Some(state.animated_gradient.intensity),
        gradient_type: Some(state.animated_gradient.kind.as_input().to_string()),
        gradient_speed: Some(state.animated_gradient.speed),

        floating_shapes: Some(state.floating_shapes.enabled),
        shape_intensity: Some(state.floating_shapes.intensity),
        shape_type: Some(state.floating_shapes.kind.as_input().to_string()),
        shape_count: Some(state.floating_shapes.count as f32),
        shape_speed: Some(state.floating_shapes.speed),

        ambient_effects: Some(state.ambient.enabled),
        ambient_intensity: Some(state.ambient.intensity),
        ambient_opacity: Some(opacity_to_percent(state.ambient.opacity)),

        mouse_tracking: Some(state.mouse_tracking.enabled),
        mouse_intensity: Some(state.mouse_tracking.intensity),
        mouse_sensitivity: Some(state.mouse_tracking.sensitivity),
        mouse_smoothing: Some(state.mouse_tracking.smoothing),
        mouse_glow: Some(state.mouse_tracking.glow),
        mouse_tilt: Some(state.mouse_tracking.tilt),
        mouse_particles: Some(state.mouse_tracking.particles),

        parallax: Some(state.parallax.enabled),
        parallax_intensity: Some(state.parallax.intensity),

        glow_effects: Some(state.glow.enabled),
        glow_intensity: Some(state.glow.intensity),

        noise_texture: Some(state.noise.enabled),
        noise_intensity: Some(state.noise.intensity),

        gradient_animation: Some(state.gradient_animation.enabled),
        gradient_animation_intensity: Some(state.gradient_animation.intensity),
        gradient_animation_speed: Some(state.gradient_animation.speed),

        holographic: Some(state.holographic.enabled),
        holographic_intensity: Some(state.holographic.intensity),

        auroras: Some(state.auroras.enabled),
        aurora_intensity: Some(state.auroras.intensity),

        crystalline: Some(state.crystalline.enabled),
        crystalline_intensity: Some(state.crystalline.intensity),

        transitions: Some(state.transitions.enabled),
        transition_intensity: Some(state.transitions.intensity),
        transition_type: Some(state.transitions.kind.as_input().to_string()),
        transition_duration: Some(state.transitions.duration_ms as f32),
        transition_easing: Some(state.transitions.easing.as_input().to_string()),
        transition_direction: Some(state.transitions.direction.as_input().to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
