//! Flat, loosely-typed effect configuration as stored by hosts.
//!
//! A [`FlatConfig`] mirrors the form fields a card or slide editor persists:
//! one key per toggle or parameter, every key optional. It is the exchange
//! format between the persistence layer and this crate, and is turned into a
//! canonical [`EffectState`](crate::EffectState) by
//! [`normalize`](crate::normalize).
//!
//! # Example
//!
//! ```
//! use lumen_fx::FlatConfig;
//!
//! let config = FlatConfig::from_json(r#"{
//!     "particles": true,
//!     "particleType": "constellation",
//!     "particleCount": 24,
//!     "someFutureKey": "ignored"
//! }"#).unwrap();
//!
//! assert_eq!(config.particles, Some(true));
//! assert_eq!(config.particle_count, Some(24.0));
//!
//! // Wrong field types fail fast and name the field.
//! let err = FlatConfig::from_json(r#"{ "particleCount": "many" }"#).unwrap_err();
//! assert!(err.to_string().contains("particleCount"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, EffectError, EffectResult};

// ============================================================================
// Field Readers
// ============================================================================

/// A JSON scalar type accepted by flat config fields.
trait FlatValue: Sized {
    const EXPECTED: &'static str;

    fn read(value: &Value) -> Option<Self>;
}

impl FlatValue for bool {
    const EXPECTED: &'static str = "a boolean";

    fn read(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FlatValue for f32 {
    const EXPECTED: &'static str = "a number";

    fn read(value: &Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FlatValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn read(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FlatValue for String {
    const EXPECTED: &'static str = "a string";

    fn read(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Reads one field. Missing and `null` are both "absent".
fn read_field<T: FlatValue>(obj: &Map<String, Value>, key: &'static str) -> EffectResult<Option<T>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::read(value)
            .map(Some)
            .ok_or_else(|| EffectError::field_type(key, T::EXPECTED, value)),
    }
}

// ============================================================================
// FlatConfig
// ============================================================================

macro_rules! flat_config {
    (
        $(
            $(#[$meta:meta])*
            $field:ident : $ty:ty => $key:literal
        ),* $(,)?
    ) => {
        /// The flat configuration record.
        ///
        /// Every field is optional; absent fields take the documented default
        /// during normalization. Unknown keys are ignored on import.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
        pub struct FlatConfig {
            $(
                $(#[$meta])*
                #[serde(rename = $key, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl FlatConfig {
            /// Every recognized key, in declaration order.
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            /// Reads a config from an untyped JSON value.
            ///
            /// Fails with [`EffectError::FieldType`] naming the first recognized
            /// key whose value has the wrong JSON type.
            pub fn from_value(value: &Value) -> EffectResult<Self> {
                let obj = value.as_object().ok_or_else(|| EffectError::NotAnObject {
                    found: json_type_name(value),
                })?;
                Ok(Self {
                    $($field: read_field(obj, $key)?,)*
                })
            }
        }
    };
}

flat_config! {
    /// `card`, `professional` or `premium`.
    theme: String => "theme",

    hover_effect: bool => "hoverEffect",
    hover_intensity: f32 => "hoverIntensity",

    glassmorphism: bool => "glassmorphism",
    glass_intensity: f32 => "glassIntensity",

    subtle_animations: bool => "subtleAnimations",
    animation_intensity: f32 => "animationIntensity",

    background_patterns: bool => "backgroundPatterns",
    pattern_intensity: f32 => "patternIntensity",

    particles: bool => "particles",
    particle_intensity: f32 => "particleIntensity",
    particle_type: String => "particleType",
    particle_count: f32 => "particleCount",
    particle_speed: f32 => "particleSpeed",
    particle_size: f32 => "particleSize",

    animated_gradient: bool => "animatedGradient",
    gradient_intensity: f32 => "gradientIntensity",
    gradient_type: String => "gradientType",
    gradient_speed: f32 => "gradientSpeed",

    floating_shapes: bool => "floatingShapes",
    shape_intensity: f32 => "shapeIntensity",
    shape_type: String => "shapeType",
    shape_count: f32 => "shapeCount",
    shape_speed: f32 => "shapeSpeed",

    ambient_effects: bool => "ambientEffects",
    ambient_intensity: f32 => "ambientIntensity",
    /// Percent, `0..=100`.
    ambient_opacity: f64 => "ambientOpacity",

    mouse_tracking: bool => "mouseTracking",
    mouse_intensity: f32 => "mouseIntensity",
    mouse_sensitivity: f32 => "mouseSensitivity",
    mouse_smoothing: f32 => "mouseSmoothing",
    mouse_glow: bool => "mouseGlow",
    mouse_tilt: bool => "mouseTilt",
    mouse_particles: bool => "mouseParticles",

    parallax: bool => "parallax",
    parallax_intensity: f32 => "parallaxIntensity",

    glow_effects: bool => "glowEffects",
    glow_intensity: f32 => "glowIntensity",

    noise_texture: bool => "noiseTexture",
    noise_intensity: f32 => "noiseIntensity",

    gradient_animation: bool => "gradientAnimation",
    gradient_animation_intensity: f32 => "gradientAnimationIntensity",
    gradient_animation_speed: f32 => "gradientAnimationSpeed",

    holographic: bool => "holographic",
    holographic_intensity: f32 => "holographicIntensity",

    auroras: bool => "auroras",
    aurora_intensity: f32 => "auroraIntensity",

    crystalline: bool => "crystalline",
    crystalline_intensity: f32 => "crystallineIntensity",

    transitions: bool => "transitions",
    transition_intensity: f32 => "transitionIntensity",
    transition_type: String => "transitionType",
    /// Milliseconds.
    transition_duration: f32 => "transitionDuration",
    transition_easing: String => "transitionEasing",
    transition_direction: String => "transitionDirection",
}

impl FlatConfig {
    /// Creates an empty config; every field takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a config from a JSON string with field-level type checking.
    pub fn from_json(json: &str) -> EffectResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

// ============================================================================
// Tests
// ============================================================================
