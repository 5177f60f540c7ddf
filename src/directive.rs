//! Structured output records: style directives, particles and transitions.
//!
//! Nothing in here knows about a concrete styling syntax. Property names and
//! values follow CSS conventions because that is what the first serializer
//! targets, but directives are plain data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{Direction, EffectFamily, Easing, TransitionType};

/// Formats a number with at most three decimals and no trailing zeros.
///
/// Non-finite input formats as `0` so output stays valid.
pub fn fmt_num(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value as f64 * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub(crate) fn px(value: f32) -> String {
    format!("{}px", fmt_num(value))
}

pub(crate) fn pct(value: f32) -> String {
    format!("{}%", fmt_num(value))
}

pub(crate) fn secs(value: f32) -> String {
    format!("{}s", fmt_num(value))
}

pub(crate) fn deg(value: f32) -> String {
    format!("{}deg", fmt_num(value))
}

// ============================================================================
// StyleDirective
// ============================================================================

/// One keyframe: an offset in `[0, 1]` and the properties at that offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Keyframe {
    pub offset: f32,
    pub properties: BTreeMap<String, String>,
}

impl Keyframe {
    pub fn at(offset: f32) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.properties.insert(property.to_string(), value.into());
        self
    }
}

/// A named keyframe sequence referenced from an `animation` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct KeyframeSet {
    pub name: String,
    pub frames: Vec<Keyframe>,
}

impl KeyframeSet {
    pub fn new(name: impl Into<String>, frames: Vec<Keyframe>) -> Self {
        Self {
            name: name.into(),
            frames,
        }
    }
}

/// A declarative visual rule for the rendering layer.
///
/// `origin` records which effect family produced the directive; the
/// combination resolver uses it to apply its precedence table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StyleDirective {
    pub selector: String,
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<KeyframeSet>,
    pub origin: EffectFamily,
}

impl StyleDirective {
    pub fn new(selector: impl Into<String>, origin: EffectFamily) -> Self {
        Self {
            selector: selector.into(),
            properties: BTreeMap::new(),
            keyframes: Vec::new(),
            origin,
        }
    }

    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn with_keyframes(mut self, set: KeyframeSet) -> Self {
        self.keyframes.push(set);
        self
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.properties.insert(property.to_string(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.keyframes.is_empty()
    }
}

// ============================================================================
// Particles
// ============================================================================

/// How a particle moves; each profile maps to one keyframe set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MotionProfile {
    /// Vertical bob.
    Bob,
    /// Scale/opacity pulse in place.
    Pulse,
    /// Slow upward drift with a pulse.
    RisingPulse,
    /// Rotational swirl around the origin point.
    Swirl,
}

impl MotionProfile {
    pub fn keyframes_name(self) -> &'static str {
        match self {
            Self::Bob => "fx-particle-bob",
            Self::Pulse => "fx-particle-pulse",
            Self::RisingPulse => "fx-particle-rise",
            Self::Swirl => "fx-particle-swirl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ParticleShape {
    Circle,
    Square,
    Triangle,
}

/// A connecting line from one particle to another (constellations only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ParticleLink {
    /// Index of the other particle.
    pub to: usize,
    /// Distance in percent of the container.
    pub length: f32,
    /// Angle in degrees, clockwise from the positive x axis.
    pub angle: f32,
}

/// One simulated particle. Positions are percentages of the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ParticleDescriptor {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// Animation delay in seconds.
    pub delay: f32,
    /// Animation period in seconds.
    pub duration: f32,
    pub opacity: f32,
    pub motion: MotionProfile,
    pub shape: ParticleShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ParticleLink>>,
}

// ============================================================================
// Transitions
// ============================================================================

/// Paired enter/exit animation used when switching slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TransitionDescriptor {
    #[serde(rename = "type")]
    pub kind: TransitionType,
    pub duration_ms: u32,
    pub easing: Easing,
    pub direction: Direction,
    pub enter_keyframes: Vec<Keyframe>,
    pub exit_keyframes: Vec<Keyframe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.25), "0.25");
        assert_eq!(fmt_num(0.1), "0.1");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(f32::NAN), "0");
        assert_eq!(fmt_num(-2.5), "-2.5");
    }

    #[test]
    fn unit_helpers() {
        assert_eq!(px(4.0), "4px");
        assert_eq!(pct(12.5), "12.5%");
        assert_eq!(secs(3.0), "3s");
        assert_eq!(deg(-7.25), "-7.25deg");
    }

    #[test]
    fn directive_builder() {
        let d = StyleDirective::new(".fx-card", EffectFamily::Hover)
            .with("transform", "translateY(-4px)")
            .with("transform", "translateY(-6px)");
        assert_eq!(d.get("transform"), Some("translateY(-6px)"));
        assert_eq!(d.properties.len(), 1);
        assert!(!d.is_empty());
        assert!(StyleDirective::new(".x", EffectFamily::Glow).is_empty());
    }

    #[test]
    fn keyframe_offset_is_clamped() {
        assert_eq!(Keyframe::at(1.5).offset, 1.0);
        assert_eq!(Keyframe::at(-1.0).offset, 0.0);
    }

    #[test]
    fn descriptor_serializes_type_key() {
        let t = TransitionDescriptor {
            kind: TransitionType::GlassShatter,
            duration_ms: 600,
            easing: Easing::EaseInOut,
            direction: Direction::Left,
            enter_keyframes: vec![],
            exit_keyframes: vec![],
        };
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"type\":\"glass-shatter\""), "{json}");
        assert!(json.contains("\"durationMs\":600"));
        assert!(json.contains("\"easing\":\"ease-in-out\""));
    }
}
