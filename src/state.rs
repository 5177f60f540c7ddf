//! Canonical effect state.
//!
//! [`EffectState`] is what every downstream stage consumes. It is produced by
//! [`normalize`](crate::normalize::normalize), adjusted by
//! [`optimize`](crate::optimize::optimize) and never mutated in place by the
//! generators.

use serde::{Deserialize, Serialize};

/// Default intensity for every slot unless stated otherwise.
pub const DEFAULT_INTENSITY: f32 = 0.5;

// ============================================================================
// Closed Choices
// ============================================================================

/// A closed set of named options parsed from loosely-typed input.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Human-readable name of the option set, used in warnings.
    const KIND: &'static str;

    /// Every accepted option, in documentation order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Case-insensitive lookup by name.
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(input))
    }

    /// Comma-separated accepted names.
    fn accepted() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A resolved choice that remembers the raw input when it was unrecognized.
///
/// Unrecognized strings are never propagated: `value` always holds a valid
/// option (the documented default in that case), while `unrecognized` keeps
/// the original text for validation warnings and for round-tripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Variant<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrecognized: Option<String>,
}

impl<T: Choice> Variant<T> {
    pub fn known(value: T) -> Self {
        Self {
            value,
            unrecognized: None,
        }
    }

    /// Resolves `raw`, substituting `default` when it is not a known option.
    pub fn from_input(raw: &str, default: T) -> Self {
        match T::parse(raw) {
            Some(value) => Self::known(value),
            None => {
                tracing::warn!(
                    kind = T::KIND,
                    input = raw,
                    substitute = default.name(),
                    "unrecognized option, substituting default"
                );
                Self {
                    value: default,
                    unrecognized: Some(raw.to_string()),
                }
            }
        }
    }

    /// The string that reproduces this variant when fed back to `from_input`.
    pub fn as_input(&self) -> &str {
        self.unrecognized.as_deref().unwrap_or(self.value.name())
    }

    pub fn is_recognized(&self) -> bool {
        self.unrecognized.is_none()
    }

    /// Replaces the value and forgets any unrecognized input.
    pub fn force(&mut self, value: T) {
        self.value = value;
        self.unrecognized = None;
    }
}

macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident = $label:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant),*
        }

        impl Choice for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }
    };
}

choice!(
    /// Template tier; selects scope-dependent defaults.
    ThemeTier("theme") {
        Card = "card",
        Professional = "professional",
        Premium = "premium",
    }
);

choice!(
    /// Particle motion family.
    ParticleType("particle type") {
        /// Vertical bob, round particles.
        Floating = "floating",
        /// Pulse plus nearest-neighbour connecting lines.
        Constellation = "constellation",
        /// Slow upward pulse, squared particles.
        Professional = "professional",
        /// Rotational swirl, triangular particles.
        Creative = "creative",
    }
);

choice!(
    /// Six-stop color table used by the animated ambient gradient.
    GradientType("gradient type") {
        Aurora = "aurora",
        Cosmic = "cosmic",
        Ocean = "ocean",
        Sunset = "sunset",
        Forest = "forest",
        Professional = "professional",
    }
);

choice!(
    ShapeType("shape type") {
        Circles = "circles",
        Squares = "squares",
        Triangles = "triangles",
        Mixed = "mixed",
    }
);

choice!(
    /// Slide transition kinds. `Fade` is the universal fallback.
    TransitionType("transition type") {
        Fade = "fade",
        Slide = "slide",
        Zoom = "zoom",
        Flip = "flip",
        GlassShatter = "glass-shatter",
        ParticleDissolve = "particle-dissolve",
        WaveMorph = "wave-morph",
        ConstellationConnect = "constellation-connect",
        Holographic = "holographic",
        Cube = "cube",
        Coverflow = "coverflow",
    }
);

impl TransitionType {
    /// Transitions that rotate the slide through 3D space.
    pub fn is_3d(self) -> bool {
        matches!(self, Self::Cube | Self::Holographic)
    }
}

choice!(
    Easing("easing") {
        Linear = "linear",
        Ease = "ease",
        EaseIn = "ease-in",
        EaseOut = "ease-out",
        EaseInOut = "ease-in-out",
        /// Slight overshoot.
        Spring = "spring",
    }
);

impl Easing {
    /// Timing-function value for the rendering layer.
    pub fn timing_function(self) -> &'static str {
        match self {
            Self::Spring => "cubic-bezier(0.34, 1.56, 0.64, 1)",
            other => other.name(),
        }
    }
}

choice!(
    Direction("transition direction") {
        Left = "left",
        Right = "right",
        Up = "up",
        Down = "down",
    }
);

impl Direction {
    /// Unit travel vector of the incoming slide, screen coordinates.
    pub fn vector(self) -> (f32, f32) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

// ============================================================================
// Effect Families
// ============================================================================

/// Identifies the generator that produced a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum EffectFamily {
    Hover,
    Glass,
    SubtleAnimation,
    BackgroundPattern,
    Particles,
    AnimatedGradient,
    FloatingShapes,
    Ambient,
    PointerTracking,
    Parallax,
    Glow,
    Noise,
    GradientAnimation,
    Holographic,
    Aurora,
    Crystalline,
    Transition,
    /// Directives synthesized by the combination resolver.
    Resolver,
}

// ============================================================================
// Slots
// ============================================================================

/// Common view over every effect slot.
pub trait Slot {
    fn enabled(&self) -> bool;
    fn intensity(&self) -> f32;
}

macro_rules! effect_slot {
    (
        $(#[$meta:meta])*
        $name:ident {
            intensity = $intensity:expr
            $(, $(#[$fmeta:meta])* $field:ident : $ty:ty = $default:expr)*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            pub enabled: bool,
            /// Strength in `[0, 1]`.
            pub intensity: f32,
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    enabled: false,
                    intensity: $intensity,
                    $($field: $default,)*
                }
            }
        }

        impl Slot for $name {
            fn enabled(&self) -> bool {
                self.enabled
            }

            fn intensity(&self) -> f32 {
                self.intensity
            }
        }
    };
}

effect_slot!(
    /// Lift and shadow on hover.
    HoverConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    /// Translucent frosted surface.
    GlassConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    /// Breathing scale/brightness oscillation.
    SubtleAnimationConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    /// Radial dot layers behind the content.
    PatternConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    ParticleConfig {
        intensity = DEFAULT_INTENSITY,
        #[serde(rename = "type")]
        kind: Variant<ParticleType> = Variant::known(ParticleType::Floating),
        count: u32 = 30,
        /// Relative speed in `[1, 5]`.
        speed: f32 = 3.0,
        /// Base diameter in pixels.
        size: f32 = 4.0,
    }
);

effect_slot!(
    /// Six-stop gradient cycling behind the content.
    AnimatedGradientConfig {
        intensity = DEFAULT_INTENSITY,
        #[serde(rename = "type")]
        kind: Variant<GradientType> = Variant::known(GradientType::Aurora),
        /// Relative speed in `[1, 5]`.
        speed: f32 = 3.0,
    }
);

effect_slot!(
    FloatingShapesConfig {
        intensity = DEFAULT_INTENSITY,
        #[serde(rename = "type")]
        kind: Variant<ShapeType> = Variant::known(ShapeType::Circles),
        count: u32 = 3,
        speed: f32 = 2.0,
    }
);

effect_slot!(
    /// Ambient layer container; `opacity` is the budget shared by the
    /// gradient and shapes layers.
    AmbientConfig {
        intensity = DEFAULT_INTENSITY,
        /// Stored in `[0, 1]`; the flat config uses percent.
        opacity: f32 = 0.3,
    }
);

effect_slot!(
    PointerTrackingConfig {
        intensity = DEFAULT_INTENSITY,
        sensitivity: f32 = 1.0,
        /// Fraction of the remaining distance covered per update.
        smoothing: f32 = 0.15,
        glow: bool = true,
        tilt: bool = true,
        particles: bool = false,
    }
);

effect_slot!(
    ParallaxConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    GlowConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    NoiseConfig { intensity = 0.3 }
);

effect_slot!(
    /// Blended overlay gradient animated independently of the background.
    GradientAnimationConfig {
        intensity = DEFAULT_INTENSITY,
        speed: f32 = 3.0,
    }
);

effect_slot!(
    HolographicConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    AuroraConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    CrystallineConfig { intensity = DEFAULT_INTENSITY }
);

effect_slot!(
    TransitionConfig {
        intensity = DEFAULT_INTENSITY,
        #[serde(rename = "type")]
        kind: Variant<TransitionType> = Variant::known(TransitionType::Fade),
        duration_ms: u32 = 600,
        easing: Variant<Easing> = Variant::known(Easing::EaseInOut),
        direction: Variant<Direction> = Variant::known(Direction::Right),
    }
);

/// Context adjustments already folded into a state by the optimizer.
///
/// Scaling rules consult these so that optimizing twice with the same
/// context is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustments {
    pub mobile: bool,
    pub presenting: bool,
}

// ============================================================================
// EffectState
// ============================================================================

/// Canonical, normalized record of every effect slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct EffectState {
    pub theme: Variant<ThemeTier>,

    // Card-level slots.
    pub hover: HoverConfig,
    pub glassmorphism: GlassConfig,
    pub subtle_animations: SubtleAnimationConfig,
    pub background_patterns: PatternConfig,
    pub particles: ParticleConfig,
    pub animated_gradient: AnimatedGradientConfig,
    pub floating_shapes: FloatingShapesConfig,
    pub ambient: AmbientConfig,
    pub mouse_tracking: PointerTrackingConfig,

    // Slide-level slots.
    pub parallax: ParallaxConfig,
    pub glow: GlowConfig,
    pub noise: NoiseConfig,
    pub gradient_animation: GradientAnimationConfig,
    pub holographic: HolographicConfig,
    pub auroras: AuroraConfig,
    pub crystalline: CrystallineConfig,
    pub transitions: TransitionConfig,

    #[serde(skip_serializing_if = "is_default_adjustments")]
    pub adjustments: Adjustments,
}

fn is_default_adjustments(a: &Adjustments) -> bool {
    *a == Adjustments::default()
}

impl Default for Variant<ThemeTier> {
    fn default() -> Self {
        Self::known(ThemeTier::Card)
    }
}

impl EffectState {
    /// Effects that are currently enabled, in pipeline order.
    pub fn active_families(&self) -> Vec<EffectFamily> {
        let slots: [(EffectFamily, &dyn Slot); 17] = [
            (EffectFamily::Glass, &self.glassmorphism),
            (EffectFamily::Hover, &self.hover),
            (EffectFamily::SubtleAnimation, &self.subtle_animations),
            (EffectFamily::BackgroundPattern, &self.background_patterns),
            (EffectFamily::Particles, &self.particles),
            (EffectFamily::Ambient, &self.ambient),
            (EffectFamily::AnimatedGradient, &self.animated_gradient),
            (EffectFamily::FloatingShapes, &self.floating_shapes),
            (EffectFamily::PointerTracking, &self.mouse_tracking),
            (EffectFamily::Parallax, &self.parallax),
            (EffectFamily::Glow, &self.glow),
            (EffectFamily::GradientAnimation, &self.gradient_animation),
            (EffectFamily::Noise, &self.noise),
            (EffectFamily::Holographic, &self.holographic),
            (EffectFamily::Aurora, &self.auroras),
            (EffectFamily::Crystalline, &self.crystalline),
            (EffectFamily::Transition, &self.transitions),
        ];
        slots
            .into_iter()
            .filter(|(_, slot)| slot.enabled())
            .map(|(family, _)| family)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_families().len()
    }

    /// Number of enabled effects other than particles.
    pub fn active_besides_particles(&self) -> usize {
        self.active_families()
            .into_iter()
            .filter(|f| *f != EffectFamily::Particles)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_families().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parse_is_case_insensitive() {
        assert_eq!(ParticleType::parse(" Constellation "), Some(ParticleType::Constellation));
        assert_eq!(TransitionType::parse("GLASS-SHATTER"), Some(TransitionType::GlassShatter));
        assert_eq!(ParticleType::parse("sparkle"), None);
    }

    #[test]
    fn transition_type_lists_eleven_kinds() {
        assert_eq!(TransitionType::ALL.len(), 11);
        assert!(TransitionType::Cube.is_3d());
        assert!(TransitionType::Holographic.is_3d());
        assert!(!TransitionType::Slide.is_3d());
    }

    #[test]
    fn variant_substitutes_and_remembers() {
        let v = Variant::from_input("sparkle", ParticleType::Floating);
        assert_eq!(v.value, ParticleType::Floating);
        assert!(!v.is_recognized());
        assert_eq!(v.as_input(), "sparkle");

        let known = Variant::from_input("creative", ParticleType::Floating);
        assert!(known.is_recognized());
        assert_eq!(known.as_input(), "creative");
    }

    #[test]
    fn choice_names_match_serde() {
        for kind in TransitionType::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
        for easing in Easing::ALL {
            let json = serde_json::to_string(easing).unwrap();
            assert_eq!(json, format!("\"{}\"", easing.name()));
        }
    }

    #[test]
    fn default_state_is_empty() {
        let state = EffectState::default();
        assert!(state.is_empty());
        assert_eq!(state.active_count(), 0);
        assert_eq!(state.theme.value, ThemeTier::Card);
    }

    #[test]
    fn active_families_counts_enabled_slots() {
        let mut state = EffectState::default();
        state.particles.enabled = true;
        state.hover.enabled = true;
        state.glow.enabled = true;
        state.transitions.enabled = true;
        assert_eq!(state.active_count(), 4);
        assert_eq!(state.active_besides_particles(), 3);
        assert_eq!(state.active_families().last(), Some(&EffectFamily::Transition));
        assert!(!state.is_empty());
    }

    #[test]
    fn easing_timing_function() {
        assert_eq!(Easing::EaseInOut.timing_function(), "ease-in-out");
        assert!(Easing::Spring.timing_function().starts_with("cubic-bezier"));
    }

    #[test]
    fn accepted_lists_all_names() {
        assert_eq!(
            ParticleType::accepted(),
            "floating, constellation, professional, creative"
        );
    }
}
