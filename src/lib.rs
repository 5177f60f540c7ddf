//! lumen-fx: Visual effects composition engine
//!
//! This crate turns a flat set of effect toggles (hover, glass, particles,
//! ambient gradients, parallax, holographic looks, pointer tracking, slide
//! transitions) plus a color palette into conflict-free style directives,
//! particle descriptors and a transition descriptor. It does no I/O and
//! paints nothing; a rendering layer consumes the output.
//!
//! # Pipeline
//!
//! ```text
//! flat config -> normalize -> EffectState -+-> validate (side report)
//!                                          +-> optimize(runtime) -> generators -> resolve -> bundle
//! ```
//!
//! # Example
//!
//! ```
//! use lumen_fx::{compose, ColorPalette, RuntimeContext, SurfaceTemplate, DEFAULT_SEED};
//! use serde_json::json;
//!
//! let config = json!({
//!     "hoverEffect": true,
//!     "glassmorphism": true,
//!     "particles": true,
//!     "particleType": "constellation",
//!     "particleCount": 12,
//! });
//!
//! let bundle = compose(
//!     &config,
//!     &ColorPalette::default(),
//!     &SurfaceTemplate::default(),
//!     &RuntimeContext::default(),
//!     DEFAULT_SEED,
//! )
//! .unwrap();
//!
//! assert_eq!(bundle.particles.len(), 12);
//! assert!(bundle.validation.is_valid);
//!
//! let css = bundle.to_css();
//! assert!(css.contains(".fx-card:hover"));
//! assert!(css.contains("backdrop-filter"));
//! ```
//!
//! # Device Context
//!
//! The same configuration degrades for the viewing context:
//!
//! ```
//! use lumen_fx::{normalize_value, optimize, RuntimeContext, TransitionType};
//! use serde_json::json;
//!
//! let state = normalize_value(&json!({
//!     "particles": true,
//!     "transitions": true,
//!     "transitionType": "cube",
//!     "transitionDuration": 900,
//! }))
//! .unwrap();
//!
//! let calm = optimize(&state, &RuntimeContext::new().reduced_motion());
//! assert!(!calm.particles.enabled);
//! assert_eq!(calm.transitions.kind.value, TransitionType::Fade);
//! assert_eq!(calm.transitions.duration_ms, 300);
//! ```
//!
//! # Serializable Profiles
//!
//! Hosts persist [`FlatConfig`]; [`normalize`] and [`denormalize`] map it to
//! and from the canonical [`EffectState`]:
//!
//! ```
//! use lumen_fx::{denormalize, normalize, FlatConfig};
//!
//! let config = FlatConfig::from_json(r#"{ "auroras": true, "auroraIntensity": 0.8 }"#).unwrap();
//! let state = normalize(&config);
//! assert_eq!(normalize(&denormalize(&state)), state);
//! ```

mod color;
mod composer;
mod context;
mod directive;
mod effect;
mod error;
mod fingerprint;
mod normalize;
mod optimize;
mod profile;
mod resolve;
mod serialize;
mod state;
mod validate;

#[cfg(feature = "wasm")]
mod wasm;

pub use color::{
    best_foreground_for, best_foreground_for_rgb, best_foreground_with_accent, contrast_ratio,
    extract_base_color, is_light, parse_color, relative_luminance, rgba_string, shift_lightness,
    to_hex, ColorPalette, ContrastPick, Rgb, MIN_TEXT_CONTRAST,
};
pub use composer::{
    compose, compose_state, generate_directives, Configurable, EffectBundle, EffectComposer,
    DEFAULT_SEED,
};
pub use context::{PointerSample, RuntimeContext, SurfaceTemplate};
pub use directive::{
    fmt_num, Keyframe, KeyframeSet, MotionProfile, ParticleDescriptor, ParticleLink,
    ParticleShape, StyleDirective, TransitionDescriptor,
};
pub use effect::{
    generate_particles, pointer_response, transition_descriptor, EffectGenerator,
    GenerateContext, GeneratedEffects, PointerResponse,
};
pub use error::{EffectError, EffectResult};
pub use fingerprint::{fingerprint_inputs, Fingerprint};
pub use normalize::{default_particle_count, denormalize, normalize, normalize_value};
pub use optimize::optimize;
pub use profile::FlatConfig;
pub use resolve::{merge, particle_soft_cap, resolve, PARTICLE_SOFT_CAP};
pub use serialize::{particle_directives, CssSerializer, DirectiveSerializer};
pub use state::{
    Adjustments, AmbientConfig, AnimatedGradientConfig, AuroraConfig, Choice, CrystallineConfig,
    Direction, Easing, EffectFamily, EffectState, FloatingShapesConfig, GlassConfig, GlowConfig,
    GradientAnimationConfig, GradientType, HolographicConfig, HoverConfig, NoiseConfig,
    ParallaxConfig, ParticleConfig, ParticleType, PatternConfig, PointerTrackingConfig, ShapeType,
    Slot, SubtleAnimationConfig, ThemeTier, TransitionConfig, TransitionType, Variant,
    DEFAULT_INTENSITY,
};
pub use validate::{validate, ValidationReport};

#[cfg(feature = "wasm")]
pub use wasm::EffectRenderer;
