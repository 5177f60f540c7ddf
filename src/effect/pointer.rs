//! Pointer-reactive glow, tilt and particle displacement.
//!
//! The directives bind to custom properties (`--fx-pointer-x`, `--fx-tilt-x`,
//! ...) that the host updates per pointer event; [`pointer_response`] gives
//! the values for one update. When the runtime context carries a pointer
//! sample the directives start from that sample's response instead of the
//! centered rest position. Nothing is emitted under reduced motion.

use serde::{Deserialize, Serialize};

use super::{lerp, within, EffectGenerator, GenerateContext, CARD};
use crate::color::rgba_string;
use crate::context::PointerSample;
use crate::directive::{deg, pct, px, StyleDirective};
use crate::state::{EffectFamily, PointerTrackingConfig};

/// Tilt at full intensity and unit sensitivity, in degrees.
pub const BASE_MAX_TILT: f32 = 10.0;

/// Hard bound on the tilt angle regardless of sensitivity.
pub const TILT_LIMIT: f32 = 20.0;

/// Particle displacement at full intensity and unit sensitivity, in pixels.
pub const BASE_PARTICLE_SHIFT: f32 = 20.0;

/// The per-update pointer outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PointerResponse {
    /// Glow center in percent of the element box.
    pub glow_x: f32,
    pub glow_y: f32,
    /// Smoothed rotation around the x axis, in degrees.
    pub tilt_x: f32,
    /// Smoothed rotation around the y axis, in degrees.
    pub tilt_y: f32,
    /// Particle displacement in pixels; zero when particle response is off.
    pub particle_dx: f32,
    pub particle_dy: f32,
}

/// Computes one pointer update.
///
/// Tilt is proportional to the offset from the center, bounded by
/// `10deg * intensity * sensitivity` (never more than [`TILT_LIMIT`]), and
/// moves from the previous tilt toward the target by the smoothing factor.
pub fn pointer_response(config: &PointerTrackingConfig, sample: &PointerSample) -> PointerResponse {
    let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
    let x = finite(sample.x, 0.5).clamp(0.0, 1.0);
    let y = finite(sample.y, 0.5).clamp(0.0, 1.0);
    let (prev_x, prev_y) = (
        finite(sample.previous_tilt.0, 0.0),
        finite(sample.previous_tilt.1, 0.0),
    );

    // Offsets from the center in [-1, 1].
    let ox = (x - 0.5) * 2.0;
    let oy = (y - 0.5) * 2.0;

    let gain = config.intensity.clamp(0.0, 1.0) * config.sensitivity.max(0.0);
    let max_tilt = (BASE_MAX_TILT * gain).min(TILT_LIMIT);
    let smoothing = config.smoothing.clamp(0.0, 1.0);

    let (tilt_x, tilt_y) = if config.tilt {
        let target_x = -oy * max_tilt;
        let target_y = ox * max_tilt;
        (
            prev_x + (target_x - prev_x) * smoothing,
            prev_y + (target_y - prev_y) * smoothing,
        )
    } else {
        (0.0, 0.0)
    };

    let (particle_dx, particle_dy) = if config.particles {
        let shift = BASE_PARTICLE_SHIFT * gain;
        (ox * shift, oy * shift)
    } else {
        (0.0, 0.0)
    };

    PointerResponse {
        glow_x: x * 100.0,
        glow_y: y * 100.0,
        tilt_x,
        tilt_y,
        particle_dx,
        particle_dy,
    }
}

/// The tilt transform, written against the custom properties.
pub const TILT_TRANSFORM: &str =
    "perspective(1000px) rotateX(var(--fx-tilt-x)) rotateY(var(--fx-tilt-y))";

impl EffectGenerator for PointerTrackingConfig {
    const FAMILY: EffectFamily = EffectFamily::PointerTracking;

    fn is_active(&self, ctx: &GenerateContext) -> bool {
        self.enabled && !ctx.runtime.reduced_motion
    }

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let sample = ctx.runtime.pointer.unwrap_or_default();
        let response = pointer_response(self, &sample);

        let mut card = StyleDirective::new(CARD, Self::FAMILY)
            .with("--fx-pointer-x", pct(response.glow_x))
            .with("--fx-pointer-y", pct(response.glow_y));
        let mut out = Vec::new();

        if self.tilt {
            card.set("--fx-tilt-x", deg(response.tilt_x));
            card.set("--fx-tilt-y", deg(response.tilt_y));
            card.set("transform-style", "preserve-3d");
            card.set("transform", TILT_TRANSFORM);
            card.set("transition", "transform 0.1s ease-out");
        }

        if self.glow {
            let glow = rgba_string(ctx.palette.accent_rgb(), lerp(0.15, 0.4, self.intensity));
            card.set("position", "relative");
            out.push(
                StyleDirective::new(format!("{CARD}::after"), Self::FAMILY)
                    .with("content", "\"\"")
                    .with("position", "absolute")
                    .with("inset", "0")
                    .with("pointer-events", "none")
                    .with("border-radius", "inherit")
                    .with(
                        "background-image",
                        format!(
                            "radial-gradient(circle {} at var(--fx-pointer-x) var(--fx-pointer-y), {glow}, transparent 70%)",
                            px(lerp(120.0, 260.0, self.intensity))
                        ),
                    ),
            );
        }

        if self.particles {
            card.set("--fx-particle-dx", px(response.particle_dx));
            card.set("--fx-particle-dy", px(response.particle_dy));
            out.push(
                StyleDirective::new(within(CARD, ".fx-particle"), Self::FAMILY)
                    .with("translate", "var(--fx-particle-dx) var(--fx-particle-dy)")
                    .with("transition", "translate 0.2s ease-out"),
            );
        }

        out.insert(0, card);
        out
    }
}
