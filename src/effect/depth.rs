//! Slide-level depth effects: parallax, glow, overlay gradient and noise.

use super::{lerp, overlay_layer, within, EffectGenerator, GenerateContext, SLIDE};
use crate::color::rgba_string;
use crate::directive::{fmt_num, px, secs, Keyframe, KeyframeSet, StyleDirective};
use crate::state::{EffectFamily, GlowConfig, GradientAnimationConfig, NoiseConfig, ParallaxConfig};

pub const OVERLAY_KEYFRAMES: &str = "fx-overlay-shift";

/// Number of parallax depth layers.
pub const DEPTH_LAYERS: usize = 3;

// ============================================================================
// Parallax
// ============================================================================

impl EffectGenerator for ParallaxConfig {
    const FAMILY: EffectFamily = EffectFamily::Parallax;

    fn generate(&self, _ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let step = lerp(4.0, 20.0, self.intensity);
        let mut out = vec![
            StyleDirective::new(SLIDE, Self::FAMILY)
                .with("transform-style", "preserve-3d")
                .with("perspective", "1000px"),
        ];
        for depth in 1..=DEPTH_LAYERS {
            let layer = format!(".fx-depth-{depth}");
            out.push(
                StyleDirective::new(within(SLIDE, &layer), Self::FAMILY)
                    .with("transition", "transform 0.4s ease-out")
                    .with("will-change", "transform"),
            );
            out.push(
                StyleDirective::new(format!("{SLIDE}:hover {layer}"), Self::FAMILY).with(
                    "transform",
                    format!("translateZ({})", px(step * depth as f32)),
                ),
            );
        }
        out
    }
}

// ============================================================================
// Glow
// ============================================================================

impl EffectGenerator for GlowConfig {
    const FAMILY: EffectFamily = EffectFamily::Glow;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let i = self.intensity;
        let accent = ctx.palette.accent_rgb();
        let shadows = [
            (lerp(2.0, 6.0, i), lerp(0.3, 0.8, i)),
            (lerp(6.0, 16.0, i), lerp(0.2, 0.5, i)),
            (lerp(12.0, 36.0, i), lerp(0.1, 0.3, i)),
        ]
        .iter()
        .map(|(blur, alpha)| format!("0 0 {} {}", px(*blur), rgba_string(accent, *alpha)))
        .collect::<Vec<_>>()
        .join(", ");

        let glow = within(SLIDE, ".fx-glow");
        vec![
            StyleDirective::new(glow.clone(), Self::FAMILY)
                .with("position", "relative")
                .with("text-shadow", shadows),
            StyleDirective::new(format!("{glow}::before"), Self::FAMILY)
                .with("content", "\"\"")
                .with("position", "absolute")
                .with("inset", "-20%")
                .with("z-index", "-1")
                .with("pointer-events", "none")
                .with(
                    "background-image",
                    format!(
                        "radial-gradient(circle, {}, transparent 70%)",
                        rgba_string(accent, lerp(0.1, 0.35, i))
                    ),
                ),
        ]
    }
}

// ============================================================================
// Gradient Animation Overlay
// ============================================================================

/// Overlay period in seconds, independent of the ambient gradient.
pub fn overlay_duration(speed: f32) -> f32 {
    20.0 - 3.0 * speed.clamp(1.0, 5.0)
}

impl EffectGenerator for GradientAnimationConfig {
    const FAMILY: EffectFamily = EffectFamily::GradientAnimation;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let alpha = lerp(0.1, 0.4, self.intensity);
        let stops = [
            ctx.palette.primary_rgb(),
            ctx.palette.secondary_rgb(),
            ctx.palette.accent_rgb(),
            ctx.palette.primary_rgb(),
        ]
        .iter()
        .map(|c| rgba_string(*c, alpha))
        .collect::<Vec<_>>()
        .join(", ");
        let blend = if ctx.is_light() { "soft-light" } else { "overlay" };

        let frames = vec![
            Keyframe::at(0.0).with("background-position", "0% 0%"),
            Keyframe::at(0.5).with("background-position", "100% 100%"),
            Keyframe::at(1.0).with("background-position", "0% 0%"),
        ];

        vec![
            StyleDirective::new(SLIDE, Self::FAMILY).with("position", "relative"),
            overlay_layer(format!("{SLIDE}::after"), Self::FAMILY)
                .with("content", "\"\"")
                .with("background-image", format!("linear-gradient(135deg, {stops})"))
                .with("background-size", "300% 300%")
                .with("mix-blend-mode", blend)
                .with(
                    "animation",
                    format!(
                        "{OVERLAY_KEYFRAMES} {} ease-in-out infinite",
                        secs(overlay_duration(self.speed))
                    ),
                )
                .with_keyframes(KeyframeSet::new(OVERLAY_KEYFRAMES, frames)),
        ]
    }
}

// ============================================================================
// Noise
// ============================================================================

/// Fractal noise tile as an inline SVG data URL.
const NOISE_TILE: &str = "url(\"data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='200' height='200'><filter id='n'><feTurbulence type='fractalNoise' baseFrequency='0.8' numOctaves='3' stitchTiles='stitch'/></filter><rect width='100%' height='100%' filter='url(%23n)'/></svg>\")";

impl EffectGenerator for NoiseConfig {
    const FAMILY: EffectFamily = EffectFamily::Noise;

    fn generate(&self, _ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        vec![
            overlay_layer(within(SLIDE, ".fx-noise"), Self::FAMILY)
                .with("background-image", NOISE_TILE)
                .with("background-size", "200px 200px")
                .with("mix-blend-mode", "overlay")
                .with("opacity", fmt_num(lerp(0.02, 0.15, self.intensity))),
        ]
    }
}
