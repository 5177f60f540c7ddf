//! Radial dot layers behind the content.
//!
//! Dots are darker than the accent on light backgrounds and lighter on dark
//! ones. The layer positions cycle through four keyframes.

use super::{lerp, EffectGenerator, GenerateContext, CARD};
use crate::color::{rgba_string, shift_lightness};
use crate::directive::{secs, Keyframe, KeyframeSet, StyleDirective};
use crate::state::{EffectFamily, PatternConfig};

pub const PATTERN_KEYFRAMES: &str = "fx-pattern-drift";

/// Tile sizes of the three layers.
const LAYER_SIZES: [&str; 3] = ["24px 24px", "36px 36px", "100% 100%"];

/// Position of each layer at the four keyframe offsets.
const DRIFT: [[&str; 3]; 4] = [
    ["0 0", "0 0", "0 0"],
    ["12px 0", "0 18px", "0 0"],
    ["12px 12px", "18px 18px", "0 0"],
    ["0 0", "0 0", "0 0"],
];

const DRIFT_OFFSETS: [f32; 4] = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];

impl EffectGenerator for PatternConfig {
    const FAMILY: EffectFamily = EffectFamily::BackgroundPattern;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let i = self.intensity;
        let shift = if ctx.is_light() { -0.25 } else { 0.25 };
        let dot = shift_lightness(ctx.palette.accent_rgb(), shift);
        let alpha = lerp(0.06, 0.2, i);

        let images = [
            format!(
                "radial-gradient(circle at center, {} 1.5px, transparent 1.5px)",
                rgba_string(dot, alpha)
            ),
            format!(
                "radial-gradient(circle at center, {} 1px, transparent 1px)",
                rgba_string(dot, alpha * 0.7)
            ),
            format!(
                "radial-gradient(ellipse at top left, {}, transparent 60%)",
                rgba_string(dot, alpha * 0.5)
            ),
        ];

        let mut directive = StyleDirective::new(CARD, Self::FAMILY)
            .with("background-image", images.join(", "))
            .with("background-size", LAYER_SIZES.join(", "))
            .with("background-position", DRIFT[0].join(", "));

        // Static dots under reduced motion.
        if !ctx.runtime.reduced_motion {
            let frames = DRIFT_OFFSETS
                .iter()
                .zip(DRIFT)
                .map(|(offset, positions)| {
                    Keyframe::at(*offset).with("background-position", positions.join(", "))
                })
                .collect();
            directive = directive
                .with(
                    "animation",
                    format!("{PATTERN_KEYFRAMES} {} linear infinite", secs(lerp(30.0, 15.0, i))),
                )
                .with_keyframes(KeyframeSet::new(PATTERN_KEYFRAMES, frames));
        }

        vec![directive]
    }
}
