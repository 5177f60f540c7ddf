//! Premium slide looks: holographic sheen, auroras and crystalline facets.

use super::{lerp, overlay_layer, within, EffectGenerator, GenerateContext, SLIDE};
use crate::color::{rgba_string, white, Rgb};
use crate::directive::{fmt_num, pct, px, secs, Keyframe, KeyframeSet, StyleDirective};
use crate::state::{AuroraConfig, CrystallineConfig, EffectFamily, HolographicConfig};

pub const HOLO_KEYFRAMES: &str = "fx-holo-shift";
pub const HOLO_TEXT_KEYFRAMES: &str = "fx-holo-text";
pub const AURORA_KEYFRAMES: &str = "fx-aurora-spin";
pub const AURORA_REVERSE_KEYFRAMES: &str = "fx-aurora-spin-reverse";
pub const FACET_KEYFRAMES: &str = "fx-facet-glint";

fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

fn position_cycle(name: &str, end: &str) -> KeyframeSet {
    KeyframeSet::new(
        name,
        vec![
            Keyframe::at(0.0).with("background-position", "0% 50%"),
            Keyframe::at(0.5).with("background-position", end),
            Keyframe::at(1.0).with("background-position", "0% 50%"),
        ],
    )
}

fn rotation(name: &str, from: f32, to: f32) -> KeyframeSet {
    KeyframeSet::new(
        name,
        vec![
            Keyframe::at(0.0).with("transform", format!("rotate({}deg)", fmt_num(from))),
            Keyframe::at(1.0).with("transform", format!("rotate({}deg)", fmt_num(to))),
        ],
    )
}

// ============================================================================
// Holographic
// ============================================================================

/// Iridescent stops shared by the surface and the text.
const HOLO_STOPS: [(u8, u8, u8); 6] = [
    (255, 0, 128),
    (255, 140, 0),
    (255, 240, 0),
    (0, 255, 160),
    (0, 180, 255),
    (160, 0, 255),
];

impl EffectGenerator for HolographicConfig {
    const FAMILY: EffectFamily = EffectFamily::Holographic;

    fn generate(&self, _ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let alpha = lerp(0.1, 0.35, self.intensity);
        let stops = |alpha: f32| {
            HOLO_STOPS
                .iter()
                .map(|&(r, g, b)| rgba_string(rgb(r, g, b), alpha))
                .collect::<Vec<_>>()
                .join(", ")
        };

        // Surface and text cycle on different periods so they never lock step.
        vec![
            overlay_layer(within(SLIDE, ".fx-holo"), Self::FAMILY)
                .with("background-image", format!("linear-gradient(45deg, {})", stops(alpha)))
                .with("background-size", "400% 400%")
                .with("mix-blend-mode", "color-dodge")
                .with("animation", format!("{HOLO_KEYFRAMES} 8s linear infinite"))
                .with_keyframes(position_cycle(HOLO_KEYFRAMES, "100% 50%")),
            StyleDirective::new(within(SLIDE, ".fx-holo-text"), Self::FAMILY)
                .with("background-image", format!("linear-gradient(90deg, {})", stops(1.0)))
                .with("background-size", "200% auto")
                .with("-webkit-background-clip", "text")
                .with("background-clip", "text")
                .with("color", "transparent")
                .with("animation", format!("{HOLO_TEXT_KEYFRAMES} 5s linear infinite"))
                .with_keyframes(position_cycle(HOLO_TEXT_KEYFRAMES, "200% 50%")),
        ]
    }
}

// ============================================================================
// Aurora
// ============================================================================

impl EffectGenerator for AuroraConfig {
    const FAMILY: EffectFamily = EffectFamily::Aurora;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let alpha = lerp(0.25, 0.6, self.intensity);
        let layer = |color: Rgb, at: &str| {
            format!(
                "radial-gradient(ellipse at {at}, {}, transparent 60%)",
                rgba_string(color, alpha)
            )
        };
        let aurora = within(SLIDE, ".fx-aurora");

        vec![
            StyleDirective::new(SLIDE, Self::FAMILY)
                .with("position", "relative")
                .with("overflow", "hidden"),
            StyleDirective::new(aurora.clone(), Self::FAMILY)
                .with("position", "absolute")
                .with("inset", "-50%")
                .with("pointer-events", "none")
                .with("background-image", layer(ctx.palette.primary_rgb(), "30% 30%"))
                .with("mix-blend-mode", "plus-lighter")
                .with("filter", format!("blur({})", px(lerp(30.0, 60.0, self.intensity))))
                .with("animation", format!("{AURORA_KEYFRAMES} 20s linear infinite"))
                .with_keyframes(rotation(AURORA_KEYFRAMES, 0.0, 360.0)),
            StyleDirective::new(format!("{aurora}::after"), Self::FAMILY)
                .with("content", "\"\"")
                .with("position", "absolute")
                .with("inset", "0")
                .with("background-image", layer(ctx.palette.accent_rgb(), "70% 70%"))
                .with("mix-blend-mode", "plus-lighter")
                .with("animation", format!("{AURORA_REVERSE_KEYFRAMES} 26s linear infinite"))
                .with_keyframes(rotation(AURORA_REVERSE_KEYFRAMES, 0.0, -360.0)),
        ]
    }
}

// ============================================================================
// Crystalline
// ============================================================================

/// Facet anchors (left, top) in percent and edge length in pixels.
const FACETS: [(f32, f32, f32); 3] = [(12.0, 18.0, 90.0), (68.0, 10.0, 60.0), (55.0, 62.0, 120.0)];

/// Stagger between facet glints, in seconds.
pub const FACET_STAGGER: f32 = 0.8;

impl EffectGenerator for CrystallineConfig {
    const FAMILY: EffectFamily = EffectFamily::Crystalline;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let i = self.intensity;
        let fill = format!(
            "linear-gradient(135deg, {}, {})",
            rgba_string(white(), lerp(0.1, 0.4, i)),
            rgba_string(ctx.palette.accent_rgb(), lerp(0.05, 0.2, i))
        );
        let glint = KeyframeSet::new(
            FACET_KEYFRAMES,
            vec![
                Keyframe::at(0.0).with("opacity", "0.3").with("filter", "brightness(1)"),
                Keyframe::at(0.5)
                    .with("opacity", "1")
                    .with("filter", format!("brightness({})", fmt_num(lerp(1.2, 1.8, i)))),
                Keyframe::at(1.0).with("opacity", "0.3").with("filter", "brightness(1)"),
            ],
        );

        FACETS
            .iter()
            .enumerate()
            .map(|(index, (left, top, size))| {
                let mut facet = StyleDirective::new(
                    within(SLIDE, &format!(".fx-facet-{}", index + 1)),
                    Self::FAMILY,
                )
                .with("position", "absolute")
                .with("left", pct(*left))
                .with("top", pct(*top))
                .with("width", px(*size))
                .with("height", px(*size))
                .with("pointer-events", "none")
                .with("clip-path", "polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)")
                .with("background-image", fill.clone())
                .with(
                    "animation",
                    format!(
                        "{FACET_KEYFRAMES} 4s ease-in-out {} infinite",
                        secs(index as f32 * FACET_STAGGER)
                    ),
                );
                if index == 0 {
                    facet.keyframes.push(glint.clone());
                }
                facet
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuntimeContext;
    use crate::effect::testing::{find, run};
    use crate::state::EffectState;

    #[test]
    fn holographic_text_and_surface_use_independent_timing() {
        let mut state = EffectState::default();
        state.holographic.enabled = true;
        let out = run(&state, &state.holographic, &RuntimeContext::default());
        let surface = find(&out, ".fx-slide .fx-holo").get("animation").unwrap();
        let text = find(&out, ".fx-slide .fx-holo-text").get("animation").unwrap();
        assert!(surface.starts_with(HOLO_KEYFRAMES));
        assert!(text.starts_with(HOLO_TEXT_KEYFRAMES));
        assert_ne!(surface.split(' ').nth(1), text.split(' ').nth(1));
    }

    #[test]
    fn auroras_counter_rotate() {
        let mut state = EffectState::default();
        state.auroras.enabled = true;
        let out = run(&state, &state.auroras, &RuntimeContext::default());
        let forward = find(&out, ".fx-slide .fx-aurora");
        let reverse = find(&out, ".fx-slide .fx-aurora::after");
        assert_eq!(forward.keyframes[0].frames[1].properties["transform"], "rotate(360deg)");
        assert_eq!(reverse.keyframes[0].frames[1].properties["transform"], "rotate(-360deg)");
        assert_eq!(forward.get("mix-blend-mode"), Some("plus-lighter"));
    }

    #[test]
    fn three_staggered_facets() {
        let mut state = EffectState::default();
        state.crystalline.enabled = true;
        let out = run(&state, &state.crystalline, &RuntimeContext::default());
        assert_eq!(out.len(), 3);
        assert_eq!(
            find(&out, ".fx-slide .fx-facet-2").get("animation"),
            Some("fx-facet-glint 4s ease-in-out 0.8s infinite")
        );
        assert_eq!(
            find(&out, ".fx-slide .fx-facet-1").get("animation"),
            Some("fx-facet-glint 4s ease-in-out 0s infinite")
        );
    }
}
