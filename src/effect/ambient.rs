//! Ambient layers: the shared container, the animated gradient and the
//! floating shapes.
//!
//! The container is emitted whenever any of the three slots is enabled. It
//! splits `ambient.opacity` between the layers that render: 60% to the
//! gradient and 40% to the shapes when both are present, all of it to a lone
//! layer.
//!
//! # Emitted Properties
//!
//! - [`AmbientBudget`]: per-layer opacity shares.

use super::{lerp, overlay_layer, within, AmbientBudget, EffectGenerator, GenerateContext, CARD};
use crate::color::rgba_string;
use crate::directive::{fmt_num, pct, px, secs, Keyframe, KeyframeSet, StyleDirective};
use crate::state::{
    AmbientConfig, AnimatedGradientConfig, EffectFamily, EffectState, FloatingShapesConfig,
    GradientType, ShapeType,
};

pub const GRADIENT_SHIFT_KEYFRAMES: &str = "fx-gradient-shift";
pub const GRADIENT_PULSE_KEYFRAMES: &str = "fx-gradient-pulse";
pub const SHAPE_FLOAT_KEYFRAMES: &str = "fx-shape-float";

pub const GRADIENT_SHARE: f32 = 0.6;
pub const SHAPES_SHARE: f32 = 0.4;

// ============================================================================
// Container
// ============================================================================

/// Splits the ambient opacity between the gradient and shapes layers.
pub fn ambient_budget(state: &EffectState) -> AmbientBudget {
    let total = state.ambient.opacity.clamp(0.0, 1.0);
    match (state.animated_gradient.enabled, state.floating_shapes.enabled) {
        (true, true) => AmbientBudget {
            gradient: total * GRADIENT_SHARE,
            shapes: total * SHAPES_SHARE,
        },
        (true, false) => AmbientBudget {
            gradient: total,
            shapes: 0.0,
        },
        (false, true) => AmbientBudget {
            gradient: 0.0,
            shapes: total,
        },
        (false, false) => AmbientBudget {
            gradient: 0.0,
            shapes: 0.0,
        },
    }
}

fn container() -> String {
    within(CARD, ".fx-ambient")
}

impl EffectGenerator for AmbientConfig {
    const FAMILY: EffectFamily = EffectFamily::Ambient;

    fn is_active(&self, ctx: &GenerateContext) -> bool {
        self.enabled || ctx.state.animated_gradient.enabled || ctx.state.floating_shapes.enabled
    }

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let mut out = vec![
            StyleDirective::new(CARD, Self::FAMILY)
                .with("position", "relative")
                .with("overflow", "hidden"),
            overlay_layer(container(), Self::FAMILY)
                .with("overflow", "hidden")
                .with("z-index", "0"),
        ];

        if self.enabled {
            let light = rgba_string(ctx.palette.primary_rgb(), lerp(0.15, 0.45, self.intensity));
            out.push(
                overlay_layer(format!("{}::before", container()), Self::FAMILY)
                    .with("content", "\"\"")
                    .with(
                        "background-image",
                        format!("radial-gradient(circle at 50% 0%, {light}, transparent 70%)"),
                    )
                    .with("opacity", fmt_num(self.opacity)),
            );
        }
        out
    }

    fn emit(&self, ctx: &mut GenerateContext) {
        let budget = ambient_budget(ctx.state);
        ctx.set(budget);
    }
}

// ============================================================================
// Animated Gradient
// ============================================================================

/// The fixed six-color table of each gradient type.
pub fn gradient_colors(kind: GradientType) -> [&'static str; 6] {
    match kind {
        GradientType::Aurora => ["#00c9ff", "#92fe9d", "#00f5a0", "#7f5af0", "#2cb67d", "#00c9ff"],
        GradientType::Cosmic => ["#0f0c29", "#302b63", "#24243e", "#6a0dad", "#3a1c71", "#d76d77"],
        GradientType::Ocean => ["#2e3192", "#1bffff", "#0077be", "#00a8cc", "#005f73", "#94d2bd"],
        GradientType::Sunset => ["#ff512f", "#f09819", "#dd2476", "#ff6a00", "#ee0979", "#ffb347"],
        GradientType::Forest => ["#134e5e", "#71b280", "#2d6a4f", "#40916c", "#1b4332", "#95d5b2"],
        GradientType::Professional => {
            ["#1e3a8a", "#3b82f6", "#64748b", "#0f172a", "#334155", "#93c5fd"]
        }
    }
}

/// Animation period in seconds: `15 - 2 * speed` with speed in `[1, 5]`.
pub fn gradient_duration(speed: f32) -> f32 {
    15.0 - 2.0 * speed.clamp(1.0, 5.0)
}

impl EffectGenerator for AnimatedGradientConfig {
    const FAMILY: EffectFamily = EffectFamily::AnimatedGradient;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let opacity = ctx
            .get::<AmbientBudget>()
            .map(|b| b.gradient)
            .unwrap_or_else(|| ambient_budget(ctx.state).gradient);
        let duration = gradient_duration(self.speed);
        let amplitude = 0.15 * self.intensity.clamp(0.0, 1.0);

        let shift = KeyframeSet::new(
            GRADIENT_SHIFT_KEYFRAMES,
            vec![
                Keyframe::at(0.0).with("background-position", "0% 50%"),
                Keyframe::at(0.5).with("background-position", "100% 50%"),
                Keyframe::at(1.0).with("background-position", "0% 50%"),
            ],
        );
        let pulse = KeyframeSet::new(
            GRADIENT_PULSE_KEYFRAMES,
            vec![
                Keyframe::at(0.0).with("filter", "brightness(1)"),
                Keyframe::at(0.5).with("filter", format!("brightness({})", fmt_num(1.0 + amplitude))),
                Keyframe::at(1.0).with("filter", "brightness(1)"),
            ],
        );

        vec![
            overlay_layer(within(CARD, ".fx-ambient-gradient"), Self::FAMILY)
                .with(
                    "background-image",
                    format!(
                        "linear-gradient(-45deg, {})",
                        gradient_colors(self.kind.value).join(", ")
                    ),
                )
                .with("background-size", "400% 400%")
                .with("opacity", fmt_num(opacity))
                .with(
                    "animation",
                    format!(
                        "{GRADIENT_SHIFT_KEYFRAMES} {} ease infinite, {GRADIENT_PULSE_KEYFRAMES} {} ease-in-out infinite",
                        secs(duration),
                        secs(duration / 2.0)
                    ),
                )
                .with_keyframes(shift)
                .with_keyframes(pulse),
        ]
    }
}

// ============================================================================
// Floating Shapes
// ============================================================================

/// Anchor points of the shapes, in percent of the container.
const SHAPE_ANCHORS: [(f32, f32); 5] = [
    (10.0, 20.0),
    (70.0, 15.0),
    (40.0, 65.0),
    (80.0, 70.0),
    (15.0, 80.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outline {
    Circle,
    Square,
    Triangle,
}

fn outline(kind: ShapeType, index: usize) -> Outline {
    match kind {
        ShapeType::Circles => Outline::Circle,
        ShapeType::Squares => Outline::Square,
        ShapeType::Triangles => Outline::Triangle,
        ShapeType::Mixed => [Outline::Circle, Outline::Square, Outline::Triangle][index % 3],
    }
}

impl EffectGenerator for FloatingShapesConfig {
    const FAMILY: EffectFamily = EffectFamily::FloatingShapes;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let opacity = ctx
            .get::<AmbientBudget>()
            .map(|b| b.shapes)
            .unwrap_or_else(|| ambient_budget(ctx.state).shapes);
        let travel = lerp(10.0, 40.0, self.intensity);
        let duration = 20.0 - 3.0 * self.speed.clamp(1.0, 5.0);
        let fill = rgba_string(ctx.palette.secondary_rgb(), lerp(0.2, 0.5, self.intensity));
        let count = self.count.clamp(1, SHAPE_ANCHORS.len() as u32) as usize;

        let float = KeyframeSet::new(
            SHAPE_FLOAT_KEYFRAMES,
            vec![
                Keyframe::at(0.0).with("transform", "translate(0, 0) rotate(0deg)"),
                Keyframe::at(1.0 / 3.0).with(
                    "transform",
                    format!("translate({}, {}) rotate(120deg)", px(travel), px(-travel)),
                ),
                Keyframe::at(2.0 / 3.0).with(
                    "transform",
                    format!(
                        "translate({}, {}) rotate(240deg)",
                        px(-travel * 0.66),
                        px(travel * 0.66)
                    ),
                ),
                Keyframe::at(1.0).with("transform", "translate(0, 0) rotate(360deg)"),
            ],
        );

        let mut out = vec![
            StyleDirective::new(within(CARD, ".fx-shape"), Self::FAMILY)
                .with("position", "absolute")
                .with("pointer-events", "none")
                .with("background-color", fill)
                .with("opacity", fmt_num(opacity))
                .with(
                    "animation",
                    format!("{SHAPE_FLOAT_KEYFRAMES} {} ease-in-out infinite", secs(duration)),
                )
                .with_keyframes(float),
        ];

        for (index, (x, y)) in SHAPE_ANCHORS.iter().take(count).enumerate() {
            let size = 60.0 + 20.0 * (index % 3) as f32;
            let mut shape = StyleDirective::new(
                within(CARD, &format!(".fx-shape-{}", index + 1)),
                Self::FAMILY,
            )
            .with("left", pct(*x))
            .with("top", pct(*y))
            .with("width", px(size))
            .with("height", px(size))
            .with("animation-delay", secs(-(index as f32) * duration / count as f32));
            match outline(self.kind.value, index) {
                Outline::Circle => shape.set("border-radius", "50%"),
                Outline::Square => shape.set("border-radius", "12%"),
                Outline::Triangle => shape.set("clip-path", "polygon(50% 0%, 100% 100%, 0% 100%)"),
            }
            out.push(shape);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPalette;
    use crate::context::{RuntimeContext, SurfaceTemplate};
    use crate::effect::{generate_all, testing::find};

    fn render(state: &EffectState) -> Vec<StyleDirective> {
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let runtime = RuntimeContext::default();
        generate_all(GenerateContext::new(state, &palette, &template, &runtime, 3)).directives
    }

    #[test]
    fn duration_formula() {
        assert_eq!(gradient_duration(1.0), 13.0);
        assert_eq!(gradient_duration(3.0), 9.0);
        assert_eq!(gradient_duration(5.0), 5.0);
        assert_eq!(gradient_duration(9.0), 5.0);
    }

    #[test]
    fn every_gradient_type_has_six_colors() {
        use crate::state::Choice;
        for kind in GradientType::ALL {
            let colors = gradient_colors(*kind);
            assert_eq!(colors.len(), 6);
            assert!(colors.iter().all(|c| crate::color::parse_color(c).is_some()));
        }
    }

    #[test]
    fn opacity_budget_is_split_when_both_render() {
        let mut state = EffectState::default();
        state.ambient.opacity = 0.5;
        state.animated_gradient.enabled = true;
        state.floating_shapes.enabled = true;

        let budget = ambient_budget(&state);
        assert!((budget.gradient - 0.3).abs() < 1e-6);
        assert!((budget.shapes - 0.2).abs() < 1e-6);

        let out = render(&state);
        assert_eq!(find(&out, ".fx-card .fx-ambient-gradient").get("opacity"), Some("0.3"));
        assert_eq!(find(&out, ".fx-card .fx-shape").get("opacity"), Some("0.2"));
    }

    #[test]
    fn lone_layer_takes_full_budget() {
        let mut state = EffectState::default();
        state.ambient.opacity = 0.4;
        state.animated_gradient.enabled = true;
        let out = render(&state);
        assert_eq!(find(&out, ".fx-card .fx-ambient-gradient").get("opacity"), Some("0.4"));
    }

    #[test]
    fn container_emitted_for_any_ambient_slot() {
        let mut state = EffectState::default();
        state.floating_shapes.enabled = true;
        let out = render(&state);
        assert!(out.iter().any(|d| d.selector == ".fx-card .fx-ambient"));
        // The ambient glow itself is only added when the ambient slot is on.
        assert!(!out.iter().any(|d| d.selector == ".fx-card .fx-ambient::before"));
    }

    #[test]
    fn shape_count_controls_instances() {
        let mut state = EffectState::default();
        state.floating_shapes.enabled = true;
        state.floating_shapes.count = 4;
        state.floating_shapes.kind.force(ShapeType::Mixed);
        let out = render(&state);
        let shapes: Vec<_> = out
            .iter()
            .filter(|d| d.selector.starts_with(".fx-card .fx-shape-"))
            .collect();
        assert_eq!(shapes.len(), 4);
        assert_eq!(shapes[0].get("border-radius"), Some("50%"));
        assert!(shapes[2].get("clip-path").is_some());
    }

    #[test]
    fn gradient_uses_type_table_and_speed() {
        let mut state = EffectState::default();
        state.animated_gradient.enabled = true;
        state.animated_gradient.kind.force(GradientType::Sunset);
        state.animated_gradient.speed = 5.0;
        let out = render(&state);
        let layer = find(&out, ".fx-card .fx-ambient-gradient");
        assert!(layer.get("background-image").unwrap().contains("#ff512f"));
        assert!(layer.get("animation").unwrap().starts_with("fx-gradient-shift 5s"));
    }
}
