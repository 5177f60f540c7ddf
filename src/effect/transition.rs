//! Slide transitions.
//!
//! Every type defines an enter and an exit keyframe sequence. Direction
//! decides where the incoming slide comes from: it travels along
//! [`Direction::vector`], so it starts on the opposite side.

use super::{lerp, EffectGenerator, GenerateContext};
use crate::directive::{fmt_num, Keyframe, KeyframeSet, StyleDirective, TransitionDescriptor};
use crate::state::{Direction, EffectFamily, TransitionConfig, TransitionType};

pub const ENTER_SELECTOR: &str = ".fx-slide-enter";
pub const EXIT_SELECTOR: &str = ".fx-slide-exit";
pub const STAGE_SELECTOR: &str = ".fx-slide-stage";

pub const ENTER_KEYFRAMES: &str = "fx-slide-enter";
pub const EXIT_KEYFRAMES: &str = "fx-slide-exit";

fn translate(dx: f32, dy: f32, percent: f32) -> String {
    format!(
        "translate({}%, {}%)",
        fmt_num(dx * percent),
        fmt_num(dy * percent)
    )
}

/// Rotation axis and sign that turn the slide along the travel direction.
fn turn(direction: Direction, degrees: f32) -> String {
    let (dx, dy) = direction.vector();
    if direction.is_horizontal() {
        format!("rotateY({}deg)", fmt_num(dx * degrees))
    } else {
        format!("rotateX({}deg)", fmt_num(-dy * degrees))
    }
}

fn fade(from: f32, to: f32) -> Vec<Keyframe> {
    vec![
        Keyframe::at(0.0).with("opacity", fmt_num(from)),
        Keyframe::at(1.0).with("opacity", fmt_num(to)),
    ]
}

/// Enter and exit keyframes for a transition type.
///
/// `intensity` scales the amplitude of scale and blur based types.
pub fn transition_keyframes(
    kind: TransitionType,
    direction: Direction,
    intensity: f32,
) -> (Vec<Keyframe>, Vec<Keyframe>) {
    let (dx, dy) = direction.vector();
    let zoom = lerp(0.1, 0.3, intensity);

    match kind {
        TransitionType::Fade => (fade(0.0, 1.0), fade(1.0, 0.0)),
        TransitionType::Slide => (
            vec![
                Keyframe::at(0.0).with("transform", translate(-dx, -dy, 100.0)),
                Keyframe::at(1.0).with("transform", "translate(0%, 0%)"),
            ],
            vec![
                Keyframe::at(0.0).with("transform", "translate(0%, 0%)"),
                Keyframe::at(1.0).with("transform", translate(dx, dy, 100.0)),
            ],
        ),
        TransitionType::Zoom => (
            vec![
                Keyframe::at(0.0)
                    .with("transform", format!("scale({})", fmt_num(1.0 - zoom)))
                    .with("opacity", "0"),
                Keyframe::at(1.0).with("transform", "scale(1)").with("opacity", "1"),
            ],
            vec![
                Keyframe::at(0.0).with("transform", "scale(1)").with("opacity", "1"),
                Keyframe::at(1.0)
                    .with("transform", format!("scale({})", fmt_num(1.0 + zoom)))
                    .with("opacity", "0"),
            ],
        ),
        TransitionType::Flip => (
            vec![
                Keyframe::at(0.0).with("transform", turn(direction, -90.0)).with("opacity", "0"),
                Keyframe::at(1.0).with("transform", turn(direction, 0.0)).with("opacity", "1"),
            ],
            vec![
                Keyframe::at(0.0).with("transform", turn(direction, 0.0)).with("opacity", "1"),
                Keyframe::at(1.0).with("transform", turn(direction, 90.0)).with("opacity", "0"),
            ],
        ),
        TransitionType::GlassShatter => {
            let blur = lerp(6.0, 16.0, intensity);
            (
                vec![
                    Keyframe::at(0.0)
                        .with("filter", format!("blur({}px)", fmt_num(blur)))
                        .with("opacity", "0"),
                    Keyframe::at(1.0).with("filter", "blur(0px)").with("opacity", "1"),
                ],
                vec![
                    Keyframe::at(0.0)
                        .with("transform", "scale(1)")
                        .with("filter", "blur(0px)")
                        .with("opacity", "1"),
                    Keyframe::at(0.6)
                        .with("transform", "scale(1.05)")
                        .with("filter", format!("blur({}px)", fmt_num(blur / 3.0)))
                        .with("opacity", "0.6"),
                    Keyframe::at(1.0)
                        .with("transform", format!("scale({})", fmt_num(1.0 + zoom)))
                        .with("filter", format!("blur({}px)", fmt_num(blur)))
                        .with("opacity", "0"),
                ],
            )
        }
        TransitionType::ParticleDissolve => {
            let frames = |from: f32, to: f32| {
                let blur = |o: f32| {
                    format!(
                        "blur({}px) contrast({})",
                        fmt_num(8.0 * (1.0 - o)),
                        fmt_num(1.0 + 0.5 * (1.0 - o))
                    )
                };
                vec![
                    Keyframe::at(0.0).with("filter", blur(from)).with("opacity", fmt_num(from)),
                    Keyframe::at(0.5)
                        .with("filter", "blur(2px) contrast(1.5)")
                        .with("opacity", "0.6"),
                    Keyframe::at(1.0).with("filter", blur(to)).with("opacity", fmt_num(to)),
                ]
            };
            (frames(0.0, 1.0), frames(1.0, 0.0))
        }
        TransitionType::WaveMorph => {
            let origin = format!(
                "{}% {}%",
                fmt_num(50.0 - 50.0 * dx),
                fmt_num(50.0 - 50.0 * dy)
            );
            (
                vec![
                    Keyframe::at(0.0).with("clip-path", format!("circle(0% at {origin})")),
                    Keyframe::at(1.0).with("clip-path", format!("circle(150% at {origin})")),
                ],
                vec![
                    Keyframe::at(0.0).with("transform", "skew(0deg, 0deg)").with("opacity", "1"),
                    Keyframe::at(0.5)
                        .with(
                            "transform",
                            format!("skew({}deg, {}deg)", fmt_num(6.0 * dx), fmt_num(6.0 * dy)),
                        )
                        .with("opacity", "0.5"),
                    Keyframe::at(1.0)
                        .with("transform", translate(dx, dy, 30.0))
                        .with("opacity", "0"),
                ],
            )
        }
        TransitionType::ConstellationConnect => (
            vec![
                Keyframe::at(0.0)
                    .with("transform", "scale(0.95)")
                    .with("filter", "brightness(2)")
                    .with("opacity", "0"),
                Keyframe::at(0.5).with("filter", "brightness(1.4)").with("opacity", "0.7"),
                Keyframe::at(1.0)
                    .with("transform", "scale(1)")
                    .with("filter", "brightness(1)")
                    .with("opacity", "1"),
            ],
            vec![
                Keyframe::at(0.0)
                    .with("transform", "scale(1)")
                    .with("filter", "brightness(1)")
                    .with("opacity", "1"),
                Keyframe::at(0.5).with("filter", "brightness(1.4)").with("opacity", "0.7"),
                Keyframe::at(1.0)
                    .with("transform", "scale(1.05)")
                    .with("filter", "brightness(2)")
                    .with("opacity", "0"),
            ],
        ),
        TransitionType::Holographic => (
            vec![
                Keyframe::at(0.0)
                    .with("transform", turn(direction, -30.0))
                    .with("filter", "hue-rotate(90deg)")
                    .with("opacity", "0"),
                Keyframe::at(1.0)
                    .with("transform", turn(direction, 0.0))
                    .with("filter", "hue-rotate(0deg)")
                    .with("opacity", "1"),
            ],
            vec![
                Keyframe::at(0.0)
                    .with("transform", turn(direction, 0.0))
                    .with("filter", "hue-rotate(0deg)")
                    .with("opacity", "1"),
                Keyframe::at(1.0)
                    .with("transform", turn(direction, 30.0))
                    .with("filter", "hue-rotate(-90deg)")
                    .with("opacity", "0"),
            ],
        ),
        TransitionType::Cube => {
            let (near, far) = match direction {
                Direction::Left => ("right center", "left center"),
                Direction::Right => ("left center", "right center"),
                Direction::Up => ("center bottom", "center top"),
                Direction::Down => ("center top", "center bottom"),
            };
            (
                vec![
                    Keyframe::at(0.0)
                        .with("transform-origin", near)
                        .with("transform", turn(direction, -90.0)),
                    Keyframe::at(1.0)
                        .with("transform-origin", near)
                        .with("transform", turn(direction, 0.0)),
                ],
                vec![
                    Keyframe::at(0.0)
                        .with("transform-origin", far)
                        .with("transform", turn(direction, 0.0)),
                    Keyframe::at(1.0)
                        .with("transform-origin", far)
                        .with("transform", turn(direction, 90.0)),
                ],
            )
        }
        TransitionType::Coverflow => (
            vec![
                Keyframe::at(0.0)
                    .with(
                        "transform",
                        format!("{} {} scale(0.8)", translate(-dx, -dy, 60.0), turn(direction, 45.0)),
                    )
                    .with("opacity", "0.5"),
                Keyframe::at(1.0)
                    .with("transform", format!("translate(0%, 0%) {} scale(1)", turn(direction, 0.0)))
                    .with("opacity", "1"),
            ],
            vec![
                Keyframe::at(0.0)
                    .with("transform", format!("translate(0%, 0%) {} scale(1)", turn(direction, 0.0)))
                    .with("opacity", "1"),
                Keyframe::at(1.0)
                    .with(
                        "transform",
                        format!("{} {} scale(0.8)", translate(dx, dy, 60.0), turn(direction, -45.0)),
                    )
                    .with("opacity", "0.5"),
            ],
        ),
    }
}

/// Builds the transition descriptor for a config.
pub fn transition_descriptor(config: &TransitionConfig) -> TransitionDescriptor {
    let direction = config.direction.value;
    let (enter_keyframes, exit_keyframes) =
        transition_keyframes(config.kind.value, direction, config.intensity);
    TransitionDescriptor {
        kind: config.kind.value,
        duration_ms: config.duration_ms,
        easing: config.easing.value,
        direction,
        enter_keyframes,
        exit_keyframes,
    }
}

impl EffectGenerator for TransitionConfig {
    const FAMILY: EffectFamily = EffectFamily::Transition;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let descriptor = transition_descriptor(self);
        let timing = descriptor.easing.timing_function();
        let animation = |name: &str| {
            format!("{name} {}ms {timing} both", descriptor.duration_ms)
        };

        let mut out = Vec::new();
        if descriptor.kind.is_3d() || descriptor.kind == TransitionType::Flip {
            out.push(
                StyleDirective::new(STAGE_SELECTOR, Self::FAMILY)
                    .with("perspective", "1200px")
                    .with("transform-style", "preserve-3d"),
            );
        }
        out.push(
            StyleDirective::new(ENTER_SELECTOR, Self::FAMILY)
                .with("animation", animation(ENTER_KEYFRAMES))
                .with("backface-visibility", "hidden")
                .with_keyframes(KeyframeSet::new(
                    ENTER_KEYFRAMES,
                    descriptor.enter_keyframes.clone(),
                )),
        );
        out.push(
            StyleDirective::new(EXIT_SELECTOR, Self::FAMILY)
                .with("animation", animation(EXIT_KEYFRAMES))
                .with("backface-visibility", "hidden")
                .with_keyframes(KeyframeSet::new(EXIT_KEYFRAMES, descriptor.exit_keyframes.clone())),
        );

        ctx.set_transition(descriptor);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Choice;

    fn config(kind: TransitionType, direction: Direction) -> TransitionConfig {
        let mut config = TransitionConfig::default();
        config.enabled = true;
        config.kind.force(kind);
        config.direction.force(direction);
        config
    }

    #[test]
    fn every_type_has_enter_and_exit() {
        for kind in TransitionType::ALL {
            for direction in Direction::ALL {
                let (enter, exit) = transition_keyframes(*kind, *direction, 0.5);
                assert!(enter.len() >= 2, "{kind:?} enter");
                assert!(exit.len() >= 2, "{kind:?} exit");
                assert_eq!(enter.first().map(|f| f.offset), Some(0.0));
                assert_eq!(exit.last().map(|f| f.offset), Some(1.0));
            }
        }
    }

    #[test]
    fn slide_enters_from_opposite_side() {
        let (enter, exit) = transition_keyframes(TransitionType::Slide, Direction::Right, 0.5);
        assert_eq!(enter[0].properties["transform"], "translate(-100%, 0%)");
        assert_eq!(exit[1].properties["transform"], "translate(100%, 0%)");

        let (enter, _) = transition_keyframes(TransitionType::Slide, Direction::Up, 0.5);
        assert_eq!(enter[0].properties["transform"], "translate(0%, 100%)");
    }

    #[test]
    fn descriptor_carries_parameters() {
        let mut c = config(TransitionType::Cube, Direction::Left);
        c.duration_ms = 900;
        c.easing.force(crate::state::Easing::Spring);
        let d = transition_descriptor(&c);
        assert_eq!(d.kind, TransitionType::Cube);
        assert_eq!(d.duration_ms, 900);
        assert_eq!(d.direction, Direction::Left);
        assert_eq!(d.enter_keyframes[0].properties["transform-origin"], "right center");
    }

    #[test]
    fn generator_sets_descriptor_and_directives() {
        use crate::color::ColorPalette;
        use crate::context::{RuntimeContext, SurfaceTemplate};
        use crate::effect::generate_all;
        use crate::state::EffectState;

        let mut state = EffectState::default();
        state.transitions = config(TransitionType::Fade, Direction::Right);
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let runtime = RuntimeContext::default();
        let out = generate_all(GenerateContext::new(&state, &palette, &template, &runtime, 0));

        let transition = out.transition.expect("transition descriptor");
        assert_eq!(transition.kind, TransitionType::Fade);
        let enter = out
            .directives
            .iter()
            .find(|d| d.selector == ENTER_SELECTOR)
            .unwrap();
        assert_eq!(enter.get("animation"), Some("fx-slide-enter 600ms ease-in-out both"));
        assert!(!out.directives.iter().any(|d| d.selector == STAGE_SELECTOR));
    }
}
