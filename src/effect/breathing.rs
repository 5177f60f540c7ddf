//! Breathing animation: a slow scale and brightness oscillation.

use super::{lerp, EffectGenerator, GenerateContext, CARD};
use crate::directive::{fmt_num, secs, Keyframe, KeyframeSet, StyleDirective};
use crate::state::{EffectFamily, SubtleAnimationConfig};

pub const BREATHE_KEYFRAMES: &str = "fx-breathe";

/// Period in seconds: 6s at zero intensity down to 3s at full.
pub fn breathing_period(intensity: f32) -> f32 {
    lerp(6.0, 3.0, intensity)
}

fn frame(offset: f32, scale: f32, brightness: f32) -> Keyframe {
    Keyframe::at(offset)
        .with("transform", format!("scale({})", fmt_num(scale)))
        .with("filter", format!("brightness({})", fmt_num(brightness)))
}

impl EffectGenerator for SubtleAnimationConfig {
    const FAMILY: EffectFamily = EffectFamily::SubtleAnimation;

    fn generate(&self, _ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let i = self.intensity.clamp(0.0, 1.0);
        let scale = 0.03 * i;
        let brightness = 0.05 * i;

        let keyframes = KeyframeSet::new(
            BREATHE_KEYFRAMES,
            vec![
                frame(0.0, 1.0, 1.0),
                frame(0.25, 1.0 + scale, 1.0 + brightness),
                frame(0.75, 1.0 - scale, 1.0 - brightness),
                frame(1.0, 1.0, 1.0),
            ],
        );

        vec![
            StyleDirective::new(CARD, Self::FAMILY)
                .with(
                    "animation",
                    format!(
                        "{BREATHE_KEYFRAMES} {} ease-in-out infinite",
                        secs(breathing_period(i))
                    ),
                )
                .with("will-change", "transform, filter")
                .with_keyframes(keyframes),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuntimeContext;
    use crate::effect::testing::{find, run};
    use crate::state::EffectState;

    #[test]
    fn period_is_inverse_to_intensity() {
        assert_eq!(breathing_period(0.0), 6.0);
        assert_eq!(breathing_period(1.0), 3.0);
        assert!(breathing_period(0.3) > breathing_period(0.7));
    }

    #[test]
    fn amplitude_follows_intensity() {
        let mut state = EffectState::default();
        state.subtle_animations.enabled = true;
        state.subtle_animations.intensity = 1.0;

        let out = run(&state, &state.subtle_animations, &RuntimeContext::default());
        let card = find(&out, CARD);
        assert_eq!(card.get("animation"), Some("fx-breathe 3s ease-in-out infinite"));

        let frames = &card.keyframes[0].frames;
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1].properties["transform"], "scale(1.03)");
        assert_eq!(frames[1].properties["filter"], "brightness(1.05)");
        assert_eq!(frames[2].properties["transform"], "scale(0.97)");
        assert_eq!(frames[2].properties["filter"], "brightness(0.95)");
    }
}
