//! Lift and shadow on hover.

use super::{lerp, EffectGenerator, GenerateContext, HoverLift, CARD, CARD_HOVER};
use crate::color::{black, rgba_string};
use crate::directive::{fmt_num, StyleDirective};
use crate::state::{EffectFamily, HoverConfig};

/// Vertical lift in pixels.
pub fn hover_lift(intensity: f32) -> f32 {
    lerp(2.0, 8.0, intensity)
}

/// Hover shadow. Dark surfaces need a denser shadow to read at all.
pub fn hover_shadow(intensity: f32, light_background: bool) -> String {
    let alpha = if light_background {
        lerp(0.1, 0.25, intensity)
    } else {
        lerp(0.3, 0.5, intensity)
    };
    format!(
        "0 {}px {}px {}",
        fmt_num(lerp(4.0, 16.0, intensity)),
        fmt_num(lerp(12.0, 40.0, intensity)),
        rgba_string(black(), alpha)
    )
}

impl EffectGenerator for HoverConfig {
    const FAMILY: EffectFamily = EffectFamily::Hover;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let lift = hover_lift(self.intensity);
        vec![
            StyleDirective::new(CARD, Self::FAMILY)
                .with("transition", "transform 0.3s ease, box-shadow 0.3s ease"),
            StyleDirective::new(CARD_HOVER, Self::FAMILY)
                .with("transform", format!("translateY(-{}px)", fmt_num(lift)))
                .with("box-shadow", hover_shadow(self.intensity, ctx.is_light())),
        ]
    }

    fn emit(&self, ctx: &mut GenerateContext) {
        ctx.set(HoverLift(hover_lift(self.intensity)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuntimeContext;
    use crate::effect::testing::{find, run};
    use crate::state::EffectState;

    #[test]
    fn lift_scales_with_intensity() {
        let mut state = EffectState::default();
        state.hover.enabled = true;

        state.hover.intensity = 0.0;
        let low = run(&state, &state.hover, &RuntimeContext::default());
        assert_eq!(find(&low, CARD_HOVER).get("transform"), Some("translateY(-2px)"));

        state.hover.intensity = 1.0;
        let high = run(&state, &state.hover, &RuntimeContext::default());
        assert_eq!(find(&high, CARD_HOVER).get("transform"), Some("translateY(-8px)"));
    }

    #[test]
    fn shadow_grows_with_intensity() {
        assert_eq!(hover_shadow(0.0, true), "0 4px 12px rgba(0, 0, 0, 0.1)");
        assert_eq!(hover_shadow(1.0, true), "0 16px 40px rgba(0, 0, 0, 0.25)");
        assert!(hover_shadow(0.5, false).ends_with("rgba(0, 0, 0, 0.4)"));
    }
}
