//! Translucent frosted surface.
//!
//! # Emitted Properties
//!
//! - [`GlassSurface`]: resolved corner radius and background alpha.

use super::{lerp, EffectGenerator, GenerateContext, GlassSurface, CARD};
use crate::color::{black, rgba_string, white};
use crate::directive::{fmt_num, px, StyleDirective};
use crate::state::{EffectFamily, GlassConfig};

/// Background alpha at full intensity.
pub const MAX_GLASS_ALPHA: f32 = 0.5;

/// Background alpha, proportional to intensity.
pub fn glass_alpha(intensity: f32) -> f32 {
    MAX_GLASS_ALPHA * intensity.clamp(0.0, 1.0)
}

/// Resting shadow of a glass surface.
pub fn glass_shadow(intensity: f32) -> String {
    format!(
        "0 8px 32px {}",
        rgba_string(black(), lerp(0.08, 0.2, intensity))
    )
}

impl EffectGenerator for GlassConfig {
    const FAMILY: EffectFamily = EffectFamily::Glass;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let i = self.intensity;
        let base = ctx.palette.base();
        let light = ctx.is_light();

        // Top-light sheen first, glint second; both sit above the fill color.
        let sheen = format!(
            "linear-gradient(180deg, {} 0%, {} 60%)",
            rgba_string(white(), lerp(0.08, 0.25, i)),
            rgba_string(white(), 0.0)
        );
        let glint = format!(
            "radial-gradient(circle at 20% 15%, {} 0%, {} 40%)",
            rgba_string(white(), lerp(0.1, 0.35, i)),
            rgba_string(white(), 0.0)
        );
        let backdrop = format!(
            "blur({}) saturate({})",
            px(lerp(8.0, 20.0, i)),
            fmt_num(lerp(1.1, 1.8, i))
        );
        let border_alpha = if light {
            lerp(0.25, 0.5, i)
        } else {
            lerp(0.08, 0.2, i)
        };

        vec![
            StyleDirective::new(CARD, Self::FAMILY)
                .with("background-color", rgba_string(base, glass_alpha(i)))
                .with("background-image", format!("{sheen}, {glint}"))
                .with("backdrop-filter", backdrop.clone())
                .with("-webkit-backdrop-filter", backdrop)
                .with("border", format!("1px solid {}", rgba_string(white(), border_alpha)))
                .with("border-radius", px(ctx.template.glass_radius()))
                .with("box-shadow", glass_shadow(i)),
        ]
    }

    fn emit(&self, ctx: &mut GenerateContext) {
        let surface = GlassSurface {
            radius: ctx.template.glass_radius(),
            alpha: glass_alpha(self.intensity),
        };
        ctx.set(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuntimeContext;
    use crate::effect::testing::{find, run};
    use crate::state::EffectState;

    fn glass_state(intensity: f32) -> EffectState {
        let mut state = EffectState::default();
        state.glassmorphism.enabled = true;
        state.glassmorphism.intensity = intensity;
        state
    }

    #[test]
    fn alpha_is_proportional_to_intensity() {
        assert_eq!(glass_alpha(0.0), 0.0);
        assert_eq!(glass_alpha(0.5), 0.25);
        assert_eq!(glass_alpha(1.0), MAX_GLASS_ALPHA);
    }

    #[test]
    fn uses_base_color_of_palette() {
        let state = glass_state(0.5);
        let out = run(&state, &state.glassmorphism, &RuntimeContext::default());
        let card = find(&out, CARD);
        // Default palette background is white.
        assert_eq!(card.get("background-color"), Some("rgba(255, 255, 255, 0.25)"));
        assert_eq!(card.get("border-radius"), Some("16px"));
    }

    #[test]
    fn has_sheen_and_glint_layers() {
        let state = glass_state(1.0);
        let out = run(&state, &state.glassmorphism, &RuntimeContext::default());
        let image = find(&out, CARD).get("background-image").unwrap();
        assert!(image.starts_with("linear-gradient(180deg"));
        assert!(image.contains("radial-gradient(circle at 20% 15%"));
    }

    #[test]
    fn disabled_generates_nothing() {
        let state = EffectState::default();
        assert!(run(&state, &state.glassmorphism, &RuntimeContext::default()).is_empty());
    }
}
