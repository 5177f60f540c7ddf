//! JavaScript bindings for live preview in web editors.
//!
//! This module provides [`EffectRenderer`], a wrapper around
//! [`EffectComposer`] exposed through wasm-bindgen. Inputs and outputs cross
//! the boundary as plain JS objects with camelCase keys.
//!
//! # Feature Flag
//!
//! This module is only available with the `wasm` feature enabled:
//!
//! ```toml
//! [dependencies]
//! lumen-fx = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { EffectRenderer } from 'lumen-fx';
//!
//! await init();
//!
//! const renderer = new EffectRenderer({ background: '#0f172a', accent: '#22d3ee' });
//! renderer.loadConfig({ glassmorphism: true, particles: true, particleCount: 24 });
//! renderer.setRuntime({ isMobile: true });
//!
//! styleElement.textContent = renderer.renderCss();
//! const { particles, validation } = renderer.render();
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::color::{best_foreground_for, to_hex, ColorPalette};
use crate::composer::{Configurable, EffectComposer};
use crate::context::{PointerSample, RuntimeContext, SurfaceTemplate};
use crate::profile::FlatConfig;

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid {}: {}", what, e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Failed to serialize output: {}", e)))
}

// ============================================================================
// EffectRenderer
// ============================================================================

/// A wrapper around [`EffectComposer`] for JavaScript hosts.
#[wasm_bindgen]
pub struct EffectRenderer {
    composer: EffectComposer,
}

#[wasm_bindgen]
impl EffectRenderer {
    /// Creates a renderer for a palette object. Missing entries use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(palette: JsValue) -> Result<EffectRenderer, JsError> {
        let palette: ColorPalette = if palette.is_undefined() || palette.is_null() {
            ColorPalette::default()
        } else {
            from_js(palette, "palette")?
        };
        Ok(Self {
            composer: EffectComposer::new(palette),
        })
    }

    // ---- Inputs ----

    /// Loads a flat configuration object.
    ///
    /// Structural errors name the offending field and leave the current
    /// configuration untouched.
    #[wasm_bindgen(js_name = "loadConfig")]
    pub fn load_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let value: serde_json::Value = from_js(config, "configuration")?;
        self.composer
            .load(&value)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "setPalette")]
    pub fn set_palette(&mut self, palette: JsValue) -> Result<(), JsError> {
        self.composer.palette = from_js(palette, "palette")?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setTemplate")]
    pub fn set_template(&mut self, template: JsValue) -> Result<(), JsError> {
        self.composer.template = from_js::<SurfaceTemplate>(template, "template")?;
        Ok(())
    }

    /// Sets the runtime context (`isMobile`, `isPresenting`, `reducedMotion`,
    /// `batteryLevel`, `pointer`).
    #[wasm_bindgen(js_name = "setRuntime")]
    pub fn set_runtime(&mut self, runtime: JsValue) -> Result<(), JsError> {
        let runtime: RuntimeContext = from_js(runtime, "runtime context")?;
        self.composer.set_runtime(runtime);
        Ok(())
    }

    /// Changes the particle seed.
    pub fn reseed(&mut self, seed: u64) {
        self.composer.reseed(seed);
    }

    // ---- Rendering ----

    /// Returns the full bundle: directives, particles, transition, validation.
    pub fn render(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.composer.render())
    }

    /// Returns the directives as CSS text.
    #[wasm_bindgen(js_name = "renderCss")]
    pub fn render_css(&mut self) -> String {
        self.composer.render().to_css()
    }

    /// Computes one pointer update, or `undefined` when tracking is off.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Pointer position normalized to the element box
    /// * `prev_tilt_x`, `prev_tilt_y` - Tilt returned by the previous update
    #[wasm_bindgen(js_name = "pointerResponse")]
    pub fn pointer_response(
        &self,
        x: f32,
        y: f32,
        prev_tilt_x: f32,
        prev_tilt_y: f32,
    ) -> Result<JsValue, JsError> {
        let sample = PointerSample::new(x, y).with_previous_tilt(prev_tilt_x, prev_tilt_y);
        match self.composer.pointer_response(&sample) {
            Some(response) => to_js(&response),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    // ---- Profile Import/Export ----

    /// Exports the current settings as a JSON string.
    #[wasm_bindgen(js_name = "exportProfileJson")]
    pub fn export_profile_json(&self) -> Result<String, JsError> {
        self.composer
            .export_profile()
            .to_json()
            .map_err(|e| JsError::new(&format!("Failed to serialize profile: {}", e)))
    }

    /// Imports settings from a JSON string.
    #[wasm_bindgen(js_name = "importProfileJson")]
    pub fn import_profile_json(&mut self, json: &str) -> Result<(), JsError> {
        let profile = FlatConfig::from_json(json)
            .map_err(|e| JsError::new(&format!("Failed to parse profile: {}", e)))?;
        self.composer.apply_profile(&profile);
        Ok(())
    }

    /// Disables every effect.
    pub fn reset(&mut self) {
        self.composer.apply_profile(&FlatConfig::new());
    }

    /// Clears the render cache to free memory.
    #[wasm_bindgen(js_name = "clearCache")]
    pub fn clear_cache(&mut self) {
        self.composer.clear_cache();
    }
}

/// Black or white, whichever reads better on `background`, as `#rrggbb`.
#[wasm_bindgen(js_name = "bestForegroundFor")]
pub fn best_foreground_for_js(background: &str) -> String {
    to_hex(best_foreground_for(background))
}
