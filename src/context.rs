//! Runtime and template inputs that sit next to the effect state.

use serde::{Deserialize, Serialize};

/// Battery percentage under which power-hungry effects are dropped.
pub const LOW_BATTERY_PERCENT: f32 = 20.0;

/// Floor applied to the template corner radius by translucent surfaces.
pub const MIN_GLASS_RADIUS: f32 = 16.0;

// ============================================================================
// RuntimeContext
// ============================================================================

/// Last known pointer position over the surface.
///
/// Coordinates are normalized to the element box, `(0, 0)` top-left and
/// `(1, 1)` bottom-right. `previous_tilt` is the `(x, y)` rotation in degrees
/// reported by the previous update and is the starting point for smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub previous_tilt: (f32, f32),
}

impl Default for PointerSample {
    fn default() -> Self {
        Self::centered()
    }
}

impl PointerSample {
    /// A sample at `(x, y)`, normalized to the element box, with no prior tilt.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            previous_tilt: (0.0, 0.0),
        }
    }

    /// A sample at the center of the element.
    pub fn centered() -> Self {
        Self::new(0.5, 0.5)
    }

    /// Sets the tilt returned by the previous update, in degrees.
    pub fn with_previous_tilt(mut self, x: f32, y: f32) -> Self {
        self.previous_tilt = (x, y);
        self
    }
}

/// Where and how the surface is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeContext {
    pub is_mobile: bool,
    pub is_presenting: bool,
    pub reduced_motion: bool,
    /// Percent, `0..=100`. `None` when unknown or on mains power.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerSample>,
}

impl RuntimeContext {
    /// A desktop context with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the context as a mobile device.
    pub fn mobile(mut self) -> Self {
        self.is_mobile = true;
        self
    }

    /// Marks the surface as shown in a presentation.
    pub fn presenting(mut self) -> Self {
        self.is_presenting = true;
        self
    }

    /// Marks the user as preferring reduced motion.
    pub fn reduced_motion(mut self) -> Self {
        self.reduced_motion = true;
        self
    }

    /// Sets the battery level in percent.
    pub fn with_battery(mut self, percent: f32) -> Self {
        self.battery_level = Some(percent);
        self
    }

    /// Sets the current pointer sample.
    pub fn with_pointer(mut self, sample: PointerSample) -> Self {
        self.pointer = Some(sample);
        self
    }

    /// True when the battery level is known and below [`LOW_BATTERY_PERCENT`].
    pub fn is_low_battery(&self) -> bool {
        self.battery_level
            .is_some_and(|level| level.is_finite() && level < LOW_BATTERY_PERCENT)
    }
}

// ============================================================================
// SurfaceTemplate
// ============================================================================

/// Layout values declared by the card or slide template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceTemplate {
    /// Corner radius in pixels.
    pub corner_radius: f32,
    /// Resting box-shadow, used when no effect supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
}

impl Default for SurfaceTemplate {
    fn default() -> Self {
        Self {
            corner_radius: 12.0,
            box_shadow: None,
        }
    }
}

impl SurfaceTemplate {
    /// Sets the template's default box-shadow.
    pub fn with_box_shadow(mut self, shadow: impl Into<String>) -> Self {
        self.box_shadow = Some(shadow.into());
        self
    }

    /// Corner radius for translucent surfaces, never below [`MIN_GLASS_RADIUS`].
    pub fn glass_radius(&self) -> f32 {
        if self.corner_radius.is_finite() {
            self.corner_radius.max(MIN_GLASS_RADIUS)
        } else {
            MIN_GLASS_RADIUS
        }
    }
}
