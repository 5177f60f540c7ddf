//! Color parsing, luminance and contrast helpers.
//!
//! Luminance here is a simplified perceptual heuristic: the Rec. 709 weights
//! (0.2126, 0.7152, 0.0722) applied directly to gamma-encoded sRGB channels.
//! It is used everywhere in the crate, including for contrast ratios, and is
//! not a certified WCAG computation.

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::directive::fmt_num;

/// An 8-bit sRGB color.
pub type Rgb = Srgb<u8>;

/// Contrast ratio required for normal-size text (AA).
pub const MIN_TEXT_CONTRAST: f32 = 4.5;

/// Upper bound on lightness adjustments in [`best_foreground_with_accent`].
pub const MAX_ADJUSTMENT_STEPS: u32 = 20;

/// HSL lightness change per adjustment step.
pub const ADJUSTMENT_STEP: f32 = 0.05;

/// Returns the color used when nothing can be parsed (mid-gray, `#808080`).
pub fn fallback_base() -> Rgb {
    Srgb::new(128, 128, 128)
}

/// Pure black.
pub fn black() -> Rgb {
    Srgb::new(0, 0, 0)
}

/// Pure white.
pub fn white() -> Rgb {
    Srgb::new(255, 255, 255)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a solid color.
///
/// Accepts `#rrggbb` and `rgb(r, g, b)` / `rgba(r, g, b, a)`. Anything else
/// (including composite values such as gradients) yields `None`.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex6(hex);
    }

    let lower = value.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let v: f32 = part.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v.clamp(0.0, 255.0).round() as u8;
    }
    Some(Srgb::new(channels[0], channels[1], channels[2]))
}

fn parse_hex6(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Srgb::new(r, g, b))
}

/// Finds the first `#` followed by six hex digits anywhere in `value`.
fn first_embedded_hex(value: &str) -> Option<Rgb> {
    let bytes = value.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'#')
        .find_map(|(i, _)| value.get(i + 1..i + 7).and_then(parse_hex6))
}

/// Extracts a representative solid color from a solid or composite value.
///
/// Solid values are parsed directly. Composite values (gradients and the like)
/// yield their first embedded `#rrggbb`. When neither works the result is
/// [`fallback_base`].
pub fn extract_base_color(value: &str) -> Rgb {
    parse_color(value)
        .or_else(|| first_embedded_hex(value))
        .unwrap_or_else(fallback_base)
}

// ============================================================================
// Luminance & Contrast
// ============================================================================

/// Perceptual luminance in `[0, 1]`.
pub fn relative_luminance(rgb: Rgb) -> f32 {
    (0.2126 * rgb.red as f32 + 0.7152 * rgb.green as f32 + 0.0722 * rgb.blue as f32) / 255.0
}

/// True when luminance is above one half.
pub fn is_light(rgb: Rgb) -> bool {
    relative_luminance(rgb) > 0.5
}

/// Contrast ratio between two colors, in `[1, 21]`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Picks pure black or pure white, whichever contrasts more with `background`.
pub fn best_foreground_for_rgb(background: Rgb) -> Rgb {
    if contrast_ratio(white(), background) > contrast_ratio(black(), background) {
        white()
    } else {
        black()
    }
}

/// Like [`best_foreground_for_rgb`] but accepts any palette background value.
///
/// ```
/// use lumen_fx::{best_foreground_for, to_hex};
///
/// assert_eq!(to_hex(best_foreground_for("#000000")), "#ffffff");
/// assert_eq!(to_hex(best_foreground_for("linear-gradient(#fafafa, #eeeeee)")), "#000000");
/// ```
pub fn best_foreground_for(background: &str) -> Rgb {
    best_foreground_for_rgb(extract_base_color(background))
}

/// Result of the accent contrast search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastPick {
    pub foreground: Rgb,
    pub ratio: f32,
    /// Number of lightness steps taken.
    pub steps: u32,
    pub meets_target: bool,
}

/// Adjusts `accent` until it reaches [`MIN_TEXT_CONTRAST`] against `background`.
///
/// Lightness moves toward whichever of black/white contrasts more with the
/// background, [`ADJUSTMENT_STEP`] at a time, for at most
/// [`MAX_ADJUSTMENT_STEPS`] steps. If the target is never met the candidate
/// with the best ratio seen is returned with `meets_target == false`.
pub fn best_foreground_with_accent(background: Rgb, accent: Rgb) -> ContrastPick {
    let initial = contrast_ratio(accent, background);
    let mut best = ContrastPick {
        foreground: accent,
        ratio: initial,
        steps: 0,
        meets_target: initial >= MIN_TEXT_CONTRAST,
    };
    if best.meets_target {
        return best;
    }

    let lighten = best_foreground_for_rgb(background) == white();
    let delta = if lighten { ADJUSTMENT_STEP } else { -ADJUSTMENT_STEP };
    let mut hsl: Hsl = to_unit(accent).into_color();

    for step in 1..=MAX_ADJUSTMENT_STEPS {
        hsl.lightness = (hsl.lightness + delta).clamp(0.0, 1.0);
        let candidate = from_unit(hsl.into_color());
        let ratio = contrast_ratio(candidate, background);
        if ratio > best.ratio {
            best = ContrastPick {
                foreground: candidate,
                ratio,
                steps: step,
                meets_target: ratio >= MIN_TEXT_CONTRAST,
            };
        }
        if best.meets_target || hsl.lightness <= 0.0 || hsl.lightness >= 1.0 {
            break;
        }
    }

    best
}

// ============================================================================
// Adjustments & Formatting
// ============================================================================

/// Shifts HSL lightness by `amount` (negative darkens).
pub fn shift_lightness(rgb: Rgb, amount: f32) -> Rgb {
    let mut hsl: Hsl = to_unit(rgb).into_color();
    hsl.lightness = (hsl.lightness + amount).clamp(0.0, 1.0);
    from_unit(hsl.into_color())
}

/// Formats as lowercase `#rrggbb`.
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Formats as `rgba(r, g, b, a)` with `alpha` clamped to `[0, 1]`.
pub fn rgba_string(rgb: Rgb, alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        rgb.red,
        rgb.green,
        rgb.blue,
        fmt_num(alpha.clamp(0.0, 1.0))
    )
}

fn to_unit(rgb: Rgb) -> Srgb {
    Srgb::new(
        rgb.red as f32 / 255.0,
        rgb.green as f32 / 255.0,
        rgb.blue as f32 / 255.0,
    )
}

fn from_unit(rgb: Srgb) -> Rgb {
    Srgb::new(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ============================================================================
// ColorPalette
// ============================================================================

/// Base colors of a card or slide template.
///
/// `background` may be a solid color or a composite such as a gradient; the
/// other entries are expected to be solid. Every accessor falls back to
/// [`extract_base_color`] semantics, so malformed values never fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPalette {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            text: "#1a1a1a".into(),
            primary: "#3b82f6".into(),
            secondary: "#8b5cf6".into(),
            accent: "#06b6d4".into(),
        }
    }
}

impl ColorPalette {
    /// Representative solid color of the background.
    pub fn base(&self) -> Rgb {
        extract_base_color(&self.background)
    }

    /// Solid color of the text entry.
    pub fn text_rgb(&self) -> Rgb {
        extract_base_color(&self.text)
    }

    /// Solid color of the primary entry.
    pub fn primary_rgb(&self) -> Rgb {
        extract_base_color(&self.primary)
    }

    /// Solid color of the secondary entry.
    pub fn secondary_rgb(&self) -> Rgb {
        extract_base_color(&self.secondary)
    }

    /// Solid color of the accent entry.
    pub fn accent_rgb(&self) -> Rgb {
        extract_base_color(&self.accent)
    }

    /// True when the background reads as light.
    pub fn is_light(&self) -> bool {
        is_light(self.base())
    }
}

// ============================================================================
// Tests
// ============================================================================
