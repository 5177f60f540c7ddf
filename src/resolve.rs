//! Combination resolver.
//!
//! Generators write their directives independently, so several of them may
//! target the same selector and property. The resolver applies a fixed
//! precedence table and then merges directives per selector:
//!
//! 1. Hover beats the breathing animation on `transform` while hovered: the
//!    hover transform is marked `!important` and the breathing animation is
//!    paused on hover. Pointer tilt is composed into both instead of being
//!    replaced by either.
//! 2. Patterns under glass become extra background layers below the glass
//!    layers, blended with `multiply` on light backgrounds and `screen` on
//!    dark ones, instead of replacing the glass background.
//! 3. Box-shadow: hover+glass combined > hover only > glass only > template
//!    default.
//! 4. Particles alongside more than two other effects are capped at
//!    [`PARTICLE_SOFT_CAP`] before generation (see [`particle_soft_cap`]).
//!
//! Everything else is merged generically: list-valued properties are joined,
//! transform-like properties are composed, and scalar properties keep the
//! last value.

use std::collections::HashMap;

use crate::color::ColorPalette;
use crate::context::SurfaceTemplate;
use crate::directive::StyleDirective;
use crate::effect::breathing::BREATHE_KEYFRAMES;
use crate::effect::glass::glass_shadow;
use crate::effect::pattern::PATTERN_KEYFRAMES;
use crate::effect::{CARD, CARD_HOVER};
use crate::state::{EffectFamily, EffectState};

/// Particle count ceiling when more than two other effects are active.
pub const PARTICLE_SOFT_CAP: u32 = 20;

/// Rule 4: the particle ceiling to apply before generation, if any.
pub fn particle_soft_cap(state: &EffectState) -> Option<u32> {
    (state.particles.enabled && state.active_besides_particles() > 2).then_some(PARTICLE_SOFT_CAP)
}

// ============================================================================
// Value Helpers
// ============================================================================

/// Splits a comma-separated list at top-level commas only.
///
/// Commas inside parentheses (`rgba(...)`, `url(...)`) do not split.
pub fn split_layers(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = value[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

fn repeat_layers(value: &str, count: usize) -> Vec<String> {
    vec![value.to_string(); count]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    /// Comma-separated list; order is layer order.
    Comma,
    /// Comma-separated set; repeated entries are dropped.
    CommaSet,
    /// Space-separated function list, composed left to right.
    Space,
    /// Scalar; the later value wins.
    Replace,
}

fn join_rule(property: &str) -> Join {
    match property {
        "background-image" | "background-size" | "background-position"
        | "background-blend-mode" | "animation" | "box-shadow" | "text-shadow"
        | "transition" => Join::Comma,
        "will-change" => Join::CommaSet,
        "transform" | "filter" | "backdrop-filter" | "-webkit-backdrop-filter" => Join::Space,
        _ => Join::Replace,
    }
}

fn join_values(selector: &str, property: &str, existing: &str, incoming: &str) -> String {
    if existing == incoming {
        return existing.to_string();
    }
    match join_rule(property) {
        Join::Comma => format!("{existing}, {incoming}"),
        Join::CommaSet => {
            let mut entries: Vec<&str> = split_layers(existing);
            for entry in split_layers(incoming) {
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
            entries.join(", ")
        }
        Join::Space => format!("{existing} {incoming}"),
        Join::Replace => {
            tracing::trace!(selector, property, existing, incoming, "last value wins");
            incoming.to_string()
        }
    }
}

// ============================================================================
// Generic Merge
// ============================================================================

/// Merges directives that share a selector, in first-appearance order.
///
/// Identical values collapse to one, keyframe sets are deduplicated by name,
/// and empty directives are dropped.
pub fn merge(directives: Vec<StyleDirective>) -> Vec<StyleDirective> {
    let mut merged: Vec<StyleDirective> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for directive in directives {
        if directive.is_empty() {
            continue;
        }
        match index.get(&directive.selector) {
            Some(&i) => merge_into(&mut merged[i], directive),
            None => {
                index.insert(directive.selector.clone(), merged.len());
                merged.push(directive);
            }
        }
    }
    merged
}

fn merge_into(target: &mut StyleDirective, incoming: StyleDirective) {
    if target.origin != incoming.origin {
        target.origin = EffectFamily::Resolver;
    }
    for (property, value) in incoming.properties {
        let joined = match target.properties.get(&property) {
            Some(existing) => join_values(&target.selector, &property, existing, &value),
            None => value,
        };
        target.properties.insert(property, joined);
    }
    for set in incoming.keyframes {
        match target.keyframes.iter_mut().find(|k| k.name == set.name) {
            Some(existing) if *existing == set => {}
            Some(existing) => {
                tracing::trace!(name = %set.name, "keyframes replaced");
                *existing = set;
            }
            None => target.keyframes.push(set),
        }
    }
}

// ============================================================================
// Precedence Rules
// ============================================================================

fn position_of(directives: &[StyleDirective], origin: EffectFamily, selector: &str) -> Option<usize> {
    directives
        .iter()
        .position(|d| d.origin == origin && d.selector == selector)
}

/// Rule 2: pattern layers go under the glass layers.
fn layer_patterns_under_glass(directives: &mut [StyleDirective], light: bool) {
    let (Some(glass), Some(pattern)) = (
        position_of(directives, EffectFamily::Glass, CARD),
        position_of(directives, EffectFamily::BackgroundPattern, CARD),
    ) else {
        return;
    };

    let glass_image = directives[glass].get("background-image").unwrap_or_default().to_string();
    let glass_layers = split_layers(&glass_image).len();
    let blend = if light { "multiply" } else { "screen" };

    let pattern_dir = &mut directives[pattern];
    let pattern_image = pattern_dir.properties.remove("background-image").unwrap_or_default();
    let pattern_size = pattern_dir.properties.remove("background-size").unwrap_or_default();
    let pattern_position = pattern_dir.properties.remove("background-position").unwrap_or_default();
    let pattern_layers = split_layers(&pattern_image).len();

    let glass_positions = repeat_layers("0 0", glass_layers).join(", ");
    for set in pattern_dir.keyframes.iter_mut().filter(|k| k.name == PATTERN_KEYFRAMES) {
        for frame in &mut set.frames {
            if let Some(position) = frame.properties.get_mut("background-position") {
                *position = format!("{glass_positions}, {position}");
            }
        }
    }

    let layered = |glass_value: String, pattern_value: String| {
        [glass_value, pattern_value]
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut blend_modes = repeat_layers("normal", glass_layers);
    blend_modes.extend(repeat_layers(blend, pattern_layers));

    let glass_dir = &mut directives[glass];
    glass_dir.set("background-image", layered(glass_image, pattern_image));
    glass_dir.set(
        "background-size",
        layered(repeat_layers("100% 100%", glass_layers).join(", "), pattern_size),
    );
    glass_dir.set("background-position", layered(glass_positions, pattern_position));
    glass_dir.set("background-blend-mode", blend_modes.join(", "));

    tracing::debug!(glass_layers, pattern_layers, blend, "patterns layered under glass");
}

/// Rule 3: box-shadow precedence.
fn compose_box_shadow(
    directives: &mut Vec<StyleDirective>,
    state: &EffectState,
    template: &SurfaceTemplate,
) {
    let hover = position_of(directives, EffectFamily::Hover, CARD_HOVER)
        .filter(|&i| directives[i].get("box-shadow").is_some());
    let glass = position_of(directives, EffectFamily::Glass, CARD)
        .filter(|&i| directives[i].get("box-shadow").is_some());

    match (hover, glass) {
        (Some(hover), Some(_)) => {
            let stronger = glass_shadow((state.glassmorphism.intensity + 0.3).min(1.0));
            let hover_dir = &mut directives[hover];
            let combined = format!(
                "{}, {stronger}, inset 0 1px 0 rgba(255, 255, 255, 0.25)",
                hover_dir.get("box-shadow").unwrap_or_default()
            );
            hover_dir.set("box-shadow", combined);
        }
        (Some(_), None) => {
            if let Some(shadow) = &template.box_shadow {
                directives.push(
                    StyleDirective::new(CARD, EffectFamily::Resolver).with("box-shadow", shadow.clone()),
                );
            }
        }
        (None, Some(_)) | (None, None) => {}
    }
}

/// Composes the pointer tilt into the hover transform and the breathing
/// keyframes, which would otherwise replace it.
fn compose_tilt(directives: &mut [StyleDirective]) {
    let Some(tilt) = position_of(directives, EffectFamily::PointerTracking, CARD)
        .and_then(|i| directives[i].get("transform").map(str::to_string))
    else {
        return;
    };

    if let Some(hover) = position_of(directives, EffectFamily::Hover, CARD_HOVER) {
        if let Some(lift) = directives[hover].get("transform").map(str::to_string) {
            directives[hover].set("transform", format!("{tilt} {lift}"));
        }
    }

    if let Some(breathe) = position_of(directives, EffectFamily::SubtleAnimation, CARD) {
        for set in directives[breathe]
            .keyframes
            .iter_mut()
            .filter(|k| k.name == BREATHE_KEYFRAMES)
        {
            for frame in &mut set.frames {
                if let Some(transform) = frame.properties.get_mut("transform") {
                    *transform = format!("{tilt} {transform}");
                }
            }
        }
    }
}

/// Rule 1, after merging: hover wins `transform`, breathing pauses on hover.
fn hover_over_animation(directives: &mut [StyleDirective], state: &EffectState) {
    if !(state.hover.enabled && state.subtle_animations.enabled) {
        return;
    }

    let play_state = directives
        .iter()
        .find(|d| d.selector == CARD)
        .and_then(|d| d.get("animation"))
        .map(|animation| {
            split_layers(animation)
                .iter()
                .map(|entry| {
                    if entry.starts_with(BREATHE_KEYFRAMES) {
                        "paused"
                    } else {
                        "running"
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        });

    let Some(hover) = directives.iter_mut().find(|d| d.selector == CARD_HOVER) else {
        return;
    };
    if let Some(transform) = hover.get("transform") {
        if !transform.ends_with("!important") {
            let important = format!("{transform} !important");
            hover.set("transform", important);
        }
    }
    if let Some(play_state) = play_state {
        hover.set("animation-play-state", play_state);
    }
}

// ============================================================================
// Resolve
// ============================================================================

/// Applies the precedence rules and merges directives per selector.
pub fn resolve(
    mut directives: Vec<StyleDirective>,
    state: &EffectState,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
) -> Vec<StyleDirective> {
    let generated = directives.len();

    layer_patterns_under_glass(&mut directives, palette.is_light());
    compose_box_shadow(&mut directives, state, template);
    compose_tilt(&mut directives);

    let mut merged = merge(directives);
    hover_over_animation(&mut merged, state);

    tracing::debug!(generated, resolved = merged.len(), "directives resolved");
    merged
}

// ============================================================================
// Tests
// ============================================================================
