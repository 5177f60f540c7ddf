//! Serializers from structured directives to a target styling syntax.
//!
//! The core pipeline only produces [`StyleDirective`] records. A serializer
//! turns them into text for one rendering technology; [`CssSerializer`] is
//! the stock one.

use std::collections::HashSet;
use std::fmt::Write;

use crate::directive::{deg, fmt_num, pct, px, secs, Keyframe, ParticleDescriptor, StyleDirective};
use crate::effect::CARD;
use crate::state::EffectFamily;

/// Converts directives into a target syntax.
pub trait DirectiveSerializer {
    fn serialize(&self, directives: &[StyleDirective]) -> String;
}

// ============================================================================
// CSS
// ============================================================================

/// Writes CSS rules, with `@keyframes` blocks hoisted to the top.
///
/// Keyframe sets are emitted once per name, in first-appearance order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssSerializer {
    /// Single-line output without indentation.
    pub minify: bool,
}

impl CssSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minified() -> Self {
        Self { minify: true }
    }

    fn block(&self, out: &mut String, header: &str, properties: &[(&str, &str)], depth: usize) {
        let (open, close, sep, indent, inner) = if self.minify {
            ("{", "}", "", String::new(), String::new())
        } else {
            (" {\n", "}\n", "\n", "  ".repeat(depth), "  ".repeat(depth + 1))
        };
        // Writing to a String cannot fail.
        let _ = write!(out, "{indent}{header}{open}");
        for (property, value) in properties {
            let _ = write!(out, "{inner}{property}: {value};{sep}");
        }
        let _ = write!(out, "{indent}{close}");
    }

    fn frame(&self, out: &mut String, frame: &Keyframe) {
        let offset = pct(frame.offset * 100.0);
        let properties: Vec<(&str, &str)> = frame
            .properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.block(out, &offset, &properties, 1);
    }
}

impl DirectiveSerializer for CssSerializer {
    fn serialize(&self, directives: &[StyleDirective]) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        let newline = if self.minify { "" } else { "\n" };

        for set in directives.iter().flat_map(|d| &d.keyframes) {
            if !seen.insert(set.name.as_str()) {
                continue;
            }
            let _ = write!(out, "@keyframes {}{}", set.name, if self.minify { "{" } else { " {\n" });
            for frame in &set.frames {
                self.frame(&mut out, frame);
            }
            let _ = write!(out, "}}{newline}{newline}");
        }

        for directive in directives.iter().filter(|d| !d.properties.is_empty()) {
            let properties: Vec<(&str, &str)> = directive
                .properties
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            self.block(&mut out, &directive.selector, &properties, 0);
            out.push_str(newline);
        }

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        if !out.is_empty() && !self.minify {
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// Particles
// ============================================================================

/// Per-particle placement rules for hosts that render particles with CSS.
///
/// Particle `i` is addressed as `.fx-particle-i`; a link from `i` to `j` as
/// `.fx-particle-link-i-j`.
pub fn particle_directives(particles: &[ParticleDescriptor]) -> Vec<StyleDirective> {
    let mut out = Vec::with_capacity(particles.len());
    for p in particles {
        out.push(
            StyleDirective::new(format!("{CARD} .fx-particle-{}", p.index), EffectFamily::Particles)
                .with("left", pct(p.x))
                .with("top", pct(p.y))
                .with("width", px(p.size))
                .with("height", px(p.size))
                .with("opacity", fmt_num(p.opacity))
                .with("animation-duration", secs(p.duration))
                .with("animation-delay", secs(p.delay)),
        );
    }
    for p in particles {
        for link in p.connections.iter().flatten() {
            out.push(
                StyleDirective::new(
                    format!("{CARD} .fx-particle-link-{}-{}", p.index, link.to),
                    EffectFamily::Particles,
                )
                .with("left", pct(p.x))
                .with("top", pct(p.y))
                .with("width", pct(link.length))
                .with("transform", format!("rotate({})", deg(link.angle))),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{KeyframeSet, MotionProfile, ParticleLink, ParticleShape};

    fn sample() -> Vec<StyleDirective> {
        let breathe = KeyframeSet::new(
            "fx-breathe",
            vec![
                Keyframe::at(0.0).with("transform", "scale(1)"),
                Keyframe::at(0.5).with("transform", "scale(1.02)"),
            ],
        );
        vec![
            StyleDirective::new(".fx-card", EffectFamily::SubtleAnimation)
                .with("animation", "fx-breathe 4s ease-in-out infinite")
                .with_keyframes(breathe.clone()),
            StyleDirective::new(".fx-card:hover", EffectFamily::Hover)
                .with("transform", "translateY(-4px)")
                .with_keyframes(breathe),
        ]
    }

    #[test]
    fn css_hoists_and_dedupes_keyframes() {
        let css = CssSerializer::new().serialize(&sample());
        assert_eq!(css.matches("@keyframes fx-breathe").count(), 1, "{css}");
        assert!(css.starts_with("@keyframes fx-breathe {\n  0% {\n    transform: scale(1);\n  }\n"));
        assert!(css.contains("  50% {\n    transform: scale(1.02);\n  }\n"));
        assert!(css.contains(".fx-card {\n  animation: fx-breathe 4s ease-in-out infinite;\n}\n"));
        assert!(css.ends_with(".fx-card:hover {\n  transform: translateY(-4px);\n}\n"));
    }

    #[test]
    fn minified_css_is_one_line() {
        let css = CssSerializer::minified().serialize(&sample());
        assert!(!css.contains('\n'));
        assert!(css.contains(".fx-card:hover{transform: translateY(-4px);}"), "{css}");
        assert!(css.starts_with("@keyframes fx-breathe{0%{transform: scale(1);}"));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(CssSerializer::new().serialize(&[]), "");
    }

    #[test]
    fn particle_rules_place_each_particle() {
        let particles = vec![
            ParticleDescriptor {
                index: 0,
                x: 10.0,
                y: 20.0,
                size: 4.0,
                delay: 1.5,
                duration: 8.0,
                opacity: 0.6,
                motion: MotionProfile::Pulse,
                shape: ParticleShape::Circle,
                connections: Some(vec![ParticleLink {
                    to: 1,
                    length: 12.5,
                    angle: 45.0,
                }]),
            },
            ParticleDescriptor {
                index: 1,
                x: 30.0,
                y: 40.0,
                size: 3.0,
                delay: 0.0,
                duration: 9.0,
                opacity: 0.5,
                motion: MotionProfile::Pulse,
                shape: ParticleShape::Circle,
                connections: Some(vec![]),
            },
        ];
        let rules = particle_directives(&particles);
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].selector, ".fx-card .fx-particle-0");
        assert_eq!(rules[0].get("left"), Some("10%"));
        assert_eq!(rules[0].get("animation-delay"), Some("1.5s"));
        assert_eq!(rules[2].selector, ".fx-card .fx-particle-link-0-1");
        assert_eq!(rules[2].get("transform"), Some("rotate(45deg)"));
    }
}
