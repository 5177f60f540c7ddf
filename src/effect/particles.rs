//! Particle fields.
//!
//! Placement comes from the context's seeded generator, so a given seed
//! always yields the same descriptors. The particle type picks a motion
//! profile and a shape:
//!
//! | type          | motion        | shape    |
//! |---------------|---------------|----------|
//! | floating      | vertical bob  | circle   |
//! | constellation | pulse + links | circle   |
//! | professional  | rising pulse  | square   |
//! | creative      | swirl         | triangle |

use rand::Rng;

use super::{lerp, within, EffectGenerator, GenerateContext, ParticleBudget, CARD};
use crate::color::{best_foreground_with_accent, rgba_string};
use crate::directive::{
    fmt_num, px, Keyframe, KeyframeSet, MotionProfile, ParticleDescriptor, ParticleLink,
    ParticleShape, StyleDirective,
};
use crate::state::{EffectFamily, EffectState, ParticleConfig, ParticleType};

/// Motion profile and shape for a particle type.
pub fn particle_profile(kind: ParticleType) -> (MotionProfile, ParticleShape) {
    match kind {
        ParticleType::Floating => (MotionProfile::Bob, ParticleShape::Circle),
        ParticleType::Constellation => (MotionProfile::Pulse, ParticleShape::Circle),
        ParticleType::Professional => (MotionProfile::RisingPulse, ParticleShape::Square),
        ParticleType::Creative => (MotionProfile::Swirl, ParticleShape::Triangle),
    }
}

/// True when patterns are the only other active effect, in which case
/// particles render as a sparse background texture.
pub fn is_background_only(state: &EffectState) -> bool {
    state.particles.enabled
        && state.background_patterns.enabled
        && state.active_besides_particles() == 1
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Generates `count` descriptors for `kind`.
///
/// Constellations link at most `count / 3` pairs, shortest distances first;
/// ties break on the lower particle index, then the higher.
pub fn generate_particles<R: Rng>(
    config: &ParticleConfig,
    kind: ParticleType,
    count: u32,
    rng: &mut R,
) -> Vec<ParticleDescriptor> {
    let (motion, shape) = particle_profile(kind);
    let base_duration = 14.0 - 2.0 * config.speed.clamp(1.0, 5.0);
    let base_opacity = lerp(0.3, 0.8, config.intensity);

    let mut particles: Vec<ParticleDescriptor> = (0..count as usize)
        .map(|index| {
            let duration = round2(base_duration * rng.gen_range(0.8..1.2));
            ParticleDescriptor {
                index,
                x: round2(rng.gen_range(0.0..100.0)),
                y: round2(rng.gen_range(0.0..100.0)),
                size: round2(config.size * rng.gen_range(0.6..1.4)),
                delay: round2(rng.gen_range(0.0..duration)),
                duration,
                opacity: round2(base_opacity * rng.gen_range(0.7..=1.0)),
                motion,
                shape,
                connections: None,
            }
        })
        .collect();

    if kind == ParticleType::Constellation {
        link_nearest(&mut particles);
    }
    particles
}

fn link_nearest(particles: &mut [ParticleDescriptor]) {
    let max_links = particles.len() / 3;

    let mut pairs = Vec::with_capacity(particles.len() * particles.len().saturating_sub(1) / 2);
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            let dx = particles[j].x - particles[i].x;
            let dy = particles[j].y - particles[i].y;
            pairs.push((dx.hypot(dy), i, j, dy.atan2(dx).to_degrees()));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    for particle in particles.iter_mut() {
        particle.connections = Some(Vec::new());
    }
    for (length, i, j, angle) in pairs.into_iter().take(max_links) {
        if let Some(links) = particles[i].connections.as_mut() {
            links.push(ParticleLink {
                to: j,
                length: round2(length),
                angle: round2(angle),
            });
        }
    }
}

fn motion_keyframes(motion: MotionProfile, intensity: f32) -> KeyframeSet {
    let frames = match motion {
        MotionProfile::Bob => {
            let rise = px(-lerp(8.0, 20.0, intensity));
            vec![
                Keyframe::at(0.0).with("transform", "translateY(0)"),
                Keyframe::at(0.5).with("transform", format!("translateY({rise})")),
                Keyframe::at(1.0).with("transform", "translateY(0)"),
            ]
        }
        MotionProfile::Pulse => vec![
            Keyframe::at(0.0).with("transform", "scale(1)").with("opacity", "0.4"),
            Keyframe::at(0.5)
                .with("transform", format!("scale({})", fmt_num(lerp(1.2, 1.6, intensity))))
                .with("opacity", "1"),
            Keyframe::at(1.0).with("transform", "scale(1)").with("opacity", "0.4"),
        ],
        MotionProfile::RisingPulse => vec![
            Keyframe::at(0.0).with("transform", "translateY(0) scale(1)").with("opacity", "0"),
            Keyframe::at(0.2).with("opacity", "1"),
            Keyframe::at(1.0)
                .with(
                    "transform",
                    format!("translateY({}) scale(1.2)", px(-lerp(30.0, 80.0, intensity))),
                )
                .with("opacity", "0"),
        ],
        MotionProfile::Swirl => {
            let radius = px(lerp(6.0, 16.0, intensity));
            vec![
                Keyframe::at(0.0)
                    .with("transform", format!("rotate(0deg) translateX({radius}) rotate(0deg)")),
                Keyframe::at(1.0).with(
                    "transform",
                    format!("rotate(360deg) translateX({radius}) rotate(-360deg)"),
                ),
            ]
        }
    };
    KeyframeSet::new(motion.keyframes_name(), frames)
}

impl EffectGenerator for ParticleConfig {
    const FAMILY: EffectFamily = EffectFamily::Particles;

    fn generate(&self, ctx: &mut GenerateContext) -> Vec<StyleDirective> {
        let background_only = is_background_only(ctx.state);
        let (kind, mut count) = if background_only {
            (ParticleType::Floating, self.count / 3)
        } else {
            (self.kind.value, self.count)
        };
        if let Some(ParticleBudget(cap)) = ctx.get::<ParticleBudget>().copied() {
            count = count.min(cap);
        }
        if count == 0 {
            return Vec::new();
        }

        let particles = generate_particles(self, kind, count, &mut ctx.rng);
        tracing::debug!(count, background_only, kind = ?kind, "generated particles");
        ctx.push_particles(particles);

        let (motion, shape) = particle_profile(kind);
        let color = best_foreground_with_accent(ctx.palette.base(), ctx.palette.accent_rgb())
            .foreground;
        let timing = match motion {
            MotionProfile::Swirl | MotionProfile::RisingPulse => "linear",
            MotionProfile::Bob | MotionProfile::Pulse => "ease-in-out",
        };

        let mut particle = StyleDirective::new(within(CARD, ".fx-particle"), Self::FAMILY)
            .with("position", "absolute")
            .with("pointer-events", "none")
            .with("background-color", rgba_string(color, 1.0))
            .with("animation-name", motion.keyframes_name())
            .with("animation-timing-function", timing)
            .with("animation-iteration-count", "infinite")
            .with("will-change", "transform, opacity")
            .with_keyframes(motion_keyframes(motion, self.intensity));
        match shape {
            ParticleShape::Circle => particle.set("border-radius", "50%"),
            ParticleShape::Square => particle.set("border-radius", "2px"),
            ParticleShape::Triangle => {
                particle.set("clip-path", "polygon(50% 0%, 100% 100%, 0% 100%)")
            }
        }

        let mut out = vec![
            StyleDirective::new(CARD, Self::FAMILY)
                .with("position", "relative")
                .with("overflow", "hidden"),
            particle,
        ];
        if kind == ParticleType::Constellation {
            out.push(
                StyleDirective::new(within(CARD, ".fx-particle-link"), Self::FAMILY)
                    .with("position", "absolute")
                    .with("height", "1px")
                    .with("transform-origin", "0 50%")
                    .with("pointer-events", "none")
                    .with(
                        "background-color",
                        rgba_string(color, lerp(0.15, 0.4, self.intensity)),
                    ),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPalette;
    use crate::context::{RuntimeContext, SurfaceTemplate};
    use crate::effect::generate_all;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(kind: ParticleType) -> ParticleConfig {
        let mut config = ParticleConfig::default();
        config.enabled = true;
        config.kind.force(kind);
        config
    }

    #[test]
    fn same_seed_same_particles() {
        let c = config(ParticleType::Creative);
        let a = generate_particles(&c, ParticleType::Creative, 25, &mut StdRng::seed_from_u64(9));
        let b = generate_particles(&c, ParticleType::Creative, 25, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        let other =
            generate_particles(&c, ParticleType::Creative, 25, &mut StdRng::seed_from_u64(10));
        assert_ne!(a, other);
    }

    #[test]
    fn particles_stay_in_bounds() {
        let c = config(ParticleType::Floating);
        let particles =
            generate_particles(&c, ParticleType::Floating, 100, &mut StdRng::seed_from_u64(1));
        assert_eq!(particles.len(), 100);
        for p in &particles {
            assert!((0.0..=100.0).contains(&p.x) && (0.0..=100.0).contains(&p.y));
            assert!(p.delay <= p.duration);
            assert!(p.size > 0.0);
            assert_eq!(p.motion, MotionProfile::Bob);
            assert!(p.connections.is_none());
        }
    }

    #[test]
    fn constellation_links_at_most_a_third() {
        let c = config(ParticleType::Constellation);
        for count in [0u32, 1, 2, 3, 10, 31] {
            let particles = generate_particles(
                &c,
                ParticleType::Constellation,
                count,
                &mut StdRng::seed_from_u64(4),
            );
            let links: usize = particles
                .iter()
                .map(|p| p.connections.as_ref().map_or(0, Vec::len))
                .sum();
            assert_eq!(links, count as usize / 3, "count {count}");
            assert!(particles.iter().all(|p| p.connections.is_some()));
        }
    }

    #[test]
    fn constellation_links_are_shortest_pairs() {
        let c = config(ParticleType::Constellation);
        let particles =
            generate_particles(&c, ParticleType::Constellation, 12, &mut StdRng::seed_from_u64(5));
        let longest_link = particles
            .iter()
            .flat_map(|p| p.connections.iter().flatten())
            .map(|l| l.length)
            .fold(0.0f32, f32::max);

        let mut distances = Vec::new();
        for i in 0..particles.len() {
            for j in i + 1..particles.len() {
                let d = (particles[j].x - particles[i].x).hypot(particles[j].y - particles[i].y);
                distances.push(d);
            }
        }
        distances.sort_by(f32::total_cmp);
        // Four links, all among the four shortest distances.
        assert!(longest_link <= round2(distances[3]) + 0.01);
    }

    #[test]
    fn profiles_match_types() {
        assert_eq!(
            particle_profile(ParticleType::Professional),
            (MotionProfile::RisingPulse, ParticleShape::Square)
        );
        assert_eq!(
            particle_profile(ParticleType::Creative),
            (MotionProfile::Swirl, ParticleShape::Triangle)
        );
    }

    fn render(state: &EffectState, budget: Option<u32>) -> crate::effect::GeneratedEffects {
        let palette = ColorPalette::default();
        let template = SurfaceTemplate::default();
        let runtime = RuntimeContext::default();
        let mut ctx = GenerateContext::new(state, &palette, &template, &runtime, 11);
        if let Some(cap) = budget {
            ctx.set(ParticleBudget(cap));
        }
        generate_all(ctx)
    }

    #[test]
    fn background_only_uses_a_third_and_floating() {
        let mut state = EffectState::default();
        state.particles = config(ParticleType::Creative);
        state.particles.count = 30;
        state.background_patterns.enabled = true;

        let out = render(&state, None);
        assert_eq!(out.particles.len(), 10);
        assert!(out.particles.iter().all(|p| p.motion == MotionProfile::Bob));
    }

    #[test]
    fn budget_caps_count() {
        let mut state = EffectState::default();
        state.particles = config(ParticleType::Floating);
        state.particles.count = 50;
        let out = render(&state, Some(20));
        assert_eq!(out.particles.len(), 20);
    }

    #[test]
    fn zero_count_emits_nothing() {
        let mut state = EffectState::default();
        state.particles = config(ParticleType::Floating);
        state.particles.count = 0;
        let out = render(&state, None);
        assert!(out.particles.is_empty());
        assert!(out.directives.is_empty());
    }
}
