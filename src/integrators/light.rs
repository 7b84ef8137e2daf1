// Copyright @yucwang 2026

use crate::core::integrator::{Integrator, PassSeed, SceneView};
use crate::core::material::Material;
use crate::core::rng::LcgRng;
use crate::core::wavefront::{LaneStatus, Wavefront, WavefrontStats};
use crate::integrators::{resolve_surface, russian_roulette, SurfaceHit, LIGHT_STREAM, SURFACE_OFFSET, TRANSMISSION_OFFSET};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::SpectralSample;

/// One light path in flight.
pub struct LightPathState {
    pub origin: Vector3f,
    pub direction: Vector3f,
    pub throughput: Float,
    pub wav: SpectralSample,
    pub depth: u32,
    rng: LcgRng,
}

/// Particle tracing from the lights. Every surface vertex is connected to
/// the camera and, if visible, splatted into the pixel it projects to.
pub struct LightIntegrator {
    pub max_depth: u32,
    pub survive_rate: Float,
    pub ray_epsilon: Float,
    /// Lanes per pass, 0 for one per pixel.
    pub lanes: usize,
}

impl LightIntegrator {
    pub fn new(max_depth: u32, survive_rate: Float, ray_epsilon: Float, lanes: usize) -> Self {
        Self { max_depth, survive_rate, ray_epsilon, lanes }
    }

    /// `None` when the scene has no lights to start from.
    pub fn generate_lay(&self, scene: &SceneView, pass: PassSeed, lane: usize) -> Option<LightPathState> {
        let count = scene.lighting.light_count();
        if count == 0 {
            return None;
        }

        let mut rng = LcgRng::for_lane(pass.seed, pass.pass_id, lane as u64, LIGHT_STREAM);
        let index = rng.next_index(count);
        let emission = scene.lighting.emit_light(index, &mut rng);
        let wav = SpectralSample::from_seed(rng.next_u32() as u64);

        Some(LightPathState {
            origin: emission.origin,
            direction: emission.direction.normalize(),
            throughput: 1.0,
            wav,
            depth: 0,
            rng,
        })
    }

    pub fn transmit_lay(&self, scene: &SceneView, state: &mut LightPathState) {
        let hit = match scene.geometry.hit(&state.origin, &state.direction) {
            Some(hit) => hit,
            None => {
                state.throughput = 0.0;
                return;
            }
        };

        let surface = resolve_surface(scene, &hit, &state.origin, &state.direction);
        let material = match surface.material {
            Some(material) => material,
            None => {
                state.throughput = 0.0;
                return;
            }
        };

        let normal = surface.shading.normal;
        let mut origin = surface.shading.position + normal * (self.ray_epsilon * SURFACE_OFFSET);

        self.connect_to_camera(scene, &surface, material, &origin, state);

        let view = -state.direction;
        let sample = material.wav_sample(&surface.shading, &view, surface.side, &mut state.rng, state.wav);
        if sample.direction.dot(&normal) < 0.0 {
            origin -= normal * (self.ray_epsilon * TRANSMISSION_OFFSET);
        }

        state.throughput *= sample.weight.max(0.0);
        state.origin = origin;
        state.direction = sample.direction;
    }

    fn connect_to_camera(&self,
                         scene: &SceneView,
                         surface: &SurfaceHit,
                         material: &dyn Material,
                         origin: &Vector3f,
                         state: &LightPathState) {
        let ndc = scene.camera.project(origin);
        if !inside_view(&ndc) {
            return;
        }

        let lens = scene.camera.unproject(&Vector3f::new(ndc.x, ndc.y, -1.0));
        let to_lens = lens - origin;
        let distance = to_lens.norm();
        if !(distance > 0.0) {
            return;
        }
        let direction = to_lens / distance;

        let incoming = -state.direction;
        let mut contribution = state.throughput * incoming.dot(&surface.shading.normal).max(0.0);
        if !(contribution > 0.0) {
            return;
        }
        if scene.geometry.occluded(origin, &direction, distance) {
            return;
        }

        contribution *= material.wav_brdf(&surface.shading, &incoming, &direction, state.wav).max(0.0);
        scene.film.splat_ndc(&Vector2f::new(ndc.x, ndc.y), &state.wav.to_rgb(contribution));
    }

    pub fn bounce(&self, scene: &SceneView, state: &mut LightPathState) -> LaneStatus {
        self.transmit_lay(scene, state);
        state.depth += 1;
        russian_roulette(&mut state.throughput, self.survive_rate, &mut state.rng)
    }
}

/// Inside the clip cube, `(-1, 1]` on every axis.
pub fn inside_view(ndc: &Vector3f) -> bool {
    ndc.iter().all(|&c| c > -1.0 && c <= 1.0)
}

impl Integrator for LightIntegrator {
    fn name(&self) -> &'static str {
        "light"
    }

    fn trace_pass(&self, scene: &SceneView, pass: PassSeed, workers: usize) -> WavefrontStats {
        if scene.lighting.light_count() == 0 {
            log::warn!("light pass {} skipped: scene has no lights", pass.pass_id);
            return WavefrontStats::default();
        }

        let lanes = if self.lanes == 0 { scene.film.pixel_count() } else { self.lanes };
        let mut wavefront = Wavefront::with_capacity(workers, lanes);
        wavefront.extend((0..lanes).filter_map(|lane| self.generate_lay(scene, pass, lane)));

        // contributions were splatted while tracing
        wavefront.run(self.max_depth as usize, |state| self.bounce(scene, state), |_| {})
    }
}
