// Copyright @yucwang 2026

use crate::core::integrator::{Integrator, PassSeed, SceneView};
use crate::core::rng::LcgRng;
use crate::core::wavefront::{LaneStatus, Wavefront, WavefrontStats};
use crate::core::film::Film;
use crate::integrators::{resolve_surface, russian_roulette, CAMERA_STREAM, SURFACE_OFFSET, TRANSMISSION_OFFSET};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::SpectralSample;

/// One camera path in flight.
pub struct PathState {
    pub pixel: usize,
    pub origin: Vector3f,
    pub direction: Vector3f,
    pub throughput: Float,
    pub radiance: Float,
    pub wav: SpectralSample,
    pub depth: u32,
    rng: LcgRng,
}

/// Camera-ray transport with next-event estimation toward every light.
/// Each pixel gets one lane per pass; a lane's radiance is written back
/// once, when it leaves the wavefront.
pub struct PathIntegrator {
    pub max_depth: u32,
    pub survive_rate: Float,
    pub ray_epsilon: Float,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, survive_rate: Float, ray_epsilon: Float) -> Self {
        Self { max_depth, survive_rate, ray_epsilon }
    }

    pub fn generate_ray(&self, scene: &SceneView, pass: PassSeed, pixel: usize) -> PathState {
        let width = scene.film.width();
        let height = scene.film.height();
        let (x, y) = (pixel % width, pixel / width);

        let mut rng = LcgRng::for_lane(pass.seed, pass.pass_id, pixel as u64, CAMERA_STREAM);
        let bias = rng.next_2d();
        let u = (x as Float + bias.x) / width as Float * 2.0 - 1.0;
        let v = (y as Float + bias.y) / height as Float * 2.0 - 1.0;

        let near = scene.camera.unproject(&Vector3f::new(u, v, -1.0));
        let far = scene.camera.unproject(&Vector3f::new(u, v, 1.0));

        PathState {
            pixel,
            origin: near,
            direction: (far - near).normalize(),
            throughput: 1.0,
            radiance: 0.0,
            wav: SpectralSample::from_seed(pass.pass_id.wrapping_add(y as u64)),
            depth: 0,
            rng,
        }
    }

    /// Intersects, adds direct lighting and samples the continuation of one
    /// bounce. Leaves `throughput` at zero when the path cannot continue.
    pub fn transmit_ray(&self, scene: &SceneView, state: &mut PathState) {
        let hit = match scene.geometry.hit(&state.origin, &state.direction) {
            Some(hit) => hit,
            None => {
                state.radiance += state.throughput * scene.lighting.background(&state.direction, state.wav).max(0.0);
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
        let view = -state.direction;
        let mut origin = surface.shading.position + normal * (self.ray_epsilon * SURFACE_OFFSET);

        let mut direct: Float = 0.0;
        for index in 0..scene.lighting.light_count() {
            let light = scene.lighting.redirect(&origin, index, state.wav);
            let weight = light.weight * light.direction.dot(&normal).max(0.0);
            if !(weight > 0.0) {
                continue;
            }
            if scene.geometry.occluded(&origin, &light.direction, light.distance) {
                continue;
            }
            direct += weight * material.wav_brdf(&surface.shading, &view, &light.direction, state.wav).max(0.0);
        }

        let sample = material.wav_sample(&surface.shading, &view, surface.side, &mut state.rng, state.wav);
        if sample.direction.dot(&normal) < 0.0 {
            // transmitted: continue from the far side
            origin -= normal * (self.ray_epsilon * TRANSMISSION_OFFSET);
        }

        state.radiance += state.throughput * direct;
        state.throughput *= sample.weight.max(0.0);
        state.origin = origin;
        state.direction = sample.direction;
    }

    /// One wavefront iteration for a lane: transport, then roulette.
    pub fn bounce(&self, scene: &SceneView, state: &mut PathState) -> LaneStatus {
        self.transmit_ray(scene, state);
        state.depth += 1;
        russian_roulette(&mut state.throughput, self.survive_rate, &mut state.rng)
    }

    pub fn write_back(&self, film: &Film, state: &PathState) {
        let x = state.pixel % film.width();
        let y = state.pixel / film.width();
        film.add_sample(x, y, &state.wav.to_rgb(state.radiance));
    }
}

impl Integrator for PathIntegrator {
    fn name(&self) -> &'static str {
        "path"
    }

    fn trace_pass(&self, scene: &SceneView, pass: PassSeed, workers: usize) -> WavefrontStats {
        let lanes = scene.film.pixel_count();
        let mut wavefront = Wavefront::with_capacity(workers, lanes);
        wavefront.extend((0..lanes).map(|pixel| self.generate_ray(scene, pass, pixel)));

        let film = scene.film;
        wavefront.run(self.max_depth as usize,
                      |state| self.bounce(scene, state),
                      |state| self.write_back(film, &state))
    }
}
