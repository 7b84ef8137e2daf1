// Copyright @yucwang 2026

use crate::core::camera::{CameraError, CameraTransform};
use crate::core::film::Film;
use crate::core::geometry::Geometry;
use crate::core::integrator::{Integrator, PassSeed, SceneView};
use crate::core::lighting::Lighting;
use crate::core::material::MaterialTable;
use crate::core::settings::{validate_pass, PassConfig, RenderSettings, SettingsError};
use crate::core::tonemap::Tonemap;
use crate::core::wavefront::WavefrontStats;
use crate::integrators::light::LightIntegrator;
use crate::integrators::path::PathIntegrator;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Matrix4f};

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary of one [`PathEngine::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderReport {
    pub passes: u32,
    pub camera: WavefrontStats,
    pub light: WavefrontStats,
    pub elapsed: Duration,
}

/// Progressive renderer: owns the scene collaborators, the camera and the
/// film, and accumulates camera and light passes into the film until it is
/// cleared.
pub struct PathEngine {
    geometry: Arc<dyn Geometry>,
    lighting: Arc<dyn Lighting>,
    materials: MaterialTable,
    camera: CameraTransform,
    film: Film,
    pass_count: u64,
    seed: u64,
    workers: usize,
    ray_epsilon: Float,
    light_lanes: usize,
}

impl PathEngine {
    pub fn new(geometry: Arc<dyn Geometry>,
               lighting: Arc<dyn Lighting>,
               materials: MaterialTable,
               settings: &RenderSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        log::debug!("path engine {}x{}, {} materials, {} lights",
                    settings.width, settings.height, materials.len(), lighting.light_count());

        Ok(Self {
            geometry,
            lighting,
            materials,
            camera: CameraTransform::default(),
            film: Film::new(settings.width, settings.height),
            pass_count: 0,
            seed: settings.seed,
            workers: settings.workers,
            ray_epsilon: settings.ray_epsilon,
            light_lanes: settings.light_lanes,
        })
    }

    /// Installs `proj * view` as the world-to-view transform. On error the
    /// previous camera stays in place.
    pub fn set_camera(&mut self, view: &Matrix4f, proj: &Matrix4f) -> Result<(), CameraError> {
        self.camera = CameraTransform::from_view_proj(view, proj)?;
        Ok(())
    }

    pub fn set_camera_transform(&mut self, camera: CameraTransform) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &CameraTransform {
        &self.camera
    }

    /// Zeroes radiance sums and sample counts. The pass counter keeps going
    /// so later passes never reuse earlier random streams.
    pub fn clear(&mut self) {
        self.film.clear();
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    pub fn width(&self) -> usize {
        self.film.width()
    }

    pub fn height(&self) -> usize {
        self.film.height()
    }

    /// One camera pass: one path per pixel.
    pub fn trace_rays(&mut self, max_depth: u32, survive_rate: Float) -> Result<WavefrontStats, SettingsError> {
        validate_pass(max_depth, survive_rate)?;
        let integrator = PathIntegrator::new(max_depth, survive_rate, self.ray_epsilon);
        Ok(self.trace_with(&integrator))
    }

    /// One light pass: light paths splatted into the film through the camera.
    pub fn trace_lays(&mut self, max_depth: u32, survive_rate: Float) -> Result<WavefrontStats, SettingsError> {
        validate_pass(max_depth, survive_rate)?;
        let integrator = LightIntegrator::new(max_depth, survive_rate, self.ray_epsilon, self.light_lanes);
        Ok(self.trace_with(&integrator))
    }

    fn trace_with(&mut self, integrator: &dyn Integrator) -> WavefrontStats {
        let pass = PassSeed { seed: self.seed, pass_id: self.pass_count };
        self.pass_count += 1;

        let scene = SceneView {
            geometry: self.geometry.as_ref(),
            lighting: self.lighting.as_ref(),
            materials: &self.materials,
            camera: &self.camera,
            film: &self.film,
        };
        let stats = integrator.trace_pass(&scene, pass, self.workers);
        log::debug!("{} pass {}: {} iterations, {} lane visits, {} retired, {} peak lanes",
                    integrator.name(), pass.pass_id, stats.iterations,
                    stats.lane_visits, stats.retired, stats.peak_active);
        stats
    }

    /// Runs `config.passes` camera passes, each followed by a light pass
    /// when `config.light_paths` is set.
    pub fn render(&mut self, config: &PassConfig) -> Result<RenderReport, SettingsError> {
        config.validate()?;
        let start = Instant::now();
        log::info!("rendering {} passes at {}x{} (max depth {}, light paths {})",
                   config.passes, self.width(), self.height(), config.max_depth, config.light_paths);

        let progress = if config.show_progress {
            let bar = ProgressBar::new(config.passes as u64);
            bar.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} passes")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut report = RenderReport::default();
        for _ in 0..config.passes {
            let stats = self.trace_rays(config.max_depth, config.survive_rate)?;
            report.camera.merge(&stats);
            if config.light_paths {
                let stats = self.trace_lays(config.max_depth, config.survive_rate)?;
                report.light.merge(&stats);
            }
            report.passes += 1;
            progress.inc(1);
        }
        progress.finish_and_clear();

        report.elapsed = start.elapsed();
        log::info!("finished {} passes in {:.2?}, {} samples in film",
                   report.passes, report.elapsed, self.film.total_samples());
        Ok(report)
    }

    pub fn get_image(&self, tonemap: Tonemap) -> Bitmap {
        self.film.resolve(tonemap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::film::NAN_COLOR;
    use crate::emitters::background::Background;
    use crate::emitters::light_list::LightList;
    use crate::emitters::point::PointLight;
    use crate::materials::lambertian_diffuse::LambertianDiffuse;
    use crate::math::constants::Vector3f;
    use crate::math::spectrum::RGBSpectrum;
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shapes::group::ShapeGroup;
    use crate::shapes::sphere::Sphere;
    use crate::integrators::test_scenes::EmptyGeometry;

    fn small_settings() -> RenderSettings {
        let mut settings = RenderSettings::default();
        settings.width = 12;
        settings.height = 8;
        settings.max_depth = 4;
        settings.passes = 2;
        settings.workers = 2;
        settings
    }

    fn sphere_scene(settings: &RenderSettings) -> PathEngine {
        let mut materials = MaterialTable::new();
        let diffuse = materials.add(Arc::new(LambertianDiffuse::new(RGBSpectrum::new(0.7, 0.5, 0.3))));
        let mut shapes = ShapeGroup::new();
        shapes.add(Box::new(Sphere::new(Vector3f::zeros(), 1.0)), diffuse);

        let mut lights = LightList::new(Background::Constant(RGBSpectrum::splat(0.2)));
        lights.add(PointLight::new(Vector3f::new(2.0, 3.0, 2.0), RGBSpectrum::splat(10.0)));

        let mut engine = PathEngine::new(Arc::new(shapes), Arc::new(lights), materials, settings).unwrap();
        let camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.0, 4.0),
                                            Vector3f::zeros(),
                                            Vector3f::new(0.0, 1.0, 0.0),
                                            (45.0 as Float).to_radians(),
                                            settings.width as Float / settings.height as Float,
                                            0.1,
                                            100.0);
        engine.set_camera(&camera.view_matrix(), &camera.projection_matrix()).unwrap();
        engine
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let mut settings = small_settings();
        settings.height = 0;
        let result = PathEngine::new(Arc::new(ShapeGroup::new()),
                                     Arc::new(LightList::default()),
                                     MaterialTable::new(),
                                     &settings);
        assert!(matches!(result, Err(SettingsError::ZeroResolution { .. })));
    }

    #[test]
    fn test_singular_camera_is_rejected() {
        let mut engine = sphere_scene(&small_settings());
        let before = *engine.camera();
        assert_eq!(engine.set_camera(&Matrix4f::identity(), &Matrix4f::zeros()), Err(CameraError::Singular));
        assert_eq!(*engine.camera(), before);
    }

    #[test]
    fn test_camera_pass_counts_one_sample_per_pixel() {
        let settings = small_settings();
        let mut engine = sphere_scene(&settings);
        let stats = engine.trace_rays(4, 1.0).unwrap();
        assert_eq!(stats.retired, 96);
        assert_eq!(engine.pass_count(), 1);
        for y in 0..engine.height() {
            for x in 0..engine.width() {
                assert_eq!(engine.film().sample_count(x, y), 1);
            }
        }
    }

    #[test]
    fn test_clear_resets_film_but_not_pass_counter() {
        let settings = small_settings();
        let mut engine = sphere_scene(&settings);
        engine.trace_rays(4, 1.0).unwrap();
        engine.trace_rays(4, 1.0).unwrap();
        assert_eq!(engine.film().total_samples(), 2 * 96);

        engine.clear();
        assert_eq!(engine.film().total_samples(), 0);
        assert_eq!(engine.pass_count(), 2);

        // every pixel shows the placeholder pattern again
        let image = engine.get_image(Tonemap::Identity);
        let top_left = image[(0, 0)];
        assert!(top_left.x == 0.4 || top_left.x == 0.9);
        assert!(image.pixels().iter().all(|p| (p.x - 0.4).abs() < 1e-6 || (p.x - 0.9).abs() < 1e-6));
    }

    #[test]
    fn test_render_with_light_paths() {
        let mut settings = small_settings();
        settings.light_paths = true;
        settings.light_lanes = 256;
        let mut engine = sphere_scene(&settings);
        let mut config = PassConfig::from(&settings);
        config.passes = 3;

        let report = engine.render(&config).unwrap();
        assert_eq!(report.passes, 3);
        assert_eq!(engine.pass_count(), 6);
        assert_eq!(report.camera.retired, 3 * 96);
        assert_eq!(report.light.peak_active, 256);
        assert!(engine.film().total_samples() >= 3 * 96);

        let image = engine.get_image(Tonemap::Filmic);
        assert_eq!(image.width(), 12);
        assert_eq!(image.height(), 8);
        for p in image.pixels() {
            assert!(p.iter().all(|c| c.is_finite() && *c >= 0.0 && *c <= 1.0));
            assert_ne!([p.x, p.y, p.z], NAN_COLOR);
        }
    }

    #[test]
    fn test_render_validates_pass_config() {
        let mut engine = sphere_scene(&small_settings());
        let mut config = PassConfig::default();
        config.max_depth = 0;
        assert_eq!(engine.render(&config), Err(SettingsError::InvalidMaxDepth(0)));
        assert_eq!(engine.pass_count(), 0);
    }

    #[test]
    fn test_single_passes_reject_invalid_options() {
        let settings = RenderSettings { width: 4, height: 4, workers: 1, ..RenderSettings::default() };
        let lights = LightList::new(Background::Constant(RGBSpectrum::splat(1.0)));
        let mut engine = PathEngine::new(Arc::new(EmptyGeometry), Arc::new(lights), MaterialTable::new(), &settings)
            .unwrap();

        assert_eq!(engine.trace_rays(0, 1.0), Err(SettingsError::InvalidMaxDepth(0)));
        assert_eq!(engine.trace_lays(0, 1.0), Err(SettingsError::InvalidMaxDepth(0)));
        assert!(matches!(engine.trace_rays(4, Float::NAN), Err(SettingsError::InvalidSurviveRate(_))));
        assert!(matches!(engine.trace_rays(4, -1.0), Err(SettingsError::InvalidSurviveRate(_))));
        assert_eq!(engine.pass_count(), 0);
        assert_eq!(engine.film().total_samples(), 0);

        // a valid pass sees the white sky in every pixel
        engine.trace_rays(1, 1.0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(engine.film().sample_count(x, y), 1);
                let mean = engine.film().resolve_pixel(x, y);
                assert!((mean.x + mean.y + mean.z - 3.0).abs() < 1e-5);
            }
        }
    }
}
