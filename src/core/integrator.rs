// Copyright @yucwang 2026

use crate::core::camera::CameraTransform;
use crate::core::film::Film;
use crate::core::geometry::Geometry;
use crate::core::lighting::Lighting;
use crate::core::material::MaterialTable;
use crate::core::wavefront::WavefrontStats;

/// Everything a pass reads, plus the film it accumulates into. All of it is
/// borrowed for the duration of the pass, so the camera and collaborators
/// cannot change while lanes are in flight.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub geometry: &'a dyn Geometry,
    pub lighting: &'a dyn Lighting,
    pub materials: &'a MaterialTable,
    pub camera: &'a CameraTransform,
    pub film: &'a Film,
}

/// Lane identity used to derive per-lane random streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSeed {
    pub seed: u64,
    pub pass_id: u64,
}

pub trait Integrator: Sync {
    fn name(&self) -> &'static str;

    /// Traces one full pass into `scene.film`.
    fn trace_pass(&self, scene: &SceneView, pass: PassSeed, workers: usize) -> WavefrontStats;
}
