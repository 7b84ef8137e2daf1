// Copyright @yucwang 2026

pub mod light;
pub mod path;

use crate::core::geometry::RayHit;
use crate::core::integrator::SceneView;
use crate::core::material::{Material, ShadingPoint, Side};
use crate::core::rng::LcgRng;
use crate::core::wavefront::LaneStatus;
use crate::math::constants::{Float, Vector3f};

pub const MIN_SURVIVAL: Float = 0.04;
pub const MAX_SURVIVAL: Float = 0.95;

/// Origin offsets, in multiples of the ray epsilon.
pub(crate) const SURFACE_OFFSET: Float = 8.0;
pub(crate) const TRANSMISSION_OFFSET: Float = 16.0;

// Random streams of the two lane kinds within one pass.
pub(crate) const CAMERA_STREAM: u64 = 0;
pub(crate) const LIGHT_STREAM: u64 = 1;

/// Probability that a path with the given throughput survives roulette.
/// Always within `[MIN_SURVIVAL, MAX_SURVIVAL]`.
pub fn survival_probability(throughput: Float, survive_rate: Float) -> Float {
    let p = MIN_SURVIVAL + (MAX_SURVIVAL - MIN_SURVIVAL) * (throughput * survive_rate).tanh();
    if p.is_nan() {
        MIN_SURVIVAL
    } else {
        p.max(MIN_SURVIVAL).min(MAX_SURVIVAL)
    }
}

/// Kills the path with probability `1 - p` and rescales survivors by
/// `1 / p`, which keeps the estimator unbiased.
pub fn russian_roulette(throughput: &mut Float, survive_rate: Float, rng: &mut LcgRng) -> LaneStatus {
    let p = survival_probability(*throughput, survive_rate);
    if rng.next_f32() >= p {
        *throughput = 0.0;
    } else {
        *throughput /= p;
    }

    if *throughput > 0.0 {
        LaneStatus::Continue
    } else {
        LaneStatus::Terminate
    }
}

pub(crate) struct SurfaceHit<'a> {
    pub shading: ShadingPoint,
    pub side: Side,
    pub material: Option<&'a dyn Material>,
}

/// Hit point, normal flipped to face the incoming ray, and the material
/// bound to the hit primitive.
pub(crate) fn resolve_surface<'a>(scene: &SceneView<'a>,
                                  hit: &RayHit,
                                  origin: &Vector3f,
                                  direction: &Vector3f) -> SurfaceHit<'a> {
    let position = origin + direction * hit.distance;
    let geometry = scene.geometry.calc_geometry(hit, &position, direction);

    let (normal, side) = if geometry.normal.dot(direction) > 0.0 {
        (-geometry.normal, Side::Back)
    } else {
        (geometry.normal, Side::Front)
    };

    let material_id = scene.geometry.material_id(hit.primitive, hit.group);
    SurfaceHit {
        shading: ShadingPoint { position, normal, texcoord: geometry.texcoord },
        side,
        material: scene.materials.get(material_id),
    }
}
