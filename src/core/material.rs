// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::SpectralSample;

use std::fmt;
use std::sync::Arc;

/// Which side of the surface a path arrived from. The shading normal is
/// always flipped toward the incoming ray; this records whether that flip
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn sign(&self) -> Float {
        match self {
            Side::Front => 1.0,
            Side::Back => -1.0,
        }
    }
}

/// Surface attributes a material is shaded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingPoint {
    pub position: Vector3f,
    pub normal: Vector3f,
    pub texcoord: Vector2f,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSample {
    pub direction: Vector3f,
    /// BRDF x cosine / pdf for the sampled direction.
    pub weight: Float,
}

pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// BRDF value (without the cosine term) for light arriving from `light`
    /// and leaving toward `view`.
    fn wav_brdf(&self, shading: &ShadingPoint, view: &Vector3f, light: &Vector3f, wav: SpectralSample) -> Float;

    fn wav_sample(&self,
                  shading: &ShadingPoint,
                  view: &Vector3f,
                  side: Side,
                  rng: &mut LcgRng,
                  wav: SpectralSample) -> MaterialSample;
}

/// Materials addressed by the ids the geometry reports.
#[derive(Clone, Default)]
pub struct MaterialTable {
    materials: Vec<Arc<dyn Material>>,
}

impl fmt::Debug for MaterialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.materials.iter().map(|m| m.name())).finish()
    }
}

impl MaterialTable {
    pub fn new() -> Self {
        Self { materials: Vec::new() }
    }

    /// Registers a material and returns its id.
    pub fn add(&mut self, material: Arc<dyn Material>) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&dyn Material> {
        self.materials.get(id).map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
