// Copyright @yucwang 2026

use crate::core::lighting::{LightEmission, LightSample, Lighting};
use crate::core::rng::LcgRng;
use crate::emitters::background::Background;
use crate::emitters::point::PointLight;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::SpectralSample;

/// Point lights plus one background.
#[derive(Debug, Clone, Default)]
pub struct LightList {
    lights: Vec<PointLight>,
    background: Background,
}

impl LightList {
    pub fn new(background: Background) -> Self {
        Self { lights: Vec::new(), background }
    }

    pub fn add(&mut self, light: PointLight) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }
}

impl Lighting for LightList {
    fn light_count(&self) -> usize {
        self.lights.len()
    }

    fn emit_light(&self, index: usize, rng: &mut LcgRng) -> LightEmission {
        self.lights[index].emit(rng)
    }

    fn redirect(&self, position: &Vector3f, index: usize, wav: SpectralSample) -> LightSample {
        self.lights[index].sample_toward(position, wav)
    }

    fn background(&self, direction: &Vector3f, wav: SpectralSample) -> Float {
        self.background.eval(direction, wav).max(0.0)
    }
}
