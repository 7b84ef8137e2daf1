// Copyright @yucwang 2021

pub mod atomic_float;
pub mod camera;
pub mod film;
pub mod geometry;
pub mod integrator;
pub mod lighting;
pub mod material;
pub mod rng;
pub mod scene_loader;
pub mod settings;
pub mod shape;
pub mod tangent_frame;
pub mod tonemap;
pub mod wavefront;
