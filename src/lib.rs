// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod core;
pub mod math;
pub mod io;
pub mod sensors;
pub mod integrators;
pub mod materials;
pub mod shapes;
pub mod emitters;
pub mod renderers;
