// Copyright @yucwang 2026

pub mod group;
pub mod rectangle;
pub mod sphere;
