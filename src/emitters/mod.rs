// Copyright @yucwang 2026

pub mod background;
pub mod light_list;
pub mod point;
