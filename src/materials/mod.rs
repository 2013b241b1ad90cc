// Copyright @yucwang 2023

pub mod dielectric;
pub mod diffusive;
pub mod metallic;
