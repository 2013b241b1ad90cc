// Copyright @yucwang 2023

pub mod cube;
pub mod ellipsoid;
pub mod plane;
pub mod triangle;
