// Copyright @yucwang 2021

pub mod image_utils;
