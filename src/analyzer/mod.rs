//! Segmentation and statistics engine

pub mod geomath;
pub mod point;
pub mod route;
pub mod segmenter;
