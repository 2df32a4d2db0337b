pub mod edit_distance;
pub mod global;
pub mod normalization;
pub mod report;
pub mod segmentation;
pub mod timing;
pub mod windowed;
