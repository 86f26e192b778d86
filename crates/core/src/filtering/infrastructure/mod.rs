pub mod filter_factory;
mod gaussian;
pub mod gaussian_blur_filter;
pub mod pixelate_filter;
mod resample;
