use crate::filtering::domain::face_filter::FaceFilter;
use crate::filtering::domain::filter_mode::{FilterMode, FilterSettings};
use crate::shared::constants::BLUR_KERNEL_SIZE;

use super::gaussian_blur_filter::GaussianBlurFilter;
use super::pixelate_filter::PixelateFilter;

/// Creates the filter for the selected mode.
///
/// The pixel size only matters for [`FilterMode::Pixelate`]; blur always
/// uses the fixed [`BLUR_KERNEL_SIZE`].
pub fn create_filter(settings: FilterSettings) -> Box<dyn FaceFilter> {
    log::debug!(
        "Creating {} filter (pixel_size={})",
        settings.mode,
        settings.pixel_size.get()
    );
    match settings.mode {
        FilterMode::Blur => Box::new(GaussianBlurFilter::new(BLUR_KERNEL_SIZE)),
        FilterMode::Pixelate => Box::new(PixelateFilter::new(settings.pixel_size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter_mode::PixelSize;
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;

    fn stripes(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                let v = if x % 2 == 0 { 250 } else { 10 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_blur_filter_works() {
        let filter = create_filter(FilterSettings::new(FilterMode::Blur, PixelSize::default()));
        let mut frame = stripes(40, 40);
        let original = frame.clone();
        filter.apply(&mut frame, &[Region::new(5, 5, 20, 20)]).unwrap();
        assert_ne!(frame, original);
    }

    #[test]
    fn test_pixelate_filter_works() {
        let filter = create_filter(FilterSettings::new(FilterMode::Pixelate, PixelSize::new(4)));
        let mut frame = stripes(40, 40);
        let original = frame.clone();
        filter.apply(&mut frame, &[Region::new(0, 0, 16, 16)]).unwrap();
        assert_ne!(frame, original);
    }

    #[test]
    fn test_empty_region_list_is_noop_for_both_modes() {
        for &mode in FilterMode::ALL {
            let filter = create_filter(FilterSettings::new(mode, PixelSize::default()));
            let mut frame = stripes(10, 10);
            let original = frame.clone();
            filter.apply(&mut frame, &[]).unwrap();
            assert_eq!(frame, original);
        }
    }
}
