use std::cell::RefCell;

use crate::filtering::domain::face_filter::FaceFilter;
use crate::shared::constants::BLUR_KERNEL_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};

/// Replaces each region with a Gaussian-blurred copy of itself.
///
/// The blur is computed from the region's own pixels only, with mirrored
/// borders, so nothing outside the region leaks in or is touched.
pub struct GaussianBlurFilter {
    kernel: Vec<f32>,
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
}

impl GaussianBlurFilter {
    pub fn new(kernel_size: usize) -> Self {
        let kernel_size = kernel_size.max(1) | 1; // ensure odd
        Self {
            kernel: gaussian::gaussian_kernel_1d(kernel_size),
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
        }
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.len()
    }
}

impl Default for GaussianBlurFilter {
    fn default() -> Self {
        Self::new(BLUR_KERNEL_SIZE)
    }
}

impl FaceFilter for GaussianBlurFilter {
    fn apply(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (fw, fh) = (frame.width(), frame.height());
        let channels = frame.channels() as usize;
        let data = frame.data_mut();

        for r in regions {
            let r = r.clamp_to(fw, fh);
            if r.is_empty() {
                continue;
            }
            let rect = RoiRect {
                x: r.x as usize,
                y: r.y as usize,
                w: r.width as usize,
                h: r.height as usize,
            };

            let mut roi = self.roi_buf.borrow_mut();
            let mut temp = self.blur_temp.borrow_mut();
            gaussian::extract_roi(data, fw as usize, channels, rect, &mut roi);
            gaussian::separable_gaussian_blur_with_kernel(
                &mut roi,
                rect.w,
                rect.h,
                channels,
                &self.kernel,
                &mut temp,
            );
            gaussian::write_roi_back(data, &roi, fw as usize, channels, rect);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, value: u8) -> Frame {
        Frame::new(vec![value; (width * height * 3) as usize], width, height, 3, 0)
    }

    fn checkerboard(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_default_kernel_size() {
        assert_eq!(GaussianBlurFilter::default().kernel_size(), BLUR_KERNEL_SIZE);
    }

    #[test]
    fn test_even_kernel_size_is_made_odd() {
        assert_eq!(GaussianBlurFilter::new(10).kernel_size(), 11);
    }

    #[test]
    fn test_no_regions_frame_unchanged() {
        let mut frame = make_frame(100, 100, 128);
        let original = frame.clone();
        GaussianBlurFilter::default().apply(&mut frame, &[]).unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_blur_changes_non_uniform_region() {
        let mut frame = checkerboard(64, 64);
        let original = frame.clone();
        GaussianBlurFilter::default()
            .apply(&mut frame, &[Region::new(8, 8, 32, 32)])
            .unwrap();

        let idx = (20 * 64 + 20) * 3;
        assert_ne!(frame.data()[idx], original.data()[idx]);
        // Strong blur pulls a checkerboard towards mid-grey.
        assert!((frame.data()[idx] as i32 - 128).abs() < 20);
    }

    #[test]
    fn test_uniform_region_stays_uniform() {
        let mut frame = make_frame(60, 60, 77);
        GaussianBlurFilter::default()
            .apply(&mut frame, &[Region::new(10, 10, 30, 30)])
            .unwrap();
        assert!(frame.data().iter().all(|&v| (v as i32 - 77).abs() <= 1));
    }

    #[test]
    fn test_pixels_outside_region_unchanged() {
        let mut frame = checkerboard(50, 50);
        let original = frame.clone();
        GaussianBlurFilter::new(5)
            .apply(&mut frame, &[Region::new(10, 10, 20, 20)])
            .unwrap();

        for y in 0..50usize {
            for x in 0..50usize {
                let inside = (10..30).contains(&x) && (10..30).contains(&y);
                if !inside {
                    let idx = (y * 50 + x) * 3;
                    assert_eq!(frame.data()[idx], original.data()[idx], "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_second_pass_does_not_sharpen() {
        let mut frame = checkerboard(40, 40);
        let filter = GaussianBlurFilter::default();
        let region = Region::new(0, 0, 40, 40);
        filter.apply(&mut frame, &[region]).unwrap();
        let once = spread(&frame);
        filter.apply(&mut frame, &[region]).unwrap();
        assert!(spread(&frame) <= once);
    }

    fn spread(frame: &Frame) -> u8 {
        let max = frame.data().iter().copied().max().unwrap_or(0);
        let min = frame.data().iter().copied().min().unwrap_or(0);
        max - min
    }

    #[test]
    fn test_zero_size_region_skipped() {
        let mut frame = checkerboard(30, 30);
        let original = frame.clone();
        GaussianBlurFilter::default()
            .apply(&mut frame, &[Region::new(10, 10, 0, 20), Region::new(5, 5, 8, 0)])
            .unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_region_past_frame_edge_is_clamped() {
        let mut frame = checkerboard(30, 30);
        GaussianBlurFilter::new(5)
            .apply(&mut frame, &[Region::new(20, 20, 50, 50)])
            .unwrap();
        // Top-left corner is outside the clamped region.
        assert_eq!(frame.data()[0], 255);
    }

    #[test]
    fn test_single_pixel_region() {
        let mut frame = checkerboard(5, 5);
        let original = frame.clone();
        GaussianBlurFilter::default()
            .apply(&mut frame, &[Region::new(2, 2, 1, 1)])
            .unwrap();
        // A 1x1 region mirrors onto itself.
        assert_eq!(frame, original);
    }
}
