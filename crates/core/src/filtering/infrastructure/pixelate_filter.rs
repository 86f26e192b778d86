use std::cell::RefCell;

use crate::filtering::domain::face_filter::FaceFilter;
use crate::filtering::domain::filter_mode::PixelSize;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};
use super::resample;

/// Replaces each region with coarse blocks of averaged color.
///
/// The region is shrunk by the effective block size with bilinear sampling
/// and stretched back to its exact original size with nearest-neighbour
/// sampling. When the block does not divide the region evenly, the blocks
/// are slightly wider than the block size rather than leaving an
/// unfiltered border.
pub struct PixelateFilter {
    pixel_size: PixelSize,
    roi_buf: RefCell<Vec<u8>>,
}

impl PixelateFilter {
    pub fn new(pixel_size: PixelSize) -> Self {
        Self {
            pixel_size,
            roi_buf: RefCell::new(Vec::new()),
        }
    }

    pub fn pixel_size(&self) -> PixelSize {
        self.pixel_size
    }
}

/// Size of the intermediate image for a `width` × `height` region.
///
/// Both dimensions are at least 1 so the shrink step always has a target.
pub fn downscaled_size(width: u32, height: u32, pixel_size: PixelSize) -> (u32, u32) {
    let block = pixel_size.effective_for(width);
    ((width / block).max(1), (height / block).max(1))
}

impl FaceFilter for PixelateFilter {
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
            if r.area() == 0 {
                continue;
            }
            let rect = RoiRect {
                x: r.x as usize,
                y: r.y as usize,
                w: r.width as usize,
                h: r.height as usize,
            };
            let (sw, sh) = downscaled_size(r.width as u32, r.height as u32, self.pixel_size);

            let mut roi = self.roi_buf.borrow_mut();
            gaussian::extract_roi(data, fw as usize, channels, rect, &mut roi);
            let small = resample::resize_bilinear(
                &roi,
                rect.w,
                rect.h,
                channels,
                sw as usize,
                sh as usize,
            );
            let blocky = resample::resize_nearest(
                &small,
                sw as usize,
                sh as usize,
                channels,
                rect.w,
                rect.h,
            );
            gaussian::write_roi_back(data, &blocky, fw as usize, channels, rect);
        }

        Ok(())
    }
}
