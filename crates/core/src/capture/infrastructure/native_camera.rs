use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;

use crate::capture::domain::camera_source::CameraSource;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("could not open camera {index}: {source}")]
    Open {
        index: u32,
        #[source]
        source: nokhwa::NokhwaError,
    },
    #[error("could not start streaming from camera {index}: {source}")]
    Stream {
        index: u32,
        #[source]
        source: nokhwa::NokhwaError,
    },
    #[error("camera {0} has been released")]
    Released(u32),
    #[error("failed to capture frame: {0}")]
    Capture(#[source] nokhwa::NokhwaError),
    #[error("decoded frame is {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BadFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Webcam capture through the platform's native backend
/// (V4L2, AVFoundation or Media Foundation).
pub struct NativeCamera {
    index: u32,
    camera: Option<Camera>,
    resolution: (u32, u32),
    frames_read: usize,
}

impl NativeCamera {
    /// Opens device `index` at its highest available frame rate and starts
    /// streaming.
    pub fn open(index: u32) -> Result<Self, CameraError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|source| CameraError::Open { index, source })?;
        camera
            .open_stream()
            .map_err(|source| CameraError::Stream { index, source })?;

        let res = camera.resolution();
        let resolution = (res.width(), res.height());
        log::info!(
            "Opened camera {index} ({}) at {}x{}",
            camera.info().human_name(),
            resolution.0,
            resolution.1
        );

        Ok(Self {
            index,
            camera: Some(camera),
            resolution,
            frames_read: 0,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl CameraSource for NativeCamera {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let camera = self
            .camera
            .as_mut()
            .ok_or(CameraError::Released(self.index))?;
        let buffer = camera.frame().map_err(CameraError::Capture)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(CameraError::Capture)?;

        let (width, height) = (decoded.width(), decoded.height());
        let frame = frame_from_rgb(decoded.into_raw(), width, height, self.frames_read)?;
        self.frames_read += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera {}: {e}", self.index);
            }
            log::info!(
                "Released camera {} after {} frame(s)",
                self.index,
                self.frames_read
            );
        }
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}

impl Drop for NativeCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// Wraps decoded RGB bytes in a [`Frame`], rejecting truncated buffers that
/// some backends hand out while a device is warming up.
fn frame_from_rgb(
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
) -> Result<Frame, CameraError> {
    let expected = width as usize * height as usize * 3;
    if data.len() != expected || expected == 0 {
        return Err(CameraError::BadFrame {
            width,
            height,
            expected,
            actual: data.len(),
        });
    }
    Ok(Frame::new(data, width, height, 3, index))
}
