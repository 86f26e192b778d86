pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Camera opened by the Start button; a single device is supported.
pub const DEFAULT_CAMERA_INDEX: u32 = 0;

/// Processing ticks per second while the camera runs.
pub const FRAMES_PER_SECOND: u64 = 20;

/// Gaussian kernel edge for blur mode. Strong enough to hide identity.
pub const BLUR_KERNEL_SIZE: usize = 91;

pub const MIN_PIXEL_SIZE: u32 = 2;
pub const MAX_PIXEL_SIZE: u32 = 50;
pub const DEFAULT_PIXEL_SIZE: u32 = 10;

pub const NO_FACE_LABEL: &str = "No Face Found!";
/// Baseline-left origin of the no-face label.
pub const NO_FACE_LABEL_ORIGIN: (i32, i32) = (20, 50);
pub const NO_FACE_LABEL_COLOR: [u8; 3] = [255, 0, 0];
pub const NO_FACE_LABEL_SCALE: u32 = 3;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
