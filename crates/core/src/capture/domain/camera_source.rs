use crate::shared::frame::Frame;

/// A live source of RGB frames, typically a webcam.
///
/// Opening is left to the concrete adapter's constructor, so a value of this
/// type is always an open device until [`release`](CameraSource::release)
/// is called. Adapters are not required to be `Send`: the capture handle
/// stays on the thread that opened it.
pub trait CameraSource {
    /// Grabs the next frame. A failure here is transient; callers may simply
    /// try again on the next tick.
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Stops streaming and frees the device. Calling it twice is harmless.
    fn release(&mut self);

    /// Negotiated capture size as `(width, height)`.
    fn resolution(&self) -> (u32, u32);
}
