use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for anonymizing regions within a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and process
/// regions in the order given. Empty regions are skipped without error.
pub trait FaceFilter: Send {
    fn apply(&self, frame: &mut Frame, regions: &[Region])
        -> Result<(), Box<dyn std::error::Error>>;
}
