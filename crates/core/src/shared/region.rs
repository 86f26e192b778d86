/// A face bounding box in frame pixel coordinates.
///
/// Regions carry no identity across frames; a detector produces a fresh
/// set every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a region from corner coordinates, rounding outward so the
    /// whole box is covered.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let left = x1.floor() as i32;
        let top = y1.floor() as i32;
        let right = x2.ceil() as i32;
        let bottom = y2.ceil() as i32;
        Self::new(left, top, (right - left).max(0), (bottom - top).max(0))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Intersects the region with a `frame_width` × `frame_height` frame.
    ///
    /// The result may be empty when the region lies entirely outside.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Region {
        let fw = frame_width as i64;
        let fh = frame_height as i64;
        let x1 = (self.x as i64).clamp(0, fw);
        let y1 = (self.y as i64).clamp(0, fh);
        let x2 = (self.x as i64 + self.width.max(0) as i64).clamp(0, fw);
        let y2 = (self.y as i64 + self.height.max(0) as i64).clamp(0, fh);
        Region::new(
            x1 as i32,
            y1 as i32,
            (x2 - x1).max(0) as i32,
            (y2 - y1).max(0) as i32,
        )
    }
}
