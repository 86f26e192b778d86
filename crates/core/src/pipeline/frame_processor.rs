use std::fmt;

use crate::filtering::domain::filter_mode::FilterSettings;
use crate::filtering::infrastructure::filter_factory::create_filter;
use crate::overlay::text::{draw_text, TextStyle};
use crate::shared::constants::{
    NO_FACE_LABEL, NO_FACE_LABEL_COLOR, NO_FACE_LABEL_ORIGIN, NO_FACE_LABEL_SCALE,
};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// What a processed frame contained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    NoFaces,
    Faces(usize),
}

impl FrameStatus {
    pub fn face_count(self) -> usize {
        match self {
            FrameStatus::NoFaces => 0,
            FrameStatus::Faces(n) => n,
        }
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStatus::NoFaces => f.write_str("no faces found"),
            FrameStatus::Faces(n) => write!(f, "{n} face(s)"),
        }
    }
}

/// Anonymizes every face in `frame` in place.
///
/// Regions are filtered in the order given. With no regions the frame is
/// left untouched apart from the red "No Face Found!" label.
pub fn process(
    frame: &mut Frame,
    faces: &[Region],
    settings: FilterSettings,
) -> Result<FrameStatus, Box<dyn std::error::Error>> {
    if faces.is_empty() {
        draw_text(
            frame,
            NO_FACE_LABEL,
            NO_FACE_LABEL_ORIGIN,
            TextStyle {
                scale: NO_FACE_LABEL_SCALE,
                color: NO_FACE_LABEL_COLOR,
            },
        );
        return Ok(FrameStatus::NoFaces);
    }

    let filter = create_filter(settings);
    filter.apply(frame, faces)?;
    Ok(FrameStatus::Faces(faces.len()))
}
