use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::filtering::domain::filter_mode::FilterSettings;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::frame_processor::{process, FrameStatus};

/// Still-image pipeline: read → detect → anonymize → write.
pub struct AnonymizeImageUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    detector: Box<dyn FaceDetector>,
    settings: FilterSettings,
}

impl AnonymizeImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        detector: Box<dyn FaceDetector>,
        settings: FilterSettings,
    ) -> Self {
        Self {
            reader,
            writer,
            detector,
            settings,
        }
    }

    /// Anonymizes `input_path` into `output_path` and reports what was found.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<FrameStatus, Box<dyn std::error::Error>> {
        let mut frame = self.reader.read(input_path)?;
        if frame.is_empty() {
            return Err(format!("{} contains no pixels", input_path.display()).into());
        }

        let faces = self.detector.detect(&frame)?;
        let status = process(&mut frame, &faces, self.settings)?;
        self.writer.write(output_path, &frame)?;

        log::info!("{}: {status}", input_path.display());
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter_mode::{FilterMode, PixelSize};
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubImageReader {
        frame: Frame,
    }

    impl ImageReader for StubImageReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(self.frame.clone())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl StubImageWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    // --- Helpers ---

    fn checker(w: u32, h: u32) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 230 } else { 20 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, w, h, 3, 0)
    }

    fn use_case(
        frame: Frame,
        regions: Vec<Region>,
        settings: FilterSettings,
    ) -> (AnonymizeImageUseCase, Arc<Mutex<Vec<(PathBuf, Frame)>>>) {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let uc = AnonymizeImageUseCase::new(
            Box::new(StubImageReader { frame }),
            Box::new(writer),
            Box::new(StubDetector { regions }),
            settings,
        );
        (uc, written)
    }

    // --- Tests ---

    #[test]
    fn test_writes_anonymized_frame_to_output() {
        let input = checker(120, 90);
        let settings = FilterSettings::new(FilterMode::Pixelate, PixelSize::new(10));
        let (mut uc, written) = use_case(input.clone(), vec![Region::new(20, 20, 40, 40)], settings);

        let status = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert_eq!(status, FrameStatus::Faces(1));
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1.width(), 120);
        assert_eq!(written[0].1.height(), 90);
        assert_ne!(written[0].1, input);
    }

    #[test]
    fn test_no_faces_still_writes_labelled_image() {
        let (mut uc, written) = use_case(checker(200, 80), Vec::new(), FilterSettings::default());

        let status = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert_eq!(status, FrameStatus::NoFaces);
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_image_is_rejected_before_writing() {
        let empty = Frame::new(Vec::new(), 0, 0, 3, 0);
        let (mut uc, written) = use_case(empty, Vec::new(), FilterSettings::default());

        assert!(uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .is_err());
        assert!(written.lock().unwrap().is_empty());
    }
}
