use crate::capture::domain::camera_source::CameraSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::filtering::domain::filter_mode::FilterSettings;
use crate::pipeline::frame_processor::{process, FrameStatus};
use crate::shared::frame::Frame;

/// Result of one capture tick.
#[derive(Debug)]
pub enum TickOutcome {
    Processed { frame: Frame, status: FrameStatus },
    /// The camera had no frame for us. Nothing was shown; try again next tick.
    ReadFailed,
}

/// A running camera paired with the detector that analyses its frames.
///
/// The session owns the detector while the camera is on and hands it back
/// from [`stop`](LiveSession::stop), so the model is loaded once per
/// process rather than once per start.
pub struct LiveSession {
    camera: Box<dyn CameraSource>,
    detector: Box<dyn FaceDetector>,
    last_frame: Option<Frame>,
    ticks: usize,
}

impl LiveSession {
    pub fn new(camera: Box<dyn CameraSource>, detector: Box<dyn FaceDetector>) -> Self {
        let (w, h) = camera.resolution();
        log::info!("Live session started at {w}x{h}");
        Self {
            camera,
            detector,
            last_frame: None,
            ticks: 0,
        }
    }

    /// Reads, detects and anonymizes one frame.
    ///
    /// A failed read is not an error: it yields [`TickOutcome::ReadFailed`]
    /// and the session stays usable. Detector and filter failures are
    /// returned as errors, again without tearing the session down.
    pub fn tick(
        &mut self,
        settings: FilterSettings,
    ) -> Result<TickOutcome, Box<dyn std::error::Error>> {
        self.ticks += 1;

        let mut frame = match self.camera.read() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Frame read failed on tick {}: {e}", self.ticks);
                return Ok(TickOutcome::ReadFailed);
            }
        };

        let faces = self.detector.detect(&frame)?;
        let status = process(&mut frame, &faces, settings)?;
        log::debug!("Tick {}: {status}", self.ticks);

        self.last_frame = Some(frame.clone());
        Ok(TickOutcome::Processed { frame, status })
    }

    /// Most recent successfully processed frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.camera.resolution()
    }

    /// Releases the camera and returns the detector for the next session.
    pub fn stop(mut self) -> Box<dyn FaceDetector> {
        self.camera.release();
        log::info!("Live session stopped after {} tick(s)", self.ticks);
        self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter_mode::{FilterMode, PixelSize};
    use crate::shared::region::Region;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    /// Plays back a script of reads; `None` entries fail.
    struct ScriptedCamera {
        script: VecDeque<Option<Frame>>,
        released: Rc<Cell<bool>>,
    }

    impl CameraSource for ScriptedCamera {
        fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            self.script
                .pop_front()
                .flatten()
                .ok_or_else(|| "no frame".into())
        }

        fn release(&mut self) {
            self.released.set(true);
        }

        fn resolution(&self) -> (u32, u32) {
            (64, 48)
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
        calls: Arc<Mutex<usize>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }
    }

    // --- Helpers ---

    fn gradient(index: usize) -> Frame {
        let (w, h) = (64u32, 48u32);
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let v = ((x * 4 + y * 2) % 256) as u8;
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, w, h, 3, index)
    }

    fn camera(script: Vec<Option<Frame>>) -> (Box<dyn CameraSource>, Rc<Cell<bool>>) {
        let released = Rc::new(Cell::new(false));
        let cam = ScriptedCamera {
            script: script.into(),
            released: released.clone(),
        };
        (Box::new(cam), released)
    }

    fn detector(regions: Vec<Region>) -> (Box<dyn FaceDetector>, Arc<Mutex<usize>>) {
        let calls = Arc::new(Mutex::new(0));
        let det = StubDetector {
            regions,
            calls: calls.clone(),
        };
        (Box::new(det), calls)
    }

    fn pixelate() -> FilterSettings {
        FilterSettings::new(FilterMode::Pixelate, PixelSize::new(4))
    }

    // --- Tests ---

    #[test]
    fn test_tick_processes_frame_and_keeps_copy() {
        let (cam, _) = camera(vec![Some(gradient(0))]);
        let (det, _) = detector(vec![Region::new(8, 8, 16, 16)]);
        let mut session = LiveSession::new(cam, det);

        let outcome = session.tick(pixelate()).unwrap();
        let TickOutcome::Processed { frame, status } = outcome else {
            panic!("expected a processed frame");
        };
        assert_eq!(status, FrameStatus::Faces(1));
        assert_ne!(frame, gradient(0));
        assert_eq!(session.last_frame(), Some(&frame));
    }

    #[test]
    fn test_read_failure_skips_detection_and_recovers() {
        let (cam, _) = camera(vec![None, Some(gradient(1))]);
        let (det, calls) = detector(Vec::new());
        let mut session = LiveSession::new(cam, det);

        assert!(matches!(
            session.tick(FilterSettings::default()).unwrap(),
            TickOutcome::ReadFailed
        ));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(session.last_frame().is_none());

        let outcome = session.tick(FilterSettings::default()).unwrap();
        assert!(matches!(
            outcome,
            TickOutcome::Processed {
                status: FrameStatus::NoFaces,
                ..
            }
        ));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_failed_read_keeps_previous_last_frame() {
        let (cam, _) = camera(vec![Some(gradient(0)), None]);
        let (det, _) = detector(Vec::new());
        let mut session = LiveSession::new(cam, det);

        session.tick(FilterSettings::default()).unwrap();
        let kept = session.last_frame().cloned();
        session.tick(FilterSettings::default()).unwrap();

        assert!(kept.is_some());
        assert_eq!(session.last_frame().cloned(), kept);
    }

    #[test]
    fn test_detector_error_is_reported_but_session_survives() {
        let (cam, _) = camera(vec![Some(gradient(0)), None]);
        let mut session = LiveSession::new(cam, Box::new(FailingDetector));

        let err = session.tick(FilterSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "inference failed");
        assert!(matches!(
            session.tick(FilterSettings::default()).unwrap(),
            TickOutcome::ReadFailed
        ));
    }

    #[test]
    fn test_stop_releases_camera_and_returns_detector() {
        let (cam, released) = camera(vec![Some(gradient(0))]);
        let (det, calls) = detector(Vec::new());
        let session = LiveSession::new(cam, det);
        assert_eq!(session.resolution(), (64, 48));

        let mut detector = session.stop();
        assert!(released.get());

        detector.detect(&gradient(0)).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
