use std::path::PathBuf;
use std::time::Duration;

use iced::widget::{button, column, container, image, pick_list, row, slider, text, Space};
use iced::{ContentFit, Element, Length, Subscription, Task, Theme};

use facecam_core::capture::domain::camera_source::CameraSource;
use facecam_core::capture::infrastructure::native_camera::NativeCamera;
use facecam_core::detection::domain::face_detector::FaceDetector;
use facecam_core::detection::infrastructure::onnx_face_detector::{
    OnnxFaceDetector, DEFAULT_CONFIDENCE,
};
use facecam_core::imaging::domain::image_writer::ImageWriter;
use facecam_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use facecam_core::pipeline::live_session::{LiveSession, TickOutcome};
use facecam_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, FRAMES_PER_SECOND, MAX_PIXEL_SIZE, MIN_PIXEL_SIZE,
};
use facecam_core::shared::frame::Frame;

use crate::settings::{Mode, Settings};
use crate::theme;
use crate::widgets::primary_button::primary_button;
use crate::workers::model_loader;

/// Opens a camera by device index. Swappable so the state machine can run
/// without hardware.
pub type CameraOpener = fn(u32) -> Result<Box<dyn CameraSource>, Box<dyn std::error::Error>>;

fn open_native_camera(index: u32) -> Result<Box<dyn CameraSource>, Box<dyn std::error::Error>> {
    Ok(Box::new(NativeCamera::open(index)?))
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    ModelResolved(Result<PathBuf, String>),
    StartCamera,
    StopCamera,
    Tick,
    ModeChanged(Mode),
    PixelSizeChanged(u32),
    ToggleTheme,
    SaveSnapshot,
    SnapshotPathSelected(Option<PathBuf>),
    DismissError,
    StartHovered(bool),
    Quit,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    LoadingModel,
    Ready,
    /// The face model could not be loaded; only Quit is offered.
    Fatal(String),
}

pub enum CameraState {
    Stopped,
    Running(LiveSession),
}

pub struct App {
    settings: Settings,
    settings_path: Option<PathBuf>,
    phase: Phase,
    /// Parked here while the camera is off; owned by the session while on.
    detector: Option<Box<dyn FaceDetector>>,
    camera: CameraState,
    open_camera: CameraOpener,
    display: Option<image::Handle>,
    last_frame: Option<Frame>,
    pending_snapshot: Option<Frame>,
    status: String,
    error: Option<String>,
    start_hovered: bool,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings_path = Settings::config_path();
        let settings = settings_path
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();
        (
            Self::with_parts(settings, settings_path, open_native_camera),
            model_loader::resolve_face_model(Message::ModelResolved),
        )
    }

    fn with_parts(
        settings: Settings,
        settings_path: Option<PathBuf>,
        open_camera: CameraOpener,
    ) -> Self {
        Self {
            settings,
            settings_path,
            phase: Phase::LoadingModel,
            detector: None,
            camera: CameraState::Stopped,
            open_camera,
            display: None,
            last_frame: None,
            pending_snapshot: None,
            status: "Loading face model...".to_string(),
            error: None,
            start_hovered: false,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ModelResolved(Ok(path)) => match OnnxFaceDetector::new(&path, DEFAULT_CONFIDENCE) {
                Ok(detector) => self.detector_ready(Box::new(detector)),
                Err(e) => self.fail(format!("Failed to load face model: {e}")),
            },
            Message::ModelResolved(Err(e)) => {
                self.fail(format!("Failed to obtain face model: {e}"));
            }
            Message::StartCamera => self.start_camera(),
            Message::StopCamera => self.stop_camera(),
            Message::Tick => self.tick(),
            Message::ModeChanged(mode) => {
                self.settings.mode = mode;
                self.persist();
            }
            Message::PixelSizeChanged(size) => {
                self.settings.pixel_size = size.clamp(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE);
                self.persist();
            }
            Message::ToggleTheme => {
                self.settings.appearance = self.settings.appearance.toggled();
                self.persist();
            }
            Message::SaveSnapshot => {
                let Some(frame) = self.snapshot_source().cloned() else {
                    return Task::none();
                };
                self.pending_snapshot = Some(frame);
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Save snapshot")
                            .set_file_name("facecam-snapshot.png")
                            .add_filter("PNG image", &["png"])
                            .add_filter("JPEG image", &["jpg", "jpeg"])
                            .save_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::SnapshotPathSelected,
                );
            }
            Message::SnapshotPathSelected(Some(path)) => {
                if let Some(frame) = self.pending_snapshot.take() {
                    match ImageFileWriter::new().write(&path, &frame) {
                        Ok(()) => self.status = format!("Snapshot saved to {}", path.display()),
                        Err(e) => {
                            log::warn!("Snapshot failed: {e}");
                            self.error = Some(format!("Could not save snapshot: {e}"));
                        }
                    }
                }
            }
            Message::SnapshotPathSelected(None) => {
                self.pending_snapshot = None;
            }
            Message::DismissError => {
                self.error = None;
            }
            Message::StartHovered(hovered) => {
                self.start_hovered = hovered;
            }
            Message::Quit => return iced::exit(),
        }
        Task::none()
    }

    fn detector_ready(&mut self, detector: Box<dyn FaceDetector>) {
        self.detector = Some(detector);
        self.phase = Phase::Ready;
        self.status = "Idle".to_string();
    }

    fn fail(&mut self, reason: String) {
        log::error!("{reason}");
        self.phase = Phase::Fatal(reason);
    }

    fn start_camera(&mut self) {
        if self.phase != Phase::Ready || matches!(self.camera, CameraState::Running(_)) {
            return;
        }
        let Some(detector) = self.detector.take() else {
            return;
        };

        match (self.open_camera)(DEFAULT_CAMERA_INDEX) {
            Ok(camera) => {
                self.camera = CameraState::Running(LiveSession::new(camera, detector));
                self.error = None;
                self.status = "Camera started".to_string();
            }
            Err(e) => {
                log::warn!("Could not open camera {DEFAULT_CAMERA_INDEX}: {e}");
                self.detector = Some(detector);
                self.error = Some(format!("Could not open camera: {e}"));
            }
        }
    }

    fn stop_camera(&mut self) {
        if let CameraState::Running(session) =
            std::mem::replace(&mut self.camera, CameraState::Stopped)
        {
            self.last_frame = session.last_frame().cloned();
            self.detector = Some(session.stop());
            self.status = "Stopped".to_string();
        }
    }

    fn tick(&mut self) {
        let CameraState::Running(session) = &mut self.camera else {
            return;
        };
        match session.tick(self.settings.filter_settings()) {
            Ok(TickOutcome::Processed { frame, status }) => {
                self.display = Some(frame_handle(&frame));
                self.status = status.to_string();
            }
            Ok(TickOutcome::ReadFailed) => {
                self.status = "Frame read failed".to_string();
            }
            Err(e) => {
                log::warn!("Frame processing failed: {e}");
                self.status = format!("Processing failed: {e}");
            }
        }
    }

    fn snapshot_source(&self) -> Option<&Frame> {
        match &self.camera {
            CameraState::Running(session) => session.last_frame(),
            CameraState::Stopped => self.last_frame.as_ref(),
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.settings_path {
            self.settings.save_to(path);
        }
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    pub fn view(&self) -> Element<'_, Message> {
        if let Phase::Fatal(reason) = &self.phase {
            return fatal_view(reason);
        }

        let running = matches!(self.camera, CameraState::Running(_));
        let can_start = self.phase == Phase::Ready && !running;

        let controls = row![
            primary_button(
                "Start Camera",
                can_start.then_some(Message::StartCamera),
                self.start_hovered,
                Message::StartHovered,
            ),
            button(text("Stop Camera"))
                .on_press_maybe(running.then_some(Message::StopCamera))
                .padding([8, 18])
                .style(button::danger),
            text("Mode"),
            pick_list(Mode::ALL, Some(self.settings.mode), Message::ModeChanged),
            text(format!("Pixel Size: {}", self.settings.pixel_size)),
            slider(
                MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE,
                self.settings.pixel_size,
                Message::PixelSizeChanged
            )
            .width(160),
            button(text("Toggle Theme"))
                .on_press(Message::ToggleTheme)
                .style(button::secondary),
            button(text("Save Snapshot"))
                .on_press_maybe(self.snapshot_source().map(|_| Message::SaveSnapshot))
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center);

        let video: Element<'_, Message> = match &self.display {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Camera is off"))
                .center(Length::Fill)
                .into(),
        };

        let status = text(format!("Status: {}", self.status))
            .size(13)
            .style(|theme: &Theme| text::Style {
                color: Some(theme::muted_color(theme)),
            });

        let mut content = column![controls, status].spacing(10);
        if let Some(error) = &self.error {
            content = content.push(
                row![
                    text(error.as_str()).style(text::danger),
                    Space::new().width(Length::Fill),
                    button(text("Dismiss"))
                        .on_press(Message::DismissError)
                        .style(button::text),
                ]
                .align_y(iced::Alignment::Center),
            );
        }
        content = content.push(video);

        container(content).padding(16).into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if matches!(self.camera, CameraState::Running(_)) {
            iced::time::every(Duration::from_millis(1000 / FRAMES_PER_SECOND))
                .map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }
}

fn fatal_view(reason: &str) -> Element<'_, Message> {
    container(
        column![
            text("FaceCam cannot start").size(20),
            text(reason).style(text::danger),
            button(text("Quit")).on_press(Message::Quit),
        ]
        .spacing(16)
        .align_x(iced::Alignment::Center),
    )
    .center(Length::Fill)
    .padding(24)
    .into()
}

fn frame_handle(frame: &Frame) -> image::Handle {
    image::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba())
}
