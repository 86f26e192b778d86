use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use facecam_core::capture::domain::camera_source::CameraSource;
use facecam_core::capture::infrastructure::native_camera::NativeCamera;
use facecam_core::detection::domain::face_detector::FaceDetector;
use facecam_core::detection::infrastructure::model_resolver;
use facecam_core::detection::infrastructure::onnx_face_detector::{
    OnnxFaceDetector, DEFAULT_CONFIDENCE,
};
use facecam_core::filtering::domain::filter_mode::{FilterMode, FilterSettings, PixelSize};
use facecam_core::imaging::domain::image_writer::ImageWriter;
use facecam_core::imaging::infrastructure::image_file_reader::{is_supported_image, ImageFileReader};
use facecam_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use facecam_core::pipeline::anonymize_image_use_case::AnonymizeImageUseCase;
use facecam_core::pipeline::live_session::{LiveSession, TickOutcome};
use facecam_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_PIXEL_SIZE, FACE_MODEL_NAME, FACE_MODEL_URL, MAX_PIXEL_SIZE,
    MIN_PIXEL_SIZE,
};

/// Reads after warm-up before a snapshot gives up on the camera.
const SNAPSHOT_ATTEMPTS: usize = 20;

/// Blur or pixelate faces in still images and single webcam shots.
#[derive(Parser)]
#[command(name = "facecam", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Anonymize faces in an image file.
    Image {
        /// Input image.
        input: PathBuf,
        /// Output image; the format follows the extension.
        output: PathBuf,
        #[command(flatten)]
        opts: ProcessingArgs,
    },
    /// Capture one frame from the webcam, anonymize it and save it.
    Snapshot {
        /// Output image; the format follows the extension.
        output: PathBuf,
        /// Camera device index.
        #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
        device: u32,
        /// Frames to discard while the camera adjusts exposure.
        #[arg(long, default_value = "10")]
        warmup: usize,
        #[command(flatten)]
        opts: ProcessingArgs,
    },
}

#[derive(Args)]
struct ProcessingArgs {
    /// Filter applied to each face: blur or pixelate.
    #[arg(long, default_value = "blur")]
    mode: FilterMode,

    /// Pixelation block size in pixels.
    #[arg(long, default_value_t = DEFAULT_PIXEL_SIZE)]
    pixel_size: u32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Use this ONNX face model instead of the cached download.
    #[arg(long)]
    model: Option<PathBuf>,
}

impl ProcessingArgs {
    fn settings(&self) -> FilterSettings {
        FilterSettings::new(self.mode, PixelSize::new(self.pixel_size))
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli.command)?;

    match cli.command {
        Command::Image {
            input,
            output,
            opts,
        } => run_image(&input, &output, &opts),
        Command::Snapshot {
            output,
            device,
            warmup,
            opts,
        } => run_snapshot(&output, device, warmup, &opts),
    }
}

fn run_image(
    input: &Path,
    output: &Path,
    opts: &ProcessingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let detector = build_detector(opts)?;
    let mut use_case = AnonymizeImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        detector,
        opts.settings(),
    );
    let status = use_case.execute(input, output)?;
    println!("{status}");
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_snapshot(
    output: &Path,
    device: u32,
    warmup: usize,
    opts: &ProcessingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let detector = build_detector(opts)?;
    let mut camera = NativeCamera::open(device)?;
    for _ in 0..warmup {
        if let Err(e) = camera.read() {
            log::debug!("Warm-up read failed: {e}");
        }
    }

    let mut session = LiveSession::new(Box::new(camera), detector);
    let settings = opts.settings();
    let mut captured = None;
    for _ in 0..SNAPSHOT_ATTEMPTS {
        if let TickOutcome::Processed { frame, status } = session.tick(settings)? {
            captured = Some((frame, status));
            break;
        }
    }
    session.stop();

    let (frame, status) =
        captured.ok_or_else(|| format!("Camera {device} produced no frames"))?;
    ImageFileWriter::new().write(output, &frame)?;
    println!("{status}");
    log::info!("Snapshot written to {}", output.display());
    Ok(())
}

fn build_detector(opts: &ProcessingArgs) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let model_path = match &opts.model {
        Some(path) => model_resolver::resolve_explicit(path)?,
        None => {
            log::info!("Resolving model: {FACE_MODEL_NAME}");
            let bundled = model_resolver::bundled_model_dir();
            let path = model_resolver::resolve(
                FACE_MODEL_NAME,
                FACE_MODEL_URL,
                bundled.as_deref(),
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };
    Ok(Box::new(OnnxFaceDetector::new(&model_path, opts.confidence)?))
}

fn validate(command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    let opts = match command {
        Command::Image {
            input,
            output,
            opts,
        } => {
            if !input.exists() {
                return Err(format!("Input file not found: {}", input.display()).into());
            }
            if !is_supported_image(input) {
                return Err(format!("Unsupported input image: {}", input.display()).into());
            }
            validate_output(output)?;
            opts
        }
        Command::Snapshot { output, opts, .. } => {
            validate_output(output)?;
            opts
        }
    };

    if !(MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE).contains(&opts.pixel_size) {
        return Err(format!(
            "Pixel size must be between {MIN_PIXEL_SIZE} and {MAX_PIXEL_SIZE}, got {}",
            opts.pixel_size
        )
        .into());
    }
    if !(0.0..=1.0).contains(&opts.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            opts.confidence
        )
        .into());
    }
    Ok(())
}

fn validate_output(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !is_supported_image(output) {
        return Err(format!(
            "Output must be an image file (.png, .jpg, ...), got {}",
            output.display()
        )
        .into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("facecam").chain(args.iter().copied()))
    }

    fn snapshot(extra: &[&str]) -> Command {
        let mut args = vec!["snapshot", "shot.png"];
        args.extend_from_slice(extra);
        parse(&args).unwrap().command
    }

    #[test]
    fn test_image_defaults() {
        let cli = parse(&["image", "in.png", "out.png"]).unwrap();
        let Command::Image { opts, .. } = cli.command else {
            panic!("expected image command");
        };
        assert_eq!(opts.mode, FilterMode::Blur);
        assert_eq!(opts.pixel_size, DEFAULT_PIXEL_SIZE);
        assert_eq!(opts.confidence, DEFAULT_CONFIDENCE);
        assert!(opts.model.is_none());
    }

    #[test]
    fn test_snapshot_defaults() {
        let Command::Snapshot { device, warmup, .. } = snapshot(&[]) else {
            panic!("expected snapshot command");
        };
        assert_eq!(device, DEFAULT_CAMERA_INDEX);
        assert_eq!(warmup, 10);
    }

    #[rstest]
    #[case("pixelate", FilterMode::Pixelate)]
    #[case("Blur", FilterMode::Blur)]
    fn test_mode_parsing(#[case] value: &str, #[case] expected: FilterMode) {
        let Command::Snapshot { opts, .. } = snapshot(&["--mode", value]) else {
            panic!("expected snapshot command");
        };
        assert_eq!(opts.mode, expected);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(parse(&["snapshot", "shot.png", "--mode", "sepia"]).is_err());
    }

    #[rstest]
    #[case("2", true)]
    #[case("50", true)]
    #[case("1", false)]
    #[case("51", false)]
    fn test_pixel_size_range(#[case] value: &str, #[case] ok: bool) {
        let command = snapshot(&["--pixel-size", value]);
        assert_eq!(validate(&command).is_ok(), ok);
    }

    #[rstest]
    #[case("0.0", true)]
    #[case("1.0", true)]
    #[case("1.5", false)]
    #[case("-0.1", false)]
    fn test_confidence_range(#[case] value: &str, #[case] ok: bool) {
        let command = snapshot(&[&format!("--confidence={value}")]);
        assert_eq!(validate(&command).is_ok(), ok);
    }

    #[test]
    fn test_output_must_be_an_image() {
        let command = parse(&["snapshot", "clip.mp4"]).unwrap().command;
        assert!(validate(&command).is_err());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let command = parse(&["image", "/nonexistent/in.png", "out.png"])
            .unwrap()
            .command;
        let err = validate(&command).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_settings_follow_arguments() {
        let Command::Snapshot { opts, .. } = snapshot(&["--mode", "pixelate", "--pixel-size", "7"])
        else {
            panic!("expected snapshot command");
        };
        let settings = opts.settings();
        assert_eq!(settings.mode, FilterMode::Pixelate);
        assert_eq!(settings.pixel_size.get(), 7);
    }
}
