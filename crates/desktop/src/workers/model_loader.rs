use std::path::PathBuf;
use std::thread;

use iced::futures::channel::oneshot;
use iced::Task;

use facecam_core::detection::infrastructure::model_resolver;
use facecam_core::shared::constants::{FACE_MODEL_NAME, FACE_MODEL_URL};

/// Resolves the face model on a background thread and reports the path, or
/// the failure text, through `on_done`.
///
/// Resolution may download the model with a blocking HTTP client, which must
/// not run on the async executor that drives the UI.
pub fn resolve_face_model<Message: Send + 'static>(
    on_done: fn(Result<PathBuf, String>) -> Message,
) -> Task<Message> {
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        let _ = tx.send(resolve());
    });

    Task::perform(
        async move {
            rx.await
                .unwrap_or_else(|_| Err("model resolver stopped unexpectedly".to_string()))
        },
        on_done,
    )
}

fn resolve() -> Result<PathBuf, String> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let bundled = model_resolver::bundled_model_dir();
    model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        bundled.as_deref(),
        Some(Box::new(|downloaded, total| {
            log::debug!("Model download: {downloaded}/{total} bytes");
        })),
    )
    .map_err(|e| e.to_string())
}
