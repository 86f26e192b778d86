use ort::execution_providers::ExecutionProviderDispatch;

/// Hardware-accelerated providers to try for face inference on this platform.
///
/// ONNX Runtime silently falls back to CPU when a listed provider cannot be
/// registered, so an empty list simply means "CPU only".
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    let providers = vec![ort::execution_providers::CoreMLExecutionProvider::default().build()];
    #[cfg(target_os = "windows")]
    let providers = vec![ort::execution_providers::DirectMLExecutionProvider::default().build()];
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let providers = Vec::new();

    log::debug!("Requesting {} accelerated execution provider(s)", providers.len());
    providers
}
