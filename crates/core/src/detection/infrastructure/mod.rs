mod execution_provider;
mod math;
pub mod model_resolver;
pub mod onnx_face_detector;
