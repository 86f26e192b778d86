pub mod anonymize_image_use_case;
pub mod frame_processor;
pub mod live_session;
