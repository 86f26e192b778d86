pub mod native_camera;
