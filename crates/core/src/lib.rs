pub mod capture;
pub mod detection;
pub mod filtering;
pub mod imaging;
pub mod overlay;
pub mod pipeline;
pub mod shared;
