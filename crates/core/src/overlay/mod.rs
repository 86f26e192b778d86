//! Text drawn directly into frame pixels.

pub mod font;
pub mod text;
