use std::fmt;

use crate::shared::constants::{DEFAULT_PIXEL_SIZE, MAX_PIXEL_SIZE, MIN_PIXEL_SIZE};

/// How a detected face region is anonymized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    Blur,
    Pixelate,
}

impl FilterMode {
    pub const ALL: &[FilterMode] = &[FilterMode::Blur, FilterMode::Pixelate];
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Blur => write!(f, "Blur"),
            FilterMode::Pixelate => write!(f, "Pixelate"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(FilterMode::Blur),
            "pixelate" => Ok(FilterMode::Pixelate),
            other => Err(format!("Mode must be 'blur' or 'pixelate', got '{other}'")),
        }
    }
}

/// Pixelation block edge in pixels, always within `2..=50`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelSize(u32);

impl PixelSize {
    /// Clamps `value` into the supported range.
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Block size actually used for a region `region_width` pixels wide.
    ///
    /// Never exceeds half the region width and never drops below 1, so the
    /// downscaled target is never empty.
    pub fn effective_for(self, region_width: u32) -> u32 {
        self.0.min(region_width / 2).max(1)
    }
}

impl Default for PixelSize {
    fn default() -> Self {
        Self(DEFAULT_PIXEL_SIZE)
    }
}

/// Processing parameters selected in the UI, passed explicitly every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterSettings {
    pub mode: FilterMode,
    pub pixel_size: PixelSize,
}

impl FilterSettings {
    pub fn new(mode: FilterMode, pixel_size: PixelSize) -> Self {
        Self { mode, pixel_size }
    }
}
