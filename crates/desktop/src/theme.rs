use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

pub fn resolve_theme(appearance: Appearance) -> Theme {
    let palette = match appearance {
        Appearance::Dark => dark_palette(),
        Appearance::Light => light_palette(),
    };
    Theme::custom("FaceCam", palette)
}

/// Dimmed text for secondary labels such as the status line.
pub fn muted_color(theme: &Theme) -> Color {
    let text = theme.extended_palette().background.base.text;
    Color { a: 0.7, ..text }
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x1c, 0x1c, 0x1e),
        text: color!(0xcc, 0xcc, 0xcc),
        primary: color!(0x5e, 0x9f, 0xf5),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf5, 0xf5, 0xf7),
        text: color!(0x1d, 0x1d, 0x1f),
        primary: color!(0x34, 0x78, 0xf6),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xff, 0x3b, 0x30),
    }
}
