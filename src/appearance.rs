//! Key colors and label styling. Everything here is a pure function of the
//! key type and the display flags.

use crate::model::KeyType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::gray(1.0);
    pub const BLACK: Color = Color::gray(0.0);
    pub const GRAY: Color = Color::gray(0.5);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(level: f32) -> Self {
        Self::rgba(level, level, level, 1.0)
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Hue in degrees, saturation and brightness in `0..=1`.
    pub fn hsba(hue: f32, saturation: f32, brightness: f32, a: f32) -> Self {
        let h = (hue.rem_euclid(360.0)) / 60.0;
        let c = brightness * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = brightness - c;
        Self::rgba(r + m, g + m, b + m, a)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

struct Palette;

impl Palette {
    fn regular_key(dark_mode: bool, solid_color_mode: bool) -> Color {
        match (dark_mode, solid_color_mode) {
            (false, _) => Color::WHITE,
            (true, false) => Color::WHITE.with_alpha(0.3),
            (true, true) => Color::rgb8(83, 83, 83),
        }
    }

    fn special_key(dark_mode: bool, solid_color_mode: bool) -> Color {
        match (dark_mode, solid_color_mode) {
            (false, false) => Color::rgb8(203, 206, 215),
            (false, true) => Color::rgb8(177, 177, 177),
            (true, false) => Color::GRAY.with_alpha(0.3),
            (true, true) => Color::rgb8(45, 45, 45),
        }
    }

    fn submit_key(dark_mode: bool, solid_color_mode: bool) -> Color {
        Self::special_key(dark_mode, solid_color_mode)
    }

    fn popup(dark_mode: bool, solid_color_mode: bool) -> Color {
        match (dark_mode, solid_color_mode) {
            (false, _) => Self::regular_key(false, false),
            (true, false) => Color::GRAY,
            (true, true) => Self::regular_key(true, true),
        }
    }

    fn dark_shift_key_down() -> Color {
        Color::rgb8(214, 220, 208)
    }

    fn text(dark_mode: bool) -> Color {
        if dark_mode {
            Color::WHITE
        } else {
            Color::BLACK
        }
    }

    fn under(dark_mode: bool) -> Color {
        if dark_mode {
            Color::rgba(38.6 / 255.0, 18.0 / 255.0, 39.3 / 255.0, 0.4)
        } else {
            Color::hsba(220.0, 0.04, 0.56, 1.0)
        }
    }

    fn border(dark_mode: bool) -> Color {
        if dark_mode {
            Color::CLEAR
        } else {
            Color::hsba(214.0, 0.04, 0.65, 1.0)
        }
    }
}

/// Colors of one key view. `None` pressed colors mean "no change when pressed".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyAppearance {
    pub color: Color,
    pub down_color: Option<Color>,
    pub text_color: Color,
    pub down_text_color: Option<Color>,
    pub popup_color: Color,
    pub under_color: Color,
    pub border_color: Color,
}

impl Default for KeyAppearance {
    fn default() -> Self {
        key_appearance(KeyType::Other, false, false, false)
    }
}

pub fn key_appearance(
    kind: KeyType,
    dark_mode: bool,
    solid_color_mode: bool,
    is_pad: bool,
) -> KeyAppearance {
    let regular = Palette::regular_key(dark_mode, solid_color_mode);
    let special = Palette::special_key(dark_mode, solid_color_mode);
    let text = Palette::text(dark_mode);

    let (color, down_color, text_color, down_text_color) = match kind {
        KeyType::Character | KeyType::SpecialCharacter | KeyType::Period => {
            let down = is_pad.then_some(special);
            (regular, down, text, None)
        }
        KeyType::Space => (regular, Some(special), text, None),
        KeyType::Shift => {
            let down = if dark_mode {
                Palette::dark_shift_key_down()
            } else {
                Palette::regular_key(false, solid_color_mode)
            };
            (special, Some(down), Color::WHITE, Some(Color::BLACK))
        }
        KeyType::Backspace => {
            let down_text = (!dark_mode).then_some(Color::BLACK);
            (special, Some(regular), Color::WHITE, down_text)
        }
        KeyType::ModeChange => (special, None, text, None),
        KeyType::Return | KeyType::KeyboardChange => (
            Palette::submit_key(dark_mode, solid_color_mode),
            Some(regular),
            text,
            None,
        ),
        KeyType::Other => (special, None, text, None),
    };

    KeyAppearance {
        color,
        down_color,
        text_color,
        down_text_color,
        popup_color: Palette::popup(dark_mode, solid_color_mode),
        under_color: Palette::under(dark_mode),
        border_color: Palette::border(dark_mode),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub font_size: f32,
    pub adjusts_to_fit: bool,
    pub inset: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        label_style(KeyType::Character)
    }
}

pub fn label_style(kind: KeyType) -> LabelStyle {
    match kind {
        KeyType::ModeChange | KeyType::Space | KeyType::Return => LabelStyle {
            font_size: 16.0,
            adjusts_to_fit: true,
            inset: if kind == KeyType::ModeChange { 3.0 } else { 0.0 },
        },
        _ => LabelStyle {
            font_size: 22.0,
            adjusts_to_fit: false,
            inset: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsb_gray_has_equal_channels() {
        let c = Color::hsba(0.0, 0.0, 0.5, 1.0);
        assert_eq!((c.r, c.g, c.b), (0.5, 0.5, 0.5));
    }

    #[test]
    fn hex_encodes_alpha() {
        assert_eq!(Color::WHITE.with_alpha(0.0).to_hex(), "#ffffff00");
        assert_eq!(Color::rgb8(203, 206, 215).to_hex(), "#cbced7ff");
    }
}
