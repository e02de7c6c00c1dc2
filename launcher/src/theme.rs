//! Optional UI theme
//!
//! The theme is resolved into concrete colors here and pushed into the UI's
//! exported `Theme` global by the firmware. A theme that cannot be resolved
//! is reported and skipped, the UI then keeps the colors it was built with.

use core::fmt::{self, Display, Formatter};

use slint::Color;

/// Material palette hues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Red,
    Pink,
    Purple,
    DeepPurple,
    Indigo,
    Blue,
    LightBlue,
    Cyan,
    Teal,
    Green,
    LightGreen,
    Lime,
    Yellow,
    Amber,
    Orange,
    DeepOrange,
    Brown,
    BlueGrey,
    Grey,
}

impl Palette {
    /// Main (500) shade as 0xRRGGBB
    pub const fn main(self) -> u32 {
        match self {
            Palette::Red => 0xF44336,
            Palette::Pink => 0xE91E63,
            Palette::Purple => 0x9C27B0,
            Palette::DeepPurple => 0x673AB7,
            Palette::Indigo => 0x3F51B5,
            Palette::Blue => 0x2196F3,
            Palette::LightBlue => 0x03A9F4,
            Palette::Cyan => 0x00BCD4,
            Palette::Teal => 0x009688,
            Palette::Green => 0x4CAF50,
            Palette::LightGreen => 0x8BC34A,
            Palette::Lime => 0xCDDC39,
            Palette::Yellow => 0xFFEB3B,
            Palette::Amber => 0xFFC107,
            Palette::Orange => 0xFF9800,
            Palette::DeepOrange => 0xFF5722,
            Palette::Brown => 0x795548,
            Palette::BlueGrey => 0x607D8B,
            Palette::Grey => 0x9E9E9E,
        }
    }

    pub fn color(self) -> Color {
        rgb(self.main())
    }
}

const LIGHT_BACKGROUND: u32 = 0xF5F5F5;
const LIGHT_TEXT: u32 = 0x212121;
const DARK_BACKGROUND: u32 = 0x15171A;
const DARK_TEXT: u32 = 0xFFFFFF;

/// Smallest and largest built-in font size in px, sizes come in steps of 2
const FONT_SIZE_MIN: u8 = 8;
const FONT_SIZE_MAX: u8 = 48;

fn rgb(value: u32) -> Color {
    Color::from_rgb_u8((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Palette,
    pub secondary: Palette,
    pub dark: bool,
    /// Default font size in px
    pub font_size: u8,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        primary: Palette::Blue,
        secondary: Palette::Red,
        dark: false,
        font_size: 14,
    };

    pub fn resolve(&self) -> Result<ResolvedTheme, ThemeError> {
        if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&self.font_size) || self.font_size % 2 != 0
        {
            return Err(ThemeError::UnsupportedFontSize(self.font_size));
        }

        let (background, foreground) = if self.dark {
            (DARK_BACKGROUND, DARK_TEXT)
        } else {
            (LIGHT_BACKGROUND, LIGHT_TEXT)
        };

        Ok(ResolvedTheme {
            primary: self.primary.color(),
            secondary: self.secondary.color(),
            background: rgb(background),
            foreground: rgb(foreground),
            font_size: f32::from(self.font_size),
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTheme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    /// Logical pixels
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeError {
    UnsupportedFontSize(u8),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::UnsupportedFontSize(size) => write!(
                f,
                "no built-in font of size {} (even sizes {}..={})",
                size, FONT_SIZE_MIN, FONT_SIZE_MAX
            ),
        }
    }
}
