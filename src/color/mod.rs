mod palette;

pub use palette::{BLACK, BLUE, GREEN, ORANGE, PURPLE, RED, WHITE};
pub use smart_leds::hsv::hsv2rgb;
use smart_leds::{RGB8, hsv::Hsv as HSV};

use crate::math8::scale8;

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Scale every channel of a color by `level` (0-255 = 0.0-1.0)
#[inline]
pub const fn dim(color: Rgb, level: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, level),
        g: scale8(color.g, level),
        b: scale8(color.b, level),
    }
}

/// Fill all LEDs with one color
pub fn fill(leds: &mut [Rgb], color: Rgb) {
    for led in leds {
        *led = color;
    }
}
