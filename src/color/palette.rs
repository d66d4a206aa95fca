use super::Rgb;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Participant 1
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
/// Participant 2
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
/// Ready indicator
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
/// Stale-link indicator
pub const ORANGE: Rgb = Rgb {
    r: 255,
    g: 100,
    b: 0,
};
/// Offline / headset-off indicator
pub const PURPLE: Rgb = Rgb {
    r: 128,
    g: 0,
    b: 128,
};
