/// 8-bit RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

/// Standard HSV to RGB conversion. `h` in degrees, `s` and `v` in [0, 1].
///
/// Hues that fall outside every sextant in [0, 300) land in the last one, so
/// callers passing arbitrary hues should clamp first.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let c = v * s;
    let x = c * (1. - ((h / 60.).rem_euclid(2.) - 1.).abs());
    let m = v - c;

    let (r, g, b) = if (0. ..60.).contains(&h) {
        (c, x, 0.)
    } else if (60. ..120.).contains(&h) {
        (x, c, 0.)
    } else if (120. ..180.).contains(&h) {
        (0., c, x)
    } else if (180. ..240.).contains(&h) {
        (0., x, c)
    } else if (240. ..300.).contains(&h) {
        (x, 0., c)
    } else {
        (c, 0., x)
    };

    Rgb::new(channel(r + m), channel(g + m), channel(b + m))
}

// Truncates toward zero, saturating at the ends of the byte range.
fn channel(value: f64) -> u8 {
    (value * 255.) as u8
}

/// Hue for a ball at height `y` on a canvas of `height` pixels.
///
/// Spans [0, 300) instead of the full wheel so the top and bottom of the
/// canvas don't both come out red.
pub fn height_hue(y: f64, height: f64, diameter: f64) -> f64 {
    let relative_height = height - y;
    let max_height = height - diameter;
    relative_height / max_height * 300.
}
