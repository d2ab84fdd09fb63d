//! RGB triples and hex decoding used to cross-check catalog entries.

use std::fmt;

/// An 8-bit per channel RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a triple from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

/// Decode a `#rrggbb` (or bare `rrggbb`) code into a triple.
///
/// Returns `None` when the code, once the optional leading `#` is stripped, is
/// not exactly six hexadecimal digits.
pub fn decode_hex(code: &str) -> Option<Rgb> {
    let digits = code.strip_prefix('#').unwrap_or(code);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Render an optional decoded triple the way warnings print it.
pub(crate) struct Decoded(pub Option<Rgb>);

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rgb) => rgb.fmt(f),
            None => f.write_str("none"),
        }
    }
}
