//! Viewer settings entered as text

use lidarview_core::{Error, Result};

/// Background color used until a user picks another
pub const DEFAULT_BACKGROUND: [u8; 3] = [0, 0, 0];

/// Parse a `#RRGGBB` color
pub fn parse_hex_color(text: &str) -> Result<[u8; 3]> {
    let invalid = || Error::InvalidInput(format!("'{}' is not a #RRGGBB color", text));
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Format a color as `#RRGGBB`
pub fn format_hex_color(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Color as normalized floats for a clear color
pub fn color_to_rgb_f32(color: [u8; 3]) -> [f32; 3] {
    color.map(|c| f32::from(c) / 255.0)
}
