/// Parse `#RRGGBB` (leading `#` optional) into RGB bytes. Anything else is white.
pub fn parse_hex_color(hex: &str) -> [u8; 3] {
    const WHITE: [u8; 3] = [255, 255, 255];

    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return WHITE;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => [r, g, b],
        _ => WHITE,
    }
}

/// RGB in the 0-1 range used by PDF color operators
pub fn pdf_rgb(hex: &str) -> [f32; 3] {
    parse_hex_color(hex).map(|c| c as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_colors() {
        assert_eq!(parse_hex_color("#FF8000"), [255, 128, 0]);
        assert_eq!(parse_hex_color("00ff7f"), [0, 255, 127]);
    }

    #[test]
    fn test_malformed_colors_are_white() {
        for bad in ["", "#", "#FFF", "#GGGGGG", "red", "#12345678", "#ÄÄÄ"] {
            assert_eq!(parse_hex_color(bad), [255, 255, 255], "{bad:?}");
        }
    }

    #[test]
    fn test_pdf_rgb_scales_channels() {
        assert_eq!(pdf_rgb("#000000"), [0.0, 0.0, 0.0]);
        assert_eq!(pdf_rgb("#FFFFFF"), [1.0, 1.0, 1.0]);
    }
}
