use ratatui::style::Color;

use crate::share::LinkState;

const NAMED: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
];

/// Parse a theme color: a name from the table above (`grey` spellings
/// accepted), `#RRGGBB`, `#RGB` or `rgb(r, g, b)`. Unknown input is white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase().replace("grey", "gray");

    if let Some((_, c)) = NAMED.iter().find(|(name, _)| *name == s) {
        return *c;
    }
    if s == "lightgray" {
        return Color::Gray;
    }

    let parsed = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        parse_rgb(body)
    } else {
        None
    };
    parsed.unwrap_or(Color::White)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            // #abc expands to #aabbcc
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

fn parse_rgb(body: &str) -> Option<Color> {
    let parts: Vec<u8> = body
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Inverse of `parse_color` for named and RGB colors
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(_) => "indexed".to_string(),
        Color::Reset => "reset".to_string(),
        other => NAMED
            .iter()
            .find(|(_, c)| c == other)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "white".to_string()),
    }
}

/// WCAG relative luminance of an RGB color
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let lin = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)
}

/// Black or white text, whichever reads better on `background`
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => luminance(r, g, b) < 0.5,
        // Terminals render plain gray as a light color
        Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray => true,
        _ => false,
    };
    if dark { Color::White } else { Color::Black }
}

/// Badge color for idea and gift statuses
pub fn status_color(status: &str) -> Color {
    match status {
        "offen" => Color::Yellow,
        "besorgt" => Color::Cyan,
        "erledigt" | "ueberreicht" => Color::Green,
        _ => Color::Gray,
    }
}

pub fn link_state_color(state: LinkState) -> Color {
    match state {
        LinkState::Active => Color::Green,
        LinkState::Inactive => Color::DarkGray,
        LinkState::Expired => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_hex_and_rgb() {
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("darkgrey"), Color::DarkGray);
        assert_eq!(parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("#0f0"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("rgb(1,2)"), Color::White);
        assert_eq!(parse_color("chartreuse"), Color::White);
    }

    #[test]
    fn display_round_trips_for_theme_values() {
        assert_eq!(format_color_for_display(&Color::LightBlue), "lightblue");
        assert_eq!(format_color_for_display(&Color::Rgb(0, 10, 255)), "#000AFF");
    }

    #[test]
    fn contrast_text() {
        assert_eq!(get_contrast_text_color(Color::Black), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(250, 250, 250)), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(20, 20, 60)), Color::White);
    }

    #[test]
    fn status_badges() {
        assert_eq!(status_color("ueberreicht"), Color::Green);
        assert_eq!(status_color("offen"), Color::Yellow);
        assert_eq!(link_state_color(LinkState::Expired), Color::Red);
    }
}
