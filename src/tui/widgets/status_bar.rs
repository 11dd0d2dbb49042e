use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::truncate_chars;

const SEPARATOR: &str = " • ";

/// Join as many hints as fit into `max_width`, ending in "..." when some are dropped
pub fn fit_hints(hints: &[String], max_width: usize) -> String {
    let mut out = String::new();
    for hint in hints {
        let extra = if out.is_empty() { 0 } else { SEPARATOR.chars().count() };
        if out.chars().count() + extra + hint.chars().count() > max_width {
            if out.is_empty() {
                return truncate_chars(hint, max_width);
            }
            if out.chars().count() + 3 <= max_width {
                out.push_str("...");
            } else {
                out = truncate_chars(&out, max_width);
            }
            return out;
        }
        if !out.is_empty() {
            out.push_str(SEPARATOR);
        }
        out.push_str(hint);
    }
    out
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            let highlight_bg = parse_color(&theme.highlight_bg);
            (
                truncate_chars(msg, width),
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_hints(key_hints, width),
            Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Beenden".to_string(), "/: Suche".to_string(), "F1: Hilfe".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_hints(&hints(), 80), "q: Beenden • /: Suche • F1: Hilfe");
    }

    #[test]
    fn overflow_is_marked() {
        let out = fit_hints(&hints(), 25);
        assert_eq!(out, "q: Beenden • /: Suche...");
        assert!(out.chars().count() <= 25);
    }

    #[test]
    fn single_long_hint_is_truncated() {
        assert_eq!(fit_hints(&hints(), 6), "q: ...");
    }
}
