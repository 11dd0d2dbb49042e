use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup = popup_area(area, 64, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Hilfe - Tastenbelegung")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let sections: [(&str, Vec<(String, &str)>); 4] = [
        (
            "Navigation",
            vec![
                (format!("{} / {}", key(&kb.tab_left), key(&kb.tab_right)), "Tab wechseln"),
                (format!("{} / {} / ↑ / ↓", key(&kb.list_up), key(&kb.list_down)), "Liste"),
                (key(&kb.select), "Details scrollen zurücksetzen"),
                (key(&kb.toggle_sidebar), "Liste ein-/ausblenden"),
            ],
        ),
        (
            "Aktionen",
            vec![
                (key(&kb.cycle_status), "Status weiterschalten (Ideen, Geschenke)"),
                (key(&kb.toggle_active), "Anlass aktivieren/deaktivieren"),
                (key(&kb.convert), "Idee als Geschenk übernehmen"),
                (key(&kb.share), "Link erzeugen und kopieren (Personen, Ideen, Links)"),
                (key(&kb.suggest), "Vorschläge für Person"),
                (key(&kb.delete), "Löschen (Links: deaktivieren)"),
                (key(&kb.refresh), "Neu laden"),
            ],
        ),
        (
            "Filter",
            vec![
                (key(&kb.search), "Suche"),
                (key(&kb.filter_timeframe), "Zeitraum (Anlässe)"),
                (key(&kb.filter_type), "Typ / Geburtstag / Geplant-Vergangen"),
                (key(&kb.filter_status), "Status (Anlässe, Ideen)"),
            ],
        ),
        (
            "Allgemein",
            vec![(key(&kb.help), "Hilfe"), (key(&kb.quit), "Beenden")],
        ),
    ];

    let mut text = String::new();
    for (title, rows) in sections {
        text.push_str(title);
        text.push_str(":\n");
        for (keys, what) in rows {
            text.push_str(&format!("  {}: {}\n", keys, what));
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_configured_keys() {
        let mut config = Config::default();
        config.key_bindings.share = "x".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("  x: Link erzeugen"));
        assert!(text.contains("  q: Beenden"));
        assert!(text.starts_with("Navigation:"));
    }
}
