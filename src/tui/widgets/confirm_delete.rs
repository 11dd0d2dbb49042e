use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::Config;
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

/// Question and the two choices for a pending delete
pub fn dialog_text(item: &SelectedItem) -> (String, [&'static str; 2]) {
    match item {
        SelectedItem::Link(_) => ("Diesen Link deaktivieren?".to_string(), ["Deaktivieren", "Abbrechen"]),
        other => (format!("{} wirklich löschen?", other.kind_label()), ["Löschen", "Abbrechen"]),
    }
}

pub fn render_confirm_delete(f: &mut Frame, area: Rect, item: &SelectedItem, selection: usize, config: &Config) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let highlight_bg = parse_color(&theme.highlight_bg);
    let selected = Style::default().fg(get_contrast_text_color(highlight_bg)).bg(highlight_bg);

    let popup = popup_area(area, 50, 35);
    f.render_widget(Clear, popup);

    let (question, options) = dialog_text(item);
    let mut lines = vec![
        Line::from(Span::styled(question, base)),
        Line::from(""),
        Line::from(Span::styled(item.label(), base)),
        Line::from(""),
    ];
    for (i, option) in options.iter().enumerate() {
        let (prefix, style) = if i == selection { ("> ", selected) } else { ("  ", base) };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("↑↓ wählen, Enter bestätigen, Esc abbrechen", base)));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Bestätigen")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}
