use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::Config;
use crate::occasions::occasion_days_until;
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::{get_contrast_text_color, link_state_color, parse_color, status_color};
use crate::utils::{relative_day_label, truncate_chars};

/// Leading badge text and color for a row
fn badge(item: &SelectedItem, today: NaiveDate) -> Option<(String, ratatui::style::Color)> {
    match item {
        SelectedItem::Idea(i) => Some((i.status.to_string(), status_color(i.status.as_str()))),
        SelectedItem::Gift(g) => Some((g.status.to_string(), status_color(g.status.as_str()))),
        SelectedItem::Link(l) => Some((l.state.to_string(), link_state_color(l.state))),
        SelectedItem::Occasion(o) => occasion_days_until(o, today)
            .map(|d| (relative_day_label(d), status_color(if o.is_active { "offen" } else { "" }))),
        SelectedItem::Person(_) => None,
    }
}

/// Row text without the badge
pub fn row_text(item: &SelectedItem) -> String {
    match item {
        SelectedItem::Person(p) => match &p.birthday {
            Some(b) => format!("{} ({})", p.name, b),
            None => p.name.clone(),
        },
        SelectedItem::Occasion(o) => {
            let marker = if o.is_active { "" } else { " [aus]" };
            format!("{}{} {}", o.name, marker, o.date.as_deref().unwrap_or("")).trim_end().to_string()
        }
        SelectedItem::Gift(g) => format!("{} {} {}", g.date, g.person_name, g.note).trim_end().to_string(),
        other => other.label(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_entity_list(
    f: &mut Frame,
    area: Rect,
    items: &[SelectedItem],
    total_count: usize,
    title: &str,
    list_state: &mut ListState,
    config: &Config,
    today: NaiveDate,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = if theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&theme.highlight_fg)
    };

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let mut spans = Vec::new();
            let mut used = 0;
            if let Some((text, color)) = badge(item, today) {
                used = text.chars().count() + 3;
                spans.push(Span::styled(format!("[{}] ", text), Style::default().fg(color)));
            }
            spans.push(Span::raw(truncate_chars(&row_text(item), max_width.saturating_sub(used))));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if items.len() == total_count {
        format!("{} ({})", title, total_count)
    } else {
        format!("{} ({}/{})", title, items.len(), total_count)
    };

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Occasion, OccasionType, Person};

    #[test]
    fn rows_show_the_essentials() {
        let mut p = Person::new("Anna".to_string());
        assert_eq!(row_text(&SelectedItem::Person(p.clone())), "Anna");
        p.birthday = Some("1990-05-01".to_string());
        assert_eq!(row_text(&SelectedItem::Person(p)), "Anna (1990-05-01)");

        let mut o = Occasion::new("Weihnachten".to_string(), OccasionType::Fixed);
        o.is_active = false;
        assert_eq!(row_text(&SelectedItem::Occasion(o.clone())), "Weihnachten [aus]");

        o.date = Some("2024-12-24".to_string());
        let today = NaiveDate::from_ymd_opt(2024, 12, 14).unwrap();
        let (label, _) = badge(&SelectedItem::Occasion(o), today).unwrap();
        assert_eq!(label, "in 10d");
    }
}
