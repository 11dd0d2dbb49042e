use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::Config;
use crate::dashboard::{DashboardData, KPI_WINDOW_DAYS, UPCOMING_WINDOW_DAYS};
use crate::tui::widgets::color::parse_color;
use crate::utils::relative_day_label;

/// Label/value pairs for the KPI row
pub fn kpi_cards(data: &DashboardData) -> [(String, usize); 4] {
    let k = &data.kpis;
    [
        ("Personen".to_string(), k.persons),
        (format!("Anlässe ({} Tage)", KPI_WINDOW_DAYS), k.upcoming_occasions),
        ("Offene Ideen".to_string(), k.open_ideas),
        ("Geplante Geschenke".to_string(), k.planned_gifts),
    ]
}

pub fn render_dashboard(f: &mut Frame, area: Rect, data: &DashboardData, user_label: &str, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let accent = parse_color(&theme.highlight_bg);

    let [kpi_area, list_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .areas(area);

    let cards = kpi_cards(data);
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(kpi_area);
    for ((label, value), card_area) in cards.iter().zip(card_areas.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                value.to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(label.as_str()),
        ])
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(fg));
        f.render_widget(card, *card_area);
    }

    let mut lines: Vec<Line> = data
        .upcoming
        .iter()
        .map(|u| {
            Line::from(vec![
                Span::styled(
                    format!("{:<9}", relative_day_label(u.days)),
                    Style::default().fg(accent),
                ),
                Span::raw(format!(
                    "{}  {}  {}",
                    u.occasion.date.as_deref().unwrap_or(""),
                    u.occasion.name,
                    u.occasion.person
                )),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(format!(
            "Keine Anlässe in den nächsten {} Tagen.",
            UPCOMING_WINDOW_DAYS
        )));
    }

    let upcoming = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Nächste Anlässe - {}", user_label)),
        )
        .style(Style::default().fg(fg));
    f.render_widget(upcoming, list_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Kpis;

    #[test]
    fn cards_follow_kpis() {
        let data = DashboardData {
            kpis: Kpis { persons: 3, upcoming_occasions: 1, open_ideas: 4, planned_gifts: 2 },
            upcoming: Vec::new(),
        };
        let cards = kpi_cards(&data);
        assert_eq!(cards[0], ("Personen".to_string(), 3));
        assert_eq!(cards[1].0, "Anlässe (30 Tage)");
        assert_eq!(cards[3].1, 2);
    }
}
