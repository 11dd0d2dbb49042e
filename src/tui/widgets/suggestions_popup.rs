use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::Config;
use crate::tui::app::SuggestionState;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

pub fn render_suggestions(f: &mut Frame, area: Rect, state: &mut SuggestionState, config: &Config) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let highlight_bg = parse_color(&theme.highlight_bg);

    let popup = popup_area(area, 70, 70);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Vorschläge für {}", state.person_name))
        .title_alignment(Alignment::Center)
        .style(base);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [list_area, reason_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(inner);

    if state.items.is_empty() {
        f.render_widget(Paragraph::new("Keine weiteren Vorschläge.").style(base), list_area);
        return;
    }

    let rows: Vec<ListItem> = state.items.iter().map(|s| ListItem::new(s.content.clone())).collect();
    let list = List::new(rows).style(base).highlight_style(
        Style::default()
            .fg(get_contrast_text_color(highlight_bg))
            .bg(highlight_bg)
            .add_modifier(Modifier::BOLD),
    );
    f.render_stateful_widget(list, list_area, &mut state.list_state);

    let reason = state
        .list_state
        .selected()
        .and_then(|i| state.items.get(i))
        .map(|s| s.reason.clone())
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(reason).style(base).wrap(Wrap { trim: true }),
        reason_area,
    );
}
