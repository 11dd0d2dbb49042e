use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::Config;
use crate::tui::widgets::color::parse_color;

pub fn render_filters_box(f: &mut Frame, area: Rect, summary: &str, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let title = format!(
        "Filter ({} / {} / {})",
        crate::utils::format_key_binding_for_display(&config.key_bindings.filter_timeframe),
        crate::utils::format_key_binding_for_display(&config.key_bindings.filter_type),
        crate::utils::format_key_binding_for_display(&config.key_bindings.filter_status),
    );
    let paragraph = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
