use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::Config;
use crate::tui::app::Tab;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let tab_bg = parse_color(&theme.tab_bg);
    let tab_fg = get_contrast_text_color(tab_bg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    // Padded spans on tab_bg make each title look like a box
    let pad = || Span::styled(" ", Style::default().bg(tab_bg));
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                pad(),
                Span::styled(tab.title(), Style::default().fg(tab_fg).bg(tab_bg)),
                pad(),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_tab.index())
        .style(Style::default().fg(fg).bg(bg))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" ")
        .padding("", "");

    f.render_widget(tabs, area);
}
