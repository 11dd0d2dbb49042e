use std::cmp;

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap};
use ratatui::Frame;
use ratskin::RatSkin;
use termimad::minimad::Text as MinimadText;

use crate::Config;
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::parse_color;
use crate::utils::{days_until, relative_day_label, today};

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

/// Detail view of an item as markdown
pub fn get_content_string(item: &SelectedItem, config: &Config) -> String {
    match item {
        SelectedItem::Person(p) => {
            let mut md = format!("**Name:** {}\n", p.name);
            md.push_str(&format!("**Geburtstag:** {}\n", p.birthday.as_deref().unwrap_or("-")));
            if !p.info.trim().is_empty() {
                md.push_str("\n**Info:**\n\n");
                md.push_str(&p.info);
                md.push('\n');
            }
            md
        }
        SelectedItem::Occasion(o) => {
            let mut md = format!("**Anlass:** {}\n", o.name);
            match o.date.as_deref() {
                Some(date) => {
                    let label = days_until(date, today()).map(relative_day_label).unwrap_or_default();
                    md.push_str(&format!("**Datum:** {} ({})\n", date, label));
                }
                None => md.push_str("**Datum:** -\n"),
            }
            md.push_str(&format!("**Person:** {}\n", or_dash(&o.person)));
            md.push_str(&format!("**Typ:** {}\n", o.occasion_type));
            md.push_str(&format!("**Status:** {}\n", if o.is_active { "aktiv" } else { "deaktiviert" }));
            if !o.info.trim().is_empty() {
                md.push_str(&format!("\n{}\n", o.info));
            }
            md
        }
        SelectedItem::Idea(i) => {
            let mut md = format!("**Person:** {}\n", i.person_name);
            md.push_str(&format!("**Anlass:** {}\n", or_dash(&i.occasion_name)));
            md.push_str(&format!("**Typ:** {}\n", i.idea_type));
            md.push_str(&format!("**Status:** {}\n", i.status));
            md.push_str(&format!("\n**Inhalt:**\n\n{}\n", i.content));
            md.push_str(&format!("\n*Zuletzt geändert: {}*\n", i.updated_at));
            md
        }
        SelectedItem::Gift(g) => {
            let mut md = format!("**Person:** {}\n", g.person_name);
            md.push_str(&format!("**Anlass:** {}\n", or_dash(&g.occasion_name)));
            md.push_str(&format!("**Datum:** {}\n", g.date));
            md.push_str(&format!("**Status:** {}\n", g.status));
            md.push_str(&format!("**Art:** {}\n", g.effective_kind()));
            if g.source_idea_id.is_some() {
                md.push_str("*Aus einer Geschenkidee übernommen*\n");
            }
            if !g.note.trim().is_empty() {
                md.push_str(&format!("\n**Notiz:**\n\n{}\n", g.note));
            }
            md
        }
        SelectedItem::Link(l) => {
            let expires = chrono::DateTime::from_timestamp_millis(l.record.expires_at)
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut md = format!("**Person:** {}\n", l.record.person_name);
            md.push_str(&format!("**Art:** {}\n", l.record.kind));
            md.push_str(&format!("**Status:** {}\n", l.state));
            md.push_str(&format!("**Gültig bis:** {}\n", expires));
            md.push_str(&format!("**Erstellt:** {}\n", l.record.created_at));
            md.push_str(&format!("\n**URL:**\n\n{}\n", l.url(&config.share)));
            md
        }
    }
}

pub fn render_item_view(f: &mut Frame, area: Rect, item: &SelectedItem, config: &Config, scroll_offset: usize) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Last column is reserved for the scrollbar
    let content_area = Rect::new(area.x, area.y, area.width - 1, area.height);
    let text_width = content_area.width.saturating_sub(2);
    let viewport_height = area.height.saturating_sub(2) as usize;

    let markdown = get_content_string(item, config);
    let lines: Vec<Line> = RatSkin::default()
        .parse(MinimadText::from(markdown.as_str()), text_width)
        .into_iter()
        .map(|line| {
            Line::from(
                line.spans
                    .into_iter()
                    .map(|span| Span::styled(span.content.to_string(), span.style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let total_lines = lines.len();
    let scroll = cmp::min(scroll_offset, total_lines.saturating_sub(viewport_height));
    let end = cmp::min(scroll + viewport_height, total_lines);
    let visible = Text::from(lines[scroll.min(end)..end].to_vec());

    let paragraph = Paragraph::new(visible)
        .block(Block::default().borders(Borders::ALL).title(item.kind_label()))
        .style(Style::default().fg(parse_color(&config.get_active_theme().fg)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, content_area);

    if total_lines > viewport_height {
        let bar_area = Rect::new(area.x + area.width - 1, area.y + 1, 1, area.height.saturating_sub(2));
        let mut state = ScrollbarState::new(total_lines)
            .viewport_content_length(viewport_height)
            .position(scroll);
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        f.render_stateful_widget(scrollbar, bar_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdeaStatus, IdeaType, GiftIdea, now_timestamp};

    #[test]
    fn idea_details_show_status_and_content() {
        let idea = GiftIdea {
            id: Some(1),
            person_id: 1,
            person_name: "Anna".to_string(),
            occasion_id: None,
            occasion_name: String::new(),
            idea_type: IdeaType::Link,
            content: "https://example.com/buch".to_string(),
            status: IdeaStatus::Besorgt,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        };
        let md = get_content_string(&SelectedItem::Idea(idea), &Config::default());
        assert!(md.contains("**Anlass:** -"));
        assert!(md.contains("**Typ:** link"));
        assert!(md.contains("**Status:** besorgt"));
        assert!(md.contains("https://example.com/buch"));
    }
}
