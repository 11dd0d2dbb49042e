use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{Mode, SidebarState, Tab};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    dashboard_view::render_dashboard,
    entity_list::render_entity_list,
    filters_box::render_filters_box,
    help::render_help,
    item_view::render_item_view,
    status_bar::render_status_bar,
    suggestions_popup::render_suggestions,
    tabs::render_tabs,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Geschenke")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(outer, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    if app.ui.current_tab == Tab::Dashboard {
        // The dashboard has no list; it takes the whole content row
        let area = layout.sidebar_area.union(layout.main_area);
        render_dashboard(f, area, &app.data.dashboard, &app.user_label, &app.config);
    } else {
        let items = app.get_current_items();

        if app.ui.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
            let total = total_count(app);
            render_entity_list(
                f,
                layout.sidebar_area,
                &items,
                total,
                app.ui.current_tab.title(),
                &mut app.ui.list_state,
                &app.config,
                app.today,
            );
        }

        if app.ui.mode == Mode::Search {
            let paragraph = Paragraph::new(format!("Suche: {}", app.search.query))
                .block(Block::default().borders(Borders::ALL).title("Suche"))
                .style(Style::default().fg(fg));
            f.render_widget(paragraph, layout.main_area);
        } else if let Some(item) = items.get(app.ui.selected_index) {
            render_item_view(f, layout.main_area, item, &app.config, app.ui.item_view_scroll);
        } else {
            let paragraph = Paragraph::new("Keine Einträge")
                .block(Block::default().borders(Borders::ALL).title("Details"))
                .style(Style::default().fg(fg));
            f.render_widget(paragraph, layout.main_area);
        }
    }

    render_filters_box(f, layout.filters_area, &app.get_filter_summary(), &app.config);

    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if app.ui.mode == Mode::Suggestions {
        if let Some(state) = app.suggestions.as_mut() {
            render_suggestions(f, f.area(), state, &app.config);
        }
    }

    if let Some(ref item) = app.modals.delete_confirmation {
        render_confirm_delete(f, f.area(), item, app.modals.delete_modal_selection, &app.config);
    }

    let hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &hints, &app.config);
}

fn total_count(app: &App) -> usize {
    match app.ui.current_tab {
        Tab::Dashboard => 0,
        Tab::Persons => app.data.persons.len(),
        Tab::Occasions => app.data.occasions.len(),
        Tab::Ideas => app.data.ideas.len(),
        Tab::Gifts => match app.filter.gift_view {
            crate::tui::app::GiftView::Planned => app.data.gifts.len(),
            crate::tui::app::GiftView::Past => app.data.past_gifts.len(),
        },
        Tab::Links => app.data.links.len(),
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    if app.modals.delete_confirmation.is_some() {
        return vec!["Enter: Bestätigen".to_string(), "Esc: Abbrechen".to_string()];
    }
    match app.ui.mode {
        Mode::Help => vec![format!("Esc oder {}: Hilfe schließen", key(&kb.help))],
        Mode::Search => vec!["Enter: Übernehmen".to_string(), "Esc: Suche verwerfen".to_string()],
        Mode::Suggestions => vec![
            format!("{}: Übernehmen", key(&kb.select)),
            "↑/↓: Auswahl".to_string(),
            "Esc: Schließen".to_string(),
        ],
        Mode::View => {
            let mut hints = vec![format!("{}: Beenden", key(&kb.quit))];
            let tab_specific: Vec<(&String, &str)> = match app.ui.current_tab {
                Tab::Dashboard => vec![],
                Tab::Persons => vec![(&kb.share, "Teilen"), (&kb.suggest, "Vorschläge"), (&kb.delete, "Löschen")],
                Tab::Occasions => vec![(&kb.toggle_active, "Aktiv"), (&kb.delete, "Löschen")],
                Tab::Ideas => vec![
                    (&kb.cycle_status, "Status"),
                    (&kb.convert, "Übernehmen"),
                    (&kb.share, "Teilen"),
                    (&kb.delete, "Löschen"),
                ],
                Tab::Gifts => vec![(&kb.cycle_status, "Status"), (&kb.delete, "Löschen")],
                Tab::Links => vec![(&kb.share, "URL kopieren"), (&kb.delete, "Deaktivieren")],
            };
            hints.extend(tab_specific.iter().map(|(k, what)| format!("{}: {}", key(k), what)));
            hints.push(format!("{}: Suche", key(&kb.search)));
            hints.push(format!("{}: Hilfe", key(&kb.help)));
            hints
        }
    }
}
