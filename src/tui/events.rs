use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::error::ServiceError;
use crate::tui::App;
use crate::tui::app::{Mode, SidebarState, copy_to_clipboard};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, parse_key_binding};

/// Restores the terminal when dropped, so a panic does not leave it in raw
/// mode on the alternate screen.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the drop afterwards is a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let (min_w, min_h) = (Layout::MIN_WIDTH + 2, Layout::MIN_HEIGHT + 2);
    if width < min_w || height < min_h {
        return Err(TuiError::RenderError(format!(
            "Terminal zu klein: {}x{}, mindestens {}x{} nötig.",
            width, height, min_w, min_h
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    tracing::info!(uid = %app.uid, "tui started");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(50))? {
            // Press only; Windows also reports releases
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::info!("tui stopped");
    Ok(())
}

fn binding(key_str: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key_str).map_err(TuiError::KeyBindingError)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    binding.requires_ctrl == crate::utils::has_primary_modifier(key_event.modifiers)
        && binding.key_code == key_event.code
}

fn is(key_event: KeyEvent, key_str: &str) -> Result<bool, TuiError> {
    Ok(matches_key_event(key_event, &binding(key_str)?))
}

/// Show the outcome of an action in the status bar
fn report(app: &mut App, result: Result<Option<String>, ServiceError>) {
    match result {
        Ok(Some(message)) => app.set_status_message(message),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "tui action failed");
            app.set_status_message(e.to_string());
        }
    }
}

/// Returns true when the user asked to quit
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.modals.delete_confirmation.is_some() {
        handle_delete_confirmation_modal(app, key_event);
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Search => {
            handle_search_mode(app, key_event);
            Ok(false)
        }
        Mode::Suggestions => handle_suggestions_mode(app, key_event),
        Mode::View => handle_global_key_bindings(app, key_event),
    }
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection.min(1);
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                let result = app.confirm_delete();
                report(app, result);
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || is(key_event, &app.config.key_bindings.help)? {
        app.exit_help_mode();
    }
    Ok(false)
}

fn handle_search_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.exit_search_mode(false),
        KeyCode::Enter => app.exit_search_mode(true),
        KeyCode::Backspace => app.remove_from_search(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::Char(c) => app.add_to_search(c),
        _ => {}
    }
}

fn handle_suggestions_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();
    if key_event.code == KeyCode::Esc {
        app.close_suggestions();
    } else if key_event.code == KeyCode::Up || is(key_event, &kb.list_up)? {
        app.move_suggestion(false);
    } else if key_event.code == KeyCode::Down || is(key_event, &kb.list_down)? {
        app.move_suggestion(true);
    } else if is(key_event, &kb.select)? {
        let result = app.adopt_selected_suggestion();
        report(app, result);
    }
    Ok(false)
}

fn handle_share(app: &mut App) {
    match app.share_selected() {
        Ok(Some(url)) => match copy_to_clipboard(&url) {
            Ok(()) => app.set_status_message(format!("Link kopiert: {}", url)),
            Err(e) => {
                tracing::debug!(error = %e, "clipboard unavailable");
                app.set_status_message(format!("Link: {}", url));
            }
        },
        other => report(app, other),
    }
}

fn handle_global_key_bindings(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if is(key_event, &kb.quit)? {
        return Ok(true);
    }
    if is(key_event, &kb.help)? {
        app.enter_help_mode();
    } else if is(key_event, &kb.toggle_sidebar)? {
        app.toggle_sidebar();
    } else if is(key_event, &kb.tab_left)? || key_event.code == KeyCode::BackTab {
        app.switch_tab(app.ui.current_tab.prev());
    } else if is(key_event, &kb.tab_right)? || key_event.code == KeyCode::Tab {
        app.switch_tab(app.ui.current_tab.next());
    } else if is(key_event, &kb.list_up)? || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if is(key_event, &kb.list_down)? || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if key_event.code == KeyCode::PageUp {
        app.scroll_item_view_up();
    } else if key_event.code == KeyCode::PageDown {
        app.scroll_item_view_down();
    } else if is(key_event, &kb.select)? {
        app.ui.item_view_scroll = 0;
    } else if is(key_event, &kb.search)? {
        app.enter_search_mode();
    } else if is(key_event, &kb.refresh)? {
        let result = app.refresh().map(|_| Some("Neu geladen".to_string()));
        report(app, result);
    } else if is(key_event, &kb.cycle_status)? {
        let result = app.cycle_selected_status();
        report(app, result);
    } else if is(key_event, &kb.toggle_active)? {
        let result = app.toggle_selected_active();
        report(app, result);
    } else if is(key_event, &kb.convert)? {
        let result = app.convert_selected_idea();
        report(app, result);
    } else if is(key_event, &kb.share)? {
        handle_share(app);
    } else if is(key_event, &kb.suggest)? {
        let result = app.open_suggestions().map(|_| None);
        report(app, result);
    } else if is(key_event, &kb.delete)? {
        app.request_delete();
    } else if is(key_event, &kb.filter_timeframe)? {
        app.cycle_timeframe_filter();
    } else if is(key_event, &kb.filter_type)? {
        app.cycle_type_filter();
    } else if is(key_event, &kb.filter_status)? {
        app.cycle_status_filter();
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::database::Database;
    use crate::tui::app::Tab;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default(), Database::in_memory().unwrap(), "u1".to_string(), "tutor".to_string()).unwrap()
    }

    #[test]
    fn quit_and_tab_navigation() {
        let mut app = app();
        assert!(!handle_key_event(&mut app, press(KeyCode::Right)).unwrap());
        assert_eq!(app.ui.current_tab, Tab::Persons);
        handle_key_event(&mut app, press(KeyCode::Left)).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Dashboard);
        assert!(handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn search_mode_swallows_bound_keys() {
        let mut app = app();
        app.switch_tab(Tab::Occasions);
        handle_key_event(&mut app, press(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.ui.mode, Mode::Search);
        // 'q' is text here, not quit
        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.search.query, "q");
        handle_key_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui.mode, Mode::View);
        assert!(app.search.query.is_empty());
    }

    #[test]
    fn fixed_occasion_delete_is_refused_with_message() {
        let mut app = app();
        app.switch_tab(Tab::Occasions);
        handle_key_event(&mut app, press(KeyCode::Char('f'))).unwrap();
        handle_key_event(&mut app, press(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.get_current_items().len(), 2);

        handle_key_event(&mut app, press(KeyCode::Char('d'))).unwrap();
        assert!(app.modals.delete_confirmation.is_some());
        handle_key_event(&mut app, press(KeyCode::Enter)).unwrap();
        assert!(app.modals.delete_confirmation.is_none());
        assert_eq!(
            app.status.message.as_deref(),
            Some("Feste Standard-Anlässe können nicht gelöscht werden.")
        );
        assert_eq!(app.data.occasions.len(), 2);
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::F(1))).unwrap();
        assert_eq!(app.ui.mode, Mode::Help);
        handle_key_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui.mode, Mode::View);
    }
}
