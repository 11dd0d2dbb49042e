use std::time::Instant;

use chrono::NaiveDate;
use ratatui::widgets::ListState;

use crate::config::Config;
use crate::dashboard::{self, DashboardData};
use crate::database::Database;
use crate::error::ServiceError;
use crate::gift_ideas;
use crate::gifts::{self, ConvertOptions};
use crate::models::{Gift, GiftIdea, IdeaStatus, Occasion, OccasionType, Person};
use crate::occasions::{self, OccasionFilter};
use crate::persons::{self, PersonFilter};
use crate::share::{self, LinkState, ShareLinkSummary};
use crate::suggestions::{self, Suggestion};
use crate::utils::today;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Persons,
    Occasions,
    Ideas,
    Gifts,
    Links,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Persons,
        Tab::Occasions,
        Tab::Ideas,
        Tab::Gifts,
        Tab::Links,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Persons => "Personen",
            Tab::Occasions => "Anlässe",
            Tab::Ideas => "Geschenkideen",
            Tab::Gifts => "Geschenke",
            Tab::Links => "Links",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Previous tab; stays put on the first one
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Next tab; stays put on the last one
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Search,
    Help,
    Suggestions,
}

/// Which gift list the Gifts tab shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftView {
    Planned,
    Past,
}

#[derive(Debug, Clone)]
pub enum SelectedItem {
    Person(Person),
    Occasion(Occasion),
    Idea(GiftIdea),
    Gift(Gift),
    Link(ShareLinkSummary),
}

impl SelectedItem {
    /// Stable identity used to keep the selection across reloads
    pub fn key(&self) -> String {
        match self {
            SelectedItem::Person(p) => format!("p{}", p.id.unwrap_or_default()),
            SelectedItem::Occasion(o) => format!("o{}", o.id.unwrap_or_default()),
            SelectedItem::Idea(i) => format!("i{}", i.id.unwrap_or_default()),
            SelectedItem::Gift(g) => format!("g{}", g.id.unwrap_or_default()),
            SelectedItem::Link(l) => l.record.token.clone(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            SelectedItem::Person(_) => "Person",
            SelectedItem::Occasion(_) => "Anlass",
            SelectedItem::Idea(_) => "Geschenkidee",
            SelectedItem::Gift(_) => "Geschenk",
            SelectedItem::Link(_) => "Link",
        }
    }

    /// One-line name shown in lists and the delete dialog
    pub fn label(&self) -> String {
        match self {
            SelectedItem::Person(p) => p.name.clone(),
            SelectedItem::Occasion(o) => o.name.clone(),
            SelectedItem::Idea(i) => format!("{}: {}", i.person_name, i.content),
            SelectedItem::Gift(g) => {
                if g.note.is_empty() {
                    format!("{} ({})", g.person_name, g.date)
                } else {
                    format!("{}: {}", g.person_name, g.note)
                }
            }
            SelectedItem::Link(l) => format!("{} ({})", l.record.person_name, l.record.kind),
        }
    }

    fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        let hay: Vec<&str> = match self {
            SelectedItem::Person(p) => vec![&p.name, &p.info],
            SelectedItem::Occasion(o) => vec![&o.name, &o.person],
            SelectedItem::Idea(i) => vec![&i.content, &i.person_name, &i.occasion_name],
            SelectedItem::Gift(g) => vec![&g.note, &g.person_name, &g.occasion_name],
            SelectedItem::Link(l) => vec![&l.record.person_name],
        };
        hay.iter().any(|s| s.to_lowercase().contains(&q))
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub item_view_scroll: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Dashboard,
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            item_view_scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterState {
    /// Search text is kept in `SearchState`; only the option filters live here
    pub occasions: OccasionFilter,
    pub only_with_birthday: bool,
    pub idea_status: Option<IdeaStatus>,
    pub gift_view: GiftView,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            occasions: OccasionFilter::default(),
            only_with_birthday: false,
            idea_status: None,
            gift_view: GiftView::Planned,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<SelectedItem>,
    /// 0 = confirm, 1 = cancel
    pub delete_modal_selection: usize,
}

#[derive(Debug, Clone)]
pub struct SuggestionState {
    pub person_name: String,
    pub items: Vec<Suggestion>,
    pub list_state: ListState,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct DataState {
    pub persons: Vec<Person>,
    pub occasions: Vec<Occasion>,
    pub ideas: Vec<GiftIdea>,
    pub gifts: Vec<Gift>,
    pub past_gifts: Vec<Gift>,
    pub links: Vec<ShareLinkSummary>,
    pub dashboard: DashboardData,
}

pub struct App {
    pub config: Config,
    pub database: Database,
    pub uid: String,
    pub user_label: String,
    pub today: NaiveDate,

    pub data: DataState,

    pub ui: UiState,
    pub filter: FilterState,
    pub modals: ModalState,
    pub suggestions: Option<SuggestionState>,
    pub status: StatusState,
    pub search: SearchState,
}

impl App {
    pub fn new(config: Config, database: Database, uid: String, user_label: String) -> Result<Self, ServiceError> {
        if occasions::ensure_default_occasions(&database, &uid)? {
            tracing::info!(uid, "default occasions created");
        }

        let mut app = Self {
            config,
            database,
            uid,
            user_label,
            today: today(),
            data: DataState::default(),
            ui: UiState::default(),
            filter: FilterState::default(),
            modals: ModalState::default(),
            suggestions: None,
            status: StatusState::default(),
            search: SearchState::default(),
        };
        app.load_data()?;
        Ok(app)
    }

    pub fn load_data(&mut self) -> Result<(), ServiceError> {
        let db = &self.database;
        let uid = self.uid.as_str();
        self.data = DataState {
            persons: persons::list_persons(db, uid)?,
            occasions: occasions::list_occasions(db, uid)?,
            ideas: gift_ideas::list_gift_ideas(db, uid)?,
            gifts: gifts::list_gifts(db, uid)?,
            past_gifts: gifts::list_past_gifts(db, uid)?,
            links: share::list_share_links(db, uid)?,
            dashboard: dashboard::load_dashboard(db, uid, self.today)?,
        };
        self.adjust_selected_index();
        Ok(())
    }

    /// Reload and keep the cursor on the same record when it still exists
    pub fn refresh(&mut self) -> Result<(), ServiceError> {
        let key = self.selected_item().map(|i| i.key());
        self.load_data()?;
        if let Some(key) = key {
            if let Some(pos) = self.get_current_items().iter().position(|i| i.key() == key) {
                self.ui.selected_index = pos;
                self.sync_list_state();
            }
        }
        Ok(())
    }

    /// Items of the current tab after search and filters
    pub fn get_current_items(&self) -> Vec<SelectedItem> {
        let items: Vec<SelectedItem> = match self.ui.current_tab {
            Tab::Dashboard => Vec::new(),
            Tab::Persons => {
                let filter = PersonFilter {
                    query: String::new(),
                    only_with_birthday: self.filter.only_with_birthday,
                };
                persons::filter_persons(&self.data.persons, &filter)
                    .into_iter()
                    .cloned()
                    .map(SelectedItem::Person)
                    .collect()
            }
            Tab::Occasions => occasions::filter_occasions(&self.data.occasions, &self.filter.occasions, self.today)
                .into_iter()
                .cloned()
                .map(SelectedItem::Occasion)
                .collect(),
            Tab::Ideas => self
                .data
                .ideas
                .iter()
                .filter(|i| self.filter.idea_status.is_none_or(|s| i.status == s))
                .cloned()
                .map(SelectedItem::Idea)
                .collect(),
            Tab::Gifts => {
                let source = match self.filter.gift_view {
                    GiftView::Planned => &self.data.gifts,
                    GiftView::Past => &self.data.past_gifts,
                };
                source.iter().cloned().map(SelectedItem::Gift).collect()
            }
            Tab::Links => self.data.links.iter().cloned().map(SelectedItem::Link).collect(),
        };

        items
            .into_iter()
            .filter(|item| item.matches_search(&self.search.query))
            .collect()
    }

    pub fn selected_item(&self) -> Option<SelectedItem> {
        self.get_current_items().into_iter().nth(self.ui.selected_index)
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.get_current_items().len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
            return;
        }
        self.ui.selected_index = self.ui.selected_index.min(len - 1);
        self.sync_list_state();
    }

    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.ui.item_view_scroll = 0;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.get_current_items().len() {
            self.ui.selected_index += 1;
            self.ui.item_view_scroll = 0;
            self.sync_list_state();
        }
    }

    pub fn scroll_item_view_up(&mut self) {
        self.ui.item_view_scroll = self.ui.item_view_scroll.saturating_sub(1);
    }

    pub fn scroll_item_view_down(&mut self) {
        self.ui.item_view_scroll += 1;
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    pub fn switch_tab(&mut self, new_tab: Tab) {
        self.ui.current_tab = new_tab;
        self.ui.selected_index = 0;
        self.ui.item_view_scroll = 0;
        self.search.query.clear();
        self.adjust_selected_index();
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Status messages disappear after a few seconds
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 4;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.ui.mode = Mode::Search;
        self.search.query.clear();
        self.adjust_selected_index();
    }

    /// Leave search; `keep` leaves the query applied to the list
    pub fn exit_search_mode(&mut self, keep: bool) {
        self.ui.mode = Mode::View;
        if !keep {
            self.search.query.clear();
        }
        self.adjust_selected_index();
    }

    pub fn add_to_search(&mut self, ch: char) {
        self.search.query.push(ch);
        self.ui.selected_index = 0;
        self.adjust_selected_index();
    }

    pub fn remove_from_search(&mut self) {
        self.search.query.pop();
        self.adjust_selected_index();
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    /// Timeframe filter key: occasions only
    pub fn cycle_timeframe_filter(&mut self) {
        if self.ui.current_tab == Tab::Occasions {
            self.filter.occasions.timeframe = self.filter.occasions.timeframe.next();
            self.adjust_selected_index();
        }
    }

    /// Type filter key: occasion type, birthday-only persons, or planned/past gifts
    pub fn cycle_type_filter(&mut self) {
        match self.ui.current_tab {
            Tab::Occasions => {
                self.filter.occasions.occasion_type = match self.filter.occasions.occasion_type {
                    None => Some(OccasionType::Fixed),
                    Some(OccasionType::Fixed) => Some(OccasionType::Custom),
                    Some(OccasionType::Custom) => None,
                };
            }
            Tab::Persons => self.filter.only_with_birthday = !self.filter.only_with_birthday,
            Tab::Gifts => {
                self.filter.gift_view = match self.filter.gift_view {
                    GiftView::Planned => GiftView::Past,
                    GiftView::Past => GiftView::Planned,
                };
            }
            _ => return,
        }
        self.ui.selected_index = 0;
        self.adjust_selected_index();
    }

    /// Status filter key: occasion activity or idea status
    pub fn cycle_status_filter(&mut self) {
        match self.ui.current_tab {
            Tab::Occasions => self.filter.occasions.status = self.filter.occasions.status.next(),
            Tab::Ideas => {
                self.filter.idea_status = match self.filter.idea_status {
                    None => Some(IdeaStatus::Offen),
                    Some(IdeaStatus::Offen) => Some(IdeaStatus::Besorgt),
                    Some(IdeaStatus::Besorgt) => Some(IdeaStatus::Erledigt),
                    Some(IdeaStatus::Erledigt) => None,
                };
            }
            _ => return,
        }
        self.ui.selected_index = 0;
        self.adjust_selected_index();
    }

    pub fn get_filter_summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.ui.current_tab {
            Tab::Dashboard => parts.push(format!("Angemeldet als {}", self.user_label)),
            Tab::Persons => parts.push(format!(
                "Nur mit Geburtstag: {}",
                if self.filter.only_with_birthday { "ja" } else { "nein" }
            )),
            Tab::Occasions => {
                let f = &self.filter.occasions;
                parts.push(format!("Zeitraum: {}", f.timeframe));
                parts.push(format!(
                    "Typ: {}",
                    f.occasion_type.map(|t| t.to_string()).unwrap_or_else(|| "Alle".to_string())
                ));
                parts.push(format!("Status: {}", f.status));
            }
            Tab::Ideas => parts.push(format!(
                "Status: {}",
                self.filter.idea_status.map(|s| s.to_string()).unwrap_or_else(|| "Alle".to_string())
            )),
            Tab::Gifts => parts.push(
                match self.filter.gift_view {
                    GiftView::Planned => "Geplant",
                    GiftView::Past => "Vergangen",
                }
                .to_string(),
            ),
            Tab::Links => {
                let active = self.data.links.iter().filter(|l| l.state == LinkState::Active).count();
                parts.push(format!("{} aktiv von {}", active, self.data.links.len()));
            }
        }
        if !self.search.query.is_empty() {
            parts.push(format!("Suche: {}", self.search.query));
        }
        parts.join(" | ")
    }

    /// Advance the status of the selected idea or gift
    pub fn cycle_selected_status(&mut self) -> Result<Option<String>, ServiceError> {
        let message = match self.selected_item() {
            Some(SelectedItem::Idea(idea)) => {
                let next = gift_ideas::next_status(idea.status);
                gift_ideas::set_gift_idea_status(&self.database, &self.uid, idea.id.unwrap_or_default(), next)?;
                format!("Status: {}", next)
            }
            Some(SelectedItem::Gift(gift)) => {
                let next = gifts::next_status(gift.status);
                gifts::set_gift_status(&self.database, &self.uid, gift.id.unwrap_or_default(), next)?;
                format!("Status: {}", next)
            }
            _ => return Ok(None),
        };
        self.refresh()?;
        Ok(Some(message))
    }

    pub fn toggle_selected_active(&mut self) -> Result<Option<String>, ServiceError> {
        let Some(SelectedItem::Occasion(occasion)) = self.selected_item() else {
            return Ok(None);
        };
        let active = occasions::toggle_occasion_active(&self.database, &self.uid, occasion.id.unwrap_or_default())?;
        self.refresh()?;
        Ok(Some(format!(
            "{} ist jetzt {}",
            occasion.name,
            if active { "aktiv" } else { "deaktiviert" }
        )))
    }

    /// Turn the selected idea into a planned gift dated today
    pub fn convert_selected_idea(&mut self) -> Result<Option<String>, ServiceError> {
        let Some(SelectedItem::Idea(idea)) = self.selected_item() else {
            return Ok(None);
        };
        let gift_id = gifts::convert_idea_to_gift(
            &self.database,
            &self.uid,
            idea.id.unwrap_or_default(),
            &ConvertOptions::default(),
        )?;
        self.refresh()?;
        Ok(Some(format!("Als Geschenk übernommen (ID: {})", gift_id)))
    }

    /// Share URL for the selection: a new link for persons and ideas,
    /// the existing URL for rows of the Links tab.
    pub fn share_selected(&mut self) -> Result<Option<String>, ServiceError> {
        let share_config = self.config.share.clone();
        let url = match self.selected_item() {
            Some(SelectedItem::Person(person)) => share::create_share_link_gift_ideas_by_person(
                &self.database,
                &self.uid,
                &share_config,
                person.id.unwrap_or_default(),
                &person.name,
                None,
            )?,
            Some(SelectedItem::Idea(idea)) => share::create_share_link_gift_idea(
                &self.database,
                &self.uid,
                &share_config,
                idea.id.unwrap_or_default(),
                None,
            )?,
            Some(SelectedItem::Link(link)) => return Ok(Some(link.url(&share_config))),
            _ => return Ok(None),
        };
        self.refresh()?;
        Ok(Some(url))
    }

    pub fn open_suggestions(&mut self) -> Result<bool, ServiceError> {
        let Some(SelectedItem::Person(person)) = self.selected_item() else {
            return Ok(false);
        };
        let items = suggestions::suggest_for_person(&self.database, &self.uid, person.id.unwrap_or_default())?;
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }
        self.suggestions = Some(SuggestionState {
            person_name: person.name,
            items,
            list_state,
        });
        self.ui.mode = Mode::Suggestions;
        Ok(true)
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions = None;
        self.ui.mode = Mode::View;
    }

    pub fn move_suggestion(&mut self, down: bool) {
        if let Some(state) = self.suggestions.as_mut() {
            let len = state.items.len();
            if len == 0 {
                return;
            }
            let current = state.list_state.selected().unwrap_or(0);
            let next = if down { (current + 1).min(len - 1) } else { current.saturating_sub(1) };
            state.list_state.select(Some(next));
        }
    }

    /// Store the highlighted suggestion as a gift idea; it leaves the list
    pub fn adopt_selected_suggestion(&mut self) -> Result<Option<String>, ServiceError> {
        let Some(state) = self.suggestions.as_mut() else {
            return Ok(None);
        };
        let Some(index) = state.list_state.selected() else {
            return Ok(None);
        };
        let Some(chosen) = state.items.get(index).cloned() else {
            return Ok(None);
        };
        let id = suggestions::adopt_suggestion(&self.database, &self.uid, &chosen)?;

        state.items.remove(index);
        let len = state.items.len();
        state.list_state.select(if len == 0 { None } else { Some(index.min(len - 1)) });

        self.refresh()?;
        Ok(Some(format!("\"{}\" übernommen (ID: {})", chosen.content, id)))
    }

    pub fn request_delete(&mut self) {
        if let Some(item) = self.selected_item() {
            self.modals.delete_confirmation = Some(item);
            self.modals.delete_modal_selection = 0;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
    }

    /// Run the pending delete. Links are deactivated rather than removed.
    pub fn confirm_delete(&mut self) -> Result<Option<String>, ServiceError> {
        let Some(item) = self.modals.delete_confirmation.take() else {
            return Ok(None);
        };
        let db = &self.database;
        let uid = self.uid.as_str();
        let message = match &item {
            SelectedItem::Person(p) => {
                persons::delete_person(db, uid, p.id.unwrap_or_default())?;
                "Person gelöscht"
            }
            SelectedItem::Occasion(o) => {
                occasions::delete_occasion(db, uid, o.id.unwrap_or_default())?;
                "Anlass gelöscht"
            }
            SelectedItem::Idea(i) => {
                gift_ideas::delete_gift_idea(db, uid, i.id.unwrap_or_default())?;
                "Geschenkidee gelöscht"
            }
            SelectedItem::Gift(g) => {
                gifts::delete_gift(db, uid, g.id.unwrap_or_default())?;
                "Geschenk gelöscht"
            }
            SelectedItem::Link(l) => {
                share::deactivate_share_link(db, uid, &l.record.token)?;
                "Link deaktiviert"
            }
        };
        self.refresh()?;
        Ok(Some(message.to_string()))
    }
}

/// Copy text to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift_ideas::IdeaInput;
    use crate::models::{GiftKind, GiftStatus};
    use crate::occasions::{OccasionInput, Timeframe};
    use crate::persons::PersonInput;

    fn app() -> App {
        let db = Database::in_memory().unwrap();
        let anna = persons::create_person(&db, "u1", &PersonInput {
            name: "Anna".to_string(),
            birthday: Some("1990-05-01".to_string()),
            ..Default::default()
        })
        .unwrap();
        persons::create_person(&db, "u1", &PersonInput {
            name: "Ben".to_string(),
            ..Default::default()
        })
        .unwrap();
        gift_ideas::create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();

        let mut app = App::new(Config::default(), db, "u1".to_string(), "tutor".to_string()).unwrap();
        app.today = NaiveDate::from_ymd_opt(2024, 12, 14).unwrap();
        app.load_data().unwrap();
        app
    }

    #[test]
    fn tabs_clamp_at_the_ends() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Dashboard);
        assert_eq!(Tab::Links.next(), Tab::Links);
        assert_eq!(Tab::Persons.next(), Tab::Occasions);
    }

    #[test]
    fn startup_creates_default_occasions() {
        let app = app();
        let names: Vec<_> = app.data.occasions.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"Geburtstag"));
        assert!(names.contains(&"Weihnachten"));
    }

    #[test]
    fn search_and_birthday_filter_narrow_persons() {
        let mut app = app();
        app.switch_tab(Tab::Persons);
        assert_eq!(app.get_current_items().len(), 2);

        app.cycle_type_filter();
        assert_eq!(app.get_current_items().len(), 1);
        app.cycle_type_filter();

        app.enter_search_mode();
        app.add_to_search('b');
        app.add_to_search('E');
        let items = app.get_current_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), "Ben");
        app.exit_search_mode(false);
        assert_eq!(app.get_current_items().len(), 2);
    }

    #[test]
    fn occasion_timeframe_filter_cycles() {
        let mut app = app();
        occasions::create_occasion(&app.database, "u1", &OccasionInput {
            name: "Annas Geburtstag".to_string(),
            date: "2024-12-24".to_string(),
            person: "Anna".to_string(),
            occasion_type: OccasionType::Custom,
            info: String::new(),
        })
        .unwrap();
        app.load_data().unwrap();
        app.switch_tab(Tab::Occasions);

        // Default window is 30 days; the undated defaults fall outside it
        assert_eq!(app.get_current_items().len(), 1);
        app.cycle_timeframe_filter();
        assert_eq!(app.filter.occasions.timeframe, Timeframe::Days(90));
        app.cycle_timeframe_filter();
        assert_eq!(app.filter.occasions.timeframe, Timeframe::All);
        assert_eq!(app.get_current_items().len(), 3);
        assert!(app.get_filter_summary().contains("Zeitraum: Alle"));
    }

    #[test]
    fn status_cycle_and_conversion_from_ideas_tab() {
        let mut app = app();
        app.switch_tab(Tab::Ideas);

        let msg = app.cycle_selected_status().unwrap();
        assert_eq!(msg.as_deref(), Some("Status: besorgt"));
        assert_eq!(app.data.ideas[0].status, IdeaStatus::Besorgt);

        app.convert_selected_idea().unwrap();
        assert_eq!(app.data.ideas[0].status, IdeaStatus::Erledigt);
        assert_eq!(app.data.gifts.len(), 1);
        assert_eq!(app.data.gifts[0].note, "Buch");
        assert_eq!(app.data.gifts[0].status, GiftStatus::Offen);
        assert_eq!(app.data.gifts[0].effective_kind(), GiftKind::Planned);
        assert_eq!(app.data.dashboard.kpis.planned_gifts, 1);
    }

    #[test]
    fn share_from_persons_tab_and_deactivate_from_links_tab() {
        let mut app = app();
        app.switch_tab(Tab::Persons);
        let url = app.share_selected().unwrap().unwrap();
        assert!(url.starts_with("share.html?t="));
        assert_eq!(app.data.links.len(), 1);

        app.switch_tab(Tab::Links);
        assert_eq!(app.share_selected().unwrap(), Some(url));

        app.request_delete();
        assert!(app.modals.delete_confirmation.is_some());
        assert_eq!(app.confirm_delete().unwrap().as_deref(), Some("Link deaktiviert"));
        assert_eq!(app.data.links[0].state, LinkState::Inactive);
    }

    #[test]
    fn blocked_delete_reports_the_reason() {
        let mut app = app();
        app.switch_tab(Tab::Persons);
        app.request_delete();
        let err = app.confirm_delete().unwrap_err();
        assert!(err.to_string().contains("kann nicht gelöscht werden"));
        assert_eq!(app.data.persons.len(), 2);
        assert!(app.modals.delete_confirmation.is_none());
    }

    #[test]
    fn suggestions_can_be_adopted() {
        let mut app = app();
        app.switch_tab(Tab::Persons);
        assert!(app.open_suggestions().unwrap());
        assert_eq!(app.ui.mode, Mode::Suggestions);
        let before = app.suggestions.as_ref().unwrap().items.len();

        app.adopt_selected_suggestion().unwrap();
        assert_eq!(app.suggestions.as_ref().unwrap().items.len(), before - 1);
        assert_eq!(app.data.ideas.len(), 2);

        app.close_suggestions();
        assert_eq!(app.ui.mode, Mode::View);
    }

    #[test]
    fn gifts_tab_switches_between_planned_and_past() {
        let mut app = app();
        let anna = app.data.persons[0].id.unwrap();
        gifts::create_gift(&app.database, "u1", &gifts::GiftInput {
            person_id: anna,
            occasion_id: None,
            date: "2023-12-24".to_string(),
            note: "Schal".to_string(),
            status: None,
            kind: GiftKind::Past,
        })
        .unwrap();
        app.load_data().unwrap();
        app.switch_tab(Tab::Gifts);
        assert!(app.get_current_items().is_empty());
        app.cycle_type_filter();
        assert_eq!(app.get_current_items().len(), 1);
        assert_eq!(app.get_filter_summary(), "Vergangen");
    }
}
