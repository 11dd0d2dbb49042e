pub mod color;
pub mod confirm_delete;
pub mod dashboard_view;
pub mod entity_list;
pub mod filters_box;
pub mod help;
pub mod item_view;
pub mod status_bar;
pub mod suggestions_popup;
pub mod tabs;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
