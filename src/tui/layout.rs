use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // inside the outer border
    pub tabs_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub filters_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Smallest usable terminal, not counting the outer border
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 12;

    const SIDEBAR_MIN: u16 = 28;
    const SIDEBAR_MAX_PERCENT: u16 = 55;
    const MAIN_MIN: u16 = 20;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            width.saturating_sub(2),
            height.saturating_sub(2),
        );

        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested = inner_area.width * sidebar_width_percent / 100;
            let max = inner_area.width * Self::SIDEBAR_MAX_PERCENT / 100;
            requested
                .max(Self::SIDEBAR_MIN)
                .min(max)
                .min(inner_area.width.saturating_sub(Self::MAIN_MIN))
        };

        let [tabs_area, content_area, filters_area, status_area] = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .areas(inner_area);

        let [sidebar_area, main_area] = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .areas(content_area);

        Self {
            inner_area,
            tabs_area,
            sidebar_area,
            main_area,
            filters_area,
            status_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_sidebar_gives_main_the_full_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 100, 30), 35, true);
        assert_eq!(layout.sidebar_area.width, 0);
        assert_eq!(layout.main_area.width, 98);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.filters_area.height, 3);
    }

    #[test]
    fn sidebar_respects_bounds() {
        let layout = Layout::calculate(Rect::new(0, 0, 100, 30), 90, false);
        assert!(layout.sidebar_area.width <= 98 * 55 / 100);
        let layout = Layout::calculate(Rect::new(0, 0, 100, 30), 5, false);
        assert_eq!(layout.sidebar_area.width, 28);
    }

    #[test]
    fn tiny_terminal_is_padded_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), 35, false);
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
    }
}
