use chrono::NaiveDate;

use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{GiftKind, IdeaStatus, Occasion};
use crate::occasions::occasion_days_until;

/// Window for the "upcoming occasions" KPI
pub const KPI_WINDOW_DAYS: i64 = 30;
/// Window for the upcoming occasions list
pub const UPCOMING_WINDOW_DAYS: i64 = 365;
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kpis {
    pub persons: usize,
    pub upcoming_occasions: usize,
    pub open_ideas: usize,
    pub planned_gifts: usize,
}

#[derive(Debug, Clone)]
pub struct UpcomingOccasion {
    pub occasion: Occasion,
    pub days: i64,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub kpis: Kpis,
    pub upcoming: Vec<UpcomingOccasion>,
}

fn within(occasion: &Occasion, today: NaiveDate, days: i64) -> Option<i64> {
    occasion_days_until(occasion, today).filter(|d| (0..=days).contains(d))
}

pub fn load_dashboard(db: &Database, uid: &str, today: NaiveDate) -> Result<DashboardData, ServiceError> {
    let occasions = db.list_occasions(uid)?;

    let kpis = Kpis {
        persons: db.list_persons(uid)?.len(),
        upcoming_occasions: occasions
            .iter()
            .filter(|o| within(o, today, KPI_WINDOW_DAYS).is_some())
            .count(),
        open_ideas: db
            .list_gift_ideas(uid)?
            .iter()
            .filter(|i| i.status == IdeaStatus::Offen)
            .count(),
        planned_gifts: db.list_gifts(uid, GiftKind::Planned)?.len(),
    };

    let mut upcoming: Vec<UpcomingOccasion> = occasions
        .into_iter()
        .filter_map(|o| {
            within(&o, today, UPCOMING_WINDOW_DAYS).map(|days| UpcomingOccasion { occasion: o, days })
        })
        .collect();
    upcoming.sort_by_key(|u| u.days);
    upcoming.truncate(UPCOMING_LIMIT);

    Ok(DashboardData { kpis, upcoming })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OccasionType;
    use crate::occasions::{self, OccasionInput};

    #[test]
    fn counts_and_upcoming_list() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 12, 14).unwrap();
        for (name, date) in [
            ("Weihnachten", "2024-12-24"),
            ("Silvester", "2024-12-31"),
            ("Sommerfest", "2025-07-01"),
            ("Vorbei", "2024-11-01"),
            ("Übernächstes Jahr", "2026-06-01"),
        ] {
            occasions::create_occasion(&db, "u1", &OccasionInput {
                name: name.to_string(),
                date: date.to_string(),
                person: String::new(),
                occasion_type: OccasionType::Custom,
                info: String::new(),
            })
            .unwrap();
        }

        let data = load_dashboard(&db, "u1", today).unwrap();
        assert_eq!(data.kpis.upcoming_occasions, 2);
        assert_eq!(data.kpis.persons, 0);
        let names: Vec<_> = data.upcoming.iter().map(|u| u.occasion.name.as_str()).collect();
        assert_eq!(names, ["Weihnachten", "Silvester", "Sommerfest"]);
        assert_eq!(data.upcoming[0].days, 10);
    }
}
