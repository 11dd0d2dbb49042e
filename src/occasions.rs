use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{Occasion, OccasionType, now_timestamp};
use crate::utils::days_until;
use crate::validate::{normalize, require_date, require_non_empty};

/// Occasions every user starts with
pub const DEFAULT_OCCASIONS: &[&str] = &["Geburtstag", "Weihnachten"];

#[derive(Debug, Clone)]
pub struct OccasionInput {
    pub name: String,
    pub date: String,
    pub person: String,
    pub occasion_type: OccasionType,
    pub info: String,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct OccasionPatch {
    pub name: Option<String>,
    pub date: Option<String>,
    pub person: Option<String>,
    pub occasion_type: Option<OccasionType>,
    pub is_active: Option<bool>,
    pub info: Option<String>,
}

/// How far ahead the occasion list looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Days(i64),
    All,
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Days(30)
    }
}

impl Timeframe {
    /// Cycle order used by the TUI filter key
    pub fn next(self) -> Self {
        match self {
            Timeframe::Days(30) => Timeframe::Days(90),
            Timeframe::Days(90) => Timeframe::All,
            _ => Timeframe::Days(30),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Days(n) => write!(f, "{} Tage", n),
            Timeframe::All => f.write_str("Alle"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Timeframe::All);
        }
        match s.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(Timeframe::Days(n)),
            _ => Err(format!("Ungültiger Zeitraum: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Inactive,
            StatusFilter::Inactive => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "Alle",
            StatusFilter::Active => "Aktiv",
            StatusFilter::Inactive => "Deaktiviert",
        })
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(format!("Ungültiger Status-Filter: {}", other)),
        }
    }
}

/// Filter state of the occasion list
#[derive(Debug, Clone, Default)]
pub struct OccasionFilter {
    pub query: String,
    pub timeframe: Timeframe,
    /// `None` means all types
    pub occasion_type: Option<OccasionType>,
    pub status: StatusFilter,
}

impl OccasionFilter {
    /// Filter that lets everything through
    pub fn all() -> Self {
        Self {
            timeframe: Timeframe::All,
            ..Default::default()
        }
    }

    pub fn matches(&self, occasion: &Occasion, today: NaiveDate) -> bool {
        let term = self.query.trim().to_lowercase();
        if !term.is_empty()
            && !occasion.name.to_lowercase().contains(&term)
            && !occasion.person.to_lowercase().contains(&term)
        {
            return false;
        }

        if let Timeframe::Days(max) = self.timeframe {
            match occasion_days_until(occasion, today) {
                Some(days) if days <= max => {}
                _ => return false,
            }
        }

        if self.occasion_type.is_some_and(|t| t != occasion.occasion_type) {
            return false;
        }

        match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => occasion.is_active,
            StatusFilter::Inactive => !occasion.is_active,
        }
    }
}

/// Days until the occasion's date; None when it has no valid date
pub fn occasion_days_until(occasion: &Occasion, today: NaiveDate) -> Option<i64> {
    occasion.date.as_deref().and_then(|d| days_until(d, today))
}

/// Create "Geburtstag" and "Weihnachten" when the user has no fixed occasion yet.
/// Returns whether anything was created.
pub fn ensure_default_occasions(db: &Database, uid: &str) -> Result<bool, ServiceError> {
    if db.has_fixed_occasion(uid)? {
        return Ok(false);
    }
    for name in DEFAULT_OCCASIONS {
        db.insert_occasion(uid, &Occasion::new(name.to_string(), OccasionType::Fixed))?;
    }
    tracing::info!(uid, "default occasions created");
    Ok(true)
}

pub fn create_occasion(db: &Database, uid: &str, input: &OccasionInput) -> Result<i64, ServiceError> {
    let mut occasion = Occasion::new(require_non_empty("Name", &input.name)?, input.occasion_type);
    occasion.date = Some(require_date(&input.date)?);
    occasion.person = normalize(&input.person);
    occasion.info = normalize(&input.info);

    let id = db.insert_occasion(uid, &occasion)?;
    tracing::info!(uid, id, "occasion created");
    Ok(id)
}

pub fn get_occasion(db: &Database, uid: &str, id: i64) -> Result<Occasion, ServiceError> {
    db.get_occasion(uid, id)?
        .ok_or_else(|| ServiceError::NotFound("Anlass nicht gefunden.".to_string()))
}

/// All occasions ordered by name
pub fn list_occasions(db: &Database, uid: &str) -> Result<Vec<Occasion>, ServiceError> {
    Ok(db.list_occasions(uid)?)
}

/// Apply the filter and order by date, undated occasions last
pub fn filter_occasions<'a>(
    occasions: &'a [Occasion],
    filter: &OccasionFilter,
    today: NaiveDate,
) -> Vec<&'a Occasion> {
    let mut out: Vec<&Occasion> = occasions.iter().filter(|o| filter.matches(o, today)).collect();
    out.sort_by(|a, b| {
        let key = |o: &Occasion| crate::utils::parse_date(o.date.as_deref().unwrap_or("")).ok();
        match (key(a), key(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    out
}

pub fn update_occasion(db: &Database, uid: &str, id: i64, patch: &OccasionPatch) -> Result<(), ServiceError> {
    let mut occasion = get_occasion(db, uid, id)?;

    if let Some(name) = &patch.name {
        occasion.name = require_non_empty("Name", name)?;
    }
    if let Some(date) = &patch.date {
        occasion.date = Some(require_date(date)?);
    }
    if let Some(person) = &patch.person {
        occasion.person = normalize(person);
    }
    if let Some(occasion_type) = patch.occasion_type {
        occasion.occasion_type = occasion_type;
    }
    if let Some(is_active) = patch.is_active {
        occasion.is_active = is_active;
    }
    if let Some(info) = &patch.info {
        occasion.info = normalize(info);
    }
    occasion.updated_at = now_timestamp();

    db.update_occasion(uid, &occasion)?;
    tracing::info!(uid, id, "occasion updated");
    Ok(())
}

/// Flip the active flag and return the new state
pub fn toggle_occasion_active(db: &Database, uid: &str, id: i64) -> Result<bool, ServiceError> {
    let is_active = !get_occasion(db, uid, id)?.is_active;
    update_occasion(db, uid, id, &OccasionPatch {
        is_active: Some(is_active),
        ..Default::default()
    })?;
    Ok(is_active)
}

/// Delete a custom occasion no gift idea points at
pub fn delete_occasion(db: &Database, uid: &str, id: i64) -> Result<(), ServiceError> {
    let occasion = get_occasion(db, uid, id)?;
    if occasion.occasion_type == OccasionType::Fixed {
        return Err(ServiceError::Forbidden(
            "Feste Standard-Anlässe können nicht gelöscht werden.".to_string(),
        ));
    }
    if db.has_gift_ideas_by_occasion(uid, id)? {
        return Err(ServiceError::Forbidden(
            "Dieser Anlass kann nicht gelöscht werden, weil bereits Geschenkideen existieren.".to_string(),
        ));
    }
    db.delete_occasion(uid, id)?;
    tracing::info!(uid, id, "occasion deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 14).unwrap()
    }

    fn input(name: &str, date: &str, occasion_type: OccasionType) -> OccasionInput {
        OccasionInput {
            name: name.to_string(),
            date: date.to_string(),
            person: String::new(),
            occasion_type,
            info: String::new(),
        }
    }

    #[test]
    fn defaults_are_created_once() {
        let db = Database::in_memory().unwrap();
        assert!(ensure_default_occasions(&db, "u1").unwrap());
        assert!(!ensure_default_occasions(&db, "u1").unwrap());

        let occasions = list_occasions(&db, "u1").unwrap();
        let names: Vec<_> = occasions.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Geburtstag", "Weihnachten"]);
        assert!(occasions.iter().all(|o| o.occasion_type == OccasionType::Fixed && o.is_active));
        assert!(occasions.iter().all(|o| o.date.is_none()));
    }

    #[test]
    fn create_requires_name_and_date() {
        let db = Database::in_memory().unwrap();
        let err = create_occasion(&db, "u1", &input(" ", "2024-12-24", OccasionType::Custom)).unwrap_err();
        assert_eq!(err.to_string(), "Name ist Pflicht.");
        let err = create_occasion(&db, "u1", &input("Party", "", OccasionType::Custom)).unwrap_err();
        assert_eq!(err.to_string(), "Ungültiges Datum (YYYY-MM-DD).");
    }

    #[test]
    fn timeframe_type_and_status_filters() {
        let db = Database::in_memory().unwrap();
        let soon = create_occasion(&db, "u1", &input("Geburtstag Anna", "2024-12-24", OccasionType::Fixed)).unwrap();
        create_occasion(&db, "u1", &input("Jahrestag", "2025-02-01", OccasionType::Custom)).unwrap();
        create_occasion(&db, "u1", &input("Vergangen", "2024-12-01", OccasionType::Custom)).unwrap();
        db.insert_occasion("u1", &Occasion::new("Ohne Datum".to_string(), OccasionType::Custom)).unwrap();
        let occasions = list_occasions(&db, "u1").unwrap();

        let names = |filter: &OccasionFilter| -> Vec<String> {
            filter_occasions(&occasions, filter, today()).iter().map(|o| o.name.clone()).collect()
        };

        // Past occasions stay listed; only later and undated ones drop out
        assert_eq!(names(&OccasionFilter::default()), ["Vergangen", "Geburtstag Anna"]);
        let ninety = OccasionFilter { timeframe: Timeframe::Days(90), ..Default::default() };
        assert_eq!(names(&ninety), ["Vergangen", "Geburtstag Anna", "Jahrestag"]);
        let five = OccasionFilter { timeframe: Timeframe::Days(5), ..Default::default() };
        assert_eq!(names(&five), ["Vergangen"]);

        assert_eq!(
            names(&OccasionFilter::all()),
            ["Vergangen", "Geburtstag Anna", "Jahrestag", "Ohne Datum"]
        );

        let custom = OccasionFilter { occasion_type: Some(OccasionType::Custom), ..OccasionFilter::all() };
        assert_eq!(names(&custom), ["Vergangen", "Jahrestag", "Ohne Datum"]);

        toggle_occasion_active(&db, "u1", soon).unwrap();
        let occasions = list_occasions(&db, "u1").unwrap();
        let inactive = OccasionFilter { status: StatusFilter::Inactive, ..OccasionFilter::all() };
        let found: Vec<_> = filter_occasions(&occasions, &inactive, today()).iter().map(|o| o.id).collect();
        assert_eq!(found, [Some(soon)]);
    }

    #[test]
    fn search_matches_name_or_person() {
        let db = Database::in_memory().unwrap();
        let mut with_person = input("Hochzeit", "2025-06-01", OccasionType::Custom);
        with_person.person = "Clara".to_string();
        create_occasion(&db, "u1", &with_person).unwrap();
        create_occasion(&db, "u1", &input("Einweihung", "2025-07-01", OccasionType::Custom)).unwrap();
        let occasions = list_occasions(&db, "u1").unwrap();

        let filter = OccasionFilter { query: "clara".to_string(), ..OccasionFilter::all() };
        let found = filter_occasions(&occasions, &filter, today());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Hochzeit");
    }

    #[test]
    fn fixed_occasions_cannot_be_deleted() {
        let db = Database::in_memory().unwrap();
        ensure_default_occasions(&db, "u1").unwrap();
        let fixed = list_occasions(&db, "u1").unwrap()[0].id.unwrap();
        let err = delete_occasion(&db, "u1", fixed).unwrap_err();
        assert_eq!(err.to_string(), "Feste Standard-Anlässe können nicht gelöscht werden.");

        let party = create_occasion(&db, "u1", &input("Party", "2025-01-10", OccasionType::Custom)).unwrap();
        delete_occasion(&db, "u1", party).unwrap();
        assert!(matches!(get_occasion(&db, "u1", party), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let db = Database::in_memory().unwrap();
        let id = create_occasion(&db, "u1", &input("Party", "2025-01-10", OccasionType::Custom)).unwrap();
        update_occasion(&db, "u1", id, &OccasionPatch {
            name: Some("Silvesterparty".to_string()),
            ..Default::default()
        })
        .unwrap();
        let occasion = get_occasion(&db, "u1", id).unwrap();
        assert_eq!(occasion.name, "Silvesterparty");
        assert_eq!(occasion.date.as_deref(), Some("2025-01-10"));

        let blank = OccasionPatch { name: Some(String::new()), ..Default::default() };
        assert!(update_occasion(&db, "u1", id, &blank).is_err());
    }

    #[test]
    fn timeframe_parsing() {
        assert_eq!("30".parse::<Timeframe>().unwrap(), Timeframe::Days(30));
        assert_eq!("all".parse::<Timeframe>().unwrap(), Timeframe::All);
        assert!("-1".parse::<Timeframe>().is_err());
        assert_eq!(Timeframe::Days(90).next(), Timeframe::All);
    }
}
