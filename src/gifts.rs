use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{Gift, GiftKind, GiftStatus, IdeaStatus, IdeaType, now_timestamp};
use crate::utils::get_current_date_string;
use crate::validate::{normalize, require_date};

#[derive(Debug, Clone)]
pub struct GiftInput {
    pub person_id: i64,
    pub occasion_id: Option<i64>,
    pub date: String,
    pub note: String,
    /// Defaults to `offen` for planned and `ueberreicht` for past gifts
    pub status: Option<GiftStatus>,
    pub kind: GiftKind,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct GiftPatch {
    pub person_id: Option<i64>,
    pub occasion_id: Option<Option<i64>>,
    pub date: Option<String>,
    pub note: Option<String>,
    pub status: Option<GiftStatus>,
    pub kind: Option<GiftKind>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Gift date; today when unset
    pub date: Option<String>,
    /// Gift note; text ideas fall back to their content
    pub note: Option<String>,
}

fn default_status(kind: GiftKind) -> GiftStatus {
    match kind {
        GiftKind::Planned => GiftStatus::Offen,
        GiftKind::Past => GiftStatus::Ueberreicht,
    }
}

pub fn create_gift(db: &Database, uid: &str, input: &GiftInput) -> Result<i64, ServiceError> {
    let date = require_date(&input.date)?;
    let person = crate::persons::get_person(db, uid, input.person_id)?;
    let occasion_name = match input.occasion_id {
        Some(id) => crate::occasions::get_occasion(db, uid, id)?.name,
        None => String::new(),
    };
    let now = now_timestamp();
    let gift = Gift {
        id: None,
        person_id: input.person_id,
        person_name: person.name,
        occasion_id: input.occasion_id,
        occasion_name,
        date,
        note: normalize(&input.note),
        status: input.status.unwrap_or(default_status(input.kind)),
        kind: Some(input.kind),
        source_idea_id: None,
        created_at: now.clone(),
        updated_at: now,
    };

    let id = db.insert_gift(uid, &gift)?;
    tracing::info!(uid, id, kind = %input.kind, "gift created");
    Ok(id)
}

pub fn get_gift(db: &Database, uid: &str, id: i64) -> Result<Gift, ServiceError> {
    db.get_gift(uid, id)?
        .ok_or_else(|| ServiceError::NotFound("Geschenk nicht gefunden.".to_string()))
}

/// Planned gifts (including rows without a kind), newest date first
pub fn list_gifts(db: &Database, uid: &str) -> Result<Vec<Gift>, ServiceError> {
    Ok(db.list_gifts(uid, GiftKind::Planned)?)
}

/// Gifts already given, newest date first
pub fn list_past_gifts(db: &Database, uid: &str) -> Result<Vec<Gift>, ServiceError> {
    Ok(db.list_gifts(uid, GiftKind::Past)?)
}

pub fn list_gifts_by_person(db: &Database, uid: &str, person_id: i64) -> Result<Vec<Gift>, ServiceError> {
    Ok(db.list_gifts_by_person(uid, person_id)?)
}

pub fn update_gift(db: &Database, uid: &str, id: i64, patch: &GiftPatch) -> Result<(), ServiceError> {
    let mut gift = get_gift(db, uid, id)?;

    if let Some(person_id) = patch.person_id {
        gift.person_name = crate::persons::get_person(db, uid, person_id)?.name;
        gift.person_id = person_id;
    }
    if let Some(occasion_id) = patch.occasion_id {
        gift.occasion_name = match occasion_id {
            Some(oid) => crate::occasions::get_occasion(db, uid, oid)?.name,
            None => String::new(),
        };
        gift.occasion_id = occasion_id;
    }
    if let Some(date) = &patch.date {
        gift.date = require_date(date)?;
    }
    if let Some(note) = &patch.note {
        gift.note = normalize(note);
    }
    if let Some(status) = patch.status {
        gift.status = status;
    }
    if let Some(kind) = patch.kind {
        gift.kind = Some(kind);
    }
    gift.updated_at = now_timestamp();

    db.update_gift(uid, &gift)?;
    tracing::info!(uid, id, "gift updated");
    Ok(())
}

pub fn set_gift_status(db: &Database, uid: &str, id: i64, status: GiftStatus) -> Result<(), ServiceError> {
    update_gift(db, uid, id, &GiftPatch {
        status: Some(status),
        ..Default::default()
    })
}

pub fn delete_gift(db: &Database, uid: &str, id: i64) -> Result<(), ServiceError> {
    get_gift(db, uid, id)?;
    db.delete_gift(uid, id)?;
    tracing::info!(uid, id, "gift deleted");
    Ok(())
}

pub fn has_gifts_by_person(db: &Database, uid: &str, person_id: i64) -> Result<bool, ServiceError> {
    Ok(db.has_gifts_by_person(uid, person_id)?)
}

/// Next status in the cycle offen -> besorgt -> ueberreicht -> offen
pub fn next_status(status: GiftStatus) -> GiftStatus {
    match status {
        GiftStatus::Offen => GiftStatus::Besorgt,
        GiftStatus::Besorgt => GiftStatus::Ueberreicht,
        GiftStatus::Ueberreicht => GiftStatus::Offen,
    }
}

/// Turn an idea into a planned gift and mark the idea `erledigt`.
/// Both writes happen in one transaction.
pub fn convert_idea_to_gift(
    db: &Database,
    uid: &str,
    idea_id: i64,
    options: &ConvertOptions,
) -> Result<i64, ServiceError> {
    let mut idea = crate::gift_ideas::get_gift_idea(db, uid, idea_id)?;

    let date = match options.date.as_deref() {
        Some(date) if !date.trim().is_empty() => require_date(date)?,
        _ => get_current_date_string(),
    };
    let note = match options.note.as_deref().map(str::trim) {
        Some(note) if !note.is_empty() => note.to_string(),
        _ if idea.idea_type == IdeaType::Text => idea.content.clone(),
        _ => String::new(),
    };

    let now = now_timestamp();
    let gift = Gift {
        id: None,
        person_id: idea.person_id,
        person_name: idea.person_name.clone(),
        occasion_id: idea.occasion_id,
        occasion_name: idea.occasion_name.clone(),
        date,
        note,
        status: GiftStatus::Offen,
        kind: Some(GiftKind::Planned),
        source_idea_id: Some(idea_id),
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    idea.status = IdeaStatus::Erledigt;
    idea.updated_at = now;

    let gift_id = db.convert_idea_to_gift(uid, &idea, &gift)?;
    tracing::info!(uid, idea_id, gift_id, "gift idea converted");
    Ok(gift_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift_ideas::{self, IdeaInput};
    use crate::persons::{self, PersonInput};

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let anna = persons::create_person(&db, "u1", &PersonInput {
            name: "Anna".to_string(),
            ..Default::default()
        })
        .unwrap();
        (db, anna)
    }

    fn input(person_id: i64, date: &str, kind: GiftKind) -> GiftInput {
        GiftInput {
            person_id,
            occasion_id: None,
            date: date.to_string(),
            note: String::new(),
            status: None,
            kind,
        }
    }

    #[test]
    fn kinds_are_listed_separately() {
        let (db, anna) = setup();
        create_gift(&db, "u1", &input(anna, "2025-12-24", GiftKind::Planned)).unwrap();
        let past = create_gift(&db, "u1", &input(anna, "2023-12-24", GiftKind::Past)).unwrap();

        let planned = list_gifts(&db, "u1").unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].status, GiftStatus::Offen);

        let given = list_past_gifts(&db, "u1").unwrap();
        assert_eq!(given.len(), 1);
        assert_eq!(given[0].id, Some(past));
        assert_eq!(given[0].status, GiftStatus::Ueberreicht);

        assert_eq!(list_gifts_by_person(&db, "u1", anna).unwrap().len(), 2);
    }

    #[test]
    fn date_is_required() {
        let (db, anna) = setup();
        let err = create_gift(&db, "u1", &input(anna, "24.12.2025", GiftKind::Planned)).unwrap_err();
        assert_eq!(err.to_string(), "Ungültiges Datum (YYYY-MM-DD).");
    }

    #[test]
    fn patch_and_status() {
        let (db, anna) = setup();
        let id = create_gift(&db, "u1", &input(anna, "2025-12-24", GiftKind::Planned)).unwrap();
        update_gift(&db, "u1", id, &GiftPatch {
            note: Some(" Schal ".to_string()),
            kind: Some(GiftKind::Past),
            ..Default::default()
        })
        .unwrap();
        set_gift_status(&db, "u1", id, GiftStatus::Ueberreicht).unwrap();

        let gift = get_gift(&db, "u1", id).unwrap();
        assert_eq!(gift.note, "Schal");
        assert_eq!(gift.effective_kind(), GiftKind::Past);
        assert_eq!(gift.status, GiftStatus::Ueberreicht);
        assert!(list_gifts(&db, "u1").unwrap().is_empty());
    }

    #[test]
    fn converting_a_text_idea() {
        let (db, anna) = setup();
        let idea_id = gift_ideas::create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();

        let gift_id = convert_idea_to_gift(&db, "u1", idea_id, &ConvertOptions::default()).unwrap();

        let gift = get_gift(&db, "u1", gift_id).unwrap();
        assert_eq!(gift.note, "Buch");
        assert_eq!(gift.status, GiftStatus::Offen);
        assert_eq!(gift.source_idea_id, Some(idea_id));
        assert_eq!(gift.date, get_current_date_string());
        assert_eq!(gift.effective_kind(), GiftKind::Planned);

        let idea = gift_ideas::get_gift_idea(&db, "u1", idea_id).unwrap();
        assert_eq!(idea.status, IdeaStatus::Erledigt);
    }

    #[test]
    fn converting_a_link_idea_keeps_note_empty() {
        let (db, anna) = setup();
        let link = IdeaInput {
            idea_type: IdeaType::Link,
            ..IdeaInput::text(anna, "https://example.com/buch")
        };
        let idea_id = gift_ideas::create_gift_idea(&db, "u1", &link).unwrap();

        let options = ConvertOptions { date: Some("2025-12-24".to_string()), note: None };
        let gift_id = convert_idea_to_gift(&db, "u1", idea_id, &options).unwrap();
        let gift = get_gift(&db, "u1", gift_id).unwrap();
        assert_eq!(gift.note, "");
        assert_eq!(gift.date, "2025-12-24");
    }

    #[test]
    fn converting_a_missing_idea_fails() {
        let (db, _) = setup();
        let err = convert_idea_to_gift(&db, "u1", 42, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Geschenkidee nicht gefunden.");
        assert!(list_gifts(&db, "u1").unwrap().is_empty());
    }
}
