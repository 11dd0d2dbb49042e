use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{GiftIdea, IdeaStatus, IdeaType, now_timestamp};
use crate::validate::validate_content_by_type;

#[derive(Debug, Clone)]
pub struct IdeaInput {
    pub person_id: i64,
    pub occasion_id: Option<i64>,
    pub idea_type: IdeaType,
    pub content: String,
    pub status: IdeaStatus,
}

impl IdeaInput {
    /// An open text idea without occasion
    pub fn text(person_id: i64, content: &str) -> Self {
        Self {
            person_id,
            occasion_id: None,
            idea_type: IdeaType::Text,
            content: content.to_string(),
            status: IdeaStatus::Offen,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
/// `occasion_id: Some(None)` detaches the occasion.
#[derive(Debug, Clone, Default)]
pub struct IdeaPatch {
    pub person_id: Option<i64>,
    pub occasion_id: Option<Option<i64>>,
    pub idea_type: Option<IdeaType>,
    pub content: Option<String>,
    pub status: Option<IdeaStatus>,
}

fn person_name(db: &Database, uid: &str, person_id: i64) -> Result<String, ServiceError> {
    Ok(crate::persons::get_person(db, uid, person_id)?.name)
}

fn occasion_name(db: &Database, uid: &str, occasion_id: Option<i64>) -> Result<String, ServiceError> {
    match occasion_id {
        Some(id) => Ok(crate::occasions::get_occasion(db, uid, id)?.name),
        None => Ok(String::new()),
    }
}

pub fn create_gift_idea(db: &Database, uid: &str, input: &IdeaInput) -> Result<i64, ServiceError> {
    let content = validate_content_by_type(input.idea_type, &input.content)?;
    let now = now_timestamp();
    let idea = GiftIdea {
        id: None,
        person_id: input.person_id,
        person_name: person_name(db, uid, input.person_id)?,
        occasion_id: input.occasion_id,
        occasion_name: occasion_name(db, uid, input.occasion_id)?,
        idea_type: input.idea_type,
        content,
        status: input.status,
        created_at: now.clone(),
        updated_at: now,
    };

    let id = db.insert_gift_idea(uid, &idea)?;
    tracing::info!(uid, id, person_id = idea.person_id, "gift idea created");
    Ok(id)
}

pub fn get_gift_idea(db: &Database, uid: &str, id: i64) -> Result<GiftIdea, ServiceError> {
    db.get_gift_idea(uid, id)?
        .ok_or_else(|| ServiceError::NotFound("Geschenkidee nicht gefunden.".to_string()))
}

/// All ideas, most recently updated first
pub fn list_gift_ideas(db: &Database, uid: &str) -> Result<Vec<GiftIdea>, ServiceError> {
    Ok(db.list_gift_ideas(uid)?)
}

/// Ideas of one person ordered by status name (besorgt, erledigt, offen)
pub fn list_gift_ideas_by_person(db: &Database, uid: &str, person_id: i64) -> Result<Vec<GiftIdea>, ServiceError> {
    let mut ideas = db.list_gift_ideas_by_person(uid, person_id)?;
    ideas.sort_by_key(|i| i.status.as_str().to_lowercase());
    Ok(ideas)
}

pub fn update_gift_idea(db: &Database, uid: &str, id: i64, patch: &IdeaPatch) -> Result<(), ServiceError> {
    let mut idea = get_gift_idea(db, uid, id)?;

    if let Some(person_id) = patch.person_id {
        idea.person_name = person_name(db, uid, person_id)?;
        idea.person_id = person_id;
    }
    if let Some(occasion_id) = patch.occasion_id {
        idea.occasion_name = occasion_name(db, uid, occasion_id)?;
        idea.occasion_id = occasion_id;
    }
    if let Some(idea_type) = patch.idea_type {
        idea.idea_type = idea_type;
    }
    // A type change must still fit the stored content
    if patch.content.is_some() || patch.idea_type.is_some() {
        let content = patch.content.as_deref().unwrap_or(&idea.content);
        idea.content = validate_content_by_type(idea.idea_type, content)?;
    }
    if let Some(status) = patch.status {
        idea.status = status;
    }
    idea.updated_at = now_timestamp();

    db.update_gift_idea(uid, &idea)?;
    tracing::info!(uid, id, "gift idea updated");
    Ok(())
}

pub fn set_gift_idea_status(db: &Database, uid: &str, id: i64, status: IdeaStatus) -> Result<(), ServiceError> {
    update_gift_idea(db, uid, id, &IdeaPatch {
        status: Some(status),
        ..Default::default()
    })
}

pub fn delete_gift_idea(db: &Database, uid: &str, id: i64) -> Result<(), ServiceError> {
    get_gift_idea(db, uid, id)?;
    db.delete_gift_idea(uid, id)?;
    tracing::info!(uid, id, "gift idea deleted");
    Ok(())
}

pub fn has_gift_ideas_by_person(db: &Database, uid: &str, person_id: i64) -> Result<bool, ServiceError> {
    Ok(db.has_gift_ideas_by_person(uid, person_id)?)
}

pub fn has_gift_ideas_by_occasion(db: &Database, uid: &str, occasion_id: i64) -> Result<bool, ServiceError> {
    Ok(db.has_gift_ideas_by_occasion(uid, occasion_id)?)
}

/// Next status in the cycle offen -> besorgt -> erledigt -> offen
pub fn next_status(status: IdeaStatus) -> IdeaStatus {
    match status {
        IdeaStatus::Offen => IdeaStatus::Besorgt,
        IdeaStatus::Besorgt => IdeaStatus::Erledigt,
        IdeaStatus::Erledigt => IdeaStatus::Offen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occasions::{self, OccasionInput};
    use crate::models::OccasionType;
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

    fn link(person_id: i64, url: &str) -> IdeaInput {
        IdeaInput {
            idea_type: IdeaType::Link,
            ..IdeaInput::text(person_id, url)
        }
    }

    #[test]
    fn create_copies_person_and_occasion_names() {
        let (db, anna) = setup();
        let party = occasions::create_occasion(&db, "u1", &OccasionInput {
            name: "Geburtstag".to_string(),
            date: "2025-03-01".to_string(),
            person: "Anna".to_string(),
            occasion_type: OccasionType::Fixed,
            info: String::new(),
        })
        .unwrap();

        let mut input = IdeaInput::text(anna, "  Buch ");
        input.occasion_id = Some(party);
        let id = create_gift_idea(&db, "u1", &input).unwrap();

        let idea = get_gift_idea(&db, "u1", id).unwrap();
        assert_eq!(idea.person_name, "Anna");
        assert_eq!(idea.occasion_name, "Geburtstag");
        assert_eq!(idea.content, "Buch");
        assert_eq!(idea.status, IdeaStatus::Offen);
    }

    #[test]
    fn unknown_person_is_rejected() {
        let (db, _) = setup();
        let err = create_gift_idea(&db, "u1", &IdeaInput::text(999, "Buch")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn link_ideas_need_a_web_url() {
        let (db, anna) = setup();
        let err = create_gift_idea(&db, "u1", &link(anna, "ftp://example.com")).unwrap_err();
        assert_eq!(err.to_string(), "Bitte eine gültige URL angeben (http/https).");
        assert!(create_gift_idea(&db, "u1", &link(anna, "https://example.com/buch")).is_ok());
        assert!(create_gift_idea(&db, "u1", &IdeaInput::text(anna, "ftp://example.com")).is_ok());
    }

    #[test]
    fn patch_validates_against_effective_type() {
        let (db, anna) = setup();
        let id = create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();

        let to_link = IdeaPatch { idea_type: Some(IdeaType::Link), ..Default::default() };
        assert!(update_gift_idea(&db, "u1", id, &to_link).is_err());

        let with_url = IdeaPatch {
            idea_type: Some(IdeaType::Link),
            content: Some("https://example.com/buch".to_string()),
            ..Default::default()
        };
        update_gift_idea(&db, "u1", id, &with_url).unwrap();

        let bad_content = IdeaPatch { content: Some("kein link".to_string()), ..Default::default() };
        assert!(update_gift_idea(&db, "u1", id, &bad_content).is_err());
        assert_eq!(get_gift_idea(&db, "u1", id).unwrap().content, "https://example.com/buch");
    }

    #[test]
    fn person_list_is_ordered_by_status_name() {
        let (db, anna) = setup();
        let done = create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Schal")).unwrap();
        let bought = create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Tasse")).unwrap();
        create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();
        set_gift_idea_status(&db, "u1", done, IdeaStatus::Erledigt).unwrap();
        set_gift_idea_status(&db, "u1", bought, IdeaStatus::Besorgt).unwrap();

        let contents: Vec<_> = list_gift_ideas_by_person(&db, "u1", anna)
            .unwrap()
            .into_iter()
            .map(|i| i.content)
            .collect();
        assert_eq!(contents, ["Tasse", "Schal", "Buch"]);
    }

    #[test]
    fn delete_and_existence() {
        let (db, anna) = setup();
        let id = create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();
        assert!(has_gift_ideas_by_person(&db, "u1", anna).unwrap());
        delete_gift_idea(&db, "u1", id).unwrap();
        assert!(!has_gift_ideas_by_person(&db, "u1", anna).unwrap());
        assert!(matches!(delete_gift_idea(&db, "u1", id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn status_cycle() {
        assert_eq!(next_status(IdeaStatus::Offen), IdeaStatus::Besorgt);
        assert_eq!(next_status(IdeaStatus::Erledigt), IdeaStatus::Offen);
    }
}
