use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{Person, now_timestamp};
use crate::validate::{normalize, optional_date, require_non_empty};

/// Fields accepted when creating or editing a person
#[derive(Debug, Clone, Default)]
pub struct PersonInput {
    pub name: String,
    pub birthday: Option<String>,
    pub info: String,
}

/// List filter: substring search over name and info, plus a birthday toggle
#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
    pub query: String,
    pub only_with_birthday: bool,
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        let term = self.query.trim().to_lowercase();
        let matches_search = term.is_empty()
            || person.name.to_lowercase().contains(&term)
            || person.info.to_lowercase().contains(&term);
        let has_birthday = person
            .birthday
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        matches_search && (!self.only_with_birthday || has_birthday)
    }
}

pub fn create_person(db: &Database, uid: &str, input: &PersonInput) -> Result<i64, ServiceError> {
    let mut person = Person::new(require_non_empty("Name", &input.name)?);
    person.birthday = optional_date(input.birthday.as_deref())?;
    person.info = normalize(&input.info);

    let id = db.insert_person(uid, &person)?;
    tracing::info!(uid, id, "person created");
    Ok(id)
}

pub fn get_person(db: &Database, uid: &str, id: i64) -> Result<Person, ServiceError> {
    db.get_person(uid, id)?
        .ok_or_else(|| ServiceError::NotFound("Person nicht gefunden.".to_string()))
}

pub fn list_persons(db: &Database, uid: &str) -> Result<Vec<Person>, ServiceError> {
    Ok(db.list_persons(uid)?)
}

pub fn filter_persons<'a>(persons: &'a [Person], filter: &PersonFilter) -> Vec<&'a Person> {
    persons.iter().filter(|p| filter.matches(p)).collect()
}

/// Replace name, birthday and info of an existing person
pub fn update_person(db: &Database, uid: &str, id: i64, input: &PersonInput) -> Result<(), ServiceError> {
    let mut person = get_person(db, uid, id)?;
    person.name = require_non_empty("Name", &input.name)?;
    person.birthday = optional_date(input.birthday.as_deref())?;
    person.info = normalize(&input.info);
    person.updated_at = now_timestamp();

    db.update_person(uid, &person)?;
    tracing::info!(uid, id, "person updated");
    Ok(())
}

/// Delete a person that nothing references yet
pub fn delete_person(db: &Database, uid: &str, id: i64) -> Result<(), ServiceError> {
    if db.has_gift_ideas_by_person(uid, id)? || db.has_gifts_by_person(uid, id)? {
        return Err(ServiceError::Forbidden(
            "Diese Person kann nicht gelöscht werden, weil bereits Geschenkideen oder Geschenke existieren."
                .to_string(),
        ));
    }
    get_person(db, uid, id)?;
    db.delete_person(uid, id)?;
    tracing::info!(uid, id, "person deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift_ideas::{self, IdeaInput};

    fn input(name: &str) -> PersonInput {
        PersonInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_trims_and_validates() {
        let db = Database::in_memory().unwrap();
        let id = create_person(
            &db,
            "u1",
            &PersonInput {
                name: "  Anna ".to_string(),
                birthday: Some("1990-05-01".to_string()),
                info: " mag Bücher ".to_string(),
            },
        )
        .unwrap();

        let anna = get_person(&db, "u1", id).unwrap();
        assert_eq!(anna.name, "Anna");
        assert_eq!(anna.info, "mag Bücher");
        assert_eq!(anna.birthday.as_deref(), Some("1990-05-01"));

        assert_eq!(
            create_person(&db, "u1", &input(" ")).unwrap_err().to_string(),
            "Name ist Pflicht."
        );
        let bad_birthday = PersonInput {
            birthday: Some("1.5.1990".to_string()),
            ..input("Ben")
        };
        assert!(create_person(&db, "u1", &bad_birthday).is_err());
    }

    #[test]
    fn update_replaces_fields() {
        let db = Database::in_memory().unwrap();
        let id = create_person(&db, "u1", &input("Anna")).unwrap();
        update_person(&db, "u1", id, &PersonInput {
            name: "Anna Berg".to_string(),
            birthday: None,
            info: "Kollegin".to_string(),
        })
        .unwrap();

        let anna = get_person(&db, "u1", id).unwrap();
        assert_eq!(anna.name, "Anna Berg");
        assert_eq!(anna.info, "Kollegin");
        assert!(matches!(update_person(&db, "u2", id, &input("X")), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn filter_by_search_and_birthday() {
        let db = Database::in_memory().unwrap();
        create_person(&db, "u1", &PersonInput {
            name: "Anna".to_string(),
            birthday: Some("1990-05-01".to_string()),
            info: String::new(),
        })
        .unwrap();
        create_person(&db, "u1", &PersonInput {
            name: "Ben".to_string(),
            birthday: None,
            info: "Nachbar, liebt Kaffee".to_string(),
        })
        .unwrap();
        let persons = list_persons(&db, "u1").unwrap();

        let coffee = PersonFilter { query: "KAFFEE".to_string(), only_with_birthday: false };
        let names: Vec<_> = filter_persons(&persons, &coffee).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ben"]);

        let birthdays = PersonFilter { query: String::new(), only_with_birthday: true };
        let names: Vec<_> = filter_persons(&persons, &birthdays).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Anna"]);
    }

    #[test]
    fn delete_is_blocked_while_ideas_exist() {
        let db = Database::in_memory().unwrap();
        let anna = create_person(&db, "u1", &input("Anna")).unwrap();
        let ben = create_person(&db, "u1", &input("Ben")).unwrap();
        gift_ideas::create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();

        let err = delete_person(&db, "u1", anna).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(err.to_string().starts_with("Diese Person kann nicht gelöscht werden"));

        delete_person(&db, "u1", ben).unwrap();
        assert_eq!(list_persons(&db, "u1").unwrap().len(), 1);
    }
}
