use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{
    Gift, GiftIdea, GiftKind, Occasion, Person, ShareLinkRecord,
};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Record has no id")]
    MissingId,
}

pub struct Database {
    conn: Connection,
}

const PERSON_COLUMNS: &str = "id, name, birthday, info, created_at, updated_at";
const OCCASION_COLUMNS: &str =
    "id, name, date, person, type, is_active, info, created_at, updated_at";
const IDEA_COLUMNS: &str = "id, person_id, person_name, occasion_id, occasion_name, type, content, status, created_at, updated_at";
const GIFT_COLUMNS: &str = "id, person_id, person_name, occasion_id, occasion_name, date, note, status, kind, source_idea_id, created_at, updated_at";
const SHARE_COLUMNS: &str = "token, uid, kind, person_id, person_name, idea_id, payload, expires_at, is_active, created_at, updated_at";

/// Read a TEXT column into one of the string-backed model enums
fn parse_column<T: FromStr<Err = String>>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|value: String| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown value '{}'", value).into(),
        )
    })
}

fn bool_to_sql(flag: bool) -> i64 {
    if flag { 1 } else { 0 }
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Open a private in-memory database with the full schema
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS persons (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                uid             TEXT NOT NULL,
                name            TEXT NOT NULL,
                birthday        TEXT,
                info            TEXT NOT NULL DEFAULT '',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS occasions (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                uid             TEXT NOT NULL,
                name            TEXT NOT NULL,
                date            TEXT,
                person          TEXT NOT NULL DEFAULT '',
                type            TEXT NOT NULL DEFAULT 'custom',
                is_active       INTEGER NOT NULL DEFAULT 1,
                info            TEXT NOT NULL DEFAULT '',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS gift_ideas (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                uid             TEXT NOT NULL,
                person_id       INTEGER NOT NULL,
                person_name     TEXT NOT NULL,
                occasion_id     INTEGER,
                occasion_name   TEXT NOT NULL DEFAULT '',
                type            TEXT NOT NULL DEFAULT 'text',
                content         TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'offen',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS gifts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                uid             TEXT NOT NULL,
                person_id       INTEGER NOT NULL,
                person_name     TEXT NOT NULL,
                occasion_id     INTEGER,
                occasion_name   TEXT NOT NULL DEFAULT '',
                date            TEXT NOT NULL,
                note            TEXT NOT NULL DEFAULT '',
                status          TEXT NOT NULL DEFAULT 'offen',
                source_idea_id  INTEGER,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS share_links (
                token           TEXT PRIMARY KEY,
                uid             TEXT NOT NULL,
                kind            TEXT NOT NULL,
                person_id       TEXT NOT NULL DEFAULT '',
                person_name     TEXT NOT NULL DEFAULT '',
                idea_id         INTEGER,
                payload         TEXT NOT NULL,
                expires_at      INTEGER NOT NULL,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_persons_uid ON persons(uid, name);
            CREATE INDEX IF NOT EXISTS idx_occasions_uid ON occasions(uid, type);
            CREATE INDEX IF NOT EXISTS idx_gift_ideas_person ON gift_ideas(uid, person_id);
            CREATE INDEX IF NOT EXISTS idx_gift_ideas_occasion ON gift_ideas(uid, occasion_id);
            CREATE INDEX IF NOT EXISTS idx_gifts_person ON gifts(uid, person_id);
            CREATE INDEX IF NOT EXISTS idx_share_links_uid ON share_links(uid);",
        )?;

        // Gift kinds arrived after the first release
        self.migrate_add_gift_kind()?;

        Ok(())
    }

    /// Add the nullable `kind` column to gifts; existing rows stay NULL (planned)
    fn migrate_add_gift_kind(&self) -> Result<(), DatabaseError> {
        fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DatabaseError> {
            let mut stmt = conn.prepare(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2"
            )?;
            let count: i64 = stmt.query_row(rusqlite::params![table, column], |row| row.get(0))?;
            Ok(count > 0)
        }

        if !column_exists(&self.conn, "gifts", "kind")? {
            self.conn.execute("ALTER TABLE gifts ADD COLUMN kind TEXT", [])?;
        }

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn ensure_changed(changed: usize, what: &str, id: impl std::fmt::Display) -> Result<(), DatabaseError> {
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("{} {}", what, id)));
        }
        Ok(())
    }

    // ----- persons -----

    fn row_to_person(row: &rusqlite::Row) -> Result<Person, rusqlite::Error> {
        Ok(Person {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            birthday: row.get(2)?,
            info: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Insert a person and return its ID
    pub fn insert_person(&self, uid: &str, person: &Person) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO persons (uid, name, birthday, info, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                uid,
                person.name,
                person.birthday,
                person.info,
                person.created_at,
                person.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_person(&self, uid: &str, id: i64) -> Result<Option<Person>, DatabaseError> {
        let sql = format!("SELECT {} FROM persons WHERE uid = ?1 AND id = ?2", PERSON_COLUMNS);
        let person = self.conn
            .query_row(&sql, rusqlite::params![uid, id], Self::row_to_person)
            .optional()?;
        Ok(person)
    }

    /// All persons of a user ordered by name
    pub fn list_persons(&self, uid: &str) -> Result<Vec<Person>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM persons WHERE uid = ?1 ORDER BY name COLLATE NOCASE ASC, id ASC",
            PERSON_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let persons = stmt.query_map(rusqlite::params![uid], Self::row_to_person)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    pub fn update_person(&self, uid: &str, person: &Person) -> Result<(), DatabaseError> {
        let id = person.id.ok_or(DatabaseError::MissingId)?;
        let changed = self.conn.execute(
            "UPDATE persons SET name = ?1, birthday = ?2, info = ?3, updated_at = ?4
             WHERE uid = ?5 AND id = ?6",
            rusqlite::params![person.name, person.birthday, person.info, person.updated_at, uid, id],
        )?;
        Self::ensure_changed(changed, "person", id)
    }

    pub fn delete_person(&self, uid: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "DELETE FROM persons WHERE uid = ?1 AND id = ?2",
            rusqlite::params![uid, id],
        )?;
        Self::ensure_changed(changed, "person", id)
    }

    // ----- occasions -----

    fn row_to_occasion(row: &rusqlite::Row) -> Result<Occasion, rusqlite::Error> {
        Ok(Occasion {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            date: row.get(2)?,
            person: row.get(3)?,
            occasion_type: parse_column(row, 4)?,
            is_active: row.get::<_, i64>(5)? != 0,
            info: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    pub fn insert_occasion(&self, uid: &str, occasion: &Occasion) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO occasions (uid, name, date, person, type, is_active, info, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                uid,
                occasion.name,
                occasion.date,
                occasion.person,
                occasion.occasion_type.as_str(),
                bool_to_sql(occasion.is_active),
                occasion.info,
                occasion.created_at,
                occasion.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_occasion(&self, uid: &str, id: i64) -> Result<Option<Occasion>, DatabaseError> {
        let sql = format!("SELECT {} FROM occasions WHERE uid = ?1 AND id = ?2", OCCASION_COLUMNS);
        let occasion = self.conn
            .query_row(&sql, rusqlite::params![uid, id], Self::row_to_occasion)
            .optional()?;
        Ok(occasion)
    }

    /// All occasions of a user ordered by name
    pub fn list_occasions(&self, uid: &str) -> Result<Vec<Occasion>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM occasions WHERE uid = ?1 ORDER BY name COLLATE NOCASE ASC, id ASC",
            OCCASION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let occasions = stmt.query_map(rusqlite::params![uid], Self::row_to_occasion)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(occasions)
    }

    /// Whether the user already has at least one fixed occasion
    pub fn has_fixed_occasion(&self, uid: &str) -> Result<bool, DatabaseError> {
        let found = self.conn
            .query_row(
                "SELECT 1 FROM occasions WHERE uid = ?1 AND type = 'fixed' LIMIT 1",
                rusqlite::params![uid],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn update_occasion(&self, uid: &str, occasion: &Occasion) -> Result<(), DatabaseError> {
        let id = occasion.id.ok_or(DatabaseError::MissingId)?;
        let changed = self.conn.execute(
            "UPDATE occasions SET name = ?1, date = ?2, person = ?3, type = ?4, is_active = ?5,
             info = ?6, updated_at = ?7 WHERE uid = ?8 AND id = ?9",
            rusqlite::params![
                occasion.name,
                occasion.date,
                occasion.person,
                occasion.occasion_type.as_str(),
                bool_to_sql(occasion.is_active),
                occasion.info,
                occasion.updated_at,
                uid,
                id
            ],
        )?;
        Self::ensure_changed(changed, "occasion", id)
    }

    pub fn delete_occasion(&self, uid: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "DELETE FROM occasions WHERE uid = ?1 AND id = ?2",
            rusqlite::params![uid, id],
        )?;
        Self::ensure_changed(changed, "occasion", id)
    }

    // ----- gift ideas -----

    fn row_to_gift_idea(row: &rusqlite::Row) -> Result<GiftIdea, rusqlite::Error> {
        Ok(GiftIdea {
            id: Some(row.get(0)?),
            person_id: row.get(1)?,
            person_name: row.get(2)?,
            occasion_id: row.get(3)?,
            occasion_name: row.get(4)?,
            idea_type: parse_column(row, 5)?,
            content: row.get(6)?,
            status: parse_column(row, 7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn insert_gift_idea_on(conn: &Connection, uid: &str, idea: &GiftIdea) -> Result<i64, DatabaseError> {
        conn.execute(
            "INSERT INTO gift_ideas (uid, person_id, person_name, occasion_id, occasion_name, type, content, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                uid,
                idea.person_id,
                idea.person_name,
                idea.occasion_id,
                idea.occasion_name,
                idea.idea_type.as_str(),
                idea.content,
                idea.status.as_str(),
                idea.created_at,
                idea.updated_at
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_gift_idea(&self, uid: &str, idea: &GiftIdea) -> Result<i64, DatabaseError> {
        Self::insert_gift_idea_on(&self.conn, uid, idea)
    }

    pub fn get_gift_idea(&self, uid: &str, id: i64) -> Result<Option<GiftIdea>, DatabaseError> {
        let sql = format!("SELECT {} FROM gift_ideas WHERE uid = ?1 AND id = ?2", IDEA_COLUMNS);
        let idea = self.conn
            .query_row(&sql, rusqlite::params![uid, id], Self::row_to_gift_idea)
            .optional()?;
        Ok(idea)
    }

    /// All gift ideas of a user, most recently updated first
    pub fn list_gift_ideas(&self, uid: &str) -> Result<Vec<GiftIdea>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gift_ideas WHERE uid = ?1 ORDER BY updated_at DESC, id DESC",
            IDEA_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ideas = stmt.query_map(rusqlite::params![uid], Self::row_to_gift_idea)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ideas)
    }

    /// Gift ideas for one person in insertion order
    pub fn list_gift_ideas_by_person(&self, uid: &str, person_id: i64) -> Result<Vec<GiftIdea>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gift_ideas WHERE uid = ?1 AND person_id = ?2 ORDER BY id ASC",
            IDEA_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ideas = stmt.query_map(rusqlite::params![uid, person_id], Self::row_to_gift_idea)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ideas)
    }

    fn update_gift_idea_on(conn: &Connection, uid: &str, idea: &GiftIdea) -> Result<(), DatabaseError> {
        let id = idea.id.ok_or(DatabaseError::MissingId)?;
        let changed = conn.execute(
            "UPDATE gift_ideas SET person_id = ?1, person_name = ?2, occasion_id = ?3, occasion_name = ?4,
             type = ?5, content = ?6, status = ?7, updated_at = ?8 WHERE uid = ?9 AND id = ?10",
            rusqlite::params![
                idea.person_id,
                idea.person_name,
                idea.occasion_id,
                idea.occasion_name,
                idea.idea_type.as_str(),
                idea.content,
                idea.status.as_str(),
                idea.updated_at,
                uid,
                id
            ],
        )?;
        Self::ensure_changed(changed, "gift idea", id)
    }

    pub fn update_gift_idea(&self, uid: &str, idea: &GiftIdea) -> Result<(), DatabaseError> {
        Self::update_gift_idea_on(&self.conn, uid, idea)
    }

    pub fn delete_gift_idea(&self, uid: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "DELETE FROM gift_ideas WHERE uid = ?1 AND id = ?2",
            rusqlite::params![uid, id],
        )?;
        Self::ensure_changed(changed, "gift idea", id)
    }

    pub fn has_gift_ideas_by_person(&self, uid: &str, person_id: i64) -> Result<bool, DatabaseError> {
        self.exists(
            "SELECT 1 FROM gift_ideas WHERE uid = ?1 AND person_id = ?2 LIMIT 1",
            uid,
            person_id,
        )
    }

    pub fn has_gift_ideas_by_occasion(&self, uid: &str, occasion_id: i64) -> Result<bool, DatabaseError> {
        self.exists(
            "SELECT 1 FROM gift_ideas WHERE uid = ?1 AND occasion_id = ?2 LIMIT 1",
            uid,
            occasion_id,
        )
    }

    fn exists(&self, sql: &str, uid: &str, id: i64) -> Result<bool, DatabaseError> {
        let found = self.conn
            .query_row(sql, rusqlite::params![uid, id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    // ----- gifts -----

    fn row_to_gift(row: &rusqlite::Row) -> Result<Gift, rusqlite::Error> {
        let kind = match row.get::<_, Option<String>>(8)? {
            Some(_) => Some(parse_column(row, 8)?),
            None => None,
        };
        Ok(Gift {
            id: Some(row.get(0)?),
            person_id: row.get(1)?,
            person_name: row.get(2)?,
            occasion_id: row.get(3)?,
            occasion_name: row.get(4)?,
            date: row.get(5)?,
            note: row.get(6)?,
            status: parse_column(row, 7)?,
            kind,
            source_idea_id: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn insert_gift_on(conn: &Connection, uid: &str, gift: &Gift) -> Result<i64, DatabaseError> {
        conn.execute(
            "INSERT INTO gifts (uid, person_id, person_name, occasion_id, occasion_name, date, note, status, kind, source_idea_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                uid,
                gift.person_id,
                gift.person_name,
                gift.occasion_id,
                gift.occasion_name,
                gift.date,
                gift.note,
                gift.status.as_str(),
                gift.kind.map(GiftKind::as_str),
                gift.source_idea_id,
                gift.created_at,
                gift.updated_at
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_gift(&self, uid: &str, gift: &Gift) -> Result<i64, DatabaseError> {
        Self::insert_gift_on(&self.conn, uid, gift)
    }

    pub fn get_gift(&self, uid: &str, id: i64) -> Result<Option<Gift>, DatabaseError> {
        let sql = format!("SELECT {} FROM gifts WHERE uid = ?1 AND id = ?2", GIFT_COLUMNS);
        let gift = self.conn
            .query_row(&sql, rusqlite::params![uid, id], Self::row_to_gift)
            .optional()?;
        Ok(gift)
    }

    /// Gifts of one kind, newest date first. Rows without a kind count as planned.
    pub fn list_gifts(&self, uid: &str, kind: GiftKind) -> Result<Vec<Gift>, DatabaseError> {
        let kind_clause = match kind {
            GiftKind::Planned => "(kind IS NULL OR kind != 'past')",
            GiftKind::Past => "kind = 'past'",
        };
        let sql = format!(
            "SELECT {} FROM gifts WHERE uid = ?1 AND {} ORDER BY date DESC, id DESC",
            GIFT_COLUMNS, kind_clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let gifts = stmt.query_map(rusqlite::params![uid], Self::row_to_gift)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(gifts)
    }

    /// Every gift of one person regardless of kind, newest date first
    pub fn list_gifts_by_person(&self, uid: &str, person_id: i64) -> Result<Vec<Gift>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM gifts WHERE uid = ?1 AND person_id = ?2 ORDER BY date DESC, id DESC",
            GIFT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let gifts = stmt.query_map(rusqlite::params![uid, person_id], Self::row_to_gift)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(gifts)
    }

    pub fn update_gift(&self, uid: &str, gift: &Gift) -> Result<(), DatabaseError> {
        let id = gift.id.ok_or(DatabaseError::MissingId)?;
        let changed = self.conn.execute(
            "UPDATE gifts SET person_id = ?1, person_name = ?2, occasion_id = ?3, occasion_name = ?4,
             date = ?5, note = ?6, status = ?7, kind = ?8, source_idea_id = ?9, updated_at = ?10
             WHERE uid = ?11 AND id = ?12",
            rusqlite::params![
                gift.person_id,
                gift.person_name,
                gift.occasion_id,
                gift.occasion_name,
                gift.date,
                gift.note,
                gift.status.as_str(),
                gift.kind.map(GiftKind::as_str),
                gift.source_idea_id,
                gift.updated_at,
                uid,
                id
            ],
        )?;
        Self::ensure_changed(changed, "gift", id)
    }

    pub fn delete_gift(&self, uid: &str, id: i64) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "DELETE FROM gifts WHERE uid = ?1 AND id = ?2",
            rusqlite::params![uid, id],
        )?;
        Self::ensure_changed(changed, "gift", id)
    }

    pub fn has_gifts_by_person(&self, uid: &str, person_id: i64) -> Result<bool, DatabaseError> {
        self.exists(
            "SELECT 1 FROM gifts WHERE uid = ?1 AND person_id = ?2 LIMIT 1",
            uid,
            person_id,
        )
    }

    /// Insert the gift and store the updated source idea in one transaction
    pub fn convert_idea_to_gift(&self, uid: &str, idea: &GiftIdea, gift: &Gift) -> Result<i64, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let gift_id = Self::insert_gift_on(&tx, uid, gift)?;
        Self::update_gift_idea_on(&tx, uid, idea)?;
        tx.commit()?;
        Ok(gift_id)
    }

    // ----- share links -----

    fn row_to_share_link(row: &rusqlite::Row) -> Result<ShareLinkRecord, rusqlite::Error> {
        Ok(ShareLinkRecord {
            token: row.get(0)?,
            uid: row.get(1)?,
            kind: row.get(2)?,
            person_id: row.get(3)?,
            person_name: row.get(4)?,
            idea_id: row.get(5)?,
            payload: row.get(6)?,
            expires_at: row.get(7)?,
            is_active: row.get::<_, i64>(8)? != 0,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    pub fn insert_share_link(&self, link: &ShareLinkRecord) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO share_links (token, uid, kind, person_id, person_name, idea_id, payload, expires_at, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                link.token,
                link.uid,
                link.kind,
                link.person_id,
                link.person_name,
                link.idea_id,
                link.payload,
                link.expires_at,
                bool_to_sql(link.is_active),
                link.created_at,
                link.updated_at
            ],
        )?;
        Ok(())
    }

    /// Look up a share link by token; not scoped to any user
    pub fn get_share_link(&self, token: &str) -> Result<Option<ShareLinkRecord>, DatabaseError> {
        let sql = format!("SELECT {} FROM share_links WHERE token = ?1", SHARE_COLUMNS);
        let link = self.conn
            .query_row(&sql, rusqlite::params![token], Self::row_to_share_link)
            .optional()?;
        Ok(link)
    }

    /// Share links created by a user, newest first
    pub fn list_share_links(&self, uid: &str) -> Result<Vec<ShareLinkRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM share_links WHERE uid = ?1 ORDER BY created_at DESC, rowid DESC",
            SHARE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let links = stmt.query_map(rusqlite::params![uid], Self::row_to_share_link)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    /// Flip the active flag of a link owned by `uid`
    pub fn set_share_link_active(&self, uid: &str, token: &str, is_active: bool, updated_at: &str) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE share_links SET is_active = ?1, updated_at = ?2 WHERE token = ?3 AND uid = ?4",
            rusqlite::params![bool_to_sql(is_active), updated_at, token, uid],
        )?;
        Self::ensure_changed(changed, "share link", token)
    }
}
