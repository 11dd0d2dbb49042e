//! Public share links.
//!
//! A share link stores a denormalized snapshot of a user's gift ideas under
//! an unguessable token. Anyone holding the token can read the snapshot
//! until the link expires or its owner deactivates it; nothing else of the
//! owner's data is reachable through it.

use rand::Rng;
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::config::ShareConfig;
use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{
    GiftIdea, PublicIdeaSnapshot, ShareContent, ShareKind, ShareLink, ShareLinkRecord,
    now_timestamp,
};
use crate::utils::now_millis;
use crate::validate::{normalize, require_non_empty};

/// Token symbols; `0 O 1 l I` are left out so tokens can be read aloud
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Lifetime used when a caller passes 0 days
pub const FALLBACK_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Link ungültig oder nicht gefunden.")]
    NotFound,
    #[error("Link ist deaktiviert.")]
    Inactive,
    #[error("Link ist abgelaufen.")]
    Expired,
    #[error("Link ist ungültig.")]
    Invalid,
}

impl ShareError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ShareError::NotFound => "SHARE_NOT_FOUND",
            ShareError::Inactive => "SHARE_INACTIVE",
            ShareError::Expired => "SHARE_EXPIRED",
            ShareError::Invalid => "SHARE_INVALID",
        }
    }
}

/// Random token drawn from the OS generator
pub fn generate_token(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Expiry in epoch ms. 0 days falls back to 30; anything else is clamped to at least 1 day.
/// Huge lifetimes saturate at `i64::MAX` instead of wrapping into the past.
pub fn ttl_to_expires_at(ttl_days: i64, now_ms: i64) -> i64 {
    let days = if ttl_days == 0 { FALLBACK_TTL_DAYS } else { ttl_days }.max(1);
    now_ms.saturating_add(days.saturating_mul(DAY_MS))
}

pub fn build_share_url(base_url: &str, token: &str) -> String {
    format!("{}?t={}", base_url, token)
}

/// Accept a bare token or any URL carrying it in a `t` query parameter
pub fn token_from_input(input: &str) -> String {
    let input = input.trim();
    let Some((_, query)) = input.split_once('?') else {
        return input.to_string();
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("t="))
        .unwrap_or_default()
        .to_string()
}

#[allow(clippy::too_many_arguments)]
fn store_link(
    db: &Database,
    uid: &str,
    config: &ShareConfig,
    kind: ShareKind,
    person_id: String,
    person_name: String,
    idea_id: Option<i64>,
    content: &ShareContent,
    ttl_days: Option<i64>,
) -> Result<String, ServiceError> {
    let payload = serde_json::to_string(content).map_err(|_| ShareError::Invalid)?;
    let token = generate_token(config.token_length);
    let now = now_timestamp();
    let record = ShareLinkRecord {
        token: token.clone(),
        uid: uid.to_string(),
        kind: kind.to_string(),
        person_id,
        person_name,
        idea_id,
        payload,
        expires_at: ttl_to_expires_at(ttl_days.unwrap_or(config.default_ttl_days), now_millis()),
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    db.insert_share_link(&record)?;
    tracing::info!(uid, kind = %kind, items = content.items().len(), "share link created");
    Ok(build_share_url(&config.base_url, &token))
}

/// Share every idea of one person. Returns the share URL.
pub fn create_share_link_gift_ideas_by_person(
    db: &Database,
    uid: &str,
    config: &ShareConfig,
    person_id: i64,
    person_name: &str,
    ttl_days: Option<i64>,
) -> Result<String, ServiceError> {
    let items: Vec<PublicIdeaSnapshot> = db
        .list_gift_ideas(uid)?
        .iter()
        .filter(|idea| idea.person_id == person_id)
        .map(PublicIdeaSnapshot::from)
        .collect();

    store_link(
        db,
        uid,
        config,
        ShareKind::GiftIdeasByPerson,
        person_id.to_string(),
        normalize(person_name),
        None,
        &ShareContent::Items { items },
        ttl_days,
    )
}

/// Share a single idea. Returns the share URL.
pub fn create_share_link_gift_idea(
    db: &Database,
    uid: &str,
    config: &ShareConfig,
    idea_id: i64,
    ttl_days: Option<i64>,
) -> Result<String, ServiceError> {
    let idea: GiftIdea = db
        .get_gift_idea(uid, idea_id)?
        .ok_or_else(|| ServiceError::NotFound("Geschenkidee nicht gefunden.".to_string()))?;

    store_link(
        db,
        uid,
        config,
        ShareKind::GiftIdea,
        idea.person_id.to_string(),
        normalize(&idea.person_name),
        Some(idea_id),
        &ShareContent::Item { item: PublicIdeaSnapshot::from(&idea) },
        ttl_days,
    )
}

/// Check a stored record against the clock and decode its payload
fn check_record(record: ShareLinkRecord, now_ms: i64) -> Result<ShareLink, ShareError> {
    if !record.is_active {
        return Err(ShareError::Inactive);
    }
    if record.expires_at == 0 || now_ms > record.expires_at {
        return Err(ShareError::Expired);
    }

    let kind: ShareKind = record.kind.parse().map_err(|_| ShareError::Invalid)?;
    let content: ShareContent =
        serde_json::from_str(&record.payload).map_err(|_| ShareError::Invalid)?;
    let matches_kind = matches!(
        (kind, &content),
        (ShareKind::GiftIdeasByPerson, ShareContent::Items { .. })
            | (ShareKind::GiftIdea, ShareContent::Item { .. })
    );
    if !matches_kind {
        return Err(ShareError::Invalid);
    }

    Ok(ShareLink {
        token: record.token,
        uid: record.uid,
        kind,
        person_id: record.person_id,
        person_name: record.person_name,
        idea_id: record.idea_id,
        content,
        expires_at: record.expires_at,
        is_active: record.is_active,
    })
}

/// Resolve a token for public reading. Needs no login and writes nothing.
pub fn resolve_share_token(db: &Database, token: &str) -> Result<ShareLink, ServiceError> {
    resolve_share_token_at(db, token, now_millis())
}

/// `resolve_share_token` against an explicit clock
pub fn resolve_share_token_at(db: &Database, token: &str, now_ms: i64) -> Result<ShareLink, ServiceError> {
    let token = require_non_empty("token", token)?;
    let record = db.get_share_link(&token)?.ok_or(ShareError::NotFound);
    let result = record.and_then(|r| check_record(r, now_ms));
    if let Err(e) = &result {
        tracing::warn!(code = e.code(), "share link rejected");
    }
    Ok(result?)
}

/// Deactivate a link owned by `uid`. The link must still resolve.
pub fn deactivate_share_link(db: &Database, uid: &str, token: &str) -> Result<(), ServiceError> {
    let current = resolve_share_token(db, token)?;
    if current.uid != uid {
        return Err(ServiceError::Forbidden(
            "Keine Berechtigung, diesen Link zu deaktivieren.".to_string(),
        ));
    }
    db.set_share_link_active(uid, &current.token, false, &now_timestamp())?;
    tracing::info!(uid, "share link deactivated");
    Ok(())
}

/// Lifecycle state of a stored link as seen by its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Inactive,
    Expired,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkState::Active => "aktiv",
            LinkState::Inactive => "deaktiviert",
            LinkState::Expired => "abgelaufen",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ShareLinkSummary {
    pub record: ShareLinkRecord,
    pub state: LinkState,
}

impl ShareLinkSummary {
    pub fn url(&self, config: &ShareConfig) -> String {
        build_share_url(&config.base_url, &self.record.token)
    }
}

pub fn link_state(record: &ShareLinkRecord, now_ms: i64) -> LinkState {
    if !record.is_active {
        LinkState::Inactive
    } else if record.expires_at == 0 || now_ms > record.expires_at {
        LinkState::Expired
    } else {
        LinkState::Active
    }
}

/// The owner's links, newest first
pub fn list_share_links(db: &Database, uid: &str) -> Result<Vec<ShareLinkSummary>, ServiceError> {
    let now = now_millis();
    Ok(db
        .list_share_links(uid)?
        .into_iter()
        .map(|record| ShareLinkSummary { state: link_state(&record, now), record })
        .collect())
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

    fn code(err: ServiceError) -> Option<&'static str> {
        err.share_code()
    }

    #[test]
    fn tokens_use_the_alphabet() {
        for len in [1, 28, 64] {
            let token = generate_token(len);
            assert_eq!(token.len(), len);
            assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        }
        assert_ne!(generate_token(28), generate_token(28));
    }

    #[test]
    fn ttl_rules() {
        assert_eq!(ttl_to_expires_at(1, 1_000), 1_000 + DAY_MS);
        assert_eq!(ttl_to_expires_at(0, 0), 30 * DAY_MS);
        assert_eq!(ttl_to_expires_at(-5, 0), DAY_MS);
        assert_eq!(ttl_to_expires_at(200_000_000_000, 1_000), i64::MAX);
        assert_eq!(ttl_to_expires_at(i64::MAX, i64::MAX), i64::MAX);
    }

    #[test]
    fn huge_ttl_still_resolves() {
        let (db, anna) = setup();
        let url = create_share_link_gift_ideas_by_person(
            &db,
            "u1",
            &ShareConfig::default(),
            anna,
            "Anna",
            Some(200_000_000_000),
        )
        .unwrap();
        let link = resolve_share_token(&db, &token_from_input(&url)).unwrap();
        assert_eq!(link.expires_at, i64::MAX);
    }

    #[test]
    fn token_extraction() {
        assert_eq!(token_from_input(" abc "), "abc");
        assert_eq!(token_from_input("share.html?t=abc"), "abc");
        assert_eq!(token_from_input("https://x.de/share.html?x=1&t=abc#top"), "abc");
        assert_eq!(token_from_input("share.html?x=1"), "");
    }

    #[test]
    fn url_uses_configured_base() {
        let (db, anna) = setup();
        let config = ShareConfig {
            base_url: "https://gifts.example/share.html".to_string(),
            default_ttl_days: 7,
            token_length: 12,
        };
        let url = create_share_link_gift_ideas_by_person(&db, "u1", &config, anna, "Anna", None).unwrap();
        let token = url.strip_prefix("https://gifts.example/share.html?t=").unwrap();
        assert_eq!(token.len(), 12);

        let link = resolve_share_token(&db, token).unwrap();
        assert!(link.content.items().is_empty());
        let days = (link.expires_at - now_millis()) as f64 / DAY_MS as f64;
        assert!(days > 6.9 && days <= 7.0);
    }

    #[test]
    fn single_idea_link() {
        let (db, anna) = setup();
        let idea = gift_ideas::create_gift_idea(&db, "u1", &IdeaInput::text(anna, "Buch")).unwrap();
        let url = create_share_link_gift_idea(&db, "u1", &ShareConfig::default(), idea, Some(3)).unwrap();

        let link = resolve_share_token(&db, &token_from_input(&url)).unwrap();
        assert_eq!(link.kind, ShareKind::GiftIdea);
        assert_eq!(link.idea_id, Some(idea));
        assert_eq!(link.person_name, "Anna");
        let items = link.content.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "Buch");

        let err = create_share_link_gift_idea(&db, "u1", &ShareConfig::default(), 999, None).unwrap_err();
        assert_eq!(err.to_string(), "Geschenkidee nicht gefunden.");
        let err = create_share_link_gift_idea(&db, "u2", &ShareConfig::default(), idea, None).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn resolution_failures_carry_codes() {
        let (db, anna) = setup();
        assert_eq!(
            resolve_share_token(&db, "  ").unwrap_err().to_string(),
            "token ist Pflicht."
        );
        assert_eq!(code(resolve_share_token(&db, "nope").unwrap_err()), Some("SHARE_NOT_FOUND"));

        let url = create_share_link_gift_ideas_by_person(&db, "u1", &ShareConfig::default(), anna, "Anna", Some(1)).unwrap();
        let token = token_from_input(&url);
        let link = resolve_share_token(&db, &token).unwrap();

        let err = resolve_share_token_at(&db, &token, link.expires_at + 1).unwrap_err();
        assert_eq!(code(err), Some("SHARE_EXPIRED"));
        assert!(resolve_share_token_at(&db, &token, link.expires_at).is_ok());

        db.conn()
            .execute("UPDATE share_links SET kind = 'calendar' WHERE token = ?1", [&token])
            .unwrap();
        assert_eq!(code(resolve_share_token(&db, &token).unwrap_err()), Some("SHARE_INVALID"));
    }

    #[test]
    fn zero_expiry_counts_as_expired() {
        let (db, anna) = setup();
        let url = create_share_link_gift_ideas_by_person(&db, "u1", &ShareConfig::default(), anna, "Anna", None).unwrap();
        let token = token_from_input(&url);
        db.conn()
            .execute("UPDATE share_links SET expires_at = 0 WHERE token = ?1", [&token])
            .unwrap();
        assert_eq!(code(resolve_share_token(&db, &token).unwrap_err()), Some("SHARE_EXPIRED"));
    }

    #[test]
    fn kind_and_payload_must_agree() {
        let (db, anna) = setup();
        let url = create_share_link_gift_ideas_by_person(&db, "u1", &ShareConfig::default(), anna, "Anna", None).unwrap();
        let token = token_from_input(&url);
        db.conn()
            .execute("UPDATE share_links SET kind = 'giftIdea' WHERE token = ?1", [&token])
            .unwrap();
        assert_eq!(code(resolve_share_token(&db, &token).unwrap_err()), Some("SHARE_INVALID"));
    }

    #[test]
    fn only_the_owner_deactivates() {
        let (db, anna) = setup();
        let url = create_share_link_gift_ideas_by_person(&db, "u1", &ShareConfig::default(), anna, "Anna", None).unwrap();
        let token = token_from_input(&url);

        let err = deactivate_share_link(&db, "u2", &token).unwrap_err();
        assert_eq!(err.to_string(), "Keine Berechtigung, diesen Link zu deaktivieren.");
        assert!(resolve_share_token(&db, &token).is_ok());

        deactivate_share_link(&db, "u1", &token).unwrap();
        assert_eq!(code(resolve_share_token(&db, &token).unwrap_err()), Some("SHARE_INACTIVE"));

        let again = deactivate_share_link(&db, "u1", &token).unwrap_err();
        assert_eq!(code(again), Some("SHARE_INACTIVE"));
    }

    #[test]
    fn listing_reports_state() {
        let (db, anna) = setup();
        let config = ShareConfig::default();
        let first = token_from_input(
            &create_share_link_gift_ideas_by_person(&db, "u1", &config, anna, "Anna", None).unwrap(),
        );
        create_share_link_gift_ideas_by_person(&db, "u1", &config, anna, "Anna", None).unwrap();
        deactivate_share_link(&db, "u1", &first).unwrap();

        let links = list_share_links(&db, "u1").unwrap();
        assert_eq!(links.len(), 2);
        let states: Vec<_> = links.iter().map(|l| l.state).collect();
        assert!(states.contains(&LinkState::Inactive));
        assert!(states.contains(&LinkState::Active));
        assert!(list_share_links(&db, "u2").unwrap().is_empty());
    }
}
