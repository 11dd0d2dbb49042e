//! Gift idea suggestions.
//!
//! Suggestions are computed on the fly from the notes of earlier gifts and
//! never stored; adopting one creates a regular text idea.

use crate::database::Database;
use crate::error::ServiceError;
use crate::gift_ideas::{self, IdeaInput};
use crate::models::{Gift, GiftIdea};

const MAX_KEYWORDS: usize = 8;
const MAX_SUGGESTIONS: usize = 12;
const MIN_TOKEN_CHARS: usize = 3;

struct FallbackBlock {
    items: &'static [&'static str],
    reason: &'static str,
}

const FALLBACK_BLOCKS: &[FallbackBlock] = &[
    FallbackBlock {
        items: &["Lieblingsladen", "Amazon", "Drogerie", "Restaurant"],
        reason: "Fallback: Zu wenig vergangene Daten – Gutschein-Ideen als Start.",
    },
    FallbackBlock {
        items: &["Essen gehen", "Kino", "Kurztrip", "Massage"],
        reason: "Fallback: Zu wenig vergangene Daten – Erlebnis-Ideen als Start.",
    },
    FallbackBlock {
        items: &["Fotobuch", "Gravur", "Custom Tasse", "Erinnerungsbox"],
        reason: "Fallback: Zu wenig vergangene Daten – personalisierte Ideen als Start.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub person_id: i64,
    pub person_name: String,
    /// Becomes the content of a text idea when adopted
    pub content: String,
    pub reason: String,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || matches!(c, 'ä' | 'ö' | 'ü' | 'ß' | '-')
        || c.is_whitespace()
}

/// Lowercase words of at least three characters; other symbols split words
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = normalize(text)
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Most frequent note words, ties kept in first-seen order
pub fn top_keywords(gifts: &[Gift], max: usize) -> Vec<(String, usize)> {
    let mut freq: Vec<(String, usize)> = Vec::new();
    for word in gifts.iter().flat_map(|g| tokenize(&g.note)) {
        match freq.iter_mut().find(|(w, _)| *w == word) {
            Some((_, count)) => *count += 1,
            None => freq.push((word, 1)),
        }
    }
    freq.sort_by(|a, b| b.1.cmp(&a.1));
    freq.truncate(max);
    freq
}

fn already_covered(existing: &[GiftIdea], keyword: &str) -> bool {
    let k = normalize(keyword);
    existing.iter().any(|i| normalize(&i.content).contains(&k))
}

/// Build suggestions for one person from their gifts and current ideas
pub fn generate_ideas_for_person(
    person_id: i64,
    person_name: &str,
    past_gifts: &[Gift],
    existing_ideas: &[GiftIdea],
) -> Vec<Suggestion> {
    let suggestion = |content: &str, reason: String| Suggestion {
        person_id,
        person_name: person_name.to_string(),
        content: content.to_string(),
        reason,
    };

    let mut out: Vec<Suggestion> = top_keywords(past_gifts, MAX_KEYWORDS)
        .into_iter()
        .filter(|(word, _)| !already_covered(existing_ideas, word))
        .map(|(word, count)| {
            let reason = format!(
                "Automatisch generiert: \"{}\" kam in vergangenen Geschenken {}× vor.",
                word, count
            );
            suggestion(&word, reason)
        })
        .collect();

    if out.is_empty() {
        for block in FALLBACK_BLOCKS {
            for item in block.items {
                if !already_covered(existing_ideas, item) {
                    out.push(suggestion(item, block.reason.to_string()));
                }
            }
        }
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}

/// Suggestions for a stored person, using all of that person's gifts
pub fn suggest_for_person(db: &Database, uid: &str, person_id: i64) -> Result<Vec<Suggestion>, ServiceError> {
    let person = crate::persons::get_person(db, uid, person_id)?;
    let gifts = db.list_gifts_by_person(uid, person_id)?;
    let ideas = db.list_gift_ideas_by_person(uid, person_id)?;
    Ok(generate_ideas_for_person(person_id, &person.name, &gifts, &ideas))
}

/// Store a suggestion as an open text idea
pub fn adopt_suggestion(db: &Database, uid: &str, suggestion: &Suggestion) -> Result<i64, ServiceError> {
    let id = gift_ideas::create_gift_idea(db, uid, &IdeaInput::text(suggestion.person_id, &suggestion.content))?;
    tracing::info!(uid, id, "suggestion adopted");
    Ok(id)
}
