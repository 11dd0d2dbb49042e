use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp format used for created_at / updated_at columns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<i64>,
    pub name: String,
    pub birthday: Option<String>, // YYYY-MM-DD
    pub info: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Person {
    pub fn new(name: String) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            name,
            birthday: None,
            info: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccasionType {
    Fixed,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occasion {
    pub id: Option<i64>,
    pub name: String,
    pub date: Option<String>, // YYYY-MM-DD
    pub person: String,       // free-text label, not a foreign key
    pub occasion_type: OccasionType,
    pub is_active: bool,
    pub info: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Occasion {
    pub fn new(name: String, occasion_type: OccasionType) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            name,
            date: None,
            person: String::new(),
            occasion_type,
            is_active: true,
            info: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaType {
    Text,
    Link,
    Image,
}

impl IdeaType {
    /// Link and image ideas carry a URL as their content
    pub fn requires_url(self) -> bool {
        matches!(self, IdeaType::Link | IdeaType::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Offen,
    Besorgt,
    Erledigt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftIdea {
    pub id: Option<i64>,
    pub person_id: i64,
    pub person_name: String,
    pub occasion_id: Option<i64>,
    pub occasion_name: String,
    pub idea_type: IdeaType,
    pub content: String,
    pub status: IdeaStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatus {
    Offen,
    Besorgt,
    Ueberreicht,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftKind {
    Planned,
    Past,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gift {
    pub id: Option<i64>,
    pub person_id: i64,
    pub person_name: String,
    pub occasion_id: Option<i64>,
    pub occasion_name: String,
    pub date: String, // YYYY-MM-DD
    pub note: String,
    pub status: GiftStatus,
    /// Rows written before kinds existed have no kind and count as planned
    pub kind: Option<GiftKind>,
    pub source_idea_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Gift {
    pub fn effective_kind(&self) -> GiftKind {
        self.kind.unwrap_or(GiftKind::Planned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareKind {
    #[serde(rename = "giftIdeasByPerson")]
    GiftIdeasByPerson,
    #[serde(rename = "giftIdea")]
    GiftIdea,
}

/// The subset of a gift idea that is exposed through a share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdeaSnapshot {
    pub id: i64,
    #[serde(rename = "type")]
    pub idea_type: String,
    pub content: String,
    pub status: String,
    pub occasion_name: String,
    pub person_id: String,
    pub person_name: String,
}

impl From<&GiftIdea> for PublicIdeaSnapshot {
    fn from(idea: &GiftIdea) -> Self {
        Self {
            id: idea.id.unwrap_or_default(),
            idea_type: idea.idea_type.to_string(),
            content: idea.content.trim().to_string(),
            status: idea.status.to_string(),
            occasion_name: idea.occasion_name.trim().to_string(),
            person_id: idea.person_id.to_string(),
            person_name: idea.person_name.trim().to_string(),
        }
    }
}

/// Snapshot payload stored alongside a share link, keyed by its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShareContent {
    Items { items: Vec<PublicIdeaSnapshot> },
    Item { item: PublicIdeaSnapshot },
}

impl ShareContent {
    pub fn items(&self) -> Vec<&PublicIdeaSnapshot> {
        match self {
            ShareContent::Items { items } => items.iter().collect(),
            ShareContent::Item { item } => vec![item],
        }
    }
}

/// A share link as stored. `kind` and `payload` are kept raw so that a
/// damaged record can still be loaded and reported as invalid.
#[derive(Debug, Clone)]
pub struct ShareLinkRecord {
    pub token: String,
    pub uid: String,
    pub kind: String,
    pub person_id: String,
    pub person_name: String,
    pub idea_id: Option<i64>,
    pub payload: String,
    pub expires_at: i64, // epoch ms
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A share link that passed resolution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub token: String,
    pub uid: String,
    pub kind: ShareKind,
    pub person_id: String,
    pub person_name: String,
    pub idea_id: Option<i64>,
    #[serde(flatten)]
    pub content: ShareContent,
    pub expires_at: i64,
    pub is_active: bool,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($s => Ok($ty::$variant),)+
                    other => Err(other.to_string()),
                }
            }
        }
    };
}

string_enum!(OccasionType { Fixed => "fixed", Custom => "custom" });
string_enum!(IdeaType { Text => "text", Link => "link", Image => "image" });
string_enum!(IdeaStatus { Offen => "offen", Besorgt => "besorgt", Erledigt => "erledigt" });
string_enum!(GiftStatus { Offen => "offen", Besorgt => "besorgt", Ueberreicht => "ueberreicht" });
string_enum!(GiftKind { Planned => "planned", Past => "past" });
string_enum!(ShareKind { GiftIdeasByPerson => "giftIdeasByPerson", GiftIdea => "giftIdea" });
