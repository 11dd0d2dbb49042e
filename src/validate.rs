//! Input checks shared by the entity services.

use std::str::FromStr;

use crate::error::ServiceError;
use crate::models::IdeaType;
use crate::utils::is_valid_date;

/// Trim a free-text field
pub fn normalize(value: &str) -> String {
    value.trim().to_string()
}

/// Trim a required field, failing with "<label> ist Pflicht." when blank
pub fn require_non_empty(label: &str, value: &str) -> Result<String, ServiceError> {
    let s = normalize(value);
    if s.is_empty() {
        return Err(ServiceError::Validation(format!("{} ist Pflicht.", label)));
    }
    Ok(s)
}

/// Validate a `YYYY-MM-DD` date and return it trimmed
pub fn require_date(value: &str) -> Result<String, ServiceError> {
    if !is_valid_date(value) {
        return Err(ServiceError::validation("Ungültiges Datum (YYYY-MM-DD)."));
    }
    Ok(normalize(value))
}

/// Like `require_date`, but a blank value means "no date"
pub fn optional_date(value: Option<&str>) -> Result<Option<String>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => require_date(date).map(Some),
    }
}

/// Parse a type name from user input
pub fn parse_type<T: FromStr>(value: &str) -> Result<T, ServiceError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::validation("Ungültiger Typ."))
}

/// Parse a status name from user input
pub fn parse_status<T: FromStr>(value: &str) -> Result<T, ServiceError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::validation("Ungültiger Status."))
}

/// `http://` or `https://` (any case) followed by at least one character
pub fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.len() > scheme.len() && lower.starts_with(scheme))
}

/// Content is always required; link and image ideas must carry a web URL
pub fn validate_content_by_type(idea_type: IdeaType, content: &str) -> Result<String, ServiceError> {
    let content = require_non_empty("Inhalt", content)?;
    if idea_type.requires_url() && !is_http_url(&content) {
        return Err(ServiceError::validation(
            "Bitte eine gültige URL angeben (http/https).",
        ));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GiftStatus, OccasionType};

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(require_non_empty("Name", "  Anna ").unwrap(), "Anna");
        let err = require_non_empty("Name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Name ist Pflicht.");
    }

    #[test]
    fn optional_dates() {
        assert_eq!(optional_date(None).unwrap(), None);
        assert_eq!(optional_date(Some(" ")).unwrap(), None);
        assert_eq!(
            optional_date(Some("1990-05-01")).unwrap().as_deref(),
            Some("1990-05-01")
        );
        let err = optional_date(Some("01.05.1990")).unwrap_err();
        assert_eq!(err.to_string(), "Ungültiges Datum (YYYY-MM-DD).");
    }

    #[test]
    fn enum_inputs() {
        assert_eq!(parse_type::<OccasionType>(" fixed ").unwrap(), OccasionType::Fixed);
        assert_eq!(
            parse_type::<OccasionType>("weekly").unwrap_err().to_string(),
            "Ungültiger Typ."
        );
        assert_eq!(
            parse_status::<GiftStatus>("verloren").unwrap_err().to_string(),
            "Ungültiger Status."
        );
    }

    #[test]
    fn url_content_rules() {
        assert!(validate_content_by_type(IdeaType::Link, "https://example.com/buch").is_ok());
        assert!(validate_content_by_type(IdeaType::Image, "HTTP://x").is_ok());
        assert!(validate_content_by_type(IdeaType::Link, "https://").is_err());
        assert!(validate_content_by_type(IdeaType::Link, "ftp://example.com").is_err());
        assert!(validate_content_by_type(IdeaType::Image, "bild.png").is_err());
        assert_eq!(
            validate_content_by_type(IdeaType::Text, "  Buch ").unwrap(),
            "Buch"
        );
        assert_eq!(
            validate_content_by_type(IdeaType::Text, " ").unwrap_err().to_string(),
            "Inhalt ist Pflicht."
        );
    }
}
