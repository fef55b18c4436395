//! Conversion between stored string columns and typed values.

use sea_orm::DbErr;

use crate::server::error::validation::ValidationError;

/// An enum persisted as a lowercase string column.
///
/// The stored form doubles as the value exposed in API payloads.
pub trait StoredEnum: Sized + Copy + 'static {
    /// Human readable name used in error messages.
    const KIND: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// Parses a stored column value, treating unknown values as corrupt data.
///
/// # Returns
/// - `Ok(T)` - Known variant
/// - `Err(DbErr::Type)` - The column holds a value no variant maps to
pub fn parse_stored<T: StoredEnum>(value: &str) -> Result<T, DbErr> {
    T::from_stored(value)
        .ok_or_else(|| DbErr::Type(format!("unknown {} '{}' in database", T::KIND, value)))
}

/// Parses a client supplied value, rejecting unknown values as a field error.
pub fn parse_input<T: StoredEnum>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    T::from_stored(value.trim()).ok_or_else(|| {
        let allowed: Vec<_> = T::ALL.iter().map(|v| v.as_str()).collect();
        ValidationError::single(field, format!("must be one of: {}", allowed.join(", ")))
    })
}

/// Normalizes an email address for comparison and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose syntactic email check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
        && email.len() <= 254
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::organization::OrgRole;

    #[test]
    fn rejects_unknown_stored_value() {
        let result = parse_stored::<OrgRole>("superuser");
        assert!(matches!(result, Err(DbErr::Type(_))));
    }

    #[test]
    fn input_errors_list_allowed_values() {
        let err = parse_input::<OrgRole>("role", "boss").unwrap_err();
        assert_eq!(err.fields[0].field, "role");
        assert!(err.fields[0]
            .message
            .contains("owner, admin, instructor, member"));
    }

    #[test]
    fn validates_emails() {
        assert!(is_valid_email("ada@uni.example"));
        assert!(!is_valid_email("ada@localhost"));
        assert!(!is_valid_email("@uni.example"));
        assert!(!is_valid_email("ada lovelace@uni.example"));
        assert!(!is_valid_email("ada@@uni.example"));
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ada@Uni.Example "), "ada@uni.example");
    }
}
