//! Input validation for caller-supplied strings and amounts.
//!
//! Everything arriving over the API boundary passes through here before it
//! touches the database. Lengths are counted in characters, not bytes, so
//! multi-byte names get the same budget as ASCII ones.

use crate::{EngineError, ResultEngine};

pub const MAX_GROUP_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_MEMBER_NAME_CHARS: usize = 50;
pub const MAX_EXPENSE_DESCRIPTION_CHARS: usize = 200;
pub const MIN_EXPENSE_AMOUNT: i64 = 1;
pub const MAX_EXPENSE_AMOUNT: i64 = 999_999_999;
pub const MAX_MEMBERS_PER_GROUP: usize = 50;

/// Characters never accepted in user-supplied text (markup/quoting risks).
fn has_dangerous_chars(value: &str) -> bool {
    value.chars().any(|c| matches!(c, '<' | '>' | '"' | '\'' | '&'))
}

fn normalize_text(value: &str, label: &str, max_chars: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    if trimmed.chars().count() > max_chars {
        return Err(EngineError::InvalidName(format!(
            "{label} must be at most {max_chars} characters"
        )));
    }
    if has_dangerous_chars(trimmed) {
        return Err(EngineError::InvalidName(format!(
            "{label} contains forbidden characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_group_name(value: &str) -> ResultEngine<String> {
    normalize_text(value, "group name", MAX_GROUP_NAME_CHARS)
}

pub fn normalize_member_name(value: &str) -> ResultEngine<String> {
    normalize_text(value, "member name", MAX_MEMBER_NAME_CHARS)
}

pub fn normalize_expense_description(value: &str) -> ResultEngine<String> {
    normalize_text(value, "expense description", MAX_EXPENSE_DESCRIPTION_CHARS)
}

/// Optional free text: empty collapses to `None`, otherwise same rules as
/// the required texts.
pub fn normalize_description(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(value) = value else { return Ok(None) };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(EngineError::InvalidName(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    if has_dangerous_chars(trimmed) {
        return Err(EngineError::InvalidName(
            "description contains forbidden characters".to_string(),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validates the founding member list of a group: each name individually,
/// plus list bounds and case-insensitive uniqueness.
pub fn normalize_member_names(values: &[String]) -> ResultEngine<Vec<String>> {
    if values.is_empty() {
        return Err(EngineError::InvalidName(
            "at least one member is required".to_string(),
        ));
    }
    if values.len() > MAX_MEMBERS_PER_GROUP {
        return Err(EngineError::InvalidName(format!(
            "at most {MAX_MEMBERS_PER_GROUP} members per group"
        )));
    }

    let mut seen = std::collections::HashSet::new();
    let mut normalized = Vec::with_capacity(values.len());
    for value in values {
        let name = normalize_member_name(value)?;
        if !seen.insert(name.to_lowercase()) {
            return Err(EngineError::ExistingKey(name));
        }
        normalized.push(name);
    }
    Ok(normalized)
}

pub fn validate_expense_amount(amount: i64) -> ResultEngine<()> {
    if amount < MIN_EXPENSE_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at least {MIN_EXPENSE_AMOUNT}"
        )));
    }
    if amount > MAX_EXPENSE_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {MAX_EXPENSE_AMOUNT}"
        )));
    }
    Ok(())
}

/// Validates a split list: non-empty, bounded, duplicate-free.
pub fn validate_split_member_ids(ids: &[uuid::Uuid]) -> ResultEngine<()> {
    if ids.is_empty() {
        return Err(EngineError::InvalidAmount(
            "split members must not be empty".to_string(),
        ));
    }
    if ids.len() > MAX_MEMBERS_PER_GROUP {
        return Err(EngineError::InvalidAmount(format!(
            "at most {MAX_MEMBERS_PER_GROUP} split members"
        )));
    }
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::ExistingKey(id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(normalize_group_name("  Trip to Kyoto ").unwrap(), "Trip to Kyoto");
    }

    #[test]
    fn empty_and_whitespace_names_are_rejected() {
        assert!(normalize_group_name("").is_err());
        assert!(normalize_member_name("   ").is_err());
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        // 50 multi-byte characters fit exactly in a member name.
        let name = "あ".repeat(MAX_MEMBER_NAME_CHARS);
        assert!(normalize_member_name(&name).is_ok());
        let too_long = "あ".repeat(MAX_MEMBER_NAME_CHARS + 1);
        assert!(normalize_member_name(&too_long).is_err());
    }

    #[test]
    fn dangerous_characters_are_rejected() {
        for bad in ["<script>", "a&b", "it's", "say \"hi\"", "a>b"] {
            assert!(normalize_group_name(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn optional_description_collapses_empty_to_none() {
        assert_eq!(normalize_description(None).unwrap(), None);
        assert_eq!(normalize_description(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_description(Some(" food ")).unwrap(),
            Some("food".to_string())
        );
    }

    #[test]
    fn member_lists_reject_case_insensitive_duplicates() {
        let names = vec!["Alice".to_string(), "alice".to_string()];
        assert_eq!(
            normalize_member_names(&names).unwrap_err(),
            EngineError::ExistingKey("alice".to_string())
        );
    }

    #[test]
    fn amount_bounds() {
        assert!(validate_expense_amount(0).is_err());
        assert!(validate_expense_amount(-5).is_err());
        assert!(validate_expense_amount(1).is_ok());
        assert!(validate_expense_amount(MAX_EXPENSE_AMOUNT).is_ok());
        assert!(validate_expense_amount(MAX_EXPENSE_AMOUNT + 1).is_err());
    }

    #[test]
    fn split_lists_reject_duplicates() {
        let id = Uuid::new_v4();
        assert!(validate_split_member_ids(&[id, id]).is_err());
        assert!(validate_split_member_ids(&[]).is_err());
        assert!(validate_split_member_ids(&[id, Uuid::new_v4()]).is_ok());
    }
}
