use serde::Deserialize;

use crate::error::FieldError;

pub const TITLE_MIN: usize = 3;
pub const DESCRIPTION_MIN: usize = 3;
pub const DESCRIPTION_MAX: usize = 100;
pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 5;

/// Request body for creating or replacing a todo.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: i32,
    #[serde(default)]
    pub complete: bool,
}

impl TodoDraft {
    /// Collects every failing field. Lengths are counted in chars, not bytes.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.title.chars().count() < TITLE_MIN {
            errors.push(FieldError::new(
                "title",
                format!("must be at least {TITLE_MIN} characters"),
            ));
        }

        if let Some(description) = &self.description {
            let len = description.chars().count();
            if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
                errors.push(FieldError::new(
                    "description",
                    format!("must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"),
                ));
            }
        }

        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&self.priority) {
            errors.push(FieldError::new(
                "priority",
                format!("must be between {PRIORITY_MIN} and {PRIORITY_MAX}"),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, description: Option<&str>, priority: i32) -> TodoDraft {
        TodoDraft {
            title: title.into(),
            description: description.map(Into::into),
            priority,
            complete: false,
        }
    }

    #[test]
    fn accepts_valid_draft() {
        assert!(draft("Learn to code", Some("Need to learn everyday"), 5)
            .validate()
            .is_ok());
        assert!(draft("abc", None, 1).validate().is_ok());
    }

    #[test]
    fn rejects_short_title() {
        let errs = draft("ab", None, 5).validate().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "title");
    }

    #[test]
    fn description_bounds_are_inclusive() {
        assert!(draft("abc", Some("xyz"), 3).validate().is_ok());
        assert!(draft("abc", Some(&"x".repeat(100)), 3).validate().is_ok());
        assert!(draft("abc", Some("xy"), 3).validate().is_err());
        assert!(draft("abc", Some(&"x".repeat(101)), 3).validate().is_err());
    }

    #[test]
    fn priority_out_of_range() {
        assert!(draft("abc", None, 0).validate().is_err());
        assert!(draft("abc", None, 6).validate().is_err());
    }

    #[test]
    fn reports_every_failing_field() {
        let errs = draft("a", Some("b"), 9).validate().unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "priority"]);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // three chars, six bytes
        assert!(draft("äöü", None, 2).validate().is_ok());
    }

    #[test]
    fn complete_defaults_to_false() {
        let d: TodoDraft = serde_json::from_str(r#"{"title":"abc","priority":2}"#).unwrap();
        assert!(!d.complete);
        assert!(d.description.is_none());
    }
}
