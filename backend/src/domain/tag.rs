//! Tag entity and its validator.

use super::TagId;
use super::validation::{TAG_NAME_MAX, TAG_NAME_MIN, ValidationError, check_len};

/// Stored tag.
///
/// ## Invariants
/// - `name` is lowercase, 3-20 characters of `[a-z0-9_-]`.
/// - `name` is unique across all tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    /// Construct a stored tag.
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Tag fields supplied by a caller when creating or renaming a tag.
///
/// # Examples
/// ```
/// use lifelog_backend::domain::NewTag;
///
/// let mut tag = NewTag::new("My-Tag");
/// tag.validate().unwrap();
/// assert_eq!(tag.name, "my-tag");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Lowercase the name and check it against the tag constraints.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.name = self.name.to_lowercase();
        check_len(
            &self.name,
            TAG_NAME_MIN,
            TAG_NAME_MAX,
            ValidationError::TagNameLength,
        )?;
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::TagNameCharacters);
        }
        Ok(())
    }
}
