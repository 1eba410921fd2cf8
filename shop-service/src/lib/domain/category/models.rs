use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::category::errors::CategoryIdError;
use crate::domain::category::errors::CategoryNameError;

/// Product category. The name is the natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Guarded-create key for a name.
    pub fn natural_key(name: &CategoryName) -> String {
        format!("category:{}", name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(pub Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, CategoryIdError> {
        Uuid::parse_str(s)
            .map(CategoryId)
            .map_err(|e| CategoryIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category name: ASCII letters and spaces, stored trimmed and lowercased,
/// so "Skincare" and "skincare " are the same category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooLong` - More than 64 characters
    /// * `InvalidCharacters` - Digits, punctuation or non-ASCII letters
    pub fn new(name: String) -> Result<Self, CategoryNameError> {
        let name = name.trim().to_lowercase();

        if name.is_empty() {
            return Err(CategoryNameError::Blank);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(CategoryNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            return Err(CategoryNameError::InvalidCharacters);
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_normalized() {
        let name = CategoryName::new("  Skin Care ".to_string()).unwrap();
        assert_eq!(name.as_str(), "skin care");
        assert_eq!(Category::natural_key(&name), "category:skin care");
    }

    #[test]
    fn test_category_name_rejections() {
        assert_eq!(CategoryName::new("   ".to_string()), Err(CategoryNameError::Blank));
        assert_eq!(
            CategoryName::new("1234".to_string()),
            Err(CategoryNameError::InvalidCharacters)
        );
        assert_eq!(
            CategoryName::new("hair-care".to_string()),
            Err(CategoryNameError::InvalidCharacters)
        );
        assert!(matches!(
            CategoryName::new("a".repeat(65)),
            Err(CategoryNameError::TooLong { max: 64, actual: 65 })
        ));
    }
}
