//! Tri-state field for partial updates.
//!
//! A JSON body distinguishes three cases for a nullable column: the field is
//! missing (leave it alone), the field is `null` (clear it), or the field has a
//! value (set it). `Option<T>` collapses the first two, so patch DTOs use
//! [`Patch`] together with `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not present in the request
    Absent,
    /// Field explicitly set to `null`
    Null,
    /// Field set to a value
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// The provided value, if any
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Write the change into `target`, leaving it untouched when absent
    #[cfg(test)]
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the field is present; `#[serde(default)]` covers absence
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        description: Patch<String>,
    }

    fn parse(json: &str) -> Patch<String> {
        serde_json::from_str::<Body>(json).unwrap().description
    }

    #[test]
    fn test_missing_field_is_absent() {
        assert_eq!(parse("{}"), Patch::Absent);
    }

    #[test]
    fn test_null_field_is_null() {
        assert_eq!(parse(r#"{"description": null}"#), Patch::Null);
    }

    #[test]
    fn test_value_field_is_value() {
        assert_eq!(
            parse(r#"{"description": "Shoes"}"#),
            Patch::Value("Shoes".to_string())
        );
    }

    #[test]
    fn test_apply_to() {
        let mut target = Some("old".to_string());
        Patch::Absent.apply_to(&mut target);
        assert_eq!(target.as_deref(), Some("old"));

        Patch::Value("new".to_string()).apply_to(&mut target);
        assert_eq!(target.as_deref(), Some("new"));

        Patch::Null.apply_to(&mut target);
        assert_eq!(target, None);
    }
}
