use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Identifier for one member of the fixed operator roster.
///
/// Always a lowercase slug (see [`OperatorConfig::slug`]); the roster file is
/// the single place new operators are introduced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorId(String);

impl OperatorId {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OperatorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub name: String,
    pub display_name: Option<String>,
    pub active: Option<bool>,
}

impl OperatorConfig {
    /// Generate a URL-safe slug from the operator name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    #[must_use]
    pub fn id(&self) -> OperatorId {
        OperatorId(self.slug())
    }
}

#[derive(Debug, Deserialize)]
pub struct OperatorsFile {
    pub operators: Vec<OperatorConfig>,
}

impl OperatorsFile {
    /// Roster as operator ids, in file order.
    #[must_use]
    pub fn ids(&self) -> Vec<OperatorId> {
        self.operators.iter().map(OperatorConfig::id).collect()
    }

    #[must_use]
    pub fn contains(&self, id: &OperatorId) -> bool {
        self.operators.iter().any(|o| &o.id() == id)
    }
}

/// Load and validate the operator roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_operators(path: &Path) -> Result<OperatorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OperatorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let operators_file: OperatorsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::OperatorsFileParse)?;

    validate_operators(&operators_file)?;

    Ok(operators_file)
}

fn validate_operators(operators_file: &OperatorsFile) -> Result<(), ConfigError> {
    if operators_file.operators.is_empty() {
        return Err(ConfigError::Validation(
            "operator roster must not be empty".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for operator in &operators_file.operators {
        if operator.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "operator name must be non-empty".to_string(),
            ));
        }

        let lower_name = operator.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate operator name: '{}'",
                operator.name
            )));
        }

        let slug = operator.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "operator '{}' produces an empty slug",
                operator.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate operator slug: '{}' (from operator '{}')",
                slug, operator.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(name: &str) -> OperatorConfig {
        OperatorConfig {
            name: name.to_string(),
            display_name: None,
            active: None,
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(operator("Alice Wong").slug(), "alice-wong");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(operator("O'Brien").slug(), "obrien");
    }

    #[test]
    fn slug_non_ascii_characters_are_stripped() {
        // Non-ASCII chars are stripped; no dash inserted between adjacent ASCII chars
        assert_eq!(operator("José M").slug(), "jos-m");
    }

    #[test]
    fn validate_rejects_empty_roster() {
        let file = OperatorsFile { operators: vec![] };
        let err = validate_operators(&file).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let file = OperatorsFile {
            operators: vec![operator("  ")],
        };
        let err = validate_operators(&file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_duplicate_name() {
        let file = OperatorsFile {
            operators: vec![operator("Alice"), operator("alice")],
        };
        let err = validate_operators(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate operator name"));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let file = OperatorsFile {
            operators: vec![operator("Alice Wong"), operator("Alice--Wong")],
        };
        let err = validate_operators(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate operator"));
    }

    #[test]
    fn validate_accepts_valid_roster() {
        let file = OperatorsFile {
            operators: vec![operator("Alice"), operator("Bob"), operator("Carol")],
        };
        assert!(validate_operators(&file).is_ok());
    }

    #[test]
    fn roster_ids_preserve_file_order() {
        let file = OperatorsFile {
            operators: vec![operator("Carol"), operator("Alice")],
        };
        let ids = file.ids();
        assert_eq!(ids[0].as_str(), "carol");
        assert_eq!(ids[1].as_str(), "alice");
    }

    #[test]
    fn contains_matches_by_slug() {
        let file = OperatorsFile {
            operators: vec![operator("Alice Wong")],
        };
        assert!(file.contains(&OperatorId::from("alice-wong")));
        assert!(!file.contains(&OperatorId::from("bob")));
    }
}
