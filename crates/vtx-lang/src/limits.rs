use std::path::Path;

use serde::Deserialize;

use crate::error::CompileError;

/// Capacity bounds applied while parsing. Exceeding one drops the offending entry with a
/// diagnostic; it never aborts the parse.
#[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    pub max_layouts: usize,
    pub max_fields: usize,
    pub max_declarations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_layouts: 32,
            max_fields: 32,
            max_declarations: 32,
        }
    }
}

impl Limits {
    /// Parses limits from RON text. Missing keys keep their defaults.
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::de::from_str(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| CompileError::ReadLimits {
            path: path.into(),
            source,
        })?;

        Self::from_ron(&data).map_err(|source| CompileError::ParseLimits {
            path: path.into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults() {
        let limits = Limits::from_ron("(max_fields: 4)").unwrap();
        assert_eq!(
            limits,
            Limits {
                max_fields: 4,
                ..Limits::default()
            }
        );
    }

    #[test]
    fn malformed_ron_is_rejected() {
        assert!(Limits::from_ron("(max_fields: \"four\")").is_err());
    }
}
