use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Jurisdiction variants change which fields validators treat as mandatory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Jurisdiction {
    pub scottish: bool,
    pub welsh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Namespace for every key written to the persisted store.
    pub key_prefix: String,
    pub jurisdiction: Jurisdiction,
    /// Whether the user may see ASD collections.
    pub include_restricted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_prefix: "gazetteer".to_string(),
            jurisdiction: Jurisdiction::default(),
            include_restricted: false,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let settings: Settings = toml::from_str(text)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.key_prefix.is_empty() {
            return Err(EngineError::InvalidSettings("key_prefix must not be empty".into()));
        }
        if self.jurisdiction.scottish && self.jurisdiction.welsh {
            return Err(EngineError::InvalidSettings(
                "scottish and welsh jurisdictions are exclusive".into(),
            ));
        }
        Ok(())
    }
}
