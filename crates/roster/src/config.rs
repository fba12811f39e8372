use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RosterError;
use crate::model::DEFAULT_ID_COLUMN;
use crate::reconcile::ApprovedEdits;
use crate::store::{DuplicatePolicy, LoadOptions};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration for a reconcile, usually `rollcall.toml`.
///
/// `old` and `new` are resolved relative to the config file's directory by
/// [`RollcallConfig::resolve`]. Command-line flags override every field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollcallConfig {
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default)]
    pub old: Option<PathBuf>,
    #[serde(default)]
    pub new: Option<PathBuf>,
    /// Attribute names approved for merging.
    #[serde(default)]
    pub approve: Vec<String>,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Write the JSON report here.
    #[serde(default)]
    pub json: Option<PathBuf>,
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            old: None,
            new: None,
            approve: Vec::new(),
            on_duplicate: DuplicatePolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RollcallConfig {
    pub fn from_toml(input: &str) -> Result<Self, RosterError> {
        let config: RollcallConfig =
            toml::from_str(input).map_err(|e| RosterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, RosterError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| RosterError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.id_column.trim().is_empty() {
            return Err(RosterError::ConfigValidation("id_column must not be empty".into()));
        }

        for attribute in &self.approve {
            if attribute.trim().is_empty() {
                return Err(RosterError::ConfigValidation(
                    "approve entries must not be empty".into(),
                ));
            }
            if *attribute == self.id_column {
                return Err(RosterError::ConfigValidation(format!(
                    "approve: '{attribute}' is the identifier column and cannot be edited"
                )));
            }
        }

        if let (Some(old), Some(new)) = (&self.old, &self.new) {
            if old == new {
                return Err(RosterError::ConfigValidation(format!(
                    "old and new both point at '{}'",
                    old.display()
                )));
            }
        }

        Ok(())
    }

    /// Make relative paths relative to `base` (the config file's directory).
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.old = self.old.map(join);
        self.new = self.new.map(join);
        self.output.json = self.output.json.map(join);
        self
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            id_column: self.id_column.clone(),
            duplicates: self.on_duplicate,
        }
    }

    pub fn approved_edits(&self) -> ApprovedEdits {
        self.approve.iter().map(|a| a.trim()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
