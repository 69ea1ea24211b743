//! Editor configuration loaded from YAML.
//!
//! ```yaml
//! color_policy: hashed
//! preserve_source_paths: false
//! labels:
//!   - name: pedestrian
//!     color: "#22C55E"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::conversion::RawExportOptions;
use crate::error::BboxError;
use crate::model::{Color, ColorPolicy, LabelPalette};

/// Settings shared by the library entry points and the CLI.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Policy for labels without a reserved color.
    pub color_policy: ColorPolicy,
    /// Restore original raw paths on export.
    pub preserve_source_paths: bool,
    /// Labels added to (or overriding) the built-in table.
    pub labels: Vec<LabelEntry>,
}

/// One reserved label color.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelEntry {
    pub name: String,
    pub color: Color,
}

impl EditorConfig {
    /// Loads a config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, BboxError> {
        let text = fs::read_to_string(path).map_err(BboxError::Io)?;
        let config = serde_yaml::from_str(&text).map_err(|source| BboxError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses config text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Builds the label palette this config describes.
    pub fn palette(&self) -> LabelPalette {
        self.labels
            .iter()
            .fold(LabelPalette::builtin(), |palette, entry| {
                palette.with_label(entry.name.clone(), entry.color)
            })
            .with_policy(self.color_policy)
    }

    pub fn export_options(&self) -> RawExportOptions {
        RawExportOptions {
            preserve_source_paths: self.preserve_source_paths,
        }
    }
}
