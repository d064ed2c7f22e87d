use nav_octree_core::DepthOffsets;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The shape of the field indexed by a `SparseOctree`.
///
/// Settings can be written by hand or loaded from TOML, where missing keys fall back to the defaults:
///
/// ```
/// use nav_octree_storage::OctreeSettings;
///
/// let settings = OctreeSettings::from_toml_str("step = 0.25").unwrap();
///
/// assert_eq!(settings.field_size, 32768.0);
/// assert_eq!(settings.step, 0.25);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OctreeSettings {
    /// Edge length of the cubic field.
    pub field_size: f32,
    /// The finest resolution of the field, i.e. the edge length of the smallest cell.
    pub step: f32,
}

impl Default for OctreeSettings {
    fn default() -> Self {
        Self {
            field_size: 32768.0,
            step: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("field size must be finite and positive, got {0}")]
    FieldSize(f32),
    #[error("step must be finite and positive, got {0}")]
    Step(f32),
    #[error("step {0} is too small to be subdivided")]
    StepTooSmall(f32),
    #[error("step {step} is larger than the field size {field_size}")]
    StepLargerThanField { step: f32, field_size: f32 },
    #[error("failed to parse octree settings")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read octree settings from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OctreeSettings {
    /// Parses settings from a TOML document and validates them.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Reads settings from the TOML file at `path` and validates them.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.field_size.is_finite() && self.field_size > 0.0) {
            return Err(SettingsError::FieldSize(self.field_size));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(SettingsError::Step(self.step));
        }
        if self.step / 2.0 == 0.0 {
            return Err(SettingsError::StepTooSmall(self.step));
        }
        if self.step > self.field_size {
            return Err(SettingsError::StepLargerThanField {
                step: self.step,
                field_size: self.field_size,
            });
        }

        Ok(())
    }

    /// The per-depth offset table for these settings.
    pub fn depth_offsets(&self) -> Result<DepthOffsets, SettingsError> {
        self.validate()?;

        Ok(DepthOffsets::new(self.field_size, self.step))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(
            OctreeSettings::from_toml_str("").unwrap(),
            OctreeSettings::default()
        );
    }

    #[test]
    fn full_document() {
        let settings = OctreeSettings::from_toml_str("field_size = 1024.0\nstep = 2.0\n").unwrap();

        assert_eq!(
            settings,
            OctreeSettings {
                field_size: 1024.0,
                step: 2.0
            }
        );
        assert_eq!(settings.depth_offsets().unwrap().max_depth(), 9);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            OctreeSettings::from_toml_str("step = 0.0"),
            Err(SettingsError::Step(_))
        ));
        assert!(matches!(
            OctreeSettings::from_toml_str("field_size = -1.0"),
            Err(SettingsError::FieldSize(_))
        ));
        assert!(matches!(
            OctreeSettings::from_toml_str("field_size = 1.0\nstep = 2.0"),
            Err(SettingsError::StepLargerThanField { .. })
        ));
        assert!(matches!(
            OctreeSettings::from_toml_str("step = \"fine\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn subnormal_step_is_rejected() {
        let settings = OctreeSettings {
            field_size: 1.0,
            step: f32::from_bits(1),
        };

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::StepTooSmall(_))
        ));
        assert!(matches!(
            settings.depth_offsets(),
            Err(SettingsError::StepTooSmall(_))
        ));

        // The smallest step that still halves to a positive offset is accepted.
        let settings = OctreeSettings {
            field_size: 1.0,
            step: f32::from_bits(2),
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = OctreeSettings::from_path("/definitely/not/here.toml").unwrap_err();

        match err {
            SettingsError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.toml"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
