//! Configuration records for combined-profile analyses.
//!
//! A [`ProfileConfig`] is the raw, unvalidated input. It is either built from one
//! of the named presets or deserialised from JSON; missing keys fall back to the
//! `CP3` preset. Validation happens once, when the record is turned into
//! [`CrossSectionParameters`](crate::CrossSectionParameters).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigLoadError;

/// Names of the built-in profile presets.
pub const PRESETS: [&str; 3] = ["CP1", "CP2", "CP3"];

/// Nominal cross-section dimensions and span, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Height of the I-profile.
    pub dh1: f64,
    /// Flange width of the I-profile.
    pub dw1: f64,
    /// Flange thickness of the I-profile.
    pub dt1: f64,
    /// Web thickness of the I-profile.
    pub ds1: f64,
    /// Height of the T-profile.
    pub dh2: f64,
    /// Flange width of the T-profile.
    pub dw2: f64,
    /// Flange thickness of the T-profile.
    pub dt2: f64,
    /// Web thickness of the T-profile.
    pub ds2: f64,
    /// Length of the profile along the span.
    pub length: f64,
}

impl Dimensions {
    /// I-profile 120/64/6.3/4.4 combined with a square T-profile of the given
    /// size and thickness over a 3700 mm span.
    const fn with_tee(size: f64, thickness: f64) -> Self {
        Self {
            dh1: 120.0,
            dw1: 64.0,
            dt1: 6.3,
            ds1: 4.4,
            dh2: size,
            dw2: size,
            dt2: thickness,
            ds2: thickness,
            length: 3700.0,
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::with_tee(80.0, 9.0)
    }
}

/// Linear elastic material constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Material name used for the solver model.
    pub name: String,
    /// Young's modulus in N/mm².
    pub elastic_modulus: f64,
    /// Poisson ratio.
    pub poisson_ratio: f64,
    /// Density in N/mm³.
    pub density: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            name: "Steel".to_owned(),
            elastic_modulus: 210_000.0,
            poisson_ratio: 0.3,
            density: 7.8e-5,
        }
    }
}

/// Mesh density controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Maximum number of elements the mesh may contain.
    pub max_elements: u32,
    /// Seeds on each I-flange edge.
    pub i_flange: u32,
    /// Seeds on each I-web edge.
    pub i_web: u32,
    /// Seeds on each T-flange edge.
    pub t_flange: u32,
    /// Seeds on each T-web edge.
    pub t_web: u32,
    /// Seeds on the connecting flange edge.
    pub connecting_flange: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            max_elements: 1000,
            i_flange: 1,
            i_web: 2,
            t_flange: 1,
            t_web: 2,
            connecting_flange: 4,
        }
    }
}

/// What the analysis is run for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Linear static step, reduced to the maximum vertical deflection.
    #[default]
    Deflection,
    /// Linear static step, reduced to the maximum von Mises stress.
    Stress,
    /// Buckling step, reduced to the smallest positive eigenvalue.
    Buckling,
}

/// Complete, unvalidated input for one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Project name; prefixes every named entity of the solver model.
    pub name: String,
    /// Cross-section dimensions and span.
    pub dimensions: Dimensions,
    /// Material constants.
    pub material: MaterialConfig,
    /// Total load in kilonewtons.
    pub load: f64,
    /// Mesh density controls.
    pub mesh: MeshConfig,
    /// Analysis mode.
    pub mode: AnalysisMode,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "CP3".to_owned(),
            dimensions: Dimensions::default(),
            material: MaterialConfig::default(),
            load: 43.0,
            mesh: MeshConfig::default(),
            mode: AnalysisMode::default(),
        }
    }
}

impl ProfileConfig {
    /// Look up a built-in preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::UnknownPreset`] when `name` is not one of [`PRESETS`].
    ///
    /// # Examples
    /// ```
    /// use profilex::config::ProfileConfig;
    ///
    /// let cp1 = ProfileConfig::preset("CP1").expect("known preset");
    /// assert_eq!(cp1.dimensions.dh2, 60.0);
    /// ```
    pub fn preset(name: &str) -> Result<Self, ConfigLoadError> {
        let dimensions = match name {
            "CP1" => Dimensions::with_tee(60.0, 7.0),
            "CP2" => Dimensions::with_tee(70.0, 8.0),
            "CP3" => Dimensions::with_tee(80.0, 9.0),
            other => return Err(ConfigLoadError::UnknownPreset(other.to_owned())),
        };
        Ok(Self {
            name: name.to_owned(),
            dimensions,
            ..Self::default()
        })
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Parse`] when the text is not a valid record.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Io`] when the file cannot be read and
    /// [`ConfigLoadError::Parse`] when its content is not a valid record.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
