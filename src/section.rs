//! Validated cross-section parameters.

use log::debug;

use crate::config::{Dimensions, MaterialConfig, ProfileConfig};
use crate::errors::{ConfigurationError, SizingRule};

/// Smallest admissible plate dimension in millimetres.
pub const MIN_DIMENSION: f64 = 0.1;

/// Validated dimensions, material and load of one combined profile.
///
/// Instances can only be created through [`CrossSectionParameters::new`] or
/// [`CrossSectionParameters::from_config`], so every value downstream stages
/// receive already satisfies the sizing rules.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSectionParameters {
    /// Project name.
    name: String,
    /// Cross-section dimensions and span.
    dimensions: Dimensions,
    /// Material constants.
    material: MaterialConfig,
    /// Total load in kilonewtons.
    load: f64,
}

impl CrossSectionParameters {
    /// Validate the inputs and freeze them.
    ///
    /// The T-profile is checked before the I-profile and the first violation is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the offending field, its value and
    /// the rule it breaks.
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        material: MaterialConfig,
        load: f64,
    ) -> Result<Self, ConfigurationError> {
        validate_tee(&dimensions)?;
        debug!("T-section sizing rules satisfied");
        validate_eye(&dimensions)?;
        debug!("I-section sizing rules satisfied");
        finite("length", dimensions.length)?;
        positive("length", dimensions.length)?;
        validate_material(&material)?;
        finite("load", load)?;
        Ok(Self {
            name: name.into(),
            dimensions,
            material,
            load,
        })
    }

    /// Validate a configuration record.
    ///
    /// # Errors
    ///
    /// See [`CrossSectionParameters::new`].
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ConfigurationError> {
        Self::new(
            config.name.clone(),
            config.dimensions,
            config.material.clone(),
            config.load,
        )
    }

    /// Project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cross-section dimensions and span.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Material constants.
    #[must_use]
    pub const fn material(&self) -> &MaterialConfig {
        &self.material
    }

    /// Total load in kilonewtons.
    #[must_use]
    pub const fn load(&self) -> f64 {
        self.load
    }
}

/// Sizing rules of the T-profile.
fn validate_tee(d: &Dimensions) -> Result<(), ConfigurationError> {
    minimum("dh2", d.dh2)?;
    minimum("ds2", d.ds2)?;
    minimum("dw2", d.dw2)?;
    minimum("dt2", d.dt2)?;
    if d.dt2 > d.dh2 {
        return Err(ConfigurationError::new(
            "dt2",
            d.dt2,
            SizingRule::AtMost {
                bound: "dh2",
                limit: d.dh2,
            },
        ));
    }
    if d.dt2 > d.ds2 {
        return Err(ConfigurationError::new(
            "dt2",
            d.dt2,
            SizingRule::AtMost {
                bound: "ds2",
                limit: d.ds2,
            },
        ));
    }
    Ok(())
}

/// Sizing rules of the I-profile.
fn validate_eye(d: &Dimensions) -> Result<(), ConfigurationError> {
    minimum("dh1", d.dh1)?;
    minimum("ds1", d.ds1)?;
    minimum("dw1", d.dw1)?;
    minimum("dt1", d.dt1)?;
    if d.dh1 < 2.0 * d.dt1 {
        return Err(ConfigurationError::new(
            "dh1",
            d.dh1,
            SizingRule::AtLeastTwice {
                bound: "dt1",
                limit: d.dt1,
            },
        ));
    }
    if d.ds1 > d.dt1 {
        return Err(ConfigurationError::new(
            "ds1",
            d.ds1,
            SizingRule::AtMost {
                bound: "dt1",
                limit: d.dt1,
            },
        ));
    }
    Ok(())
}

/// Material constants: positive modulus, Poisson ratio in `[0, 0.5)`, density not negative.
fn validate_material(material: &MaterialConfig) -> Result<(), ConfigurationError> {
    finite("elastic_modulus", material.elastic_modulus)?;
    positive("elastic_modulus", material.elastic_modulus)?;
    finite("poisson_ratio", material.poisson_ratio)?;
    if !(0.0..0.5).contains(&material.poisson_ratio) {
        return Err(ConfigurationError::new(
            "poisson_ratio",
            material.poisson_ratio,
            SizingRule::Within {
                lower: 0.0,
                upper: 0.5,
            },
        ));
    }
    finite("density", material.density)?;
    if material.density < 0.0 {
        return Err(ConfigurationError::new(
            "density",
            material.density,
            SizingRule::NonNegative,
        ));
    }
    Ok(())
}

/// Reject NaN and infinities.
fn finite(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::new(field, value, SizingRule::Finite))
    }
}

/// Reject zero and negative values.
fn positive(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::new(field, value, SizingRule::Positive))
    }
}

/// Finite and not below [`MIN_DIMENSION`].
fn minimum(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    finite(field, value)?;
    if value < MIN_DIMENSION {
        return Err(ConfigurationError::new(
            field,
            value,
            SizingRule::MinimumDimension {
                minimum: MIN_DIMENSION,
            },
        ));
    }
    Ok(())
}
