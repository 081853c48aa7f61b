//! Distributed pressure derived from the total load.

use serde::{Deserialize, Serialize};
use uom::si::f64::{Area, Force, Length, Pressure};
use uom::si::force::kilonewton;
use uom::si::length::millimeter;
use uom::si::pressure::megapascal;

use crate::geometry::{DerivedGeometry, Half, Level, SegmentTag, Side};
use crate::section::CrossSectionParameters;
use crate::vectors::Point;

/// Face of a shell a pressure acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSide {
    /// Face on the positive side of the shell normal.
    Side1,
    /// Face on the negative side of the shell normal.
    Side2,
}

/// A named set of faces loaded by the same pressure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressureRegion {
    /// Load name in the solver model.
    pub name: String,
    /// Loaded shell face.
    pub side: FaceSide,
    /// Loaded segments; each is extruded over the full span.
    pub faces: Vec<SegmentTag>,
    /// A point inside each loaded face, in the order of `faces`.
    pub locators: Vec<Point>,
}

/// Pressure load on the top I-flanges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadPlan {
    /// Pressure magnitude in N/mm².
    magnitude: f64,
    /// Loaded regions.
    regions: Vec<PressureRegion>,
    /// Total force exerted by the pressure in N.
    resultant: f64,
}

impl LoadPlan {
    /// Plan the pressure load of a profile.
    ///
    /// The outer halves of both top flanges are loaded on their second face and
    /// the inner halves on their first face.
    #[must_use]
    pub fn new(params: &CrossSectionParameters, geometry: &DerivedGeometry) -> Self {
        let dimensions = params.dimensions();
        let magnitude = derive_pressure(
            params.load(),
            dimensions.length,
            dimensions.dw1,
            dimensions.dh2,
        );
        let region = |name: &str, side: FaceSide, half: Half| {
            let faces: Vec<SegmentTag> = [Side::Left, Side::Right]
                .into_iter()
                .map(|s| SegmentTag::i_flange(s, Level::Top, half))
                .collect();
            PressureRegion {
                name: name.to_owned(),
                side,
                locators: faces.iter().map(|&tag| geometry.face_locator(tag)).collect(),
                faces,
            }
        };
        let regions = vec![
            region("Pressure-1", FaceSide::Side2, Half::Outer),
            region("Pressure-2", FaceSide::Side1, Half::Inner),
        ];
        let loaded_width: f64 = regions
            .iter()
            .flat_map(|region| region.faces.iter())
            .map(|&tag| geometry.segment_width(tag))
            .sum();
        Self {
            magnitude,
            resultant: magnitude * loaded_width * geometry.length(),
            regions,
        }
    }

    /// Pressure magnitude in N/mm².
    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Loaded regions.
    #[must_use]
    pub fn regions(&self) -> &[PressureRegion] {
        &self.regions
    }

    /// Total force the pressure exerts on the section, in N.
    ///
    /// This is the force the support reactions have to balance.
    #[must_use]
    pub const fn resultant(&self) -> f64 {
        self.resultant
    }
}

/// Pressure in N/mm² that spreads `load_kn` over the span.
///
/// `p = load · 1000 / (length · 2 · (flange_width + tee_height))`; the factor
/// 1000 converts kilonewtons into newtons.
///
/// # Examples
/// ```
/// use profilex::loads::derive_pressure;
///
/// let p = derive_pressure(43.0, 3700.0, 64.0, 80.0);
/// assert!((p - 43_000.0 / 1_065_600.0).abs() < 1.0e-12);
/// ```
#[must_use]
pub fn derive_pressure(load_kn: f64, length: f64, flange_width: f64, tee_height: f64) -> f64 {
    let load = Force::new::<kilonewton>(load_kn);
    let area: Area = Length::new::<millimeter>(length)
        * Length::new::<millimeter>(2.0 * (flange_width + tee_height));
    let pressure: Pressure = load / area;
    pressure.get::<megapascal>()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::ProfileConfig;

    fn cp3() -> (CrossSectionParameters, DerivedGeometry) {
        let params = CrossSectionParameters::from_config(&ProfileConfig::default())
            .expect("default profile is valid");
        let geometry = DerivedGeometry::new(&params);
        (params, geometry)
    }

    #[test]
    fn pressure_matches_closed_form() {
        let p = derive_pressure(43.0, 3700.0, 64.0, 80.0);
        assert_relative_eq!(p, 43_000.0 / 1_065_600.0, max_relative = 1.0e-12);
        assert_relative_eq!(p, 0.040_352_8, epsilon = 1.0e-7);
    }

    #[test]
    fn pressure_scales_linearly() {
        let base = derive_pressure(43.0, 3700.0, 64.0, 80.0);
        let doubled_load = derive_pressure(86.0, 3700.0, 64.0, 80.0);
        let doubled_span = derive_pressure(43.0, 7400.0, 64.0, 80.0);
        let doubled_width = derive_pressure(43.0, 3700.0, 128.0, 160.0);
        assert_relative_eq!(doubled_load, 2.0 * base, max_relative = 1.0e-12);
        assert_relative_eq!(doubled_span, base / 2.0, max_relative = 1.0e-12);
        assert_relative_eq!(doubled_width, base / 2.0, max_relative = 1.0e-12);
    }

    #[test]
    fn regions_are_mirrored_with_opposite_faces() {
        let (params, geometry) = cp3();
        let plan = LoadPlan::new(&params, &geometry);
        let regions = plan.regions();
        assert_eq!(regions.len(), 2);
        assert_ne!(regions[0].side, regions[1].side);
        for region in regions {
            assert_eq!(region.faces.len(), 2);
            let xs: Vec<f64> = region.locators.iter().map(|p| p.x).collect();
            assert_eq!(xs[0], -xs[1]);
            assert!(region.locators.iter().all(|p| p.y == geometry.stations().y1_i));
        }
        assert_eq!(regions[0].name, "Pressure-1");
        assert_eq!(regions[0].side, FaceSide::Side2);
    }

    #[test]
    fn resultant_covers_both_top_flanges() {
        let (params, geometry) = cp3();
        let plan = LoadPlan::new(&params, &geometry);
        assert_relative_eq!(
            plan.resultant(),
            plan.magnitude() * 3700.0 * 2.0 * 64.0,
            max_relative = 1.0e-12
        );
        assert_relative_eq!(plan.resultant(), 43_000.0 * 64.0 / 144.0, max_relative = 1.0e-9);
    }
}
