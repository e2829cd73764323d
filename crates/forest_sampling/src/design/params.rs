//! Sampling parameters, plot shapes and per-block override records.
use std::f64::consts::PI;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, Scope};

/// Allowed sampling intensity, in percent of block area.
pub const INTENSITY_PERCENT_RANGE: RangeInclusive<f64> = 0.1..=10.0;
/// Allowed minimum plot count for blocks of at least one hectare.
pub const MIN_SAMPLES_LARGE_RANGE: RangeInclusive<u32> = 2..=10;
/// Allowed minimum plot count for blocks under one hectare.
pub const MIN_SAMPLES_SMALL_RANGE: RangeInclusive<u32> = 1..=5;

/// Largest accepted stratum count. Each stratum costs one polygon clip.
pub const MAX_NUM_STRATA: u32 = 10_000;

/// Plot area used by [`PlotShape::default`], in square meters.
pub const DEFAULT_PLOT_AREA_SQM: f64 = 500.0;

/// Methodology used to place plots inside a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SamplingType {
    /// Regular square grid.
    #[default]
    Systematic,
    /// Uniform rejection sampling.
    Random,
    /// One random draw per bounding-box cell.
    Stratified,
}

impl SamplingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingType::Systematic => "systematic",
            SamplingType::Random => "random",
            SamplingType::Stratified => "stratified",
        }
    }
}

impl std::fmt::Display for SamplingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape and size of the field plot measured around each sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum PlotShape {
    Circle { radius_m: f64 },
    Square { side_m: f64 },
    Rectangle { width_m: f64, height_m: f64 },
}

impl Default for PlotShape {
    fn default() -> Self {
        PlotShape::Circle {
            radius_m: (DEFAULT_PLOT_AREA_SQM / PI).sqrt(),
        }
    }
}

impl PlotShape {
    pub fn area_sqm(&self) -> f64 {
        match *self {
            PlotShape::Circle { radius_m } => PI * radius_m * radius_m,
            PlotShape::Square { side_m } => side_m * side_m,
            PlotShape::Rectangle { width_m, height_m } => width_m * height_m,
        }
    }

    /// Fails with [`Error::Configuration`] on any non-positive or non-finite dimension.
    pub fn validate(&self) -> Result<()> {
        let dims: &[(&str, f64)] = match self {
            PlotShape::Circle { radius_m } => &[("radius_m", *radius_m)],
            PlotShape::Square { side_m } => &[("side_m", *side_m)],
            PlotShape::Rectangle { width_m, height_m } => {
                &[("width_m", *width_m), ("height_m", *height_m)]
            }
        };
        for (name, value) in dims {
            if !value.is_finite() || *value <= 0.0 {
                return Err(Error::Configuration(format!(
                    "plot {name} must be a positive number of meters, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Fully populated sampling parameters, used as design defaults and as the
/// merged result for each block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplingParameters {
    /// Share of block area covered by plots, in percent.
    pub intensity_percent: f64,
    /// Minimum plot count for blocks of at least one hectare.
    pub min_samples_large: u32,
    /// Minimum plot count for blocks under one hectare.
    pub min_samples_small: u32,
    /// Minimum spacing between plots of the same block; 0 disables the check.
    pub min_distance_meters: f64,
    /// Inward buffer from the block boundary; 0 disables it.
    pub boundary_buffer_meters: f64,
    /// Stratum count for stratified sampling; `None` derives it from the target.
    pub num_strata: Option<u32>,
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            intensity_percent: 0.5,
            min_samples_large: 5,
            min_samples_small: 2,
            min_distance_meters: 0.0,
            boundary_buffer_meters: 0.0,
            num_strata: None,
        }
    }
}

impl SamplingParameters {
    pub fn with_intensity_percent(mut self, intensity_percent: f64) -> Self {
        self.intensity_percent = intensity_percent;
        self
    }

    pub fn with_min_samples(mut self, large: u32, small: u32) -> Self {
        self.min_samples_large = large;
        self.min_samples_small = small;
        self
    }

    pub fn with_min_distance(mut self, meters: f64) -> Self {
        self.min_distance_meters = meters;
        self
    }

    pub fn with_boundary_buffer(mut self, meters: f64) -> Self {
        self.boundary_buffer_meters = meters;
        self
    }

    pub fn with_num_strata(mut self, num_strata: u32) -> Self {
        self.num_strata = Some(num_strata);
        self
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self, scope: &Scope) -> Result<()> {
        check_intensity(scope, self.intensity_percent)?;
        check_min_samples_large(scope, self.min_samples_large)?;
        check_min_samples_small(scope, self.min_samples_small)?;
        check_distance(scope, "min_distance_meters", self.min_distance_meters)?;
        check_distance(scope, "boundary_buffer_meters", self.boundary_buffer_meters)?;
        if let Some(n) = self.num_strata {
            check_num_strata(scope, n)?;
        }
        Ok(())
    }
}

/// Partial parameter record for one block. Every `Some` field replaces the
/// design default; `None` inherits it. Plot shape is design-wide and cannot be
/// overridden.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ParameterOverrides {
    pub sampling_type: Option<SamplingType>,
    pub intensity_percent: Option<f64>,
    pub min_samples_large: Option<u32>,
    pub min_samples_small: Option<u32>,
    pub min_distance_meters: Option<f64>,
    pub boundary_buffer_meters: Option<f64>,
    pub num_strata: Option<u32>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sampling_type(mut self, sampling_type: SamplingType) -> Self {
        self.sampling_type = Some(sampling_type);
        self
    }

    pub fn intensity_percent(mut self, value: f64) -> Self {
        self.intensity_percent = Some(value);
        self
    }

    pub fn min_samples_large(mut self, value: u32) -> Self {
        self.min_samples_large = Some(value);
        self
    }

    pub fn min_samples_small(mut self, value: u32) -> Self {
        self.min_samples_small = Some(value);
        self
    }

    pub fn min_distance_meters(mut self, value: f64) -> Self {
        self.min_distance_meters = Some(value);
        self
    }

    pub fn boundary_buffer_meters(mut self, value: f64) -> Self {
        self.boundary_buffer_meters = Some(value);
        self
    }

    pub fn num_strata(mut self, value: u32) -> Self {
        self.num_strata = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates only the fields that are present.
    pub fn validate(&self, scope: &Scope) -> Result<()> {
        if let Some(v) = self.intensity_percent {
            check_intensity(scope, v)?;
        }
        if let Some(v) = self.min_samples_large {
            check_min_samples_large(scope, v)?;
        }
        if let Some(v) = self.min_samples_small {
            check_min_samples_small(scope, v)?;
        }
        if let Some(v) = self.min_distance_meters {
            check_distance(scope, "min_distance_meters", v)?;
        }
        if let Some(v) = self.boundary_buffer_meters {
            check_distance(scope, "boundary_buffer_meters", v)?;
        }
        if let Some(v) = self.num_strata {
            check_num_strata(scope, v)?;
        }
        Ok(())
    }
}

fn check_intensity(scope: &Scope, value: f64) -> Result<()> {
    if !INTENSITY_PERCENT_RANGE.contains(&value) {
        return Err(Error::validation(
            scope,
            "intensity_percent",
            format!(
                "{value} is outside {}..={}",
                INTENSITY_PERCENT_RANGE.start(),
                INTENSITY_PERCENT_RANGE.end()
            ),
        ));
    }
    Ok(())
}

fn check_min_samples_large(scope: &Scope, value: u32) -> Result<()> {
    if !MIN_SAMPLES_LARGE_RANGE.contains(&value) {
        return Err(Error::validation(
            scope,
            "min_samples_large",
            format!("{value} is outside {MIN_SAMPLES_LARGE_RANGE:?}"),
        ));
    }
    Ok(())
}

fn check_min_samples_small(scope: &Scope, value: u32) -> Result<()> {
    if !MIN_SAMPLES_SMALL_RANGE.contains(&value) {
        return Err(Error::validation(
            scope,
            "min_samples_small",
            format!("{value} is outside {MIN_SAMPLES_SMALL_RANGE:?}"),
        ));
    }
    Ok(())
}

fn check_distance(scope: &Scope, field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::validation(
            scope,
            field,
            format!("{value} must be a finite, non-negative distance"),
        ));
    }
    Ok(())
}

fn check_num_strata(scope: &Scope, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::validation(scope, "num_strata", "must be at least 1"));
    }
    if value > MAX_NUM_STRATA {
        return Err(Error::validation(
            scope,
            "num_strata",
            format!("{value} exceeds the maximum of {MAX_NUM_STRATA}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_are_valid() {
        assert!(SamplingParameters::default()
            .validate(&Scope::Defaults)
            .is_ok());
        assert!(PlotShape::default().validate().is_ok());
        assert!((PlotShape::default().area_sqm() - DEFAULT_PLOT_AREA_SQM).abs() < 1e-9);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let p = SamplingParameters::default()
            .with_intensity_percent(0.1)
            .with_min_samples(10, 1);
        assert!(p.validate(&Scope::Defaults).is_ok());
        let p = SamplingParameters::default()
            .with_intensity_percent(10.0)
            .with_min_samples(2, 5);
        assert!(p.validate(&Scope::Defaults).is_ok());
    }

    #[test]
    fn out_of_range_defaults_fail_with_field_name() {
        let cases = [
            (
                SamplingParameters::default().with_intensity_percent(0.05),
                "intensity_percent",
            ),
            (
                SamplingParameters::default().with_intensity_percent(12.0),
                "intensity_percent",
            ),
            (
                SamplingParameters::default().with_min_samples(1, 2),
                "min_samples_large",
            ),
            (
                SamplingParameters::default().with_min_samples(11, 2),
                "min_samples_large",
            ),
            (
                SamplingParameters::default().with_min_samples(5, 0),
                "min_samples_small",
            ),
            (
                SamplingParameters::default().with_min_samples(5, 6),
                "min_samples_small",
            ),
            (
                SamplingParameters::default().with_min_distance(-1.0),
                "min_distance_meters",
            ),
            (
                SamplingParameters::default().with_boundary_buffer(f64::NAN),
                "boundary_buffer_meters",
            ),
            (
                SamplingParameters::default().with_num_strata(0),
                "num_strata",
            ),
            (
                SamplingParameters::default().with_num_strata(MAX_NUM_STRATA + 1),
                "num_strata",
            ),
        ];
        for (params, expected) in cases {
            match params.validate(&Scope::Defaults) {
                Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn override_validation_only_checks_present_fields() {
        let scope = Scope::Block("Block A".into());
        assert!(ParameterOverrides::new().validate(&scope).is_ok());
        assert!(ParameterOverrides::new()
            .min_distance_meters(100.0)
            .validate(&scope)
            .is_ok());

        let err = ParameterOverrides::new()
            .min_samples_small(9)
            .validate(&scope)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.block(), Some("Block A"));
    }

    #[test]
    fn num_strata_is_capped() {
        let scope = Scope::Block("Block A".into());
        assert!(SamplingParameters::default()
            .with_num_strata(MAX_NUM_STRATA)
            .validate(&Scope::Defaults)
            .is_ok());
        let err = ParameterOverrides::new()
            .num_strata(u32::MAX)
            .validate(&scope)
            .unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "num_strata"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plot_area_per_shape() {
        assert_eq!(PlotShape::Square { side_m: 20.0 }.area_sqm(), 400.0);
        assert_eq!(
            PlotShape::Rectangle {
                width_m: 20.0,
                height_m: 25.0
            }
            .area_sqm(),
            500.0
        );
        let circle = PlotShape::Circle { radius_m: 10.0 }.area_sqm();
        assert!((circle - 314.159_265).abs() < 1e-5);
    }

    #[test]
    fn non_positive_plot_dimensions_are_configuration_errors() {
        let shapes = [
            PlotShape::Circle { radius_m: 0.0 },
            PlotShape::Square { side_m: -2.0 },
            PlotShape::Rectangle {
                width_m: 10.0,
                height_m: f64::INFINITY,
            },
        ];
        for shape in shapes {
            let err = shape.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn empty_override_reports_empty() {
        assert!(ParameterOverrides::new().is_empty());
        assert!(!ParameterOverrides::new()
            .sampling_type(SamplingType::Random)
            .is_empty());
    }
}
