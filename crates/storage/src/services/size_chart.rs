use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::{GarmentCategory, MeasurementField};

/// Inclusive measurement band for one field of one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBand {
    pub min: f64,
    pub max: f64,
}

impl SizeBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// How far a value lies outside the band; zero when inside.
    pub fn distance_outside(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// Static reference table mapping garment category and size label to
/// per-measurement bands. Immutable reference data, injected into the
/// matcher so charts can be swapped without touching scoring logic.
#[derive(Debug, Clone, Default)]
pub struct SizeChart {
    bands: HashMap<GarmentCategory, HashMap<String, HashMap<MeasurementField, SizeBand>>>,
}

impl SizeChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_band(
        mut self,
        category: GarmentCategory,
        size_label: &str,
        field: MeasurementField,
        min: f64,
        max: f64,
    ) -> Self {
        self.bands
            .entry(category)
            .or_default()
            .entry(normalize_label(size_label))
            .or_default()
            .insert(field, SizeBand::new(min, max));
        self
    }

    /// Bands for one size of one category, if the chart defines any.
    pub fn size_bands(
        &self,
        category: GarmentCategory,
        size_label: &str,
    ) -> Option<&HashMap<MeasurementField, SizeBand>> {
        self.bands
            .get(&category)?
            .get(&normalize_label(size_label))
    }

    pub fn has_category(&self, category: GarmentCategory) -> bool {
        self.bands.contains_key(&category)
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

lazy_static! {
    /// Default reference chart. Tops, bottoms and dresses carry bands in
    /// centimeters; shoes carry none, so shoe sizes fall back to the
    /// neutral confidence.
    pub static ref DEFAULT_SIZE_CHART: SizeChart = default_chart();
}

fn default_chart() -> SizeChart {
    use GarmentCategory::{Bottoms, Dresses, Tops};
    use MeasurementField::{Bust, Hips, Inseam, ShoulderWidth, Waist};

    SizeChart::new()
        // dresses: bust / waist / hips
        .with_band(Dresses, "XS", Bust, 78.0, 83.0)
        .with_band(Dresses, "XS", Waist, 60.0, 65.0)
        .with_band(Dresses, "XS", Hips, 85.0, 90.0)
        .with_band(Dresses, "S", Bust, 83.0, 88.0)
        .with_band(Dresses, "S", Waist, 65.0, 70.0)
        .with_band(Dresses, "S", Hips, 90.0, 95.0)
        .with_band(Dresses, "M", Bust, 88.0, 93.0)
        .with_band(Dresses, "M", Waist, 70.0, 75.0)
        .with_band(Dresses, "M", Hips, 95.0, 100.0)
        .with_band(Dresses, "L", Bust, 93.0, 99.0)
        .with_band(Dresses, "L", Waist, 75.0, 81.0)
        .with_band(Dresses, "L", Hips, 100.0, 106.0)
        .with_band(Dresses, "XL", Bust, 99.0, 105.0)
        .with_band(Dresses, "XL", Waist, 81.0, 87.0)
        .with_band(Dresses, "XL", Hips, 106.0, 112.0)
        // tops: bust / waist / shoulder width
        .with_band(Tops, "XS", Bust, 78.0, 83.0)
        .with_band(Tops, "XS", Waist, 60.0, 65.0)
        .with_band(Tops, "XS", ShoulderWidth, 36.0, 38.0)
        .with_band(Tops, "S", Bust, 83.0, 88.0)
        .with_band(Tops, "S", Waist, 65.0, 70.0)
        .with_band(Tops, "S", ShoulderWidth, 38.0, 40.0)
        .with_band(Tops, "M", Bust, 88.0, 93.0)
        .with_band(Tops, "M", Waist, 70.0, 75.0)
        .with_band(Tops, "M", ShoulderWidth, 40.0, 42.0)
        .with_band(Tops, "L", Bust, 93.0, 99.0)
        .with_band(Tops, "L", Waist, 75.0, 81.0)
        .with_band(Tops, "L", ShoulderWidth, 42.0, 44.0)
        .with_band(Tops, "XL", Bust, 99.0, 105.0)
        .with_band(Tops, "XL", Waist, 81.0, 87.0)
        .with_band(Tops, "XL", ShoulderWidth, 44.0, 46.0)
        // bottoms: waist / hips / inseam
        .with_band(Bottoms, "XS", Waist, 60.0, 65.0)
        .with_band(Bottoms, "XS", Hips, 85.0, 90.0)
        .with_band(Bottoms, "XS", Inseam, 70.0, 74.0)
        .with_band(Bottoms, "S", Waist, 65.0, 70.0)
        .with_band(Bottoms, "S", Hips, 90.0, 95.0)
        .with_band(Bottoms, "S", Inseam, 72.0, 76.0)
        .with_band(Bottoms, "M", Waist, 70.0, 75.0)
        .with_band(Bottoms, "M", Hips, 95.0, 100.0)
        .with_band(Bottoms, "M", Inseam, 74.0, 78.0)
        .with_band(Bottoms, "L", Waist, 75.0, 81.0)
        .with_band(Bottoms, "L", Hips, 100.0, 106.0)
        .with_band(Bottoms, "L", Inseam, 76.0, 80.0)
        .with_band(Bottoms, "XL", Waist, 81.0, 87.0)
        .with_band(Bottoms, "XL", Hips, 106.0, 112.0)
        .with_band(Bottoms, "XL", Inseam, 78.0, 82.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive() {
        let band = SizeBand::new(70.0, 75.0);
        assert!(band.contains(70.0));
        assert!(band.contains(75.0));
        assert!(!band.contains(69.9));
        assert!(!band.contains(75.1));
    }

    #[test]
    fn test_distance_outside() {
        let band = SizeBand::new(70.0, 75.0);
        assert_eq!(band.distance_outside(72.0), 0.0);
        assert_eq!(band.distance_outside(68.0), 2.0);
        assert_eq!(band.distance_outside(78.5), 3.5);
    }

    #[test]
    fn test_size_lookup_is_case_insensitive() {
        let chart = &*DEFAULT_SIZE_CHART;
        assert!(chart.size_bands(GarmentCategory::Dresses, "m").is_some());
        assert!(chart.size_bands(GarmentCategory::Dresses, " M ").is_some());
    }

    #[test]
    fn test_default_chart_dresses_m() {
        let bands = DEFAULT_SIZE_CHART
            .size_bands(GarmentCategory::Dresses, "M")
            .unwrap();
        assert_eq!(bands[&MeasurementField::Bust], SizeBand::new(88.0, 93.0));
        assert_eq!(bands[&MeasurementField::Waist], SizeBand::new(70.0, 75.0));
        assert_eq!(bands[&MeasurementField::Hips], SizeBand::new(95.0, 100.0));
    }

    #[test]
    fn test_shoes_have_no_bands() {
        assert!(!DEFAULT_SIZE_CHART.has_category(GarmentCategory::Shoes));
        assert!(
            DEFAULT_SIZE_CHART
                .size_bands(GarmentCategory::Shoes, "42")
                .is_none()
        );
    }
}
