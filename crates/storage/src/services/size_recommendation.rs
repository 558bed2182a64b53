use crate::error::{Result, StorageError};
use crate::models::{GarmentCategory, MeasurementSet};

use super::size_chart::SizeChart;

/// Confidence assigned when a size has no usable reference data: the
/// size is absent from the chart, or none of its banded fields were
/// supplied. A neutral midpoint avoids false precision in either
/// direction.
const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// How many runner-up sizes to report.
const MAX_ALTERNATIVES: usize = 2;

/// Scoring constants. The primary pass rewards an in-band field with 1.0;
/// the alternatives pass uses a humbler 0.8 with the same decay, which
/// biases reported runner-up confidences downward.
#[derive(Debug, Clone, Copy)]
struct ScoringWeights {
    in_band_reward: f64,
    decay: f64,
}

const PRIMARY_WEIGHTS: ScoringWeights = ScoringWeights {
    in_band_reward: 1.0,
    decay: 0.5,
};

const ALTERNATE_WEIGHTS: ScoringWeights = ScoringWeights {
    in_band_reward: 0.8,
    decay: 0.5,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SizeConfidence {
    pub size: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeRecommendation {
    pub size: String,
    pub confidence: f64,
    pub alternatives: Vec<SizeConfidence>,
}

/// Recommend a size for `category` given the supplied measurements and
/// the sizes the product actually offers.
///
/// Pure function of its inputs and the chart. Ties between equally
/// confident sizes go to the earliest entry of `available_sizes`.
pub fn recommend(
    chart: &SizeChart,
    category: &str,
    measurements: &MeasurementSet,
    available_sizes: &[String],
) -> Result<SizeRecommendation> {
    if available_sizes.is_empty() {
        return Err(StorageError::MissingEntity("available sizes"));
    }

    let Some(category) = GarmentCategory::parse(category) else {
        // Unknown category: no reference data to score against, so hand
        // back the first offered size at neutral confidence.
        return Ok(SizeRecommendation {
            size: available_sizes[0].clone(),
            confidence: NEUTRAL_CONFIDENCE,
            alternatives: Vec::new(),
        });
    };

    let mut winner_index = 0;
    let mut winner_confidence = f64::MIN;

    for (index, size) in available_sizes.iter().enumerate() {
        let confidence = score_size(chart, category, size, measurements, PRIMARY_WEIGHTS);
        if confidence > winner_confidence {
            winner_confidence = confidence;
            winner_index = index;
        }
    }

    let mut alternatives: Vec<SizeConfidence> = available_sizes
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != winner_index)
        .map(|(_, size)| SizeConfidence {
            size: size.clone(),
            confidence: score_size(chart, category, size, measurements, ALTERNATE_WEIGHTS),
        })
        .collect();

    alternatives.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    alternatives.truncate(MAX_ALTERNATIVES);

    Ok(SizeRecommendation {
        size: available_sizes[winner_index].clone(),
        confidence: winner_confidence,
        alternatives,
    })
}

/// Score one size: average the per-field scores over every field the
/// chart defines for this size AND the caller supplied. No overlapping
/// fields means no evidence, which scores neutral rather than 0 or 1.
fn score_size(
    chart: &SizeChart,
    category: GarmentCategory,
    size_label: &str,
    measurements: &MeasurementSet,
    weights: ScoringWeights,
) -> f64 {
    let Some(bands) = chart.size_bands(category, size_label) else {
        return NEUTRAL_CONFIDENCE;
    };

    let mut total = 0.0;
    let mut scored_fields = 0usize;

    for (field, band) in bands {
        let Some(value) = measurements.get(*field) else {
            continue;
        };

        let score = if band.contains(value) {
            weights.in_band_reward
        } else {
            let normalized = band.distance_outside(value) / band.width();
            (weights.in_band_reward - weights.decay * normalized).max(0.0)
        };

        total += score;
        scored_fields += 1;
    }

    if scored_fields == 0 {
        NEUTRAL_CONFIDENCE
    } else {
        total / scored_fields as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementField;
    use crate::services::size_chart::DEFAULT_SIZE_CHART;

    fn sizes(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn dress_measurements(bust: f64, waist: f64, hips: f64) -> MeasurementSet {
        MeasurementSet::new()
            .with(MeasurementField::Bust, bust)
            .with(MeasurementField::Waist, waist)
            .with(MeasurementField::Hips, hips)
    }

    #[test]
    fn test_all_fields_in_band_scores_full_confidence() {
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(90.0, 73.0, 98.0),
            &sizes(&["S", "M", "L"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "M");
        assert_eq!(recommendation.confidence, 1.0);
    }

    #[test]
    fn test_band_boundaries_score_full_confidence() {
        // Exactly at min and max of every M band; boundaries are
        // inclusive, so both ends score a full 1.0.
        let at_min = dress_measurements(88.0, 70.0, 95.0);
        let at_max = dress_measurements(93.0, 75.0, 100.0);

        for measurements in [at_min, at_max] {
            let recommendation =
                recommend(&DEFAULT_SIZE_CHART, "dresses", &measurements, &sizes(&["M"])).unwrap();
            assert_eq!(recommendation.size, "M");
            assert_eq!(recommendation.confidence, 1.0);
        }
    }

    #[test]
    fn test_shared_boundary_tie_goes_to_earlier_offered_size() {
        // Bands are contiguous: the M minimum is also the S maximum, so
        // both score 1.0 and the first offered size wins.
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(88.0, 70.0, 95.0),
            &sizes(&["S", "M", "L"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "S");
        assert_eq!(recommendation.confidence, 1.0);
    }

    #[test]
    fn test_out_of_band_decays_linearly() {
        // Bust 95 against M's 88-93 band: 2cm outside a 5cm band.
        let measurements = MeasurementSet::new().with(MeasurementField::Bust, 95.0);
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &measurements,
            &sizes(&["M"]),
        )
        .unwrap();

        let expected = 1.0 - 0.5 * (2.0 / 5.0);
        assert!((recommendation.confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_far_outside_band_clamps_to_zero() {
        // 20cm outside a 5cm band decays past zero and clamps.
        let measurements = MeasurementSet::new().with(MeasurementField::Bust, 113.0);
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &measurements,
            &sizes(&["M"]),
        )
        .unwrap();

        assert_eq!(recommendation.confidence, 0.0);
    }

    #[test]
    fn test_unknown_category_falls_back_to_first_size() {
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "outerwear",
            &dress_measurements(90.0, 73.0, 98.0),
            &sizes(&["S", "M"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "S");
        assert_eq!(recommendation.confidence, 0.5);
        assert!(recommendation.alternatives.is_empty());
    }

    #[test]
    fn test_empty_available_sizes_is_not_found() {
        let result = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(90.0, 73.0, 98.0),
            &[],
        );

        assert!(matches!(result, Err(StorageError::MissingEntity(_))));
    }

    #[test]
    fn test_no_supplied_fields_scores_neutral() {
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &MeasurementSet::new(),
            &sizes(&["S", "M", "L"]),
        )
        .unwrap();

        // Every size is neutral; the tie breaks to the first offered size.
        assert_eq!(recommendation.size, "S");
        assert_eq!(recommendation.confidence, 0.5);
    }

    #[test]
    fn test_size_absent_from_chart_scores_neutral() {
        // "XXL" has no dress bands; supplied measurements fit M exactly.
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(90.0, 73.0, 98.0),
            &sizes(&["XXL", "M"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "M");
        assert_eq!(recommendation.confidence, 1.0);
        assert_eq!(recommendation.alternatives[0].size, "XXL");
        assert_eq!(recommendation.alternatives[0].confidence, 0.5);
    }

    #[test]
    fn test_recommendation_only_returns_offered_sizes() {
        let available = sizes(&["L", "XL"]);
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(90.0, 73.0, 98.0),
            &available,
        )
        .unwrap();

        assert!(available.contains(&recommendation.size));
        for alternative in &recommendation.alternatives {
            assert!(available.contains(&alternative.size));
        }
    }

    #[test]
    fn test_alternatives_capped_sorted_and_exclude_winner() {
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &dress_measurements(90.0, 73.0, 98.0),
            &sizes(&["XS", "S", "M", "L", "XL"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "M");
        assert_eq!(recommendation.alternatives.len(), 2);
        assert!(
            recommendation.alternatives[0].confidence >= recommendation.alternatives[1].confidence
        );
        for alternative in &recommendation.alternatives {
            assert_ne!(alternative.size, recommendation.size);
        }
        // Neighbours S and L are closer to the measurements than XS/XL.
        let labels: Vec<&str> = recommendation
            .alternatives
            .iter()
            .map(|a| a.size.as_str())
            .collect();
        assert!(labels.contains(&"S"));
        assert!(labels.contains(&"L"));
    }

    #[test]
    fn test_alternatives_use_humbler_in_band_reward() {
        let measurements = MeasurementSet::new().with(MeasurementField::Waist, 75.0);
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "dresses",
            &measurements,
            &sizes(&["M", "L"]),
        )
        .unwrap();

        // Waist 75.0 is the shared boundary of M (70-75) and L (75-81):
        // both are in band, M wins by first occurrence at 1.0 and L is
        // reported with the alternative reward.
        assert_eq!(recommendation.size, "M");
        assert_eq!(recommendation.confidence, 1.0);
        assert_eq!(recommendation.alternatives[0].size, "L");
        assert_eq!(recommendation.alternatives[0].confidence, 0.8);
    }

    #[test]
    fn test_tie_breaks_by_first_occurrence() {
        // Neutral across the board; order decides.
        let recommendation = recommend(
            &DEFAULT_SIZE_CHART,
            "shoes",
            &MeasurementSet::new().with(MeasurementField::Height, 180.0),
            &sizes(&["41", "42", "43"]),
        )
        .unwrap();

        assert_eq!(recommendation.size, "41");
        assert_eq!(recommendation.confidence, 0.5);
    }
}
