use std::collections::HashSet;

use crate::models::ProductDetail;

const CATEGORY_WEIGHT: f64 = 40.0;
const TAG_WEIGHT: f64 = 60.0;

/// Flat score for a candidate that carries no categories and no tags:
/// there is nothing to compare, but starving it entirely would bury
/// sparsely-annotated catalog data.
const BARE_CANDIDATE_SCORE: f64 = 10.0;

/// Flat score when no outfit member has relation data to compare against.
const NO_COMPARABLE_MEMBERS_SCORE: f64 = 15.0;

/// How similar a candidate product is to an outfit's existing members,
/// in [0, 100].
///
/// Per member: shared-category ratio weighted 40 plus shared-tag ratio
/// weighted 60, each ratio using `max(|A|, |B|)` as denominator so the
/// measure rewards sets of similar sizes. The member scores are averaged.
pub fn similarity(members: &[ProductDetail], candidate: &ProductDetail) -> f64 {
    if !candidate.has_attribute_relations() {
        return BARE_CANDIDATE_SCORE;
    }

    let candidate_categories: HashSet<String> = candidate.category_names().into_iter().collect();
    let candidate_tags: HashSet<String> = candidate.tag_values().into_iter().collect();

    let mut total = 0.0;
    let mut comparable = 0usize;

    for member in members {
        if member.product.product_id == candidate.product.product_id {
            continue;
        }
        if !member.has_attribute_relations() {
            continue;
        }

        let member_categories: HashSet<String> = member.category_names().into_iter().collect();
        let member_tags: HashSet<String> = member.tag_values().into_iter().collect();

        let category_ratio = shared_ratio(&candidate_categories, &member_categories);
        let tag_ratio = shared_ratio(&candidate_tags, &member_tags);

        total += CATEGORY_WEIGHT * category_ratio + TAG_WEIGHT * tag_ratio;
        comparable += 1;
    }

    if comparable == 0 {
        return NO_COMPARABLE_MEMBERS_SCORE;
    }

    total / comparable as f64
}

/// `|A intersect B| / max(|A|, |B|)`; zero when either set is empty.
fn shared_ratio(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let denominator = a.len().max(b.len());
    if denominator == 0 {
        return 0.0;
    }

    let shared = a.intersection(b).count();
    shared as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product, Tag};
    use uuid::Uuid;

    fn build_product(categories: &[&str], tags: &[&str]) -> ProductDetail {
        ProductDetail {
            product: Product {
                product_id: Uuid::new_v4(),
                title: "Item".to_string(),
                description: None,
                thumbnail_url: None,
                metadata: sqlx::types::Json(serde_json::json!({})),
                created_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                deleted_at: None,
            },
            categories: categories
                .iter()
                .map(|name| Category {
                    category_id: Uuid::new_v4(),
                    name: name.to_string(),
                })
                .collect(),
            tags: tags
                .iter()
                .map(|value| Tag {
                    tag_id: Uuid::new_v4(),
                    value: value.to_string(),
                })
                .collect(),
            variants: vec![],
        }
    }

    #[test]
    fn test_identical_attribute_sets_score_full() {
        let member = build_product(&["tops"], &["casual", "summer"]);
        let candidate = build_product(&["tops"], &["casual", "summer"]);

        assert_eq!(similarity(&[member], &candidate), 100.0);
    }

    #[test]
    fn test_partial_overlap_uses_larger_set_as_denominator() {
        // Categories identical (ratio 1); one of the candidate's two tags
        // shared against the member's one tag: ratio 1/2.
        let member = build_product(&["tops"], &["casual"]);
        let candidate = build_product(&["tops"], &["casual", "summer"]);

        let score = similarity(&[member], &candidate);
        assert!((score - (40.0 + 60.0 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_scores_average_across_members() {
        let twin = build_product(&["tops"], &["casual"]);
        let stranger = build_product(&["shoes"], &["leather"]);
        let candidate = build_product(&["tops"], &["casual"]);

        // 100 against the twin, 0 against the stranger.
        assert_eq!(similarity(&[twin, stranger], &candidate), 50.0);
    }

    #[test]
    fn test_bare_candidate_short_circuits_to_base_score() {
        let member = build_product(&["tops"], &["casual"]);
        let candidate = build_product(&[], &[]);

        assert_eq!(similarity(&[member], &candidate), 10.0);
    }

    #[test]
    fn test_no_comparable_members_scores_flat_base() {
        let bare_member = build_product(&[], &[]);
        let candidate = build_product(&["tops"], &["casual"]);

        assert_eq!(similarity(&[bare_member], &candidate), 15.0);
        assert_eq!(similarity(&[], &candidate), 15.0);
    }

    #[test]
    fn test_candidate_already_in_outfit_is_not_compared_with_itself() {
        let candidate = build_product(&["tops"], &["casual"]);
        let mut member = candidate.clone();
        member.product.product_id = candidate.product.product_id;

        // The only member is the candidate itself, so nothing is comparable.
        assert_eq!(similarity(&[member], &candidate), 15.0);
    }

    #[test]
    fn test_one_sided_empty_set_contributes_zero_for_that_dimension() {
        // Member has no categories; tag sets fully overlap.
        let member = build_product(&[], &["casual"]);
        let candidate = build_product(&["tops"], &["casual"]);

        assert_eq!(similarity(&[member], &candidate), 60.0);
    }
}
