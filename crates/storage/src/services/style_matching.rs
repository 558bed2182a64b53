use std::collections::HashSet;

use crate::models::{GarmentCategory, ProductDetail, StyleProfile};

use super::vocabulary::StyleVocabulary;

const PREFERRED_STYLE_WEIGHT: f64 = 30.0;
const PREFERRED_COLOR_WEIGHT: f64 = 25.0;
const PREFERRED_OCCASION_WEIGHT: f64 = 20.0;

// Dislikes are penalized harder than likes are rewarded: one disliked
// attribute should outweigh a comparable liked one.
const DISLIKED_STYLE_WEIGHT: f64 = 40.0;
const DISLIKED_COLOR_WEIGHT: f64 = 30.0;

const SIZE_MATCH_BONUS: f64 = 25.0;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// How well a product fits a customer's style profile, in [0, 100].
///
/// Each preference dimension contributes `weight x overlap ratio`, where
/// the ratio is the matched share of the product's own attribute set.
/// A dimension only contributes when the product actually carries
/// attributes for it.
pub fn match_score(
    product: &ProductDetail,
    profile: &StyleProfile,
    vocabulary: &StyleVocabulary,
) -> f64 {
    let styles = attribute_set(product, "styles", |v| vocabulary.is_style(v));
    let colors = attribute_set(product, "colors", |v| vocabulary.is_color(v));
    let occasions = attribute_set(product, "occasions", |v| vocabulary.is_occasion(v));

    let mut score = 0.0;

    score += PREFERRED_STYLE_WEIGHT * overlap_ratio(&styles, &profile.preferred_styles);
    score += PREFERRED_COLOR_WEIGHT * overlap_ratio(&colors, &profile.preferred_colors);
    score += PREFERRED_OCCASION_WEIGHT * overlap_ratio(&occasions, &profile.preferred_occasions);

    score -= DISLIKED_STYLE_WEIGHT * overlap_ratio(&styles, &profile.disliked_styles);
    score -= DISLIKED_COLOR_WEIGHT * overlap_ratio(&colors, &profile.disliked_colors);

    let category = infer_garment_category(product);
    if let Some(preferred_size) = profile.size_preference_for(category) {
        if product.offers_size(preferred_size) {
            score += SIZE_MATCH_BONUS;
        }
    }

    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// A product's attribute set for one dimension: explicit metadata values
/// merged with the generic tags that belong to that dimension's
/// vocabulary.
fn attribute_set(
    product: &ProductDetail,
    metadata_key: &str,
    in_vocabulary: impl Fn(&str) -> bool,
) -> HashSet<String> {
    let mut set: HashSet<String> = product
        .product
        .metadata_strings(metadata_key)
        .into_iter()
        .collect();

    for tag in product.tag_values() {
        if in_vocabulary(&tag) {
            set.insert(tag);
        }
    }

    set
}

/// Matched share of the product's attribute set. Empty product sets
/// contribute nothing; an empty preference list matches nothing.
fn overlap_ratio(product_set: &HashSet<String>, preference: &[String]) -> f64 {
    if product_set.is_empty() {
        return 0.0;
    }

    let preference: HashSet<String> = preference
        .iter()
        .map(|v| v.trim().to_lowercase())
        .collect();

    let matches = product_set.iter().filter(|v| preference.contains(*v)).count();

    matches as f64 / product_set.len() as f64
}

/// One step of the category-inference chain: inspects the product and
/// either resolves a category or passes.
type CategorySignal = fn(&ProductDetail) -> Option<GarmentCategory>;

/// Inference signals in precedence order, most authoritative first.
/// Declared as data so the ordering is stated once and testable.
const CATEGORY_SIGNALS: &[(&str, CategorySignal)] = &[
    ("metadata", category_from_metadata),
    ("category-name", category_from_category_names),
    ("tag", category_from_tags),
    ("title-keyword", category_from_title),
];

/// Infer which garment category a product belongs to, falling back to
/// tops when no signal resolves.
pub fn infer_garment_category(product: &ProductDetail) -> GarmentCategory {
    CATEGORY_SIGNALS
        .iter()
        .find_map(|(_, signal)| signal(product))
        .unwrap_or(GarmentCategory::Tops)
}

fn category_from_metadata(product: &ProductDetail) -> Option<GarmentCategory> {
    product
        .product
        .metadata_str("garment_category")
        .and_then(|v| GarmentCategory::parse(&v))
}

fn category_from_category_names(product: &ProductDetail) -> Option<GarmentCategory> {
    product
        .category_names()
        .iter()
        .find_map(|name| GarmentCategory::parse(name))
}

fn category_from_tags(product: &ProductDetail) -> Option<GarmentCategory> {
    product
        .tag_values()
        .iter()
        .find_map(|value| GarmentCategory::parse(value))
}

fn category_from_title(product: &ProductDetail) -> Option<GarmentCategory> {
    const TITLE_KEYWORDS: &[(&str, GarmentCategory)] = &[
        ("dress", GarmentCategory::Dresses),
        ("gown", GarmentCategory::Dresses),
        ("jean", GarmentCategory::Bottoms),
        ("pant", GarmentCategory::Bottoms),
        ("trouser", GarmentCategory::Bottoms),
        ("skirt", GarmentCategory::Bottoms),
        ("short", GarmentCategory::Bottoms),
        ("legging", GarmentCategory::Bottoms),
        ("shoe", GarmentCategory::Shoes),
        ("sneaker", GarmentCategory::Shoes),
        ("boot", GarmentCategory::Shoes),
        ("heel", GarmentCategory::Shoes),
        ("sandal", GarmentCategory::Shoes),
        ("shirt", GarmentCategory::Tops),
        ("tee", GarmentCategory::Tops),
        ("top", GarmentCategory::Tops),
        ("blouse", GarmentCategory::Tops),
        ("sweater", GarmentCategory::Tops),
        ("hoodie", GarmentCategory::Tops),
        ("jacket", GarmentCategory::Tops),
    ];

    let title = product.product.title.to_lowercase();
    TITLE_KEYWORDS
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product, ProductVariant, Tag};
    use crate::services::vocabulary::DEFAULT_VOCABULARY;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn timestamp() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn build_product(
        title: &str,
        metadata: serde_json::Value,
        categories: &[&str],
        tags: &[&str],
        sizes: &[&str],
    ) -> ProductDetail {
        let product_id = Uuid::new_v4();
        ProductDetail {
            product: Product {
                product_id,
                title: title.to_string(),
                description: None,
                thumbnail_url: None,
                metadata: sqlx::types::Json(metadata),
                created_at: timestamp(),
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
            variants: sizes
                .iter()
                .map(|size| ProductVariant {
                    variant_id: Uuid::new_v4(),
                    product_id,
                    size_label: size.to_string(),
                    sku: None,
                })
                .collect(),
        }
    }

    fn build_profile(
        preferred_styles: &[&str],
        preferred_colors: &[&str],
        preferred_occasions: &[&str],
        disliked_styles: &[&str],
        disliked_colors: &[&str],
        size_preferences: &[(&str, &str)],
    ) -> StyleProfile {
        fn strings(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        StyleProfile {
            profile_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            preferred_styles: strings(preferred_styles),
            preferred_colors: strings(preferred_colors),
            preferred_occasions: strings(preferred_occasions),
            disliked_styles: strings(disliked_styles),
            disliked_colors: strings(disliked_colors),
            size_preferences: sqlx::types::Json(
                size_preferences
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            ),
            created_at: timestamp(),
            updated_at: timestamp(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_full_style_overlap_earns_full_style_weight() {
        let product = build_product(
            "Linen Shirt",
            serde_json::json!({"styles": ["casual"]}),
            &[],
            &[],
            &[],
        );
        let profile = build_profile(&["casual"], &[], &[], &[], &[], &[]);

        assert_eq!(match_score(&product, &profile, &DEFAULT_VOCABULARY), 30.0);
    }

    #[test]
    fn test_partial_overlap_is_proportional() {
        // Two styles on the product, one preferred: ratio 0.5.
        let product = build_product(
            "Linen Shirt",
            serde_json::json!({"styles": ["casual", "formal"]}),
            &[],
            &[],
            &[],
        );
        let profile = build_profile(&["casual"], &[], &[], &[], &[], &[]);

        assert_eq!(match_score(&product, &profile, &DEFAULT_VOCABULARY), 15.0);
    }

    #[test]
    fn test_generic_tags_in_vocabulary_join_the_attribute_sets() {
        // "streetwear" arrives as a plain tag, "navy" as a color tag.
        let product = build_product(
            "Oversized Tee",
            serde_json::json!({}),
            &[],
            &["streetwear", "navy", "organic-cotton"],
            &[],
        );
        let profile = build_profile(&["streetwear"], &["navy"], &[], &[], &[], &[]);

        // styles {streetwear} fully matched (+30), colors {navy} fully
        // matched (+25); "organic-cotton" is in neither vocabulary.
        assert_eq!(match_score(&product, &profile, &DEFAULT_VOCABULARY), 55.0);
    }

    #[test]
    fn test_dislikes_penalize_harder_than_likes_reward() {
        let product = build_product(
            "Linen Shirt",
            serde_json::json!({"styles": ["casual"], "colors": ["red"]}),
            &[],
            &[],
            &[],
        );
        // Liked style fully matches (+30); disliked color fully matches (-30).
        let profile = build_profile(&["casual"], &[], &[], &[], &["red"], &[]);

        assert_eq!(match_score(&product, &profile, &DEFAULT_VOCABULARY), 0.0);
    }

    #[test]
    fn test_fully_disliked_product_scores_below_neutral_product() {
        let disliked = build_product(
            "Neon Windbreaker",
            serde_json::json!({"styles": ["sporty"]}),
            &[],
            &[],
            &[],
        );
        let neutral = build_product("Plain Socks", serde_json::json!({}), &[], &[], &[]);
        let profile = build_profile(&[], &[], &[], &["sporty"], &[], &[]);

        let disliked_score = match_score(&disliked, &profile, &DEFAULT_VOCABULARY);
        let neutral_score = match_score(&neutral, &profile, &DEFAULT_VOCABULARY);

        // Raw scores would be -40 vs 0; both clamp at the floor but the
        // ordering before clamping is what the recommendation sort sees.
        assert!(disliked_score <= neutral_score);
        assert_eq!(disliked_score, 0.0);
    }

    #[test]
    fn test_score_is_clamped_to_bounds() {
        let loved = build_product(
            "Navy Blazer",
            serde_json::json!({
                "styles": ["classic"],
                "colors": ["navy"],
                "occasions": ["work"],
                "garment_category": "tops",
            }),
            &[],
            &[],
            &["M"],
        );
        let profile = build_profile(
            &["classic"],
            &["navy"],
            &["work"],
            &[],
            &[],
            &[("tops", "M")],
        );

        // 30 + 25 + 20 + 25 = 100; anything beyond clamps.
        assert_eq!(match_score(&loved, &profile, &DEFAULT_VOCABULARY), 100.0);

        let hated = build_product(
            "Neon Crocs",
            serde_json::json!({"styles": ["sporty"], "colors": ["orange"]}),
            &[],
            &[],
            &[],
        );
        let hater = build_profile(&[], &[], &[], &["sporty"], &["orange"], &[]);
        assert_eq!(match_score(&hated, &hater, &DEFAULT_VOCABULARY), 0.0);
    }

    #[test]
    fn test_size_bonus_requires_offered_variant() {
        let product = build_product(
            "Denim Jeans",
            serde_json::json!({"garment_category": "bottoms"}),
            &[],
            &[],
            &["S", "M"],
        );
        let fits = build_profile(&[], &[], &[], &[], &[], &[("bottoms", "M")]);
        let does_not_fit = build_profile(&[], &[], &[], &[], &[], &[("bottoms", "XL")]);

        assert_eq!(match_score(&product, &fits, &DEFAULT_VOCABULARY), 25.0);
        assert_eq!(
            match_score(&product, &does_not_fit, &DEFAULT_VOCABULARY),
            0.0
        );
    }

    #[test]
    fn test_category_inference_precedence() {
        // Metadata beats category names, names beat tags, tags beat title.
        let metadata_wins = build_product(
            "Maxi Dress",
            serde_json::json!({"garment_category": "shoes"}),
            &["dresses"],
            &["bottoms"],
            &[],
        );
        assert_eq!(
            infer_garment_category(&metadata_wins),
            GarmentCategory::Shoes
        );

        let category_name_wins = build_product(
            "Maxi Dress",
            serde_json::json!({}),
            &["bottoms"],
            &["shoes"],
            &[],
        );
        assert_eq!(
            infer_garment_category(&category_name_wins),
            GarmentCategory::Bottoms
        );

        let tag_wins = build_product("Maxi Dress", serde_json::json!({}), &[], &["shoes"], &[]);
        assert_eq!(infer_garment_category(&tag_wins), GarmentCategory::Shoes);

        let title_wins = build_product("Maxi Dress", serde_json::json!({}), &[], &[], &[]);
        assert_eq!(infer_garment_category(&title_wins), GarmentCategory::Dresses);
    }

    #[test]
    fn test_category_inference_defaults_to_tops() {
        let product = build_product("Mystery Item", serde_json::json!({}), &[], &[], &[]);
        assert_eq!(infer_garment_category(&product), GarmentCategory::Tops);
    }
}
