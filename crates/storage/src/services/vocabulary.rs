use std::collections::HashSet;

use lazy_static::lazy_static;

/// The closed style/color/occasion vocabularies used by profile
/// validation and attribute extraction. Held as a value object so the
/// lists can be swapped or tested without touching scoring logic.
#[derive(Debug, Clone)]
pub struct StyleVocabulary {
    styles: HashSet<String>,
    colors: HashSet<String>,
    occasions: HashSet<String>,
}

impl StyleVocabulary {
    pub fn new<S, C, O>(styles: S, colors: C, occasions: O) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        fn normalized<I>(values: I) -> HashSet<String>
        where
            I: IntoIterator,
            I::Item: Into<String>,
        {
            values
                .into_iter()
                .map(|v| v.into().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect()
        }

        Self {
            styles: normalized(styles),
            colors: normalized(colors),
            occasions: normalized(occasions),
        }
    }

    pub fn is_style(&self, value: &str) -> bool {
        self.styles.contains(&value.trim().to_lowercase())
    }

    pub fn is_color(&self, value: &str) -> bool {
        self.colors.contains(&value.trim().to_lowercase())
    }

    pub fn is_occasion(&self, value: &str) -> bool {
        self.occasions.contains(&value.trim().to_lowercase())
    }

    /// Entries of `values` that are not members of `valid`, lowercased.
    /// Used by the DTO validators to report every offender at once.
    pub fn unknown_styles<'a>(&self, values: &'a [String]) -> Vec<&'a str> {
        values
            .iter()
            .map(String::as_str)
            .filter(|v| !self.is_style(v))
            .collect()
    }

    pub fn unknown_colors<'a>(&self, values: &'a [String]) -> Vec<&'a str> {
        values
            .iter()
            .map(String::as_str)
            .filter(|v| !self.is_color(v))
            .collect()
    }

    pub fn unknown_occasions<'a>(&self, values: &'a [String]) -> Vec<&'a str> {
        values
            .iter()
            .map(String::as_str)
            .filter(|v| !self.is_occasion(v))
            .collect()
    }
}

lazy_static! {
    pub static ref DEFAULT_VOCABULARY: StyleVocabulary = StyleVocabulary::new(
        [
            "casual",
            "formal",
            "business",
            "sporty",
            "bohemian",
            "streetwear",
            "vintage",
            "minimalist",
            "classic",
            "preppy",
        ],
        [
            "black", "white", "gray", "navy", "blue", "red", "green", "yellow", "pink", "purple",
            "brown", "beige", "orange",
        ],
        [
            "work", "casual", "party", "wedding", "date", "vacation", "sport", "everyday",
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_insensitive() {
        let vocabulary = &*DEFAULT_VOCABULARY;
        assert!(vocabulary.is_style("Casual"));
        assert!(vocabulary.is_color(" NAVY "));
        assert!(vocabulary.is_occasion("wedding"));
        assert!(!vocabulary.is_style("goth"));
    }

    #[test]
    fn test_unknown_entries_are_reported() {
        let vocabulary = &*DEFAULT_VOCABULARY;
        let values = vec![
            "casual".to_string(),
            "goth".to_string(),
            "cottagecore".to_string(),
        ];

        assert_eq!(
            vocabulary.unknown_styles(&values),
            vec!["goth", "cottagecore"]
        );
    }

    #[test]
    fn test_custom_vocabulary_normalizes_entries() {
        let vocabulary = StyleVocabulary::new(["  Bold "], Vec::<String>::new(), ["Gala"]);
        assert!(vocabulary.is_style("bold"));
        assert!(vocabulary.is_occasion("GALA"));
        assert!(!vocabulary.is_color("bold"));
    }
}
