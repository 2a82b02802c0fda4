use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Upper bound on the number of product names any single bucket holds
pub const BUCKET_CAPACITY: usize = 2;

/// Separator between entries of a raw purchase history
pub const HISTORY_DELIMITER: char = ',';

/// One of the three recommendation tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    HighlyRecommended,
    Recommended,
    NotRecommended,
}

impl Bucket {
    /// Buckets in presentation order
    pub const ALL: [Bucket; 3] = [
        Bucket::HighlyRecommended,
        Bucket::Recommended,
        Bucket::NotRecommended,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::HighlyRecommended => "Highly Recommended",
            Bucket::Recommended => "Recommended",
            Bucket::NotRecommended => "Not Recommended",
        }
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Brand-or-category tokens extracted from a user's purchase history
///
/// A token is tested against both the brand and the category of a product;
/// the history field does not say which one it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTokens(BTreeSet<String>);

impl HistoryTokens {
    /// Splits a raw history string on commas, trimming each entry
    ///
    /// `None` (unknown user) and an empty string both yield no tokens.
    /// Entries that are blank after trimming are dropped.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(|history| {
            history
                .split(HISTORY_DELIMITER)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect()
        })
        .unwrap_or_default()
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for HistoryTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Result of a single classification
///
/// Each bucket keeps catalog order and never exceeds [`BUCKET_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationBuckets {
    highly_recommended: Vec<String>,
    recommended: Vec<String>,
    not_recommended: Vec<String>,
}

impl RecommendationBuckets {
    pub fn get(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::HighlyRecommended => &self.highly_recommended,
            Bucket::Recommended => &self.recommended,
            Bucket::NotRecommended => &self.not_recommended,
        }
    }

    pub fn highly_recommended(&self) -> &[String] {
        &self.highly_recommended
    }

    pub fn recommended(&self) -> &[String] {
        &self.recommended
    }

    pub fn not_recommended(&self) -> &[String] {
        &self.not_recommended
    }

    /// Appends `name` to `bucket` if it still has room
    ///
    /// Returns `false` when the bucket is already at capacity.
    pub fn offer(&mut self, bucket: Bucket, name: &str) -> bool {
        let entries = match bucket {
            Bucket::HighlyRecommended => &mut self.highly_recommended,
            Bucket::Recommended => &mut self.recommended,
            Bucket::NotRecommended => &mut self.not_recommended,
        };

        if entries.len() >= BUCKET_CAPACITY {
            return false;
        }
        entries.push(name.to_string());
        true
    }

    /// True once every bucket has reached capacity
    pub fn is_full(&self) -> bool {
        Bucket::ALL
            .iter()
            .all(|bucket| self.get(*bucket).len() >= BUCKET_CAPACITY)
    }

    /// Total number of classified product names
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|bucket| self.get(*bucket).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_splits() {
        let tokens = HistoryTokens::parse(Some("Apple, Computers ,Dell"));
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("Apple"));
        assert!(tokens.contains("Computers"));
        assert!(tokens.contains("Dell"));
    }

    #[test]
    fn test_parse_none_and_empty_are_equivalent() {
        assert_eq!(HistoryTokens::parse(None), HistoryTokens::parse(Some("")));
        assert!(HistoryTokens::parse(None).is_empty());
    }

    #[test]
    fn test_parse_drops_blank_entries() {
        let tokens = HistoryTokens::parse(Some("Apple,, ,"));
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["Apple"]);
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let tokens = HistoryTokens::parse(Some("apple"));
        assert!(!tokens.contains("Apple"));
        assert!(tokens.contains("apple"));
    }

    #[test]
    fn test_offer_respects_capacity() {
        let mut buckets = RecommendationBuckets::default();
        assert!(buckets.offer(Bucket::Recommended, "a"));
        assert!(buckets.offer(Bucket::Recommended, "b"));
        assert!(!buckets.offer(Bucket::Recommended, "c"));
        assert_eq!(buckets.recommended(), ["a", "b"]);
        assert!(!buckets.is_full());
    }

    #[test]
    fn test_is_full_requires_every_bucket() {
        let mut buckets = RecommendationBuckets::default();
        for bucket in Bucket::ALL {
            buckets.offer(bucket, "x");
            buckets.offer(bucket, "y");
        }
        assert!(buckets.is_full());
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn test_buckets_serialize_with_snake_case_keys() {
        let mut buckets = RecommendationBuckets::default();
        buckets.offer(Bucket::HighlyRecommended, "MacBook Air");

        let json = serde_json::to_value(&buckets).unwrap();
        assert_eq!(json["highly_recommended"][0], "MacBook Air");
        assert_eq!(json["recommended"].as_array().unwrap().len(), 0);
        assert_eq!(json["not_recommended"].as_array().unwrap().len(), 0);
    }
}
