use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::InstructorListing;

/// The attributes the directory predicates look at
pub trait DirectoryEntry {
    fn name(&self) -> &str;
    fn specialty(&self) -> &str;
    fn categories(&self) -> &[String];
    /// Average rating, 0 when unrated
    fn score(&self) -> f64;
    fn location_key(&self) -> Option<&str>;
}

impl DirectoryEntry for InstructorListing {
    fn name(&self) -> &str {
        self.profile.name.as_deref().unwrap_or("")
    }

    fn specialty(&self) -> &str {
        self.profile.specialty.as_deref().unwrap_or("")
    }

    fn categories(&self) -> &[String] {
        &self.profile.categories
    }

    fn score(&self) -> f64 {
        self.average_rating.unwrap_or(0.0)
    }

    fn location_key(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Filter state of the directory page.
///
/// Predicates are ANDed. An empty category set, a blank search string, a
/// zero minimum rating and a missing location each impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryFilter {
    /// OR-matched, exact
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub min_rating: f64,
    /// Case-insensitive substring over name, specialty and categories
    #[serde(default)]
    pub search: String,
    /// Exact "city, state" match
    #[serde(default)]
    pub location: Option<String>,
}

impl DirectoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.categories.is_empty()
            && self.min_rating <= 0.0
            && self.search.trim().is_empty()
            && self.location.as_deref().map_or(true, |l| l.trim().is_empty())
    }

    pub fn matches<T: DirectoryEntry + ?Sized>(&self, entry: &T) -> bool {
        self.matches_category(entry)
            && entry.score() >= self.min_rating
            && self.matches_search(entry)
            && self.matches_location(entry)
    }

    /// Order-preserving subsequence of `entries` that satisfies every predicate
    pub fn apply<'a, T: DirectoryEntry>(&self, entries: &'a [T]) -> Vec<&'a T> {
        entries.iter().filter(|e| self.matches(*e)).collect()
    }

    pub fn apply_owned<T: DirectoryEntry>(&self, entries: Vec<T>) -> Vec<T> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }

    fn matches_category<T: DirectoryEntry + ?Sized>(&self, entry: &T) -> bool {
        self.categories.is_empty() || entry.categories().iter().any(|c| self.categories.contains(c))
    }

    fn matches_search<T: DirectoryEntry + ?Sized>(&self, entry: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);
        hit(entry.name()) || hit(entry.specialty()) || entry.categories().iter().any(|c| hit(c))
    }

    fn matches_location<T: DirectoryEntry + ?Sized>(&self, entry: &T) -> bool {
        match self.location.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => entry.location_key() == Some(wanted),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Entry {
        pub name: String,
        pub specialty: String,
        pub categories: Vec<String>,
        pub score: f64,
        pub location: Option<String>,
    }

    impl DirectoryEntry for Entry {
        fn name(&self) -> &str {
            &self.name
        }
        fn specialty(&self) -> &str {
            &self.specialty
        }
        fn categories(&self) -> &[String] {
            &self.categories
        }
        fn score(&self) -> f64 {
            self.score
        }
        fn location_key(&self) -> Option<&str> {
            self.location.as_deref()
        }
    }

    pub(crate) fn entry(name: &str, specialty: &str, categories: &[&str], score: f64) -> Entry {
        Entry {
            name: name.into(),
            specialty: specialty.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            score,
            location: None,
        }
    }

    fn sample() -> Vec<Entry> {
        let mut list = vec![
            entry("Olivia Chen", "Yoga Teacher", &["Yoga"], 4.8),
            entry("Ben Carter", "HIIT Specialist", &["HIIT"], 4.2),
            entry("Sofia Rodriguez", "Pilates & Dance", &["Pilates", "Dance"], 5.0),
            entry("Marcus Thorne", "Strength Coach", &["Strength"], 4.9),
            entry("Priya Nair", "Flow Coach", &["Yoga", "Pilates"], 0.0),
        ];
        list[0].location = Some("Austin, TX".into());
        list[3].location = Some("Denver, CO".into());
        list
    }

    fn names(result: &[&Entry]) -> Vec<String> {
        result.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let list = sample();
        let filter = DirectoryFilter::new();
        assert!(filter.is_unconstrained());
        assert_eq!(filter.apply(&list).len(), list.len());
        assert_eq!(names(&filter.apply(&list))[0], "Olivia Chen");
    }

    #[test]
    fn categories_are_or_matched() {
        let list = sample();
        let filter = DirectoryFilter::new().category("Dance").category("Strength");
        assert_eq!(names(&filter.apply(&list)), vec!["Sofia Rodriguez", "Marcus Thorne"]);
    }

    #[test]
    fn category_filter_has_no_false_positives_or_negatives() {
        let list = sample();
        let filter = DirectoryFilter::new().category("Yoga").category("Pilates");
        let result = filter.apply(&list);
        for e in &result {
            assert!(e.categories.iter().any(|c| filter.categories.contains(c)));
        }
        let expected = list
            .iter()
            .filter(|e| e.categories.iter().any(|c| filter.categories.contains(c)))
            .count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn min_rating_treats_unrated_as_zero() {
        let list = sample();
        let result = DirectoryFilter::new().min_rating(4.8).apply(&list);
        assert_eq!(names(&result), vec!["Olivia Chen", "Sofia Rodriguez", "Marcus Thorne"]);
        assert_eq!(DirectoryFilter::new().min_rating(0.0).apply(&list).len(), list.len());
    }

    #[test]
    fn search_matches_category_case_insensitively() {
        let mut list = sample();
        list.push(entry("Alex Kim", "Coach", &["Yoga"], 3.0));
        let result = DirectoryFilter::new().search("yoga").apply(&list);
        assert!(names(&result).contains(&"Alex Kim".to_string()));
    }

    #[test]
    fn search_checks_name_and_specialty() {
        let list = sample();
        assert_eq!(names(&DirectoryFilter::new().search("CARTER").apply(&list)), vec!["Ben Carter"]);
        assert_eq!(names(&DirectoryFilter::new().search("coach").apply(&list)), vec!["Marcus Thorne", "Priya Nair"]);
        assert_eq!(DirectoryFilter::new().search("   ").apply(&list).len(), list.len());
    }

    #[test]
    fn predicates_are_anded() {
        let list = sample();
        let filter = DirectoryFilter::new().category("Yoga").min_rating(1.0).search("olivia");
        assert_eq!(names(&filter.apply(&list)), vec!["Olivia Chen"]);
        let filter = DirectoryFilter::new().category("HIIT").search("olivia");
        assert!(filter.apply(&list).is_empty());
    }

    #[test]
    fn location_is_exact_and_unknown_location_is_empty() {
        let list = sample();
        assert_eq!(names(&DirectoryFilter::new().location("Denver, CO").apply(&list)), vec!["Marcus Thorne"]);
        assert!(DirectoryFilter::new().location("Denver").apply(&list).is_empty());
        assert!(DirectoryFilter::new().location("Paris, FR").apply(&list).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let list = sample();
        let filter = DirectoryFilter::new().category("Pilates").min_rating(0.0);
        let once: Vec<Entry> = filter.apply(&list).into_iter().cloned().collect();
        let twice: Vec<Entry> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(filter.apply(&list), filter.apply(&list));
    }

    #[test]
    fn owned_variant_agrees_with_borrowed() {
        let list = sample();
        let filter = DirectoryFilter::new().search("o");
        let borrowed: Vec<Entry> = filter.apply(&list).into_iter().cloned().collect();
        assert_eq!(filter.apply_owned(list), borrowed);
    }
}
