use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Anything exposing an integer star rating
pub trait Rated {
    fn rating(&self) -> i32;
}

impl Rated for i32 {
    fn rating(&self) -> i32 {
        *self
    }
}

impl<T: Rated> Rated for &T {
    fn rating(&self) -> i32 {
        (*self).rating()
    }
}

/// Mean of the ratings rounded half-up to one decimal, None when empty.
///
/// The rounding is done on the integer sum so the result does not depend on
/// the order of `items` and identical ratings come back exactly.
pub fn average_rating<T: Rated>(items: &[T]) -> Option<f64> {
    mean_tenths(items.iter().map(Rated::rating)).map(|(tenths, _)| tenths as f64 / 10.0)
}

fn mean_tenths(ratings: impl Iterator<Item = i32>) -> Option<(i64, usize)> {
    let (sum, count) = ratings.fold((0i64, 0usize), |(sum, count), r| (sum + r as i64, count + 1));
    if count == 0 {
        return None;
    }
    let n = count as i64;
    // floor(10 * sum / n + 1/2)
    Some(((20 * sum + n).div_euclid(2 * n), count))
}

/// Derived, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        match mean_tenths(ratings.into_iter()) {
            Some((tenths, count)) => Self { average: Some(tenths as f64 / 10.0), count },
            None => Self::default(),
        }
    }

    /// Value used for sorting and minimum-rating checks; unrated counts as 0
    pub fn score(&self) -> f64 {
        self.average.unwrap_or(0.0)
    }
}

/// Group `(instructor_id, rating)` pairs into one summary per instructor
pub fn summarize_by_instructor(ratings: &[(Uuid, i32)]) -> HashMap<Uuid, RatingSummary> {
    let mut grouped: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for (instructor_id, rating) in ratings {
        grouped.entry(*instructor_id).or_default().push(*rating);
    }
    grouped
        .into_iter()
        .map(|(id, ratings)| (id, RatingSummary::from_ratings(ratings)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_average() {
        let none: [i32; 0] = [];
        assert_eq!(average_rating(&none), None);
        assert_eq!(RatingSummary::from_ratings(none), RatingSummary { average: None, count: 0 });
        assert_eq!(RatingSummary::default().score(), 0.0);
    }

    #[test]
    fn five_and_four_average_to_four_point_five() {
        assert_eq!(average_rating(&[5, 4]), Some(4.5));
    }

    #[test]
    fn single_review_is_exact() {
        assert_eq!(average_rating(&[3]), Some(3.0));
    }

    #[test]
    fn identical_ratings_do_not_drift() {
        let ratings = vec![4; 10_000];
        assert_eq!(average_rating(&ratings), Some(4.0));
    }

    #[test]
    fn rounds_half_up_to_one_decimal() {
        // 14 / 3 = 4.666..
        assert_eq!(average_rating(&[5, 5, 4]), Some(4.7));
        // 9 / 4 = 2.25
        assert_eq!(average_rating(&[1, 2, 3, 3]), Some(2.3));
        // 13 / 3 = 4.333..
        assert_eq!(average_rating(&[4, 4, 5]), Some(4.3));
    }

    #[test]
    fn order_does_not_matter() {
        let a = [5, 1, 3, 4, 4, 2, 5];
        let mut b = a;
        b.reverse();
        assert_eq!(average_rating(&a), average_rating(&b));
    }

    #[test]
    fn large_counts_do_not_overflow() {
        let ratings = vec![5; 1_000_000];
        let summary = RatingSummary::from_ratings(ratings);
        assert_eq!(summary.average, Some(5.0));
        assert_eq!(summary.count, 1_000_000);
    }

    #[test]
    fn groups_by_instructor() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let summaries = summarize_by_instructor(&[(a, 5), (b, 2), (a, 4)]);
        assert_eq!(summaries[&a], RatingSummary { average: Some(4.5), count: 2 });
        assert_eq!(summaries[&b], RatingSummary { average: Some(2.0), count: 1 });
        assert!(!summaries.contains_key(&Uuid::new_v4()));
    }
}
