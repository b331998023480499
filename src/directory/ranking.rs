use std::collections::BTreeSet;

use super::filter::DirectoryEntry;

/// Top `n` entries by descending rating. The sort is stable so ties keep
/// their fetch order.
pub fn top_rated<T: DirectoryEntry + Clone>(entries: &[T], n: usize) -> Vec<T> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked.truncate(n);
    ranked
}

/// Distinct location keys for the directory location picker, sorted
pub fn location_keys<T: DirectoryEntry>(entries: &[T]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| e.location_key())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::filter::tests::entry;

    #[test]
    fn picks_top_four_in_descending_order() {
        let ratings = [4.8, 4.2, 5.0, 4.9, 4.6, 4.7];
        let list: Vec<_> = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| entry(&format!("i{}", i), "", &[], *r))
            .collect();

        let top: Vec<f64> = top_rated(&list, 4).iter().map(|e| e.score).collect();
        assert_eq!(top, vec![5.0, 4.9, 4.8, 4.7]);
    }

    #[test]
    fn ties_keep_fetch_order() {
        let list = vec![
            entry("first", "", &[], 4.5),
            entry("second", "", &[], 5.0),
            entry("third", "", &[], 4.5),
            entry("fourth", "", &[], 4.5),
        ];
        let top: Vec<String> = top_rated(&list, 3).into_iter().map(|e| e.name).collect();
        assert_eq!(top, vec!["second", "first", "third"]);
    }

    #[test]
    fn fewer_entries_than_n() {
        let list = vec![entry("only", "", &[], 0.0)];
        assert_eq!(top_rated(&list, 4).len(), 1);
        assert!(top_rated::<crate::directory::filter::tests::Entry>(&[], 4).is_empty());
    }

    #[test]
    fn location_keys_are_distinct_and_sorted() {
        let mut a = entry("a", "", &[], 0.0);
        a.location = Some("Denver, CO".into());
        let mut b = entry("b", "", &[], 0.0);
        b.location = Some("Austin, TX".into());
        let mut c = entry("c", "", &[], 0.0);
        c.location = Some("Denver, CO".into());
        let d = entry("d", "", &[], 0.0);

        assert_eq!(location_keys(&[a, b, c, d]), vec!["Austin, TX", "Denver, CO"]);
    }
}
