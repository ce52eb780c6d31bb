//! Folding of flat joined rows into parent records with child lists.
//!
//! A `LEFT JOIN` between a parent table and a child table yields one row per
//! child, with the parent columns repeated. `group_rows` collapses those rows
//! back into one entry per parent, keeping parents in the order they were
//! first seen and children in row order.

use std::collections::HashMap;
use std::hash::Hash;

/// Group `rows` by the key returned from `key`.
///
/// `parent` builds the parent value from the first row seen for a key, and
/// `child` extracts an optional child value from every row (rows from an
/// outer join with no child return `None`).
pub fn group_rows<R, K, P, C>(
    rows: impl IntoIterator<Item = R>,
    key: impl Fn(&R) -> K,
    parent: impl Fn(&R) -> P,
    child: impl Fn(&R) -> Option<C>,
) -> Vec<(P, Vec<C>)>
where
    K: Eq + Hash,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut grouped: Vec<(P, Vec<C>)> = Vec::new();

    for row in rows {
        let index = *positions.entry(key(&row)).or_insert_with(|| {
            grouped.push((parent(&row), Vec::new()));
            grouped.len() - 1
        });

        if let Some(value) = child(&row) {
            grouped[index].1.push(value);
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let rows = vec![
            (2, "Trattoria", Some("Pasta")),
            (1, "Bistro", Some("Soup")),
            (2, "Trattoria", Some("Pizza")),
            (1, "Bistro", None),
        ];

        let grouped = group_rows(rows, |r| r.0, |r| r.1.to_string(), |r| r.2.map(str::to_string));

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "Trattoria");
        assert_eq!(grouped[0].1, vec!["Pasta".to_string(), "Pizza".to_string()]);
        assert_eq!(grouped[1].0, "Bistro");
        assert_eq!(grouped[1].1, vec!["Soup".to_string()]);
    }

    #[test]
    fn test_parent_without_children() {
        let rows = vec![(7, None::<i32>)];
        let grouped = group_rows(rows, |r| r.0, |r| r.0, |r| r.1);
        assert_eq!(grouped, vec![(7, vec![])]);
    }
}
