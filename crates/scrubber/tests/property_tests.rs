//! Property-based tests for the row and column transforms.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p scrubber --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p scrubber --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use scrubber::transform::camel_case;
use scrubber::{ColumnTransform, DataTable, Filter};

// =============================================================================
// Test Strategies
// =============================================================================

/// A nullable cell drawn from a small alphabet so duplicates and nulls occur.
fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        3 => "[a-cA-C ]{0,4}".prop_map(Some),
    ]
}

/// A table with columns `key`, `value`, `other`.
fn table() -> impl Strategy<Value = DataTable> {
    prop::collection::vec(prop::collection::vec(cell(), 3), 0..20).prop_map(|rows| {
        DataTable::new(
            vec!["key".to_string(), "value".to_string(), "other".to_string()],
            rows,
            b',',
        )
    })
}

/// A table whose `key` column has unique values (at most one null).
fn unique_key_table() -> impl Strategy<Value = DataTable> {
    (table(), any::<bool>()).prop_map(|(mut table, with_null)| {
        for (i, row) in table.rows.iter_mut().enumerate() {
            row[0] = if with_null && i == 0 {
                None
            } else {
                Some(format!("k{}", i))
            };
        }
        table
    })
}

fn column(name: &str) -> String {
    name.to_string()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// drop-column removes exactly one column and keeps rows intact.
    #[test]
    fn drop_column_preserves_rows(t in table()) {
        let dropped = ColumnTransform::DropColumn { column: column("value") }
            .apply(t.clone())
            .unwrap();

        prop_assert_eq!(dropped.row_count(), t.row_count());
        prop_assert_eq!(&dropped.headers, &vec!["key".to_string(), "other".to_string()]);
        for (before, after) in t.rows.iter().zip(&dropped.rows) {
            prop_assert_eq!(&before[0], &after[0]);
            prop_assert_eq!(&before[2], &after[1]);
        }
    }

    /// is-na and not-na partition the rows.
    #[test]
    fn is_na_and_not_na_partition(t in table()) {
        let na = ColumnTransform::IsNa { column: column("value") }.apply(t.clone()).unwrap();
        let not_na = ColumnTransform::NotNa { column: column("value") }.apply(t.clone()).unwrap();

        prop_assert_eq!(na.row_count() + not_na.row_count(), t.row_count());
        prop_assert!(na.rows.iter().all(|r| r[1].is_none()));
        prop_assert!(not_na.rows.iter().all(|r| r[1].is_some()));
    }

    /// filter(not-na, C) equals is-na(C) when C is unique, and vice versa.
    #[test]
    fn filter_inverts_null_checks(t in unique_key_table()) {
        let filtered = Filter::new(ColumnTransform::NotNa { column: column("key") })
            .apply(t.clone())
            .unwrap();
        let direct = ColumnTransform::IsNa { column: column("key") }.apply(t.clone()).unwrap();
        prop_assert_eq!(filtered, direct);

        let filtered = Filter::new(ColumnTransform::IsNa { column: column("key") })
            .apply(t.clone())
            .unwrap();
        let direct = ColumnTransform::NotNa { column: column("key") }.apply(t).unwrap();
        prop_assert_eq!(filtered, direct);
    }

    /// filter never adds rows, keeps original order, and leaves no kept key.
    #[test]
    fn filter_is_a_set_difference(t in table()) {
        let inner = ColumnTransform::NotNa { column: column("key") };
        let kept = inner.apply(t.clone()).unwrap();
        let filtered = Filter::new(inner).apply(t.clone()).unwrap();

        let kept_keys: HashSet<_> = kept.rows.iter().map(|r| r[0].clone()).collect();
        prop_assert!(filtered.rows.iter().all(|r| !kept_keys.contains(&r[0])));

        let mut original = t.rows.iter();
        for row in &filtered.rows {
            prop_assert!(original.any(|r| r == row));
        }
    }

    /// replace never touches nulls and leaves no occurrence behind.
    #[test]
    fn replace_removes_all_occurrences(t in table()) {
        let replaced = ColumnTransform::Replace {
            column: column("value"),
            find: "a".to_string(),
            replace: "z".to_string(),
        }
        .apply(t.clone())
        .unwrap();

        for (before, after) in t.rows.iter().zip(&replaced.rows) {
            prop_assert_eq!(before[1].is_none(), after[1].is_none());
            if let Some(v) = &after[1] {
                prop_assert!(!v.contains('a'));
            }
        }
    }

    /// camelcase never produces spaces and lowercases the first character.
    #[test]
    fn camel_case_shape(name in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}") {
        let out = camel_case(&name);
        prop_assert!(!out.contains(' '));
        let first = out.chars().next().unwrap();
        prop_assert!(!first.is_uppercase());
        prop_assert_eq!(out.len(), name.replace(' ', "").len());
    }
}
