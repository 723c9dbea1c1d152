use std::collections::BTreeSet;

use pairtree::BTree;
use proptest::prelude::*;

/// The number of values to insert in each proptest case.
const TEST_SIZE: usize = 2_000;

fn value_strategy() -> impl Strategy<Value = i64> {
    -5_000i64..5_000i64
}

fn build(degree: usize, values: &[i64]) -> BTree<i64> {
    let mut tree = BTree::builder().degree(degree).build().expect("valid degree");
    tree.extend(values.iter().copied());
    tree
}

// ─── Cursor walks ────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A cursor walked from `first` visits exactly what `ascend` visits.
    #[test]
    fn forward_walk_matches_ascend(
        degree in 2usize..8,
        values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE),
    ) {
        let tree = build(degree, &values);
        let mut expected = Vec::new();
        tree.ascend(|&v| {
            expected.push(v);
            true
        });

        let mut cursor = tree.cursor();
        let walked: Vec<i64> = std::iter::successors(cursor.first().copied(), |_| cursor.next().copied()).collect();
        prop_assert_eq!(walked, expected);
    }

    /// A cursor walked from `last` visits exactly what `descend` visits.
    #[test]
    fn backward_walk_matches_descend(
        degree in 2usize..8,
        values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE),
    ) {
        let tree = build(degree, &values);
        let mut expected = Vec::new();
        tree.descend(|&v| {
            expected.push(v);
            true
        });

        let mut cursor = tree.cursor();
        let walked: Vec<i64> = std::iter::successors(cursor.last().copied(), |_| cursor.prev().copied()).collect();
        prop_assert_eq!(walked, expected);
    }

    /// `seek` lands on the pivot or its successor, and the walk continues from there.
    #[test]
    fn seek_matches_btreeset_range(
        degree in 2usize..8,
        values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE),
        pivots in proptest::collection::vec(value_strategy(), 1..50),
    ) {
        let tree = build(degree, &values);
        let model: BTreeSet<i64> = values.into_iter().collect();
        let mut cursor = tree.cursor();

        for pivot in pivots {
            let mut forward = model.range(pivot..);
            prop_assert_eq!(cursor.seek(&pivot), forward.next(), "seek({})", pivot);
            for _ in 0..5 {
                prop_assert_eq!(cursor.next(), forward.next());
            }

            let mut backward = model.range(..pivot).rev();
            if cursor.seek(&pivot).is_some() {
                for _ in 0..5 {
                    prop_assert_eq!(cursor.prev(), backward.next());
                }
            }
        }
    }

    /// Random interleavings of `next` and `prev` track a position in a sorted Vec.
    #[test]
    fn random_walk_matches_vec(
        degree in 2usize..6,
        values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE),
        steps in proptest::collection::vec(any::<bool>(), 1..500),
    ) {
        let tree = build(degree, &values);
        let sorted: Vec<i64> = values.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let mut cursor = tree.cursor();

        let mut index = sorted.len() / 2;
        prop_assert_eq!(cursor.seek(&sorted[index]), Some(&sorted[index]));
        for forward in steps {
            let moved = if forward { cursor.next() } else { cursor.prev() };
            let target = if forward { index.checked_add(1) } else { index.checked_sub(1) };
            let expected = target.filter(|&i| i < sorted.len());
            prop_assert_eq!(moved, expected.map(|i| &sorted[i]));
            match expected {
                Some(i) => index = i,
                // Falling off an end unpositions the cursor; start again from the middle.
                None => {
                    index = sorted.len() / 2;
                    prop_assert!(!cursor.is_positioned());
                    cursor.seek(&sorted[index]);
                }
            }
        }
    }
}

#[test]
fn cursor_over_snapshot_is_unaffected_by_writes() {
    let mut tree: BTree<i64> = (0..1_000).collect();
    let snapshot = tree.clone();
    let mut cursor = snapshot.cursor();
    assert_eq!(cursor.seek(&500), Some(&500));

    for i in 0..1_000 {
        tree.delete(&i);
    }
    assert!(tree.is_empty());

    let rest: Vec<i64> = std::iter::from_fn(|| cursor.next().copied()).collect();
    assert_eq!(rest, (501..1_000).collect::<Vec<_>>());
}
