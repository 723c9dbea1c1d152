use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use pairtree::{BTree, FreeList, Natural};
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn value_strategy() -> impl Strategy<Value = u32> {
    0u32..3_000
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum CloneOp {
    /// Insert into the tree at index `.0 % trees.len()`.
    Insert(usize, u32),
    Delete(usize, u32),
    DeleteMin(usize),
    /// Clone the tree at the index and keep both.
    Fork(usize),
}

fn clone_op_strategy() -> impl Strategy<Value = CloneOp> {
    prop_oneof![
        6 => (any::<usize>(), value_strategy()).prop_map(|(t, v)| CloneOp::Insert(t, v)),
        4 => (any::<usize>(), value_strategy()).prop_map(|(t, v)| CloneOp::Delete(t, v)),
        1 => any::<usize>().prop_map(CloneOp::DeleteMin),
        1 => any::<usize>().prop_map(CloneOp::Fork),
    ]
}

// ─── Copy-on-write isolation ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// A family of trees forked from each other never observes the others' writes.
    #[test]
    fn forked_trees_stay_isolated(
        degree in 2usize..6,
        ops in proptest::collection::vec(clone_op_strategy(), TEST_SIZE),
    ) {
        let first: BTree<u32> = BTree::builder().degree(degree).free_list_capacity(16).build().expect("valid degree");
        let mut trees = vec![(first, BTreeSet::new())];

        for op in ops {
            match op {
                CloneOp::Insert(t, v) => {
                    let index = t % trees.len();
                    let (tree, model) = &mut trees[index];
                    prop_assert_eq!(tree.replace_or_insert(v).is_none(), model.insert(v));
                }
                CloneOp::Delete(t, v) => {
                    let index = t % trees.len();
                    let (tree, model) = &mut trees[index];
                    prop_assert_eq!(tree.delete(&v), model.take(&v));
                }
                CloneOp::DeleteMin(t) => {
                    let index = t % trees.len();
                    let (tree, model) = &mut trees[index];
                    prop_assert_eq!(tree.delete_min(), model.pop_first());
                }
                CloneOp::Fork(t) => {
                    let (tree, model) = &trees[t % trees.len()];
                    let fork = (tree.clone(), model.clone());
                    trees.push(fork);
                }
            }
        }

        for (tree, model) in &trees {
            prop_assert_eq!(tree.len(), model.len());
            prop_assert!(tree.iter().eq(model.iter()));
        }
    }
}

#[test]
fn clone_is_a_snapshot() {
    let mut tree: BTree<u32> = (0..10_000).collect();
    let snapshot = tree.clone();

    for i in (0..10_000).filter(|i| i % 7 == 0) {
        tree.delete(&i);
    }
    tree.extend(10_000..12_000);

    assert_eq!(snapshot.len(), 10_000);
    assert!(snapshot.iter().copied().eq(0..10_000));
    assert!(tree.iter().copied().eq((0..12_000).filter(|i| i >= &10_000 || i % 7 != 0)));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[test]
fn clones_mutated_on_different_threads() {
    let base: BTree<u32> = (0..20_000).collect();

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let mut tree = base.clone();
            thread::spawn(move || {
                for i in (0..20_000).filter(|i| i % 4 == worker) {
                    assert_eq!(tree.delete(&i), Some(i));
                }
                tree.extend((0..1_000).map(|i| 100_000 * (worker + 1) + i));
                tree
            })
        })
        .collect();

    for (worker, handle) in (0..4u32).zip(handles) {
        let tree = handle.join().expect("worker panicked");
        assert_eq!(tree.len(), 15_000 + 1_000);
        assert!(tree.iter().all(|&i| i >= 100_000 || i % 4 != worker));
    }
    assert!(base.iter().copied().eq(0..20_000));
}

#[test]
fn trees_sharing_a_free_list_on_different_threads() {
    let free_list = Arc::new(FreeList::new(64));

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let free_list = Arc::clone(&free_list);
            thread::spawn(move || {
                let mut tree = BTree::with_free_list(Natural, free_list);
                for round in 0..20 {
                    tree.extend((0..500).map(|i| i * 4 + worker));
                    while tree.len() > round {
                        tree.delete_max();
                    }
                }
                tree.iter().copied().collect::<Vec<u32>>()
            })
        })
        .collect();

    for (worker, handle) in (0..4u32).zip(handles) {
        let items = handle.join().expect("worker panicked");
        let expected: Vec<u32> = (0..19).map(|i| i * 4 + worker).collect();
        assert_eq!(items, expected);
    }
    assert!(free_list.len() <= free_list.capacity());
}
