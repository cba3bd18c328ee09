//! Trees sharing one node pool across threads.
//!
//! Each tree is owned by a single thread; only the pool is shared.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use pooled_btree::{BTree, NodePool};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OPS: usize = 20_000;

/// Run random inserts/deletes of values `≡ residue (mod 2)` against a model.
fn churn(tree: &mut BTree<u64>, residue: u64, seed: u64) -> BTreeSet<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = BTreeSet::new();

    for _ in 0..OPS {
        let v = rng.gen_range(0..2_000u64) * 2 + residue;
        if rng.gen_bool(0.6) {
            assert_eq!(tree.insert_or_replace(v).is_none(), model.insert(v));
        } else {
            assert_eq!(tree.delete(&v).is_some(), model.remove(&v));
        }
    }

    model
}

fn contents(tree: &BTree<u64>) -> Vec<u64> {
    let mut out = vec![];
    tree.ascend(|v| {
        out.push(*v);
        true
    });
    out
}

#[test]
fn test_two_trees_one_pool() {
    let pool: Arc<NodePool<u64>> = Arc::new(NodePool::new(64));

    let handles: Vec<_> = (0..2u64)
        .map(|residue| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut tree = BTree::with_pool(2, pool);
                let model = churn(&mut tree, residue, 42 + residue);
                (residue, tree, model)
            })
        })
        .collect();

    for handle in handles {
        let (residue, tree, model) = handle.join().unwrap();

        tree.check_invariants().unwrap();
        let items = contents(&tree);
        assert!(items.windows(2).all(|w| w[0] < w[1]));
        assert!(items.iter().all(|v| v % 2 == residue), "item leaked between trees");
        assert_eq!(items, model.into_iter().collect::<Vec<_>>());
    }

    let stats = pool.stats().snapshot();
    assert!(stats.reused > 0, "shells were never recycled: {}", stats);
    assert!(pool.len() <= pool.capacity());
}

#[test]
fn test_many_trees_small_pool() {
    let pool: Arc<NodePool<u64>> = Arc::new(NodePool::new(4));

    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut tree = BTree::with_pool(3, pool);
                let model = churn(&mut tree, seed % 2, seed);
                tree.check_invariants().unwrap();
                assert_eq!(contents(&tree), model.into_iter().collect::<Vec<_>>());

                tree.clear();
                assert!(tree.is_empty());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = pool.stats().snapshot();
    assert!(stats.discarded > 0);
    assert!(pool.len() <= 4);
}
