use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Walks the whole tree and checks its structural invariants.
fn validate_tree<V>(index: &PrefixIndex<V>) {
    let root = &index.nodes[index.root];
    assert!(root.label.is_empty(), "root must have an empty label");
    assert!(root.value.is_none(), "root must not carry a value");
    assert!(root.parent.is_none(), "root must not have a parent");

    let mut reachable = 0usize;
    let mut values = 0usize;
    let mut stack = vec![index.root];
    while let Some(id) = stack.pop() {
        reachable += 1;
        let node = &index.nodes[id];
        if node.value.is_some() {
            values += 1;
        }

        if id != index.root {
            assert!(!node.label.is_empty(), "only the root has an empty label");
            assert!(!node.is_dead(), "dead node {id} must have been pruned");
        }

        for (i, &a) in node.children.iter().enumerate() {
            let child = &index.nodes[a];
            assert_eq!(child.parent, Some(id), "parent link of {a} is broken");

            for &b in &node.children[i + 1..] {
                let common = common_prefix_len(&child.label, &index.nodes[b].label);
                assert_eq!(
                    common, 0,
                    "siblings {:?} and {:?} share a prefix",
                    child.label, index.nodes[b].label
                );
            }
        }

        stack.extend(node.children.iter().copied());
    }

    assert_eq!(reachable, index.nodes.len(), "unreachable nodes leaked");
    assert_eq!(values, index.len(), "len must track live values");
}

#[derive(Debug, Clone)]
enum Op {
    Insert(String, u32),
    Delete(String),
}

fn key() -> impl Strategy<Value = String> {
    "[ab/:]{1,6}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => key().prop_map(Op::Delete),
    ]
}

fn apply(ops: &[Op]) -> (PrefixIndex<u32>, BTreeMap<String, u32>) {
    let mut index = PrefixIndex::new();
    let mut model = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                assert_eq!(index.insert(k, *v), model.insert(k.clone(), *v));
            }
            Op::Delete(k) => {
                assert_eq!(index.remove(k), model.remove(k));
            }
        }
        validate_tree(&index);
    }
    (index, model)
}

fn sorted<'a>(values: impl IntoIterator<Item = &'a u32>) -> Vec<u32> {
    let mut values = values.into_iter().copied().collect::<Vec<_>>();
    values.sort_unstable();
    values
}

proptest! {
    #[test]
    fn search_all_returns_live_values(ops in prop::collection::vec(op(), 0..64)) {
        let (index, model) = apply(&ops);
        prop_assert_eq!(sorted(index.search("")), sorted(model.values()));
        prop_assert_eq!(index.len(), model.len());
    }

    #[test]
    fn entries_match_model_by_prefix(
        ops in prop::collection::vec(op(), 0..64),
        prefix in "[ab/:]{0,3}",
    ) {
        let (index, model) = apply(&ops);
        let mut found = index
            .entries(&prefix)
            .into_iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<Vec<_>>();
        found.sort();
        let expected = model
            .iter()
            .filter(|(k, _)| k.starts_with(prefix.as_str()))
            .map(|(k, v)| (k.clone(), *v))
            .collect::<Vec<_>>();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn narrowing_prefix_narrows_results(
        ops in prop::collection::vec(op(), 0..64),
        prefix in "[ab/:]{0,3}",
        suffix in "[ab/:]{0,3}",
    ) {
        let (index, _) = apply(&ops);
        let wide = index.entries(&prefix);
        let narrow = index.entries(&format!("{prefix}{suffix}"));
        for (key, _) in narrow {
            prop_assert!(wide.iter().any(|(k, _)| *k == key));
        }
    }

    #[test]
    fn inserted_key_is_searchable(
        ops in prop::collection::vec(op(), 0..32),
        k in key(),
        v in any::<u32>(),
    ) {
        let (mut index, _) = apply(&ops);
        index.insert(&k, v);
        validate_tree(&index);
        prop_assert!(index.search(&k).contains(&&v));
        prop_assert_eq!(index.get(&k), Some(&v));
    }

    #[test]
    fn delete_is_isolated(
        keys in prop::collection::btree_set(key(), 1..24),
        victim in any::<prop::sample::Index>(),
    ) {
        let keys = keys.into_iter().collect::<Vec<_>>();
        let victim = victim.get(&keys).clone();

        // every key carries an equal payload
        let mut index = PrefixIndex::new();
        for k in &keys {
            index.insert(k, 7u32);
        }

        index.delete(&victim);
        validate_tree(&index);
        prop_assert!(index.get(&victim).is_none());
        for k in keys.iter().filter(|k| **k != victim) {
            prop_assert_eq!(index.get(k), Some(&7));
            prop_assert!(!index.search(k).is_empty());
        }
        prop_assert_eq!(index.len(), keys.len() - 1);
    }

    #[test]
    fn insertion_order_does_not_change_contents(
        keys in prop::collection::btree_set(key(), 0..24),
        seed in any::<u64>(),
    ) {
        let forward = keys.iter().cloned().collect::<Vec<_>>();
        let mut shuffled = forward.clone();
        // a cheap deterministic permutation
        let n = shuffled.len();
        for i in (1..n).rev() {
            let j = ((seed.rotate_left(i as u32) ^ i as u64) % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let build = |keys: &[String]| {
            let mut index = PrefixIndex::new();
            for (i, k) in keys.iter().enumerate() {
                index.insert(k, forward.iter().position(|f| f == k).unwrap_or(i) as u32);
            }
            validate_tree(&index);
            index
        };

        let a = build(&forward);
        let b = build(&shuffled);
        prop_assert_eq!(sorted(a.search("")), sorted(b.search("")));
    }

    #[test]
    fn search_yields_values_in_preorder(
        keys in prop::collection::vec(key(), 0..32),
        prefix in "[ab/:]{0,3}",
    ) {
        // distinct payloads so that every value names its key
        let mut index = PrefixIndex::new();
        let mut owner = BTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            index.insert(k, i as u32);
            owner.insert(i as u32, k.clone());
        }
        validate_tree(&index);

        let searched = index
            .search(&prefix)
            .into_iter()
            .map(|v| owner[v].clone())
            .collect::<Vec<_>>();
        let listed = index
            .entries(&prefix)
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect::<Vec<_>>();
        prop_assert_eq!(&searched, &listed);

        // a key precedes every extension of it
        for (i, earlier) in searched.iter().enumerate() {
            for later in &searched[i + 1..] {
                prop_assert!(
                    !earlier.starts_with(later.as_str()),
                    "{:?} listed after its extension {:?}",
                    later,
                    earlier
                );
            }
        }
    }
}
