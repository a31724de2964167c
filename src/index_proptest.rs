#![cfg(test)]

// Property tests for HashIndex kept inside the crate so they can sit next
// to the unit suites without feature gates.

use crate::{ContractViolation, HashIndex, HashLink, Indexed, WordKey};
use proptest::prelude::*;

struct Node<'a> {
    key: i32,
    link: HashLink<'a, Node<'a>>,
}

impl<'a> Node<'a> {
    fn new(key: i32) -> Self {
        Self {
            key,
            link: HashLink::new(),
        }
    }
}

impl<'a> Indexed<'a> for Node<'a> {
    type Key = i32;
    fn key(&self) -> &i32 {
        &self.key
    }
    fn hash_link(&self) -> &HashLink<'a, Self> {
        &self.link
    }
}

fn addr(r: &Node<'_>) -> usize {
    r as *const Node<'_> as usize
}

// Pool-indexed operations to improve shrinking: indices shrink toward
// earlier records, key range is narrow to force duplicate keys and
// chain collisions.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Remove(usize),
    Find(i32),
    Scan(i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i32>, Vec<Op>)> {
    proptest::collection::vec(0..8i32, 1..=16).prop_flat_map(|keys| {
        let idxs: Vec<usize> = (0..keys.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => idx.clone().prop_map(Op::Insert),
            3 => idx.clone().prop_map(Op::Remove),
            2 => (-2..10i32).prop_map(Op::Find),
            2 => (-2..10i32).prop_map(Op::Scan),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (keys.clone(), ops))
    })
}

// Property: state-machine equivalence against a flat membership model.
// Invariants exercised across random operation sequences:
// - len() equals the number of currently linked records after every op.
// - find() hit/miss parity with the model; a hit is key-equal and
//   identity-equal to some linked record.
// - find()/find_next() scans enumerate exactly the linked records with
//   the probed key, each once, in any order.
// - remove() succeeds iff the record is linked; otherwise it reports
//   RecordNotIndexed and changes nothing.
// - iter() yields every linked record exactly once.
// - clear() resets to the construction bucket count.
// - the post-insert load factor always sits below the growth ratio.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((keys, ops) in arb_scenario()) {
        let pool: Vec<Node> = keys.iter().map(|&k| Node::new(k)).collect();
        let mut idx = HashIndex::new(2, WordKey);
        let mut linked = vec![false; pool.len()];

        for op in &ops {
            match *op {
                Op::Insert(i) => {
                    if !linked[i] {
                        idx.insert(&pool[i]);
                        linked[i] = true;
                    }
                }
                Op::Remove(i) => {
                    let res = idx.remove(&pool[i]);
                    if linked[i] {
                        prop_assert_eq!(res, Ok(()));
                        linked[i] = false;
                    } else {
                        prop_assert_eq!(res, Err(ContractViolation::RecordNotIndexed));
                    }
                }
                Op::Find(k) => {
                    let expect = pool
                        .iter()
                        .zip(&linked)
                        .any(|(n, &l)| l && n.key == k);
                    match idx.find(&k) {
                        Some(r) => {
                            prop_assert!(expect, "found a key the model lacks");
                            prop_assert_eq!(*r.key(), k);
                            prop_assert!(
                                pool.iter()
                                    .zip(&linked)
                                    .any(|(n, &l)| l && std::ptr::eq(n, r)),
                                "hit must be a linked record"
                            );
                        }
                        None => prop_assert!(!expect, "missed a key the model has"),
                    }
                }
                Op::Scan(k) => {
                    let mut seen = Vec::new();
                    let mut cur = idx.find(&k);
                    while let Some(r) = cur {
                        seen.push(addr(r));
                        cur = idx.find_next(r);
                    }
                    let mut expect: Vec<usize> = pool
                        .iter()
                        .zip(&linked)
                        .filter(|&(n, &l)| l && n.key == k)
                        .map(|(n, _)| addr(n))
                        .collect();
                    seen.sort_unstable();
                    expect.sort_unstable();
                    prop_assert_eq!(seen, expect);
                }
                Op::Iterate => {
                    let mut seen: Vec<usize> = idx.iter().map(|r| addr(r)).collect();
                    let mut expect: Vec<usize> = pool
                        .iter()
                        .zip(&linked)
                        .filter(|&(_, &l)| l)
                        .map(|(n, _)| addr(n))
                        .collect();
                    seen.sort_unstable();
                    expect.sort_unstable();
                    prop_assert_eq!(seen, expect);
                }
                Op::Clear => {
                    idx.clear();
                    for l in linked.iter_mut() {
                        *l = false;
                    }
                    prop_assert_eq!(idx.bucket_count(), 2);
                }
            }

            let live = linked.iter().filter(|&&l| l).count();
            prop_assert_eq!(idx.len(), live);
            prop_assert!(
                idx.len() / idx.bucket_count() < idx.growth_ratio(),
                "load factor must stay below the growth ratio between ops"
            );
        }
    }
}

// Property: growth preserves membership and identity. The bucket count is
// always the initial width times a power of four, and every inserted
// record stays reachable by key and identity no matter how many rebuilds
// ran.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_membership(keys in proptest::collection::vec(any::<i32>(), 1..200)) {
        let pool: Vec<Node> = keys.iter().map(|&k| Node::new(k)).collect();
        let mut idx = HashIndex::new(2, WordKey);
        for n in &pool {
            idx.insert(n);
        }

        prop_assert_eq!(idx.len(), pool.len());
        let mut width = idx.bucket_count();
        while width > 2 {
            prop_assert_eq!(width % 4, 0, "width must be 2 * 4^k");
            width /= 4;
        }
        prop_assert_eq!(width, 2);

        for n in &pool {
            let mut cur = idx.find(&n.key);
            let mut hit = false;
            while let Some(r) = cur {
                if std::ptr::eq(r, n) {
                    hit = true;
                    break;
                }
                cur = idx.find_next(r);
            }
            prop_assert!(hit, "record lost across rebuilds");
        }
    }
}
