//! Property tests driving random operation sequences against a shadow
//! multiset, with full structural verification after every step.

use burrow_collections::{Arena, Index, LinkedHeap, Side, Slot, Storage, TreeLinks, TreeNode};

use proptest::prelude::*;

use std::cmp::Ordering;
use std::collections::VecDeque;

#[derive(Debug)]
struct Node {
    key: i8,
    links: TreeLinks<u32>,
}

impl Node {
    fn new(key: i8) -> Self {
        Self {
            key,
            links: TreeLinks::new(),
        }
    }
}

impl TreeNode<u32> for Node {
    fn links(&self) -> &TreeLinks<u32> {
        &self.links
    }
    fn links_mut(&mut self) -> &mut TreeLinks<u32> {
        &mut self.links
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Node {}

#[derive(Debug, Clone)]
enum Op {
    Insert(i8),
    PopMin,
    RemoveNth(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<i8>().prop_map(Op::Insert),
        1 => Just(Op::PopMin),
        1 => any::<usize>().prop_map(Op::RemoveNth),
    ]
}

/// Walks the tree level by level and checks every structural invariant:
/// completeness, heap order, slot back-references, and last tracking.
fn check_structure(heap: &LinkedHeap<u32>, arena: &Arena<Node>) {
    let Some(root) = heap.peek() else {
        assert_eq!(heap.len(), 0);
        assert!(heap.last().is_none());
        return;
    };

    assert_eq!(
        arena.get(root).unwrap().links().slot(),
        Slot::Root,
        "root slot descriptor"
    );

    let mut seen = 0usize;
    let mut queue: VecDeque<(u32, usize)> = VecDeque::new();
    queue.push_back((root, 1));

    while let Some((idx, pos)) = queue.pop_front() {
        seen += 1;
        assert!(pos <= heap.len(), "node beyond final position");
        if pos == heap.len() {
            assert_eq!(heap.last(), Some(idx), "last not at final position");
        }

        let node = arena.get(idx).unwrap();
        for (bit, child) in [
            node.links().child(Side::Left),
            node.links().child(Side::Right),
        ]
        .into_iter()
        .enumerate()
        {
            if child.is_none() {
                continue;
            }
            let child_node = arena.get(child).unwrap();
            assert!(
                node.key <= child_node.key,
                "heap order violated: parent {} above child {}",
                node.key,
                child_node.key
            );
            match child_node.links().slot() {
                Slot::Child { parent, side } => {
                    assert_eq!(parent, idx, "child's parent back-reference");
                    assert_eq!(side.index(), bit, "child's side descriptor");
                }
                other => panic!("linked child with slot {other:?}"),
            }
            queue.push_back((child, pos * 2 + bit));
        }
    }

    assert_eq!(seen, heap.len(), "reachable node count");
}

proptest! {
    #[test]
    fn random_ops_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let mut arena: Arena<Node> = Arena::with_capacity(ops.len());
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();
        let mut live: Vec<u32> = Vec::new();
        let mut shadow: Vec<i8> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let idx = arena.try_insert(Node::new(key)).unwrap();
                    heap.insert(&mut arena, idx);
                    live.push(idx);
                    shadow.push(key);
                }
                Op::PopMin => {
                    let popped = heap.pop(&mut arena);
                    match popped {
                        Some(idx) => {
                            let key = arena.get(idx).unwrap().key;
                            let min = *shadow.iter().min().unwrap();
                            prop_assert_eq!(key, min, "pop did not yield the minimum");
                            let at = shadow.iter().position(|&k| k == key).unwrap();
                            shadow.swap_remove(at);
                            live.retain(|&h| h != idx);
                            prop_assert!(!arena.get(idx).unwrap().in_heap());
                        }
                        None => prop_assert!(shadow.is_empty()),
                    }
                }
                Op::RemoveNth(n) => {
                    if live.is_empty() {
                        continue;
                    }
                    let at = n % live.len();
                    let idx = live.swap_remove(at);
                    let key = arena.get(idx).unwrap().key;
                    heap.remove(&mut arena, idx);
                    prop_assert!(!arena.get(idx).unwrap().in_heap());
                    let at = shadow.iter().position(|&k| k == key).unwrap();
                    shadow.swap_remove(at);
                }
            }

            prop_assert_eq!(heap.len(), shadow.len());
            check_structure(&heap, &arena);
        }

        // Drain what's left; it must come out sorted and match the shadow.
        shadow.sort_unstable();
        let mut drained = Vec::new();
        while let Some(idx) = heap.pop(&mut arena) {
            drained.push(arena.get(idx).unwrap().key);
            check_structure(&heap, &arena);
        }
        prop_assert_eq!(drained, shadow);
    }

    #[test]
    fn insert_then_full_drain_sorts(keys in prop::collection::vec(any::<i8>(), 0..200)) {
        let mut arena: Arena<Node> = Arena::with_capacity(keys.len().max(1));
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();

        for &key in &keys {
            let idx = arena.try_insert(Node::new(key)).unwrap();
            heap.insert(&mut arena, idx);
        }
        check_structure(&heap, &arena);

        let mut drained = Vec::new();
        while let Some(idx) = heap.pop(&mut arena) {
            drained.push(arena.get(idx).unwrap().key);
        }

        let mut expected = keys;
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
    }
}
