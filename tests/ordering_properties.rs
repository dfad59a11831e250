//! Property tests: validity, permutation, completeness-iff-acyclic,
//! determinism, and stream/core agreement over random relation sets.

use proptest::prelude::*;

use tangle::prelude::*;

fn sorted(n: u32, edges: &[(u32, u32)]) -> (Vec<ObjectId>, Completion) {
    let mut graph = DependencyGraph::new(n).unwrap();
    for &(pred, succ) in edges {
        graph.record(pred, succ).unwrap();
    }
    Drain::new(graph)
        .unwrap()
        .collect_with_completion()
        .unwrap()
}

/// Orient every pair low-to-high and drop self-loops: the result is
/// always acyclic.
fn forward_edges(raw: &[(u32, u32)]) -> Vec<(u32, u32)> {
    raw.iter()
        .copied()
        .filter(|&(a, b)| a != b)
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect()
}

/// Emission position per id; `None` for ids never emitted.
fn positions(order: &[ObjectId], n: u32) -> Vec<Option<usize>> {
    let mut pos = vec![None; n as usize + 1];
    for (at, &id) in order.iter().enumerate() {
        pos[id as usize] = Some(at);
    }
    pos
}

fn relation_set(
    max_objects: u32,
    max_edges: usize,
) -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (1..max_objects).prop_flat_map(move |n| {
        (
            Just(n),
            prop::collection::vec((1..=n, 1..=n), 0..max_edges),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn acyclic_inputs_emit_a_complete_valid_order((n, raw) in relation_set(48, 128)) {
        let edges = forward_edges(&raw);
        let (order, completion) = sorted(n, &edges);

        prop_assert_eq!(completion, Completion::Complete);
        prop_assert_eq!(order.len() as u32, n);

        // Permutation of 1..=n.
        let mut seen = vec![false; n as usize + 1];
        for &id in &order {
            prop_assert!(id >= 1 && id <= n);
            prop_assert!(!seen[id as usize], "duplicate id {} in {:?}", id, order);
            seen[id as usize] = true;
        }

        // Every relation satisfied.
        let pos = positions(&order, n);
        for &(j, k) in &edges {
            prop_assert!(pos[j as usize].unwrap() < pos[k as usize].unwrap());
        }
    }

    #[test]
    fn arbitrary_inputs_emit_a_valid_prefix((n, edges) in relation_set(32, 96)) {
        let (order, completion) = sorted(n, &edges);
        let pos = positions(&order, n);

        // Never a duplicate, never an id outside 1..=n.
        let mut seen = vec![false; n as usize + 1];
        for &id in &order {
            prop_assert!(id >= 1 && id <= n);
            prop_assert!(!seen[id as usize]);
            seen[id as usize] = true;
        }

        match completion {
            Completion::Complete => {
                prop_assert_eq!(order.len() as u32, n);
                for &(j, k) in &edges {
                    prop_assert!(j != k, "self-loop cannot complete");
                    prop_assert!(pos[j as usize].unwrap() < pos[k as usize].unwrap());
                }
            }
            Completion::Cyclic { remaining } => {
                prop_assert!(remaining > 0);
                prop_assert_eq!(order.len() as u32 + remaining, n);
                // An emitted object's predecessors were all emitted first.
                for &(j, k) in &edges {
                    if j == k {
                        prop_assert!(pos[k as usize].is_none());
                        continue;
                    }
                    if let Some(at_k) = pos[k as usize] {
                        let at_j = pos[j as usize];
                        prop_assert!(at_j.is_some() && at_j.unwrap() < at_k);
                    }
                }
            }
        }
    }

    #[test]
    fn self_loops_always_produce_a_cycle_verdict(
        (n, raw) in relation_set(32, 64),
        loop_seed in any::<u32>(),
    ) {
        let looped = loop_seed % n + 1;
        let mut edges = raw;
        edges.push((looped, looped));

        let (order, completion) = sorted(n, &edges);
        let is_cyclic = matches!(completion, Completion::Cyclic { .. });
        prop_assert!(is_cyclic);
        prop_assert!(!order.contains(&looped));
    }

    #[test]
    fn reruns_are_deterministic((n, edges) in relation_set(48, 128)) {
        let first = sorted(n, &edges);
        let second = sorted(n, &edges);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn stream_layer_agrees_with_the_core((n, edges) in relation_set(32, 96)) {
        let mut input = Vec::new();
        input.extend_from_slice(&0u32.to_le_bytes());
        input.extend_from_slice(&n.to_le_bytes());
        for &(pred, succ) in &edges {
            input.extend_from_slice(&pred.to_le_bytes());
            input.extend_from_slice(&succ.to_le_bytes());
        }
        input.extend_from_slice(&[0u8; 8]);

        let mut out = Vec::new();
        let verdict = run(&input[..], &mut out).unwrap();

        let (order, completion) = sorted(n, &edges);
        prop_assert_eq!(verdict, completion);

        let mut expected = Vec::new();
        for id in order.iter().chain([&NULL_OBJECT]) {
            expected.extend_from_slice(&id.to_le_bytes());
        }
        prop_assert_eq!(out, expected);
    }
}
