//! End-to-end dispatch behavior.
//!
//! Covers the observable contract of `register` and `resolve` and checks
//! the resolver against a brute-force reading of the rules on random
//! hierarchies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use polyresolve::{
    DispatchError, Dispatcher, Hierarchy, SharedDispatcher, Signature, TyId, TypeGraph,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// A <- B, A <- C, (B, C) <- D, and a standalone `int`.
fn diamond() -> (TypeGraph, [TyId; 5]) {
    let mut graph = TypeGraph::new();
    let a = graph.declare("A", &[]).unwrap();
    let b = graph.declare("B", &["A"]).unwrap();
    let c = graph.declare("C", &["A"]).unwrap();
    let d = graph.declare("D", &["B", "C"]).unwrap();
    let int = graph.declare("int", &[]).unwrap();
    (graph, [a, b, c, d, int])
}

// ============================================================
// Contract
// ============================================================

#[test]
fn test_single_applicable_signature_wins() {
    let (graph, [a, b, _, _, int]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([int], "int");
    dispatch.register([b], "b");

    assert_eq!(dispatch.resolve(&[int]), Ok(&"int"));
    assert!(dispatch.resolve(&[a]).unwrap_err().is_not_found());
}

#[test]
fn test_subtype_beats_supertype() {
    let (graph, [a, b, ..]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "a");
    dispatch.register([b], "b");

    assert_eq!(dispatch.resolve(&[b]), Ok(&"b"));
}

#[test]
fn test_registration_order_does_not_matter() {
    let (graph, [a, b, ..]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([b], "b");
    dispatch.register([a], "a");

    assert_eq!(dispatch.resolve(&[b]), Ok(&"b"));
    assert_eq!(dispatch.resolve(&[a]), Ok(&"a"));
}

#[test]
fn test_diamond_ambiguity_and_its_resolution() {
    let (graph, [_, b, c, d, _]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([b], "b");
    dispatch.register([c], "c");

    let err = dispatch.resolve(&[d]).unwrap_err();
    assert!(err.is_ambiguous());
    assert!(!err.is_not_found());

    dispatch.register([d], "d");
    for _ in 0..3 {
        assert_eq!(dispatch.resolve(&[d]), Ok(&"d"));
    }
}

#[test]
fn test_unrelated_type_not_found() {
    let (mut graph, [a, b, c, ..]) = diamond();
    let unregistered = graph.declare("Unregistered", &[]).unwrap();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "a");
    dispatch.register([b], "b");
    dispatch.register([c], "c");

    match dispatch.resolve(&[unregistered]) {
        Err(DispatchError::NotFound(err)) => assert_eq!(err.call, vec![unregistered]),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_two_argument_dispatch() {
    let (graph, [a, b, c, d, int]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "a");
    dispatch.register([b], "b");
    dispatch.register([c], "c");
    dispatch.register([a, int], "a, int");
    dispatch.register([b, int], "b, int");

    assert_eq!(dispatch.resolve(&[b, int]), Ok(&"b, int"));
    assert_eq!(dispatch.resolve(&[d, int]), Ok(&"b, int"));
    assert_eq!(dispatch.resolve(&[c, int]), Ok(&"a, int"));
    // Unary methods are unaffected by the binary ones.
    assert!(dispatch.resolve(&[d]).unwrap_err().is_ambiguous());
}

#[test]
fn test_last_write_wins() {
    let (graph, [a, ..]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "first");
    dispatch.register([a], "second");

    assert_eq!(dispatch.resolve(&[a]), Ok(&"second"));
    assert_eq!(dispatch.len(), 1);
}

#[test]
fn test_exact_signature_always_applicable() {
    let (graph, types) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    for ty in types {
        dispatch.register([ty, ty], ty.index);
    }
    for ty in types {
        assert_eq!(dispatch.resolve(&[ty, ty]), Ok(&ty.index));
    }
}

#[test]
fn test_zero_arity() {
    let (graph, [a, ..]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register(Signature::new(vec![]), "nullary");
    dispatch.register([a], "unary");

    assert_eq!(dispatch.resolve(&[]), Ok(&"nullary"));
}

// ============================================================
// Concurrency
// ============================================================

#[test]
fn test_concurrent_readers_with_writer() {
    let (graph, [a, b, ..]) = diamond();
    let shared = SharedDispatcher::new(graph);
    shared.register([a], "a");

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut resolutions = 0;
                while !done.load(Ordering::Acquire) || resolutions == 0 {
                    let handle = shared.resolve(&[b]).expect("B always has a method");
                    assert!(handle == "a" || handle == "b");
                    resolutions += 1;
                }
                resolutions
            })
        })
        .collect();

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            shared.register([b], "b");
        })
    };
    writer.join().unwrap();
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(shared.resolve(&[b]), Ok("b"));
}

#[test]
fn test_frozen_dispatcher_across_threads() {
    let (graph, [a, b, c, d, _]) = diamond();
    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "a");
    dispatch.register([b], "b");
    dispatch.register([c], "c");
    let frozen = dispatch.freeze();

    let handles: Vec<_> = [a, b, c, d]
        .into_iter()
        .map(|ty| {
            let frozen = frozen.clone();
            thread::spawn(move || frozen.resolve(&[ty]).map(|h| *h).map_err(|e| e.is_ambiguous()))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![Ok("a"), Ok("b"), Ok("c"), Err(true)]);
}

// ============================================================
// Properties over random hierarchies
// ============================================================

/// Random DAG: type `i` may inherit from any earlier type.
fn arb_graph() -> impl Strategy<Value = TypeGraph> {
    (1usize..8)
        .prop_flat_map(|n| prop::collection::vec(any::<u8>(), n))
        .prop_map(|masks| {
            let mut graph = TypeGraph::new();
            let names: Vec<String> = (0..masks.len()).map(|i| format!("T{i}")).collect();
            for (i, mask) in masks.iter().enumerate() {
                let parents: Vec<&str> = (0..i)
                    .filter(|p| mask & (1 << (p % 8)) != 0)
                    .map(|p| names[p].as_str())
                    .collect();
                graph.declare(names[i].clone(), &parents).unwrap();
            }
            graph
        })
}

fn arb_case() -> impl Strategy<Value = (TypeGraph, Vec<Vec<TyId>>, Vec<TyId>)> {
    arb_graph().prop_flat_map(|graph| {
        let n = graph.len() as u32;
        let ty = (0..n).prop_map(TyId::new);
        let signatures =
            prop::collection::vec(prop::collection::vec(ty.clone(), 1..=2), 0..8);
        let call = prop::collection::vec(ty, 1..=2);
        (Just(graph), signatures, call)
    })
}

fn applicable(graph: &TypeGraph, sig: &[TyId], call: &[TyId]) -> bool {
    sig.len() == call.len() && call.iter().zip(sig).all(|(c, s)| graph.is_subtype(c, s))
}

fn more_specific(graph: &TypeGraph, s1: &[TyId], s2: &[TyId]) -> bool {
    s1.iter().zip(s2).all(|(x, y)| graph.is_subtype(x, y))
        && s1.iter().zip(s2).any(|(x, y)| x != y)
}

proptest! {
    #[test]
    fn prop_resolution_matches_rules((graph, signatures, call) in arb_case()) {
        let mut dispatch = Dispatcher::new(graph.clone());
        for (i, sig) in signatures.iter().enumerate() {
            dispatch.register(sig.clone(), i);
        }

        // Distinct registered signatures, each bound to its last handle.
        let registered: Vec<(&[TyId], usize)> = dispatch
            .registry()
            .iter()
            .map(|(sig, h)| (sig.types(), *h))
            .collect();
        let candidates: Vec<_> = registered
            .iter()
            .filter(|(sig, _)| applicable(&graph, sig, &call))
            .collect();

        match dispatch.resolve(&call) {
            Ok(handle) => {
                let (winner, _) = candidates
                    .iter()
                    .find(|(_, h)| h == handle)
                    .expect("winner must be applicable");
                for (other, h) in &candidates {
                    if h != handle {
                        prop_assert!(more_specific(&graph, winner, other));
                    }
                }
            }
            Err(DispatchError::NotFound(_)) => {
                prop_assert!(candidates.is_empty());
            }
            Err(DispatchError::Ambiguous(err)) => {
                prop_assert!(candidates.len() >= 2);
                let dominators = candidates
                    .iter()
                    .filter(|(s, h)| {
                        candidates
                            .iter()
                            .all(|(o, oh)| oh == h || more_specific(&graph, s, o))
                    })
                    .count();
                prop_assert!(dominators != 1);
                prop_assert!(!err.candidates.is_empty());
                for candidate in &err.candidates {
                    prop_assert!(applicable(&graph, candidate.types(), &call));
                }
            }
        }
    }

    #[test]
    fn prop_last_registration_is_bound(
        (graph, signatures, _call) in arb_case()
    ) {
        let mut dispatch = Dispatcher::new(graph);
        for (i, sig) in signatures.iter().enumerate() {
            dispatch.register(sig.clone(), i);
        }
        for (i, sig) in signatures.iter().enumerate() {
            let last = signatures.iter().rposition(|s| s == sig).unwrap();
            let bound = dispatch.registry().get(&Signature::new(sig.clone())).copied();
            prop_assert_eq!(bound, Some(last));
            // Resolving a signature's own types finds a method.
            if i == last {
                let result = dispatch.resolve(sig);
                prop_assert!(!matches!(result, Err(DispatchError::NotFound(_))));
            }
        }
    }
}
