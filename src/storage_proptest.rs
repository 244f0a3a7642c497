#![cfg(test)]

// Property tests for ChunkedStore and the shift engine, kept inside the
// crate because both layers are private.

use crate::error::CapacityError;
use crate::storage::ChunkedStore;
use proptest::prelude::*;

const CHUNK: usize = 4;

#[derive(Clone, Debug)]
enum Op {
    Reserve(usize),
    Resize(usize),
    Shrink,
    Open(usize, u8),
    Close(usize, usize),
    Relocate(usize, usize),
    Swap(usize, usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..40).prop_map(Op::Reserve),
        (0usize..40).prop_map(Op::Resize),
        Just(Op::Shrink),
        (any::<usize>(), 0u8..9).prop_map(|(at, n)| Op::Open(at, n)),
        (any::<usize>(), any::<usize>()).prop_map(|(at, n)| Op::Close(at, n)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Relocate(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Swap(a, b)),
        Just(Op::Clear),
    ]
}

fn ceil_chunk(n: usize) -> usize {
    n.div_ceil(CHUNK) * CHUNK
}

// Property: ChunkedStore tracks a Vec model entry-for-entry, and its
// capacity follows the chunk policy exactly:
// - reserve grows to the next chunk multiple, never shrinks, rejects < len;
// - resize/shrink set the exact capacity, reject < len;
// - open_gap grows only when the run does not fit;
// - close/relocate/swap/clear never touch capacity;
// - len <= capacity after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_store_matches_model(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: ChunkedStore<u32, CHUNK> = ChunkedStore::new();
        let mut model: Vec<u32> = Vec::new();
        let mut cap = 0usize;
        let mut next = 0u32;

        for op in ops {
            match op {
                Op::Reserve(n) => {
                    let r = sut.reserve(n);
                    if n < model.len() {
                        prop_assert_eq!(r, Err(CapacityError::BelowLength { requested: n, len: model.len() }));
                    } else {
                        prop_assert!(r.is_ok());
                        if n > cap {
                            cap = ceil_chunk(n);
                        }
                    }
                }
                Op::Resize(n) => {
                    let r = sut.resize(n);
                    if n < model.len() {
                        prop_assert!(r.is_err());
                    } else {
                        prop_assert!(r.is_ok());
                        cap = n;
                    }
                }
                Op::Shrink => {
                    prop_assert!(sut.shrink().is_ok());
                    cap = model.len();
                }
                Op::Open(at, n) => {
                    let at = at % (model.len() + 1);
                    let run: Vec<u32> = (0..n as u32).map(|i| next + i).collect();
                    next += n as u32;
                    prop_assert!(sut.open_gap(at, run.clone()).is_ok());
                    let needed = model.len() + run.len();
                    if needed > cap {
                        cap = ceil_chunk(needed);
                    }
                    model.splice(at..at, run);
                }
                Op::Close(at, n) => {
                    if !model.is_empty() {
                        let at = at % model.len();
                        let n = n % (model.len() - at + 1);
                        let removed: Vec<u32> = sut.close_gap(at, n).collect();
                        let expected: Vec<u32> = model.drain(at..at + n).collect();
                        prop_assert_eq!(removed, expected);
                    }
                }
                Op::Relocate(a, b) => {
                    if !model.is_empty() {
                        let (a, b) = (a % model.len(), b % model.len());
                        sut.relocate(a, b);
                        let e = model.remove(a);
                        model.insert(b, e);
                    }
                }
                Op::Swap(a, b) => {
                    if !model.is_empty() {
                        let (a, b) = (a % model.len(), b % model.len());
                        sut.swap_slots(a, b);
                        model.swap(a, b);
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.as_slice(), &model[..]);
            prop_assert_eq!(sut.capacity(), cap);
            prop_assert!(sut.len() <= sut.capacity());
        }
    }
}
