// Sibling container property tests.
//
// Property 1: heap pops come out sorted by the comparator.
//  - Model: the pushed multiset, sorted.
//  - Operations: push, pop, merge, clear interleaved.
//
// Property 2: list behaves like a VecDeque under push/pop/unshift/shift.
//
// Property 3: vector behaves like a Vec under push/pop/insert/remove/set,
//             with out-of-range indices rejected.
use chain_collections::{Cursor, Heap, IndexOutOfBounds, List, Reversed, Vector};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum HeapOp {
    Push(i16),
    Pop,
    Merge(Vec<i16>),
    Clear,
}

fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        4 => any::<i16>().prop_map(HeapOp::Push),
        3 => Just(HeapOp::Pop),
        1 => proptest::collection::vec(any::<i16>(), 0..20).prop_map(HeapOp::Merge),
        1 => Just(HeapOp::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_heap_matches_sorted_model(ops in proptest::collection::vec(heap_op(), 1..200)) {
        let mut sut = Heap::new();
        let mut model: Vec<i16> = Vec::new();
        for op in ops {
            match op {
                HeapOp::Push(x) => {
                    sut.push(x).unwrap();
                    model.push(x);
                }
                HeapOp::Pop => {
                    model.sort_unstable_by(|a, b| b.cmp(a));
                    prop_assert_eq!(sut.pop(), model.pop());
                }
                HeapOp::Merge(xs) => {
                    let mut other = Heap::with_comparator(Reversed);
                    for &x in &xs {
                        other.push(x).unwrap();
                    }
                    sut.merge(&other).unwrap();
                    prop_assert_eq!(other.len(), xs.len());
                    model.extend(xs);
                }
                HeapOp::Clear => {
                    sut.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.peek(), model.iter().min());
        }

        let mut sorted = model.clone();
        sorted.sort_unstable();
        let walked: Vec<i16> = sut.cursor().unwrap().collect();
        prop_assert_eq!(&walked, &sorted);
        prop_assert_eq!(sut.len(), model.len(), "cursor leaves the heap intact");
        prop_assert_eq!(sut.into_sorted_vec(), sorted);
    }
}

#[derive(Clone, Debug)]
enum ListOp {
    Push(u8),
    Pop,
    Unshift(u8),
    Shift,
    Concat(Vec<u8>),
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        any::<u8>().prop_map(ListOp::Push),
        Just(ListOp::Pop),
        any::<u8>().prop_map(ListOp::Unshift),
        Just(ListOp::Shift),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(ListOp::Concat),
    ]
}

proptest! {
    #[test]
    fn prop_list_matches_deque(ops in proptest::collection::vec(list_op(), 1..200)) {
        let mut sut = List::new();
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                ListOp::Push(x) => { sut.push(x); model.push_back(x); }
                ListOp::Pop => prop_assert_eq!(sut.pop(), model.pop_back()),
                ListOp::Unshift(x) => { sut.unshift(x); model.push_front(x); }
                ListOp::Shift => prop_assert_eq!(sut.shift(), model.pop_front()),
                ListOp::Concat(xs) => {
                    let other: List<u8> = xs.iter().copied().collect();
                    sut.concat(&other);
                    prop_assert_eq!(other.len(), xs.len());
                    model.extend(xs);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.front(), model.front());
            prop_assert_eq!(sut.back(), model.back());
        }
        let forward: Vec<u8> = sut.iter().copied().collect();
        let backward: Vec<u8> = sut.iter().rev().copied().collect();
        prop_assert_eq!(&forward, &model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(backward, model.iter().rev().copied().collect::<Vec<_>>());
        let mut c = sut.cursor();
        let mut n = 0;
        while c.advance().is_some() {
            n += 1;
        }
        prop_assert_eq!(n, model.len());
    }
}

#[derive(Clone, Debug)]
enum VecOp {
    Push(u32),
    Pop,
    Insert(usize, u32),
    Remove(usize),
    Set(usize, u32),
}

fn vec_op() -> impl Strategy<Value = VecOp> {
    prop_oneof![
        3 => any::<u32>().prop_map(VecOp::Push),
        1 => Just(VecOp::Pop),
        2 => (0usize..40, any::<u32>()).prop_map(|(i, x)| VecOp::Insert(i, x)),
        2 => (0usize..40).prop_map(VecOp::Remove),
        2 => (0usize..40, any::<u32>()).prop_map(|(i, x)| VecOp::Set(i, x)),
    ]
}

proptest! {
    #[test]
    fn prop_vector_matches_vec(ops in proptest::collection::vec(vec_op(), 1..200)) {
        let mut sut = Vector::new();
        let mut model: Vec<u32> = Vec::new();
        for op in ops {
            match op {
                VecOp::Push(x) => { sut.push(x).unwrap(); model.push(x); }
                VecOp::Pop => prop_assert_eq!(sut.pop(), model.pop()),
                VecOp::Insert(i, x) => {
                    let r = sut.insert(i, x);
                    if i <= model.len() {
                        prop_assert!(r.is_ok());
                        model.insert(i, x);
                    } else {
                        prop_assert!(r.unwrap_err().is_index_out_of_bounds());
                    }
                }
                VecOp::Remove(i) => {
                    let expected = if i < model.len() {
                        Ok(model.remove(i))
                    } else {
                        Err(IndexOutOfBounds { index: i, len: model.len() })
                    };
                    prop_assert_eq!(sut.remove(i), expected);
                }
                VecOp::Set(i, x) => {
                    let expected = match model.get_mut(i) {
                        Some(slot) => Ok(std::mem::replace(slot, x)),
                        None => Err(IndexOutOfBounds { index: i, len: model.len() }),
                    };
                    prop_assert_eq!(sut.set(i, x), expected);
                }
            }
            prop_assert_eq!(sut.as_slice(), model.as_slice());
            prop_assert!(sut.capacity() >= 16);
        }
    }
}
