// Table integration suite.
//
// Each test documents what behavior is being verified. The core invariants
// exercised:
// - Round-trip: set(k, v) then get(k) == v.
// - Uniqueness: a second set on a key replaces in place and returns the old value.
// - Order: iteration follows first-insertion order across any number of resizes.
// - Removal: the order list reads correctly from both ends after removals.
// - Merge: source values win, source is untouched, evicted values come back.
// - Clear: idempotent, capacity preserved.
use chain_collections::{Cursor, SetError, Table};
use std::rc::Rc;

// Test: first insert, update, second insert.
// Verifies: return values, size, head/tail relationship.
#[test_log::test]
fn item_scenario() {
    let mut t = Table::new();
    assert_eq!(t.set(&[42u8], "item 1"), Ok(None));
    assert_eq!(t.len(), 1);
    assert_eq!(t.first(), t.last(), "single entry is both head and tail");

    assert_eq!(t.set(&[42u8], "item 2"), Ok(Some("item 1")));
    assert_eq!(t.len(), 1);

    assert_eq!(t.set(&[12u8], "item 1"), Ok(None));
    assert_eq!(t.len(), 2);
    assert_ne!(t.first(), t.last());
    let mut it = t.iter();
    it.next();
    assert_eq!(it.next(), t.last(), "head.next is the tail");
    t.validate();
}

// Test: merge {42: a1} with {42: a2, 22: b, 12: c} as the source.
// Verifies: size 3, the source value wins and the destination value comes back.
#[test]
fn merge_scenario() {
    let mut dest = Table::new();
    dest.set(&[42u8], "a1").unwrap();
    let mut src = Table::new();
    src.set(&[42u8], "a2").unwrap();
    src.set(&[22u8], "b").unwrap();
    src.set(&[12u8], "c").unwrap();

    let evicted = dest.merge(&src).unwrap();
    assert_eq!(dest.len(), 3);
    assert_eq!(dest.get(&[42u8]), Some(&"a2"));
    assert_eq!(evicted, vec!["a1"]);
    assert_eq!(src.len(), 3);

    // Position of the overwritten key is unchanged.
    assert_eq!(dest.first().map(|(k, _)| k), Some(&[42u8][..]));
    assert_eq!(dest.last().map(|(k, _)| k), Some(&[12u8][..]));
}

// Test: merge with disjoint keys.
// Verifies: every key of both tables is retrievable; nothing is evicted.
#[test]
fn merge_disjoint() {
    let mut a = Table::new();
    let mut b = Table::new();
    for i in 0u32..20 {
        a.set(&i.to_le_bytes(), i).unwrap();
        b.set(&(i + 100).to_le_bytes(), i + 100).unwrap();
    }
    assert!(a.merge(&b).unwrap().is_empty());
    assert_eq!(a.len(), 40);
    for i in (0u32..20).chain(100..120) {
        assert_eq!(a.get(&i.to_le_bytes()), Some(&i));
    }
    assert_eq!(b.len(), 20);
    a.validate();
}

// Test: round-trip and order over enough keys to force several resizes.
#[test_log::test]
fn order_survives_resizes() {
    let mut t = Table::new();
    let keys: Vec<String> = (0..1000).map(|i| format!("key-{i}")).collect();
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(t.set(k, i), Ok(None));
    }
    assert!(t.capacity() >= 1024, "at least six doublings from 16");
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(t.get(k), Some(&i));
    }
    let walked: Vec<&[u8]> = t.keys().collect();
    let expected: Vec<&[u8]> = keys.iter().map(|k| k.as_bytes()).collect();
    assert_eq!(walked, expected);
    t.validate();
}

// Test: remove every other entry, then all.
// Verifies: both traversal directions stay consistent, and emptying the table
// leaves no head/tail.
#[test]
fn removal_integrity() {
    let mut t = Table::new();
    for i in 0u16..64 {
        t.set(&i.to_be_bytes(), i).unwrap();
    }
    for i in (0u16..64).step_by(2) {
        assert_eq!(t.remove(&i.to_be_bytes()), Some(i));
    }
    let forward: Vec<u16> = t.values().copied().collect();
    let mut backward: Vec<u16> = t.values().rev().copied().collect();
    backward.reverse();
    assert_eq!(forward, (1u16..64).step_by(2).collect::<Vec<_>>());
    assert_eq!(forward, backward);

    let cap = t.capacity();
    for i in (1u16..64).step_by(2) {
        t.remove(&i.to_be_bytes());
    }
    assert!(t.is_empty());
    assert!(t.first().is_none() && t.last().is_none());
    assert_eq!(t.capacity(), cap, "removal never shrinks");
    t.validate();
}

// Test: clear twice.
#[test]
fn clear_twice() {
    let mut t = Table::new();
    for i in 0u8..50 {
        t.set(&[i], ()).unwrap();
    }
    let cap = t.capacity();
    t.clear();
    let once = (t.len(), t.capacity());
    t.clear();
    assert_eq!(once, (0, cap));
    assert_eq!((t.len(), t.capacity()), once);
}

// Test: values are handles the table holds but does not interpret.
// Verifies: removing and replacing hand the handle back; clearing releases
// only the table's handle.
#[test]
fn values_are_caller_handles() {
    let shared = Rc::new(String::from("payload"));
    let mut t = Table::new();
    t.set("a", Rc::clone(&shared)).unwrap();
    t.set("b", Rc::clone(&shared)).unwrap();
    assert_eq!(Rc::strong_count(&shared), 3);

    let back = t.set("a", Rc::new(String::new())).unwrap().unwrap();
    assert!(Rc::ptr_eq(&back, &shared));
    drop(back);

    let copy = t.try_clone().unwrap();
    assert_eq!(Rc::strong_count(&shared), 3, "clone copies the handle");
    drop(copy);

    t.clear();
    assert_eq!(Rc::strong_count(&shared), 1);
}

// Test: the cursor protocol over a table.
// Verifies: order, per-entry key length, sticky exhaustion.
#[test]
fn cursor_protocol() {
    let mut t = Table::new();
    t.set("alpha", 1).unwrap();
    t.set("be", 2).unwrap();
    let mut c = t.cursor();
    let e = c.advance().unwrap();
    assert_eq!((e.key(), e.key_len(), e.value()), (&b"alpha"[..], 5, &1));
    let e = c.advance().unwrap();
    assert_eq!((e.key_len(), *e.value()), (2, 2));
    for _ in 0..3 {
        assert!(c.advance().is_none());
    }
    c.dispose();
}

// Test: an empty table iterated then destroyed.
#[test]
fn empty_table_drop() {
    let t: Table<u8> = Table::default();
    assert_eq!(t.iter().count(), 0);
    assert_eq!(format!("{:?}", t), "{}");
    drop(t);
}

// Test: SetError keeps its two meanings distinct.
// Growth failures need a forced resize failure; the unit tests in
// src/table.rs cover that arm.
#[test]
fn set_error_kinds() {
    fn outcome(r: &Result<Option<u8>, SetError>) -> &'static str {
        match r {
            Ok(None) => "inserted",
            Ok(Some(_)) => "replaced",
            Err(e) if e.is_stored() => "stored, not grown",
            Err(_) => "failed",
        }
    }
    let mut t = Table::new();
    assert_eq!(outcome(&t.set("k", 1)), "inserted");
    assert_eq!(outcome(&t.set("k", 2)), "replaced");
}
