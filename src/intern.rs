// src/intern.rs

//! Process-wide string interning
//!
//! Attribute values repeat heavily across a loaded build graph ("srcs",
//! compiler flags, tag names), so converted strings are canonicalized
//! through a global insert-or-get table. Many package-loading workers
//! intern concurrently; racing inserts of the same string are idempotent
//! and every caller ends up with an equal canonical instance. The table
//! lives for the whole process, there is no reclamation.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

/// Global interning table, keyed by string content
static TABLE: LazyLock<DashMap<Arc<str>, ()>> = LazyLock::new(DashMap::new);

/// Return the canonical instance of `s`
///
/// The first interning of a string inserts it; later calls (from any
/// thread) return clones of the same allocation.
pub fn intern(s: &str) -> Arc<str> {
    if let Some(hit) = TABLE.get(s) {
        return hit.key().clone();
    }
    // Losing a racing insert is fine: the entry call lands on the
    // winner's key and returns that instance.
    TABLE.entry(Arc::from(s)).or_insert(()).key().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_equal() {
        let a = intern("srcs");
        let b = intern("srcs");
        assert_eq!(a, b);
    }

    #[test]
    fn test_intern_shares_allocation() {
        let a = intern("interned-once");
        let b = intern("interned-once");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_intern_distinct_strings() {
        let a = intern("deps");
        let b = intern("data");
        assert_ne!(a, b);
    }

    #[test]
    fn test_intern_concurrent() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| intern("racy-string")))
            .collect();
        let first = intern("racy-string");
        for handle in handles {
            let got = handle.join().unwrap();
            assert!(Arc::ptr_eq(&first, &got));
        }
    }
}
