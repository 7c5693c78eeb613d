//! String interner implementation using DashMap for concurrent access.
//!
//! The interner keeps two lock-free maps: string → index for interning and
//! index → string for O(1) retrieval. Strings are allocated once and leaked
//! to obtain `'static` references; the table lives for the whole process
//! and entries are never removed.

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use super::Symbol;

/// Global string table instance
///
/// Initialized on first use via `LazyLock`. The language keywords are
/// pre-interned during initialization so they occupy stable, low indices.
pub(super) static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Thread-safe string table
///
/// DashMap gives lock-free concurrent access, which beats `RwLock<HashMap>`
/// for the read-heavy interning workload of a compiler front end.
pub(super) struct StringTable {
    /// Maps interned string to its symbol index
    map: DashMap<&'static str, u32, RandomState>,

    /// Maps symbol index back to its string
    reverse: DashMap<u32, &'static str, RandomState>,

    /// Counter for the next index (atomic for lock-free increment)
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            reverse: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            next_index: AtomicU32::new(0),
        }
    }

    /// Pre-intern the language keywords and common identifiers
    ///
    /// Keeps the hot lookups allocation-free from the first token onward.
    fn initialize_known_symbols(&self) {
        let known_symbols = [
            // Keywords
            "let", "func", "extern", "return", "if", "else", "while", "repeat",
            // Common identifiers
            "main", "print",
            // Basic block labels
            "entry", "then", "if_cont", "while_cond", "while_body", "while_after",
        ];

        for symbol in known_symbols {
            self.intern(symbol);
        }
    }

    /// Intern a string, returning its symbol
    ///
    /// If the string is already interned, returns the existing symbol.
    /// Otherwise allocates a new entry and returns a fresh symbol. Safe to
    /// call from multiple threads; concurrent interns of the same new
    /// string resolve to a single entry.
    pub(super) fn intern(&self, string: &str) -> Symbol {
        // Fast path: already interned
        if let Some(entry) = self.map.get(string) {
            return Symbol::from_index(*entry.value());
        }

        // Slow path: allocate with 'static lifetime and race for the slot
        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        match self.map.entry(interned) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                // Another thread won the race; our allocation stays leaked
                Symbol::from_index(*entry.get())
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let index = self.next_index.fetch_add(1, Ordering::Relaxed);
                entry.insert(index);
                self.reverse.insert(index, interned);
                Symbol::from_index(index)
            }
        }
    }

    /// Get string by symbol
    pub(super) fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.reverse.get(&symbol.as_u32()).map(|entry| *entry.value())
    }
}
