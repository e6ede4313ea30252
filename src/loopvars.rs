//! Loop-variable registry
//!
//! A flat list of loop variables currently in force, kept separate from
//! the scope stack because redeclaration must be blocked at *any* depth
//! inside an active loop, including inner scopes where ordinary shadowing
//! would otherwise be allowed.

use crate::symbol::SymbolEntry;

#[derive(Debug, Default)]
pub struct LoopVariableRegistry {
    entries: Vec<SymbolEntry>,
}

impl LoopVariableRegistry {
    pub fn new() -> Self {
        LoopVariableRegistry::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn push(&mut self, entry: SymbolEntry) {
        self.entries.push(entry);
    }

    /// Pop the most recently pushed loop variable - paired with a
    /// `for`-loop exit.
    pub fn pop(&mut self) -> SymbolEntry {
        self.entries
            .pop()
            .expect("loop-variable registry underflow: unbalanced for-loop push/pop")
    }

    /// Overwrite the top entry's `attribute` field - used by the
    /// for-header's initializing assignment to record the lower bound.
    pub fn set_top_attribute(&mut self, attribute: String) {
        if let Some(top) = self.entries.last_mut() {
            top.attribute = attribute;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
