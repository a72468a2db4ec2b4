//! Name table for query variables.
//!
//! Every builder query owns one variable URI. The table hands out a compact
//! [`Symbol`] per name and, through [`Interner::fresh`], guarantees that two
//! queries never share a name inside one graph.

use indexmap::IndexSet;

/// Handle to a name in an [`Interner`]. Orders by insertion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interner {
    names: IndexSet<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The symbol for `name`, adding it if needed.
    pub fn intern(&mut self, name: &str) -> Symbol {
        match self.names.get_index_of(name) {
            Some(index) => Symbol(index as u32),
            None => {
                let (index, _) = self.names.insert_full(name.into());
                Symbol(index as u32)
            }
        }
    }

    /// Add `base`, or the first of `base_1`, `base_2`, ... not yet taken.
    pub fn fresh(&mut self, base: &str) -> Symbol {
        if !self.contains(base) {
            return self.intern(base);
        }
        let name = (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_owned());
        self.intern(&name)
    }

    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.names.get_index_of(name).map(|i| Symbol(i as u32))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The name behind `sym`.
    ///
    /// # Panics
    /// If `sym` came from another interner with fewer names.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.names[sym.index()]
    }

    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.names.get_index(sym.index()).map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Symbol(i as u32), &**name))
    }
}
