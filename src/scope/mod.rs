//! Layered symbol tables.
//!
//! A [`Scope`] owns its parent, so the active scope of an evaluation is the
//! whole chain. Symbols are keyed by pixel hex identity and looked up from the
//! innermost scope outwards, so inner definitions shadow outer ones.

mod member;

pub use member::{Overload, Parameter, ScopeMember};

use std::collections::HashMap;

use crate::statement::StatementKind;

/// The statement that opened a scope, and where its keyword pixel sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeOwner {
    pub statement: StatementKind,
    pub x: u32,
    pub y: u32,
}

/// A parent-linked symbol table.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    parent: Option<Box<Scope>>,
    owner: Option<ScopeOwner>,
    /// Lives for a single statement rather than until a block close.
    temporary: bool,
    members: HashMap<String, ScopeMember>,
}

impl Scope {
    /// Create an empty root scope.
    pub fn global() -> Self {
        Self::default()
    }

    /// Create a scope nested in `parent`.
    pub fn child(parent: Scope, owner: Option<ScopeOwner>) -> Self {
        Self {
            parent: Some(Box::new(parent)),
            owner,
            temporary: false,
            members: HashMap::new(),
        }
    }

    /// Create a single-statement scope nested in `parent`.
    pub fn temporary(parent: Scope, owner: Option<ScopeOwner>) -> Self {
        Self {
            temporary: true,
            ..Self::child(parent, owner)
        }
    }

    /// Discard this scope and return its parent.
    ///
    /// The root scope has no parent and is handed back as the error.
    pub fn into_parent(self) -> Result<Scope, Scope> {
        match self.parent {
            Some(parent) => Ok(*parent),
            None => Err(self),
        }
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    pub fn owner(&self) -> Option<ScopeOwner> {
        self.owner
    }

    /// Number of ancestors; the global scope has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Bind a symbol in this scope, returning what it replaced here.
    pub fn define(&mut self, key: impl Into<String>, member: ScopeMember) -> Option<ScopeMember> {
        self.members.insert(key.into(), member)
    }

    /// Resolve a symbol, nearest definition first.
    pub fn get(&self, key: &str) -> Option<&ScopeMember> {
        self.ancestors().find_map(|scope| scope.members.get(key))
    }

    /// Resolve a symbol in this scope only.
    pub fn get_local(&self, key: &str) -> Option<&ScopeMember> {
        self.members.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// This scope followed by each enclosing scope up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |scope| scope.parent())
    }

    /// The nearest scope (this one included) opened by a statement matching `predicate`.
    pub fn enclosing(&self, predicate: impl Fn(StatementKind) -> bool) -> Option<&Scope> {
        self.ancestors()
            .find(|scope| scope.owner.is_some_and(|owner| predicate(owner.statement)))
    }

    /// Number of symbols bound directly in this scope.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
