//! Typed, scoped value injection.
//!
//! A [`ContextToken`] names a slot and fixes its value type. Render code
//! pushes values for a token; anything drawn underneath reads the top of
//! that token's stack, falling back to the token's default.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// Key for a context value of type `T`.
///
/// Every token gets a process-unique id at creation, so two tokens with the
/// same name and type never share a stack.
#[derive(Debug)]
pub struct ContextToken<T> {
    id: u64,
    name: &'static str,
    default: Option<T>,
}

impl<T> ContextToken<T> {
    /// Token whose reads fall back to `default`.
    pub fn new(name: &'static str, default: T) -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            name,
            default: Some(default),
        }
    }

    /// Token with no fallback: reading it with nothing pushed is an error.
    pub fn required(name: &'static str) -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            name,
            default: None,
        }
    }

    /// Unique id of this token.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fallback value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

#[derive(Debug)]
struct Slot {
    name: &'static str,
    values: Vec<Box<dyn Any>>,
}

/// Per-token value stacks.
#[derive(Debug, Default)]
pub struct ContextStacks {
    slots: BTreeMap<u64, Slot>,
}

impl ContextStacks {
    /// No values pushed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a value for `token`.
    pub fn push<T: 'static>(&mut self, token: &ContextToken<T>, value: T) {
        self.slots
            .entry(token.id)
            .or_insert_with(|| Slot {
                name: token.name,
                values: Vec::new(),
            })
            .values
            .push(Box::new(value));
    }

    /// Pop the top value for `token`.
    pub fn pop<T: 'static>(&mut self, token: &ContextToken<T>) -> Option<T> {
        let boxed = self.slots.get_mut(&token.id)?.values.pop()?;
        boxed.downcast::<T>().ok().map(|b| *b)
    }

    /// Top value for `token`, or its default.
    #[must_use]
    pub fn get<'a, T: 'static>(&'a self, token: &'a ContextToken<T>) -> Option<&'a T> {
        self.slots
            .get(&token.id)
            .and_then(|slot| slot.values.last())
            .and_then(|v| v.downcast_ref::<T>())
            .or(token.default.as_ref())
    }

    /// Number of values pushed for `token`.
    #[must_use]
    pub fn depth<T>(&self, token: &ContextToken<T>) -> usize {
        self.depth_of(token.id)
    }

    /// Number of values pushed under a raw token id.
    #[must_use]
    pub fn depth_of(&self, id: u64) -> usize {
        self.slots.get(&id).map_or(0, |slot| slot.values.len())
    }

    /// Drop values above `depth` for the token with the given id.
    pub fn truncate(&mut self, id: u64, depth: usize) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.values.truncate(depth);
        }
    }

    /// Earliest-created token that still has values pushed, as
    /// `(name, depth)`.
    #[must_use]
    pub fn unbalanced(&self) -> Option<(&'static str, usize)> {
        self.slots
            .values()
            .find(|slot| !slot.values.is_empty())
            .map(|slot| (slot.name, slot.values.len()))
    }

    /// Drop every pushed value.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
