//! Values shared between the steps of one scenario.
//!
//! Step bodies are `'static` closures and are re-invoked once per execution
//! group, so they cannot borrow locals of the test function. A [`Slot`] is a
//! cheap, clonable handle to one optional value: clone it into every step that
//! needs it. Clearing a slot when a group ends keeps the next replay from
//! observing the previous group's value; [`Slot::clear_on_release`] returns a
//! [`Disposable`] doing exactly that.
//!
//! # Examples
//!
//! ```
//! use fluent_bdd::{Declare, Slot, scenario};
//!
//! let total = Slot::new();
//! let report = scenario("adding", |s| {
//!     let (arrange, act, check) = (total.clone(), total.clone(), total.clone());
//!     s.given("a total of 2", move || {
//!         arrange.set(2);
//!         arrange.clear_on_release()
//!     })
//!     .when("3 is added", move || {
//!         act.with_mut(|t| *t += 3);
//!     })
//!     .then("the total is 5", move || assert_eq!(check.get(), Some(5)));
//! });
//! report.assert_passed();
//! assert!(total.is_empty());
//! ```

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::disposal::Disposable;

/// Shared handle to a single optional value of type `T`.
pub struct Slot<T> {
    inner: Rc<RefCell<Option<T>>>,
}

impl<T> Slot<T> {
    /// Construct an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous value when present.
    pub fn replace(&self, value: T) -> Option<T> {
        self.inner.replace(Some(value))
    }

    /// Store `value`, discarding any previous contents.
    pub fn set(&self, value: T) {
        drop(self.replace(value));
    }

    /// Remove and return the current value.
    #[must_use]
    pub fn take(&self) -> Option<T> {
        self.inner.borrow_mut().take()
    }

    /// Borrow the value mutably, inserting one produced by `init` when empty.
    pub fn get_or_insert_with(&self, init: impl FnOnce() -> T) -> RefMut<'_, T> {
        RefMut::map(self.inner.borrow_mut(), |value| {
            value.get_or_insert_with(init)
        })
    }

    /// Clone the current value out of the slot.
    #[must_use]
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.borrow().clone()
    }

    /// Apply `with_value` to the contained value if present.
    #[must_use]
    pub fn with_ref<R>(&self, with_value: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.borrow().as_ref().map(with_value)
    }

    /// Apply `with_value` to the contained value mutably if present.
    pub fn with_mut<R>(&self, with_value: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.borrow_mut().as_mut().map(with_value)
    }

    /// Whether the slot holds a value.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Whether the slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_filled()
    }

    /// Drop the current value.
    pub fn clear(&self) {
        drop(self.take());
    }

    /// Whether both handles refer to the same storage.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Slot<T> {
    /// A resource that empties this slot when its group releases it.
    pub fn clear_on_release(&self) -> Disposable {
        let slot = self.clone();
        Disposable::new(move || slot.clear())
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(value) => f.debug_tuple("Slot").field(&*value).finish(),
            Err(_) => f.write_str("Slot(<borrowed>)"),
        }
    }
}

/// A struct of [`Slot`]s that can be emptied in one call.
///
/// Implementors usually hold one slot per value their steps exchange and clear
/// each of them in [`reset`](Self::reset). Pair it with
/// [`reset_on_release`](Self::reset_on_release) in the first step so every
/// replay starts from empty slots.
pub trait ScenarioState: Clone + 'static {
    /// Empty every slot.
    fn reset(&self);

    /// A resource that resets this state when its group releases it.
    fn reset_on_release(&self) -> Disposable {
        let state = self.clone();
        Disposable::new(move || state.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposal::DisposableChain;

    #[test]
    fn slot_replaces_values() {
        let slot = Slot::new();
        assert!(slot.is_empty());
        slot.set(1);
        assert_eq!(slot.get(), Some(1));
        assert_eq!(slot.replace(2), Some(1));
        assert_eq!(slot.take(), Some(2));
        assert!(slot.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let slot = Slot::new();
        let copy = slot.clone();
        copy.set(String::from("shared"));
        assert!(slot.same_slot(&copy));
        assert_eq!(slot.get().as_deref(), Some("shared"));
        assert!(!slot.same_slot(&Slot::new()));
    }

    #[test]
    fn get_or_insert_with_initialises_once() {
        let slot = Slot::new();
        slot.get_or_insert_with(|| String::from("hello")).push_str(" world");
        slot.get_or_insert_with(|| String::from("ignored")).push('!');
        assert_eq!(slot.get().as_deref(), Some("hello world!"));
    }

    #[test]
    fn with_ref_and_with_mut_skip_empty_slots() {
        let slot = Slot::new();
        assert_eq!(slot.with_ref(|value: &i32| *value), None);
        slot.set(5);
        assert_eq!(slot.with_ref(|value| value * 2), Some(10));
        assert_eq!(
            slot.with_mut(|value| {
                *value += 1;
                *value
            }),
            Some(6)
        );
    }

    #[derive(Clone, Default)]
    struct Ledger {
        balance: Slot<i64>,
        owner: Slot<String>,
    }

    impl ScenarioState for Ledger {
        fn reset(&self) {
            self.balance.clear();
            self.owner.clear();
        }
    }

    #[test]
    fn releases_clear_slots_and_state() {
        let ledger = Ledger::default();
        let extra = Slot::new();
        ledger.balance.set(10);
        ledger.owner.set(String::from("ada"));
        extra.set(3_u8);

        let mut chain = DisposableChain::new();
        chain.push(ledger.reset_on_release());
        chain.push(extra.clear_on_release());
        assert!(chain.release().is_empty());

        assert!(ledger.balance.is_empty());
        assert!(ledger.owner.is_empty());
        assert!(extra.is_empty());
    }
}
