//! Shared helpers for behavioural tests.

use std::cell::RefCell;
use std::rc::Rc;

use fluent_bdd::Disposable;

/// Ordered log of what step bodies and releases did.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Journal {
    /// Append one entry.
    pub fn note(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// A step body that only notes `name`.
    pub fn step(&self, name: &'static str) -> impl Fn() + 'static {
        let journal = self.clone();
        move || journal.note(name)
    }

    /// A step body that notes `acquire <name>` and returns a resource noting
    /// `release <name>`.
    pub fn acquire(&self, name: &'static str) -> impl Fn() -> Disposable + 'static {
        let journal = self.clone();
        move || {
            journal.note(format!("acquire {name}"));
            let journal = journal.clone();
            Disposable::new(move || journal.note(format!("release {name}")))
        }
    }

    /// Everything noted so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// How often `entry` was noted.
    pub fn count(&self, entry: &str) -> usize {
        self.entries.borrow().iter().filter(|e| *e == entry).count()
    }
}
