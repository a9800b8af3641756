//! Deferred release of resources acquired by step bodies.
//!
//! A step body may hand back [`Disposable`]s. The executor pushes them onto a
//! [`DisposableChain`] owned by the running execution group and releases the
//! chain, most recently acquired first, once the group stops, whichever way it
//! stops. Each release is attempted independently: an error or panic from one
//! is captured as a [`DisposalFailure`] and the remaining releases still run.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::execution::DisposalFailure;
use crate::panic::panic_message;

type ReleaseFn = Box<dyn FnOnce() -> Result<(), String>>;

/// One deferred release action.
///
/// # Examples
///
/// ```
/// use fluent_bdd::{Disposable, DisposableChain};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let mut chain = DisposableChain::new();
/// for name in ["db", "cache"] {
///     let log = Rc::clone(&log);
///     chain.push(Disposable::new(move || log.borrow_mut().push(name)));
/// }
/// assert!(chain.release().is_empty());
/// assert_eq!(*log.borrow(), ["cache", "db"]);
/// ```
#[must_use = "a disposable does nothing until it is released"]
pub struct Disposable {
    release: ReleaseFn,
}

impl Disposable {
    /// Defer an infallible release action.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Box::new(move || {
                release();
                Ok(())
            }),
        }
    }

    /// Defer a release action whose error is reported as a disposal failure.
    pub fn try_new<E>(release: impl FnOnce() -> Result<(), E> + 'static) -> Self
    where
        E: fmt::Display,
    {
        Self {
            release: Box::new(move || release().map_err(|err| err.to_string())),
        }
    }

    /// Defer dropping `value`, so any RAII guard is released with the chain.
    pub fn guard<T: 'static>(value: T) -> Self {
        Self::new(move || drop(value))
    }

    /// A disposable that releases nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    fn release(self) -> Result<(), String> {
        let release = self.release;
        match panic::catch_unwind(AssertUnwindSafe(release)) {
            Ok(result) => result,
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable").finish_non_exhaustive()
    }
}

/// Ownership stack of disposables acquired by one execution group.
///
/// Dropping a chain that was never released still releases every entry in
/// reverse order and logs any failures.
#[derive(Debug, Default)]
pub struct DisposableChain {
    entries: Vec<Disposable>,
}

impl DisposableChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of one acquired resource.
    pub fn push(&mut self, disposable: Disposable) {
        self.entries.push(disposable);
    }

    /// Take ownership of a collection acquired in enumeration order.
    ///
    /// Later items are therefore released before earlier ones.
    pub fn extend(&mut self, disposables: impl IntoIterator<Item = Disposable>) {
        self.entries.extend(disposables);
    }

    /// Number of resources awaiting release.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing awaits release.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every resource, most recently acquired first.
    ///
    /// Returns one [`DisposalFailure`] per release that errored or panicked,
    /// in release order. Positions refer to acquisition order.
    #[must_use = "disposal failures must be reported"]
    pub fn release(mut self) -> Vec<DisposalFailure> {
        release_all(std::mem::take(&mut self.entries))
    }
}

impl Drop for DisposableChain {
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        for failure in release_all(std::mem::take(&mut self.entries)) {
            log::warn!("release failed while dropping a chain: {failure}");
        }
    }
}

fn release_all(entries: Vec<Disposable>) -> Vec<DisposalFailure> {
    entries
        .into_iter()
        .enumerate()
        .rev()
        .filter_map(|(position, disposable)| {
            log::trace!("releasing disposable {position}");
            disposable
                .release()
                .err()
                .map(|message| DisposalFailure::new(position, message))
        })
        .collect()
}
