//! Owner slot for state shared with browser callbacks
//!
//! Event handlers and the frame callback only hold `Weak` handles, so
//! something has to own the strong `Rc` for as long as the page shows the
//! card. A `KeepAlive` in a `thread_local!` is that owner; releasing it on
//! `pagehide` lets the state drop once teardown is done.

use std::cell::RefCell;
use std::rc::Rc;

pub struct KeepAlive<T> {
    held: RefCell<Option<Rc<RefCell<T>>>>,
}

impl<T> KeepAlive<T> {
    pub const fn new() -> Self {
        Self {
            held: RefCell::new(None),
        }
    }

    /// Hold `value` until `release`. Returns the previous owner, if any.
    pub fn install(&self, value: Rc<RefCell<T>>) -> Option<Rc<RefCell<T>>> {
        self.held.replace(Some(value))
    }

    /// Give up ownership. Later calls return `None`.
    pub fn release(&self) -> Option<Rc<RefCell<T>>> {
        self.held.take()
    }
}

impl<T> Default for KeepAlive<T> {
    fn default() -> Self {
        Self::new()
    }
}
