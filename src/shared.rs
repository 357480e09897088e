use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Deferred<T> = Box<dyn FnOnce(&mut T)>;

struct Inner<T> {
    value: RefCell<T>,
    deferred: RefCell<VecDeque<Deferred<T>>>,
}

/// Shared handle for state that DOM callbacks mutate. A callback that fires
/// while another one still holds the value (a browser event dispatched
/// synchronously from inside a JS call) is queued and runs, in order, as soon
/// as the outer callback is done with the value.
pub struct Shared<T>(Rc<Inner<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: 'static> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            value: RefCell::new(value),
            deferred: RefCell::new(VecDeque::new()),
        }))
    }

    pub fn with(&self, action: impl FnOnce(&mut T) + 'static) {
        match self.0.value.try_borrow_mut() {
            Ok(mut value) => {
                action(&mut value);
                self.drain(&mut value);
            }
            Err(_) => {
                log::debug!("re-entrant callback deferred");
                self.0.deferred.borrow_mut().push_back(Box::new(action));
            }
        }
    }

    /// Runs `f` now, or returns `None` without running it when the value is
    /// already in use.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut value = self.0.value.try_borrow_mut().ok()?;
        let out = f(&mut value);
        self.drain(&mut value);
        Some(out)
    }

    fn drain(&self, value: &mut T) {
        loop {
            // The queue borrow must end before the action runs; it may queue more.
            let next = self.0.deferred.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };
            action(value);
        }
    }
}
