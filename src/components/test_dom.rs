//! Helpers for driving components inside a `VirtualDom` on tokio's paused clock.

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Hands a value created inside a component back to the test. Provide it as a root
/// context and `put` from the component body.
pub struct Slot<T>(Rc<RefCell<Option<T>>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }
}

impl<T: Clone> Slot<T> {
    pub fn put(&self, value: T) {
        *self.0.borrow_mut() = Some(value);
    }

    pub fn get(&self) -> T {
        self.0
            .borrow()
            .clone()
            .expect("component has not rendered yet")
    }
}

/// Builds the tree once and runs the work queued by mounting.
pub async fn mount(mut dom: VirtualDom) -> VirtualDom {
    dom.rebuild_in_place();
    run_for(&mut dom, 1).await;
    dom
}

/// Lets `ms` of virtual time pass, polling tasks and re-rendering as work arrives.
pub async fn run_for(dom: &mut VirtualDom, ms: u64) {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(ms);
    loop {
        tokio::select! {
            _ = dom.wait_for_work() => {}
            _ = tokio::time::sleep_until(deadline) => break,
        }
        dom.render_immediate(&mut NoOpMutations);
    }
    dom.render_immediate(&mut NoOpMutations);
}
