//! Delay-and-coalesce for noisy input values.

use crate::utils::delay_ms;
use dioxus::core::Task;
use dioxus::prelude::*;

/// Generation bookkeeping behind [`use_debounced`]. Every `schedule` supersedes the
/// previous one; only the newest generation may settle.
#[derive(Debug, Clone, Default)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.pending = Some(value);
        self.generation
    }

    /// Called when the wait for `generation` elapses.
    pub fn settle(&mut self, generation: u64) -> Option<T> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.pending = None;
    }
}

/// Follows `source`, updating only after it has been quiet for `delay` ms. Pending
/// updates are cancelled when the owning component unmounts.
pub fn use_debounced<T>(source: Signal<T>, delay: u64) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    let mut settled = use_signal(|| source.peek().clone());
    let mut debouncer = use_signal(Debouncer::<T>::new);
    let mut pending_task = use_signal(|| None::<Task>);

    use_effect(move || {
        let value = source();
        if let Some(task) = pending_task.write().take() {
            task.cancel();
        }
        if *settled.peek() == value {
            debouncer.write().cancel();
            return;
        }

        let generation = debouncer.write().schedule(value);
        let task = spawn(async move {
            delay_ms(delay).await;
            let Some(value) = debouncer.write().settle(generation) else {
                return;
            };
            pending_task.set(None);
            settled.set(value);
        });
        pending_task.set(Some(task));
    });

    use_drop(move || {
        if let Some(task) = pending_task.peek().as_ref() {
            task.cancel();
        }
    });

    settled
}
