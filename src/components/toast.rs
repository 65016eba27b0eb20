//! Transient success/error notifications.
//!
//! `ToastManager` is created once by the shell and handed out through context; the
//! shell calls `shutdown` when it is dropped. Each entry is removed after the
//! configured duration, independently of the others.
//! Removal timers run in the `ToastContainer` scope so that a toast raised by a
//! component that unmounts right after (a deleted track's row, say) still expires.

use crate::components::Icon;
use crate::utils::delay_ms;
use dioxus::core::Task;
use dioxus::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
        }
    }

    fn test_id(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    entries: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|toast| toast.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Toast] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|toast| toast.id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct ToastManager {
    queue: Signal<ToastQueue>,
    timers: Signal<HashMap<u64, Task>>,
    duration_ms: u64,
}

impl ToastManager {
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        match kind {
            ToastKind::Success => tracing::info!("{message}"),
            ToastKind::Error => tracing::warn!("{message}"),
        }
        let mut queue = self.queue;
        let id = queue.write().push(kind, message);
        id
    }

    pub fn dismiss(&self, id: u64) {
        let mut timers = self.timers;
        if let Some(task) = timers.write().remove(&id) {
            task.cancel();
        }
        let mut queue = self.queue;
        queue.write().remove(id);
    }

    /// Cancels every pending removal and empties the queue.
    pub fn shutdown(&self) {
        let mut timers = self.timers;
        if let Ok(mut timers) = timers.try_write() {
            for (_, task) in timers.drain() {
                task.cancel();
            }
        };
        let mut queue = self.queue;
        if let Ok(mut queue) = queue.try_write() {
            queue.clear();
        };
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.read().entries().to_vec()
    }
}

pub fn use_toast_manager(duration_ms: u64) -> ToastManager {
    let queue = use_signal(ToastQueue::default);
    let timers = use_signal(HashMap::<u64, Task>::new);
    ToastManager {
        queue,
        timers,
        duration_ms,
    }
}

#[component]
pub fn ToastContainer(manager: ToastManager) -> Element {
    let queue = manager.queue;
    let mut timers = manager.timers;
    let duration_ms = manager.duration_ms;

    // Schedule removal for entries that have no timer yet.
    use_effect(move || {
        let ids: Vec<u64> = queue.read().ids().collect();
        let unscheduled: Vec<u64> = {
            let timers = timers.peek();
            ids.into_iter().filter(|id| !timers.contains_key(id)).collect()
        };
        for id in unscheduled {
            let mut queue = queue;
            let task = spawn(async move {
                delay_ms(duration_ms).await;
                timers.write().remove(&id);
                queue.write().remove(id);
            });
            timers.write().insert(id, task);
        }
    });

    let toasts = manager.toasts();

    rsx! {
        div { class: "toast-container", "data-testid": "toast-container",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: toast.kind.class(),
                    "data-testid": toast.kind.test_id(),
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-dismiss",
                        aria_label: "Dismiss",
                        onclick: move |_| manager.dismiss(toast.id),
                        Icon { name: "x".to_string(), class: "icon-sm".to_string() }
                    }
                }
            }
        }
    }
}
