//! Trailing-edge debounce for input handlers.
//!
//! One in-flight timer per debouncer: every new call bumps a generation
//! counter, and only the task holding the latest generation runs its
//! callback. Must be used from within a Dioxus scope (the delayed work is
//! spawned on the component's executor).

use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::spawn;

/// Delay used by the form's preview/draft listeners.
pub const INPUT_DEBOUNCE_MS: u64 = 500;

#[derive(Clone, Default)]
pub struct Debouncer {
    generation: Rc<Cell<u64>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` after `delay_ms`, cancelling any earlier
    /// pending call on this debouncer.
    pub fn debounce<F>(&self, delay_ms: u64, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let latest = self.generation.clone();
        spawn(async move {
            sleep_ms(delay_ms).await;
            if latest.get() == generation {
                callback();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}
