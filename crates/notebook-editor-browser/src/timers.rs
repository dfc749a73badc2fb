//! Deadline timer for session ticks.
//!
//! Sessions keep their own task queues; this only wakes them up. Each arm
//! supersedes the previous one through a generation counter, so a stale wake
//! is dropped instead of cancelled.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use web_time::Instant;

#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer {
    generation: Rc<Cell<u64>>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `on_fire` at `deadline`, replacing any pending wake.
    pub fn arm(&self, deadline: Instant, on_fire: impl FnOnce() + 'static) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let delay = deadline.saturating_duration_since(Instant::now());
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let current = Rc::clone(&self.generation);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(millis).await;
            if current.get() == generation {
                on_fire();
            }
        });
    }

    /// Drop any pending wake.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}
