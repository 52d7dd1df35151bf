//! Ways for the physics thread to pace itself against the render thread.

use std::sync::{Arc, Condvar, Mutex};

/// A WaitStrategy is a callable that blocks the physics thread until
/// it is allowed to compute the next tick according to some policy.
pub trait WaitStrategy: FnMut() + Send + 'static {}
impl<W> WaitStrategy for W where W: FnMut() + Send + 'static {}

/// Run as fast as possible. Used by tests and headless runs.
pub fn never_wait() {}

/// One tick per rendered frame.
///
/// Returns a notifier for the render thread and a WaitStrategy for the physics thread.
/// The WaitStrategy returns once the notifier has been called at least once since the last wait.
///
/// In between waiting moments, multiple calls to the notifier are equivalent to a single call,
/// so a slow frame does not cause a burst of ticks later on.
pub fn continue_once_of_allowed() -> (impl FnMut(), impl WaitStrategy) {
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let physics_side = gate.clone();

    let wait_strategy = move || {
        let (blocked, cvar) = &*physics_side;
        *cvar.wait_while(blocked.lock().unwrap(), |blocked| *blocked).unwrap() = true;
    };

    let notifier = move || {
        let (blocked, cvar) = &*gate;
        *blocked.lock().unwrap() = false;
        cvar.notify_all();
    };

    (notifier, wait_strategy)
}
