//! Panic capture for predicates and case bodies
//!
//! A panic raised inside [`catch`] becomes its message and is kept away from
//! the panic hook, so no `thread '...' panicked at` line lands in the middle
//! of a report. Panics anywhere else still go to the previously installed
//! hook.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::debug;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                debug!(location = ?info.location().map(|l| l.to_string()), "panic captured");
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into its message
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    install_hook();

    let was_capturing = CAPTURING.with(|flag| flag.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|flag| flag.set(was_capturing));

    outcome.map_err(|payload| panic_message(payload.as_ref()))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown error".to_string()
    }
}
