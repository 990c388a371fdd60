use std::{any::Any, future::Future};

use tokio::runtime::{Builder, Handle, RuntimeFlavor};

use crate::ObservableError;

/// Decides how one asynchronous subscription drives its private runtime.
///
/// `subscribe` may be reached from plain threads, from blocking-pool threads,
/// or from a worker of an ambient multi-thread tokio runtime. On a
/// multi-thread runtime every such thread is handed over with
/// `block_in_place` for as long as the subscription runs. The thread that
/// drives a current-thread runtime must not block at all; threads of its
/// blocking pool (`spawn_blocking`) are treated like plain threads.
pub(super) struct SubscriptionRuntime {
    in_place: bool,
}

pub(super) fn subscription_runtime() -> SubscriptionRuntime {
    let in_place = Handle::try_current()
        .is_ok_and(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread);
    SubscriptionRuntime { in_place }
}

impl SubscriptionRuntime {
    /// Builds a current-thread runtime with the time driver, drives `fut` to
    /// completion on the calling thread and shuts the runtime down.
    pub(super) fn block_on<F: Future>(self, fut: F) -> Result<F::Output, ObservableError> {
        let run = move || -> Result<F::Output, ObservableError> {
            // Built and dropped here so that on a worker both happen inside
            // `block_in_place`; dropping a runtime from async context panics.
            let rt = Builder::new_current_thread().enable_time().build()?;
            Ok(rt.block_on(fut))
        };
        if self.in_place {
            tokio::task::block_in_place(run)
        } else {
            run()
        }
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
