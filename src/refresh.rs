use std::future::Future;
use std::sync::{atomic::Ordering, Arc};

use atomic::Atomic;

struct Flags {
    in_flight: Atomic<bool>,
    pending: Atomic<bool>,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            in_flight: Atomic::new(false),
            pending: Atomic::new(false),
        }
    }
}

/// Serializes refresh cycles.
///
/// At most one cycle runs at a time. Requests made while a cycle is running
/// collapse into a single follow-up cycle.
#[derive(Clone, Default)]
pub struct Refresher {
    flags: Arc<Flags>,
}

// clears `in_flight` even if the cycle panics
struct InFlight<'a>(&'a Flags);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::SeqCst);
    }
}

impl Refresher {
    pub fn is_busy(&self) -> bool {
        self.flags.in_flight.load(Ordering::SeqCst)
    }

    /// Ask for a refresh and drive cycles until no request is left
    ///
    /// Returns how many cycles this call ran; zero means the request was
    /// handed to the cycle already in flight.
    pub async fn request<F, Fut>(&self, mut cycle: F) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let flags = &*self.flags;
        flags.pending.store(true, Ordering::SeqCst);
        let mut ran = 0;

        loop {
            if flags.in_flight.swap(true, Ordering::SeqCst) {
                tracing::debug!("刷新进行中，请求已合并");
                return ran;
            }
            let guard = InFlight(flags);

            while flags.pending.swap(false, Ordering::SeqCst) {
                cycle().await;
                ran += 1;
            }
            drop(guard);

            // a request may have landed between the last check and the release
            if !flags.pending.load(Ordering::SeqCst) {
                return ran;
            }
        }
    }
}
