//! Cancellable execution on a deadline.
//!
//! Rust's `regex` crate has no built-in way to interrupt a running match,
//! so a pattern with catastrophic backtracking can only be bounded by
//! running it on a worker thread and giving up on the result (not the
//! thread itself, which is leaked as daemon-like background work) if it
//! doesn't finish in time.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Run `f` on a separate thread and wait up to `deadline` for it to
/// finish. Returns `None` on timeout; the worker thread is abandoned,
/// not killed, since Rust has no safe thread-cancellation primitive.
pub fn run_with_deadline<T, F>(deadline: Duration, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(deadline).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_closure_returns_some() {
        let result = run_with_deadline(Duration::from_millis(200), || 1 + 1);
        assert_eq!(result, Some(2));
    }

    #[test]
    fn slow_closure_times_out() {
        let result = run_with_deadline(Duration::from_millis(10), || {
            thread::sleep(Duration::from_millis(200));
            42
        });
        assert_eq!(result, None);
    }
}
