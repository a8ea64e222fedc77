//! Scheduler module
//!
//! Tracks launched tasks until the container service reports them stopped.

mod poller;

pub use poller::StatusPoller;
