//! Session layer
//!
//! A session owns the lifecycle of one submitted task: the initial delay,
//! the sequential status checks, the attempt budget and cooperative
//! cancellation. It is the only writer of its `SessionState`.

pub mod poller;

pub use poller::PollingSession;
