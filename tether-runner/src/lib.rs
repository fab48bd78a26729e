//! Tether Runner
//!
//! Drives one long-running remote task end-to-end: submission, a delayed
//! polling loop, interpretation of status replies, timeout and cancellation.
//!
//! Architecture:
//! - Repository: remote task endpoints behind a trait (HTTP by default)
//! - Interpreter: maps status replies onto continue / terminal verdicts
//! - Session: the single control loop that owns state, timers and attempts
//! - Orchestrator: public entry point enforcing one in-flight task
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tether_core::domain::policy::PollPolicy;
//! use tether_core::domain::task::TaskDescriptor;
//! use tether_runner::Orchestrator;
//!
//! # async fn example() -> Result<(), tether_runner::RunError> {
//! let orchestrator = Orchestrator::http();
//! let policy = PollPolicy {
//!     initial_delay: Duration::from_secs(5),
//!     poll_interval: Duration::from_secs(3),
//!     max_attempts: 40,
//!     per_call_timeout: Duration::from_secs(10),
//!     not_found_grace: 2,
//!     malformed_tolerance: 3,
//! };
//! let descriptor = TaskDescriptor::new(
//!     "https://api.example.com/generate-subjects",
//!     serde_json::json!({ "topic": "rust" }),
//!     policy,
//! );
//!
//! let result = orchestrator.run(descriptor).await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod interpreter;
pub mod orchestrator;
pub mod repository;
pub mod session;

pub use error::RunError;
pub use interpreter::{PollContext, StatusInterpreter, Verdict};
pub use orchestrator::{Orchestrator, SessionHandle};
pub use repository::{HttpTaskRepository, TaskRepository};
pub use session::PollingSession;
