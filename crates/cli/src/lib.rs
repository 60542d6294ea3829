//! issuescout: ask questions about a GitHub repository's issues.
//!
//! The binary wires the pieces together; this library part holds the
//! argument model, the interactive session and the service wiring so they can
//! be tested without a terminal.

pub mod app;
pub mod args;
pub mod progress;
pub mod session;

pub use app::App;
pub use args::{Cli, Commands};
pub use session::{question_loop, should_update, Answerer};
