//! Claudegram bridge: chat messages in, Claude CLI replies out.
//!
//! This crate contains:
//! - **invoker**: runs the `claude` executable with a timeout
//! - **auth**: allow-list gate
//! - **workdir**: the shared working directory behind `/cd`
//! - **chunker**: splits long replies for the transport's message limit
//! - **commands** / **files**: slash commands and `/getfile`
//! - **orchestrator**: the receive loop tying it all together

pub mod auth;
pub mod chunker;
pub mod commands;
pub mod error;
pub mod files;
pub mod invoker;
pub mod orchestrator;
pub mod workdir;

pub use auth::AuthorizationPolicy;
pub use commands::{BridgeCommand, BOT_COMMANDS};
pub use error::{DirectoryNotFound, FileRetrievalError};
pub use invoker::{ClaudeCli, InvocationRequest, InvocationResult, Invoker};
pub use orchestrator::Bridge;
pub use workdir::WorkingDirectory;
