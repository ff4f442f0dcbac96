//! `hubcmd`: exposes AWS Security Hub operations as typed shell commands.
//!
//! Every command goes through the same pipeline (see [`core::pipeline::execute`]):
//! raw host input is bound to a [`models::CommandSpec`], validated into an
//! [`core::context::ExecutionContext`], confirmed if it mutates state, mapped into a
//! [`client::BackendRequest`], sent through a [`client::BackendClient`] and finally
//! projected into the command's output.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Cancellation scope of one invocation, signalled by the host (e.g. Ctrl+C).
pub use tokio_util::sync::CancellationToken;

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
