//! Candidate evaluation and ranking engine for recruiting workflows.
//!
//! The engine lives in [`workflows::hiring`]; configuration, telemetry, and the
//! application error type are shared with the `recruit-ai-api` service binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
