//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and request timing.

pub mod trace;

pub use trace::Trace;
