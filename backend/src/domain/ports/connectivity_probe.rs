//! Port used by readiness checks to test backing-store reachability.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by connectivity probes.
    pub enum ConnectivityError {
        /// The backing store did not answer.
        Unreachable { message: String } => "backing store unreachable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn check(&self) -> Result<(), ConnectivityError>;
}
