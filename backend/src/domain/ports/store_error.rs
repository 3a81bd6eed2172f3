//! Failures shared by every persistence port.

use tracing::error;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by store adapters.
    pub enum StoreError {
        /// The store could not be reached or a connection could not be checked out.
        Connection { message: String } => "store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        error!(error = %value, "store operation failed");
        match value {
            StoreError::Connection { .. } => Error::service_unavailable("store unavailable"),
            StoreError::Query { .. } => Error::internal(value.to_string()),
        }
    }
}
