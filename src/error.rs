//! Error module for the Rusty Fire library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum NetError {
    /// Error for invalid parameters, e.g., a non-positive number of nodes.
    InvalidParameter(String),
    /// Error for out of bounds access, e.g., node not found.
    OutOfBounds(String),
    /// Error for drawing a connection target from an empty node pool.
    EmptyPool,
    /// Error for removing a connection from a node without outbound connections.
    NoConnection { node_id: usize },
    /// Error for incompatible topology, e.g., the number of connections and nodes do not fit.
    IncompatibleTopology(String),
    /// The destination did not fire within the allowed number of source activations.
    StepBudgetExceeded {
        source_id: usize,
        dest_id: usize,
        max_steps: usize,
    },
    /// A single activation triggered more cascading activations than allowed.
    CascadeOverflow { node_id: usize, max_cascade: usize },
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            NetError::OutOfBounds(e) => write!(f, "Index out of bounds: {}", e),
            NetError::EmptyPool => {
                write!(f, "Cannot draw a connection target from an empty node pool")
            }
            NetError::NoConnection { node_id } => {
                write!(
                    f,
                    "No connection to remove: node {} has no outbound connections",
                    node_id
                )
            }
            NetError::IncompatibleTopology(e) => write!(f, "Incompatible topology: {}", e),
            NetError::StepBudgetExceeded {
                source_id,
                dest_id,
                max_steps,
            } => write!(
                f,
                "Propagation from node {} to node {} did not complete within {} steps",
                source_id, dest_id, max_steps
            ),
            NetError::CascadeOverflow {
                node_id,
                max_cascade,
            } => write!(
                f,
                "Activation of node {} exceeded the cascade budget of {} activations",
                node_id, max_cascade
            ),
            NetError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for NetError {}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        NetError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        NetError::IOError(e.to_string())
    }
}
