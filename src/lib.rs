//! This crate provides tools for simulating networks of threshold-firing nodes in Rust and
//! measuring how long activity takes to propagate between two of them.
//!
//! # Creating Networks
//!
//! ## At Random
//!
//! ```rust
//! use rusty_fire::network::Network;
//! use rusty_fire::topology::Topology;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! // Create 50 unconnected nodes with thresholds in [0, 4) and zero initial level
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut network = Network::build(50, 4, 0.0, &mut rng).unwrap();
//!
//! // Add 200 random connections, then one more from node 7
//! network.wire(200, Topology::Random, &mut rng).unwrap();
//! network.add_connection(7, &mut rng).unwrap();
//!
//! assert_eq!(network.num_nodes(), 50);
//! assert_eq!(network.num_connections(), 201);
//! ```
//!
//! ## From Scratch
//!
//! ```rust
//! use rusty_fire::network::Network;
//! use rusty_fire::node::Node;
//!
//! let mut network = Network::from_nodes(vec![Node::new(0, 3), Node::new(1, 1)]).unwrap();
//! network.connect(0, 1).unwrap();
//! ```
//!
//! # Measuring Propagation
//!
//! ```rust
//! use rusty_fire::config::PropagationConfig;
//! use rusty_fire::error::NetError;
//! use rusty_fire::network::Network;
//! use rusty_fire::node::Node;
//!
//! let mut network = Network::from_nodes(vec![Node::new(0, 3), Node::new(1, 1), Node::new(2, 1)])
//!     .unwrap()
//!     .with_config(PropagationConfig::new(100, 1_000).unwrap());
//! network.connect(0, 1).unwrap();
//!
//! // Node 0 fires on its third activation, which makes node 1 fire
//! assert_eq!(network.measure_propagation(0, 1), Ok(3));
//!
//! // Node 2 is unreachable: the step budget is exhausted
//! assert!(matches!(network.measure_propagation(0, 2), Err(NetError::StepBudgetExceeded { .. })));
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod node;
pub mod topology;

/// The default maximum number of source activations in a propagation measurement.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;
/// The default maximum number of activations delivered by a single cascade.
pub const DEFAULT_MAX_CASCADE: usize = 1_000_000;
