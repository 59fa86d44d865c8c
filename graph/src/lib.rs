//! Exposure graph and propagation scoring for the IVS protocol.
//!
//! The graph is a derived, read-only view over committed contact edges and
//! the latest committed masked status per participant. Each validator owns
//! its own copy; the propagator walks it with a bounded breadth-first
//! traversal to accumulate severity- and distance-weighted exposure.

pub mod error;
pub mod graph;
pub mod propagate;

pub use error::GraphError;
pub use graph::ExposureGraph;
pub use propagate::{compute_raw_score, RawScore};
