//! Identity & key registry for the IVS protocol.
//!
//! Tracks registered participants, their verification keys, and their
//! active/inactive status. Registration is a Trust Authority action; every
//! validator holds its own registry view (explicit context, no globals).

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::IdentityRegistry;
