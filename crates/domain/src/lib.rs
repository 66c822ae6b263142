//! Domain layer for Arcana
//!
//! Contains the value objects, entities and domain errors shared by the
//! cache, the rate limiter and the conversational services.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
