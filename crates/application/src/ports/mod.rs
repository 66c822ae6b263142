//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod clock_port;
mod key_store_port;
mod text_generation_port;
mod user_repository_port;

pub use clock_port::Clock;
#[cfg(any(test, feature = "testing"))]
pub use clock_port::ManualClock;
#[cfg(test)]
pub use key_store_port::MockKeyStorePort;
pub use key_store_port::{BackendKind, KeyStorePort, window_start_ms};
#[cfg(test)]
pub use text_generation_port::MockTextGenerationPort;
pub use text_generation_port::{GenerationContext, GenerationTopic, TextGenerationPort};
#[cfg(test)]
pub use user_repository_port::MockUserRepositoryPort;
pub use user_repository_port::UserRepositoryPort;
