//! Testing utilities for Redis-backed tests.
//!
//! Tests that start containers are `#[ignore]`d by default since they need a
//! running Docker daemon. Run them with `cargo test -- --ignored`.

mod containers;

pub use containers::{ContainerError, RedisContainer, RedisContainerConfig};
