//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod openai_generation_adapter;

pub use openai_generation_adapter::{OpenAiGenerationAdapter, system_prompt, user_prompt};
