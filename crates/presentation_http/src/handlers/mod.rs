//! HTTP request handlers

pub mod health;
pub mod updates;
