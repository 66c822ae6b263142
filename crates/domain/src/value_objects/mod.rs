//! Value Objects - Immutable, identity-less domain primitives

mod deck_type;
mod question_text;
mod rate_limit_action;
mod rate_limit_policy;
mod subject_id;

pub use deck_type::DeckType;
pub use question_text::{QuestionText, sanitize_text};
pub use rate_limit_action::RateLimitAction;
pub use rate_limit_policy::RateLimitPolicy;
pub use subject_id::SubjectId;
