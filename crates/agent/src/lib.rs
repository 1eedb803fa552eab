//! The advisor: one grounded question, one answer.
//!
//! 1. **Check** the question and the selected log source
//! 2. **Load** that source's grounding document (or a fallback line)
//! 3. **Ask** the assistant with the prior turns as context
//! 4. **Record** the exchange in the conversation if it succeeded

pub mod advisor;

pub use advisor::{Advisor, NO_KB_CONTENT};
