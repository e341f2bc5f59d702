//! Cognita reasoning-service integration
//!
//! - [`chat`]: HTTP providers implementing
//!   [`ReasoningService`](cognita_core::ReasoningService)
//! - [`extraction`]: the [`ExtractionClient`], which turns one block of text
//!   into knowledge atoms through a reasoning service

pub mod chat;
pub mod extraction;

pub use chat::{create_reasoning_service, OllamaChatProvider, OpenAIChatProvider};
pub use extraction::{
    parse_atoms_response, truncate_chars, ExtractionClient, BEGIN_MARKER, END_MARKER,
};
