//! AI Adapters - Language model providers and the content generator.
//!
//! - `OpenAIProvider` talks to an OpenAI-compatible chat-completions API
//! - `MockAIProvider` replays scripted responses in tests
//! - `LlmContentGenerator` turns completions into coaching content

mod llm_content_generator;
mod mock_provider;
mod openai_provider;

pub use llm_content_generator::LlmContentGenerator;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
