//! # querypilot LLM SDK
//!
//! A minimal chat-completion SDK used by the querypilot agent. One provider
//! is implemented (OpenAI-compatible chat completions); everything upstream
//! of the wire types is provider-agnostic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use querypilot_llm::client::LlmClient;
//! use querypilot_llm::openai::OpenAIClient;
//! use querypilot_llm::types::{CompletionRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new("your-api-key")?.with_model("gpt-4o-mini");
//!     let response = client
//!         .complete(CompletionRequest {
//!             messages: vec![Message::user("How many users signed up this week?")],
//!             max_tokens: 1024,
//!             model: client.model_name().to_string(),
//!             system: Some("You are an expert PostgreSQL assistant.".to_string()),
//!             temperature: Some(0.7),
//!             top_p: Some(1.0),
//!             stop_sequences: None,
//!         })
//!         .await?;
//!     println!("{:?}", response.content);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod openai;
pub mod tools;
pub mod types;

#[cfg(test)]
mod tests {
    use crate::openai::OpenAIClient;
    use crate::types::{ContentBlock, Message, Role};

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAIClient::new("test-key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_openai_client_creation_empty_key() {
        let client = OpenAIClient::new("");
        assert!(client.is_err());
    }

    #[test]
    fn test_message_creation() {
        let message = Message::user("Hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content.len(), 1);
        match &message.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "Hello"),
        }
    }
}
