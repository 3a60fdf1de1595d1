//! Logging infrastructure
//!
//! - [`JsonlConversationLogger`]: JSONL file writer implementing the
//!   [`ConversationLogger`](agora_application::ConversationLogger) port

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
