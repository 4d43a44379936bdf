//! LLM Adapters - 语言模型适配器

mod openai_chat_client;

pub use openai_chat_client::{OpenAiChatClient, OpenAiChatConfig};
