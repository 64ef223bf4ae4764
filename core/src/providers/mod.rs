pub mod gateway;
pub mod openai;

pub use gateway::{ModelGateway, ModelReply};
pub use openai::OpenAIProvider;
