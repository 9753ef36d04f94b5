//! LLM provider adapters

mod gemini;
mod http_client;
mod openai_compatible;
mod registry;

pub use gemini::GeminiAdapter;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai_compatible::{OpenAiCompatibleAdapter, OpenAiCompatibleConfig};
pub use registry::{ProviderEndpoint, ProviderRegistry, ProvidersConfig};
