pub mod analyzer;
pub mod config;
pub use config::LLMConfig;

pub use analyzer::Analyzer;
