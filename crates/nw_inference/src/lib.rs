pub mod models;

pub use models::{create_model, available_models, GenerationConfig};
pub use models::dummy::DummyModel;
pub use models::gemini::GeminiModel;

pub mod prelude {
    pub use super::models::create_model;
    pub use nw_core::{Config, Error, Result, Summarizer};
}
