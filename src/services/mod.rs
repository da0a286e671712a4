pub mod gemini;
pub mod normalize;
pub mod recommend;
pub mod search;
pub mod taste;

pub use gemini::GeminiClient;
pub use recommend::build_recommendations;
pub use search::search_entities;
pub use taste::{QlooClient, TasteGraph};
