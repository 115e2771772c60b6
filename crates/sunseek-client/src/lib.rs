pub mod client;
pub mod error;
pub mod suggest;

pub use client::SunseekClient;
pub use error::ClientError;
pub use suggest::{SuggestSource, Suggester, SuggestionStream, SuggestionUpdate};
