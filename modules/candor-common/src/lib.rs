pub mod types;
pub mod lexicon;
pub mod config;
pub mod error;

pub use types::*;
pub use lexicon::Lexicon;
pub use config::Config;
pub use error::CandorError;
