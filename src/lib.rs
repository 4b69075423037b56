pub mod charset;
pub mod error;
pub mod generator;
pub mod history;
pub mod rng;
pub mod seed;

pub use charset::{CharacterClass, ClassSet};
pub use error::Error;
pub use generator::{GenerationRequest, compose, generate, generate_password, sample};
pub use history::{History, HistoryEntry};
pub use rng::SeededRng;
pub use seed::{DerivedSeed, SeedInput, derive_seed};
