use thiserror::Error;

pub const NO_CHARACTER_CLASS: &str = "password must include at least one character class";
pub const ZERO_LENGTH: &str = "minimum length must be at least 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidRequest(&'static str),
}
