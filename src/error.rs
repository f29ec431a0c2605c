use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("the question model failed: {0}")]
    Model(#[from] chatgpt::err::Error),
    #[error("the question model is unavailable: {0}")]
    Unavailable(String),
    #[error("the question model returned no questions")]
    Empty,
    #[error("the question model returned {got} of {expected} questions")]
    Incomplete { expected: usize, got: usize },
    #[error("a topic is required to generate questions")]
    BlankTopic,
    #[error("cannot generate {0} questions, pick between 1 and 5")]
    CountOutOfRange(usize),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}
