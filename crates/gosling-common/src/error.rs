use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    /// A dialect name that is not registered. Displays the name quoted.
    #[error("{0:?}: unknown dialect")]
    UnknownDialect(String),
}
