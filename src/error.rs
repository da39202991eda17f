use thiserror::Error;

/// Errors raised by the host surface. The header itself cannot fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to build the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
