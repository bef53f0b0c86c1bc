use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, FormatError>;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Failed to encode or decode model data: {0}")]
    Encoding(#[from] Box<bincode::ErrorKind>),
    #[error("Failed to read model data: {0}")]
    Io(#[from] std::io::Error),
}
