use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password digest is malformed")]
    MalformedDigest,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token serialization error: {0}")]
    Serialization(String),

    #[error("Token lifetime of {0}s is out of range")]
    TtlOutOfRange(i64),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatusError {
    #[error("Invalid order status '{0}'")]
    Unknown(String),
}
