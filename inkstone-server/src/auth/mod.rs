//! Authentication: password hashing and bearer tokens

pub mod password;
pub mod token;

pub use token::Claims;

use thiserror::Error;

/// Authentication failure modes
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing or verification failed internally
    #[error("password hashing failed")]
    Hash,

    /// Token could not be signed
    #[error("token signing failed")]
    Sign,

    /// Token is missing, malformed, tampered with, or expired.
    /// Collapsed into one variant: the client is told no more than
    /// "not authorized".
    #[error("invalid token")]
    InvalidToken,
}
