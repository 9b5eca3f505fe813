//! Credential adapters backed by `argon2` and `jsonwebtoken`.

pub mod password;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use token::JwtTokenIssuer;
