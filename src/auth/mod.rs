/// Authentication module
///
/// Credential storage, password hashing, and stateless JWT access/refresh tokens.

mod claims;
pub mod credentials;
mod jwt;
mod password;

pub use claims::{Claims, TokenKind};
pub use jwt::{
    generate_access_token, generate_refresh_token, issue_token_pair, refresh_access_token,
    validate_access_token, validate_refresh_token, TokenPair,
};
pub use password::{hash_password, verify_password};
