/// Middleware module
///
/// Request-time access guard for protected routes.

mod jwt_middleware;

pub use jwt_middleware::{bearer_token, JwtMiddleware};
