//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP nonce, frame denial, etc.)
//! 5. Session layer (tower-sessions, signed cookie, in-memory store)
//! 6. Rate limiting on credential routes (governor)

pub mod auth;
pub mod nav;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalUser, RequireAdmin, clear_identities, set_current_admin, set_current_user,
};
pub use nav::Nav;
pub use rate_limit::credential_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::{CspNonce, security_headers_middleware};
pub use session::create_session_layer;
