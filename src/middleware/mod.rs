/// Middleware module
///
/// Session authentication and CORS for the API routes.

mod cors;
mod session_auth;

pub use cors::apply_cors_headers;
pub use cors::cors_headers;
pub use cors::preflight_response;
pub use session_auth::SessionAuth;
