/// Authentication module
///
/// Handles session token issuance/validation/revocation, bearer header
/// parsing, and credential checks.

mod bearer;
mod credentials;
mod token_store;

pub use bearer::extract_bearer_token;
pub use bearer::BearerError;
pub use bearer::BearerToken;
pub use credentials::validate_credentials;
pub use token_store::token_ttl;
pub use token_store::Clock;
pub use token_store::SystemClock;
pub use token_store::TokenStore;

#[cfg(test)]
pub(crate) use token_store::tests::ManualClock;
