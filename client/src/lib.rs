//! Transport to the remote ledger service.
//!
//! - [`Authenticator`] supplies a bearer token before every authenticated request
//! - [`ndjson`] turns a chunked HTTP body into newline-delimited records
//! - [`LedgerApi`] is the seam the synchronization engine talks to;
//!   [`HttpLedgerClient`] implements it over `reqwest`

pub mod auth;
pub mod error;
pub mod ledger;
pub mod ndjson;

pub use auth::{Authenticator, StaticAuthenticator};
pub use error::ClientError;
pub use ledger::{HttpLedgerClient, InstantResponse, LedgerApi, LineStream};
pub use ndjson::MAX_LINE_LENGTH;
