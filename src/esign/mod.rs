//! Client for the eSign open platform (v3 API).
//!
//! ```rust,no_run
//! use esign_openim::esign::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?;
//!     let flow = client.sign_flow().detail("flow-1").await?;
//!     println!("{:?}", flow.data);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod files;
pub mod sign_flow;
pub mod signature;
pub mod templates;
pub mod types;

pub use client::{Client, ClientConfig};
pub use files::FileDigest;
pub use types::*;

use crate::error::{Result, SdkError};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters percent-encoded in an identifier placed in a path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Reject empty identifiers before they are placed into a path or body.
pub(crate) fn require_id<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(SdkError::missing(field));
    }
    Ok(value)
}

/// Require an identifier and percent-encode it for use as one path segment.
///
/// The encoded form is both signed and sent, so the two always agree.
pub(crate) fn path_id(value: &str, field: &str) -> Result<String> {
    let value = require_id(value, field)?;
    Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}
