//! Client for the OpenIM server REST API.
//!
//! ```rust,no_run
//! use esign_openim::openim::Client;
//! use esign_openim::MemoryCache;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env(Arc::new(MemoryCache::new()))?;
//!     let info = client.users().users_info(&["u1"]).await?;
//!     println!("{:?}", info.data);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod conversations;
pub mod groups;
pub mod message;
pub mod messages;
pub mod token;
pub mod types;
pub mod users;

pub use client::{Client, ClientConfig};
pub use message::*;
pub use token::{TokenCache, TokenManager};
pub use types::*;
