//! # esign-openim
//!
//! Rust SDKs for two vendor REST APIs:
//!
//! - [`esign`]: the eSign open platform (v3). Identity verification, file
//!   upload, sign flows and document templates, with every request signed
//!   with HMAC-SHA256.
//! - [`openim`]: the OpenIM server REST API. Users, messages, groups and
//!   conversations, authenticated with a cached admin token.
//!
//! Both clients share one request pipeline: a pooled HTTP client, a
//! [`RetryPolicy`] with exponential backoff, and envelope decoding that maps
//! failures onto [`SdkError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esign_openim::esign::{self, CreateByFileRequest, SignDoc, SignField, Signer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = esign::Client::new("app_id", "app_secret")?;
//!
//!     // Upload the contract
//!     let file = client.files().upload_file("contract.pdf").await?;
//!
//!     // Create a flow with one signer
//!     let flow = client.sign_flow().create_by_file(CreateByFileRequest {
//!         docs: vec![SignDoc::new(&file.file_id, &file.file_name)],
//!         sign_flow_title: "Service agreement".to_string(),
//!         signers: Some(vec![Signer::person(
//!             "psn-1",
//!             None,
//!             1,
//!             Some(vec![SignField::new(0, false).at(1, 0.7, 0.2)]),
//!         )]),
//!         ..Default::default()
//!     }).await?.into_data()?;
//!
//!     client.sign_flow().start(&flow.sign_flow_id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Messaging
//!
//! ```rust,no_run
//! use esign_openim::openim::{self, SendOptions, TextContent, UserInfo};
//! use esign_openim::MemoryCache;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = openim::Client::new(
//!         "http://127.0.0.1:10002",
//!         "imAdmin",
//!         "openIM123",
//!         Arc::new(MemoryCache::new()),
//!     )?;
//!
//!     let users = vec![UserInfo::new("u1", "Alice"), UserInfo::new("u2", "Bob")];
//!     client.users().register(users).await?;
//!     let sent = client
//!         .messages()
//!         .send_text_single("u1", "u2", TextContent::new("hello"), SendOptions::default())
//!         .await?
//!         .into_data()?;
//!
//!     println!("Delivered as {}", sent.server_msg_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, SdkError>`:
//!
//! ```rust,no_run
//! use esign_openim::{esign, SdkError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = esign::Client::new("app_id", "app_secret").unwrap();
//!
//!     match client.files().get("file-1").await {
//!         Ok(file) => println!("{:?}", file.data),
//!         Err(SdkError::Business { code, message, .. }) => {
//!             println!("rejected [{code}]: {message}")
//!         }
//!         Err(e) if e.is_retryable() => println!("temporary failure: {e}"),
//!         Err(e) => println!("Error: {e}"),
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Requests are traced with the `tracing` crate; install a subscriber to see
//! them. Signatures and tokens are masked.

pub mod cache;
pub mod error;
pub mod esign;
mod http;
pub mod openim;
pub mod retry;

// Re-export shared types at the crate root
pub use cache::{Cache, MemoryCache};
pub use error::{Result, SdkError};
pub use retry::RetryPolicy;
