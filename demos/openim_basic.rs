//! Basic usage example for the OpenIM client.
//!
//! This example demonstrates:
//! - Creating a client with an in-memory token cache
//! - Registering users
//! - Sending text and custom messages
//! - Creating a group and messaging it
//!
//! Run with:
//! ```bash
//! OPEN_IM_API_URL=http://127.0.0.1:10002 OPEN_IM_APP_ID=imAdmin OPEN_IM_APP_SECRET=openIM123 \
//!     RUST_LOG=esign_openim=info cargo run --example openim_basic
//! ```

use esign_openim::openim::{Client, CustomContent, GroupInfo, SendOptions, TextContent, UserInfo};
use esign_openim::MemoryCache;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env(Arc::new(MemoryCache::new()))?;
    println!("Using {}", client.base_url());

    // Register two users
    println!("\nRegistering users...");
    client
        .users()
        .register(vec![UserInfo::new("demo_alice", "Alice"), UserInfo::new("demo_bob", "Bob")])
        .await?;

    // Direct messages
    println!("\nSending messages...");
    let sent = client
        .messages()
        .send_text_single(
            "demo_alice",
            "demo_bob",
            TextContent::new("Hello, Bob!"),
            SendOptions {
                sender_nickname: Some("Alice".to_string()),
                ..Default::default()
            },
        )
        .await?
        .into_data()?;
    println!("  Text:     {}", sent.server_msg_id);

    let sent = client
        .messages()
        .send_custom_single(
            "demo_alice",
            "demo_bob",
            CustomContent::new(r#"{"kind":"contract_signed"}"#),
            SendOptions::default(),
        )
        .await?
        .into_data()?;
    println!("  Custom:   {}", sent.server_msg_id);

    // A group for both users
    println!("\nCreating group...");
    let group = client
        .groups()
        .create(
            "demo_alice",
            &["demo_bob"],
            GroupInfo {
                group_name: "demo".to_string(),
                ..Default::default()
            },
            &[],
        )
        .await?;
    let group_id = group
        .data
        .as_ref()
        .and_then(|d| d["groupInfo"]["groupID"].as_str())
        .unwrap_or_default()
        .to_string();
    println!("  Group ID: {group_id}");

    client
        .messages()
        .send_text_group(
            "demo_alice",
            &group_id,
            TextContent::new("Welcome!"),
            SendOptions::default(),
        )
        .await?;

    let conversations = client
        .conversations()
        .sorted_list("demo_bob", &[])
        .await?;
    println!("\nBob's conversations: {:?}", conversations.data);

    println!("\nDone!");
    Ok(())
}
