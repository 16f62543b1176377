//! End-to-end signing example for the eSign client.
//!
//! This example demonstrates:
//! - Creating a client from the environment
//! - Uploading a contract
//! - Creating and starting a sign flow
//! - Fetching the signer's signing page
//!
//! Run with:
//! ```bash
//! ESIGN_APP_ID=... ESIGN_APP_SECRET=... ESIGN_SANDBOX=true PSN_ID=... \
//!     RUST_LOG=esign_openim=debug cargo run --example esign_sign_flow -- contract.pdf
//! ```

use esign_openim::esign::{
    Client, CreateByFileRequest, SignDoc, SignField, SignUrlRequest, Signer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let contract = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "contract.pdf".to_string());
    let psn_id = std::env::var("PSN_ID").expect("PSN_ID environment variable required");

    let client = Client::from_env()?;
    println!("Using {} (sandbox: {})", client.base_url(), client.is_sandbox());

    // Upload the document
    println!("\nUploading {contract}...");
    let file = client.files().upload_file(&contract).await?;
    println!("  File ID:  {}", file.file_id);
    println!("  Size:     {} bytes", file.file_size);

    // Create the flow with one signer on page 1
    println!("\nCreating sign flow...");
    let flow = client
        .sign_flow()
        .create_by_file(CreateByFileRequest {
            docs: vec![SignDoc::new(&file.file_id, &file.file_name)],
            sign_flow_title: "Service agreement".to_string(),
            signers: Some(vec![Signer::person(
                &psn_id,
                None,
                1,
                Some(vec![SignField::new(0, false).at(1, 0.7, 0.2)]),
            )]),
            ..Default::default()
        })
        .await?
        .into_data()?;
    println!("  Flow ID:  {}", flow.sign_flow_id);

    client.sign_flow().start(&flow.sign_flow_id).await?;
    println!("Flow started.");

    let page = client
        .sign_flow()
        .sign_url(&flow.sign_flow_id, &psn_id, SignUrlRequest::default())
        .await?
        .into_data()?;
    println!("\nSigning page: {}", page.short_url.unwrap_or(page.url));

    let detail = client.sign_flow().detail(&flow.sign_flow_id).await?;
    if let Some(data) = detail.data {
        println!("Status: {}", data["signFlowStatus"]);
    }

    println!("\nDone!");
    Ok(())
}
