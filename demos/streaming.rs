//! Streaming chat demo: print reply chunks as they arrive.
//!
//! Usage:
//!   OBOT_URL=http://localhost:8080 cargo run --example streaming -- <agent-id>

use std::io::Write;

use obot_rs::ClientBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("OBOT_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let agent_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a1-helper".into());

    let client = ClientBuilder::new(&base_url).build()?;

    let mut stream = client
        .chat_stream(&agent_id, "Tell me a short story.", None)
        .await?;

    if let Some(thread_id) = stream.thread_id() {
        println!("[thread {thread_id}]");
    }

    while let Some(chunk) = stream.next().await {
        print!("{}", chunk?);
        std::io::stdout().flush()?;
    }
    println!();

    Ok(())
}
