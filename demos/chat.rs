//! Minimal chat demo: start a conversation and take a second turn.
//!
//! Usage:
//!   OBOT_URL=http://localhost:8080 OBOT_TOKEN=... cargo run --example chat -- <agent-id>

use obot_rs::ClientBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("obot_rs=debug")),
        )
        .init();

    let base_url = std::env::var("OBOT_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let agent_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a1-helper".into());

    let mut builder = ClientBuilder::new(&base_url);
    if let Ok(token) = std::env::var("OBOT_TOKEN") {
        builder = builder.with_token(token);
    }
    let client = builder.build()?;

    let mut convo = client.chat(&agent_id, "Hello! What can you do?").await?;
    println!("[thread {}]", convo.thread_id());
    println!("{}", convo.last_reply());

    let reply = convo.send("Give me one concrete example.").await?;
    println!("{reply}");

    client.close().await?;
    Ok(())
}
