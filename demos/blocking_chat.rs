//! Blocking chat demo — no async runtime in sight.
//!
//! Usage:
//!   OBOT_URL=http://localhost:8080 cargo run --example blocking_chat -- <agent-id>

use obot_rs::blocking::ObotClient;

fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("OBOT_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let agent_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a1-helper".into());

    let client = ObotClient::new(&base_url)?;

    for agent in client.agents().list()? {
        println!("agent: {}", agent.name);
    }

    let mut convo = client.chat(&agent_id, "Hello from a plain thread!")?;
    println!("{}", convo.last_reply());

    // Stream the second turn chunk by chunk.
    for chunk in convo.send_stream("Stream me something.")? {
        print!("{}", chunk?);
    }
    println!();

    Ok(())
}
