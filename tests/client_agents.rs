//! Agent CRUD round trips against the mock server: listing, fetching,
//! creation with model-name resolution and tool validation, and
//! merge-on-update semantics.

mod common;

use std::sync::atomic::Ordering;

use common::start_server;
use obot_rs::{AgentCreate, AgentUpdate, ClientBuilder, ObotError};

#[tokio::test]
async fn list_agents_returns_typed_records() {
    let (base_url, _state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let agents = client.agents().list().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].name, "helper");
    assert_eq!(agents[0].id.as_deref(), Some("a1-abc"));
    assert_eq!(agents[0].model, "m1-gpt4o");
}

#[tokio::test]
async fn get_agent_by_id() {
    let (base_url, _state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let agent = client.agents().get("a1-abc").await.unwrap();
    assert_eq!(agent.name, "helper");
    assert!(agent.created.is_some());
    assert_eq!(
        agent.links.unwrap().invoke,
        "http://obot.local/api/invoke/a1-abc"
    );
}

#[tokio::test]
async fn create_resolves_model_name_to_id() {
    let (base_url, _state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let agent = client
        .agents()
        .create(AgentCreate::new("writer").with_model("gpt-4o"))
        .await
        .unwrap();

    // The mock echoes the request body back: the name reached the server
    // already resolved to the model id.
    assert_eq!(agent.model, "m1-gpt4o");
    assert_eq!(agent.id.as_deref(), Some("a2-new"));
}

#[tokio::test]
async fn create_with_unknown_model_fails_before_any_request() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let err = client
        .agents()
        .create(AgentCreate::new("writer").with_model("nope"))
        .await
        .unwrap_err();

    match err {
        ObotError::Validation {
            invalid, available, ..
        } => {
            assert_eq!(invalid, vec!["nope".to_string()]);
            // Only active models are offered.
            assert!(available.contains(&"gpt-4o".to_string()));
            assert!(available.contains(&"claude".to_string()));
            assert!(!available.contains(&"legacy".to_string()));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(state.create_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn inactive_model_name_does_not_resolve() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let err = client
        .agents()
        .create(AgentCreate::new("writer").with_model("legacy"))
        .await
        .unwrap_err();

    assert!(matches!(err, ObotError::Validation { .. }));
    assert_eq!(state.create_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_validates_tool_ids() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let err = client
        .agents()
        .create(AgentCreate::new("writer").with_tools(vec![
            "t1-search".to_string(),
            "bogus".to_string(),
            // A model provider id is not a valid tool id either.
            "t9-openai-provider".to_string(),
        ]))
        .await
        .unwrap_err();

    match err {
        ObotError::Validation { invalid, .. } => {
            assert_eq!(
                invalid,
                vec!["bogus".to_string(), "t9-openai-provider".to_string()]
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(state.create_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_with_valid_tools_goes_through() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let agent = client
        .agents()
        .create(
            AgentCreate::new("researcher")
                .with_description("does research")
                .with_tools(vec!["t1-search".to_string(), "t2-browser".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(agent.name, "researcher");
    assert_eq!(state.create_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_merges_changes_into_current_state() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let updated = client
        .agents()
        .update(
            "a1-abc",
            AgentUpdate::new().with_description("sharper helper"),
        )
        .await
        .unwrap();

    // Changed field applied, everything else preserved from the fetch.
    assert_eq!(updated.description, "sharper helper");
    assert_eq!(updated.name, "helper");
    assert_eq!(updated.prompt, "You are helpful.");
    assert_eq!(updated.model, "m1-gpt4o");

    // The PUT body carried the merged record, not just the delta.
    let body = state.last_put_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["name"], "helper");
    assert_eq!(body["description"], "sharper helper");
    assert_eq!(body["model"], "m1-gpt4o");
}

#[tokio::test]
async fn update_resolves_model_name() {
    let (base_url, state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let updated = client
        .agents()
        .update("a1-abc", AgentUpdate::new().with_model("claude"))
        .await
        .unwrap();

    assert_eq!(updated.model, "m3-claude");
    let body = state.last_put_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "m3-claude");
}

#[tokio::test]
async fn update_of_unknown_agent_is_an_api_error() {
    let (base_url, _state) = start_server().await;
    let client = ClientBuilder::new(&base_url).build().unwrap();

    let err = client
        .agents()
        .update("a9-ghost", AgentUpdate::new().with_name("ghost"))
        .await
        .unwrap_err();

    match err {
        ObotError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api, got {other:?}"),
    }
}
