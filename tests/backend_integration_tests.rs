use quotes::core::prompt::PromptBuilder;
use quotes::inference::{
    AnthropicBackend, OpenAiBackend, QuoteBackend, QuoteError, QuoteRequest,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn openai(server: &MockServer) -> OpenAiBackend {
    OpenAiBackend::new(
        "test-key".to_string(),
        Some(server.uri()),
        Some("test-model".to_string()),
        PromptBuilder::default(),
    )
}

fn anthropic(server: &MockServer) -> AnthropicBackend {
    AnthropicBackend::new(
        "test-key".to_string(),
        Some(server.uri()),
        PromptBuilder::default(),
    )
}

fn request(theme: Option<&str>, liked: &[&str]) -> QuoteRequest {
    QuoteRequest {
        theme: theme.map(str::to_string),
        liked_history: liked.iter().map(|s| s.to_string()).collect(),
        verbose: false,
    }
}

/// Bodies of every request the mock server received, as JSON.
async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn openai_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn anthropic_reply(text: &str) -> Value {
    json!({
        "id": "msg_1",
        "type": "message",
        "content": [{"type": "text", "text": text}]
    })
}

// ============================================================================
// OpenAI Backend Tests
// ============================================================================

#[tokio::test]
async fn test_openai_returns_cleaned_quote() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply("  \"Stay curious\"\n")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut backend = openai(&mock_server);
    let quote = backend.fetch(&request(Some("wonder"), &[])).await.unwrap();
    assert_eq!(quote, "Stay curious");

    let bodies = received_bodies(&mock_server).await;
    assert_eq!(bodies[0]["model"], "test-model");
    assert_eq!(bodies[0]["messages"][0]["role"], "user");
    let prompt = bodies[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("themes of wonder"));
}

#[tokio::test]
async fn test_openai_prompt_lists_liked_quotes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply("Keep going")))
        .mount(&mock_server)
        .await;

    let mut backend = openai(&mock_server);
    backend
        .fetch(&request(None, &["Stay curious", "Begin again"]))
        .await
        .unwrap();

    let bodies = received_bodies(&mock_server).await;
    let prompt = bodies[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("1. \"Stay curious\""));
    assert!(prompt.contains("2. \"Begin again\""));
}

#[tokio::test]
async fn test_openai_http_error_keeps_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit reached"))
        .mount(&mock_server)
        .await;

    let mut backend = openai(&mock_server);
    let result = backend.fetch(&request(None, &[])).await;

    match result {
        Err(QuoteError::Http { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "Rate limit reached");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_no_choices_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let mut backend = openai(&mock_server);
    let result = backend.fetch(&request(None, &[])).await;
    assert!(matches!(result, Err(QuoteError::EmptyResponse)));
}

#[tokio::test]
async fn test_openai_garbled_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let mut backend = openai(&mock_server);
    let result = backend.fetch(&request(None, &[])).await;
    assert!(matches!(result, Err(QuoteError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Grab a free port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut backend = OpenAiBackend::new(
        "test-key".to_string(),
        Some(uri),
        None,
        PromptBuilder::default(),
    );
    let result = backend.fetch(&request(None, &[])).await;
    assert!(matches!(result, Err(QuoteError::Transport(_))));
}

// ============================================================================
// Anthropic Backend Tests
// ============================================================================

#[tokio::test]
async fn test_anthropic_sends_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("\"Begin again\"")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server);
    let quote = backend.fetch(&request(Some("resilience"), &[])).await.unwrap();
    assert_eq!(quote, "Begin again");

    let bodies = received_bodies(&mock_server).await;
    assert_eq!(bodies[0]["max_tokens"], 100);
    let prompt = bodies[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("themes of resilience"));
    assert!(prompt.contains("Draw inspiration from"));
    assert!(prompt.contains("should start with the letter"));
}

#[tokio::test]
async fn test_anthropic_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server);
    let result = backend.fetch(&request(None, &[])).await;
    assert!(matches!(result, Err(QuoteError::Http { status: 529, .. })));
}

#[tokio::test]
async fn test_anthropic_without_text_block_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1", "content": []})))
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server);
    let result = backend.fetch(&request(None, &[])).await;
    assert!(matches!(result, Err(QuoteError::EmptyResponse)));
}

#[tokio::test]
async fn test_anthropic_remembers_conversation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("Begin again")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server).remembering_conversation(true);
    backend.fetch(&request(None, &[])).await.unwrap();
    assert_eq!(backend.conversation().len(), 2);
    backend.fetch(&request(None, &["Begin again"])).await.unwrap();
    assert_eq!(backend.conversation().len(), 4);

    let bodies = received_bodies(&mock_server).await;
    let second = bodies[1]["messages"].as_array().unwrap();
    assert_eq!(second.len(), 3);
    assert_eq!(second[0]["role"], "user");
    assert_eq!(second[1]["role"], "assistant");
    assert_eq!(second[1]["content"], "Begin again");
    assert_eq!(second[2]["role"], "user");
}

#[tokio::test]
async fn test_anthropic_failed_call_is_not_remembered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server).remembering_conversation(true);
    assert!(backend.fetch(&request(None, &[])).await.is_err());
    assert!(backend.conversation().is_empty());
}

#[tokio::test]
async fn test_anthropic_is_stateless_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("Once")))
        .mount(&mock_server)
        .await;

    let mut backend = anthropic(&mock_server);
    backend.fetch(&request(None, &[])).await.unwrap();
    backend.fetch(&request(None, &[])).await.unwrap();

    let bodies = received_bodies(&mock_server).await;
    assert_eq!(bodies[1]["messages"].as_array().unwrap().len(), 1);
    assert!(backend.conversation().is_empty());
}
