use mcbench_core::{BenchError, RunConfig};
use mcbench_benchmark::{GenerationOutcome, OllamaClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, max_retries: u32) -> RunConfig {
    RunConfig {
        model_name: "testmodel".to_string(),
        ollama_host: server.uri(),
        num_responses: 1,
        max_retries,
        ..RunConfig::default()
    }
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": {"role": "assistant", "content": content}
    }))
}

#[tokio::test]
async fn generate_returns_completion_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply("Final Answer: B"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let outcome = client
        .generate(&test_config(&server, 3), "pick one")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            text: "Final Answer: B".to_string()
        }
    );
}

#[tokio::test]
async fn generate_retries_then_fails_without_raising() {
    let server = MockServer::start().await;
    // max_retries = 2 allows three attempts in total.
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let outcome = client
        .generate(&test_config(&server, 2), "pick one")
        .await
        .unwrap();

    match outcome {
        GenerationOutcome::Failed { error_detail } => {
            assert!(error_detail.contains("500"), "detail: {error_detail}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_recovers_on_a_later_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply("A"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let outcome = client
        .generate(&test_config(&server, 1), "pick one")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            text: "A".to_string()
        }
    );
}

#[tokio::test]
async fn missing_model_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let err = client
        .generate(&test_config(&server, 5), "pick one")
        .await
        .unwrap_err();

    assert!(matches!(err, BenchError::ModelNotAvailable(m) if m == "testmodel"));
}

#[tokio::test]
async fn empty_completion_counts_as_a_failed_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply(""))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply("C"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let outcome = client
        .generate(&test_config(&server, 1), "pick one")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            text: "C".to_string()
        }
    );
}

#[tokio::test]
async fn list_models_returns_served_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "llama3.1:latest", "size": 4661224676u64, "digest": "abc"},
                {"name": "phi4:14b", "size": 9053114000u64, "digest": "def"}
            ]
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri());
    let names = client.list_models().await.unwrap();
    assert_eq!(names, vec!["llama3.1:latest", "phi4:14b"]);
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    // Nothing listens on port 1.
    let client = OllamaClient::new("http://127.0.0.1:1");
    let err = client.list_models().await.unwrap_err();
    assert!(matches!(err, BenchError::Http(_)));
}
