use std::time::Duration;

use ailo_core::config::LlmSettings;
use ailo_llm::{get_default_model, ChatMessage, CompletionModel, FakeModel, LlmError, OpenAiCompatibleClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve a single canned HTTP response and hand back the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}/v1", listener.local_addr().expect("addr"));
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 { break; }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap_or(0)))
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length { break; }
            }
        }
        let response = format!("HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len());
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });
    (base_url, handle)
}

fn settings(base_url: String) -> LlmSettings {
    LlmSettings { base_url, model: "test-model".into(), timeout_secs: 5, ..LlmSettings::default() }
}

#[tokio::test]
async fn fake_model_cites_first_document() {
    let model = FakeModel::new();
    let prompt = "Kontekst:\n**Dokument 1: Sykepleier**\n**URL: https://utdanning.no/yrker/beskrivelse/sykepleier** (OPPGI DENNE KILDEN I SVARET DITT)\n\nSpørsmål: Hva gjør en sykepleier?";
    let answer = model.complete(&[ChatMessage::system("system"), ChatMessage::user(prompt)]).await.expect("answer");
    assert!(answer.contains("Sykepleier"));
    assert!(answer.contains("(Kilde: https://utdanning.no/yrker/beskrivelse/sykepleier)"));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn fake_model_without_context_admits_it() {
    let model = FakeModel::new();
    let answer = model.complete(&[ChatMessage::user("Hva tjener en astronaut?")]).await.expect("answer");
    assert!(answer.contains("ikke informasjon"));
    assert!(!answer.contains("Kilde"));
}

#[tokio::test]
async fn client_posts_openai_request() {
    let (base_url, server) = serve_once("200 OK", r#"{"choices":[{"message":{"role":"assistant","content":"Svar. (Kilde: https://utdanning.no)"}}]}"#).await;
    let client = OpenAiCompatibleClient::new(&settings(base_url)).expect("client");
    let answer = client.complete(&[ChatMessage::system("sys"), ChatMessage::user("spørsmål")]).await.expect("answer");
    assert_eq!(answer, "Svar. (Kilde: https://utdanning.no)");

    let request = server.await.expect("server");
    assert!(request.starts_with("POST /v1/chat/completions"));
    let body: serde_json::Value = serde_json::from_str(request.split("\r\n\r\n").nth(1).expect("body")).expect("json");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["stream"], false);
    assert_eq!(body["max_tokens"], 1500);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "spørsmål");
}

#[tokio::test]
async fn client_reports_http_errors() {
    let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error":"model not loaded"}"#).await;
    let client = OpenAiCompatibleClient::new(&settings(base_url)).expect("client");
    match client.complete(&[ChatMessage::user("hei")]).await {
        Err(LlmError::Status { status, body }) => { assert_eq!(status, 500); assert!(body.contains("model not loaded")); }
        other => panic!("expected status error, got {other:?}"),
    }
    server.await.expect("server");
}

#[tokio::test]
async fn health_check_hits_models_endpoint() {
    let (base_url, server) = serve_once("200 OK", r#"{"data":[{"id":"test-model"}]}"#).await;
    let client = OpenAiCompatibleClient::new(&settings(base_url)).expect("client");
    client.health_check().await.expect("healthy");
    assert!(server.await.expect("server").starts_with("GET /v1/models"));
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}/v1", listener.local_addr().expect("addr"));
    drop(listener);
    let client = OpenAiCompatibleClient::new(&settings(base_url)).expect("client");
    let err = tokio::time::timeout(Duration::from_secs(10), client.health_check()).await.expect("finishes").unwrap_err();
    assert!(matches!(err, LlmError::Connection { .. }), "{err}");
}

#[test]
fn env_switch_selects_fake_model() {
    std::env::set_var("APP_USE_FAKE_LLM", "true");
    let model = get_default_model(&LlmSettings::default()).expect("model");
    assert_eq!(model.name(), "fake");
}

#[test]
fn messages_serialize_with_lowercase_roles() {
    let value = serde_json::to_value(ChatMessage::assistant("ok")).expect("json");
    assert_eq!(value, serde_json::json!({"role": "assistant", "content": "ok"}));
}
