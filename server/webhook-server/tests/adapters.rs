//! HTTP adapters against a mock server.

use serde_json::json;
use test_harness::Language;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webhook_server::config::{GithubConfig, MailConfig};
use webhook_server::error::AdapterError;
use webhook_server::github::{GithubClient, SourceHost};
use webhook_server::notify::{MailerSendNotifier, Notifier};
use webhook_server::synth::{GeminiSynthesizer, OpenAiSynthesizer, TestSynthesizer};

fn github(server: &MockServer, token: Option<&str>) -> GithubClient {
  GithubClient::new(&GithubConfig {
    api_url: server.uri(),
    token: token.map(str::to_string),
  })
}

#[tokio::test]
async fn commit_details_lists_files() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/repos/octo/calc/commits/abc123"))
    .and(header("authorization", "Bearer t0ken"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "sha": "abc123",
      "files": [
        {"filename": "src/calc.js", "status": "modified", "additions": 3},
        {"filename": "docs/old.md", "status": "removed"}
      ]
    })))
    .mount(&server)
    .await;

  let details = github(&server, Some("t0ken"))
    .commit_details("octo", "calc", "abc123")
    .await
    .unwrap();
  assert_eq!(details.files.len(), 2);
  assert_eq!(details.files[0].filename, "src/calc.js");
  assert!(details.files[0].is_eligible());
  assert!(!details.files[1].is_eligible());
}

#[tokio::test]
async fn file_content_is_decoded_at_ref() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/repos/octo/calc/contents/src/calc.js"))
    .and(query_param("ref", "abc123"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "encoding": "base64",
      "content": "Y29uc3QgYWRkID0g\nKGEsIGIpID0+IGEg\nKyBiOwo=\n"
    })))
    .mount(&server)
    .await;

  let text = github(&server, None)
    .file_content("octo", "calc", "src/calc.js", "abc123")
    .await
    .unwrap();
  assert_eq!(text, "const add = (a, b) => a + b;\n");
}

#[tokio::test]
async fn github_error_status_is_surfaced() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
    .mount(&server)
    .await;

  let err = github(&server, None)
    .commit_details("octo", "calc", "missing")
    .await
    .unwrap_err();
  assert!(matches!(err, AdapterError::Status { status: 404, .. }));
}

#[tokio::test]
async fn gemini_output_is_cleaned() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/models/gemini-flash-latest:generateContent"))
    .and(header("x-goog-api-key", "g-key"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "candidates": [{"content": {"parts": [{"text": "```python\ndef test_area():\n    assert area(2, 3) == 6\u{2705}\n```\n"}]}}]
    })))
    .mount(&server)
    .await;

  let synth = GeminiSynthesizer::new("g-key".into()).with_base_url(server.uri());
  let tests = synth
    .generate_tests("def area(w, h): return w * h", &Language::Python)
    .await
    .unwrap();
  assert_eq!(tests, "def test_area():\n    assert area(2, 3) == 6");
}

#[tokio::test]
async fn openai_output_loses_fences() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .and(header("authorization", "Bearer o-key"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "choices": [{"message": {"role": "assistant", "content": "```javascript\ntest('x', () => {});\n```"}}]
    })))
    .mount(&server)
    .await;

  let synth = OpenAiSynthesizer::new("o-key".into()).with_base_url(server.uri());
  let tests = synth.generate_tests("x", &Language::JavaScript).await.unwrap();
  assert_eq!(tests, "test('x', () => {});\n");
}

#[tokio::test]
async fn rate_limited_synthesis_is_an_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
    .mount(&server)
    .await;

  let synth = GeminiSynthesizer::new("g-key".into()).with_base_url(server.uri());
  let err = synth.generate_tests("x", &Language::Java).await.unwrap_err();
  assert!(matches!(err, AdapterError::Status { service: "gemini", status: 429, .. }));
}

fn mailer(server: &MockServer) -> MailerSendNotifier {
  MailerSendNotifier::new(&MailConfig {
    api_key: Some("m-key".into()),
    sender: "ci@example.com".into(),
    recipient: None,
  })
  .with_endpoint(format!("{}/v1/email", server.uri()))
}

#[tokio::test]
async fn report_is_delivered_to_mailersend() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/v1/email"))
    .and(header("authorization", "Bearer m-key"))
    .and(body_partial_json(json!({
      "from": {"email": "ci@example.com"},
      "to": [{"email": "dev@example.com"}],
      "subject": "[TEST REPORT] FAILED: Unit Tests for src/calc.js"
    })))
    .respond_with(ResponseTemplate::new(202))
    .expect(1)
    .mount(&server)
    .await;

  mailer(&server)
    .send_report("src/calc.js", false, "1 failed", "dev@example.com")
    .await
    .unwrap();
}

#[tokio::test]
async fn mailersend_failure_is_a_status_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
    .mount(&server)
    .await;

  let err = mailer(&server)
    .send_report("a.py", true, "ok", "dev@example.com")
    .await
    .unwrap_err();
  match err {
    AdapterError::Status { service, status, body } => {
      assert_eq!(service, "mailersend");
      assert_eq!(status, 503);
      assert_eq!(body, "unavailable");
    }
    other => panic!("unexpected error: {other}"),
  }
}
