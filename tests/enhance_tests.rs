use repo_scorecard::{
    analyze, analyze_with_enhancement, score_all, EnhancementConfig, EnhancementOutcome,
    Enhancer, FallbackReason, InsightCategory, RepositorySnapshot, Severity, MAX_INSIGHTS,
};
use serde_json::json;

fn sample_snapshot() -> RepositorySnapshot {
    serde_json::from_str(include_str!("fixtures/sample_snapshot.json")).unwrap()
}

fn config_for(endpoint: String) -> EnhancementConfig {
    EnhancementConfig {
        enabled: true,
        endpoint,
        model: "test-model".to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
    }
}

fn chat_reply(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [ { "index": 0, "message": { "role": "assistant", "content": content } } ]
    })
    .to_string()
}

fn valid_narrative() -> String {
    json!({
        "summary": "acme/widget is a well-run TypeScript service scoring 93/100.",
        "suggestions": [
            "Grow the test suite beyond a single file",
            "Publish coverage in CI",
        ],
        "insights": [
            {
                "category": "testing",
                "severity": "warning",
                "title": "Thin test suite",
                "description": "1 of 19 files is a test.",
                "suggestion": "Add tests for widget_service.ts"
            },
            {
                "category": "community",
                "severity": "success",
                "title": "Healthy contributor base",
                "description": "6 contributors with 250 stars."
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_enhanced_narrative_replaces_fallback() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(&valid_narrative()))
        .create_async()
        .await;

    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for(server.url())).unwrap();
    let enhanced = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();
    let baseline = analyze(&snapshot).unwrap();

    mock.assert_async().await;
    assert!(enhanced.ai_powered);
    assert!(enhanced.summary.contains("93/100"));
    assert_eq!(enhanced.suggestions.len(), 2);
    assert_eq!(enhanced.insights.len(), 2);
    assert_eq!(enhanced.insights[0].category, InsightCategory::Testing);
    assert_eq!(enhanced.insights[1].severity, Severity::Success);
    assert_eq!(enhanced.insights[1].suggestion, None);

    // The provider never touches the deterministic outputs
    assert_eq!(enhanced.scores, baseline.scores);
    assert_eq!(enhanced.tech_stack, baseline.tech_stack);
    assert_eq!(enhanced.missing_files, baseline.missing_files);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for(server.url())).unwrap();

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert_eq!(outcome, EnhancementOutcome::Fallback(FallbackReason::HttpStatus(500)));

    let result = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();
    let baseline = analyze(&snapshot).unwrap();
    assert!(!result.ai_powered);
    assert_eq!(result.summary, baseline.summary);
    assert_eq!(result.insights, baseline.insights);
    assert_eq!(result.suggestions, baseline.suggestions);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply("Sure! Here is my analysis: the repo looks great."))
        .create_async()
        .await;

    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for(server.url())).unwrap();

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert!(matches!(
        outcome,
        EnhancementOutcome::Fallback(FallbackReason::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_schema_mismatch_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let content = json!({ "summary": "ok", "suggestions": "not a list", "insights": [] }).to_string();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(&content))
        .create_async()
        .await;

    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for(server.url())).unwrap();

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert!(matches!(
        outcome,
        EnhancementOutcome::Fallback(FallbackReason::SchemaMismatch(_))
    ));

    let result = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();
    assert!(!result.ai_powered);
}

#[tokio::test]
async fn test_oversized_reply_is_capped() {
    let mut server = mockito::Server::new_async().await;
    let insights: Vec<_> = (0..12)
        .map(|i| {
            json!({
                "category": "overall",
                "severity": "info",
                "title": format!("Finding {}", i),
                "description": "details"
            })
        })
        .collect();
    let suggestions: Vec<_> = (0..9).map(|i| format!("Suggestion {}", i)).collect();
    let content = json!({ "summary": "s", "suggestions": suggestions, "insights": insights }).to_string();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(chat_reply(&content))
        .create_async()
        .await;

    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for(server.url())).unwrap();
    let result = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();

    assert!(result.ai_powered);
    assert_eq!(result.insights.len(), MAX_INSIGHTS);
    assert_eq!(result.suggestions.len(), 5);
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    let snapshot = sample_snapshot();
    let enhancer = Enhancer::new(&config_for("http://127.0.0.1:9".to_string())).unwrap();

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert!(matches!(
        outcome,
        EnhancementOutcome::Fallback(FallbackReason::Network(_) | FallbackReason::Timeout)
    ));

    let result = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();
    assert!(!result.ai_powered);
}

#[tokio::test]
async fn test_silent_provider_times_out() {
    // Accept connections and never answer
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let snapshot = sample_snapshot();
    let mut config = config_for(format!("http://{}", addr));
    config.timeout_secs = 1;
    let enhancer = Enhancer::new(&config).unwrap();

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert_eq!(outcome, EnhancementOutcome::Fallback(FallbackReason::Timeout));

    let result = analyze_with_enhancement(&snapshot, &enhancer).await.unwrap();
    let baseline = analyze(&snapshot).unwrap();
    assert!(!result.ai_powered);
    assert_eq!(result.summary, baseline.summary);
    assert_eq!(result.insights, baseline.insights);
    assert_eq!(result.suggestions, baseline.suggestions);
}

#[tokio::test]
async fn test_missing_credentials_skip_the_call() {
    let snapshot = sample_snapshot();

    let mut config = config_for("http://127.0.0.1:9".to_string());
    config.api_key = None;
    let enhancer = Enhancer::new(&config).unwrap();
    assert!(!enhancer.is_configured());

    let outcome = enhancer.enhance(&snapshot, &score_all(&snapshot)).await;
    assert_eq!(outcome, EnhancementOutcome::Fallback(FallbackReason::NotConfigured));

    let disabled = Enhancer::disabled().unwrap();
    let result = analyze_with_enhancement(&snapshot, &disabled).await.unwrap();
    assert!(!result.ai_powered);
    assert_eq!(result.summary, analyze(&snapshot).unwrap().summary);
}
