use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mentora_core::{
    CoachConfig, CoachError, CoachOrchestrator, LexiconSentiment, SentimentLabel, SubmitState,
    UserTurnSchema,
};
use mentora_provider::{ChatProvider, ChatReply, ChatRequest};
use mentora_schema::{RecommendationTag, Role, StageLabel};

/// Fixed-reply provider that records every request it sees.
struct ScriptedProvider {
    reply: String,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        self.seen.lock().unwrap().push(request);
        Ok(ChatReply {
            content: self.reply.clone(),
            input_tokens: Some(10),
            output_tokens: Some(5),
        })
    }
}

struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatReply> {
        Err(anyhow!("chat api error (503 server_error): unavailable"))
    }
}

fn test_config(history_dir: &std::path::Path) -> CoachConfig {
    CoachConfig {
        history_dir: history_dir.to_path_buf(),
        ..CoachConfig::default()
    }
}

fn orchestrator_with(
    provider: Arc<dyn ChatProvider>,
    history_dir: &std::path::Path,
) -> CoachOrchestrator {
    CoachOrchestrator::new(test_config(history_dir), provider, Arc::new(LexiconSentiment))
}

#[tokio::test]
async fn successful_submission_appends_five_turns() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::new("Start with one chapter a day."));
    let orch = orchestrator_with(provider, dir.path());
    let mut session = orch.new_session();
    assert_eq!(session.log.len(), 1); // system preamble

    let report = orch
        .submit(&mut session, "落ち込んでいる", "基礎を学びたい")
        .await
        .unwrap();

    assert_eq!(report.stage, StageLabel::Zero);
    assert_eq!(report.sentiment, SentimentLabel::Negative);
    assert_eq!(report.reply_text(), Some("Start with one chapter a day."));
    assert!(report.persistence_error.is_none());

    // preamble + user + sentiment + stage + questions + reply
    assert_eq!(session.log.len(), 6);
    let turns = session.log.all();
    assert_eq!(turns[1].role, Role::User);
    assert_eq!(turns[1].content, "落ち込んでいる 基礎を学びたい");
    assert_eq!(turns[2].content, "Sentiment check: negative");
    assert_eq!(
        turns[3].content,
        "Checking your basic knowledge: 落ち込んでいる 基礎を学びたい"
    );
    assert!(turns[4].content.starts_with("Points to consider next: "));
    assert_eq!(turns[5].content, "Start with one chapter a day.");

    assert_eq!(session.progress_snapshot().count(StageLabel::Zero), 1);
    assert_eq!(session.progress_snapshot().total(), 1);

    let saved = report.saved_to.expect("snapshot written");
    assert!(saved.exists());
    assert_eq!(session.state, SubmitState::Idle);
}

#[tokio::test]
async fn provider_failure_keeps_pre_call_turns_and_clears_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(FailingProvider), dir.path());
    let mut session = orch.new_session();

    let report = orch
        .submit(&mut session, "疲れている", "新しい方法を試したい")
        .await
        .unwrap();

    assert_eq!(report.stage, StageLabel::First);
    let err = report.reply.unwrap_err();
    assert!(matches!(err, CoachError::ExternalCall(_)));
    assert!(err.to_string().contains("server_error"));

    // preamble + the 4 pre-call turns, nothing for the failed reply
    assert_eq!(session.log.len(), 5);
    assert!(session.feeling.is_empty());
    assert!(session.learning_goal.is_empty());
    assert_eq!(session.state, SubmitState::Idle);

    // persistence still ran
    assert!(report.saved_to.is_some());
}

#[tokio::test]
async fn entire_log_is_forwarded_to_the_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::new("ok"));
    let orch = orchestrator_with(provider.clone(), dir.path());
    let mut session = orch.new_session();

    orch.submit(&mut session, "feeling fine", "learn the basics")
        .await
        .unwrap();

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let messages = &seen[0].messages;
    // preamble + 4 pre-call turns, in insertion order
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[1].role, "user");
    assert!(messages[2].content.starts_with("Sentiment check: "));
    assert_eq!(seen[0].model, "gpt-4o-mini");
}

#[tokio::test]
async fn accumulated_depth_drives_the_recommendation() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(ScriptedProvider::new("ok")), dir.path());
    let mut session = orch.new_session();

    assert_eq!(
        orch.recommendation(&session),
        RecommendationTag::BasicMaterial
    );

    // No keyword in the goal: every submission lands in the deepest stage.
    for _ in 0..4 {
        orch.submit(&mut session, "前向き", "チームの対立を解消したい")
            .await
            .unwrap();
    }
    assert_eq!(session.progress_snapshot().count(StageLabel::Third), 4);
    assert_eq!(orch.recommendation(&session), RecommendationTag::CaseStudy);
}

#[tokio::test]
async fn saved_snapshot_restores_an_equal_log() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(ScriptedProvider::new("reply")), dir.path());
    let mut session = orch.new_session();

    let report = orch
        .submit(&mut session, "glad", "learn a new method")
        .await
        .unwrap();
    let saved = report.saved_to.unwrap();

    let mut restored = orch.new_session();
    let count = orch.load_history(&mut restored, &saved).await.unwrap();
    assert_eq!(count, session.log.len());

    for (a, b) in restored.log.all().iter().zip(session.log.all()) {
        assert_eq!(a.role, b.role);
        assert_eq!(a.content, b.content);
        assert_eq!(a.timestamp, b.timestamp);
    }
}

#[tokio::test]
async fn failed_load_leaves_the_session_log_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(ScriptedProvider::new("reply")), dir.path());
    let mut session = orch.new_session();
    orch.submit(&mut session, "fine", "basics").await.unwrap();
    let before = session.log.len();

    let missing = orch
        .load_history(&mut session, "chat_history_19990101_000000.json")
        .await;
    assert!(matches!(missing, Err(CoachError::Persistence(_))));
    assert_eq!(session.log.len(), before);

    let bad = dir.path().join("chat_history_20250101_000000.json");
    tokio::fs::write(&bad, "[{broken").await.unwrap();
    let malformed = orch.load_history(&mut session, &bad).await;
    assert!(malformed.is_err());
    assert_eq!(session.log.len(), before);
}

#[tokio::test]
async fn split_fields_schema_records_raw_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoachConfig {
        user_turn_schema: UserTurnSchema::SplitFields,
        ..test_config(dir.path())
    };
    let orch = CoachOrchestrator::new(
        config,
        Arc::new(ScriptedProvider::new("ok")),
        Arc::new(LexiconSentiment),
    );
    let mut session = orch.new_session();

    orch.submit(&mut session, "落ち込んでいる", "基礎を学びたい")
        .await
        .unwrap();

    let user_turn = &session.log.all()[1];
    assert_eq!(user_turn.content, "落ち込んでいる 基礎を学びたい");
    assert_eq!(user_turn.feeling.as_deref(), Some("落ち込んでいる"));
    assert_eq!(user_turn.learning_goal.as_deref(), Some("基礎を学びたい"));
}

#[tokio::test]
async fn in_flight_submission_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(ScriptedProvider::new("ok")), dir.path());
    let mut session = orch.new_session();
    session.state = SubmitState::Submitting;

    let err = orch.submit(&mut session, "a", "b").await.unwrap_err();
    assert!(matches!(err, CoachError::SubmissionInFlight));
    assert_eq!(session.log.len(), 1);
}

#[tokio::test]
async fn every_submission_writes_a_fresh_slot() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator_with(Arc::new(ScriptedProvider::new("ok")), dir.path());
    let mut session = orch.new_session();

    let first = orch.submit(&mut session, "a", "b").await.unwrap();
    let second = orch.submit(&mut session, "c", "d").await.unwrap();
    assert_ne!(first.saved_to, second.saved_to);
    assert_eq!(orch.history().list().await.unwrap().len(), 2);
}
