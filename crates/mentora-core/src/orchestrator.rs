use std::path::{Path, PathBuf};
use std::sync::Arc;

use mentora_memory::HistoryStore;
use mentora_provider::{create_provider, ChatMessage, ChatProvider, ChatRequest};
use mentora_schema::{RecommendationTag, StageLabel, Turn};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{CoachConfig, UserTurnSchema};
use crate::error::CoachError;
use crate::questions::NextQuestionProvider;
use crate::recommend::RecommendationEngine;
use crate::sentiment::{LexiconSentiment, SentimentAnalyzer, SentimentLabel};
use crate::session::{CoachSession, SubmitState};
use crate::stage::StageClassifier;
use crate::templates;

/// Outcome of one submission. The pre-call turns always land; the reply and
/// the snapshot write carry their own results so a failure in either is
/// user-visible without undoing steps that already happened.
#[derive(Debug)]
pub struct SubmitReport {
    pub trace_id: Uuid,
    pub sentiment: SentimentLabel,
    pub stage: StageLabel,
    pub reply: Result<String, CoachError>,
    pub saved_to: Option<PathBuf>,
    pub persistence_error: Option<String>,
}

impl SubmitReport {
    pub fn reply_text(&self) -> Option<&str> {
        self.reply.as_deref().ok()
    }
}

/// Composes classification, progress tracking, templated coach turns, the
/// chat-completion call and snapshot persistence for each submitted turn.
pub struct CoachOrchestrator {
    provider: Arc<dyn ChatProvider>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    stage_classifier: StageClassifier,
    recommender: RecommendationEngine,
    questions: NextQuestionProvider,
    history: HistoryStore,
    config: CoachConfig,
}

impl CoachOrchestrator {
    pub fn new(
        config: CoachConfig,
        provider: Arc<dyn ChatProvider>,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            provider,
            sentiment,
            stage_classifier: StageClassifier::new(&config.stage_keywords),
            recommender: RecommendationEngine::new(config.recommendation_threshold),
            questions: NextQuestionProvider::from_config(&config),
            history: HistoryStore::new(&config.history_dir),
            config,
        }
    }

    /// Wire up the configured provider and the default lexicon scorer.
    pub fn from_config(config: CoachConfig) -> anyhow::Result<Self> {
        let provider = create_provider(&config.provider)?;
        Ok(Self::new(config, provider, Arc::new(LexiconSentiment)))
    }

    pub fn new_session(&self) -> CoachSession {
        CoachSession::new(self.config.system_preamble.as_deref())
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Run the full submission protocol for one user input pair.
    pub async fn submit(
        &self,
        session: &mut CoachSession,
        feeling: &str,
        learning_goal: &str,
    ) -> Result<SubmitReport, CoachError> {
        if session.state == SubmitState::Submitting {
            return Err(CoachError::SubmissionInFlight);
        }
        session.state = SubmitState::Submitting;
        session.feeling = feeling.to_string();
        session.learning_goal = learning_goal.to_string();

        let report = self.run_submission(session, feeling, learning_goal).await;

        session.state = SubmitState::Idle;
        Ok(report)
    }

    async fn run_submission(
        &self,
        session: &mut CoachSession,
        feeling: &str,
        learning_goal: &str,
    ) -> SubmitReport {
        let trace_id = Uuid::new_v4();
        let content = format!("{feeling} {learning_goal}");

        let mut user_turn = Turn::user(content.clone());
        if self.config.user_turn_schema == UserTurnSchema::SplitFields {
            user_turn = user_turn.with_split_fields(feeling, learning_goal);
        }
        session.log.append(user_turn);

        // The polarity score stays here; only the label enters the log.
        let polarity = self.sentiment.polarity(&content);
        let sentiment = SentimentLabel::from_polarity(polarity);
        debug!(%trace_id, polarity, label = %sentiment, "sentiment scored");
        session
            .log
            .append(Turn::assistant(templates::sentiment_message(sentiment)));

        let stage = self.stage_classifier.classify(&content);
        session.progress.record(stage);
        session
            .log
            .append(Turn::assistant(templates::stage_message(stage, &content)));

        let questions = self.questions.questions();
        session
            .log
            .append(Turn::assistant(templates::next_questions_message(&questions)));

        let request = ChatRequest {
            model: self.config.provider.model.clone(),
            messages: session.log.all().iter().map(to_chat_message).collect(),
            max_tokens: self.config.provider.max_tokens,
            temperature: None,
        };
        let reply = match self.provider.chat(request).await {
            Ok(r) => {
                info!(%trace_id, stage = %stage, "coach reply received");
                session.log.append(Turn::assistant(r.content.clone()));
                Ok(r.content)
            }
            Err(e) => {
                warn!(%trace_id, error = %e, "chat call failed, keeping pre-call turns");
                Err(CoachError::ExternalCall(e.to_string()))
            }
        };

        session.feeling.clear();
        session.learning_goal.clear();

        let (saved_to, persistence_error) = match self.history.save(session.log.all()).await {
            Ok(path) => (Some(path), None),
            Err(e) => {
                warn!(%trace_id, error = %e, "history save failed");
                (None, Some(e.to_string()))
            }
        };

        SubmitReport {
            trace_id,
            sentiment,
            stage,
            reply,
            saved_to,
            persistence_error,
        }
    }

    /// Restore a persisted snapshot, replacing the in-memory log wholesale.
    /// On any load error the session log is left untouched.
    pub async fn load_history(
        &self,
        session: &mut CoachSession,
        path: impl AsRef<Path>,
    ) -> Result<usize, CoachError> {
        let turns = self.history.load(path).await?;
        let count = turns.len();
        session.log.replace(turns);
        info!(count, "history restored");
        Ok(count)
    }

    pub fn recommendation(&self, session: &CoachSession) -> RecommendationTag {
        self.recommender.recommend(&session.progress_snapshot())
    }
}

fn to_chat_message(turn: &Turn) -> ChatMessage {
    ChatMessage {
        role: turn.role.as_str().to_string(),
        content: turn.content.clone(),
    }
}
