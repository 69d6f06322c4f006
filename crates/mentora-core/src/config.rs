use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mentora_provider::ProviderConfig;
use mentora_schema::StageLabel;
use serde::{Deserialize, Serialize};

use crate::templates::DEFAULT_SYSTEM_PREAMBLE;

/// How a user turn records its two input fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTurnSchema {
    /// Only the combined `content` (feeling + " " + goal).
    #[default]
    Combined,
    /// Combined `content` plus the raw fields on the side.
    SplitFields,
}

/// How the next-questions turn picks its questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NextQuestions {
    /// The configured pool, verbatim and in order.
    Fixed,
    /// `k` questions drawn from the pool without replacement.
    Sample { k: usize },
}

impl Default for NextQuestions {
    fn default() -> Self {
        NextQuestions::Fixed
    }
}

/// One row of the stage keyword table. Row order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageKeywordRow {
    pub stage: StageLabel,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
    /// Turn 0 of every new session; `null` disables the preamble.
    #[serde(default = "default_system_preamble")]
    pub system_preamble: Option<String>,
    #[serde(default)]
    pub user_turn_schema: UserTurnSchema,
    /// A stage's count must exceed this to select its recommendation tier.
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: u32,
    #[serde(default = "default_stage_keywords")]
    pub stage_keywords: Vec<StageKeywordRow>,
    #[serde(default)]
    pub next_questions: NextQuestions,
    #[serde(default = "default_question_pool")]
    pub question_pool: Vec<String>,
}

fn default_history_dir() -> PathBuf {
    PathBuf::from("~/.mentora/history")
}

fn default_system_preamble() -> Option<String> {
    Some(DEFAULT_SYSTEM_PREAMBLE.to_string())
}

fn default_recommendation_threshold() -> u32 {
    3
}

fn default_stage_keywords() -> Vec<StageKeywordRow> {
    vec![
        StageKeywordRow {
            stage: StageLabel::Zero,
            keywords: vec!["基礎".into(), "basics".into()],
        },
        StageKeywordRow {
            stage: StageLabel::First,
            keywords: vec!["方法".into(), "method".into()],
        },
        StageKeywordRow {
            stage: StageLabel::Second,
            keywords: vec!["パターン".into(), "pattern".into()],
        },
        StageKeywordRow {
            stage: StageLabel::Third,
            keywords: vec![],
        },
    ]
}

fn default_question_pool() -> Vec<String> {
    vec![
        "What question would help you widen this perspective?".into(),
        "What action should you take next?".into(),
        "How would you bring in other people's viewpoints?".into(),
    ]
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            history_dir: default_history_dir(),
            system_preamble: default_system_preamble(),
            user_turn_schema: UserTurnSchema::default(),
            recommendation_threshold: default_recommendation_threshold(),
            stage_keywords: default_stage_keywords(),
            next_questions: NextQuestions::default(),
            question_pool: default_question_pool(),
        }
    }
}

impl CoachConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: CoachConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Missing file is not an error; defaults apply.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stage_keywords.is_empty() {
            bail!("stage_keywords must declare at least one row (the last row is the fallback)");
        }
        if self.question_pool.is_empty() {
            bail!("question_pool must not be empty");
        }
        if let NextQuestions::Sample { k } = self.next_questions {
            if k == 0 {
                bail!("next_questions sample size must be at least 1");
            }
            if k > self.question_pool.len() {
                bail!(
                    "next_questions sample size {k} exceeds pool of {}",
                    self.question_pool.len()
                );
            }
        }
        Ok(())
    }
}
