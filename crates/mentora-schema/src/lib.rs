use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation log.
///
/// The canonical on-disk schema carries the combined text in `content`.
/// The two optional split fields are populated when the session is configured
/// to record the raw inputs alongside the combined text, and they keep old
/// snapshots loadable: a record that has only `feeling`/`learning_goal`
/// rehydrates `content` by joining the two with a single space.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feeling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_goal: Option<String>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            feeling: None,
            learning_goal: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_split_fields(
        mut self,
        feeling: impl Into<String>,
        learning_goal: impl Into<String>,
    ) -> Self {
        self.feeling = Some(feeling.into());
        self.learning_goal = Some(learning_goal.into());
        self
    }
}

/// Wire form accepted on load. Covers the canonical schema, records that only
/// carry the split fields, and records without a timestamp.
#[derive(Deserialize)]
struct TurnWire {
    role: Role,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    feeling: Option<String>,
    #[serde(default)]
    learning_goal: Option<String>,
}

impl<'de> Deserialize<'de> for Turn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = TurnWire::deserialize(deserializer)?;
        let content = match wire.content {
            Some(c) => c,
            None => match (&wire.feeling, &wire.learning_goal) {
                (None, None) => {
                    return Err(D::Error::custom(
                        "turn has neither content nor feeling/learning_goal",
                    ))
                }
                (f, g) => {
                    let mut joined = f.clone().unwrap_or_default();
                    if let Some(g) = g {
                        if !joined.is_empty() {
                            joined.push(' ');
                        }
                        joined.push_str(g);
                    }
                    joined
                }
            },
        };
        let timestamp = match wire.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw).map_err(D::Error::custom)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };
        Ok(Turn {
            role: wire.role,
            content,
            timestamp,
            feeling: wire.feeling,
            learning_goal: wire.learning_goal,
        })
    }
}

/// Accept RFC 3339 plus the legacy `"%Y-%m-%d %H:%M:%S"` form (read as UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    Err(format!("unrecognized timestamp: {raw}"))
}

/// Learning stage, ordered by increasing depth of reflective engagement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StageLabel {
    Zero,
    First,
    Second,
    Third,
}

impl StageLabel {
    /// All stages in ascending depth order.
    pub const ALL: [StageLabel; 4] = [
        StageLabel::Zero,
        StageLabel::First,
        StageLabel::Second,
        StageLabel::Third,
    ];

    /// Stable id, also the key used in persisted progress maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageLabel::Zero => "zero_learning",
            StageLabel::First => "first_learning",
            StageLabel::Second => "second_learning",
            StageLabel::Third => "third_learning",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StageLabel::Zero => "Learning 0",
            StageLabel::First => "Learning I",
            StageLabel::Second => "Learning II",
            StageLabel::Third => "Learning III",
        }
    }
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage visit counters for one session. Counters only ever go up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub zero_learning: u32,
    #[serde(default)]
    pub first_learning: u32,
    #[serde(default)]
    pub second_learning: u32,
    #[serde(default)]
    pub third_learning: u32,
}

impl ProgressState {
    pub fn count(&self, stage: StageLabel) -> u32 {
        match stage {
            StageLabel::Zero => self.zero_learning,
            StageLabel::First => self.first_learning,
            StageLabel::Second => self.second_learning,
            StageLabel::Third => self.third_learning,
        }
    }

    pub fn increment(&mut self, stage: StageLabel) {
        match stage {
            StageLabel::Zero => self.zero_learning += 1,
            StageLabel::First => self.first_learning += 1,
            StageLabel::Second => self.second_learning += 1,
            StageLabel::Third => self.third_learning += 1,
        }
    }

    /// The numeric series a renderer needs: labels and counts in declared
    /// (ascending) stage order.
    pub fn series(&self) -> [(StageLabel, u32); 4] {
        [
            (StageLabel::Zero, self.zero_learning),
            (StageLabel::First, self.first_learning),
            (StageLabel::Second, self.second_learning),
            (StageLabel::Third, self.third_learning),
        ]
    }

    pub fn total(&self) -> u32 {
        self.zero_learning + self.first_learning + self.second_learning + self.third_learning
    }
}

/// Canned suggestion mapped from accumulated progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTag {
    BasicMaterial,
    OnlineCourse,
    PatternReading,
    CaseStudy,
}

impl RecommendationTag {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTag::BasicMaterial => "Materials to review the fundamentals",
            RecommendationTag::OnlineCourse => "An online course for learning new skills",
            RecommendationTag::PatternReading => "Reading to deepen your thinking patterns",
            RecommendationTag::CaseStudy => "Advanced case studies",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            RecommendationTag::BasicMaterial => "https://example.com/basic-material",
            RecommendationTag::OnlineCourse => "https://example.com/online-course",
            RecommendationTag::PatternReading => "https://example.com/books",
            RecommendationTag::CaseStudy => "https://example.com/case-study",
        }
    }
}

impl fmt::Display for RecommendationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
