use mentora_schema::{ProgressState, RecommendationTag, StageLabel};

/// Maps accumulated progress to a canned suggestion.
///
/// Tiers are evaluated deepest stage first: enough depth in a later stage
/// selects the advanced tier even when earlier counts are higher. The
/// zero-stage count never promotes past the default tier; the basics
/// refresher is the default.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    threshold: u32,
}

impl RecommendationEngine {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn recommend(&self, state: &ProgressState) -> RecommendationTag {
        if state.count(StageLabel::Third) > self.threshold {
            RecommendationTag::CaseStudy
        } else if state.count(StageLabel::Second) > self.threshold {
            RecommendationTag::PatternReading
        } else if state.count(StageLabel::First) > self.threshold {
            RecommendationTag::OnlineCourse
        } else {
            RecommendationTag::BasicMaterial
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(3)
    }
}
