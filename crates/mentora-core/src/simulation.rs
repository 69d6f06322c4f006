use rand::seq::SliceRandom;

/// Workplace scenarios for the interactive simulation feature.
#[derive(Debug, Clone)]
pub struct ScenarioPool {
    scenarios: Vec<String>,
}

impl ScenarioPool {
    pub fn new(scenarios: Vec<String>) -> Self {
        if scenarios.is_empty() {
            return Self::default();
        }
        Self { scenarios }
    }

    pub fn draw(&self) -> &str {
        self.scenarios
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    /// Canned coach feedback for a free-form scenario response.
    pub fn feedback(&self, _response: &str) -> String {
        "A good point of view. Something further to consider is...".to_string()
    }
}

impl Default for ScenarioPool {
    fn default() -> Self {
        Self {
            scenarios: vec![
                "Finding a way to keep a team discussion running smoothly".into(),
                "Planning a new project".into(),
                "Responding to feedback from a customer".into(),
                "Preparing a smooth briefing for the executive team".into(),
                "Resolving a standoff between people with opposing views".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_comes_from_the_pool() {
        let pool = ScenarioPool::default();
        for _ in 0..20 {
            let scenario = pool.draw().to_string();
            assert!(pool.scenarios().iter().any(|s| s == &scenario));
        }
    }

    #[test]
    fn empty_pool_falls_back_to_defaults() {
        let pool = ScenarioPool::new(vec![]);
        assert!(!pool.scenarios().is_empty());
    }

    #[test]
    fn feedback_is_always_offered() {
        let pool = ScenarioPool::default();
        assert!(!pool.feedback("I would listen first").is_empty());
    }
}
