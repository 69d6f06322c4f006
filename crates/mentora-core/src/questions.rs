use rand::seq::SliceRandom;

use crate::config::{CoachConfig, NextQuestions};

/// Supplies the "next questions" list for step 6 of a submission.
#[derive(Debug, Clone)]
pub enum NextQuestionProvider {
    /// The pool verbatim, in declared order.
    Fixed(Vec<String>),
    /// `k` questions drawn from the pool without replacement.
    Sample { pool: Vec<String>, k: usize },
}

impl NextQuestionProvider {
    pub fn from_config(config: &CoachConfig) -> Self {
        match config.next_questions {
            NextQuestions::Fixed => Self::Fixed(config.question_pool.clone()),
            NextQuestions::Sample { k } => Self::Sample {
                pool: config.question_pool.clone(),
                k,
            },
        }
    }

    pub fn questions(&self) -> Vec<String> {
        match self {
            Self::Fixed(pool) => pool.clone(),
            Self::Sample { pool, k } => pool
                .choose_multiple(&mut rand::thread_rng(), *k)
                .cloned()
                .collect(),
        }
    }
}
