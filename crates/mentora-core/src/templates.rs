//! Fixed message templates for the synthesized coach turns.

use mentora_schema::StageLabel;

use crate::sentiment::SentimentLabel;

/// Turn 0 of a new session unless configured otherwise.
pub const DEFAULT_SYSTEM_PREAMBLE: &str = "You are an educational coach grounded in Gregory Bateson's model of learning. You will: 1. analyze the user's emotional state. 2. hold a dialogue suited to their learning stage. 3. encourage reflection.";

/// Stage-keyed message, parameterized by the raw combined input verbatim.
pub fn stage_message(stage: StageLabel, input: &str) -> String {
    match stage {
        StageLabel::Zero => format!("Checking your basic knowledge: {input}"),
        StageLabel::First => format!("Let's think about a new method: {input}"),
        StageLabel::Second => format!("Focusing on your thinking patterns: {input}"),
        StageLabel::Third => {
            format!("Let's reconstruct your worldview from a bigger perspective: {input}")
        }
    }
}

pub fn sentiment_message(label: SentimentLabel) -> String {
    format!("Sentiment check: {label}")
}

pub fn next_questions_message(questions: &[String]) -> String {
    format!("Points to consider next: {}", questions.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_message_carries_input_verbatim() {
        let input = "落ち込んでいる 基礎を学びたい";
        for stage in StageLabel::ALL {
            let msg = stage_message(stage, input);
            assert!(msg.ends_with(input), "{msg}");
        }
    }

    #[test]
    fn stage_messages_are_distinct() {
        let msgs: Vec<_> = StageLabel::ALL
            .iter()
            .map(|s| stage_message(*s, "x"))
            .collect();
        for (i, a) in msgs.iter().enumerate() {
            for b in &msgs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn sentiment_message_names_the_label_only() {
        let msg = sentiment_message(SentimentLabel::Negative);
        assert_eq!(msg, "Sentiment check: negative");
    }

    #[test]
    fn next_questions_joined_in_order() {
        let msg = next_questions_message(&["one".into(), "two".into()]);
        assert_eq!(msg, "Points to consider next: one, two");
    }
}
