/// Minimum trimmed length, in characters, for an answer to count as sufficient.
const MIN_ANSWER_CHARS: usize = 15;

pub const SHORT_ANSWER_FEEDBACK: &str =
    "That answer seems a bit short. Could you explain a bit more?";
pub const ANSWER_ACK_FEEDBACK: &str = "Thanks for your response.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub sufficient: bool,
    pub feedback: &'static str,
}

/// Length-only sufficiency check. There is no semantic grading.
pub fn evaluate_answer(answer: &str) -> Evaluation {
    if answer.trim().chars().count() < MIN_ANSWER_CHARS {
        Evaluation {
            sufficient: false,
            feedback: SHORT_ANSWER_FEEDBACK,
        }
    } else {
        Evaluation {
            sufficient: true,
            feedback: ANSWER_ACK_FEEDBACK,
        }
    }
}
