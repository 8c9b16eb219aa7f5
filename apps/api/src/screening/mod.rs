// Candidate screening: the scripted intake dialogue and its collaborators.
// All generation goes through `questions::QuestionProvider`; nothing here calls
// the LLM backend directly.

pub mod dialogue;
pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod sentiment;
pub mod sessions;
pub mod validation;
