//! Question Provider — pluggable, trait-based source of interview questions and
//! reference answers.
//!
//! Default: `LlmQuestionProvider` (Ollama via `llm_client`).
//! The dialogue engine never trusts provider output as-is: `filter_questions`
//! is applied to whatever a provider returns, and any `Err` is replaced with
//! fixed fallback content.
//!
//! `AppState` holds an `Arc<dyn QuestionProvider>`, swapped at startup or in tests.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::prompts::{questions_prompt, reference_answer_prompt};
use crate::llm_client::{LlmClient, LlmError};

pub const MAX_QUESTIONS: usize = 3;
/// A kept question must be strictly longer than this many characters.
const MIN_QUESTION_CHARS: usize = 15;
const BANNED_QUESTION_TERMS: &[&str] = &["answer", "corresponding"];

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Backend that turns a tech stack into interview questions and reference answers.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Raw candidate questions, one per element, in model order. May be unfiltered.
    async fn generate_questions(&self, tech_stack: &str) -> Result<Vec<String>, ProviderError>;

    async fn generate_reference_answer(
        &self,
        question: &str,
        tech_stack: &str,
    ) -> Result<String, ProviderError>;
}

/// Generation backed by the local LLM. Splits the model output into lines.
pub struct LlmQuestionProvider(pub LlmClient);

#[async_trait]
impl QuestionProvider for LlmQuestionProvider {
    async fn generate_questions(&self, tech_stack: &str) -> Result<Vec<String>, ProviderError> {
        let response = self.0.call(&questions_prompt(tech_stack)).await?;
        Ok(response.response.lines().map(str::to_string).collect())
    }

    async fn generate_reference_answer(
        &self,
        question: &str,
        tech_stack: &str,
    ) -> Result<String, ProviderError> {
        let prompt = reference_answer_prompt(question, tech_stack);
        Ok(self.0.call_text(&prompt).await?)
    }
}

/// Keeps trimmed lines that end with "?", are longer than 15 characters and do
/// not mention "answer" or "corresponding" (case-insensitive). At most three.
pub fn filter_questions<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            let lower = line.to_lowercase();
            let keep = line.ends_with('?')
                && line.chars().count() > MIN_QUESTION_CHARS
                && !BANNED_QUESTION_TERMS.iter().any(|t| lower.contains(t));
            keep.then(|| line.to_string())
        })
        .take(MAX_QUESTIONS)
        .collect()
}

pub fn fallback_questions(tech_stack: &str) -> Vec<String> {
    vec![
        format!("What are the core concepts of {tech_stack}?"),
        format!("Explain a real-world use case of {tech_stack}."),
        format!("What challenges have you faced while working with {tech_stack}?"),
    ]
}

pub fn fallback_reference_answer(tech_stack: &str) -> String {
    format!(
        "A good answer should explain the fundamental concepts of {tech_stack}, \
         describe how it is used in real-world applications, and highlight \
         best practices, advantages, and limitations clearly."
    )
}

/// Asks the provider for questions. Success is filtered (possibly down to
/// nothing); failure yields the three fallback questions verbatim.
pub async fn request_questions(provider: &dyn QuestionProvider, tech_stack: &str) -> Vec<String> {
    match provider.generate_questions(tech_stack).await {
        Ok(raw) => filter_questions(raw),
        Err(e) => {
            warn!("Question generation failed, using fallback questions: {e}");
            fallback_questions(tech_stack)
        }
    }
}

pub async fn request_reference_answer(
    provider: &dyn QuestionProvider,
    question: &str,
    tech_stack: &str,
) -> String {
    match provider.generate_reference_answer(question, tech_stack).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Reference answer generation failed, using fallback: {e}");
            fallback_reference_answer(tech_stack)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingProvider, ScriptedProvider};
    use super::*;

    #[test]
    fn test_filter_keeps_real_questions() {
        let raw = [
            "Here are some questions:",
            "1. What is the Python GIL?",
            "   How do decorators work in Python?   ",
        ];
        assert_eq!(
            filter_questions(raw),
            vec![
                "1. What is the Python GIL?".to_string(),
                "How do decorators work in Python?".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_drops_short_lines() {
        // 15 characters exactly is not enough.
        assert!(filter_questions(["What is a list?"]).is_empty());
        assert_eq!(filter_questions(["What is a tuple?"]).len(), 1);
    }

    #[test]
    fn test_filter_drops_banned_terms() {
        let raw = [
            "What is the ANSWER to this question?",
            "Which corresponding module handles IO?",
            "Why would you choose Java over Kotlin?",
        ];
        assert_eq!(
            filter_questions(raw),
            vec!["Why would you choose Java over Kotlin?".to_string()]
        );
    }

    #[test]
    fn test_filter_caps_at_three() {
        let raw = [
            "What is question number one?",
            "What is question number two?",
            "What is question number three?",
            "What is question number four?",
        ];
        let kept = filter_questions(raw);
        assert_eq!(kept.len(), MAX_QUESTIONS);
        assert_eq!(kept[2], "What is question number three?");
    }

    #[test]
    fn test_fallback_questions_mention_stack() {
        let questions = fallback_questions("Python, SQL");
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0], "What are the core concepts of Python, SQL?");
        assert_eq!(questions[1], "Explain a real-world use case of Python, SQL.");
        assert_eq!(
            questions[2],
            "What challenges have you faced while working with Python, SQL?"
        );
    }

    #[tokio::test]
    async fn test_request_questions_falls_back_on_error() {
        let questions = request_questions(&FailingProvider, "Java").await;
        assert_eq!(questions, fallback_questions("Java"));
    }

    #[tokio::test]
    async fn test_request_questions_filters_provider_output() {
        let provider = ScriptedProvider::new(&["Sure!", "What is the Java memory model?"]);
        let questions = request_questions(&provider, "Java").await;
        assert_eq!(questions, vec!["What is the Java memory model?".to_string()]);
    }

    #[tokio::test]
    async fn test_request_questions_may_be_empty() {
        let provider = ScriptedProvider::new(&["No questions today."]);
        assert!(request_questions(&provider, "Java").await.is_empty());
    }

    #[tokio::test]
    async fn test_reference_answer_falls_back_on_error() {
        let answer = request_reference_answer(&FailingProvider, "Why?", "Java").await;
        assert_eq!(answer, fallback_reference_answer("Java"));
        assert!(answer.starts_with("A good answer should explain the fundamental concepts of Java, "));
    }
}
