use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::CandidateRecord;

/// Named dialogue states. `id()` gives the stable numeric step shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Greeting,
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Region,
    TechStack,
    Answering,
    WrapUp,
}

impl Step {
    pub fn id(&self) -> u8 {
        match self {
            Step::Greeting => 0,
            Step::Name => 1,
            Step::Email => 2,
            Step::Phone => 3,
            Step::Experience => 4,
            Step::Position => 5,
            Step::Region => 6,
            Step::TechStack => 7,
            Step::Answering => 8,
            Step::WrapUp => 9,
        }
    }

    /// The input the step waits for, used in rejection messages.
    pub fn expects(&self) -> &'static str {
        match self {
            Step::Greeting => "a greeting message",
            Step::Name => "a name message",
            Step::Email => "an email message",
            Step::Phone => "a phone message",
            Step::Experience => "an experience message",
            Step::Position => "a position selection",
            Step::Region => "a region selection",
            Step::TechStack => "a tech-stack selection",
            Step::Answering => "an answer message",
            Step::WrapUp => "a 'start new' or 'exit' message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One active conversation. Owned by the session registry and handed to the
/// dialogue engine by `&mut` for the duration of a turn.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: Step,
    messages: Vec<ChatMessage>,
    pub candidate: CandidateRecord,
    questions: Vec<String>,
    q_index: usize,
    pub tech_confirmed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            step: Step::Greeting,
            messages: Vec::new(),
            candidate: CandidateRecord::default(),
            questions: Vec::new(),
            q_index: 0,
            tech_confirmed: false,
        }
    }

    /// Full reset: everything except the session id starts over.
    pub fn reset(&mut self) {
        *self = Self {
            id: self.id,
            ..Self::new()
        };
    }

    /// Returns to the greeting step with a fresh candidate, keeping the transcript.
    pub fn restart(&mut self) {
        self.step = Step::Greeting;
        self.candidate = CandidateRecord::default();
        self.questions.clear();
        self.q_index = 0;
        self.tech_confirmed = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn q_index(&self) -> usize {
        self.q_index
    }

    /// Installs the generated questions. Only the first call per candidate
    /// takes effect; the list is immutable afterwards.
    pub fn set_questions(&mut self, questions: Vec<String>) -> bool {
        if !self.questions.is_empty() {
            return false;
        }
        self.questions = questions;
        self.q_index = 0;
        true
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.q_index).map(String::as_str)
    }

    /// Moves the cursor past the current question; never beyond the end.
    pub fn advance_question(&mut self) {
        if self.q_index < self.questions.len() {
            self.q_index += 1;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
