//! Dialogue State Machine — drives one screening conversation turn by turn.
//!
//! Transition table (state × input class → action, next state):
//!
//! | Step        | Input            | Valid                              | Invalid            |
//! |-------------|------------------|------------------------------------|--------------------|
//! | Greeting    | text             | ask name → Name                    |                    |
//! | Name        | text             | store, ask email → Email           |                    |
//! | Email       | text             | store, ask phone → Phone           | re-prompt, stay    |
//! | Phone       | text             | store, ask experience → Experience | re-prompt, stay    |
//! | Experience  | text             | store, tips or ack → Position      | re-prompt, stay    |
//! | Position    | position choice  | store → Region                     |                    |
//! | Region      | region choice    | store → TechStack                  |                    |
//! | TechStack   | tech-stack choice| store, generate → Answering/WrapUp |                    |
//! | Answering   | text             | feedback, reference, next → Answering/WrapUp | feedback, reference, same question |
//! | WrapUp      | text             | start new → reset; exit → Greeting | re-prompt, stay    |
//!
//! Any other input class is rejected with `TurnError::UnexpectedInput` before the
//! session is touched. A turn that fails part way (for example on a store write)
//! leaves the session exactly as it was before the turn.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::models::candidate::{compose_tech_stack, Position, PrimaryTech, RecordError, Region};
use crate::models::session::{Session, Step};
use crate::screening::evaluator::evaluate_answer;
use crate::screening::prompts;
use crate::screening::questions::{request_questions, request_reference_answer, QuestionProvider};
use crate::screening::sentiment::{detect_sentiment, sentiment_prefix};
use crate::screening::validation::{is_valid_email, is_valid_phone, parse_experience};
use crate::store::{RecordStore, StoreError};

/// One inbound turn: chat text, or an out-of-band selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnInput {
    Text {
        content: String,
    },
    Position {
        position: Position,
    },
    Region {
        region: Region,
    },
    TechStack {
        primary: PrimaryTech,
        extras: String,
    },
}

impl TurnInput {
    pub fn text(content: impl Into<String>) -> Self {
        TurnInput::Text {
            content: content.into(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            TurnInput::Text { .. } => "a text message",
            TurnInput::Position { .. } => "a position selection",
            TurnInput::Region { .. } => "a region selection",
            TurnInput::TechStack { .. } => "a tech-stack selection",
        }
    }
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Step {} expects {expected}, got {got}", .step.id())]
    UnexpectedInput {
        step: Step,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Candidate record error: {0}")]
    Record(#[from] RecordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What a turn produced: the resulting step and the assistant messages it
/// appended, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub step: Step,
    pub replies: Vec<String>,
}

/// Collects the assistant replies of one turn while appending them to the transcript.
struct Turn<'a> {
    session: &'a mut Session,
    replies: Vec<String>,
}

impl<'a> Turn<'a> {
    fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            replies: Vec::new(),
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.session.push_assistant(text.clone());
        self.replies.push(text);
    }

    fn finish(self) -> TurnOutcome {
        TurnOutcome {
            step: self.session.step,
            replies: self.replies,
        }
    }
}

/// The dialogue engine. Stateless itself; every call receives the session it
/// operates on.
#[derive(Clone)]
pub struct DialogueEngine {
    store: Arc<RecordStore>,
    provider: Arc<dyn QuestionProvider>,
}

impl DialogueEngine {
    pub fn new(store: Arc<RecordStore>, provider: Arc<dyn QuestionProvider>) -> Self {
        Self { store, provider }
    }

    /// Opens a fresh conversation by emitting the greeting prompt.
    pub fn start(&self, session: &mut Session) -> TurnOutcome {
        let mut turn = Turn::new(session);
        turn.say(prompts::GREETING_PROMPT);
        turn.finish()
    }

    /// Full reset ("New Candidate"), followed by the greeting prompt.
    pub fn reset(&self, session: &mut Session) -> TurnOutcome {
        session.reset();
        info!("Session {} reset", session.id);
        self.start(session)
    }

    /// Processes one inbound turn to completion. The session is only updated
    /// when the whole turn succeeds.
    pub async fn handle(
        &self,
        session: &mut Session,
        input: TurnInput,
    ) -> Result<TurnOutcome, TurnError> {
        check_accepts(session, &input)?;

        let mut working = session.clone();
        let outcome = self.apply(&mut working, input).await?;
        *session = working;
        Ok(outcome)
    }

    async fn apply(
        &self,
        session: &mut Session,
        input: TurnInput,
    ) -> Result<TurnOutcome, TurnError> {
        let mut turn = Turn::new(session);
        match input {
            TurnInput::Text { content } => {
                let text = content.trim();
                if text.is_empty() {
                    return Err(TurnError::EmptyMessage);
                }
                turn.session.push_user(text);
                self.handle_text(&mut turn, text).await?;
            }
            TurnInput::Position { position } => {
                turn.session.candidate.set_position(position)?;
                turn.session.push_user(prompts::position_echo(position.as_str()));
                turn.say(prompts::POSITION_ACK);
                turn.session.step = Step::Region;
            }
            TurnInput::Region { region } => {
                turn.session.candidate.set_location(region)?;
                turn.session.push_user(prompts::region_echo(region.as_str()));
                turn.say(prompts::REGION_ACK);
                turn.session.step = Step::TechStack;
            }
            TurnInput::TechStack { primary, extras } => {
                self.handle_tech_stack(&mut turn, primary, &extras).await?;
            }
        }
        Ok(turn.finish())
    }

    async fn handle_text(&self, turn: &mut Turn<'_>, text: &str) -> Result<(), TurnError> {
        let prefix = sentiment_prefix(detect_sentiment(text));

        match turn.session.step {
            Step::Greeting => {
                turn.say(prompts::NAME_PROMPT);
                turn.session.step = Step::Name;
            }
            Step::Name => {
                turn.session.candidate.set_name(text)?;
                turn.say(prompts::email_prompt(text));
                turn.session.step = Step::Email;
            }
            Step::Email => {
                if is_valid_email(text) {
                    turn.session.candidate.set_email(text)?;
                    turn.say(prompts::PHONE_PROMPT);
                    turn.session.step = Step::Phone;
                } else {
                    turn.say(format!("{prefix}{}", prompts::INVALID_EMAIL));
                }
            }
            Step::Phone => {
                if is_valid_phone(text) {
                    turn.session.candidate.set_phone(text)?;
                    turn.say(prompts::EXPERIENCE_PROMPT);
                    turn.session.step = Step::Experience;
                } else {
                    turn.say(format!("{prefix}{}", prompts::INVALID_PHONE));
                }
            }
            Step::Experience => match parse_experience(text) {
                Some(years) => {
                    turn.session.candidate.set_experience(years)?;
                    if years < prompts::JUNIOR_EXPERIENCE_YEARS {
                        turn.say(prompts::IMPROVEMENT_TIPS);
                    } else {
                        turn.say(prompts::EXPERIENCE_ACK);
                    }
                    turn.session.step = Step::Position;
                }
                None => turn.say(format!("{prefix}{}", prompts::INVALID_EXPERIENCE)),
            },
            Step::Answering => self.handle_answer(turn, text).await?,
            Step::WrapUp => self.handle_wrap_up(turn, text),
            step @ (Step::Position | Step::Region | Step::TechStack) => {
                return Err(TurnError::UnexpectedInput {
                    step,
                    expected: step.expects(),
                    got: "a text message",
                });
            }
        }
        Ok(())
    }

    async fn handle_tech_stack(
        &self,
        turn: &mut Turn<'_>,
        primary: PrimaryTech,
        extras: &str,
    ) -> Result<(), TurnError> {
        let tech_stack = compose_tech_stack(primary, extras);
        turn.session.candidate.set_tech_stack(tech_stack.clone())?;
        turn.session.tech_confirmed = true;
        turn.session.push_user(prompts::tech_stack_echo(&tech_stack));
        turn.say(prompts::GENERATING_QUESTIONS);

        let questions = request_questions(self.provider.as_ref(), &tech_stack).await;
        info!(
            "Session {}: {} question(s) for '{}'",
            turn.session.id,
            questions.len(),
            tech_stack
        );

        if questions.is_empty() {
            self.persist(turn.session).await?;
            turn.say(prompts::NO_QUESTIONS);
            turn.session.step = Step::WrapUp;
            return Ok(());
        }

        let first = prompts::technical_question(1, &questions[0]);
        turn.session.set_questions(questions);
        turn.say(first);
        turn.session.step = Step::Answering;
        Ok(())
    }

    async fn handle_answer(&self, turn: &mut Turn<'_>, answer: &str) -> Result<(), TurnError> {
        let Some(question) = turn.session.current_question().map(str::to_string) else {
            // Cursor past the last question; wrap up without re-asking.
            turn.session.step = Step::WrapUp;
            turn.say(prompts::INTERVIEW_COMPLETE);
            return Ok(());
        };
        let tech_stack = turn
            .session
            .candidate
            .tech_stack()
            .unwrap_or_default()
            .to_string();

        let evaluation = evaluate_answer(answer);
        turn.say(evaluation.feedback);

        let reference =
            request_reference_answer(self.provider.as_ref(), &question, &tech_stack).await;
        turn.say(prompts::reference_answer(&reference));

        if !evaluation.sufficient {
            let number = turn.session.q_index() + 1;
            turn.say(format!(
                "{}\n\n{}",
                prompts::RETRY_QUESTION,
                prompts::technical_question(number, &question)
            ));
            return Ok(());
        }

        turn.session.advance_question();
        match turn.session.current_question().map(str::to_string) {
            Some(next) => {
                let number = turn.session.q_index() + 1;
                turn.say(prompts::technical_question(number, &next));
            }
            None => {
                self.persist(turn.session).await?;
                turn.say(prompts::INTERVIEW_COMPLETE);
                turn.session.step = Step::WrapUp;
            }
        }
        Ok(())
    }

    fn handle_wrap_up(&self, turn: &mut Turn<'_>, text: &str) {
        let choice = text.to_lowercase();
        if prompts::START_NEW_KEYWORDS.iter().any(|k| choice.contains(k)) {
            turn.session.reset();
            info!("Session {} started over", turn.session.id);
            turn.say(prompts::GREETING_PROMPT);
        } else if prompts::EXIT_KEYWORDS.iter().any(|k| choice.contains(k)) {
            turn.say(prompts::FAREWELL);
            turn.session.restart();
        } else {
            turn.say(prompts::WRAP_UP_REPROMPT);
        }
    }

    async fn persist(&self, session: &Session) -> Result<(), TurnError> {
        session.candidate.ensure_complete()?;
        let store = self.store.clone();
        let record = session.candidate.clone();
        tokio::task::spawn_blocking(move || store.save(&record)).await??;
        info!("Session {}: candidate record persisted", session.id);
        Ok(())
    }
}

/// Rejects input classes the current step does not take.
fn check_accepts(session: &Session, input: &TurnInput) -> Result<(), TurnError> {
    let accepted = match (session.step, input) {
        (Step::Position, TurnInput::Position { .. }) => true,
        (Step::Region, TurnInput::Region { .. }) => true,
        (Step::TechStack, TurnInput::TechStack { .. }) => !session.tech_confirmed,
        (Step::Position | Step::Region | Step::TechStack, _) => false,
        (_, TurnInput::Text { .. }) => true,
        (_, _) => false,
    };
    if accepted {
        Ok(())
    } else {
        Err(TurnError::UnexpectedInput {
            step: session.step,
            expected: session.step.expects(),
            got: input.describe(),
        })
    }
}
