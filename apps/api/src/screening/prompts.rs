// Assistant wording for every scripted turn of the screening dialogue.
// Validation-failure replies get a sentiment prefix; nothing else does.

pub const GREETING_PROMPT: &str = "Hi! Please say hello to begin the TalentScout screening.";

pub const NAME_PROMPT: &str = "Welcome to TalentScout! What is your **full name**?";

pub const PHONE_PROMPT: &str = "Please share your **phone number** (digits only).";

pub const EXPERIENCE_PROMPT: &str = "How many **years of professional experience** do you have?";

pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

pub const INVALID_PHONE: &str = "That doesn’t look valid. Please try again.";

pub const INVALID_EXPERIENCE: &str =
    "Please enter your experience as a whole number of years (for example 3).";

/// Shown to candidates with fewer than `JUNIOR_EXPERIENCE_YEARS` years.
pub const IMPROVEMENT_TIPS: &str = "Thanks for sharing, To strengthen your profile:\n\
    - Build strong projects\n\
    - Practice fundamentals\n\
    - Contribute to GitHub\n\n\
    Please select your **position** below.";

pub const EXPERIENCE_ACK: &str = "Great! Please select your **position** below.";

pub const JUNIOR_EXPERIENCE_YEARS: u32 = 2;

pub const POSITION_ACK: &str = "Thanks! Please select your preferred region.";

pub const REGION_ACK: &str = "Great! Now select your primary tech stack.";

pub const GENERATING_QUESTIONS: &str = "Generating technical questions… ⏳";

pub const NO_QUESTIONS: &str = "Unable to generate questions. Interview completed.";

pub const RETRY_QUESTION: &str = "Let's try that one again.";

pub const INTERVIEW_COMPLETE: &str =
    "Interview complete.\n\nWould you like to **start new** or **exit**?";

pub const WRAP_UP_REPROMPT: &str = "Please type **start new** or **exit**.";

pub const FAREWELL: &str = "Thank you for using TalentScout!";

pub const START_NEW_KEYWORDS: &[&str] = &["new", "start"];

pub const EXIT_KEYWORDS: &[&str] = &["exit", "no"];

pub fn email_prompt(name: &str) -> String {
    format!("Hi **{name}**! What is your **email address**?")
}

/// `number` is 1-based.
pub fn technical_question(number: usize, question: &str) -> String {
    format!("Technical Question {number}:\n\n{question}")
}

pub fn reference_answer(answer: &str) -> String {
    format!("**Reference Answer (for learning):**\n\n{answer}")
}

pub fn position_echo(position: &str) -> String {
    format!("I am applying for {position}")
}

pub fn region_echo(region: &str) -> String {
    format!("My preferred region is {region}")
}

pub fn tech_stack_echo(tech_stack: &str) -> String {
    format!("My tech stack is {tech_stack}")
}
