// Prompt templates for the two generation calls.
// Placeholders are substituted with `str::replace` before sending.

/// Question generation prompt. Replace `{tech_stack}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = "
Generate interview questions for {tech_stack}.
Only output questions.
";

/// Reference answer prompt. Replace `{tech_stack}` and `{question}` before sending.
pub const REFERENCE_ANSWER_PROMPT_TEMPLATE: &str = "
You are an interview expert.
Give a clear, correct, concise reference answer
for the following interview question.

Technology: {tech_stack}
Question: {question}

Do NOT mention the question again.
";

pub fn questions_prompt(tech_stack: &str) -> String {
    QUESTIONS_PROMPT_TEMPLATE.replace("{tech_stack}", tech_stack)
}

pub fn reference_answer_prompt(question: &str, tech_stack: &str) -> String {
    REFERENCE_ANSWER_PROMPT_TEMPLATE
        .replace("{tech_stack}", tech_stack)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_prompt_substitutes_stack() {
        let prompt = questions_prompt("Python, Django");
        assert!(prompt.contains("interview questions for Python, Django."));
        assert!(!prompt.contains("{tech_stack}"));
    }

    #[test]
    fn test_reference_prompt_substitutes_both() {
        let prompt = reference_answer_prompt("What is a closure?", "JavaScript");
        assert!(prompt.contains("Technology: JavaScript"));
        assert!(prompt.contains("Question: What is a closure?"));
    }
}
