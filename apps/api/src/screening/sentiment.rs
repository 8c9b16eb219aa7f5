//! Sentiment tagging — keyword classifier over free-text chat input.
//!
//! Negative keywords are checked first, so "not good" is Negative even though
//! it contains "good".

const NEGATIVE_KEYWORDS: &[&str] = &["sad", "bad", "not good", "tired", "stress"];
const POSITIVE_KEYWORDS: &[&str] = &["good", "great", "happy"];

const NEGATIVE_PREFIX: &str = "I’m sorry you’re feeling this way. Take your time. ";
const POSITIVE_PREFIX: &str = "That’s great to hear!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Positive,
    Neutral,
}

/// Case-insensitive substring match against the keyword sets.
pub fn detect_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    if NEGATIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Sentiment::Negative
    } else if POSITIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Prefix prepended to validation-failure replies only.
pub fn sentiment_prefix(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Negative => NEGATIVE_PREFIX,
        Sentiment::Positive => POSITIVE_PREFIX,
        Sentiment::Neutral => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sad_is_negative() {
        assert_eq!(detect_sentiment("I feel sad today"), Sentiment::Negative);
    }

    #[test]
    fn test_tired_is_negative() {
        assert_eq!(detect_sentiment("so TIRED"), Sentiment::Negative);
    }

    #[test]
    fn test_not_good_beats_good() {
        assert_eq!(detect_sentiment("not good at all"), Sentiment::Negative);
    }

    #[test]
    fn test_negative_takes_priority_over_positive() {
        assert_eq!(
            detect_sentiment("happy but stressed"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_positive_keywords() {
        assert_eq!(detect_sentiment("Great!"), Sentiment::Positive);
        assert_eq!(detect_sentiment("I'm happy"), Sentiment::Positive);
    }

    #[test]
    fn test_neutral_default() {
        assert_eq!(detect_sentiment("a@b.com"), Sentiment::Neutral);
        assert_eq!(detect_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_prefixes() {
        assert!(sentiment_prefix(Sentiment::Negative).starts_with("I’m sorry"));
        assert_eq!(sentiment_prefix(Sentiment::Positive), "That’s great to hear!");
        assert_eq!(sentiment_prefix(Sentiment::Neutral), "");
    }
}
