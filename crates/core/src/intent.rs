//! Intent classification for inbound messages: an ordered list of
//! (predicate, intent) rules evaluated first-match-wins, kept separate from
//! the controller so the grammar can be extended and tested on its own.

use crate::admin::ADMIN_PREFIX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Admin,
    Affirmative,
    Negative,
    TimeEntry,
    Help,
    Unknown,
}

const AFFIRMATIVE_TOKENS: [&str; 4] = ["yes", "y", "confirm", "ok"];
const NEGATIVE_TOKENS: [&str; 3] = ["no", "n", "cancel"];
const HELP_TOKENS: [&str; 2] = ["help", "status"];

/// Substring matches, deliberately not word-boundary matches: "to" inside
/// another word still flags a message as time-related.
const TIME_KEYWORDS: [&str; 10] =
    ["worked", "work", "till", "until", "to", ":", "normal", "day", "saturday", "sunday"];

pub struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl IntentMatcher {
    pub fn with_default_rules() -> Self {
        Self {
            rules: vec![
                IntentRule { intent: Intent::Admin, matches: is_admin_command },
                IntentRule { intent: Intent::Affirmative, matches: is_affirmative },
                IntentRule { intent: Intent::Negative, matches: is_negative },
                IntentRule { intent: Intent::TimeEntry, matches: is_time_message },
                IntentRule { intent: Intent::Help, matches: is_help_request },
            ],
        }
    }

    /// Classifies a normalized (lowercased, trimmed) message.
    pub fn classify(&self, message: &str) -> Intent {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(message))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

fn is_admin_command(message: &str) -> bool {
    message == ADMIN_PREFIX || message.starts_with(&format!("{ADMIN_PREFIX} "))
}

fn is_affirmative(message: &str) -> bool {
    AFFIRMATIVE_TOKENS.contains(&message)
}

fn is_negative(message: &str) -> bool {
    NEGATIVE_TOKENS.contains(&message)
}

fn is_time_message(message: &str) -> bool {
    TIME_KEYWORDS.iter().any(|keyword| message.contains(keyword))
}

fn is_help_request(message: &str) -> bool {
    HELP_TOKENS.contains(&message)
}

#[cfg(test)]
mod tests {
    use super::{Intent, IntentMatcher};

    #[test]
    fn exact_confirmation_tokens_classify_before_time_keywords() {
        let matcher = IntentMatcher::with_default_rules();

        for token in ["yes", "y", "confirm", "ok"] {
            assert_eq!(matcher.classify(token), Intent::Affirmative, "token {token}");
        }
        for token in ["no", "n", "cancel"] {
            assert_eq!(matcher.classify(token), Intent::Negative, "token {token}");
        }
    }

    #[test]
    fn time_keywords_match_as_substrings() {
        let matcher = IntentMatcher::with_default_rules();

        assert_eq!(matcher.classify("worked 7:30 till 16:00"), Intent::TimeEntry);
        assert_eq!(matcher.classify("7:30-16:00"), Intent::TimeEntry);
        // "today" contains "day" and "to"; permissive by design.
        assert_eq!(matcher.classify("i was busy today"), Intent::TimeEntry);
    }

    #[test]
    fn help_and_status_are_exact_matches() {
        let matcher = IntentMatcher::with_default_rules();

        assert_eq!(matcher.classify("help"), Intent::Help);
        assert_eq!(matcher.classify("status"), Intent::Help);
        assert_eq!(matcher.classify("helpful"), Intent::Unknown);
    }

    #[test]
    fn admin_prefix_wins_over_everything_else() {
        let matcher = IntentMatcher::with_default_rules();

        assert_eq!(matcher.classify("admin status"), Intent::Admin);
        assert_eq!(matcher.classify("admin"), Intent::Admin);
        assert_eq!(matcher.classify("administrate"), Intent::Unknown);
    }

    #[test]
    fn unmatched_text_is_unknown() {
        let matcher = IntentMatcher::with_default_rules();

        assert_eq!(matcher.classify("hello"), Intent::Unknown);
    }
}
