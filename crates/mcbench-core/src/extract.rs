use std::sync::LazyLock;

use regex::Regex;

/// Labeled answer marker, e.g. "Final Answer: B", "answer is (c)",
/// "Answer - D". Lowercase letters are accepted only after an explicit
/// separator or inside brackets; a bare letter after "answer is" must be
/// uppercase so prose articles ("the answer is a ...") are not picked up.
static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:\b(?:final\s+)?answer(?:\s+is)?)\s*(?:[:\-]\s*[\(\[]?([A-Fa-f])(?:[\)\]]|\b)|[\(\[]([A-Fa-f])[\)\]]|([A-F])\b)",
    )
    .expect("labeled answer pattern compiles")
});

/// Fallback marker: a standalone choice letter. Bare letters must be
/// uppercase so prose articles ("a train") are not picked up; bracketed
/// forms like "(c)" are accepted in either case.
static STANDALONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\(\[]([A-Fa-f])[\)\]]|\b([A-F])\b").expect("standalone answer pattern compiles")
});

/// Result of scanning a completion for a multiple-choice token.
/// An absent token is a valid outcome (the response scores incorrect),
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedAnswer {
    pub token: Option<String>,
}

impl ExtractedAnswer {
    pub fn none() -> Self {
        Self { token: None }
    }

    pub fn parse_succeeded(&self) -> bool {
        self.token.is_some()
    }
}

/// Best-effort extraction of a multiple-choice answer (A-F) from free-form
/// model output. A labeled marker wins; otherwise the last standalone
/// choice letter is taken. Deterministic, no side effects.
pub fn extract(raw_text: &str) -> ExtractedAnswer {
    let text = raw_text.trim();

    if let Some(caps) = LABELED.captures(text) {
        if let Some(m) = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
        {
            return ExtractedAnswer {
                token: Some(m.as_str().to_ascii_uppercase()),
            };
        }
    }

    let mut last = None;
    for caps in STANDALONE.captures_iter(text) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            last = Some(m.as_str().to_ascii_uppercase());
        }
    }

    ExtractedAnswer { token: last }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> Option<String> {
        extract(text).token
    }

    #[test]
    fn labeled_final_answer() {
        assert_eq!(token("Final Answer: D"), Some("D".to_string()));
        assert_eq!(token("some reasoning...\nFinal Answer: A"), Some("A".to_string()));
    }

    #[test]
    fn labeled_variations() {
        assert_eq!(token("The answer is A."), Some("A".to_string()));
        assert_eq!(token("Answer: B"), Some("B".to_string()));
        assert_eq!(token("answer - c"), Some("C".to_string()));
        assert_eq!(token("final answer: (e)"), Some("E".to_string()));
        assert_eq!(token("Answer: [F]"), Some("F".to_string()));
        assert_eq!(token("ANSWER IS B!"), Some("B".to_string()));
    }

    #[test]
    fn labeled_marker_takes_precedence_over_other_letters() {
        assert_eq!(
            token("B is tempting. Final Answer: C"),
            Some("C".to_string())
        );
    }

    #[test]
    fn label_does_not_grab_word_initials() {
        // "Brilliant" must not yield B via the label path or the fallback.
        assert_eq!(token("The answer is Brilliant"), None);
    }

    #[test]
    fn label_followed_by_prose_article_is_not_a_token() {
        assert_eq!(token("The answer is a train ride away"), None);
        assert_eq!(token("the answer is an estimate"), None);
        // With an explicit separator a lowercase letter is a real choice.
        assert_eq!(token("answer: b"), Some("B".to_string()));
    }

    #[test]
    fn fallback_takes_last_standalone_letter() {
        assert_eq!(
            token("I think B is right, but C works too."),
            Some("C".to_string())
        );
        assert_eq!(token("A or B"), Some("B".to_string()));
    }

    #[test]
    fn fallback_accepts_bracketed_letters() {
        assert_eq!(token("(C)"), Some("C".to_string()));
        assert_eq!(token("I would go with (d) here"), Some("D".to_string()));
        assert_eq!(token("[B]"), Some("B".to_string()));
    }

    #[test]
    fn bare_letter_response() {
        assert_eq!(token("A"), Some("A".to_string()));
        assert_eq!(token("  C  "), Some("C".to_string()));
    }

    #[test]
    fn unrecognizable_text_yields_no_token() {
        assert_eq!(token(""), None);
        assert_eq!(token("I am not sure"), None);
        assert_eq!(token("The quick brown fox jumps over the lazy dog"), None);
        // G is outside the choice range.
        assert_eq!(token("G"), None);
        // Lowercase bare letters read as prose, not as a choice.
        assert_eq!(token("pick a card"), None);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Thinking... maybe B? Final Answer: E";
        assert_eq!(extract(text), extract(text));
        assert!(extract(text).parse_succeeded());
    }
}
