//! Stop-word based language guess.
//!
//! Counts matches of per-language stop-word alternations over the raw text.
//! The language with the most matches wins; ties and zero matches stay
//! English. This is a coarse heuristic, not language identification.

use once_cell::sync::Lazy;
use regex::Regex;

static PATTERNS: Lazy<[(&'static str, Regex); 6]> = Lazy::new(|| {
    let compile = |pattern: &str| Regex::new(pattern).expect("valid stop-word pattern");
    [
        ("en", compile(r"\b(the|and|or|but|in|on|at|to|for|of|with|by)\b")),
        ("es", compile(r"\b(el|la|los|las|y|o|pero|en|con|de|por|para)\b")),
        ("fr", compile(r"\b(le|la|les|et|ou|mais|dans|avec|de|par|pour)\b")),
        ("de", compile(r"\b(der|die|das|und|oder|aber|in|mit|von|für)\b")),
        ("it", compile(r"\b(il|la|gli|le|e|o|ma|in|con|di|per)\b")),
        ("pt", compile(r"\b(o|a|os|as|e|ou|mas|em|com|de|por|para)\b")),
    ]
});

/// Guess the language of `text`, defaulting to `"en"`.
pub fn detect(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let mut detected = "en";
    let mut max_matches = 0;

    for (lang, pattern) in PATTERNS.iter() {
        let matches = pattern.find_iter(&lower).count();
        if matches > max_matches {
            max_matches = matches;
            detected = lang;
        }
    }

    detected
}
