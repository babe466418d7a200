//! Compilation of `complies` and `wordComplies` patterns into anchored
//! regular expressions.
//!
//! # Character patterns
//!
//! Each character of a `complies` pattern stands for a character class:
//!
//! | Pattern | Matches                               |
//! |---------|---------------------------------------|
//! | `a`     | a lowercase latin letter              |
//! | `A`     | an uppercase latin letter             |
//! | `9`     | a digit (ASCII or full-width)         |
//! | `h`     | a hiragana                            |
//! | `k`     | a half-width katakana                 |
//! | `K`     | a full-width katakana                 |
//! | `C`     | an ideogram                           |
//! | `G`     | a hangul syllable                     |
//!
//! Anything else matches itself. Runs of the same class are folded, so
//! `aaa` becomes `<lower>{3}`.
//!
//! # Word patterns
//!
//! A `wordComplies` pattern is made of bracketed tokens (`[word]`,
//! `[Word]`, `[digit]`, ...) and literal text. Unknown bracket content is
//! kept literally, brackets included.

use crate::error::{Result, TqlError};

/// Which micro-language a pattern is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `complies`
    Character,
    /// `wordComplies`
    Word,
}

/// Compiles a pattern of the given kind into an anchored regex.
pub fn to_regex(kind: PatternKind, pattern: &str) -> Result<String> {
    match kind {
        PatternKind::Character => Ok(char_pattern_to_regex(pattern)),
        PatternKind::Word => word_pattern_to_regex(pattern),
    }
}

const LOWER_LATIN: &str = "([\\x{61}-\\x{7a}]|[\\x{DF}-\\x{F6}]|[\\x{F8}-\\x{FF}]|[\\x{FF41}-\\x{FF5A}])";
const UPPER_LATIN: &str = "([\\x{41}-\\x{5A}]|[\\x{C0}-\\x{D6}]|[\\x{D8}-\\x{DE}]|[\\x{FF21}-\\x{FF3A}])";
const DIGIT: &str = "([\\x{30}-\\x{39}]|[\\x{FF10}-\\x{FF19}])";
const HIRAGANA: &str = "([\\x{3041}-\\x{3096}]|\\x{309D}|\\x{309E}|\\x{30FC})";
const HALF_KATAKANA: &str = "([\\x{FF66}-\\x{FF9D}])";
const FULL_KATAKANA: &str = "([\\x{30A1}-\\x{30FA}]|\\x{30FD}|\\x{30FE}|[\\x{31F0}-\\x{31FF}]|\\x{30FC})";
const KATAKANA: &str = "([\\x{FF66}-\\x{FF9D}]|[\\x{30A1}-\\x{30FA}]|\\x{30FD}|\\x{30FE}|[\\x{31F0}-\\x{31FF}]|\\x{30FC})";
const IDEOGRAM: &str = "[\\p{Han}]";
const HANGUL: &str = "([\\x{AC00}-\\x{D7AF}])";

fn char_class(ch: char) -> Option<&'static str> {
    match ch {
        'a' => Some(LOWER_LATIN),
        'A' => Some(UPPER_LATIN),
        '9' => Some(DIGIT),
        'h' => Some(HIRAGANA),
        'k' => Some(HALF_KATAKANA),
        'K' => Some(FULL_KATAKANA),
        'C' => Some(IDEOGRAM),
        'G' => Some(HANGUL),
        _ => None,
    }
}

/// Compiles a `complies` pattern. Every input is valid.
pub fn char_pattern_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match char_class(ch) {
            Some(class) => {
                let mut run = 1;
                while chars.get(i + run) == Some(&ch) {
                    run += 1;
                }
                regex.push_str(class);
                if run > 1 {
                    regex.push_str(&format!("{{{}}}", run));
                }
                i += run;
            }
            None => {
                regex.push_str(&regex::escape(&ch.to_string()));
                i += 1;
            }
        }
    }

    regex.push('$');
    regex
}

fn word_token(name: &str) -> Option<String> {
    let fragment = match name {
        "word" => "[\\p{Ll}]{2,}".to_string(),
        "Word" => "\\p{Lu}[\\p{Ll}]{1,}".to_string(),
        "digit" | "Number" => "[\\p{Nd}]".to_string(),
        "char" => "[\\p{Ll}]".to_string(),
        "Char" => "[\\p{Lu}]".to_string(),
        "alnum" => "[\\p{Nd}|\\p{Lu}\\p{Ll}]{2,}".to_string(),
        "Ideogram" => IDEOGRAM.to_string(),
        "IdeogramSeq" => format!("{}{{2,}}", IDEOGRAM),
        "hira" => HIRAGANA.to_string(),
        "hiraSeq" => format!("{}{{2,}}", HIRAGANA),
        "kata" => KATAKANA.to_string(),
        "kataSeq" => format!("{}{{2,}}", KATAKANA),
        "hangul" => HANGUL.to_string(),
        "hangulSeq" => format!("{}{{2,}}", HANGUL),
        _ => return None,
    };
    Some(fragment)
}

/// Compiles a `wordComplies` pattern.
///
/// Fails when a `[` has no closing `]`.
pub fn word_pattern_to_regex(pattern: &str) -> Result<String> {
    let mut regex = String::from("^");
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        regex.push_str(&regex::escape(&rest[..open]));
        let after = &rest[open + 1..];
        let close = after.find(']').ok_or_else(|| {
            let byte = pattern.len() - rest.len() + open;
            TqlError::Pattern(format!(
                "unterminated '[' at character {} of '{}'",
                pattern[..byte].chars().count(),
                pattern
            ))
        })?;

        let name = &after[..close];
        match word_token(name) {
            Some(fragment) => regex.push_str(&fragment),
            None => regex.push_str(&regex::escape(&rest[open..open + close + 2])),
        }
        rest = &after[close + 1..];
    }

    regex.push_str(&regex::escape(rest));
    regex.push('$');
    Ok(regex)
}
