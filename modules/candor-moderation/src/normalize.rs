//! De-obfuscation scan used for matching only.
//!
//! Single pass over the lower-cased text, token by token (a token is a run of
//! non-whitespace). Whitespace is copied through untouched so phrase patterns
//! still see the original spacing. A token's core is rewritten when:
//!
//! - it contains `*` masking between letters: `f**k` -> `fuck`
//! - it is single letters joined by `.` or `-`: `s.h.i.t` -> `shit`
//! - it uses `@ $ ! 0 1 3` as letter substitutes: `sh!t` -> `shit`
//!
//! The last two only apply when the result is a known profanity form, so
//! emails, prices and ordinary punctuation pass through unchanged.

use crate::profanity::ProfanityIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Token core as written (lower-cased).
    pub original: String,
    /// De-obfuscated word.
    pub resolved: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub rewrites: Vec<Rewrite>,
}

impl Normalized {
    /// Whether `word` appears in the text only because the scan rewrote it.
    pub fn was_rewritten(&self, word: &str) -> bool {
        self.rewrites.iter().any(|r| r.resolved == word)
    }
}

const LEET: &[(char, char)] = &[
    ('@', 'a'),
    ('$', 's'),
    ('!', 'i'),
    ('0', 'o'),
    ('1', 'i'),
    ('3', 'e'),
];

pub fn normalize(text: &str, index: &ProfanityIndex) -> Normalized {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02bc}' => '\'',
            other => other,
        })
        .collect();

    let mut out = String::with_capacity(lowered.len());
    let mut rewrites = Vec::new();
    let mut token = String::new();

    for c in lowered.chars() {
        if c.is_whitespace() {
            flush(&mut token, &mut out, &mut rewrites, index);
            out.push(c);
        } else {
            token.push(c);
        }
    }
    flush(&mut token, &mut out, &mut rewrites, index);

    Normalized {
        text: out,
        rewrites,
    }
}

fn flush(token: &mut String, out: &mut String, rewrites: &mut Vec<Rewrite>, index: &ProfanityIndex) {
    if token.is_empty() {
        return;
    }
    match rewrite_token(token, index) {
        Some((rewritten, rewrite)) => {
            out.push_str(&rewritten);
            rewrites.push(rewrite);
        }
        None => out.push_str(token),
    }
    token.clear();
}

fn is_core_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '*' | '@' | '$')
}

fn is_core_end(c: char) -> bool {
    c.is_alphanumeric() || c == '*'
}

/// Rewrite one token, keeping its leading and trailing punctuation.
fn rewrite_token(token: &str, index: &ProfanityIndex) -> Option<(String, Rewrite)> {
    let start = token
        .char_indices()
        .find(|(_, c)| is_core_start(*c))
        .map(|(i, _)| i)?;
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| is_core_end(*c))
        .map(|(i, c)| i + c.len_utf8())?;
    if start >= end {
        return None;
    }

    let core = &token[start..end];
    if !core.chars().any(|c| c.is_alphabetic()) {
        return None;
    }

    let resolved = if core.contains('*') {
        index.resolve_mask(core)
    } else {
        collapse_spelled(core, index).or_else(|| unleet(core, index))
    }?;

    let rewritten = format!("{}{}{}", &token[..start], resolved, &token[end..]);
    Some((
        rewritten,
        Rewrite {
            original: core.to_string(),
            resolved,
        },
    ))
}

/// `f.u.c.k` / `s-h-i-t` -> joined letters, if that is a known form.
fn collapse_spelled(core: &str, index: &ProfanityIndex) -> Option<String> {
    if !core.contains(['.', '-']) {
        return None;
    }
    let parts: Vec<&str> = core.split(['.', '-']).collect();
    if parts.len() < 3 {
        return None;
    }
    let single_letters = parts.iter().all(|p| {
        let mut chars = p.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    });
    if !single_letters {
        return None;
    }
    let joined: String = parts.concat();
    index.is_form(&joined).then_some(joined)
}

/// Map letter substitutes back to letters, if the result is a known form.
fn unleet(core: &str, index: &ProfanityIndex) -> Option<String> {
    if !core.chars().any(|c| LEET.iter().any(|(sub, _)| *sub == c)) {
        return None;
    }
    let mapped: String = core
        .chars()
        .map(|c| {
            LEET.iter()
                .find(|(sub, _)| *sub == c)
                .map(|(_, letter)| *letter)
                .unwrap_or(c)
        })
        .collect();
    index.is_form(&mapped).then_some(mapped)
}
