use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::CandorError;

/// Word and phrase tables the moderation detectors match against.
///
/// Built once at process start (built-in or loaded from JSON) and then only
/// shared by reference. Entries are trimmed and lower-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Profanity roots. Inflected forms are derived by the matcher.
    pub profanity: Vec<String>,
    /// Phrases expressing violence or harm toward a person.
    pub threats: Vec<String>,
    /// Phrases disparaging a protected characteristic in a workplace context.
    pub discrimination: Vec<String>,
}

const BUILTIN_PROFANITY: &[&str] = &[
    "fuck",
    "shit",
    "ass",
    "asshole",
    "bitch",
    "bastard",
    "bullshit",
    "cunt",
    "dick",
    "dickhead",
    "motherfucker",
    "piss",
    "prick",
    "twat",
    "wanker",
    "whore",
    "slut",
    "crap",
    "damn",
];

const BUILTIN_THREATS: &[&str] = &[
    "kill you",
    "kill him",
    "kill her",
    "kill them",
    "kill everyone",
    "deserve to die",
    "deserves to die",
    "hope you die",
    "hope he dies",
    "hope she dies",
    "hope you get hurt",
    "going to hurt you",
    "i will hurt you",
    "i'll hurt you",
    "beat you up",
    "break your legs",
    "watch your back",
    "find where you live",
    "know where you live",
    "burn this place down",
    "shoot up the office",
];

const BUILTIN_DISCRIMINATION: &[&str] = &[
    "don't belong in tech",
    "women don't belong",
    "women can't code",
    "only hire people from our race",
    "only hire men",
    "never hire women",
    "won't hire women",
    "no place for women",
    "too old to work here",
    "too old to learn",
    "old people can't",
    "because of their race",
    "because of her race",
    "because of his race",
    "go back to your country",
    "people like you don't belong",
];

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(|| {
    let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Lexicon {
        profanity: owned(BUILTIN_PROFANITY),
        threats: owned(BUILTIN_THREATS),
        discrimination: owned(BUILTIN_DISCRIMINATION),
    }
});

impl Lexicon {
    /// Built-in tables, shared process-wide.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Parse a lexicon from JSON with `profanity`, `threats` and `discrimination` arrays.
    pub fn from_json(json: &str) -> Result<Self, CandorError> {
        let raw: Lexicon = serde_json::from_str(json)
            .map_err(|e| CandorError::Lexicon(format!("invalid lexicon JSON: {e}")))?;
        raw.normalized()
    }

    pub fn load(path: &Path) -> Result<Self, CandorError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CandorError::Lexicon(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Trim, lower-case and dedup entries; reject empty tables and
    /// profanity roots that are not a single alphabetic word.
    fn normalized(self) -> Result<Self, CandorError> {
        let cleaned = Self {
            profanity: clean_list("profanity", self.profanity)?,
            threats: clean_list("threats", self.threats)?,
            discrimination: clean_list("discrimination", self.discrimination)?,
        };
        cleaned.validate()?;
        Ok(cleaned)
    }

    /// Every profanity root must be one word of letters.
    pub fn validate(&self) -> Result<(), CandorError> {
        // Profanity is matched word by word, so a root with spaces or
        // punctuation could never fire
        if let Some(bad) = self.profanity.iter().find(|r| !r.chars().all(char::is_alphabetic)) {
            return Err(CandorError::Lexicon(format!(
                "profanity root {bad:?} must be a single word of letters; list phrases under threats or discrimination"
            )));
        }
        Ok(())
    }
}

fn clean_list(name: &str, entries: Vec<String>) -> Result<Vec<String>, CandorError> {
    let mut out: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let e = entry.trim().to_lowercase();
        if !e.is_empty() && !out.contains(&e) {
            out.push(e);
        }
    }
    if out.is_empty() {
        return Err(CandorError::Lexicon(format!("{name} list is empty")));
    }
    Ok(out)
}
