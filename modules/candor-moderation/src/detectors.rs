use std::sync::LazyLock;

use regex::Regex;

use candor_common::{CandorError, Category, Lexicon};

use crate::normalize::Normalized;
use crate::profanity::ProfanityIndex;

/// What one detector found.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub category: Category,
    /// Canonical terms for `flagged_words`. Only profanity fills this.
    pub flagged: Vec<String>,
    /// Reason clause naming the category.
    pub clause: String,
    /// How sure the detector is, 0.0-1.0.
    pub certainty: f32,
}

/// Both views of the submitted text.
pub struct DetectorInput<'a> {
    pub raw: &'a str,
    pub normalized: &'a Normalized,
}

/// Lexicon-derived tables, compiled once per pipeline.
#[derive(Debug, Clone)]
pub struct Tables {
    pub profanity: ProfanityIndex,
    pub threats: Regex,
    pub discrimination: Regex,
}

impl Tables {
    pub fn compile(lexicon: &Lexicon) -> Result<Self, CandorError> {
        lexicon.validate()?;
        Ok(Self {
            profanity: ProfanityIndex::new(&lexicon.profanity),
            threats: phrase_regex(&lexicon.threats)?,
            discrimination: phrase_regex(&lexicon.discrimination)?,
        })
    }
}

/// One alternation over all phrases, word-bounded. Words may be separated by
/// any whitespace and apostrophes are optional (`don't` matches `dont`).
fn phrase_regex(phrases: &[String]) -> Result<Regex, CandorError> {
    let alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(|word| regex::escape(word).replace('\'', "'?"))
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|p| !p.is_empty())
        .collect();

    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
        .map_err(|e| CandorError::Lexicon(format!("phrase table does not compile: {e}")))
}

pub type Detector = fn(&Tables, &DetectorInput<'_>) -> Option<Finding>;

/// Every detector, in the order their findings are reported.
pub const DETECTORS: [(Category, Detector); 5] = [
    (Category::Profanity, detect_profanity),
    (Category::PersonalInfo, detect_personal_info),
    (Category::Spam, detect_spam),
    (Category::Threat, detect_threat),
    (Category::Discrimination, detect_discrimination),
];

// --- Profanity ---

pub fn detect_profanity(tables: &Tables, input: &DetectorInput<'_>) -> Option<Finding> {
    let mut flagged = Vec::new();
    let mut rewritten_hit = false;

    for word in input
        .normalized
        .text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
    {
        if let Some(root) = tables.profanity.root_of(word) {
            rewritten_hit |= input.normalized.was_rewritten(word);
            flagged.push(root.to_string());
        }
    }

    if flagged.is_empty() {
        return None;
    }

    let mut shown: Vec<String> = Vec::new();
    for w in &flagged {
        if !shown.contains(w) {
            shown.push(w.clone());
        }
    }

    Some(Finding {
        category: Category::Profanity,
        clause: format!("contains profanity ({})", shown.join(", ")),
        flagged,
        // Resolved masks are a guess at the hidden word
        certainty: if rewritten_hit { 0.85 } else { 1.0 },
    })
}

// --- Personal information ---

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{1,4}\)[\s.-]?)?\b\d(?:[\s.-]?\d){6,}\b").unwrap()
});
/// Digit runs the phone pattern catches that are not phones: one or more year
/// ranges (`2015-2018 2019-2022`), ISO dates and space-grouped amounts.
static NOT_A_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?:19|20)\d{2}[-.](?:19|20)\d{2}(?:[\s,]+(?:19|20)\d{2}[-.](?:19|20)\d{2})*",
        r"|(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])",
        r"|\d{1,3}(?: \d{3}){2,}",
        r")$"
    ))
    .unwrap()
});

pub fn detect_personal_info(_tables: &Tables, input: &DetectorInput<'_>) -> Option<Finding> {
    let emails = EMAIL_RE.find_iter(input.raw).count();
    let phones = PHONE_RE
        .find_iter(input.raw)
        .filter(|m| !NOT_A_PHONE_RE.is_match(m.as_str().trim()))
        .count();

    if emails == 0 && phones == 0 {
        return None;
    }

    let mut kinds = Vec::new();
    if emails > 0 {
        kinds.push(counted(emails, "email address", "email addresses"));
    }
    if phones > 0 {
        kinds.push(counted(phones, "phone number", "phone numbers"));
    }

    Some(Finding {
        category: Category::PersonalInfo,
        flagged: Vec::new(),
        clause: format!("contains personal information ({})", kinds.join(", ")),
        certainty: if emails > 0 { 1.0 } else { 0.9 },
    })
}

fn counted(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        one.to_string()
    } else {
        format!("{n} {many}")
    }
}

// --- Spam ---

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\bhttps?://|\bwww\.)\S+").unwrap());

/// Share of upper-case letters above which text counts as shouting.
pub const SHOUTING_UPPER_RATIO: f32 = 0.7;
/// Fewer letters than this are too short to judge case ratio.
pub const SHOUTING_MIN_LETTERS: usize = 5;

pub fn detect_spam(_tables: &Tables, input: &DetectorInput<'_>) -> Option<Finding> {
    let has_url = URL_RE.is_match(input.raw);
    let shouting = shouting_certainty(input.raw);

    let clause = match (has_url, shouting) {
        (true, Some(_)) => "contains a URL and looks like spam",
        (true, None) => "contains a URL",
        (false, Some(_)) => "looks like spam (excessive punctuation or shouting)",
        (false, None) => return None,
    };

    Some(Finding {
        category: Category::Spam,
        flagged: Vec::new(),
        clause: clause.to_string(),
        certainty: if has_url { 1.0 } else { shouting.unwrap_or(1.0) },
    })
}

/// Some(certainty) when the text shouts: `!!` anywhere, or mostly upper-case
/// letters with two or more `!`/`*` bursts.
fn shouting_certainty(raw: &str) -> Option<f32> {
    let mut longest_bang = 0usize;
    let mut bang_run = 0usize;
    let mut bursts = 0usize;
    let mut in_burst = false;
    let mut letters = 0usize;
    let mut upper = 0usize;

    for c in raw.chars() {
        if c == '!' {
            bang_run += 1;
            longest_bang = longest_bang.max(bang_run);
        } else {
            bang_run = 0;
        }

        let burst_char = c == '!' || c == '*';
        if burst_char && !in_burst {
            bursts += 1;
        }
        in_burst = burst_char;

        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }

    if longest_bang >= 3 {
        return Some(0.8);
    }

    let caps = letters >= SHOUTING_MIN_LETTERS
        && upper as f32 / letters as f32 >= SHOUTING_UPPER_RATIO
        && bursts >= 2;
    if caps {
        return Some(0.75);
    }

    // Bare "!!" sits right on the threshold
    (longest_bang == 2).then_some(0.6)
}

// --- Threats / discrimination ---

pub fn detect_threat(tables: &Tables, input: &DetectorInput<'_>) -> Option<Finding> {
    tables
        .threats
        .is_match(&input.normalized.text)
        .then(|| Finding {
            category: Category::Threat,
            flagged: Vec::new(),
            clause: "contains threatening language".to_string(),
            certainty: 0.9,
        })
}

pub fn detect_discrimination(tables: &Tables, input: &DetectorInput<'_>) -> Option<Finding> {
    tables
        .discrimination
        .is_match(&input.normalized.text)
        .then(|| Finding {
            category: Category::Discrimination,
            flagged: Vec::new(),
            clause: "contains discriminatory language".to_string(),
            certainty: 0.9,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn tables() -> Tables {
        Tables::compile(Lexicon::builtin()).unwrap()
    }

    fn run(detector: Detector, text: &str) -> Option<Finding> {
        let tables = tables();
        let normalized = normalize(text, &tables.profanity);
        detector(
            &tables,
            &DetectorInput {
                raw: text,
                normalized: &normalized,
            },
        )
    }

    #[test]
    fn profanity_reports_roots_in_order_with_duplicates() {
        let f = run(detect_profanity, "Shit pay, shitty hours, f**k this").unwrap();
        assert_eq!(f.flagged, vec!["shit", "shit", "fuck"]);
        assert_eq!(f.clause, "contains profanity (shit, fuck)");
        assert!(f.certainty < 1.0);
    }

    #[test]
    fn literal_profanity_is_certain() {
        let f = run(detect_profanity, "what a damn mess").unwrap();
        assert_eq!(f.flagged, vec!["damn"]);
        assert_eq!(f.certainty, 1.0);
    }

    #[test]
    fn profanity_needs_whole_words() {
        assert!(run(detect_profanity, "Great class, assorted perks, Dickensian hours").is_none());
    }

    #[test]
    fn civil_criticism_is_not_profanity() {
        assert!(run(detect_profanity, "Management could be better").is_none());
        assert!(run(detect_profanity, "Below market salary and slow promotions").is_none());
    }

    #[test]
    fn detects_email_and_phone() {
        let f = run(
            detect_personal_info,
            "Mail jane.doe@corp.io or a@b.co, call (612) 555-1234",
        )
        .unwrap();
        assert_eq!(
            f.clause,
            "contains personal information (2 email addresses, phone number)"
        );
    }

    #[test]
    fn detects_international_phone() {
        assert!(run(detect_personal_info, "WhatsApp +44 20 7946 0958").is_some());
        assert!(run(detect_personal_info, "call 5551234").is_some());
    }

    #[test]
    fn year_ranges_and_short_numbers_are_not_phones() {
        assert!(run(detect_personal_info, "Worked there 2019-2023, got a 3% raise").is_none());
        assert!(run(detect_personal_info, "Salary was $85,000 in 2021").is_none());
    }

    #[test]
    fn dates_and_amounts_are_not_phones() {
        assert!(run(detect_personal_info, "Worked 2015-2018 2019-2022 on two teams").is_none());
        assert!(run(detect_personal_info, "Offer arrived on 2023-01-15").is_none());
        assert!(run(detect_personal_info, "Revenue passed 12 000 000 last year").is_none());
        // A real number next to a date still counts
        assert!(run(detect_personal_info, "On 2023-01-15 call 555-123-4567").is_some());
    }

    #[test]
    fn url_is_spam() {
        let f = run(detect_spam, "See https://example.com for jobs").unwrap();
        assert!(f.clause.contains("URL"));
        assert!(run(detect_spam, "visit www.cheap-jobs.biz").is_some());
    }

    #[test]
    fn shouting_is_spam() {
        let f = run(detect_spam, "BUY NOW!!!").unwrap();
        assert!(f.clause.contains("spam"));
        assert_eq!(f.certainty, 0.8);
    }

    #[test]
    fn caps_with_repeated_bursts_is_spam() {
        let f = run(detect_spam, "BEST JOB EVER! APPLY TODAY! ***").unwrap();
        assert_eq!(f.certainty, 0.75);
    }

    #[test]
    fn single_exclamation_is_fine() {
        assert!(run(detect_spam, "Great team, would recommend!").is_none());
        assert!(run(detect_spam, "GREAT TEAM!").is_none());
    }

    #[test]
    fn double_exclamation_is_near_threshold() {
        let f = run(detect_spam, "Loved it!!").unwrap();
        assert_eq!(f.certainty, 0.6);
    }

    #[test]
    fn threat_phrases_match_across_spacing_and_case() {
        assert!(run(detect_threat, "I will  KILL YOU").is_some());
        assert!(run(detect_threat, "the manager deserves to die").is_some());
        assert!(run(detect_threat, "this process kills your motivation").is_none());
    }

    #[test]
    fn discrimination_phrases_ignore_apostrophes() {
        assert!(run(detect_discrimination, "They said women dont belong in tech").is_some());
        assert!(run(detect_discrimination, "They only hire people from our race").is_some());
        assert!(run(detect_discrimination, "The tech stack is too old").is_none());
    }

    #[test]
    fn phrase_regex_escapes_metacharacters() {
        let re = phrase_regex(&["c++ sucks".to_string()]).unwrap();
        assert!(re.is_match("honestly c++ sucks here"));
    }
}
