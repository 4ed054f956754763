use std::collections::HashMap;

/// Suffixes that map an inflected word back to its lexicon root.
pub const INFLECTIONS: &[&str] = &["", "s", "es", "ing", "in", "ed", "er", "ers", "y", "ty"];

/// Every inflected profanity form, mapped to the root it came from.
///
/// Form order follows lexicon order, then `INFLECTIONS` order. Masked-word
/// resolution walks forms in that order, so the first lexicon root wins ties.
#[derive(Debug, Clone)]
pub struct ProfanityIndex {
    roots: Vec<String>,
    forms: Vec<(Vec<char>, usize)>,
    by_form: HashMap<String, usize>,
}

impl ProfanityIndex {
    pub fn new(roots: &[String]) -> Self {
        let mut forms = Vec::with_capacity(roots.len() * INFLECTIONS.len());
        let mut by_form = HashMap::new();

        for (idx, root) in roots.iter().enumerate() {
            for suffix in INFLECTIONS {
                let form = format!("{root}{suffix}");
                // First root to claim a form keeps it
                if by_form.contains_key(&form) {
                    continue;
                }
                forms.push((form.chars().collect(), idx));
                by_form.insert(form, idx);
            }
        }

        Self {
            roots: roots.to_vec(),
            forms,
            by_form,
        }
    }

    /// Root for an exact (already lower-cased) word, if it is a known form.
    pub fn root_of(&self, word: &str) -> Option<&str> {
        self.by_form.get(word).map(|&i| self.roots[i].as_str())
    }

    pub fn is_form(&self, word: &str) -> bool {
        self.by_form.contains_key(word)
    }

    /// Resolve a masked word like `f**k` or `f***ing` to the form it hides.
    ///
    /// Each `*` first stands for exactly one letter. If nothing matches, a run
    /// of `*` between two visible letters may stand for one extra letter
    /// (`f*k`). That fallback needs two visible letters and a letter at both
    /// ends, so `a*` or `m*n` never stretch into a longer root. Anything other
    /// than letters and `*` never resolves.
    pub fn resolve_mask(&self, masked: &str) -> Option<String> {
        let pattern: Vec<char> = masked.chars().collect();
        if !pattern.iter().all(|c| c.is_alphabetic() || *c == '*') {
            return None;
        }
        if !pattern.iter().any(|c| c.is_alphabetic()) || !pattern.contains(&'*') {
            return None;
        }

        let exact = self
            .forms
            .iter()
            .find(|(form, _)| masked_exact(&pattern, form));
        let hit = exact.or_else(|| {
            if !stretchable(&pattern) {
                return None;
            }
            let runs = star_runs(&pattern);
            self.forms
                .iter()
                .filter(|(form, _)| form.len() > pattern.len() && form.len() <= pattern.len() + runs)
                .find(|(form, _)| masked_stretched(&pattern, form))
        });

        hit.map(|(form, _)| form.iter().collect())
    }
}

fn masked_exact(pattern: &[char], form: &[char]) -> bool {
    pattern.len() == form.len()
        && pattern
            .iter()
            .zip(form)
            .all(|(p, f)| *p == '*' || p == f)
}

/// Two or more visible letters, and the mask starts and ends on a letter.
fn stretchable(pattern: &[char]) -> bool {
    let visible = pattern.iter().filter(|c| c.is_alphabetic()).count();
    let ends_on_letters = matches!(
        (pattern.first(), pattern.last()),
        (Some(a), Some(b)) if a.is_alphabetic() && b.is_alphabetic()
    );
    visible >= 2 && ends_on_letters
}

fn star_runs(pattern: &[char]) -> usize {
    pattern
        .iter()
        .enumerate()
        .filter(|(i, c)| **c == '*' && (*i == 0 || pattern[i - 1] != '*'))
        .count()
}

/// Each run of `k` stars covers `k` or `k + 1` letters.
fn masked_stretched(pattern: &[char], form: &[char]) -> bool {
    match pattern.first() {
        None => form.is_empty(),
        Some('*') => {
            let run = pattern.iter().take_while(|c| **c == '*').count();
            let rest = &pattern[run..];
            (run..=run + 1)
                .filter(|taken| *taken <= form.len())
                .any(|taken| masked_stretched(rest, &form[taken..]))
        }
        Some(c) => form.first() == Some(c) && masked_stretched(&pattern[1..], &form[1..]),
    }
}
