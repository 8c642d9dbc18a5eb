//! City-name matching between a selected city and service-point city labels.
//!
//! One deterministic policy, applied in stages:
//!
//! 1. [`MatchKind::Exact`]: trimmed, whitespace-collapsed, case-insensitive
//!    equality.
//! 2. [`MatchKind::Normalized`]: equality after [`normalize_city_name`].
//! 3. [`MatchKind::Contains`]: one normalized name contains the other. The
//!    contained side must be at least [`MIN_CONTAINED_CHARS`] characters.
//! 4. [`MatchKind::TokenOverlap`]: a shared word of at least 3 characters,
//!    or two words of at least 4 characters where one contains the other.
//!
//! Each stage scans the whole candidate list before the next stage is tried,
//! and the first candidate satisfying a stage wins. There is no ranking among
//! several candidates that satisfy the same stage.

use std::sync::LazyLock;

use regex::Regex;

/// Shortest normalized name allowed to match by containment.
pub const MIN_CONTAINED_CHARS: usize = 3;

const MIN_SHARED_TOKEN_CHARS: usize = 3;
const MIN_NESTED_TOKEN_CHARS: usize = 4;

/// Apostrophe look-alikes used interchangeably in Uzbek Latin (`o'`, `g'`).
const APOSTROPHES: &[char] = &[
    '\'', '`', '\u{2018}', '\u{2019}', '\u{02BB}', '\u{02BC}', '\u{00B4}', '\u{2032}',
];

/// Administrative words dropped during normalization (uz, ru, en).
const ADMINISTRATIVE_WORDS: &[&str] = &[
    // en
    "city", "town", "district", "region", "province", "oblast", "rayon", "raion",
    // uz latin
    "shahri", "shahar", "shaharchasi", "sh", "tumani", "tuman", "viloyati", "viloyat", "vil",
    // uz cyrillic
    "шаҳри", "шахри", "шаҳар", "тумани", "вилояти",
    // ru
    "город", "гор", "г", "район", "р", "н", "область", "обл", "посёлок", "поселок", "пос",
];

/// Adjective endings stripped from a word when the stem stays long enough,
/// e.g. `ташкентская` -> `ташкент`, `samarkandskaya` -> `samarkand`.
const ADJECTIVE_ENDINGS: &[&str] = &[
    "ская", "ский", "ское", "ской", "ские", "skaya", "skiy", "skij", "skoye", "skoe", "skoy",
];

const MIN_STEM_CHARS: usize = 4;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]+").expect("valid non-word regex"));

/// Which stage of the policy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Normalized,
    Contains,
    TokenOverlap,
}

impl MatchKind {
    /// Stages in the order they are tried.
    pub const ORDER: [MatchKind; 4] = [
        MatchKind::Exact,
        MatchKind::Normalized,
        MatchKind::Contains,
        MatchKind::TokenOverlap,
    ];

    /// Returns `true` when `query` and `candidate` match at this stage.
    #[must_use]
    pub fn test(self, query: &CityKey, candidate: &CityKey) -> bool {
        match self {
            MatchKind::Exact => query.exact == candidate.exact,
            MatchKind::Normalized => {
                !query.normalized.is_empty() && query.normalized == candidate.normalized
            }
            MatchKind::Contains => contains_either_way(&query.normalized, &candidate.normalized),
            MatchKind::TokenOverlap => tokens_overlap(&query.normalized, &candidate.normalized),
        }
    }
}

/// Pre-computed comparison forms of one city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityKey {
    exact: String,
    normalized: String,
}

impl CityKey {
    /// Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let exact = collapse_whitespace(raw).to_lowercase();
        if exact.is_empty() {
            return None;
        }
        Some(Self {
            exact,
            normalized: normalize_city_name(raw),
        })
    }

    #[must_use]
    pub fn exact(&self) -> &str {
        &self.exact
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Earliest stage at which the two keys match, if any.
#[must_use]
pub fn match_kind(query: &CityKey, candidate: &CityKey) -> Option<MatchKind> {
    MatchKind::ORDER
        .into_iter()
        .find(|kind| kind.test(query, candidate))
}

/// Finds the first item whose key matches `query`, stage by stage.
///
/// Items without a key (blank city labels) never match.
pub fn find_first<'a, T, F>(query: &CityKey, items: &'a [T], key: F) -> Option<(&'a T, MatchKind)>
where
    F: Fn(&T) -> Option<&CityKey>,
{
    for kind in MatchKind::ORDER {
        let hit = items
            .iter()
            .find(|&item| key(item).is_some_and(|candidate| kind.test(query, candidate)));
        if let Some(item) = hit {
            if kind != MatchKind::Exact {
                tracing::debug!(
                    query = %query.exact,
                    candidate = key(item).map_or("", CityKey::exact),
                    kind = ?kind,
                    "city matched by fallback"
                );
            }
            return Some((item, kind));
        }
    }
    None
}

/// Lower-cases, unifies punctuation, drops administrative words and strips
/// adjective endings.
///
/// If every word is administrative (a city literally called "Region"), the
/// punctuation-cleaned words are kept as they are.
#[must_use]
pub fn normalize_city_name(raw: &str) -> String {
    let lowered: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !APOSTROPHES.contains(c))
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let kept: Vec<String> = words
        .iter()
        .filter(|w| !ADMINISTRATIVE_WORDS.contains(*w))
        .map(|w| strip_adjective_ending(w).to_owned())
        .collect();

    if kept.is_empty() {
        words.join(" ")
    } else {
        kept.join(" ")
    }
}

fn strip_adjective_ending(word: &str) -> &str {
    for ending in ADJECTIVE_ENDINGS {
        if let Some(stem) = word.strip_suffix(*ending) {
            if stem.chars().count() >= MIN_STEM_CHARS {
                return stem;
            }
        }
    }
    word
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_either_way(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    shorter.chars().count() >= MIN_CONTAINED_CHARS && longer.contains(shorter)
}

fn tokens_overlap(a: &str, b: &str) -> bool {
    a.split_whitespace().any(|ta| {
        let la = ta.chars().count();
        b.split_whitespace().any(|tb| {
            let lb = tb.chars().count();
            (ta == tb && la >= MIN_SHARED_TOKEN_CHARS)
                || (la >= MIN_NESTED_TOKEN_CHARS
                    && lb >= MIN_NESTED_TOKEN_CHARS
                    && (ta.contains(tb) || tb.contains(ta)))
        })
    })
}

#[cfg(test)]
#[path = "matching_test.rs"]
mod tests;
