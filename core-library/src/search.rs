//! Weighted multi-field relevance search over track records.
//!
//! Every track is scored against the query on four fields: title, artist,
//! album, and a combined "title artist album" text. Each field gets a raw
//! score from the first matching rule below, multiplied by the field weight:
//!
//! | Rule | Raw score |
//! |------|-----------|
//! | exact match (case-insensitive) | 1.0 |
//! | field starts with query | 0.9 |
//! | query is a whole word of the field | 0.8 |
//! | query is a substring | 0.6 |
//! | in-order character match ratio above 0.7 | ratio × 0.4 (halved when lengths differ wildly) |
//!
//! The best weighted field is the track's result. Results are ordered by
//! descending score; equal scores keep corpus order.

use crate::models::Track;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

/// Default minimum weighted score for a track to be included.
pub const DEFAULT_MIN_RELEVANCE: f64 = 0.1;

const EXACT_SCORE: f64 = 1.0;
const PREFIX_SCORE: f64 = 0.9;
const WORD_SCORE: f64 = 0.8;
const SUBSTRING_SCORE: f64 = 0.6;

const FUZZY_THRESHOLD: f64 = 0.7;
const FUZZY_SCALE: f64 = 0.4;
const FUZZY_LENGTH_PENALTY: f64 = 0.5;
const MIN_LENGTH_RATIO: f64 = 0.3;
const MAX_LENGTH_RATIO: f64 = 3.0;

/// Field a track was matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    Title,
    Artist,
    Album,
    /// Title, artist and album joined by spaces
    Combined,
}

impl SearchField {
    /// Fields in tie-break order: an equal score on an earlier field wins.
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Artist,
        SearchField::Album,
        SearchField::Combined,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            SearchField::Title => 1.0,
            SearchField::Artist => 0.8,
            SearchField::Album => 0.6,
            SearchField::Combined => 0.3,
        }
    }

    fn text<'a>(&self, track: &'a Track) -> Cow<'a, str> {
        match self {
            SearchField::Title => Cow::Borrowed(&track.title),
            SearchField::Artist => Cow::Borrowed(&track.artist),
            SearchField::Album => Cow::Borrowed(&track.album),
            SearchField::Combined => Cow::Owned(track.combined_text()),
        }
    }
}

/// Tunables for a search pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Tracks whose best weighted score is below this are dropped
    pub min_relevance: f64,
    /// Keep at most this many results, applied after ranking
    pub limit: Option<usize>,
    /// Enable the in-order character matching fallback
    pub fuzzy: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_relevance: DEFAULT_MIN_RELEVANCE,
            limit: None,
            fuzzy: true,
        }
    }
}

impl SearchOptions {
    pub fn with_min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = min_relevance;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }
}

/// A ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub track: Track,
    /// Field that produced the best score
    pub field: SearchField,
    /// Weighted score in `0.0..=1.0`
    pub score: f64,
    /// Text of the matched field, for highlighting
    pub matched_text: String,
}

/// Rank `corpus` against `query`.
///
/// An empty (or whitespace-only) query yields no results. Duplicate paths in
/// the corpus are scored once, at their first position.
pub fn search(corpus: &[Track], query: &str, options: &SearchOptions) -> Vec<SearchResultItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut results = Vec::new();
    for track in corpus {
        if !seen.insert(track.path.as_str()) {
            continue;
        }
        if let Some(item) = best_match(track, &query, options) {
            results.push(item);
        }
    }

    // `sort_by` is stable, so equal scores stay in corpus order.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(limit) = options.limit {
        results.truncate(limit);
    }

    results
}

fn best_match(track: &Track, query: &str, options: &SearchOptions) -> Option<SearchResultItem> {
    let mut best: Option<(SearchField, f64, Cow<'_, str>)> = None;

    for field in SearchField::ALL {
        let text = field.text(track);
        let score = raw_score(query, &text.to_lowercase(), options.fuzzy) * field.weight();

        if best.as_ref().map_or(true, |(_, top, _)| score > *top) {
            best = Some((field, score, text));
        }
    }

    let (field, score, text) = best?;
    if score <= 0.0 || score < options.min_relevance {
        return None;
    }

    Some(SearchResultItem {
        track: track.clone(),
        field,
        score,
        matched_text: text.into_owned(),
    })
}

/// Unweighted relevance of `query` against `text`, case-insensitive.
pub fn relevance(query: &str, text: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0.0;
    }
    raw_score(&query, &text.to_lowercase(), true)
}

/// Both arguments must already be lowercased and `query` non-empty.
fn raw_score(query: &str, text: &str, fuzzy: bool) -> f64 {
    if text == query {
        EXACT_SCORE
    } else if text.starts_with(query) {
        PREFIX_SCORE
    } else if contains_word(text, query) {
        WORD_SCORE
    } else if text.contains(query) {
        SUBSTRING_SCORE
    } else if fuzzy {
        fuzzy_score(query, text)
    } else {
        0.0
    }
}

/// True when `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters (or the string ends) on both sides.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn fuzzy_score(query: &str, text: &str) -> f64 {
    let query_chars: Vec<char> = query.chars().collect();
    let text_len = text.chars().count();
    if text_len == 0 {
        return 0.0;
    }

    // Single left-to-right pass: count query characters found in order.
    let mut matched = 0;
    for c in text.chars() {
        if matched < query_chars.len() && c == query_chars[matched] {
            matched += 1;
        }
    }

    let ratio = matched as f64 / query_chars.len() as f64;
    if ratio <= FUZZY_THRESHOLD {
        return 0.0;
    }

    let length_ratio = query_chars.len() as f64 / text_len as f64;
    if (MIN_LENGTH_RATIO..=MAX_LENGTH_RATIO).contains(&length_ratio) {
        ratio * FUZZY_SCALE
    } else {
        ratio * FUZZY_SCALE * FUZZY_LENGTH_PENALTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn track(path: &str, title: &str, artist: &str, album: &str) -> Track {
        Track::new(path, title, artist, album)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let corpus = vec![track("/a.mp3", "Anything", "Anyone", "")];

        assert!(search(&corpus, "", &SearchOptions::default()).is_empty());
        assert!(search(&corpus, "   ", &SearchOptions::default()).is_empty());
        assert!(search(&[], "", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let corpus = vec![track("/bad-guy.mp3", "Bad Guy", "Billie Eilish", "")];

        let results = search(&corpus, "bad guy", &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field, SearchField::Title);
        assert_close(results[0].score, 1.0);
        assert_eq!(results[0].matched_text, "Bad Guy");
    }

    #[test]
    fn test_substring_inside_word() {
        let corpus = vec![track("/bohemian.mp3", "Bohemian Rhapsody", "Queen", "")];

        let results = search(&corpus, "rhap", &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field, SearchField::Title);
        assert_close(results[0].score, 0.6);
    }

    #[test]
    fn test_rule_tiers() {
        assert_close(relevance("Queen", "queen"), 1.0);
        assert_close(relevance("bohem", "Bohemian Rhapsody"), 0.9);
        assert_close(relevance("rhapsody", "Bohemian Rhapsody"), 0.8);
        assert_close(relevance("guy", "Bad Guy (Remix)"), 0.8);
        assert_close(relevance("mian", "Bohemian Rhapsody"), 0.6);
    }

    #[test]
    fn test_fuzzy_match() {
        // b, h, m, n found in order in "bohemian": ratio 1.0, length ratio 0.5
        assert_close(relevance("bhmn", "Bohemian"), 0.4);
        // 3 of 4 characters in order: ratio 0.75
        assert_close(relevance("bhmx", "Bohemian"), 0.75 * 0.4);
        // only "b" is found before the search for "x" stalls
        assert_close(relevance("bxyn", "Bohemian"), 0.0);
    }

    #[test]
    fn test_fuzzy_penalizes_extreme_length_ratio() {
        let text = "a long title with barely any overlap c";
        // "alc" is an in-order subsequence but far shorter than the text
        assert_close(relevance("alc", text), 1.0 * 0.4 * 0.5);
    }

    #[test]
    fn test_fuzzy_can_be_disabled() {
        let corpus = vec![track("/bohemian.mp3", "Bohemian", "Queen", "Opera")];

        let fuzzy = search(&corpus, "bhmn", &SearchOptions::default());
        assert_eq!(fuzzy.len(), 1);
        assert_close(fuzzy[0].score, 0.4);

        let strict = search(&corpus, "bhmn", &SearchOptions::default().with_fuzzy(false));
        assert!(strict.is_empty());
    }

    #[test]
    fn test_exact_dominates_substring() {
        let corpus = vec![
            track("/1.mp3", "Love Songs Forever", "Someone", ""),
            track("/2.mp3", "Love", "Someone Else", ""),
        ];

        let results = search(&corpus, "LOVE", &SearchOptions::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].track.path, "/2.mp3");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_title_outweighs_album() {
        let corpus = vec![
            track("/album-hit.mp3", "Octopus's Garden", "The Beatles", "Yellow Submarine"),
            track("/title-hit.mp3", "Yellow Submarine", "The Beatles", "Revolver"),
        ];

        let results = search(&corpus, "yellow submarine", &SearchOptions::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].track.path, "/title-hit.mp3");
        assert_eq!(results[0].field, SearchField::Title);
        assert_eq!(results[1].field, SearchField::Album);
        assert!(results[0].score > results[1].score);
        assert_close(results[1].score, 0.6);
    }

    #[test]
    fn test_artist_match() {
        let corpus = vec![track("/a.mp3", "Some Song", "Queen", "Innuendo")];

        let results = search(&corpus, "queen", &SearchOptions::default());
        assert_eq!(results[0].field, SearchField::Artist);
        assert_close(results[0].score, 0.8);
    }

    #[test]
    fn test_combined_field_spans_fields() {
        let corpus = vec![track("/a.mp3", "Radio Ga Ga", "Queen", "The Works")];

        let results = search(&corpus, "ga queen", &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field, SearchField::Combined);
        assert_close(results[0].score, 0.8 * 0.3);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = vec![
            track("/first.mp3", "Intro", "A", ""),
            track("/second.mp3", "Intro", "B", ""),
            track("/third.mp3", "Intro", "C", ""),
        ];

        let paths: Vec<_> = search(&corpus, "intro", &SearchOptions::default())
            .into_iter()
            .map(|r| r.track.path)
            .collect();
        assert_eq!(paths, vec!["/first.mp3", "/second.mp3", "/third.mp3"]);
    }

    #[test]
    fn test_limit_applies_after_ranking() {
        let corpus = vec![
            track("/weak.mp3", "Midnight Sun Rising", "", ""),
            track("/strong.mp3", "Sun", "", ""),
        ];

        let results = search(&corpus, "sun", &SearchOptions::default().with_limit(1));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].track.path, "/strong.mp3");
    }

    #[test]
    fn test_min_relevance_filters_weak_matches() {
        let corpus = vec![track("/a.mp3", "Track", "Artist", "Greatest Hits")];

        let loose = search(&corpus, "hits", &SearchOptions::default());
        assert_eq!(loose.len(), 1);
        assert_close(loose[0].score, 0.8 * 0.6);

        let strict = search(&corpus, "hits", &SearchOptions::default().with_min_relevance(0.5));
        assert!(strict.is_empty());
    }

    #[test]
    fn test_no_match_is_excluded() {
        let corpus = vec![track("/a.mp3", "Yesterday", "The Beatles", "Help!")];

        let results = search(&corpus, "zzzz", &SearchOptions::default().with_min_relevance(0.0));
        assert!(results.is_empty());
    }

    #[test]
    fn test_duplicate_paths_scored_once() {
        let corpus = vec![
            track("/a.mp3", "Hello", "Adele", "25"),
            track("/a.mp3", "Hello", "Adele", "25"),
        ];

        assert_eq!(search(&corpus, "hello", &SearchOptions::default()).len(), 1);
    }

    #[test]
    fn test_word_boundary_helper() {
        assert!(contains_word("bad guy", "guy"));
        assert!(contains_word("rock-n-roll", "n"));
        assert!(!contains_word("bohemian rhapsody", "rhap"));
        assert!(!contains_word("guyana", "guy"));
    }
}
