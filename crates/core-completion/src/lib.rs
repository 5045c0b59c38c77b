//! Pure completion ranking, shared by prompt-mode tab-completion and
//! insert-mode word completion.
//!
//! Grounded on Kakoune's `completion.hh`/`completion.cc` for the
//! `Completions { candidates, start, end }` value type and
//! `insert_completer.hh`/`insert_completer.cc` for the prefix and
//! subsequence ranking policies, generalized to pure functions over
//! `&str` with no filesystem access (the teacher's `core-keymap` crate is
//! the style precedent for a small, pure, dependency-free helper crate).

/// A completion candidate list anchored at a byte range of the line that
/// produced it: accepting a candidate replaces `start..end` with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    pub candidates: Vec<String>,
    pub start: usize,
    pub end: usize,
}

impl Completions {
    pub fn new(candidates: Vec<String>, start: usize, end: usize) -> Self {
        Completions { candidates, start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Candidates whose text starts with `input`, in their original relative
/// order (ties are not reordered: insertion order is the tiebreak).
pub fn complete_prefix<'a>(candidates: &'a [String], input: &str) -> Vec<&'a str> {
    candidates
        .iter()
        .map(String::as_str)
        .filter(|c| c.starts_with(input))
        .collect()
}

/// Candidates that contain every character of `input` in order (not
/// necessarily contiguous), paired with a score where a higher value is a
/// tighter, earlier match; sorted score-descending (best match first).
pub fn complete_subsequence<'a>(candidates: &'a [String], input: &str) -> Vec<(&'a str, i64)> {
    if input.is_empty() {
        return candidates.iter().map(|c| (c.as_str(), 0)).collect();
    }
    let mut scored: Vec<(&str, i64)> = candidates
        .iter()
        .filter_map(|c| subsequence_score(input, c).map(|score| (c.as_str(), score.rank())))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SubsequenceScore {
    first_match: usize,
    span: usize,
    len: usize,
}

impl SubsequenceScore {
    /// Packs the three tiebreak fields (each compared earlier-wins-first)
    /// into one descending-sorts-best `i64`: negating the weighted sum
    /// turns "smallest tuple wins" into "largest score wins".
    fn rank(self) -> i64 {
        let combined = (self.first_match as i64) * 1_000_000 + (self.span as i64) * 1_000 + self.len as i64;
        -combined
    }
}

/// `None` if `needle`'s characters do not all appear, in order, in
/// `haystack`. Matching is greedy-leftmost: each needle character consumes
/// the earliest remaining haystack character that equals it.
fn subsequence_score(needle: &str, haystack: &str) -> Option<SubsequenceScore> {
    let mut needle_chars = needle.chars();
    let mut want = needle_chars.next()?;
    let mut first_match = None;
    let mut last_match = 0usize;
    for (i, c) in haystack.chars().enumerate() {
        if c == want {
            if first_match.is_none() {
                first_match = Some(i);
            }
            last_match = i;
            match needle_chars.next() {
                Some(next) => want = next,
                None => {
                    let first_match = first_match?;
                    return Some(SubsequenceScore {
                        first_match,
                        span: last_match - first_match,
                        len: haystack.chars().count(),
                    });
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefix_keeps_only_matching_candidates_in_order() {
        let candidates = strings(&["select", "selection", "set", "split"]);
        assert_eq!(complete_prefix(&candidates, "se"), vec!["select", "selection", "set"]);
    }

    #[test]
    fn subsequence_rejects_out_of_order_characters() {
        let candidates = strings(&["select"]);
        assert!(complete_subsequence(&candidates, "tes").is_empty());
    }

    #[test]
    fn subsequence_ranks_tighter_earlier_matches_first() {
        let candidates = strings(&["xxselectxx", "select", "sel_e_c_t"]);
        let ranked = complete_subsequence(&candidates, "sel");
        assert_eq!(ranked[0].0, "select");
        assert!(ranked[0].1 > ranked[1].1, "a tighter match must outscore a looser one");
    }

    #[test]
    fn empty_needle_returns_everything_unranked() {
        let candidates = strings(&["a", "b"]);
        assert_eq!(complete_subsequence(&candidates, ""), vec![("a", 0), ("b", 0)]);
    }
}
