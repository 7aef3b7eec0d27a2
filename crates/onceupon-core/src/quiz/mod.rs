//! Quiz scoring and literary-type resolution
//!
//! Scoring is a fixed-weight linear table: every chosen option adds its
//! score vector to a running total per type, and the type with the
//! highest total wins. Ties resolve to the type that comes first in
//! canonical order.

mod progress;
mod questions;

pub use progress::{QuizProgress, QuizState};
pub use questions::{question, QuizOption, QuizQuestion, OPTIONS_PER_QUESTION, QUESTIONS, QUESTION_COUNT};

use crate::error::{Error, Result};
use crate::LiteraryType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated option position within a question (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// The first option of a question
    pub const FIRST: OptionIndex = OptionIndex(0);

    /// Create an option index, rejecting positions past the last option
    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) < OPTIONS_PER_QUESTION {
            Ok(Self(index))
        } else {
            Err(Error::InvalidOption(index))
        }
    }

    /// Get the raw position
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<OptionIndex> for u8 {
    fn from(index: OptionIndex) -> Self {
        index.0
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accumulated score per literary type, kept in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores(IndexMap<LiteraryType, u32>);

impl Scores {
    /// All types at zero
    pub fn new() -> Self {
        Self(LiteraryType::ALL.into_iter().map(|t| (t, 0)).collect())
    }

    /// Total for a single type
    pub fn get(&self, kind: LiteraryType) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Add an option's score vector
    pub fn add_option(&mut self, option: &QuizOption) {
        for kind in LiteraryType::ALL {
            *self.0.entry(kind).or_insert(0) += u32::from(option.score_for(kind));
        }
    }

    /// Fold another partial total into this one
    pub fn merge(&mut self, other: &Scores) {
        for kind in LiteraryType::ALL {
            *self.0.entry(kind).or_insert(0) += other.get(kind);
        }
    }

    /// Iterate `(type, total)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (LiteraryType, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Highest total; the earliest type in canonical order wins ties
    pub fn resolve(&self) -> LiteraryType {
        let mut best = LiteraryType::ALL[0];
        let mut best_score = self.get(best);
        for kind in LiteraryType::ALL.into_iter().skip(1) {
            let score = self.get(kind);
            if score > best_score {
                best = kind;
                best_score = score;
            }
        }
        best
    }
}

impl Default for Scores {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum the score vectors of a full set of answers
pub fn tally(answers: &[OptionIndex; QUESTION_COUNT]) -> Scores {
    let mut scores = Scores::new();
    for (question, answer) in QUESTIONS.iter().zip(answers) {
        scores.add_option(&question.options[answer.get()]);
    }
    scores
}

/// Resolve a completed quiz to its literary type
pub fn score_answers(answers: &[OptionIndex; QUESTION_COUNT]) -> LiteraryType {
    tally(answers).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodeRng;

    fn uniform(option: u8) -> [OptionIndex; QUESTION_COUNT] {
        [OptionIndex::new(option).unwrap(); QUESTION_COUNT]
    }

    fn random_answers(rng: &mut CodeRng) -> [OptionIndex; QUESTION_COUNT] {
        let mut answers = uniform(0);
        for a in answers.iter_mut() {
            *a = OptionIndex::new(rng.below(4) as u8).unwrap();
        }
        answers
    }

    #[test]
    fn test_option_index_bounds() {
        assert!(OptionIndex::new(3).is_ok());
        assert_eq!(OptionIndex::new(4), Err(Error::InvalidOption(4)));
    }

    #[test]
    fn test_option_index_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<OptionIndex>("2").is_ok());
        assert!(serde_json::from_str::<OptionIndex>("7").is_err());
    }

    #[test]
    fn test_uniform_answers_pick_matching_type() {
        assert_eq!(score_answers(&uniform(0)), LiteraryType::Romantic);
        assert_eq!(score_answers(&uniform(1)), LiteraryType::Detective);
        assert_eq!(score_answers(&uniform(2)), LiteraryType::Dreamer);
    }

    #[test]
    fn test_uniform_totals() {
        let scores = tally(&uniform(0));
        let expected: u32 = QUESTIONS
            .iter()
            .map(|q| u32::from(q.options[0].score_for(LiteraryType::Romantic)))
            .sum();
        assert_eq!(scores.get(LiteraryType::Romantic), expected);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let mut rng = CodeRng::new(7);
        for _ in 0..200 {
            let answers = random_answers(&mut rng);
            assert_eq!(score_answers(&answers), score_answers(&answers));
        }
    }

    #[test]
    fn test_summation_order_does_not_matter() {
        let mut rng = CodeRng::new(99);
        for _ in 0..50 {
            let answers = random_answers(&mut rng);
            let forward = tally(&answers);

            let mut order: Vec<usize> = (0..QUESTION_COUNT).collect();
            rng.shuffle(&mut order);
            let mut shuffled = Scores::new();
            for i in order {
                shuffled.add_option(&QUESTIONS[i].options[answers[i].get()]);
            }

            assert_eq!(forward, shuffled);
        }
    }

    #[test]
    fn test_merge_of_halves_equals_whole() {
        let answers = uniform(3);
        let mut first = Scores::new();
        let mut second = Scores::new();
        for (i, q) in QUESTIONS.iter().enumerate() {
            let option = &q.options[answers[i].get()];
            if i < QUESTION_COUNT / 2 {
                first.add_option(option);
            } else {
                second.add_option(option);
            }
        }
        second.merge(&first);
        assert_eq!(second, tally(&answers));
    }

    #[test]
    fn test_tie_resolves_to_canonical_first() {
        let mut scores = Scores::new();
        scores.0.insert(LiteraryType::Observer, 30);
        scores.0.insert(LiteraryType::Detective, 30);
        scores.0.insert(LiteraryType::Rebel, 12);
        assert_eq!(scores.resolve(), LiteraryType::Detective);
    }

    #[test]
    fn test_all_zero_resolves_to_first_type() {
        assert_eq!(Scores::new().resolve(), LiteraryType::Romantic);
    }

    #[test]
    fn test_real_ties_pick_earliest_type() {
        let mut rng = CodeRng::new(2024);
        let mut ties_seen = 0;
        for _ in 0..5000 {
            let answers = random_answers(&mut rng);
            let scores = tally(&answers);
            let max = scores.iter().map(|(_, s)| s).max().unwrap();
            let leaders: Vec<_> = LiteraryType::ALL
                .into_iter()
                .filter(|t| scores.get(*t) == max)
                .collect();
            if leaders.len() > 1 {
                ties_seen += 1;
                assert_eq!(score_answers(&answers), leaders[0]);
            }
        }
        assert!(ties_seen > 0, "sample produced no ties");
    }
}
