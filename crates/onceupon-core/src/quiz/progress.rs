//! Resumable quiz progress

use super::{score_answers, OptionIndex, QUESTION_COUNT};
use crate::error::{Error, Result};
use crate::LiteraryType;
use serde::{Deserialize, Serialize};

/// Where a user is in the quiz, persisted after every step
///
/// Stored as two top-level fields of the user record. A record without
/// `quizProgressCurrentQuestion` has no quiz in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    /// Zero-based index of the question being shown
    #[serde(rename = "quizProgressCurrentQuestion")]
    pub current_question: usize,
    /// Answer per question position; `None` for positions not answered yet
    #[serde(rename = "quizProgressAnswers", default)]
    pub answers: Vec<Option<OptionIndex>>,
}

impl QuizProgress {
    /// Fresh progress at the first question
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `option` for the current question and move to the next one
    pub fn record(&mut self, option: OptionIndex) -> Result<()> {
        let index = self.current_question;
        if index >= QUESTION_COUNT {
            return Err(Error::InvalidQuestion(index));
        }
        if self.answers.len() <= index {
            self.answers.resize(index + 1, None);
        }
        self.answers[index] = Some(option);
        self.current_question = index + 1;
        Ok(())
    }

    /// Step back one question. Returns false when already at the start.
    pub fn back(&mut self) -> bool {
        if self.current_question == 0 {
            return false;
        }
        self.current_question -= 1;
        true
    }

    /// The option previously chosen for the current question, if any
    pub fn selected(&self) -> Option<OptionIndex> {
        self.answers.get(self.current_question).copied().flatten()
    }

    /// Index of the first question without an answer
    pub fn first_unanswered(&self) -> Option<usize> {
        (0..QUESTION_COUNT).find(|&i| self.answers.get(i).copied().flatten().is_none())
    }

    /// Number of questions with a stored answer
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// True once every question has an answer
    pub fn is_complete(&self) -> bool {
        self.completed_answers().is_some()
    }

    /// All answers in question order, if the quiz is fully answered
    pub fn completed_answers(&self) -> Option<[OptionIndex; QUESTION_COUNT]> {
        if self.answers.len() < QUESTION_COUNT {
            return None;
        }
        let mut out = [OptionIndex::FIRST; QUESTION_COUNT];
        for (slot, answer) in out.iter_mut().zip(&self.answers) {
            *slot = (*answer)?;
        }
        Some(out)
    }

    /// Score the completed quiz
    pub fn finish(&self) -> Result<LiteraryType> {
        self.completed_answers()
            .map(|answers| score_answers(&answers))
            .ok_or(Error::IncompleteQuiz {
                answered: self.answered_count(),
                total: QUESTION_COUNT,
            })
    }
}

/// Derived view of a user's quiz lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress {
        question: usize,
        selected: Option<OptionIndex>,
    },
    Completed(LiteraryType),
}

impl QuizState {
    /// Progress takes precedence so a retake shows as in progress
    pub fn of(progress: Option<&QuizProgress>, literary_type: Option<LiteraryType>) -> Self {
        match (progress, literary_type) {
            (Some(p), _) => QuizState::InProgress {
                question: p.current_question,
                selected: p.selected(),
            },
            (None, Some(kind)) => QuizState::Completed(kind),
            (None, None) => QuizState::NotStarted,
        }
    }
}
