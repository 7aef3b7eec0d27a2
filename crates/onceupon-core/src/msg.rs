//! Messages accepted by the profile reducer

use crate::profile::{EventRegistration, ProfilePatch};
use crate::quiz::OptionIndex;
use crate::LiteraryType;
use serde::{Deserialize, Serialize};

/// A request to change the user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Merge a partial update
    Update(ProfilePatch),
    /// Record a registration unless one exists for the same event id
    AddUpcomingEvent(EventRegistration),
    /// Consume this month's free event
    MarkMonthlyFreeEventUsed,
    /// Make the free event available again for this month
    ResetMonthlyFreeEventStatus,
    /// Roll the free-event benefit into a new month if needed
    CheckAndResetMonthlyStatus,
    /// Entitlement provider reported a premium status
    SetPremium(bool),
    /// Begin the quiz, or resume if progress exists
    StartQuiz,
    /// Answer the question at `question` (zero-based)
    AnswerQuestion {
        question: usize,
        option: OptionIndex,
    },
    /// Go back one question
    PreviousQuestion,
    /// Reset everything to the empty record
    ClearAll,
}

impl Msg {
    /// Create an answer message
    pub fn answer(question: usize, option: OptionIndex) -> Self {
        Msg::AnswerQuestion { question, option }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Update(_) => "update",
            Msg::AddUpcomingEvent(_) => "add_upcoming_event",
            Msg::MarkMonthlyFreeEventUsed => "mark_monthly_free_event_used",
            Msg::ResetMonthlyFreeEventStatus => "reset_monthly_free_event_status",
            Msg::CheckAndResetMonthlyStatus => "check_and_reset_monthly_status",
            Msg::SetPremium(_) => "set_premium",
            Msg::StartQuiz => "start_quiz",
            Msg::AnswerQuestion { .. } => "answer_question",
            Msg::PreviousQuestion => "previous_question",
            Msg::ClearAll => "clear_all",
        }
    }
}

/// What a message did to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record changed
    Applied,
    /// The message was valid but changed nothing
    Unchanged,
    /// The final answer was recorded and a type assigned
    QuizCompleted(LiteraryType),
    /// The message was refused and the record left as it was
    Rejected(Rejection),
}

impl Outcome {
    /// False only when the message was refused
    pub fn accepted(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Why a message was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A registration with the same event id exists
    DuplicateRegistration,
    /// The answer is for a question the user has not reached
    QuestionOutOfOrder { current: usize, answered: usize },
}
