//! Pure reducers for the user record
//!
//! Every transition takes the current record and returns a new one along
//! with the commands the runtime should carry out. Nothing here touches
//! storage or the clock; the caller supplies the current month.

use crate::cmd::Cmd;
use crate::msg::{Msg, Outcome, Rejection};
use crate::profile::{EventRegistration, ProfilePatch, UserProfile};
use crate::quiz::{OptionIndex, QuizProgress, QUESTION_COUNT};
use crate::time::MonthToken;

/// Result of reducing one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The record after the message
    pub profile: UserProfile,
    /// Commands to execute
    pub cmd: Cmd,
    /// What happened
    pub outcome: Outcome,
}

impl Transition {
    /// Build a transition from `before` to `after`, persisting only real changes
    fn changed(before: &UserProfile, after: UserProfile, outcome: Outcome, note: Cmd) -> Self {
        if *before == after {
            return Self::unchanged(before, note);
        }
        let cmd = Cmd::batch(vec![note, persist_if_allowed(&after)]);
        Self {
            profile: after,
            cmd,
            outcome,
        }
    }

    fn unchanged(before: &UserProfile, note: Cmd) -> Self {
        Self {
            profile: before.clone(),
            cmd: note,
            outcome: Outcome::Unchanged,
        }
    }

    fn rejected(before: &UserProfile, rejection: Rejection, note: Cmd) -> Self {
        Self {
            profile: before.clone(),
            cmd: note,
            outcome: Outcome::Rejected(rejection),
        }
    }
}

/// Persist only once onboarding is complete; partial onboarding stays in memory
pub fn persist_if_allowed(profile: &UserProfile) -> Cmd {
    if profile.is_persistable() {
        Cmd::Persist
    } else {
        Cmd::debug("onboarding incomplete, keeping record in memory only")
    }
}

/// Reduce a single message
pub fn update(profile: &UserProfile, msg: Msg, month: MonthToken) -> Transition {
    match msg {
        Msg::Update(patch) => merge(profile, patch),
        Msg::AddUpcomingEvent(event) => add_upcoming_event(profile, event),
        Msg::MarkMonthlyFreeEventUsed => mark_monthly_free_event_used(profile, month),
        Msg::ResetMonthlyFreeEventStatus => reset_monthly_free_event_status(profile, month),
        Msg::CheckAndResetMonthlyStatus => check_and_reset_monthly_status(profile, month),
        Msg::SetPremium(premium) => set_premium(profile, premium),
        Msg::StartQuiz => start_quiz(profile),
        Msg::AnswerQuestion { question, option } => answer_question(profile, question, option),
        Msg::PreviousQuestion => previous_question(profile),
        Msg::ClearAll => clear_all(),
    }
}

/// Merge a partial update into the record
pub fn merge(profile: &UserProfile, patch: ProfilePatch) -> Transition {
    let mut next = profile.clone();
    patch.apply_to(&mut next);
    Transition::changed(profile, next, Outcome::Applied, Cmd::None)
}

/// Append a registration; refused if the event id is already registered
pub fn add_upcoming_event(profile: &UserProfile, event: EventRegistration) -> Transition {
    if profile.is_registered(&event.id) {
        return Transition::rejected(
            profile,
            Rejection::DuplicateRegistration,
            Cmd::debug(format!("already registered for event {}", event.id)),
        );
    }
    let note = Cmd::info(format!("registered for event {}", event.id));
    let mut next = profile.clone();
    next.upcoming_events.push(event);
    Transition::changed(profile, next, Outcome::Applied, note)
}

/// Consume the free event for `month`
pub fn mark_monthly_free_event_used(profile: &UserProfile, month: MonthToken) -> Transition {
    let mut next = profile.clone();
    next.monthly_free_event_used = true;
    next.last_monthly_free_event_reset_date = Some(month);
    let note = Cmd::info(format!("monthly free event used for {month}"));
    Transition::changed(profile, next, Outcome::Applied, note)
}

/// Make the free event available again, stamping `month`
pub fn reset_monthly_free_event_status(profile: &UserProfile, month: MonthToken) -> Transition {
    let mut next = profile.clone();
    next.monthly_free_event_used = false;
    next.last_monthly_free_event_reset_date = Some(month);
    let note = Cmd::debug(format!("monthly free event status reset for {month}"));
    Transition::changed(profile, next, Outcome::Applied, note)
}

/// Reconcile the monthly benefit with the current month
///
/// A used benefit from an earlier month is released. A record with no
/// token yet gets the current month without touching the used flag.
/// Calling this again within the same month is a no-op.
pub fn check_and_reset_monthly_status(profile: &UserProfile, month: MonthToken) -> Transition {
    match profile.last_monthly_free_event_reset_date {
        Some(last) if last != month && profile.monthly_free_event_used => {
            let mut t = reset_monthly_free_event_status(profile, month);
            t.cmd = Cmd::batch(vec![
                Cmd::info(format!("new month {month} (was {last}), free event available again")),
                t.cmd,
            ]);
            t
        }
        None => {
            let mut next = profile.clone();
            next.last_monthly_free_event_reset_date = Some(month);
            let note = Cmd::debug(format!("monthly tracking starts at {month}"));
            Transition::changed(profile, next, Outcome::Applied, note)
        }
        Some(_) => Transition::unchanged(profile, Cmd::None),
    }
}

/// Apply the premium status reported by the entitlement provider
pub fn set_premium(profile: &UserProfile, premium: bool) -> Transition {
    merge(profile, ProfilePatch::new().with_premium(premium))
}

/// Begin the quiz unless progress already exists
pub fn start_quiz(profile: &UserProfile) -> Transition {
    if let Some(progress) = &profile.quiz_progress {
        if progress.current_question < QUESTION_COUNT {
            return Transition::unchanged(profile, Cmd::debug("resuming quiz"));
        }
        // A stored cursor past the last question is pulled back to the first gap
        let mut next = profile.clone();
        let mut progress = progress.clone();
        progress.current_question = progress.first_unanswered().unwrap_or(QUESTION_COUNT - 1);
        next.quiz_progress = Some(progress);
        return Transition::changed(profile, next, Outcome::Applied, Cmd::debug("resuming quiz"));
    }
    let mut next = profile.clone();
    next.quiz_progress = Some(QuizProgress::new());
    Transition::changed(profile, next, Outcome::Applied, Cmd::debug("quiz started"))
}

/// Record an answer and advance; the final answer scores the quiz
///
/// `question` may be the current question or an earlier one (overwrite
/// after going back). Answers for questions not yet reached are refused.
pub fn answer_question(profile: &UserProfile, question: usize, option: OptionIndex) -> Transition {
    let mut progress = profile.quiz_progress.clone().unwrap_or_default();
    if question > progress.current_question || question >= QUESTION_COUNT {
        return Transition::rejected(
            profile,
            Rejection::QuestionOutOfOrder {
                current: progress.current_question,
                answered: question,
            },
            Cmd::debug(format!(
                "ignoring answer for question {question}, current is {}",
                progress.current_question
            )),
        );
    }

    progress.current_question = question;
    if let Err(e) = progress.record(option) {
        return Transition::rejected(
            profile,
            Rejection::QuestionOutOfOrder {
                current: progress.current_question,
                answered: question,
            },
            Cmd::debug(e.to_string()),
        );
    }

    let mut next = profile.clone();
    let mut note = Cmd::None;
    if question + 1 == QUESTION_COUNT {
        match progress.finish() {
            Ok(kind) => {
                next.literary_type = Some(kind);
                next.quiz_progress = None;
                let note = Cmd::batch(vec![
                    Cmd::info(format!("quiz completed: {kind}")),
                    Cmd::QuizCompleted(kind),
                ]);
                return Transition::changed(profile, next, Outcome::QuizCompleted(kind), note);
            }
            Err(e) => {
                // Gaps left by an older record: send the user back to the first one
                if let Some(gap) = progress.first_unanswered() {
                    progress.current_question = gap;
                    note = Cmd::debug(format!("{e}, returning to question {gap}"));
                }
            }
        }
    }

    next.quiz_progress = Some(progress);
    Transition::changed(profile, next, Outcome::Applied, note)
}

/// Step back one question, keeping the stored answers
pub fn previous_question(profile: &UserProfile) -> Transition {
    let mut next = profile.clone();
    let moved = next.quiz_progress.as_mut().is_some_and(QuizProgress::back);
    if moved {
        Transition::changed(profile, next, Outcome::Applied, Cmd::None)
    } else {
        Transition::unchanged(profile, Cmd::None)
    }
}

/// Reset to the empty record and forget cached entitlements
pub fn clear_all() -> Transition {
    Transition {
        profile: UserProfile::new(),
        cmd: Cmd::batch(vec![
            Cmd::info("clearing user data"),
            Cmd::ClearStorage,
            Cmd::ResetEntitlements,
        ]),
        outcome: Outcome::Applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CheckInCode, ClubEvent, Price};
    use crate::quiz::QuizState;
    use crate::LiteraryType;
    use assert_matches::assert_matches;

    fn month(s: &str) -> MonthToken {
        s.parse().unwrap()
    }

    fn opt(i: u8) -> OptionIndex {
        OptionIndex::new(i).unwrap()
    }

    fn onboarded() -> UserProfile {
        UserProfile {
            name: "Ada".into(),
            onboarding_complete: true,
            ..UserProfile::new()
        }
    }

    fn registration(id: &str) -> EventRegistration {
        let event = ClubEvent::new(id, "Poetry & Wine", "2025-07-19", Price::dollars(25));
        EventRegistration::confirmed(&event, CheckInCode::Verse)
    }

    fn persisted(t: &Transition) -> bool {
        t.cmd.contains(|c| matches!(c, Cmd::Persist))
    }

    #[test]
    fn test_merge_persists_only_after_onboarding() {
        let t = merge(&UserProfile::new(), ProfilePatch::new().with_name("Ada"));
        assert_eq!(t.outcome, Outcome::Applied);
        assert!(!persisted(&t));

        let t = merge(&t.profile, ProfilePatch::new().with_onboarding_complete(true));
        assert!(persisted(&t));
    }

    #[test]
    fn test_empty_merge_is_unchanged() {
        let t = merge(&onboarded(), ProfilePatch::new());
        assert_eq!(t.outcome, Outcome::Unchanged);
        assert!(!persisted(&t));
    }

    #[test]
    fn test_duplicate_registration_is_refused() {
        let first = add_upcoming_event(&onboarded(), registration("evt-1"));
        assert!(first.outcome.accepted());
        assert_eq!(first.profile.upcoming_events.len(), 1);

        let mut again = registration("evt-1");
        again.check_in_code = CheckInCode::Novel;
        let second = add_upcoming_event(&first.profile, again);
        assert_eq!(second.outcome, Outcome::Rejected(Rejection::DuplicateRegistration));
        assert_eq!(second.profile, first.profile);
        assert_eq!(
            second.profile.upcoming_events[0].check_in_code,
            CheckInCode::Verse
        );
        assert!(!persisted(&second));
    }

    #[test]
    fn test_monthly_reset_on_new_month() {
        let profile = UserProfile {
            is_premium_subscriber: true,
            monthly_free_event_used: true,
            last_monthly_free_event_reset_date: Some(month("2025-06")),
            ..onboarded()
        };
        let t = check_and_reset_monthly_status(&profile, month("2025-07"));
        assert!(!t.profile.monthly_free_event_used);
        assert_eq!(t.profile.last_monthly_free_event_reset_date, Some(month("2025-07")));
        assert!(persisted(&t));
    }

    #[test]
    fn test_monthly_check_is_idempotent_within_month() {
        let profile = UserProfile {
            monthly_free_event_used: true,
            last_monthly_free_event_reset_date: Some(month("2025-07")),
            ..onboarded()
        };
        let mut current = profile.clone();
        for _ in 0..5 {
            let t = check_and_reset_monthly_status(&current, month("2025-07"));
            assert_eq!(t.outcome, Outcome::Unchanged);
            assert!(!persisted(&t));
            current = t.profile;
        }
        assert_eq!(current, profile);
    }

    #[test]
    fn test_monthly_check_initializes_token_without_touching_flag() {
        let profile = UserProfile {
            monthly_free_event_used: true,
            ..onboarded()
        };
        let t = check_and_reset_monthly_status(&profile, month("2025-07"));
        assert!(t.profile.monthly_free_event_used);
        assert_eq!(t.profile.last_monthly_free_event_reset_date, Some(month("2025-07")));

        let again = check_and_reset_monthly_status(&t.profile, month("2025-07"));
        assert_eq!(again.outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_stale_unused_token_is_left_alone() {
        let profile = UserProfile {
            monthly_free_event_used: false,
            last_monthly_free_event_reset_date: Some(month("2025-05")),
            ..onboarded()
        };
        let t = check_and_reset_monthly_status(&profile, month("2025-07"));
        assert_eq!(t.outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_mark_used_stamps_month() {
        let t = mark_monthly_free_event_used(&onboarded(), month("2025-07"));
        assert!(t.profile.monthly_free_event_used);
        assert_eq!(t.profile.last_monthly_free_event_reset_date, Some(month("2025-07")));
    }

    #[test]
    fn test_full_quiz_completes_and_clears_progress() {
        let mut profile = start_quiz(&onboarded()).profile;
        for q in 0..QUESTION_COUNT {
            let t = answer_question(&profile, q, opt(1));
            if q + 1 < QUESTION_COUNT {
                assert_eq!(t.outcome, Outcome::Applied);
                assert_eq!(t.profile.quiz_progress.as_ref().unwrap().current_question, q + 1);
                assert!(persisted(&t));
            } else {
                assert_eq!(t.outcome, Outcome::QuizCompleted(LiteraryType::Detective));
                assert!(t.cmd.contains(|c| matches!(c, Cmd::QuizCompleted(LiteraryType::Detective))));
            }
            profile = t.profile;
        }
        assert_eq!(profile.literary_type, Some(LiteraryType::Detective));
        assert!(profile.quiz_progress.is_none());
        assert_eq!(profile.quiz_state(), QuizState::Completed(LiteraryType::Detective));
    }

    #[test]
    fn test_answer_ahead_is_refused() {
        let profile = start_quiz(&onboarded()).profile;
        let t = answer_question(&profile, 2, opt(0));
        assert_matches!(
            t.outcome,
            Outcome::Rejected(Rejection::QuestionOutOfOrder { current: 0, answered: 2 })
        );
        assert_eq!(t.profile, profile);
    }

    #[test]
    fn test_back_navigation_then_overwrite() {
        let mut profile = start_quiz(&onboarded()).profile;
        profile = answer_question(&profile, 0, opt(0)).profile;
        profile = answer_question(&profile, 1, opt(3)).profile;

        let back = previous_question(&profile);
        assert_eq!(back.outcome, Outcome::Applied);
        assert_matches!(
            back.profile.quiz_state(),
            QuizState::InProgress { question: 1, selected: Some(s) } if s == opt(3)
        );

        let t = answer_question(&back.profile, 1, opt(2));
        let progress = t.profile.quiz_progress.unwrap();
        assert_eq!(progress.current_question, 2);
        assert_eq!(progress.answers, vec![Some(opt(0)), Some(opt(2))]);
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let profile = start_quiz(&onboarded()).profile;
        assert_eq!(previous_question(&profile).outcome, Outcome::Unchanged);
        assert_eq!(previous_question(&onboarded()).outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_start_quiz_resumes_existing_progress() {
        let mut profile = start_quiz(&onboarded()).profile;
        profile = answer_question(&profile, 0, opt(2)).profile;
        let t = start_quiz(&profile);
        assert_eq!(t.outcome, Outcome::Unchanged);
        assert_eq!(t.profile.quiz_progress.unwrap().current_question, 1);
    }

    fn sparse_progress_at_last_question() -> UserProfile {
        let mut answers = vec![None; QUESTION_COUNT - 1];
        answers[0] = Some(opt(0));
        UserProfile {
            quiz_progress: Some(QuizProgress {
                current_question: QUESTION_COUNT - 1,
                answers,
            }),
            ..onboarded()
        }
    }

    #[test]
    fn test_last_answer_with_gaps_returns_to_first_gap() {
        let profile = sparse_progress_at_last_question();
        let t = answer_question(&profile, QUESTION_COUNT - 1, opt(2));
        assert_eq!(t.outcome, Outcome::Applied);
        assert!(t.profile.literary_type.is_none());
        assert_matches!(
            t.profile.quiz_state(),
            QuizState::InProgress { question: 1, selected: None }
        );

        // the quiz can still be finished from there
        let mut profile = t.profile;
        for q in 1..QUESTION_COUNT - 1 {
            let t = answer_question(&profile, q, opt(1));
            assert!(t.outcome.accepted());
            profile = t.profile;
        }
        let progress = profile.quiz_progress.clone().unwrap();
        assert_eq!(progress.current_question, QUESTION_COUNT - 1);
        assert_eq!(progress.answers[QUESTION_COUNT - 1], Some(opt(2)));

        let t = answer_question(&profile, QUESTION_COUNT - 1, opt(2));
        assert_matches!(t.outcome, Outcome::QuizCompleted(_));
        assert!(t.profile.quiz_progress.is_none());
    }

    #[test]
    fn test_start_quiz_pulls_back_cursor_past_the_end() {
        let mut profile = sparse_progress_at_last_question();
        if let Some(progress) = profile.quiz_progress.as_mut() {
            progress.current_question = QUESTION_COUNT;
        }
        let t = start_quiz(&profile);
        assert_eq!(t.outcome, Outcome::Applied);
        assert_eq!(t.profile.quiz_progress.unwrap().current_question, 1);
    }

    #[test]
    fn test_clear_all_resets_and_forgets_entitlements() {
        let profile = UserProfile {
            is_premium_subscriber: true,
            literary_type: Some(LiteraryType::Rebel),
            ..onboarded()
        };
        let t = update(&profile, Msg::ClearAll, month("2025-07"));
        assert_eq!(t.profile, UserProfile::new());
        assert!(t.cmd.contains(|c| matches!(c, Cmd::ClearStorage)));
        assert!(t.cmd.contains(|c| matches!(c, Cmd::ResetEntitlements)));
    }

    #[test]
    fn test_set_premium_via_update() {
        let t = update(&onboarded(), Msg::SetPremium(true), month("2025-07"));
        assert!(t.profile.is_premium_subscriber);
        let again = update(&t.profile, Msg::SetPremium(true), month("2025-07"));
        assert_eq!(again.outcome, Outcome::Unchanged);
    }
}
