//! The profile store: owns the record, reduces messages and runs commands.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::writer::ProfileWriter;
use onceupon_core::{
    reducer, CheckInCode, Clock, Cmd, CodeRng, EventRegistration, LogLevel, MonthToken, Msg,
    OptionIndex, Outcome, Price, ProfilePatch, QuizState, Transition, UserProfile,
};
use onceupon_db::ProfileRepository;
use onceupon_payments::{CustomerInfo, PaymentProvider};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Owner of the user record for one app session.
///
/// Every change goes through [`dispatch`](Self::dispatch): the pure reducer
/// produces the next record and a [`Cmd`], and the store carries the command
/// out. Writes are queued to a single background writer and are not awaited.
pub struct ProfileStore {
    pub(crate) profile: UserProfile,
    writer: ProfileWriter,
    pub(crate) provider: Arc<dyn PaymentProvider>,
    pub(crate) clock: Arc<dyn Clock>,
    entitlement: String,
    pub(crate) check_in_codes: Vec<CheckInCode>,
    pub(crate) rng: CodeRng,
    updates: broadcast::Receiver<CustomerInfo>,
}

impl ProfileStore {
    /// Read the stored record and start the writer.
    ///
    /// A missing or unreadable record starts the session empty.
    pub async fn load(
        repository: ProfileRepository,
        provider: Arc<dyn PaymentProvider>,
        clock: Arc<dyn Clock>,
        config: &SessionConfig,
    ) -> Self {
        let profile = repository.load_or_default().await;
        let seed = config
            .check_in_seed
            .unwrap_or_else(|| clock.now().timestamp_millis().unsigned_abs());
        let updates = provider.subscribe();

        tracing::info!(
            provider = provider.name(),
            onboarding_complete = profile.onboarding_complete,
            "profile store ready"
        );

        Self {
            profile,
            writer: ProfileWriter::spawn(repository),
            provider,
            clock,
            entitlement: config.payments.entitlement.clone(),
            check_in_codes: config.check_in_codes.clone(),
            rng: CodeRng::new(seed),
            updates,
        }
    }

    /// Open the configured storage and load from it.
    pub async fn open(
        config: &SessionConfig,
        provider: Arc<dyn PaymentProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let repository = ProfileRepository::new(config.storage.open()?);
        Ok(Self::load(repository, provider, clock, config).await)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn provider(&self) -> &Arc<dyn PaymentProvider> {
        &self.provider
    }

    /// The calendar month in force right now.
    pub fn current_month(&self) -> MonthToken {
        self.clock.current_month()
    }

    /// Reduce `msg` and run the resulting commands.
    pub async fn dispatch(&mut self, msg: Msg) -> Outcome {
        let name = msg.name();
        let month = self.current_month();
        let Transition {
            profile,
            cmd,
            outcome,
        } = reducer::update(&self.profile, msg, month);
        self.profile = profile;

        tracing::debug!(msg = name, ?outcome, "message reduced");
        self.execute(cmd).await;
        outcome
    }

    async fn execute(&mut self, cmd: Cmd) {
        for cmd in cmd.into_vec() {
            match cmd {
                Cmd::None | Cmd::Batch(_) => {}
                Cmd::Persist => self.writer.save(self.profile.clone()),
                Cmd::ClearStorage => self.writer.clear(),
                Cmd::ResetEntitlements => {
                    if let Err(e) = self.provider.reset().await {
                        tracing::warn!(error = %e, "failed to reset entitlements");
                    }
                }
                Cmd::QuizCompleted(kind) => {
                    tracing::info!(literary_type = %kind, "quiz completed");
                }
                Cmd::Log { level, message } => match level {
                    LogLevel::Debug => tracing::debug!("{}", message),
                    LogLevel::Info => tracing::info!("{}", message),
                    LogLevel::Warn => tracing::warn!("{}", message),
                },
            }
        }
    }

    /// Wait until every queued write has been applied.
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    /// Apply queued writes and stop the writer.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
        tracing::info!("profile store closed");
    }

    pub async fn update(&mut self, patch: ProfilePatch) -> Outcome {
        self.dispatch(Msg::Update(patch)).await
    }

    /// Returns false when a registration for the same event exists.
    pub async fn add_upcoming_event(&mut self, registration: EventRegistration) -> bool {
        self.dispatch(Msg::AddUpcomingEvent(registration))
            .await
            .accepted()
    }

    pub async fn mark_monthly_free_event_used(&mut self) -> Outcome {
        self.dispatch(Msg::MarkMonthlyFreeEventUsed).await
    }

    pub async fn reset_monthly_free_event_status(&mut self) -> Outcome {
        self.dispatch(Msg::ResetMonthlyFreeEventStatus).await
    }

    pub async fn check_and_reset_monthly_status(&mut self) -> Outcome {
        self.dispatch(Msg::CheckAndResetMonthlyStatus).await
    }

    pub async fn set_premium(&mut self, premium: bool) -> Outcome {
        self.dispatch(Msg::SetPremium(premium)).await
    }

    pub async fn clear_all(&mut self) -> Outcome {
        self.dispatch(Msg::ClearAll).await
    }

    pub fn can_use_free_event_this_month(&self) -> bool {
        self.profile.can_use_free_event(self.current_month())
    }

    pub fn effective_price(&self, list_price: Price) -> Price {
        self.profile.effective_price(list_price, self.current_month())
    }

    pub async fn start_quiz(&mut self) -> Outcome {
        self.dispatch(Msg::StartQuiz).await
    }

    /// Answer the question the user is looking at.
    pub async fn answer(&mut self, option: OptionIndex) -> Outcome {
        let question = self
            .profile
            .quiz_progress
            .as_ref()
            .map_or(0, |p| p.current_question);
        self.dispatch(Msg::answer(question, option)).await
    }

    pub async fn answer_question(&mut self, question: usize, option: OptionIndex) -> Outcome {
        self.dispatch(Msg::answer(question, option)).await
    }

    pub async fn previous_question(&mut self) -> Outcome {
        self.dispatch(Msg::PreviousQuestion).await
    }

    pub fn quiz_state(&self) -> QuizState {
        self.profile.quiz_state()
    }

    /// Set premium status from what the provider reported.
    pub async fn apply_customer_info(&mut self, info: &CustomerInfo) -> Outcome {
        let premium = info.has_entitlement(&self.entitlement);
        tracing::debug!(
            user = %info.original_app_user_id,
            entitlements = ?info.entitlement_ids(),
            premium,
            "syncing subscription status"
        );
        self.dispatch(Msg::SetPremium(premium)).await
    }

    /// Wait for the provider to push new customer info and apply it.
    ///
    /// Meant to sit in a `tokio::select!` next to the UI's own events.
    /// Returns `None` once the provider stops publishing.
    pub async fn watch_entitlements(&mut self) -> Option<Outcome> {
        loop {
            match self.updates.recv().await {
                Ok(info) => return Some(self.apply_customer_info(&info).await),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "missed customer info updates");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Apply the newest pushed customer info, if any arrived.
    pub async fn sync_entitlements(&mut self) -> Option<Outcome> {
        let mut latest = None;
        loop {
            match self.updates.try_recv() {
                Ok(info) => latest = Some(info),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        match latest {
            Some(info) => Some(self.apply_customer_info(&info).await),
            None => None,
        }
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("profile", &self.profile)
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use onceupon_core::{FixedClock, LiteraryType, Rejection, QUESTION_COUNT};
    use onceupon_db::{MemoryStore, PROFILE_KEY};
    use onceupon_payments::SimulatedProvider;

    struct Harness {
        store: ProfileStore,
        kv: Arc<MemoryStore>,
        provider: Arc<SimulatedProvider>,
    }

    async fn harness() -> Harness {
        let kv = Arc::new(MemoryStore::new());
        let provider = Arc::new(SimulatedProvider::new());
        let clock = Arc::new(FixedClock::at_month("2025-07".parse().unwrap()));
        let store = ProfileStore::load(
            ProfileRepository::new(kv.clone()),
            provider.clone(),
            clock,
            &SessionConfig::in_memory(),
        )
        .await;
        Harness { store, kv, provider }
    }

    fn option(i: u8) -> OptionIndex {
        OptionIndex::new(i).unwrap()
    }

    #[tokio::test]
    async fn test_nothing_written_before_onboarding() {
        let mut h = harness().await;
        h.store.update(ProfilePatch::new().with_name("Ada")).await;
        h.store.flush().await.unwrap();
        assert!(h.kv.peek(PROFILE_KEY).is_none());

        h.store
            .update(ProfilePatch::new().with_onboarding_complete(true))
            .await;
        h.store.flush().await.unwrap();
        assert!(h.kv.peek(PROFILE_KEY).unwrap().contains("Ada"));
    }

    #[tokio::test]
    async fn test_answer_follows_current_question() {
        let mut h = harness().await;
        h.store.start_quiz().await;
        h.store.answer(option(1)).await;
        h.store.answer(option(2)).await;
        h.store.previous_question().await;

        assert_matches!(
            h.store.quiz_state(),
            QuizState::InProgress { question: 1, selected: Some(o) } if o == option(2)
        );
    }

    #[tokio::test]
    async fn test_full_quiz_sets_type() {
        let mut h = harness().await;
        let mut last = Outcome::Unchanged;
        for _ in 0..QUESTION_COUNT {
            last = h.store.answer(option(3)).await;
        }
        assert_eq!(last, Outcome::QuizCompleted(LiteraryType::Rebel));
        assert_eq!(h.store.profile().literary_type, Some(LiteraryType::Rebel));
        assert!(h.store.profile().quiz_progress.is_none());
    }

    #[tokio::test]
    async fn test_answer_ahead_is_rejected() {
        let mut h = harness().await;
        assert_matches!(
            h.store.answer_question(4, option(0)).await,
            Outcome::Rejected(Rejection::QuestionOutOfOrder { current: 0, answered: 4 })
        );
    }

    #[tokio::test]
    async fn test_clear_all_resets_provider_and_storage() {
        let mut h = harness().await;
        h.store
            .update(ProfilePatch::new().with_onboarding_complete(true))
            .await;
        h.provider.purchase("premium_monthly").await.unwrap();

        h.store.clear_all().await;
        h.store.flush().await.unwrap();

        assert_eq!(h.store.profile(), &UserProfile::default());
        assert!(h.kv.peek(PROFILE_KEY).is_none());
        assert!(!h.provider.customer_info().await.unwrap().is_premium());
    }

    #[tokio::test]
    async fn test_pushed_updates_sync_premium() {
        let mut h = harness().await;
        h.provider.purchase("premium_monthly").await.unwrap();

        assert_eq!(h.store.watch_entitlements().await, Some(Outcome::Applied));
        assert!(h.store.profile().is_premium_subscriber);

        h.provider.reset().await.unwrap();
        assert_eq!(h.store.sync_entitlements().await, Some(Outcome::Applied));
        assert!(!h.store.profile().is_premium_subscriber);
        assert_eq!(h.store.sync_entitlements().await, None);
    }

    #[tokio::test]
    async fn test_free_event_predicate_uses_clock() {
        let mut h = harness().await;
        h.store.set_premium(true).await;
        assert!(h.store.can_use_free_event_this_month());
        assert_eq!(h.store.effective_price(Price::dollars(25)), Price::FREE);

        h.store.mark_monthly_free_event_used().await;
        assert!(!h.store.can_use_free_event_this_month());
        assert_eq!(h.store.effective_price(Price::dollars(25)), Price::dollars(25));

        h.store.reset_monthly_free_event_status().await;
        assert!(h.store.can_use_free_event_this_month());
    }
}
