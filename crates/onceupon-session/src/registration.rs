//! Event registration with premium pricing.

use crate::store::ProfileStore;
use onceupon_core::{CheckInCode, ClubEvent, EventRegistration, Msg, Price};

/// Result of asking to attend an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new seat was recorded
    Confirmed {
        registration: EventRegistration,
        /// What the user pays; zero when the monthly benefit covered it
        charged: Price,
    },
    /// The user already holds a seat for this event
    AlreadyRegistered,
}

impl Registration {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Registration::Confirmed { .. })
    }
}

impl ProfileStore {
    /// Register for `event`.
    ///
    /// Rolls the monthly benefit over first, so a premium member's first
    /// registration in a new month is free. A free registration consumes the
    /// benefit for the month.
    pub async fn register_for_event(&mut self, event: &ClubEvent) -> Registration {
        self.dispatch(Msg::CheckAndResetMonthlyStatus).await;

        if self.profile.is_registered(&event.id) {
            tracing::debug!(event = %event.id, "already registered");
            return Registration::AlreadyRegistered;
        }

        let month = self.current_month();
        let uses_benefit = self.profile.can_use_free_event(month);
        let charged = self.profile.effective_price(event.list_price, month);
        let registration = EventRegistration::confirmed(event, self.next_check_in_code());

        if !self
            .dispatch(Msg::AddUpcomingEvent(registration.clone()))
            .await
            .accepted()
        {
            return Registration::AlreadyRegistered;
        }
        if uses_benefit {
            self.dispatch(Msg::MarkMonthlyFreeEventUsed).await;
        }

        tracing::info!(
            event = %event.id,
            %charged,
            free_benefit = uses_benefit,
            check_in_code = %registration.check_in_code,
            "registered for event"
        );
        Registration::Confirmed {
            registration,
            charged,
        }
    }

    fn next_check_in_code(&mut self) -> CheckInCode {
        self.rng
            .pick(&self.check_in_codes)
            .copied()
            .unwrap_or(CheckInCode::Gothic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use assert_matches::assert_matches;
    use onceupon_core::FixedClock;
    use onceupon_db::{NativeStore, ProfileRepository};
    use onceupon_payments::SimulatedProvider;
    use std::sync::Arc;

    async fn store_with(config: SessionConfig) -> ProfileStore {
        ProfileStore::load(
            ProfileRepository::new(Arc::new(NativeStore::in_memory().unwrap())),
            Arc::new(SimulatedProvider::new()),
            Arc::new(FixedClock::at_month("2025-07".parse().unwrap())),
            &config,
        )
        .await
    }

    fn gothic_night() -> ClubEvent {
        ClubEvent::new("evt-1", "Gothic Night", "2025-07-12", Price::dollars(25))
    }

    #[tokio::test]
    async fn test_non_premium_pays_list_price() {
        let mut store = store_with(SessionConfig::in_memory()).await;
        assert_matches!(
            store.register_for_event(&gothic_night()).await,
            Registration::Confirmed { charged, .. } if charged == Price::dollars(25)
        );
        assert!(!store.profile().monthly_free_event_used);
    }

    #[tokio::test]
    async fn test_second_registration_is_refused() {
        let mut store = store_with(SessionConfig::in_memory()).await;
        assert!(store.register_for_event(&gothic_night()).await.is_confirmed());
        assert_eq!(
            store.register_for_event(&gothic_night()).await,
            Registration::AlreadyRegistered
        );
        assert_eq!(store.profile().upcoming_events.len(), 1);
    }

    #[tokio::test]
    async fn test_codes_come_from_config() {
        let config = SessionConfig {
            check_in_codes: vec![CheckInCode::Verse],
            check_in_seed: Some(9),
            ..SessionConfig::in_memory()
        };
        let mut store = store_with(config).await;
        assert_matches!(
            store.register_for_event(&gothic_night()).await,
            Registration::Confirmed { registration, .. }
                if registration.check_in_code == CheckInCode::Verse
        );
    }
}
