//! The local user record and its value types

use crate::error::{Error, Result};
use crate::quiz::{QuizProgress, QuizState};
use crate::time::MonthToken;
use crate::LiteraryType;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The single durable record per installation
///
/// Every field falls back to its default when missing so that records
/// written by older builds keep loading after new fields are added.
/// Values this build does not recognize are dropped field by field rather
/// than failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub birthday: String,
    pub referral_source: String,
    pub city: Option<String>,
    /// Gates persistence: nothing is written until this is set
    pub onboarding_complete: bool,
    #[serde(deserialize_with = "lenient")]
    pub literary_type: Option<LiteraryType>,
    /// Registrations in the order they were made, unique by event id
    pub upcoming_events: Vec<EventRegistration>,
    #[serde(flatten)]
    pub quiz_progress: Option<QuizProgress>,
    pub is_premium_subscriber: bool,
    pub monthly_free_event_used: bool,
    #[serde(deserialize_with = "lenient")]
    pub last_monthly_free_event_reset_date: Option<MonthToken>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl UserProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the record may be written to durable storage
    pub fn is_persistable(&self) -> bool {
        self.onboarding_complete
    }

    /// Whether a registration for `event_id` already exists
    pub fn is_registered(&self, event_id: &str) -> bool {
        self.upcoming_events.iter().any(|e| e.id == event_id)
    }

    /// Get the registration for an event
    pub fn registration(&self, event_id: &str) -> Option<&EventRegistration> {
        self.upcoming_events.iter().find(|e| e.id == event_id)
    }

    /// Premium members get one free registration per calendar month
    pub fn can_use_free_event(&self, month: MonthToken) -> bool {
        self.is_premium_subscriber
            && (!self.monthly_free_event_used
                || self.last_monthly_free_event_reset_date != Some(month))
    }

    /// What this user pays for an event listed at `list_price`
    pub fn effective_price(&self, list_price: Price, month: MonthToken) -> Price {
        if self.can_use_free_event(month) {
            Price::FREE
        } else {
            list_price
        }
    }

    /// Current position in the quiz lifecycle
    pub fn quiz_state(&self) -> QuizState {
        QuizState::of(self.quiz_progress.as_ref(), self.literary_type)
    }
}

/// Partial update merged into a profile; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilePatch {
    pub id: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub birthday: Option<String>,
    pub referral_source: Option<String>,
    pub city: Option<String>,
    pub onboarding_complete: Option<bool>,
    pub literary_type: Option<LiteraryType>,
    pub is_premium_subscriber: Option<bool>,
}

impl ProfilePatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_birthday(mut self, birthday: impl Into<String>) -> Self {
        self.birthday = Some(birthday.into());
        self
    }

    pub fn with_referral_source(mut self, source: impl Into<String>) -> Self {
        self.referral_source = Some(source.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_onboarding_complete(mut self, complete: bool) -> Self {
        self.onboarding_complete = Some(complete);
        self
    }

    pub fn with_literary_type(mut self, kind: LiteraryType) -> Self {
        self.literary_type = Some(kind);
        self
    }

    pub fn with_premium(mut self, premium: bool) -> Self {
        self.is_premium_subscriber = Some(premium);
        self
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy every set field onto `profile`
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(v) = self.id {
            profile.id = v;
        }
        if let Some(v) = self.phone {
            profile.phone = v;
        }
        if let Some(v) = self.name {
            profile.name = v;
        }
        if let Some(v) = self.birthday {
            profile.birthday = v;
        }
        if let Some(v) = self.referral_source {
            profile.referral_source = v;
        }
        if let Some(v) = self.city {
            profile.city = Some(v);
        }
        if let Some(v) = self.onboarding_complete {
            profile.onboarding_complete = v;
        }
        if let Some(v) = self.literary_type {
            profile.literary_type = Some(v);
        }
        if let Some(v) = self.is_premium_subscriber {
            profile.is_premium_subscriber = v;
        }
    }
}

/// A confirmed seat at a club event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    /// Matches the id of the listed event
    pub id: String,
    pub title: String,
    pub date: String,
    pub status: RegistrationStatus,
    pub check_in_code: CheckInCode,
}

impl EventRegistration {
    /// A confirmed registration for `event`
    pub fn confirmed(event: &ClubEvent, check_in_code: CheckInCode) -> Self {
        Self {
            id: event.id.clone(),
            title: event.theme.clone(),
            date: event.date.clone(),
            status: RegistrationStatus::Confirmed,
            check_in_code,
        }
    }
}

/// Registration status; only confirmed registrations are produced today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Confirmed,
    /// Any other status, kept verbatim
    #[serde(untagged)]
    Other(String),
}

/// Word shown at the door to check in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckInCode {
    Gothic,
    Verse,
    Story,
    Mystic,
    Prose,
    Novel,
    /// A code this build does not know; never handed out
    #[serde(other)]
    Unknown,
}

impl CheckInCode {
    pub const ALL: [CheckInCode; 6] = [
        CheckInCode::Gothic,
        CheckInCode::Verse,
        CheckInCode::Story,
        CheckInCode::Mystic,
        CheckInCode::Prose,
        CheckInCode::Novel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckInCode::Gothic => "GOTHIC",
            CheckInCode::Verse => "VERSE",
            CheckInCode::Story => "STORY",
            CheckInCode::Mystic => "MYSTIC",
            CheckInCode::Prose => "PROSE",
            CheckInCode::Novel => "NOVEL",
            CheckInCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CheckInCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckInCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CheckInCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCheckInCode(s.to_string()))
    }
}

/// An amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(u64);

impl Price {
    pub const FREE: Price = Price(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn dollars(dollars: u64) -> Self {
        Self(dollars * 100)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn is_free(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A club event as listed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubEvent {
    pub id: String,
    pub theme: String,
    pub date: String,
    pub list_price: Price,
}

impl ClubEvent {
    pub fn new(id: impl Into<String>, theme: impl Into<String>, date: impl Into<String>, list_price: Price) -> Self {
        Self {
            id: id.into(),
            theme: theme.into(),
            date: date.into(),
            list_price,
        }
    }
}
