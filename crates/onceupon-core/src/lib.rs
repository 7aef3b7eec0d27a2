//! Once Upon Us Core - literary quiz engine and membership state machine
//!
//! This crate provides the pure domain of the club app:
//! - Literary types and their display metadata (`LiteraryType`, `TypeProfile`)
//! - The fixed 14-question quiz and its scoring (`score_answers`, `Scores`)
//! - The user record and registration types (`UserProfile`, `EventRegistration`)
//! - Calendar months and clocks for the monthly free-event benefit
//! - Elm-style reducers: `Msg` in, new `UserProfile` plus `Cmd` out
//!
//! Nothing in this crate performs I/O. Storage and entitlement providers are
//! driven by the session runtime from the commands reducers emit.
//!
//! ## Example
//!
//! ```rust
//! use onceupon_core::{reducer, Msg, OptionIndex, UserProfile, MonthToken, QUESTION_COUNT};
//!
//! let month: MonthToken = "2025-07".parse().unwrap();
//! let mut profile = UserProfile::new();
//! for q in 0..QUESTION_COUNT {
//!     let msg = Msg::answer(q, OptionIndex::new(2).unwrap());
//!     profile = reducer::update(&profile, msg, month).profile;
//! }
//! assert_eq!(profile.literary_type.map(|t| t.key()), Some("dreamer"));
//! ```

mod cmd;
mod error;
mod literary_type;
mod msg;
mod profile;
pub mod quiz;
pub mod reducer;
mod rng;
pub mod time;

pub use cmd::{Cmd, LogLevel};
pub use error::{Error, Result};
pub use literary_type::{LiteraryType, TypeProfile};
pub use msg::{Msg, Outcome, Rejection};
pub use profile::{CheckInCode, ClubEvent, EventRegistration, Price, ProfilePatch, RegistrationStatus, UserProfile};
pub use quiz::{score_answers, tally, OptionIndex, QuizProgress, QuizState, Scores, QUESTION_COUNT};
pub use reducer::Transition;
pub use rng::CodeRng;
pub use time::{Clock, FixedClock, MonthToken, SystemClock};
