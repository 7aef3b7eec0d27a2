//! Onboarding Demo
//!
//! Walks one member through the app: profile setup, the literary quiz,
//! a paid registration, the premium purchase and a free registration.
//!
//! Pass a RON config path as the first argument to use it instead of the
//! in-memory defaults. `RUST_LOG=onceupon_session=debug` shows reducer logs.

use onceupon_core::{ClubEvent, OptionIndex, ProfilePatch, SystemClock, QUESTION_COUNT};
use onceupon_session::{
    select_provider, ProfileStore, PurchaseOutcome, Registration, SessionConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> onceupon_session::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onboarding=info,onceupon_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::in_memory(),
    }
    .with_env_overrides();

    println!("=== Once Upon Us Onboarding Demo ===\n");

    let provider = select_provider(&config.payments, None).await?;
    let mut store = ProfileStore::open(&config, provider, Arc::new(SystemClock)).await?;

    // Onboarding
    store
        .update(
            ProfilePatch::new()
                .with_phone("+15125550100")
                .with_name("Ada")
                .with_birthday("1990-12-10")
                .with_referral_source("friend")
                .with_city("Austin")
                .with_onboarding_complete(true),
        )
        .await;
    println!("Welcome, {}!", store.profile().name);

    // Quiz: lean towards the third option on every question
    store.start_quiz().await;
    for question in 0..QUESTION_COUNT {
        let pick = if question % 5 == 4 { 0 } else { 2 };
        store.answer(OptionIndex::new(pick)?).await;
    }
    if let Some(kind) = store.profile().literary_type {
        let profile = kind.profile();
        println!("\nYou are {}: {}", profile.name, profile.description);
        let pairings: Vec<&str> = profile
            .strong_pairings
            .iter()
            .map(|p| p.profile().name)
            .collect();
        println!("Strong pairings: {}", pairings.join(", "));
    }

    // A paid registration
    let gothic = ClubEvent::new("evt-gothic", "Gothic Night", "2025-10-31", config.event_price);
    print_registration(&gothic, store.register_for_event(&gothic).await);

    // Premium
    let mut flow = store.subscription();
    if let Some(paywall) = flow.paywall().await {
        println!("\n{}\n{}", paywall.title, paywall.subtitle);
        for feature in &paywall.features {
            println!("  * {feature}");
        }
        if let Some(primary) = paywall.primary_package() {
            println!("{}: {} {}", primary.title, primary.price, primary.duration);
            match flow.purchase(&primary.identifier).await {
                PurchaseOutcome::Completed { premium } => println!("Purchase complete (premium: {premium})"),
                PurchaseOutcome::Cancelled => println!("Purchase cancelled"),
                PurchaseOutcome::Failed(message) => println!("Purchase failed: {message}"),
            }
        }
    }
    drop(flow);

    // Premium members get one free event a month
    let poetry = ClubEvent::new("evt-verse", "Poetry Slam", "2025-11-14", config.event_price);
    print_registration(&poetry, store.register_for_event(&poetry).await);
    print_registration(&poetry, store.register_for_event(&poetry).await);

    println!("\nUpcoming events:");
    for event in &store.profile().upcoming_events {
        println!("  {} on {} (check-in: {})", event.title, event.date, event.check_in_code);
    }

    store.shutdown().await;
    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_registration(event: &ClubEvent, registration: Registration) {
    match registration {
        Registration::Confirmed {
            registration,
            charged,
        } => {
            if charged.is_free() {
                println!(
                    "\nRegistered for {} with your monthly free event (code {})",
                    event.theme, registration.check_in_code
                );
            } else {
                println!(
                    "\nRegistered for {} for {} (code {})",
                    event.theme, charged, registration.check_in_code
                );
            }
        }
        Registration::AlreadyRegistered => {
            println!("\nAlready registered for {}", event.theme);
        }
    }
}
