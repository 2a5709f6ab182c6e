//! Cinemadise demo binary
//!
//! Drives the whole booking flow through the store: splash, login, movie
//! pick, seat selection, payment, receipt export, graceful shutdown.

use cinemadise::auth::{DEMO_EMAIL, DEMO_PASSWORD, LoginAction};
use cinemadise::environment::{AppEnvironment, SystemClock, Timings};
use cinemadise::flow::{FlowAction, FlowReducer, FlowState, Screen};
use cinemadise::payment::PaymentAction;
use cinemadise::payment_gateway::MockPaymentGateway;
use cinemadise::receipt::{ExportPhase, FilesystemExporter, ReceiptAction};
use cinemadise::seat_selection::{SeatPolicy, SeatSelectionAction};
use cinemadise::types::{MovieId, PaymentMethod, SeatNumber};
use cinemadise_runtime::{EffectHandle, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn screen_label(screen: &Screen) -> String {
    match screen {
        Screen::Splash => "Splash".to_string(),
        Screen::AuthLanding => "AuthLanding".to_string(),
        Screen::Login(_) => "Login".to_string(),
        Screen::SignUp(_) => "SignUp".to_string(),
        Screen::OtpVerify(_) => "OtpVerify".to_string(),
        Screen::Home(home) => format!("Home (poster {})", home.carousel_index),
        Screen::MovieDetail { movie } => format!("MovieDetail ({})", movie.title),
        Screen::SeatSelection(selection) => format!(
            "SeatSelection ({} seats, total {})",
            selection.selected.len(),
            selection.total()
        ),
        Screen::Payment(payment) => format!("Payment ({:?})", payment.phase),
        Screen::Receipt(receipt) => format!("Receipt ({:?})", receipt.export),
    }
}

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinemadise=info,cinemadise_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Cinemadise: Ticket Booking Flow ===\n");

    let timings = Timings::default();
    let env = AppEnvironment {
        clock: Arc::new(SystemClock),
        gateway: MockPaymentGateway::shared(timings.settlement),
        exporter: FilesystemExporter::shared(std::env::temp_dir()),
        timings,
        seat_policy: SeatPolicy::default(),
    };

    let store = Store::new(FlowState::default(), FlowReducer, env);

    // Splash: Start schedules the timer; wait for it to land on auth
    println!(">>> Start (splash for {:?})", timings.splash);
    let mut handle = store.send(FlowAction::Start).await?;
    handle.wait().await;
    let screen = store.state(|s| screen_label(&s.screen)).await;
    println!("Screen: {screen}");

    // Login with the demo account
    println!("\n>>> Login as {DEMO_EMAIL}");
    let _ = store.send(FlowAction::ChooseLogin).await?;
    let _ = store
        .send(FlowAction::Login(LoginAction::EmailChanged(
            DEMO_EMAIL.to_string(),
        )))
        .await?;
    let _ = store
        .send(FlowAction::Login(LoginAction::PasswordChanged(
            DEMO_PASSWORD.to_string(),
        )))
        .await?;
    let _ = store.send(FlowAction::Login(LoginAction::Submit)).await?;
    let screen = store.state(|s| screen_label(&s.screen)).await;
    println!("Screen: {screen}");

    println!("\nNow showing:");
    for movie in cinemadise::catalog::movies() {
        println!(
            "  {} ({}, {:.1}★) — {} per seat",
            movie.title,
            movie.duration_label(),
            movie.rating,
            movie.seat_price
        );
    }
    println!("Nearby cinemas:");
    for cinema in cinemadise::catalog::cinemas() {
        println!(
            "  {} at {} ({:.1} km, {} screens)",
            cinema.name, cinema.location, cinema.distance_km, cinema.screens
        );
    }

    // Pick a movie and some seats
    println!("\n>>> Select movie 1, pick seats 3, 7, 12");
    let _ = store.send(FlowAction::SelectMovie(MovieId::new(1))).await?;
    let _ = store.send(FlowAction::BuyTickets).await?;
    let mut last_toggle = EffectHandle::completed();
    for seat in [3, 7, 12] {
        last_toggle = store
            .send(FlowAction::SeatSelection(SeatSelectionAction::Toggle(
                SeatNumber::new(seat),
            )))
            .await?;
    }
    last_toggle.wait().await;
    let screen = store.state(|s| screen_label(&s.screen)).await;
    println!("Screen: {screen}");

    // Pay: confirm, then wait for the settlement feedback action
    println!("\n>>> Pay by card (settles in {:?})", timings.settlement);
    let _ = store.send(FlowAction::ProceedToPayment).await?;
    let _ = store
        .send(FlowAction::Payment(PaymentAction::SelectMethod(
            PaymentMethod::Card,
        )))
        .await?;
    let settled = store
        .send_and_wait_for(
            FlowAction::Payment(PaymentAction::Confirm),
            |action| {
                matches!(
                    action,
                    FlowAction::Deferred { action, .. } if matches!(
                        **action,
                        FlowAction::Payment(
                            PaymentAction::SettlementCompleted
                                | PaymentAction::SettlementFailed { .. }
                        )
                    )
                )
            },
            Duration::from_secs(10),
        )
        .await?;
    tracing::info!(?settled, "Settlement feedback received");
    // The terminal action is broadcast just before it is reduced
    tokio::time::sleep(Duration::from_millis(20)).await;
    let screen = store.state(|s| screen_label(&s.screen)).await;
    println!("Screen: {screen}");

    // Export the ticket
    println!("\n>>> Export ticket");
    let mut handle = store
        .send(FlowAction::Receipt(ReceiptAction::ExportRequested))
        .await?;
    handle.wait().await;
    let destination = store
        .state(|s| match &s.screen {
            Screen::Receipt(receipt) => match &receipt.export {
                ExportPhase::Exported { destination } => Some(destination.clone()),
                _ => None,
            },
            _ => None,
        })
        .await;
    match destination {
        Some(path) => println!("Ticket saved to {path}"),
        None => println!("Export did not finish"),
    }

    // Back home, then drain remaining timers and stop
    let _ = store.send(FlowAction::BackToHome).await?;
    println!("\n>>> Shutting down");
    store.shutdown(Duration::from_secs(10)).await?;
    println!("Done.");

    Ok(())
}
