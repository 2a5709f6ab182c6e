//! Receipt rendering and ticket export
//!
//! The receipt is stamped with the time the screen is entered (render
//! time, not payment time). Export runs as an explicit
//! Idle → Exporting → Exported | Failed machine; a failed export leaves
//! the receipt untouched and is always safe to retry.

use crate::environment::AppEnvironment;
use crate::types::PaidOrder;
use chrono::{DateTime, Utc};
use cinemadise_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Payload encoded in the ticket QR code
pub const QR_PAYLOAD: &str = "CinemadiseTicket";

/// Footer note printed under the ticket
pub const GATE_NOTE: &str = "Please present this ticket at the cinema gate.";

/// A rendered ticket receipt
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// The settled order
    pub order: PaidOrder,
    /// When the receipt screen was entered
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Creates a receipt stamped with the given issue time
    #[must_use]
    pub const fn new(order: PaidOrder, issued_at: DateTime<Utc>) -> Self {
        Self { order, issued_at }
    }

    /// File name for an exported ticket, stamped with the issue time
    #[must_use]
    pub fn export_file_name(&self) -> String {
        format!("Cinemadise_Ticket_{}.txt", self.issued_at.timestamp_millis())
    }
}

/// Export error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Rendering the ticket image failed
    #[error("Could not capture ticket image: {reason}")]
    Capture {
        /// Failure description
        reason: String,
    },
    /// Moving the captured image to its destination failed
    #[error("Could not save ticket image: {reason}")]
    Move {
        /// Failure description
        reason: String,
    },
}

/// Where an exported ticket ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Handed to the platform share sheet
    Shared {
        /// Destination path of the shared image
        destination: String,
    },
    /// Saved locally (no share sheet available)
    Saved {
        /// Destination path of the saved image
        destination: String,
    },
}

impl ExportOutcome {
    /// Destination path of the exported image
    #[must_use]
    pub fn destination(&self) -> &str {
        match self {
            Self::Shared { destination } | Self::Saved { destination } => destination,
        }
    }
}

/// Ticket exporter trait
///
/// Captures the ticket as an image, moves it to its destination, and
/// shares it if the platform offers a share sheet.
pub trait TicketExporter: Send + Sync {
    /// Export the receipt as a ticket image
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if capture or the move fails.
    fn export(
        &self,
        receipt: &Receipt,
    ) -> Pin<Box<dyn Future<Output = Result<ExportOutcome, ExportError>> + Send>>;
}

/// Exporter that renders the ticket as text and saves it into a directory
///
/// There is no share sheet on a plain filesystem, so this exporter
/// always resolves to [`ExportOutcome::Saved`].
#[derive(Debug, Clone)]
pub struct FilesystemExporter {
    dir: PathBuf,
}

impl FilesystemExporter {
    /// Creates an exporter writing into the given directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(dir: impl Into<PathBuf>) -> Arc<dyn TicketExporter> {
        Arc::new(Self::new(dir))
    }

    fn render(receipt: &Receipt) -> String {
        let order = &receipt.order;
        let seats: Vec<String> = order.order.seats.iter().map(ToString::to_string).collect();
        format!(
            "{title}\nSeats: {seats}\nTotal: {total}\nPaid with: {method}\nIssued: {issued}\nQR: {qr}\n{note}\n",
            title = order.order.movie.title,
            seats = seats.join(", "),
            total = order.order.total,
            method = order.method,
            issued = receipt.issued_at.format("%Y-%m-%d %H:%M"),
            qr = QR_PAYLOAD,
            note = GATE_NOTE,
        )
    }
}

impl TicketExporter for FilesystemExporter {
    fn export(
        &self,
        receipt: &Receipt,
    ) -> Pin<Box<dyn Future<Output = Result<ExportOutcome, ExportError>> + Send>> {
        let path = self.dir.join(receipt.export_file_name());
        let contents = Self::render(receipt);

        Box::pin(async move {
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| ExportError::Move {
                    reason: e.to_string(),
                })?;

            tracing::info!(path = %path.display(), "Ticket saved");

            Ok(ExportOutcome::Saved {
                destination: path.display().to_string(),
            })
        })
    }
}

/// Phase of the export machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPhase {
    /// No export in flight
    Idle,
    /// Export running; further requests are ignored
    Exporting,
    /// Export finished; notice shown until dismissed
    Exported {
        /// Destination path of the exported image
        destination: String,
    },
    /// Export failed; notice shown until dismissed, retry allowed
    Failed {
        /// User-visible failure notice
        notice: String,
    },
}

/// State of the receipt screen
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptState {
    /// The rendered receipt
    pub receipt: Receipt,
    /// Current export phase
    pub export: ExportPhase,
}

impl ReceiptState {
    /// Creates a fresh receipt screen
    #[must_use]
    pub const fn new(receipt: Receipt) -> Self {
        Self {
            receipt,
            export: ExportPhase::Idle,
        }
    }
}

/// Actions on the receipt screen
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptAction {
    /// Start a ticket export
    ExportRequested,
    /// Fed back by the export effect
    ExportFinished {
        /// Result of the export
        outcome: Result<ExportOutcome, ExportError>,
    },
    /// Dismiss the export notice
    DismissNotice,
}

/// Reducer for the receipt screen
#[derive(Debug, Clone, Default)]
pub struct ReceiptReducer;

impl Reducer for ReceiptReducer {
    type State = ReceiptState;
    type Action = ReceiptAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ReceiptAction::ExportRequested => {
                // Busy guard
                if state.export == ExportPhase::Exporting {
                    tracing::debug!("Export ignored: one already in flight");
                    return smallvec![Effect::None];
                }

                state.export = ExportPhase::Exporting;

                let export = env.exporter.export(&state.receipt);
                smallvec![async_effect! {
                    let outcome = export.await;
                    Some(ReceiptAction::ExportFinished { outcome })
                }]
            },
            ReceiptAction::ExportFinished { outcome } => {
                // Only honored while exporting
                if state.export != ExportPhase::Exporting {
                    return smallvec![Effect::None];
                }

                state.export = match outcome {
                    Ok(done) => ExportPhase::Exported {
                        destination: done.destination().to_string(),
                    },
                    Err(error) => {
                        tracing::warn!(error = %error, "Ticket export failed");
                        ExportPhase::Failed {
                            notice: error.to_string(),
                        }
                    },
                };
                smallvec![Effect::None]
            },
            ReceiptAction::DismissNotice => {
                match state.export {
                    ExportPhase::Exported { .. } | ExportPhase::Failed { .. } => {
                        state.export = ExportPhase::Idle;
                    },
                    ExportPhase::Idle | ExportPhase::Exporting => {},
                }
                smallvec![Effect::None]
            },
        }
    }
}
