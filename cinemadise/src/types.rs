//! Domain types for the Cinemadise booking flow
//!
//! The flow accumulates an immutable order context as it moves forward:
//! seat selection produces an [`OrderContext`], payment settles it into a
//! [`PaidOrder`], and the receipt stage stamps it with an issue time.

use serde::{Deserialize, Serialize};

/// Monetary amount in whole Ugandan shillings
///
/// UGX has no minor unit in practice, so the amount is stored as a whole
/// number of shillings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from whole shillings
    #[must_use]
    pub const fn ugx(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the amount in whole shillings
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts, saturating at `u64::MAX`
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies the amount by a count, saturating at `u64::MAX`
    #[must_use]
    pub const fn saturating_mul(self, count: u64) -> Self {
        Self(self.0.saturating_mul(count))
    }
}

impl std::fmt::Display for Money {
    /// Formats as "UGX 20,000" with thousands separators
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;

        for (i, c) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        write!(f, "UGX {grouped}")
    }
}

/// Unique movie identifier within the catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MovieId(u32);

impl MovieId {
    /// Creates a new movie ID
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// An immutable catalog entry
///
/// Catalog entries are created by the catalog provider and never mutated;
/// they travel through the flow by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: MovieId,
    /// Display title
    pub title: String,
    /// Running time in minutes
    pub duration_min: u32,
    /// Genre labels
    pub genres: Vec<String>,
    /// Viewer rating out of 5
    pub rating: f32,
    /// Short plot synopsis
    pub plot: String,
    /// Poster asset name
    pub poster: String,
    /// Price per seat
    pub seat_price: Money,
}

impl Movie {
    /// Running time formatted as "3h 1m"
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{}h {}m", self.duration_min / 60, self.duration_min % 60)
    }
}

/// A cinema venue shown on the home screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cinema {
    /// Venue name
    pub name: String,
    /// Street or mall location
    pub location: String,
    /// Distance from the user in kilometres
    pub distance_km: f64,
    /// Number of screens at the venue
    pub screens: u8,
}

/// A 1-indexed seat number within the dense auditorium grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SeatNumber(u32);

impl SeatNumber {
    /// Creates a new seat number (1-indexed)
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// Returns the raw seat number
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendering status of a seat in the auditorium grid
///
/// `Booked` exists for the seat-map legend; no seat is ever pre-booked in
/// the demo catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    /// Seat is free to select
    Available,
    /// Seat is part of the current selection
    Selected,
    /// Seat was sold to someone else (legend only)
    Booked,
}

impl SeatStatus {
    /// Legend label for the status
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Selected => "Selected",
            Self::Booked => "Booked",
        }
    }
}

/// Payment method chosen on the payment screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Bank card
    Card,
    /// Mobile money wallet (telecom)
    MobileMoney,
    /// In-app wallet balance
    Wallet,
}

impl PaymentMethod {
    /// All methods, in the order the chooser presents them
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Card, Self::MobileMoney, Self::Wallet]
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Card => "Card",
            Self::MobileMoney => "Mobile Money",
            Self::Wallet => "Wallet",
        };
        write!(f, "{label}")
    }
}

/// Immutable snapshot handed from seat selection to payment
///
/// The only constructor computes the total from the seats and the movie's
/// seat price, so `total == seats.len() × seat_price` holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderContext {
    /// The movie being booked
    pub movie: Movie,
    /// The selected seats, in ascending order
    pub seats: Vec<SeatNumber>,
    /// Total price for the selection
    pub total: Money,
}

impl OrderContext {
    /// Creates an order context, computing the total from the selection
    #[must_use]
    pub fn new(movie: Movie, seats: Vec<SeatNumber>) -> Self {
        let total = movie.seat_price.saturating_mul(seats.len() as u64);
        Self {
            movie,
            seats,
            total,
        }
    }
}

/// An order context extended with the settled payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidOrder {
    /// The order as it left seat selection
    pub order: OrderContext,
    /// The method the payment settled with
    pub method: PaymentMethod,
}
