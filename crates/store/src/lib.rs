//! In-memory data stores for GoodFoods sessions.
//!
//! This crate provides the two stores the reservation assistant works
//! against:
//!
//! 1. **Catalog** — the immutable list of restaurants, loaded once at
//!    startup from a JSON file and read-only for the lifetime of the
//!    process.
//!
//! 2. **ReservationStore** — the mutable list of bookings for one user
//!    session. It starts empty, grows when a reservation is confirmed, and
//!    shrinks when one is cancelled. Nothing is persisted across restarts.
//!
//! # Core Concepts
//!
//! ## Catalog
//!
//! The [`Catalog`] preserves the insertion order of the source file — search
//! results are reported in catalog order, not relevance order — and supports
//! lookup by restaurant id.
//!
//! ## ReservationStore
//!
//! The [`ReservationStore`] is exclusively owned by one session. Booking ids
//! have the shape `BOOK` followed by four digits and are guaranteed unique
//! within the store that issued them.
//!
//! # Example
//!
//! ```no_run
//! use store::{Catalog, Reservation, ReservationStore};
//!
//! let catalog = Catalog::load("restaurants.json")?;
//! let mut reservations = ReservationStore::new();
//!
//! let booking_id = reservations.next_booking_id();
//! reservations.add(Reservation {
//!     booking_id: booking_id.clone(),
//!     restaurant_id: 2,
//!     date: "2024-08-15".into(),
//!     time: "19:00".into(),
//!     num_guests: 2,
//!     name: "John".into(),
//! });
//!
//! assert_eq!(reservations.cancel(&booking_id), 1);
//! # Ok::<(), store::Error>(())
//! ```

mod catalog;
mod error;
mod reservations;

pub use catalog::{Catalog, Restaurant};
pub use error::{Error, Result};
pub use reservations::{Reservation, ReservationStore};
