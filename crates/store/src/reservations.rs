//! The session-scoped reservation store.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A confirmed booking.
///
/// Records are appended on confirmation and removed on cancellation; they
/// are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub booking_id: String,
    pub restaurant_id: u32,
    /// `YYYY-MM-DD`, validated before the record is created.
    pub date: String,
    /// 24-hour `HH:MM`, validated before the record is created.
    pub time: String,
    pub num_guests: u32,
    pub name: String,
}

/// Mutable collection of bookings for one user session.
///
/// Each session owns exactly one store; sharing a store across sessions is a
/// correctness bug, not an optimization.
#[derive(Debug, Default)]
pub struct ReservationStore {
    reservations: Vec<Reservation>,
}

impl ReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a booking id of the form `BOOK` + four digits.
    ///
    /// Candidates are re-drawn until one does not collide with an id already
    /// in this store, so ids are unique per session. A session holding all
    /// 9000 possible ids at once would loop forever; that ceiling is far
    /// beyond any realistic conversation.
    pub fn next_booking_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("BOOK{}", rng.gen_range(1000..10000));
            if !self.reservations.iter().any(|r| r.booking_id == candidate) {
                return candidate;
            }
        }
    }

    /// Append a booking.
    pub fn add(&mut self, reservation: Reservation) {
        self.reservations.push(reservation);
    }

    /// Remove every booking with the given id, returning how many were
    /// removed (expected: zero or one).
    pub fn cancel(&mut self, booking_id: &str) -> usize {
        let before = self.reservations.len();
        self.reservations.retain(|r| r.booking_id != booking_id);
        before - self.reservations.len()
    }

    /// Iterate bookings in confirmation order.
    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str) -> Reservation {
        Reservation {
            booking_id: id.into(),
            restaurant_id: 1,
            date: "2024-08-15".into(),
            time: "19:00".into(),
            num_guests: 2,
            name: "John".into(),
        }
    }

    #[test]
    fn booking_id_shape() {
        let store = ReservationStore::new();
        let id = store.next_booking_id();
        assert!(id.starts_with("BOOK"));
        assert_eq!(id.len(), 8);
        assert!(id[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn booking_ids_unique_within_store() {
        let mut store = ReservationStore::new();
        for _ in 0..100 {
            let id = store.next_booking_id();
            assert!(!store.iter().any(|r| r.booking_id == id));
            store.add(booking(&id));
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn cancel_removes_exactly_matching() {
        let mut store = ReservationStore::new();
        store.add(booking("BOOK1111"));
        store.add(booking("BOOK2222"));

        assert_eq!(store.cancel("BOOK1111"), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().unwrap().booking_id, "BOOK2222");
    }

    #[test]
    fn cancel_unknown_id_is_a_no_op() {
        let mut store = ReservationStore::new();
        store.add(booking("BOOK1111"));

        assert_eq!(store.cancel("BOOK9999"), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_then_cancel_restores_prior_state() {
        let mut store = ReservationStore::new();
        store.add(booking("BOOK1111"));
        let snapshot: Vec<Reservation> = store.iter().cloned().collect();

        let id = store.next_booking_id();
        store.add(booking(&id));
        assert_eq!(store.cancel(&id), 1);

        let after: Vec<Reservation> = store.iter().cloned().collect();
        assert_eq!(after, snapshot);
    }
}
