//! The deterministic tool layer.
//!
//! Four operations back the assistant: two pure reads against the catalog
//! (search, recommend) and two mutations of the session's reservation store
//! (reserve, cancel). [`ToolHost::dispatch`] is the boundary where the
//! model's loosely-typed argument payloads are coerced into typed argument
//! structs; every failure past that boundary is a descriptive string handed
//! back to the model, never an error the orchestrator has to unwind.

use crate::conversation::ToolCallRequest;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use store::{Catalog, Reservation, ReservationStore, Restaurant};

/// Maximum number of restaurants returned by search and recommend.
const MAX_RESULTS: usize = 5;

const INVALID_INPUT: &str = "Invalid reservation input. Please check date/time/guest count.";

/// Arguments for `search_restaurants`. All filters optional.
#[derive(Debug, Default, Deserialize)]
pub struct SearchArgs {
    pub location: Option<String>,
    pub cuisine: Option<String>,
    pub num_guests: Option<i64>,
}

/// Arguments for `make_reservation`.
///
/// Numeric fields are deliberately wide so out-of-range values reach the
/// validation messages instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct ReserveArgs {
    pub restaurant_id: i64,
    pub date: String,
    pub time: String,
    pub num_guests: i64,
    pub name: String,
}

/// Arguments for `cancel_reservation`.
#[derive(Debug, Deserialize)]
pub struct CancelArgs {
    pub booking_id: String,
}

/// Owns the session's reservation store and serves tool calls against it.
pub struct ToolHost {
    catalog: Catalog,
    reservations: ReservationStore,
}

impl ToolHost {
    /// Create a tool host over a catalog, with an empty reservation store.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            reservations: ReservationStore::new(),
        }
    }

    /// The session's current bookings.
    pub fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Filter the catalog by optional location, cuisine, and party size.
    ///
    /// Location and cuisine are case-insensitive substring matches; a party
    /// size excludes restaurants with smaller capacity. Filters combine with
    /// AND. Results stay in catalog order, truncated to the first five.
    pub fn search(&self, args: &SearchArgs) -> Vec<&Restaurant> {
        self.catalog
            .iter()
            .filter(|r| match &args.location {
                Some(loc) => r.location.to_lowercase().contains(&loc.to_lowercase()),
                None => true,
            })
            .filter(|r| match &args.cuisine {
                Some(cuisine) => r.cuisine.to_lowercase().contains(&cuisine.to_lowercase()),
                None => true,
            })
            .filter(|r| match args.num_guests {
                Some(n) => n <= i64::from(r.capacity),
                None => true,
            })
            .take(MAX_RESULTS)
            .collect()
    }

    /// The five top-rated restaurants, ties broken by catalog order.
    pub fn recommend(&self) -> Vec<&Restaurant> {
        let mut ranked: Vec<&Restaurant> = self.catalog.iter().collect();
        ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(MAX_RESULTS);
        ranked
    }

    /// Validate and record a reservation.
    ///
    /// Checks run in order (date, time, guest count, restaurant exists,
    /// capacity) and the first failure returns its message with no store
    /// mutation. Success appends exactly one record.
    pub fn reserve(&mut self, args: &ReserveArgs) -> String {
        if NaiveDate::parse_from_str(&args.date, "%Y-%m-%d").is_err() {
            return INVALID_INPUT.to_string();
        }
        if NaiveTime::parse_from_str(&args.time, "%H:%M").is_err() {
            return INVALID_INPUT.to_string();
        }
        if args.num_guests <= 0 {
            return INVALID_INPUT.to_string();
        }

        let Some(restaurant) = u32::try_from(args.restaurant_id)
            .ok()
            .and_then(|id| self.catalog.get(id))
        else {
            return "Restaurant not found.".to_string();
        };

        if args.num_guests > i64::from(restaurant.capacity) {
            return format!(
                "Sorry, {} can only accommodate {} guests.",
                restaurant.name, restaurant.capacity
            );
        }

        let booking_id = self.reservations.next_booking_id();
        let name = restaurant.name.clone();
        let restaurant_id = restaurant.id;
        self.reservations.add(Reservation {
            booking_id: booking_id.clone(),
            restaurant_id,
            date: args.date.clone(),
            time: args.time.clone(),
            num_guests: args.num_guests as u32,
            name: args.name.clone(),
        });

        format!(
            "Reservation confirmed at {} for {} guests on {} at {}. Booking ID: {}",
            name, args.num_guests, args.date, args.time, booking_id
        )
    }

    /// Cancel a booking by id. An unknown id is a normal, reported outcome.
    pub fn cancel(&mut self, args: &CancelArgs) -> String {
        if self.reservations.cancel(&args.booking_id) > 0 {
            "Reservation cancelled successfully.".to_string()
        } else {
            "No reservation found with that ID.".to_string()
        }
    }

    /// Route a model tool call by name and serialize its result for the
    /// transcript: restaurant lists are JSON-encoded, strings pass through.
    ///
    /// Unknown names and undeserializable payloads produce descriptive
    /// failure strings; this never panics and never aborts remaining calls.
    pub fn dispatch(&mut self, call: &ToolCallRequest) -> String {
        match call.name.as_str() {
            "search_restaurants" => {
                match serde_json::from_value::<SearchArgs>(call.arguments.clone()) {
                    Ok(args) => encode_restaurants(&self.search(&args)),
                    Err(e) => format!("Tool invocation failed: {e}"),
                }
            }
            "recommend_restaurants" => encode_restaurants(&self.recommend()),
            "make_reservation" => {
                match serde_json::from_value::<ReserveArgs>(call.arguments.clone()) {
                    Ok(args) => self.reserve(&args),
                    Err(e) => format!("Tool invocation failed: {e}"),
                }
            }
            "cancel_reservation" => {
                match serde_json::from_value::<CancelArgs>(call.arguments.clone()) {
                    Ok(args) => self.cancel(&args),
                    Err(e) => format!("Tool invocation failed: {e}"),
                }
            }
            other => format!("Unknown tool: {other}"),
        }
    }
}

fn encode_restaurants(restaurants: &[&Restaurant]) -> String {
    serde_json::to_string(restaurants).unwrap_or_else(|e| format!("Tool invocation failed: {e}"))
}
