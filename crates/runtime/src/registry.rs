//! Static tool descriptors exported to the model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A tool definition the model can choose to invoke.
///
/// `name` must exactly match the identifier the dispatcher routes on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the argument object.
    pub parameters: Value,
}

/// The four reservation-assistant tools.
///
/// Handed unmodified to the gateway on every request so the model can decide
/// whether and how to call a tool.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "search_restaurants".into(),
            description: "Search restaurants by filters".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "Location to search in"},
                    "cuisine": {"type": "string", "description": "Type of cuisine"},
                    "num_guests": {"type": "integer", "description": "Number of guests"}
                },
                "required": []
            }),
        },
        ToolSpec {
            name: "recommend_restaurants".into(),
            description: "Recommend top-rated restaurants".into(),
            parameters: json!({"type": "object", "properties": {}}),
        },
        ToolSpec {
            name: "make_reservation".into(),
            description: "Make a reservation at a restaurant".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "restaurant_id": {"type": "integer", "description": "ID of the restaurant"},
                    "date": {"type": "string", "description": "Date in YYYY-MM-DD format"},
                    "time": {"type": "string", "description": "Time in HH:MM format"},
                    "num_guests": {"type": "integer", "description": "Number of guests"},
                    "name": {"type": "string", "description": "Name for the reservation"}
                },
                "required": ["restaurant_id", "date", "time", "num_guests", "name"]
            }),
        },
        ToolSpec {
            name: "cancel_reservation".into(),
            description: "Cancel an existing reservation".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "booking_id": {"type": "string", "description": "Booking ID to cancel"}
                },
                "required": ["booking_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_names_match_dispatch_names() {
        let names: Vec<String> = tool_specs().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "search_restaurants",
                "recommend_restaurants",
                "make_reservation",
                "cancel_reservation",
            ]
        );
    }

    #[test]
    fn reservation_schema_requires_all_arguments() {
        let specs = tool_specs();
        let reserve = specs.iter().find(|s| s.name == "make_reservation").unwrap();
        let required = reserve.parameters["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
    }
}
