//! Test data helpers for creating test objects

use chrono::{Duration, Utc};
use RideLink::config::{RideConfig, Settings};
use RideLink::models::ride::{CreateRideRequest, Ride};
use RideLink::models::user::CreateUserRequest;

/// Default owner id used by aggregate-level tests
pub const TEST_OWNER: i64 = 1;

/// Build a ride creation request departing shortly before `now` so the
/// default start-window policy allows starting it immediately
pub fn create_ride_request(total_seats: i32) -> CreateRideRequest {
    CreateRideRequest {
        origin: "Colombo".to_string(),
        destination: "Kandy".to_string(),
        start_time: Utc::now() - Duration::minutes(1),
        total_seats,
        price_per_seat: 750.0,
        schedule: None,
        owner_contact: Some("+94 71 000 0000".to_string()),
    }
}

/// Build a ride aggregate owned by [`TEST_OWNER`]
pub fn create_test_ride(total_seats: i32) -> Ride {
    Ride::new(create_ride_request(total_seats), TEST_OWNER, Some("Owner".to_string()), Utc::now())
        .expect("valid test ride")
}

/// Build a user creation request
pub fn create_user_request(email: &str, name: &str, role: Option<&str>) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        name: name.to_string(),
        role: role.map(|r| r.to_string()),
        vehicle_type: Some("Car".to_string()),
    }
}

/// Settings with the start window disabled, for lifecycle tests that are
/// not about timing
pub fn relaxed_settings() -> Settings {
    Settings {
        ride: RideConfig {
            enforce_start_window: false,
            start_window_minutes: 15,
            auto_reschedule: true,
            max_save_attempts: 3,
        },
        ..Settings::default()
    }
}
