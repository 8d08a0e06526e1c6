// directions.rs
//
// Hands navigation off to an external maps service. The caller asks the
// platform for a position; whatever comes back is turned into a URL to open
// and a short notification for the user.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::network::Area;
use crate::positioning::Point;

const MAPS_BASE_URL: &str = "https://www.google.com/maps";
const WALKING_DATA: &str = "data=!3m1!4b1!4m2!4m1!3e2";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the platform's geolocation request produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Located(Coordinates),
    /// Permission refused, timed out or otherwise failed.
    Denied,
    Unsupported,
}

/// Options passed along with a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// How old a cached position may be.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    /// Let the maps service pick.
    Any,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    Stop,
    Area,
}

/// Where the user wants to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Shown to the user.
    pub name: String,
    /// Sent to the maps service.
    pub query: String,
    pub kind: PlaceKind,
}

impl Destination {
    pub fn stop(name: &str) -> Self {
        Self {
            name: name.to_string(),
            query: name.to_string(),
            kind: PlaceKind::Stop,
        }
    }

    pub fn area(area: &Area) -> Self {
        Self {
            name: area.name.clone(),
            query: area.search_label(),
            kind: PlaceKind::Area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

/// The URL to open and what to tell the user about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsPlan {
    pub url: String,
    pub notification: Notification,
}

pub fn directions_url(from: Coordinates, destination: &str, mode: TravelMode) -> String {
    let url = format!(
        "{}/dir/{},{}/{}",
        MAPS_BASE_URL,
        from.latitude,
        from.longitude,
        urlencoding::encode(destination)
    );
    match mode {
        TravelMode::Any => url,
        TravelMode::Walking => format!("{}/{}", url, WALKING_DATA),
    }
}

pub fn search_url(destination: &str) -> String {
    format!("{}/search/{}", MAPS_BASE_URL, urlencoding::encode(destination))
}

/// Directions when the position is known, otherwise a plain search for the place.
pub fn plan_directions(
    outcome: GeolocationOutcome,
    destination: &Destination,
    mode: TravelMode,
) -> DirectionsPlan {
    let place = match destination.kind {
        PlaceKind::Stop => "stop",
        PlaceKind::Area => "area",
    };
    match outcome {
        GeolocationOutcome::Located(from) => DirectionsPlan {
            url: directions_url(from, &destination.query, mode),
            notification: Notification {
                title: match mode {
                    TravelMode::Walking => "Walking directions opened".to_string(),
                    TravelMode::Any => "Directions opened".to_string(),
                },
                description: format!("Directions to {} opened in Google Maps.", destination.name),
                destructive: false,
            },
        },
        GeolocationOutcome::Denied => DirectionsPlan {
            url: search_url(&destination.query),
            notification: Notification {
                title: "Location access denied".to_string(),
                description: format!("Opened {} location in Google Maps.", place),
                destructive: true,
            },
        },
        GeolocationOutcome::Unsupported => DirectionsPlan {
            url: search_url(&destination.query),
            notification: Notification {
                title: "Geolocation not supported".to_string(),
                description: format!("Opened {} location in Google Maps.", place),
                destructive: false,
            },
        },
    }
}

/// A stand-in user position on the map canvas, used by the demo map instead
/// of projecting real coordinates.
pub fn mock_user_location(rng: &mut dyn RngCore) -> Point {
    Point::new(rng.random_range(60.0..90.0), rng.random_range(10.0..50.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HERE: Coordinates = Coordinates {
        latitude: 17.4935,
        longitude: 78.3915,
    };

    #[test]
    fn walking_directions_to_a_stop() {
        let plan = plan_directions(
            GeolocationOutcome::Located(HERE),
            &Destination::stop("KPHB Colony"),
            TravelMode::Walking,
        );
        assert_eq!(
            plan.url,
            "https://www.google.com/maps/dir/17.4935,78.3915/KPHB%20Colony/data=!3m1!4b1!4m2!4m1!3e2"
        );
        assert_eq!(plan.notification.title, "Walking directions opened");
        assert_eq!(
            plan.notification.description,
            "Directions to KPHB Colony opened in Google Maps."
        );
        assert!(!plan.notification.destructive);
    }

    #[test]
    fn denied_location_falls_back_to_search() {
        let plan = plan_directions(
            GeolocationOutcome::Denied,
            &Destination::stop("Jayanagar 4th Block"),
            TravelMode::Walking,
        );
        assert_eq!(
            plan.url,
            "https://www.google.com/maps/search/Jayanagar%204th%20Block"
        );
        assert_eq!(plan.notification.title, "Location access denied");
        assert!(plan.notification.destructive);
    }

    #[test]
    fn area_directions_search_by_name_and_city() {
        let network = crate::network::TransitNetwork::builtin().unwrap();
        let destination = Destination::area(network.area("cbit").unwrap());

        let plan = plan_directions(
            GeolocationOutcome::Unsupported,
            &destination,
            TravelMode::Any,
        );
        assert_eq!(plan.url, "https://www.google.com/maps/search/CBIT%20Hyderabad");
        assert_eq!(plan.notification.description, "Opened area location in Google Maps.");
        assert!(!plan.notification.destructive);

        let plan = plan_directions(
            GeolocationOutcome::Located(HERE),
            &destination,
            TravelMode::Any,
        );
        assert!(plan.url.ends_with("/CBIT%20Hyderabad"));
        assert_eq!(plan.notification.title, "Directions opened");
    }

    #[test]
    fn reserved_characters_are_encoded() {
        assert_eq!(
            search_url("A&B/C"),
            "https://www.google.com/maps/search/A%26B%2FC"
        );
    }

    #[test]
    fn geolocation_defaults() {
        let options = GeolocationOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[test]
    fn mock_location_stays_in_demo_window() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let point = mock_user_location(&mut rng);
            assert!((60.0..90.0).contains(&point.x));
            assert!((10.0..50.0).contains(&point.y));
        }
    }
}
