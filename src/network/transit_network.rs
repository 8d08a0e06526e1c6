use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

const BUILTIN_NETWORK: &str = include_str!("../../data/network.json");

/// Kind of stop, as shown on the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Campus,
    Regular,
    Major,
}

/// A stop placed on the map canvas. `x` and `y` are percentages of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub id: u32,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: StopKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    pub id: String,
    pub name: String,
    pub color: String,
    pub operator: String,
}

/// The neighbourhood around one college: its stops (campus stop first) and
/// the routes serving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub city: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub stops: Vec<BusStop>,
    #[serde(default)]
    pub routes: Vec<BusRoute>,
}

impl Area {
    pub fn route(&self, route_id: &str) -> Option<&BusRoute> {
        self.routes.iter().find(|route| route.id == route_id)
    }

    pub fn route_ids(&self) -> Vec<String> {
        self.routes.iter().map(|route| route.id.clone()).collect()
    }

    /// Label used when asking a maps service for this area, e.g. "CBIT Hyderabad".
    pub fn search_label(&self) -> String {
        format!("{} {}", self.name, self.city)
    }
}

/// Read-only topology handed to the tracker's consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitNetwork {
    pub areas: Vec<Area>,
}

impl TransitNetwork {
    /// The network bundled with the crate.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json_str(BUILTIN_NETWORK)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&contents)?)
    }

    pub fn area(&self, area_id: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == area_id)
    }

    /// Cities in the order they first appear.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = Vec::new();
        for area in &self.areas {
            if !cities.contains(&area.city.as_str()) {
                cities.push(&area.city);
            }
        }
        cities
    }

    pub fn areas_in_city<'a>(&'a self, city: &'a str) -> impl Iterator<Item = &'a Area> + 'a {
        self.areas
            .iter()
            .filter(move |area| area.city.eq_ignore_ascii_case(city))
    }

    /// Route ids of an area in declared order; empty for an unknown area.
    pub fn route_ids(&self, area_id: &str) -> Vec<String> {
        self.area(area_id).map(Area::route_ids).unwrap_or_default()
    }

    pub fn find_route(&self, area_id: &str, route_id: &str) -> Option<&BusRoute> {
        self.area(area_id)?.route(route_id)
    }

    /// Every area with a route of this id. The same number can serve several colleges.
    pub fn areas_serving<'a>(&'a self, route_id: &'a str) -> impl Iterator<Item = &'a Area> + 'a {
        self.areas
            .iter()
            .filter(move |area| area.route(route_id).is_some())
    }
}
