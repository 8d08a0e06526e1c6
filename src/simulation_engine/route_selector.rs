use std::convert::Infallible;
use std::str::FromStr;

use crate::network::TransitNetwork;

/// Which routes the map should be tracking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RouteSelector {
    /// Nothing selected.
    #[default]
    None,
    Single(String),
    /// An explicit, ordered choice of routes.
    Many(Vec<String>),
    /// Every route of the area being viewed.
    All,
}

impl RouteSelector {
    /// Turns the selector into the concrete, ordered route list the tracker takes.
    pub fn resolve(&self, network: &TransitNetwork, area_id: &str) -> Vec<String> {
        let candidates = match self {
            RouteSelector::None => Vec::new(),
            RouteSelector::Single(route_id) => vec![route_id.clone()],
            RouteSelector::Many(route_ids) => route_ids.clone(),
            RouteSelector::All => network.route_ids(area_id),
        };

        unique_routes(candidates)
    }
}

/// Trims ids and drops blanks and repeats; the first occurrence keeps its place.
pub(crate) fn unique_routes<I, T>(route_ids: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut routes: Vec<String> = Vec::new();
    for route_id in route_ids {
        let route_id = route_id.as_ref().trim();
        if !route_id.is_empty() && !routes.iter().any(|seen| seen == route_id) {
            routes.push(route_id.to_string());
        }
    }
    routes
}

impl FromStr for RouteSelector {
    type Err = Infallible;

    /// `""` is nothing, `"all"` is every route, `"219,288K"` is a list,
    /// anything else a single route.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let selector = if s.is_empty() {
            RouteSelector::None
        } else if s.eq_ignore_ascii_case("all") {
            RouteSelector::All
        } else if s.contains(',') {
            RouteSelector::Many(s.split(',').map(|part| part.trim().to_string()).collect())
        } else {
            RouteSelector::Single(s.to_string())
        };
        Ok(selector)
    }
}

impl From<Option<&str>> for RouteSelector {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => s.parse().unwrap_or_default(),
            None => RouteSelector::None,
        }
    }
}
