//! Linkable forecast state.
//!
//! The current location round-trips through `lat`, `lon` and `name` query
//! parameters so a forecast view can be bookmarked or shared.

use url::form_urlencoded;

use crate::types::Location;

/// Query string for `location`, e.g. `lat=40.0150&lon=-105.2705&name=Boulder`.
pub fn share_query(location: &Location) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("lat", &format!("{:.4}", location.lat))
        .append_pair("lon", &format!("{:.4}", location.lon))
        .append_pair("name", &location.name)
        .finish()
}

/// Parse a location out of a query string (a leading `?` is allowed).
///
/// Both `lat` and `lon` must be present and finite. A missing or blank
/// `name` falls back to the coordinates.
pub fn location_from_query(query: &str) -> Option<Location> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut lat = None;
    let mut lon = None;
    let mut name = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "lat" => lat = value.trim().parse::<f64>().ok(),
            "lon" => lon = value.trim().parse::<f64>().ok(),
            "name" => name = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let (lat, lon) = (lat?, lon?);
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    Some(match name.filter(|n| !n.is_empty()) {
        Some(name) => Location::new(name, lat, lon),
        None => Location::from_coordinates(lat, lon),
    })
}

/// Location to show on startup: a linked one wins over the most recent history entry.
pub fn initial_location(query: Option<&str>, history: &[Location]) -> Option<Location> {
    query
        .and_then(location_from_query)
        .or_else(|| history.first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_query_encodes_name() {
        let q = share_query(&Location::new("Boulder, CO", 40.015, -105.2705));
        assert_eq!(q, "lat=40.0150&lon=-105.2705&name=Boulder%2C+CO");
    }

    #[test]
    fn test_round_trip() {
        let loc = Location::new("Saint-Étienne & co", 45.4397, 4.3872);
        let parsed = location_from_query(&share_query(&loc)).unwrap();
        assert_eq!(parsed, loc);
    }

    #[test]
    fn test_requires_both_coordinates() {
        assert!(location_from_query("lat=40.0").is_none());
        assert!(location_from_query("?lon=-105&name=x").is_none());
        assert!(location_from_query("lat=abc&lon=1").is_none());
        assert!(location_from_query("lat=NaN&lon=1").is_none());
    }

    #[test]
    fn test_missing_name_uses_coordinates() {
        let loc = location_from_query("?lat=40&lon=-105").unwrap();
        assert_eq!(loc.name, "40.0000, -105.0000");
    }

    #[test]
    fn test_query_wins_over_history() {
        let history = vec![Location::new("Recent", 1.0, 2.0)];
        let chosen = initial_location(Some("lat=3&lon=4&name=Linked"), &history).unwrap();
        assert_eq!(chosen.name, "Linked");

        let chosen = initial_location(Some("foo=bar"), &history).unwrap();
        assert_eq!(chosen.name, "Recent");

        assert!(initial_location(None, &[]).is_none());
    }
}
