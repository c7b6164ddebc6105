//! Request URLs for the graphical forecast page.

/// Weather variables requested on every page, in the order the host expects.
const FORECAST_VARIABLES: &[(&str, &str)] = &[
    ("w0", "t"),        // temperature
    ("w1", "td"),       // dewpoint
    ("w2", "wc"),       // wind chill
    ("w3", "sfcwind"),  // surface wind
    ("w3u", "1"),
    ("w4", "sky"),      // sky cover
    ("w5", "pop"),      // precipitation probability
    ("w6", "rh"),       // relative humidity
    ("w7", "rain"),
    ("w8", "thunder"),
    ("w9", "snow"),
    ("w10", "fzg"),     // freezing rain
    ("w11", "sleet"),
    ("w13u", "0"),
    ("w14u", "1"),
    ("w15u", "1"),
];

const FORECAST_PAGE: &str = "MapClick.php";

/// Build the forecast page URL for a coordinate pair, `hours_ahead` into the future.
///
/// Coordinates are always written with exactly four decimals.
pub fn forecast_url(origin: &str, lat: f64, lon: f64, hours_ahead: u32) -> String {
    let hours = hours_ahead.to_string();
    let lat = format!("{:.4}", lat);
    let lon = format!("{:.4}", lon);

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(FORECAST_VARIABLES.iter().copied());
    query.extend_pairs([
        ("AheadHour", hours.as_str()),
        ("Submit", "Submit"),
        ("FcstType", "graphical"),
        ("textField1", lat.as_str()),
        ("textField2", lon.as_str()),
        ("site", "all"),
        ("unit", "0"),
        ("dd", ""),
        ("bw", ""),
    ]);

    format!(
        "{}/{}?{}",
        origin.trim_end_matches('/'),
        FORECAST_PAGE,
        query.finish()
    )
}

/// The current-conditions page (no hour offset).
pub fn forecast_url_now(origin: &str, lat: f64, lon: f64) -> String {
    forecast_url(origin, lat, lon, 0)
}
