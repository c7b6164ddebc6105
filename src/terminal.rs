//! Terminal rendering of forecast results.

use std::io::Write;

use meteogram_forecast::{ForecastResult, Location, RenderAdapter, SegmentOutcome};

const NOT_AVAILABLE: &str = "Forecast not available";

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(text).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write> RenderAdapter for TerminalRenderer<W> {
    fn begin(&mut self, location: &Location) {
        self.emit(format_args!("Forecast for: {}\n", location.name));
    }

    fn segment(&mut self, outcome: &SegmentOutcome) {
        let label = &outcome.segment.label;
        match &outcome.result {
            ForecastResult::Image { image_url } => {
                self.emit(format_args!("  {:<14} {}\n", label, image_url));
            }
            ForecastResult::UpstreamError => {
                self.emit(format_args!(
                    "  {:<14} {} (forecast service error)\n  {:<14} open {}\n",
                    label, NOT_AVAILABLE, "", outcome.segment.url
                ));
            }
            ForecastResult::NotAvailable => {
                self.emit(format_args!("  {:<14} {}\n", label, NOT_AVAILABLE));
            }
        }
    }
}

/// One line per location, numbered from 1, with the active one starred.
pub fn format_locations(locations: &[Location], active: Option<&Location>) -> String {
    locations
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let marker = if active.is_some_and(|a| a.same_place(location)) {
                '*'
            } else {
                ' '
            };
            format!(
                "{}{:>2}. {} ({:.4}, {:.4})\n",
                marker,
                i + 1,
                location.name,
                location.lat,
                location.lon
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteogram_forecast::ForecastSegment;

    fn outcome(label: &str, result: ForecastResult) -> SegmentOutcome {
        SegmentOutcome {
            segment: ForecastSegment {
                label: label.to_string(),
                url: "https://forecast.weather.gov/MapClick.php?AheadHour=0".to_string(),
                hour_offset: 0,
            },
            result,
        }
    }

    fn rendered(outcomes: &[SegmentOutcome]) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.begin(&Location::new("Boulder", 40.015, -105.2705));
        for o in outcomes {
            renderer.segment(o);
        }
        renderer.finish();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_image_segment_prints_url() {
        let text = rendered(&[outcome(
            "0-48 hours",
            ForecastResult::Image {
                image_url: "https://forecast.weather.gov/meteograms/Plotter.php?a=1".to_string(),
            },
        )]);
        assert!(text.starts_with("Forecast for: Boulder\n"));
        assert!(text.contains("0-48 hours"));
        assert!(text.contains("meteograms/Plotter.php?a=1"));
    }

    #[test]
    fn test_upstream_error_links_page() {
        let text = rendered(&[outcome("48-96 hours", ForecastResult::UpstreamError)]);
        assert!(text.contains(NOT_AVAILABLE));
        assert!(text.contains("open https://forecast.weather.gov/MapClick.php?AheadHour=0"));
    }

    #[test]
    fn test_not_available_has_no_link() {
        let text = rendered(&[outcome("96-144 hours", ForecastResult::NotAvailable)]);
        assert!(text.contains(NOT_AVAILABLE));
        assert!(!text.contains("open "));
    }

    #[test]
    fn test_format_locations_marks_active() {
        let list = vec![
            Location::new("Boulder", 40.015, -105.2705),
            Location::new("Denver", 39.7392, -104.9903),
        ];
        let text = format_locations(&list, Some(&list[1]));
        assert_eq!(
            text,
            "  1. Boulder (40.0150, -105.2705)\n* 2. Denver (39.7392, -104.9903)\n"
        );
    }
}
