//! # Terminal Report Rendering
//!
//! Plain-text rendering of an [`Assessment`] for the CLI. The layout is meant
//! for a narrow terminal on a boat: headline index first, then the rig, the
//! seat diagram and the next few hours.
//!
//! ## Seat Diagram
//! The boat is drawn bow-up as a two-column grid (port / starboard) with three
//! rows (bow, midship, stern). Highlighted seats are wrapped in `>` `<`; a
//! centerline pick lights up both corner seats at that end.

use crate::advisor::Assessment;
use crate::forecast::ForecastEntry;
use crate::seat::Seat;
use crate::strategy::ColorFinish;
use crate::{normalize_degrees, TideState};

const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const CELL_WIDTH: usize = 10;

/// 16-point compass name for a bearing.
pub fn cardinal(deg: f64) -> &'static str {
    let index = ((normalize_degrees(deg) + 11.25) / 22.5).floor() as usize;
    CARDINALS[index % CARDINALS.len()]
}

/// Format a current speed with one decimal, e.g. `3.4 kt`.
fn format_knots(knots: f64) -> String {
    format!("{:.1} kt", knots)
}

/// Short description of a tide reading, including its provenance.
pub fn describe_tide(tide: &TideState, tide_direction_deg: u16) -> String {
    let body = if tide.is_slack() {
        format!("Slack water {}", format_knots(tide.speed_knots()))
    } else {
        let phase = if tide.is_rising() { "Flood" } else { "Ebb" };
        format!(
            "{} {} toward {}",
            phase,
            format_knots(tide.speed_knots()),
            cardinal(tide_direction_deg as f64)
        )
    };

    match tide {
        TideState::Authoritative {
            direction_label, ..
        } => format!("{} (official table: {})", body, direction_label),
        TideState::Estimated { lunar_age, .. } => {
            format!("{} (estimated, moon age {:.1})", body, lunar_age)
        }
    }
}

/// Render the full report.
pub fn render_text(assessment: &Assessment) -> String {
    let mut lines = Vec::new();
    let env = &assessment.environment;
    let rec = &assessment.strategy;

    lines.push(format!(
        "TIDE TACKLE  {}  {}",
        assessment.station.display_name,
        assessment.evaluated_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "Position {:.3}, {:.3} ({:.1} km from station)",
        assessment.position.latitude, assessment.position.longitude, assessment.distance_km
    ));
    if assessment.is_remote {
        lines.push("⚠ Far from the station: tide values are for reference only".to_string());
    }
    lines.push(String::new());

    lines.push(format!(
        "Index {}/10  {}",
        assessment.condition.value, assessment.condition.comment
    ));
    lines.push(format!(
        "Tide   {}",
        describe_tide(&assessment.tide, rec.tide_direction_deg)
    ));
    lines.push(format!(
        "Wind   {:.1} m/s from {}{}",
        env.wind_speed_ms,
        cardinal(env.wind_direction_deg),
        if rec.is_synced { " (drifting with the current)" } else { "" }
    ));
    lines.push(format!(
        "Sea    {:.1} °C  cloud {:.0}%  rain {:.1} mm",
        env.sea_surface_temp_c, env.cloud_cover_pct, env.rain_mm
    ));
    lines.push(String::new());

    lines.push(format!("Rig ({} water)", assessment.depth));
    lines.push(format!("  Weight    {} g", rec.weight_grams));
    lines.push(format!("  Tie       {}", rec.tie_shape.label()));
    lines.push(format!(
        "  Color     {}{}",
        rec.tie_color.label(),
        finish_suffix(rec.color_finish)
    ));
    lines.push(format!(
        "  Retrieve  {}, {}",
        rec.retrieve_speed.label(),
        rec.tactic.label()
    ));
    lines.push(format!(
        "  Weights   {}",
        assessment
            .weight_chart
            .iter()
            .map(|w| format!("{} {} g", w.depth, w.weight_grams))
            .collect::<Vec<_>>()
            .join(" | ")
    ));
    lines.push(String::new());

    lines.push(format!("Best seat: {}", assessment.seat));
    lines.extend(seat_diagram(&assessment.highlighted_seats));

    if !assessment.forecast.is_empty() {
        lines.push(String::new());
        lines.push("Next hours".to_string());
        lines.extend(assessment.forecast.iter().map(forecast_line));
    }

    lines.join("\n")
}

fn finish_suffix(finish: ColorFinish) -> &'static str {
    match finish {
        ColorFinish::Standard => "",
        ColorFinish::Reflective => " + gold/glow flake",
        ColorFinish::Translucent => " + translucent body",
    }
}

/// Bow-up seat grid with highlighted cells marked.
pub fn seat_diagram(highlighted: &[Seat]) -> Vec<String> {
    let cell = |seat: Seat, text: &str| {
        if highlighted.contains(&seat) {
            format!(">{:^width$}<", text, width = CELL_WIDTH)
        } else {
            format!(" {:^width$} ", text, width = CELL_WIDTH)
        }
    };
    let end = |seat: Seat, text: &str| {
        let mark = if highlighted.contains(&seat) { "*" } else { " " };
        format!("{:^width$}", format!("{mark}{text}{mark}"), width = CELL_WIDTH * 2 + 4)
    };

    vec![
        end(Seat::BowCenter, "BOW"),
        format!("{}{}", cell(Seat::BowLeft, "port bow"), cell(Seat::BowRight, "stbd bow")),
        format!(
            "{}{}",
            cell(Seat::LeftMidship, "port mid"),
            cell(Seat::RightMidship, "stbd mid")
        ),
        format!("{}{}", cell(Seat::SternLeft, "port aft"), cell(Seat::SternRight, "stbd aft")),
        end(Seat::SternCenter, "STERN"),
    ]
}

fn forecast_line(entry: &ForecastEntry) -> String {
    let day = if entry.is_next_day { "+1d " } else { "    " };
    let weather = if entry.weather_available {
        format!(
            "{:<6} {:>3} {:>4.1} m/s",
            entry.sky.label(),
            cardinal(entry.environment.wind_direction_deg),
            entry.environment.wind_speed_ms
        )
    } else {
        format!("{:<19}", "- - -")
    };

    format!(
        "  {}{}  {}  {}  idx {}",
        day,
        entry.timestamp.format("%H:00"),
        weather,
        describe_tide(&entry.tide, entry.strategy.tide_direction_deg),
        entry.condition.value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_points() {
        assert_eq!(cardinal(0.0), "N");
        assert_eq!(cardinal(11.24), "N");
        assert_eq!(cardinal(11.25), "NNE");
        assert_eq!(cardinal(100.0), "E");
        assert_eq!(cardinal(280.0), "W");
        assert_eq!(cardinal(350.0), "N");
        assert_eq!(cardinal(-90.0), "W");
        assert_eq!(cardinal(225.0), "SW");
    }

    #[test]
    fn slack_water_is_called_out() {
        let slack = TideState::Authoritative {
            speed_knots: 0.2,
            direction_label: "転流".into(),
            is_rising: false,
        };
        let text = describe_tide(&slack, 100);
        assert!(text.starts_with("Slack water 0.2 kt"));
        assert!(text.contains("official table"));
    }

    #[test]
    fn estimated_tide_shows_moon_age() {
        let est = TideState::Estimated {
            factor: 0.8,
            speed_knots: 4.4,
            is_rising: true,
            lunar_age: 12.6,
        };
        assert_eq!(
            describe_tide(&est, 280),
            "Flood 4.4 kt toward W (estimated, moon age 12.6)"
        );
    }

    #[test]
    fn diagram_marks_centerline_corners() {
        let lines = seat_diagram(&Seat::BowCenter.highlighted());
        assert!(lines[0].contains("*BOW*"));
        assert_eq!(lines[1].matches('>').count(), 2);
        assert!(!lines[2].contains('>'));
        assert!(lines[4].contains(" STERN "));
    }

    #[test]
    fn diagram_marks_single_side_seat() {
        let lines = seat_diagram(&[Seat::RightMidship]);
        assert!(lines[2].contains("> stbd mid <"));
        assert!(!lines[2].contains(">port"));
        assert!(!lines[0].contains('*'));
    }
}
