//! View types for chart template rendering.
//!
//! These carry pre-formatted strings and pixel positions so the template
//! only has to place them.

use std::collections::BTreeSet;

use ping_log::local_datetime;

use crate::timeline::{LogSummary, PlotMode, Timeline};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 48.0;
const X_TICKS: usize = 6;
const MAX_CODE_TICKS: usize = 8;

/// An axis tick: pixel position along its axis and its label.
pub struct Tick {
    pub pos: String,
    pub label: String,
}

pub struct ChartView {
    pub title: String,
    pub subtitle: String,
    pub y_label: &'static str,
    pub width: u32,
    pub height: u32,
    pub plot_left: String,
    pub plot_right: String,
    pub plot_top: String,
    pub plot_bottom: String,
    /// `x,y x,y ...` for the SVG polyline.
    pub polyline: String,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

impl ChartView {
    pub fn new(timeline: &Timeline, summary: &LogSummary) -> Self {
        let (t_min, t_max) = extent(timeline.points.iter().map(|p| p.0));
        let (y_min, y_max) = match timeline.mode {
            PlotMode::Uptime => (0.0, 1.0),
            PlotMode::Codes => {
                let (lo, hi) = extent(timeline.points.iter().map(|p| p.1));
                (lo - 10.0, hi + 10.0)
            }
        };

        let plot_right = WIDTH - MARGIN_RIGHT;
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;
        let x_of = |t: f64| MARGIN_LEFT + (t - t_min) / (t_max - t_min) * (plot_right - MARGIN_LEFT);
        let y_of = |v: f64| plot_bottom - (v - y_min) / (y_max - y_min) * (plot_bottom - MARGIN_TOP);

        let polyline = timeline
            .points
            .iter()
            .map(|&(t, v)| format!("{:.1},{:.1}", x_of(t), y_of(v)))
            .collect::<Vec<_>>()
            .join(" ");

        let x_ticks = (0..X_TICKS)
            .map(|i| {
                let t = t_min + (t_max - t_min) * i as f64 / (X_TICKS - 1) as f64;
                Tick {
                    pos: format!("{:.1}", x_of(t)),
                    label: time_of_day(t),
                }
            })
            .collect();

        let y_ticks = match timeline.mode {
            PlotMode::Uptime => vec![
                Tick {
                    pos: format!("{:.1}", y_of(0.0)),
                    label: "no".to_string(),
                },
                Tick {
                    pos: format!("{:.1}", y_of(1.0)),
                    label: "yes".to_string(),
                },
            ],
            PlotMode::Codes => code_ticks(timeline)
                .into_iter()
                .map(|code| Tick {
                    pos: format!("{:.1}", y_of(f64::from(code))),
                    label: code.to_string(),
                })
                .collect(),
        };

        let mut subtitle = format!(
            "{} samples, {:.1}% up",
            summary.samples, summary.uptime_pct
        );
        if timeline.filter_window > 0 && timeline.mode == PlotMode::Uptime {
            subtitle.push_str(&format!(", any-down filter ±{}", timeline.filter_window));
        }

        Self {
            title: format!("Error Codes for {}", summary.day),
            subtitle,
            y_label: match timeline.mode {
                PlotMode::Uptime => "Up?",
                PlotMode::Codes => "Code",
            },
            width: WIDTH as u32,
            height: HEIGHT as u32,
            plot_left: format!("{MARGIN_LEFT:.1}"),
            plot_right: format!("{plot_right:.1}"),
            plot_top: format!("{MARGIN_TOP:.1}"),
            plot_bottom: format!("{plot_bottom:.1}"),
            polyline,
            x_ticks,
            y_ticks,
        }
    }
}

/// Min and max, widened so the range is never empty.
fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if hi - lo < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// Distinct codes present, or an even spread if there are too many.
fn code_ticks(timeline: &Timeline) -> Vec<u16> {
    let distinct: BTreeSet<u16> = timeline.points.iter().map(|p| p.1 as u16).collect();
    if distinct.len() <= MAX_CODE_TICKS {
        return distinct.into_iter().collect();
    }
    let lo = *distinct.first().unwrap_or(&0);
    let hi = *distinct.last().unwrap_or(&0);
    (0..MAX_CODE_TICKS)
        .map(|i| lo + ((hi - lo) as usize * i / (MAX_CODE_TICKS - 1)) as u16)
        .collect()
}

/// `HH:MM` in local time.
fn time_of_day(timestamp: f64) -> String {
    local_datetime(timestamp)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
