//! Declarative layout of the dashboard page.
//!
//! The browser page builds its charts and widgets from this description and
//! binds them to [`BoundSources`](crate::sources::BoundSources) by field name.

use dsg_core::{Controls, Dataset, SliderRange, ALL_STATIONS, EFFICIENCY_RANGE, SURFACE_RANGE};
use serde::Serialize;

use crate::sources::InstantSource;

/// The instantaneous chart initially shows 1/500th of the timeline.
const INITIAL_WINDOW_DIVISOR: f64 = 500.0;

const OBSERVED_COLOR: &str = "steelblue";
const PREDICTED_COLOR: &str = "crimson";
const PANEL_BACKGROUND: &str = "#efefef";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: String,
    pub map: MapFigure,
    pub instant: LineFigure,
    /// Overview chart carrying the range selector of `instant`.
    pub range_selector: LineFigure,
    pub cumulative: LineFigure,
    pub widgets: Widgets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFigure {
    pub title: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub width: u32,
    pub height: u32,
    pub tiles: String,
    pub tooltips: Vec<(String, String)>,
    pub color_mapper: ColorMapper,
    pub marker_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMapper {
    pub field: String,
    pub palette: String,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFigure {
    pub title: Option<String>,
    pub y_axis_label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Initially visible `[start, end]` in epoch milliseconds; `None` shows everything.
    pub x_window: Option<(i64, i64)>,
    pub lines: Vec<LineSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpec {
    pub field: String,
    pub color: String,
    pub legend: Option<String>,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widgets {
    pub station: SelectWidget,
    pub efficiency: SliderWidget,
    pub surface: SliderWidget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectWidget {
    pub title: String,
    pub value: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderWidget {
    pub title: String,
    pub value: f64,
    #[serde(flatten)]
    pub range: SliderRange,
}

fn line(field: &str, color: &str, legend: Option<&str>, line_width: f64) -> LineSpec {
    LineSpec {
        field: field.to_string(),
        color: color.to_string(),
        legend: legend.map(str::to_string),
        line_width,
    }
}

/// `[first, dates[round(n / 500)]]`, clamped to the last timestamp.
pub fn initial_window(dates: &[i64]) -> Option<(i64, i64)> {
    let first = *dates.first()?;
    // halves round to even: 250 samples -> index 0, 1250 -> index 2
    let idx = (dates.len() as f64 / INITIAL_WINDOW_DIVISOR).round_ties_even() as usize;
    let end = dates[idx.min(dates.len() - 1)];
    Some((first, end))
}

impl DashboardLayout {
    /// Describe the page for `dataset`, with widgets set to `controls` and the
    /// instantaneous chart zoomed on the start of `instant`.
    pub fn build(
        title: &str,
        dataset: &Dataset,
        controls: &Controls,
        instant: &InstantSource,
    ) -> Self {
        let map = MapFigure {
            title: "Distributed Solar Generation Predictor".to_string(),
            x_range: (18_350_000.0, 20_000_000.0),
            y_range: (-6_000_000.0, -4_000_000.0),
            width: 700,
            height: 900,
            tiles: "CARTODBPOSITRON".to_string(),
            tooltips: vec![
                ("City".to_string(), "@name".to_string()),
                ("Yearly Production GWh".to_string(), "@obs".to_string()),
            ],
            color_mapper: ColorMapper {
                field: "obs".to_string(),
                palette: "RdBu6".to_string(),
                low: 0.0,
                high: 500.0,
            },
            marker_size: 15.0,
        };

        let instant_figure = LineFigure {
            title: None,
            y_axis_label: Some("GW".to_string()),
            width: 900,
            height: 250,
            background: PANEL_BACKGROUND.to_string(),
            x_window: initial_window(&instant.date),
            lines: vec![
                line("obs", OBSERVED_COLOR, None, 1.0),
                line("pred", PREDICTED_COLOR, None, 1.0),
            ],
        };

        let range_selector = LineFigure {
            title: Some("Instant Solar Power Production (GW)".to_string()),
            y_axis_label: None,
            width: 900,
            height: 250,
            background: PANEL_BACKGROUND.to_string(),
            x_window: None,
            lines: vec![
                line("obs", OBSERVED_COLOR, Some("Measured"), 1.0),
                line("pred", PREDICTED_COLOR, Some("Predicted"), 1.0),
            ],
        };

        let cumulative = LineFigure {
            title: Some("Cumulative Solar Power Production (GWh)".to_string()),
            y_axis_label: Some("GWh".to_string()),
            width: 900,
            height: 250,
            background: PANEL_BACKGROUND.to_string(),
            x_window: None,
            lines: vec![
                line("cum_obs", OBSERVED_COLOR, None, 3.0),
                line("cum_pred", PREDICTED_COLOR, None, 3.0),
            ],
        };

        let options = std::iter::once(ALL_STATIONS.to_string())
            .chain(dataset.station_names().map(str::to_string))
            .collect();

        let widgets = Widgets {
            station: SelectWidget {
                title: "Solar Node:".to_string(),
                value: controls.station.to_string(),
                options,
            },
            efficiency: SliderWidget {
                title: "Efficiency Coefficient:".to_string(),
                value: controls.efficiency,
                range: EFFICIENCY_RANGE,
            },
            surface: SliderWidget {
                title: "Surface per inhabitant (m2):".to_string(),
                value: controls.surface,
                range: SURFACE_RANGE,
            },
        };

        Self {
            title: title.to_string(),
            map,
            instant: instant_figure,
            range_selector,
            cumulative,
            widgets,
        }
    }
}
