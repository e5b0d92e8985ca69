//! Plotly figure documents, rendered as-is by the browser.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{quantity::power::Watts, store::Sample};

/// Keeps the user's pan and zoom across redraws as long as it stays the same.
const UI_REVISION: &str = "constant";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Metric {
    Consumption,
    FeedIn,
    NetUsage,
}

impl Metric {
    pub const ALL: [Self; 3] = [Self::Consumption, Self::FeedIn, Self::NetUsage];

    const fn name(self) -> &'static str {
        match self {
            Self::Consumption => "Consumption",
            Self::FeedIn => "Feed-in",
            Self::NetUsage => "Net usage",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Consumption => "Power consumption (W)",
            Self::FeedIn => "Feed-in (W)",
            Self::NetUsage => "Net grid usage (W)",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Consumption => "red",
            Self::FeedIn => "green",
            Self::NetUsage => "blue",
        }
    }

    const fn value(self, sample: &Sample) -> Watts {
        match self {
            Self::Consumption => sample.value.consumption,
            Self::FeedIn => sample.value.feed_in,
            Self::NetUsage => sample.value.net_usage,
        }
    }
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn single<'a>(metric: Metric, samples: impl IntoIterator<Item = &'a Sample>) -> Self {
        Self {
            data: vec![Trace::new(metric, samples)],
            layout: Layout::titled(metric.title()),
        }
    }

    pub fn combined(samples: &[&Sample]) -> Self {
        Self {
            data: Metric::ALL
                .into_iter()
                .map(|metric| Trace::new(metric, samples.iter().copied()))
                .collect(),
            layout: Layout {
                xaxis: Some(Axis { title: Title::new("Time") }),
                yaxis: Some(Axis { title: Title::new("Power (W)") }),
                legend: Some(Legend { orientation: "h", x: 0.5, xanchor: "center" }),
                ..Layout::titled("Consumption, feed-in and net usage")
            },
        }
    }
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Trace {
    pub x: Vec<DateTime<Local>>,
    pub y: Vec<Watts>,
    pub name: &'static str,
    pub line: Line,

    #[serde(rename = "type")]
    pub type_: &'static str,

    pub mode: &'static str,
}

impl Trace {
    fn new<'a>(metric: Metric, samples: impl IntoIterator<Item = &'a Sample>) -> Self {
        let (x, y) = samples.into_iter().map(|sample| (sample.time, metric.value(sample))).unzip();
        Self {
            x,
            y,
            name: metric.name(),
            line: Line { shape: "spline", color: metric.color() },
            type_: "scatter",
            mode: "lines",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Line {
    pub shape: &'static str,
    pub color: &'static str,
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Title,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,

    pub uirevision: &'static str,
}

impl Layout {
    fn titled(title: &'static str) -> Self {
        Self {
            title: Title::new(title),
            xaxis: None,
            yaxis: None,
            legend: None,
            uirevision: UI_REVISION,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: &'static str,
}

impl Title {
    const fn new(text: &'static str) -> Self {
        Self { text }
    }
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub x: f64,
    pub xanchor: &'static str,
}
