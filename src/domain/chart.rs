// Chart domain models - axes, traces and the time-range selector
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Linear,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRange {
    Auto,
    Fixed { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub id: String,
    pub title: String,
    pub side: AxisSide,
    pub scale: ScaleType,
    pub range: AxisRange,
    /// Drawn on top of the primary value axis instead of beside it.
    pub overlay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    Linear,
    /// Value holds until the next point, then jumps.
    Step,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    None,
    ToBaseline { color: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStyle {
    pub color: String,
    pub fill: FillMode,
    pub line_shape: LineShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub id: String,
    pub name: String,
    pub axis_id: String,
    pub points: Vec<TracePoint>,
    pub style: TraceStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::Day,
        RangePreset::Week,
        RangePreset::Month,
        RangePreset::Year,
        RangePreset::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "last day",
            Self::Week => "last week",
            Self::Month => "last month",
            Self::Year => "last year",
            Self::All => "all",
        }
    }

    pub fn offset(self) -> Option<Duration> {
        match self {
            Self::Day => Some(Duration::days(1)),
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::Year => Some(Duration::days(365)),
            Self::All => None,
        }
    }

    pub fn window(self, now: DateTime<Utc>) -> RangeWindow {
        let end_ms = now.timestamp_millis();
        let bounds = self
            .offset()
            .map(|offset| ((now - offset).timestamp_millis(), end_ms));
        RangeWindow {
            preset: self,
            label: self.label().to_string(),
            bounds,
        }
    }
}

/// A preset resolved against the moment of rendering. `bounds` is `None`
/// for the unbounded preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeWindow {
    pub preset: RangePreset,
    pub label: String,
    pub bounds: Option<(i64, i64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSelector {
    pub windows: Vec<RangeWindow>,
    pub active: RangePreset,
    pub slider: bool,
}

impl RangeSelector {
    pub fn at(now: DateTime<Utc>, active: RangePreset) -> Self {
        Self {
            windows: RangePreset::ALL.iter().map(|p| p.window(now)).collect(),
            active,
            slider: true,
        }
    }

    pub fn active_window(&self) -> Option<&RangeWindow> {
        self.windows.iter().find(|w| w.preset == self.active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub axes: Vec<Axis>,
    pub traces: Vec<Trace>,
    pub range_selector: RangeSelector,
}

#[cfg(test)]
impl Chart {
    pub fn axis(&self, id: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.id == id)
    }

    pub fn trace(&self, id: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.id == id)
    }

    pub fn time_axis(&self) -> Option<&Axis> {
        self.axes.iter().find(|a| a.scale == ScaleType::Time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_preset_window_ends_now() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let window = RangePreset::Week.window(now);
        assert_eq!(
            window.bounds,
            Some((1_700_000_000_000 - 7 * 86_400_000, 1_700_000_000_000))
        );
        assert_eq!(RangePreset::All.window(now).bounds, None);
    }

    #[test]
    fn test_selector_defaults_to_day() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let selector = RangeSelector::at(now, RangePreset::default());
        assert_eq!(selector.windows.len(), 5);
        assert!(selector.slider);
        let active = selector.active_window().unwrap();
        assert_eq!(active.label, "last day");
        assert_eq!(
            active.bounds,
            Some((1_700_000_000_000 - 86_400_000, 1_700_000_000_000))
        );
    }

    #[test]
    fn test_preset_deserializes_from_config_value() {
        let preset: RangePreset = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(preset, RangePreset::Month);
    }
}
