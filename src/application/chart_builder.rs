// Chart builder - turns a sample batch into axes, traces and a range selector
use crate::domain::chart::{
    Axis, AxisRange, AxisSide, Chart, FillMode, LineShape, RangePreset, RangeSelector, ScaleType,
    Trace, TracePoint, TraceStyle,
};
use crate::domain::telemetry::{Channel, SampleSet};
use chrono::{DateTime, Utc};

pub const TIME_AXIS_ID: &str = "time";

/// External drawing primitive. The builder never inspects its output.
pub trait ChartRenderer: Send + Sync {
    type Output;

    fn render(&self, chart: &Chart) -> Self::Output;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartBuilder {
    default_range: RangePreset,
}

impl ChartBuilder {
    pub fn new(default_range: RangePreset) -> Self {
        Self { default_range }
    }

    /// Axes follow the channel set even when there are no samples; traces
    /// exist only for non-empty batches.
    pub fn build(&self, data: &SampleSet, now: DateTime<Utc>) -> Chart {
        let channels = data.channels.channels();

        let mut axes = vec![Axis {
            id: TIME_AXIS_ID.to_string(),
            title: "Time".to_string(),
            side: AxisSide::Bottom,
            scale: ScaleType::Time,
            range: AxisRange::Auto,
            overlay: false,
        }];
        axes.extend(channels.iter().map(|&channel| value_axis(channel)));

        let traces = if data.is_empty() {
            Vec::new()
        } else {
            channels
                .iter()
                .map(|&channel| Trace {
                    id: channel.id().to_string(),
                    name: channel.label().to_string(),
                    axis_id: channel.id().to_string(),
                    points: data
                        .samples
                        .iter()
                        .filter_map(|s| {
                            channel.value(s).map(|y| TracePoint {
                                x: s.timestamp_ms,
                                y,
                            })
                        })
                        .collect(),
                    style: trace_style(channel),
                })
                .collect()
        };

        Chart {
            axes,
            traces,
            range_selector: RangeSelector::at(now, self.default_range),
        }
    }

    pub fn render<R>(&self, data: &SampleSet, now: DateTime<Utc>, renderer: &R) -> R::Output
    where
        R: ChartRenderer + ?Sized,
    {
        let chart = self.build(data, now);
        tracing::debug!(
            axes = chart.axes.len(),
            traces = chart.traces.len(),
            "Rendering chart"
        );
        renderer.render(&chart)
    }
}

fn value_axis(channel: Channel) -> Axis {
    let (side, overlay) = match channel {
        Channel::Moisture => (AxisSide::Left, false),
        Channel::Pump => (AxisSide::Right, true),
        Channel::Humidity => (AxisSide::Left, true),
        Channel::Temperature => (AxisSide::Right, true),
    };
    // The pump is on/off; its scale never follows the data.
    let range = match channel {
        Channel::Pump => AxisRange::Fixed { min: 0.0, max: 1.0 },
        _ => AxisRange::Auto,
    };
    Axis {
        id: channel.id().to_string(),
        title: channel.label().to_string(),
        side,
        scale: ScaleType::Linear,
        range,
        overlay,
    }
}

fn trace_style(channel: Channel) -> TraceStyle {
    match channel {
        Channel::Moisture => line_style("rgb(54, 162, 235)"),
        Channel::Pump => TraceStyle {
            color: "rgb(255, 99, 132)".to_string(),
            fill: FillMode::ToBaseline {
                color: "rgba(255, 99, 132, 0.2)".to_string(),
            },
            line_shape: LineShape::Step,
        },
        Channel::Humidity => line_style("rgb(75, 192, 192)"),
        Channel::Temperature => line_style("rgb(255, 159, 64)"),
    }
}

fn line_style(color: &str) -> TraceStyle {
    TraceStyle {
        color: color.to_string(),
        fill: FillMode::None,
        line_shape: LineShape::Linear,
    }
}
