// Renders the chart model as a Plotly figure
use crate::application::chart_builder::ChartRenderer;
use crate::domain::chart::{
    Axis, AxisRange, AxisSide, Chart, FillMode, LineShape, RangeSelector, ScaleType, Trace,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Horizontal room taken by each extra value axis on one side of the plot,
/// as a fraction of the figure width.
const AXIS_OFFSET: f64 = 0.08;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyRenderer;

impl ChartRenderer for PlotlyRenderer {
    type Output = Value;

    fn render(&self, chart: &Chart) -> Value {
        // Plotly names value axes y, y2, y3... in declaration order.
        let refs: HashMap<&str, String> = chart
            .axes
            .iter()
            .filter(|a| a.scale != ScaleType::Time)
            .enumerate()
            .map(|(i, a)| {
                let r = if i == 0 {
                    "y".to_string()
                } else {
                    format!("y{}", i + 1)
                };
                (a.id.as_str(), r)
            })
            .collect();

        let data: Vec<Value> = chart
            .traces
            .iter()
            .map(|t| trace_json(t, refs.get(t.axis_id.as_str()).map_or("y", String::as_str)))
            .collect();

        // The first axis on each side sits against the plot; later ones are
        // pushed outward and the plot area shrinks to make room.
        let extra = |side: AxisSide| {
            let n = chart
                .axes
                .iter()
                .filter(|a| a.scale != ScaleType::Time && a.side == side)
                .count();
            n.saturating_sub(1) as f64
        };
        let domain = [
            extra(AxisSide::Left) * AXIS_OFFSET,
            1.0 - extra(AxisSide::Right) * AXIS_OFFSET,
        ];

        let mut layout = Map::new();
        layout.insert("showlegend".to_string(), json!(true));
        let mut seen: HashMap<AxisSide, usize> = HashMap::new();
        for axis in &chart.axes {
            if axis.scale == ScaleType::Time {
                let mut x = time_axis_json(axis, &chart.range_selector);
                x["domain"] = json!(domain);
                layout.insert("xaxis".to_string(), x);
            } else if let Some(r) = refs.get(axis.id.as_str()) {
                let slot = seen.entry(axis.side).or_default();
                let position = match (*slot, axis.side) {
                    (0, _) => None,
                    (k, AxisSide::Right) => Some((domain[1] + k as f64 * AXIS_OFFSET).min(1.0)),
                    (k, _) => Some((domain[0] - k as f64 * AXIS_OFFSET).max(0.0)),
                };
                *slot += 1;
                layout.insert(format!("yaxis{}", &r[1..]), value_axis_json(axis, position));
            }
        }
        layout.insert(
            "updatemenus".to_string(),
            json!([range_buttons(&chart.range_selector)]),
        );

        json!({ "data": data, "layout": Value::Object(layout) })
    }
}

fn trace_json(trace: &Trace, axis_ref: &str) -> Value {
    let shape = match trace.style.line_shape {
        LineShape::Linear => "linear",
        LineShape::Step => "hv",
    };
    let mut value = json!({
        "type": "scatter",
        "mode": "lines",
        "name": trace.name,
        "x": trace.points.iter().map(|p| p.x).collect::<Vec<_>>(),
        "y": trace.points.iter().map(|p| p.y).collect::<Vec<_>>(),
        "yaxis": axis_ref,
        "line": { "color": trace.style.color, "shape": shape },
    });
    if let FillMode::ToBaseline { color } = &trace.style.fill {
        value["fill"] = json!("tozeroy");
        value["fillcolor"] = json!(color);
    }
    value
}

fn time_axis_json(axis: &Axis, selector: &RangeSelector) -> Value {
    let mut value = json!({
        "type": "date",
        "title": { "text": axis.title },
        "rangeslider": { "visible": selector.slider },
    });
    match selector.active_window().and_then(|w| w.bounds) {
        Some((start, end)) => value["range"] = json!([start, end]),
        None => value["autorange"] = json!(true),
    }
    value
}

fn value_axis_json(axis: &Axis, position: Option<f64>) -> Value {
    let side = match axis.side {
        AxisSide::Right => "right",
        _ => "left",
    };
    let mut value = json!({
        "type": "linear",
        "title": { "text": axis.title },
        "side": side,
    });
    match axis.range {
        AxisRange::Fixed { min, max } => value["range"] = json!([min, max]),
        AxisRange::Auto => value["autorange"] = json!(true),
    }
    if axis.overlay {
        value["overlaying"] = json!("y");
    }
    if let Some(position) = position {
        value["anchor"] = json!("free");
        value["position"] = json!(position);
    }
    value
}

fn range_buttons(selector: &RangeSelector) -> Value {
    let active = selector
        .windows
        .iter()
        .position(|w| w.preset == selector.active)
        .unwrap_or(0);
    let buttons: Vec<Value> = selector
        .windows
        .iter()
        .map(|w| {
            let args = match w.bounds {
                Some((start, end)) => json!({ "xaxis.range": [start, end] }),
                None => json!({ "xaxis.autorange": true }),
            };
            json!({ "label": w.label, "method": "relayout", "args": [args] })
        })
        .collect();
    json!({
        "type": "buttons",
        "direction": "right",
        "active": active,
        "buttons": buttons,
    })
}
