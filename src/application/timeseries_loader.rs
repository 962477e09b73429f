// Time-series loader - fetches the device history log and decodes it
use crate::application::device_gateway::DeviceGateway;
use crate::domain::command::{CommandRequest, DATA_LOG_ENDPOINT};
use crate::domain::error::DashboardError;
use crate::domain::telemetry::{Channel, ChannelSet, Sample, SampleSet};
use std::sync::Arc;

/// A decoded log. `issue` holds the first malformed-log error; `set` holds
/// what could still be plotted despite it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub set: SampleSet,
    pub issue: Option<DashboardError>,
}

#[derive(Clone)]
pub struct TimeSeriesLoader {
    gateway: Arc<dyn DeviceGateway>,
}

impl TimeSeriesLoader {
    pub fn new(gateway: Arc<dyn DeviceGateway>) -> Self {
        Self { gateway }
    }

    /// Only transport failures are errors here; a malformed log comes back
    /// as a `DecodedLog` with its `issue` set.
    pub async fn load(&self) -> Result<DecodedLog, DashboardError> {
        let body = self
            .gateway
            .send(&CommandRequest::new(DATA_LOG_ENDPOINT))
            .await?;
        let decoded = decode_log(&body);

        tracing::debug!(
            samples = decoded.set.len(),
            humidity = decoded.set.channels.humidity,
            temperature = decoded.set.channels.temperature,
            malformed = decoded.issue.is_some(),
            "Decoded history log"
        );

        Ok(decoded)
    }
}

/// Strict decode: any malformed row fails the whole batch.
#[cfg(test)]
pub fn parse_log(text: &str) -> Result<SampleSet, DashboardError> {
    let decoded = decode_log(text);
    match decoded.issue {
        Some(e) => Err(e),
        None => Ok(decoded.set),
    }
}

/// Decode the comma-separated history log.
///
/// The width of the first row fixes the row layout for the whole batch.
/// Every value is checked strictly and the first failure is reported as
/// `MalformedLog`, but only the affected part is dropped:
/// - a bad humidity or temperature value drops that channel from the batch;
/// - a bad timestamp, moisture or pump value, or a row of another width,
///   ends the batch at that row, keeping the rows before it.
pub fn decode_log(text: &str) -> DecodedLog {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut layout: Option<ChannelSet> = None;
    let mut plotted = ChannelSet::default();
    let mut samples = Vec::new();
    let mut issue = None;

    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 1);
                issue.get_or_insert(DashboardError::malformed_log(line, e.to_string()));
                break;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        match layout {
            Some(set) if record.len() != set.width() => {
                issue.get_or_insert(DashboardError::malformed_log(
                    line,
                    format!("expected {} fields, found {}", set.width(), record.len()),
                ));
                break;
            }
            Some(_) => {}
            None => match ChannelSet::from_width(record.len()) {
                Some(set) => {
                    layout = Some(set);
                    plotted = set;
                }
                None => {
                    issue.get_or_insert(DashboardError::malformed_log(
                        line,
                        format!("unsupported column count {}", record.len()),
                    ));
                    break;
                }
            },
        }

        let mut sample = match parse_required(&record, line) {
            Ok(sample) => sample,
            Err(e) => {
                issue.get_or_insert(e);
                break;
            }
        };

        for (channel, column) in [(Channel::Humidity, 3), (Channel::Temperature, 4)] {
            if !plotted.carries(channel) {
                continue;
            }
            let raw = record.get(column).unwrap_or_default();
            match parse_number(raw, channel.id(), line) {
                Ok(value) => match channel {
                    Channel::Humidity => sample.humidity = Some(value),
                    _ => sample.temperature = Some(value),
                },
                Err(e) => {
                    tracing::warn!(error = %e, channel = channel.id(), "Dropping log channel");
                    plotted.drop_channel(channel);
                    issue.get_or_insert(e);
                }
            }
        }

        samples.push(sample);
    }

    for sample in &mut samples {
        sample.restrict_to(plotted);
    }

    DecodedLog {
        set: SampleSet::new(plotted, samples),
        issue,
    }
}

/// Timestamp, moisture and pump; the optional columns are read separately.
fn parse_required(record: &csv::StringRecord, line: usize) -> Result<Sample, DashboardError> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let seconds: i64 = field(0).parse().map_err(|_| {
        DashboardError::malformed_log(line, format!("invalid timestamp {:?}", field(0)))
    })?;
    let timestamp_ms = seconds
        .checked_mul(1000)
        .ok_or_else(|| DashboardError::malformed_log(line, "timestamp out of range"))?;

    let moisture = parse_number(field(1), "moisture", line)?;
    let pump = match parse_number(field(2), "pump", line)? {
        v if v == 0.0 => 0,
        v if v == 1.0 => 1,
        v => {
            return Err(DashboardError::malformed_log(
                line,
                format!("pump state must be 0 or 1, found {v}"),
            ));
        }
    };

    Ok(Sample {
        timestamp_ms,
        moisture,
        pump,
        humidity: None,
        temperature: None,
    })
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64, DashboardError> {
    // Rust accepts "NaN" and "inf"; the device never writes them.
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DashboardError::malformed_log(
            line,
            format!("{column} is not a number: {raw:?}"),
        )),
    }
}
