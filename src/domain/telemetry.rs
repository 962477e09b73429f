// Telemetry domain models - samples decoded from the device history log
use serde::Serialize;

/// Plotted quantities, in log column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Moisture,
    Pump,
    Humidity,
    Temperature,
}

impl Channel {
    pub fn id(self) -> &'static str {
        match self {
            Self::Moisture => "moisture",
            Self::Pump => "pump",
            Self::Humidity => "humidity",
            Self::Temperature => "temperature",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Moisture => "Soil moisture",
            Self::Pump => "Pump",
            Self::Humidity => "Humidity",
            Self::Temperature => "Temperature",
        }
    }

    pub fn value(self, sample: &Sample) -> Option<f64> {
        match self {
            Self::Moisture => Some(sample.moisture),
            Self::Pump => Some(f64::from(sample.pump)),
            Self::Humidity => sample.humidity,
            Self::Temperature => sample.temperature,
        }
    }
}

/// Optional channels carried by one log. Decided once from the width of the
/// first row and applied to every sample of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChannelSet {
    pub humidity: bool,
    pub temperature: bool,
}

impl ChannelSet {
    /// timestamp, moisture, pump
    pub const BASE_WIDTH: usize = 3;

    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            3 => Some(Self::default()),
            4 => Some(Self {
                humidity: true,
                temperature: false,
            }),
            5 => Some(Self {
                humidity: true,
                temperature: true,
            }),
            _ => None,
        }
    }

    pub fn width(&self) -> usize {
        Self::BASE_WIDTH + usize::from(self.humidity) + usize::from(self.temperature)
    }

    pub fn carries(&self, channel: Channel) -> bool {
        match channel {
            Channel::Moisture | Channel::Pump => true,
            Channel::Humidity => self.humidity,
            Channel::Temperature => self.temperature,
        }
    }

    /// Stop plotting an optional channel. Moisture and pump always stay.
    pub fn drop_channel(&mut self, channel: Channel) {
        match channel {
            Channel::Humidity => self.humidity = false,
            Channel::Temperature => self.temperature = false,
            Channel::Moisture | Channel::Pump => {}
        }
    }

    pub fn channels(&self) -> Vec<Channel> {
        let mut channels = vec![Channel::Moisture, Channel::Pump];
        if self.humidity {
            channels.push(Channel::Humidity);
        }
        if self.temperature {
            channels.push(Channel::Temperature);
        }
        channels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub moisture: f64,
    pub pump: u8,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
}

impl Sample {
    /// Keep only the optional readings `channels` carries.
    pub fn restrict_to(&mut self, channels: ChannelSet) {
        if !channels.humidity {
            self.humidity = None;
        }
        if !channels.temperature {
            self.temperature = None;
        }
    }
}

/// One full load of the history log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSet {
    pub channels: ChannelSet,
    pub samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new(channels: ChannelSet, samples: Vec<Sample>) -> Self {
        Self { channels, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_set_from_width() {
        assert_eq!(ChannelSet::from_width(3), Some(ChannelSet::default()));
        assert_eq!(
            ChannelSet::from_width(5).map(|set| set.channels()),
            Some(vec![
                Channel::Moisture,
                Channel::Pump,
                Channel::Humidity,
                Channel::Temperature
            ])
        );
        assert_eq!(ChannelSet::from_width(2), None);
        assert_eq!(ChannelSet::from_width(6), None);
    }

    #[test]
    fn test_width_round_trips_through_channel_set() {
        for width in 3..=5 {
            assert_eq!(ChannelSet::from_width(width).unwrap().width(), width);
        }
    }

    #[test]
    fn test_dropping_a_channel_keeps_moisture_and_pump() {
        let mut set = ChannelSet::from_width(5).unwrap();
        set.drop_channel(Channel::Humidity);
        set.drop_channel(Channel::Moisture);
        assert_eq!(
            set.channels(),
            vec![Channel::Moisture, Channel::Pump, Channel::Temperature]
        );
        assert!(!set.carries(Channel::Humidity));
        // The row layout is unchanged by what is plotted.
        assert_eq!(ChannelSet::from_width(5).unwrap().width(), 5);
    }

    #[test]
    fn test_channel_value_reads_optional_fields() {
        let sample = Sample {
            timestamp_ms: 0,
            moisture: 512.0,
            pump: 1,
            humidity: None,
            temperature: Some(21.5),
        };
        assert_eq!(Channel::Pump.value(&sample), Some(1.0));
        assert_eq!(Channel::Humidity.value(&sample), None);
        assert_eq!(Channel::Temperature.value(&sample), Some(21.5));
    }
}
