// tenki_report - Daily weather forecast reports for Slack and Prometheus
//
// Copyright 2023 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::client::ForecastEntry;
use crate::normalize;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::AtomicU64;

const LABEL_CATEGORY: &str = "category";
const LABEL_EXPORTER: &str = "exporter";
const EXPORTER: &str = "tenki_report";

pub const CATEGORY_TEMPERATURE: &str = "temperature";
pub const CATEGORY_RAIN: &str = "rain";
pub const CATEGORY_WIND: &str = "wind";

type LabelSet = Vec<(String, String)>;

/// A single named observation derived from a forecast, ready to be pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub help: String,
    pub value: f64,
    pub labels: BTreeMap<String, String>,
}

/// One of the four six hour windows rain chances are forecast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainBucket {
    T00_06,
    T06_12,
    T12_18,
    T18_24,
}

/// Field of a forecast entry a metric reads its raw string from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    MinCelsius,
    MaxCelsius,
    MinFahrenheit,
    MaxFahrenheit,
    ChanceOfRain(RainBucket),
    Wind,
}

impl SourceField {
    fn read<'a>(&self, forecast: &'a ForecastEntry) -> &'a str {
        let temp = &forecast.temperature;
        let rain = &forecast.chance_of_rain;

        match self {
            Self::MinCelsius => temp.min.celsius.as_deref().unwrap_or(""),
            Self::MaxCelsius => temp.max.celsius.as_deref().unwrap_or(""),
            Self::MinFahrenheit => temp.min.fahrenheit.as_deref().unwrap_or(""),
            Self::MaxFahrenheit => temp.max.fahrenheit.as_deref().unwrap_or(""),
            Self::ChanceOfRain(RainBucket::T00_06) => &rain.t00_06,
            Self::ChanceOfRain(RainBucket::T06_12) => &rain.t06_12,
            Self::ChanceOfRain(RainBucket::T12_18) => &rain.t12_18,
            Self::ChanceOfRain(RainBucket::T18_24) => &rain.t18_24,
            Self::Wind => forecast.detail.wind.as_deref().unwrap_or(""),
        }
    }
}

/// How the raw string of a field is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// First embedded number, e.g. `"30"` or `"-2.5"`.
    Number,
    /// Percentage between 0 and 100, e.g. `"70%"` gives `70`.
    Percent,
    /// Percentage as a fraction between 0 and 1, e.g. `"70%"` gives `0.7`.
    Fraction,
    /// First run of digits in free text, e.g. `"5m/s"` gives `5`.
    DigitRun,
}

impl Transform {
    fn apply(&self, raw: &str) -> f64 {
        match self {
            Self::Number => normalize::parse_number(raw),
            Self::Percent => normalize::parse_percent(raw),
            Self::Fraction => normalize::parse_percent(raw) / 100.0,
            Self::DigitRun => normalize::parse_digit_run(raw),
        }
    }
}

/// Declaration of a metric to extract from a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    pub name: String,
    pub help: String,
    pub category: String,
    pub field: SourceField,
    pub transform: Transform,
}

impl MetricSpec {
    pub fn new<N, H, C>(name: N, help: H, category: C, field: SourceField, transform: Transform) -> Self
    where
        N: Into<String>,
        H: Into<String>,
        C: Into<String>,
    {
        MetricSpec {
            name: name.into(),
            help: help.into(),
            category: category.into(),
            field,
            transform,
        }
    }
}

/// Builds a fixed batch of samples from a forecast based on a list of `MetricSpec`.
///
/// Each spec is evaluated on its own. A value that can't be parsed results in a
/// sample with a value of zero and never prevents other samples from being emitted.
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    specs: Vec<MetricSpec>,
}

impl MetricExtractor {
    pub fn new(specs: Vec<MetricSpec>) -> Self {
        MetricExtractor { specs }
    }

    /// Temperatures, rain chances for each window as a fraction, and wind speed.
    pub fn full() -> Self {
        let mut specs = Self::temperature_specs();
        specs.extend([
            Self::rain_spec("tenki_chance_of_rain_00_06", "00:00 to 06:00", RainBucket::T00_06),
            Self::rain_spec("tenki_chance_of_rain_06_12", "06:00 to 12:00", RainBucket::T06_12),
            Self::rain_spec("tenki_chance_of_rain_12_18", "12:00 to 18:00", RainBucket::T12_18),
            Self::rain_spec("tenki_chance_of_rain_18_24", "18:00 to 24:00", RainBucket::T18_24),
            MetricSpec::new(
                "tenki_wind_speed",
                "Wind speed mentioned in the forecast for today",
                CATEGORY_WIND,
                SourceField::Wind,
                Transform::DigitRun,
            ),
        ]);

        Self::new(specs)
    }

    /// Only the minimum and maximum temperatures.
    pub fn basic() -> Self {
        Self::new(Self::temperature_specs())
    }

    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    pub fn extract(&self, forecast: &ForecastEntry) -> Vec<MetricSample> {
        self.specs
            .iter()
            .map(|spec| {
                let raw = spec.field.read(forecast);
                let value = spec.transform.apply(raw);
                tracing::trace!(message = "extracted metric", name = %spec.name, raw = %raw, value = value);

                let mut labels = BTreeMap::new();
                labels.insert(LABEL_CATEGORY.to_owned(), spec.category.clone());
                labels.insert(LABEL_EXPORTER.to_owned(), EXPORTER.to_owned());

                MetricSample {
                    name: spec.name.clone(),
                    help: spec.help.clone(),
                    value,
                    labels,
                }
            })
            .collect()
    }

    fn temperature_specs() -> Vec<MetricSpec> {
        vec![
            MetricSpec::new(
                "tenki_temperature_max_celsius",
                "Maximum temperature forecast for today in celsius",
                CATEGORY_TEMPERATURE,
                SourceField::MaxCelsius,
                Transform::Number,
            ),
            MetricSpec::new(
                "tenki_temperature_min_celsius",
                "Minimum temperature forecast for today in celsius",
                CATEGORY_TEMPERATURE,
                SourceField::MinCelsius,
                Transform::Number,
            ),
        ]
    }

    fn rain_spec(name: &str, window: &str, bucket: RainBucket) -> MetricSpec {
        MetricSpec::new(
            name,
            format!("Chance of rain from {} today (0-1)", window),
            CATEGORY_RAIN,
            SourceField::ChanceOfRain(bucket),
            Transform::Fraction,
        )
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::full()
    }
}

/// Encode samples in the Prometheus text format.
///
/// Samples that share a name are emitted as a single metric family using the help
/// text of the first of them.
pub fn encode_samples(samples: &[MetricSample]) -> Result<String, fmt::Error> {
    let mut registry = Registry::default();
    let mut families: Vec<(&str, Family<LabelSet, Gauge<f64, AtomicU64>>)> = Vec::new();

    for sample in samples {
        let family = match families.iter().find(|(name, _)| *name == sample.name) {
            Some((_, f)) => f.clone(),
            None => {
                let f = Family::<LabelSet, Gauge<f64, AtomicU64>>::default();
                registry.register(sample.name.clone(), sample.help.clone(), f.clone());
                families.push((sample.name.as_str(), f.clone()));
                f
            }
        };

        let labels: LabelSet = sample.labels.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        family.get_or_create(&labels).set(sample.value);
    }

    let mut buf = String::new();
    encode(&mut buf, &registry)?;
    Ok(buf)
}
