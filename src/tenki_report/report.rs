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

use crate::client::{ForecastEntry, TemperatureValue};
use std::fmt;

const SEPARATOR: &str = "\n----------\n";
const LABEL_PUBLIC_TIME: &str = "日時";
const LABEL_DESCRIPTION: &str = "概要";
const LABEL_MIN_TEMP: &str = "最低気温";
const LABEL_MAX_TEMP: &str = "最高気温";
const LABEL_RAIN_00_06: &str = "00-06";
const LABEL_RAIN_06_12: &str = "06-12";
const LABEL_RAIN_12_18: &str = "12-18";
const LABEL_RAIN_18_24: &str = "18-24";

/// Text of a single forecast report, delimited by separator lines so that several
/// reports posted to the same channel can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remove every whitespace character, including the ideographic space.
    pub fn strip_whitespace(&self) -> Report {
        Report(strip_whitespace(&self.0))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the report for a forecast. Values from the forecast are inserted as-is.
pub fn format_report(public_time_formatted: &str, summary: &str, forecast: &ForecastEntry) -> Report {
    let rain = &forecast.chance_of_rain;
    let mut out = String::new();

    out.push_str(SEPARATOR);
    push_line(&mut out, LABEL_PUBLIC_TIME, public_time_formatted);
    push_line(&mut out, LABEL_DESCRIPTION, summary);
    push_line(&mut out, LABEL_MIN_TEMP, celsius(&forecast.temperature.min));
    push_line(&mut out, LABEL_MAX_TEMP, celsius(&forecast.temperature.max));
    out.push('\n');
    push_line(&mut out, LABEL_RAIN_00_06, &rain.t00_06);
    push_line(&mut out, LABEL_RAIN_06_12, &rain.t06_12);
    push_line(&mut out, LABEL_RAIN_12_18, &rain.t12_18);
    out.push_str(LABEL_RAIN_18_24);
    out.push(':');
    out.push_str(&rain.t18_24);
    out.push_str(SEPARATOR);

    Report(out)
}

/// Remove all whitespace from `text`, including U+3000 used in Japanese text.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn push_line(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push(':');
    out.push_str(value);
    out.push('\n');
}

fn celsius(t: &TemperatureValue) -> &str {
    t.celsius.as_deref().unwrap_or("")
}
