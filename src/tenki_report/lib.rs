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

//! Daily weather forecast reports for Slack and Prometheus
//!
//! ## Features
//!
//! `tenki_report` fetches the forecast for a Japanese city from the [weather.tsukumijima.net]
//! API, which republishes forecasts from the Japan Meteorological Agency, and posts a short
//! report for today to a Slack channel. A report looks like this:
//!
//! ```text
//! ----------
//! 日時:2023/05/01 17:00:00
//! 概要:晴れています。
//! 夜は月が見えるでしょう。
//!
//! 最低気温:0
//! 最高気温:30
//!
//! 00-06:--%
//! 06-12:00%
//! 12-18:50%
//! 18-24:70%
//! ----------
//! ```
//!
//! Optionally, numbers from the forecast are pushed to a [Prometheus Pushgateway] as well.
//! The following metrics are pushed, all with the labels `category` and
//! `exporter="tenki_report"`, grouped by `job` and `city`.
//!
//! * `tenki_temperature_max_celsius` - Maximum temperature for today, in degrees celsius.
//! * `tenki_temperature_min_celsius` - Minimum temperature for today, in degrees celsius.
//! * `tenki_chance_of_rain_00_06` - Chance of rain from 00:00 to 06:00 (0-1).
//! * `tenki_chance_of_rain_06_12` - Chance of rain from 06:00 to 12:00 (0-1).
//! * `tenki_chance_of_rain_12_18` - Chance of rain from 12:00 to 18:00 (0-1).
//! * `tenki_chance_of_rain_18_24` - Chance of rain from 18:00 to 24:00 (0-1).
//! * `tenki_wind_speed` - First number mentioned in the wind forecast, if any.
//!
//! Values that aren't available (such as `--%` for a time window that has already
//! passed) are reported as `0`. With `--metric-set basic` only the temperatures are pushed.
//!
//! [weather.tsukumijima.net]: https://weather.tsukumijima.net/
//! [Prometheus Pushgateway]: https://github.com/prometheus/pushgateway
//!
//! ## Build
//!
//! ```text
//! git clone git@github.com:56quarters/tenki_report.git && cd tenki_report
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! City IDs are listed in the [primary area definitions] published by the JMA, e.g. `130010`
//! for Tokyo. The Slack token must belong to a bot with the `chat:write` scope.
//!
//! ```text
//! SLACK_TOKEN=xoxb-... ./tenki_report --city 130010 --slack-channel C0123456789 \
//!     --pushgateway-url http://localhost:9091/
//! ```
//!
//! `tenki_report` runs once and exits, so it is meant to be run from cron or a Systemd timer.
//!
//! [primary area definitions]: https://weather.tsukumijima.net/primary_area.xml
//!

pub mod client;
pub mod forecast;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod push;
pub mod report;
pub mod slack;
