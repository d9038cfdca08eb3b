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

use crate::client::{ForecastResponse, TenkiClient};
use crate::forecast::{self, TODAY_LABEL};
use crate::metrics::{MetricExtractor, MetricSample};
use crate::push::PushClient;
use crate::report::{self, Report};
use crate::slack::{SlackClient, SlackError};
use tracing::{Instrument, Level};

const GROUPING_CITY: &str = "city";

/// Settings for a single run of the report pipeline.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// City ID to fetch the forecast for, e.g. `130010` for Tokyo.
    pub city: String,
    /// Slack channel ID or name to post the report to.
    pub channel: String,
    /// Pushgateway job name metrics are grouped under.
    pub job: String,
    /// Remove all whitespace from the report before posting it.
    pub strip_whitespace: bool,
    pub extractor: MetricExtractor,
}

/// Report text and metrics derived from today's forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub report: Report,
    pub samples: Vec<MetricSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Delivered(ForecastReport),
    NoForecast,
}

/// Build the report and metrics for today's forecast in `response`.
///
/// Returns `None` if the response has no forecast for today.
pub fn build(response: &ForecastResponse, extractor: &MetricExtractor, strip_whitespace: bool) -> Option<ForecastReport> {
    let today = forecast::find_today(&response.forecasts, TODAY_LABEL)?;
    let summary = forecast::summarize(&response.description.text);

    let mut report = report::format_report(&response.public_time_formatted, summary, today);
    if strip_whitespace {
        report = report.strip_whitespace();
    }

    Some(ForecastReport {
        report,
        samples: extractor.extract(today),
    })
}

/// Fetches a forecast, posts the report to Slack, and optionally pushes metrics.
#[derive(Debug)]
pub struct Reporter {
    weather: TenkiClient,
    slack: SlackClient,
    push: Option<PushClient>,
    config: ReportConfig,
}

impl Reporter {
    pub fn new(weather: TenkiClient, slack: SlackClient, push: Option<PushClient>, config: ReportConfig) -> Self {
        Reporter {
            weather,
            slack,
            push,
            config,
        }
    }

    /// Run the pipeline once.
    ///
    /// Failing to fetch the forecast is treated the same as a forecast without an
    /// entry for today: nothing is posted or pushed. Failing to push metrics is logged
    /// and otherwise ignored. Failing to post the report is returned as an error.
    pub async fn run(&self) -> Result<Outcome, SlackError> {
        let city = &self.config.city;
        let response = match self
            .weather
            .forecast(city)
            .instrument(tracing::span!(Level::DEBUG, "tenki_forecast"))
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::error!(message = "failed to fetch forecast", city = %city, error = %e);
                ForecastResponse::default()
            }
        };

        let out = match build(&response, &self.config.extractor, self.config.strip_whitespace) {
            Some(out) => out,
            None => {
                tracing::warn!(message = "no forecast for today", city = %city, label = TODAY_LABEL);
                return Ok(Outcome::NoForecast);
            }
        };

        let posted = self.slack.post_message(&self.config.channel, out.report.as_str()).await;
        match &posted {
            Ok(ts) => tracing::info!(message = "posted forecast report", channel = %self.config.channel, ts = %ts),
            Err(e) => tracing::error!(message = "failed to post forecast report", channel = %self.config.channel, error = %e),
        }

        if let Some(push) = &self.push {
            match push.push(&self.config.job, &[(GROUPING_CITY, city.as_str())], &out.samples).await {
                Ok(_) => tracing::info!(message = "pushed forecast metrics", job = %self.config.job, num_samples = out.samples.len()),
                Err(e) => tracing::warn!(message = "failed to push forecast metrics", job = %self.config.job, error = %e),
            }
        }

        posted.map(|_| Outcome::Delivered(out))
    }
}
