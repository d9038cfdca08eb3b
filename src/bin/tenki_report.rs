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

use clap::{Parser, ValueEnum};
use reqwest::{Client, Url};
use std::error::Error;
use std::process;
use std::time::Duration;
use tenki_report::client::TenkiClient;
use tenki_report::metrics::MetricExtractor;
use tenki_report::pipeline::{Outcome, ReportConfig, Reporter};
use tenki_report::push::PushClient;
use tenki_report::slack::SlackClient;
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;
const DEFAULT_API_URL: &str = "https://weather.tsukumijima.net/";
const DEFAULT_SLACK_API_URL: &str = "https://slack.com/";
const DEFAULT_PUSH_JOB: &str = "tenki_report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricSet {
    /// Temperatures, chance of rain for each time window, and wind speed
    Full,
    /// Only temperatures
    Basic,
}

#[derive(Debug, Parser)]
#[clap(name = "tenki_report", version = clap::crate_version!())]
struct TenkiReportApplication {
    /// City ID to fetch the forecast for, e.g. 130010 for Tokyo
    #[clap(long, env = "TENKI_CITY")]
    city: String,

    /// Base URL for the forecast API
    #[clap(long, default_value = DEFAULT_API_URL)]
    api_url: Url,

    /// Slack bot token used to post the report
    #[clap(long, env = "SLACK_TOKEN", hide_env_values = true)]
    slack_token: String,

    /// Slack channel to post the report to
    #[clap(long, env = "SLACK_CHANNEL")]
    slack_channel: String,

    /// Base URL for the Slack Web API
    #[clap(long, default_value = DEFAULT_SLACK_API_URL)]
    slack_api_url: Url,

    /// Base URL of a Prometheus Pushgateway. If not set, no metrics are pushed.
    #[clap(long, env = "PUSHGATEWAY_URL")]
    pushgateway_url: Option<Url>,

    /// Job name to push metrics under
    #[clap(long, default_value_t = DEFAULT_PUSH_JOB.into())]
    push_job: String,

    /// Which metrics to push
    #[clap(long, value_enum, default_value_t = MetricSet::Full)]
    metric_set: MetricSet,

    /// Remove all whitespace from the report before posting it
    #[clap(long)]
    strip_whitespace: bool,

    /// Timeout for each HTTP request, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = TenkiReportApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let extractor = match opts.metric_set {
        MetricSet::Full => MetricExtractor::full(),
        MetricSet::Basic => MetricExtractor::basic(),
    };

    let config = ReportConfig {
        city: opts.city,
        channel: opts.slack_channel,
        job: opts.push_job,
        strip_whitespace: opts.strip_whitespace,
        extractor,
    };

    // reqwest clients are reference counted so each API client shares one connection pool
    let weather = TenkiClient::new(http_client.clone(), opts.api_url);
    let slack = SlackClient::new(http_client.clone(), opts.slack_api_url, opts.slack_token);
    let push = opts.pushgateway_url.map(|url| PushClient::new(http_client, url));
    let reporter = Reporter::new(weather, slack, push, config);

    match reporter.run().await {
        Ok(Outcome::Delivered(out)) => {
            tracing::debug!(message = "forecast report delivered", num_samples = out.samples.len());
            Ok(())
        }
        Ok(Outcome::NoForecast) => {
            tracing::info!("no forecast report to deliver");
            Ok(())
        }
        Err(e) => {
            tracing::error!(message = "unable to deliver forecast report", error = %e);
            process::exit(1)
        }
    }
}
