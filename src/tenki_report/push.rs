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

use crate::client::{endpoint, CLIENT_USER_AGENT};
use crate::metrics::{self, MetricSample};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::error;
use std::fmt;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

#[derive(Debug)]
pub enum PushError {
    Internal(reqwest::Error),
    Encoding(fmt::Error),
    Unexpected(StatusCode, Url),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::Encoding(e) => write!(f, "unable to encode metrics: {}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for PushError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            Self::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for a Prometheus Pushgateway.
#[derive(Debug)]
pub struct PushClient {
    client: Client,
    base_url: Url,
}

impl PushClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        PushClient { client, base_url }
    }

    /// Replace all metrics in the group identified by `job` and the `grouping` labels
    /// with `samples`.
    pub async fn push(&self, job: &str, grouping: &[(&str, &str)], samples: &[MetricSample]) -> Result<(), PushError> {
        let url = self.group_url(job, grouping);
        let body = metrics::encode_samples(samples).map_err(PushError::Encoding)?;
        tracing::debug!(message = "pushing metrics", url = %url, num_samples = samples.len(), num_bytes = body.len());

        let res = self
            .client
            .put(url.clone())
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CONTENT_TYPE, TEXT_FORMAT)
            .body(body)
            .send()
            .await
            .map_err(PushError::Internal)?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PushError::Unexpected(status, url))
        }
    }

    fn group_url(&self, job: &str, grouping: &[(&str, &str)]) -> Url {
        let mut segments = vec!["metrics", "job", job];
        for &(k, v) in grouping {
            segments.push(k);
            segments.push(v);
        }

        endpoint(&self.base_url, &segments)
    }
}
