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
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum SlackError {
    Internal(reqwest::Error),
    Api(String),
    Unexpected(StatusCode, Url),
}

impl fmt::Display for SlackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::Api(e) => write!(f, "can not post. {}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for SlackError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for posting messages with the Slack Web API `chat.postMessage` method.
#[derive(Debug)]
pub struct SlackClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl SlackClient {
    pub fn new<S: Into<String>>(client: Client, base_url: Url, token: S) -> Self {
        SlackClient {
            client,
            base_url,
            token: token.into(),
        }
    }

    /// Post `text` to `channel`, returning the timestamp Slack assigned the message.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<String, SlackError> {
        let url = endpoint(&self.base_url, &["api", "chat.postMessage"]);
        tracing::debug!(message = "posting chat message", url = %url, channel = %channel);

        let res = self
            .client
            .post(url.clone())
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .bearer_auth(&self.token)
            .json(&PostMessage { channel, text })
            .send()
            .await
            .map_err(SlackError::Internal)?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(SlackError::Unexpected(status, url));
        }

        // Slack reports API level failures with a 200 status and "ok" set to false
        let body = res.json::<PostMessageResponse>().await.map_err(SlackError::Internal)?;
        if body.ok {
            Ok(body.ts.unwrap_or_default())
        } else {
            Err(SlackError::Api(body.error.unwrap_or_else(|| "unknown_error".to_owned())))
        }
    }
}

#[derive(Serialize, Debug)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
    ts: Option<String>,
}
