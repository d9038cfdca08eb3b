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

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;

pub(crate) const CLIENT_USER_AGENT: &str = "Tenki Report (https://github.com/56quarters/tenki_report)";

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    InvalidCity(String),
    Unexpected(StatusCode, Url),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::InvalidCity(s) => write!(f, "invalid city {}", s),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for the forecast API at weather.tsukumijima.net
#[derive(Debug)]
pub struct TenkiClient {
    client: Client,
    base_url: Url,
}

impl TenkiClient {
    const JSON_RESPONSE: &'static str = "application/json";

    pub fn new(client: Client, base_url: Url) -> Self {
        TenkiClient { client, base_url }
    }

    /// Fetch the current three day forecast for a city ID such as `130010` (Tokyo).
    pub async fn forecast(&self, city: &str) -> Result<ForecastResponse, ClientError> {
        let request_url = self.forecast_url(city);
        tracing::debug!(message = "making forecast request", url = %request_url);

        let res = self.make_request(city, request_url).await?;
        res.json::<ForecastResponse>().await.map_err(ClientError::Internal)
    }

    async fn make_request<S: Into<String>>(&self, city: S, url: Url) -> Result<Response, ClientError> {
        let res = self
            .client
            .get(url.clone())
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, Self::JSON_RESPONSE)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status == StatusCode::OK {
            Ok(res)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::InvalidCity(city.into()))
        } else {
            Err(ClientError::Unexpected(status, url))
        }
    }

    fn forecast_url(&self, city: &str) -> Url {
        endpoint(&self.base_url, &["api", "forecast", "city", city])
    }
}

/// Append path segments to a base URL, keeping any path the base already has.
///
/// Segments are percent-encoded as they are pushed.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut p) = url.path_segments_mut() {
        p.pop_if_empty().extend(segments);
    }

    url
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ForecastResponse {
    #[serde(alias = "publicTime", default)]
    pub public_time: String,
    #[serde(alias = "publicTimeFormatted", default)]
    pub public_time_formatted: String,
    #[serde(alias = "publishingOffice", default)]
    pub publishing_office: String,
    #[serde(alias = "title", default)]
    pub title: String,
    #[serde(alias = "link", default)]
    pub link: String,
    #[serde(alias = "description", default)]
    pub description: Description,
    #[serde(alias = "forecasts", default)]
    pub forecasts: Vec<ForecastEntry>,
    #[serde(alias = "location")]
    pub location: Option<Location>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Description {
    #[serde(alias = "publicTime", default)]
    pub public_time: String,
    #[serde(alias = "publicTimeFormatted", default)]
    pub public_time_formatted: String,
    #[serde(alias = "headlineText", default)]
    pub headline_text: String,
    #[serde(alias = "bodyText", default)]
    pub body_text: String,
    #[serde(alias = "text", default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    #[serde(alias = "date")]
    pub date: String,
    #[serde(alias = "dateLabel")]
    pub date_label: String,
    #[serde(alias = "telop", default)]
    pub telop: String,
    #[serde(alias = "detail", default)]
    pub detail: Detail,
    #[serde(alias = "temperature", default)]
    pub temperature: Temperature,
    #[serde(alias = "chanceOfRain", default)]
    pub chance_of_rain: ChanceOfRain,
    #[serde(alias = "image")]
    pub image: Option<Image>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Detail {
    #[serde(alias = "weather")]
    pub weather: Option<String>,
    #[serde(alias = "wind")]
    pub wind: Option<String>,
    #[serde(alias = "wave")]
    pub wave: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Temperature {
    #[serde(alias = "min", default)]
    pub min: TemperatureValue,
    #[serde(alias = "max", default)]
    pub max: TemperatureValue,
}

/// Temperature in both units. The API sends `null` for values that have already
/// passed, e.g. the minimum temperature of today after the morning.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TemperatureValue {
    #[serde(alias = "celsius")]
    pub celsius: Option<String>,
    #[serde(alias = "fahrenheit")]
    pub fahrenheit: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChanceOfRain {
    #[serde(alias = "T00_06", default)]
    pub t00_06: String,
    #[serde(alias = "T06_12", default)]
    pub t06_12: String,
    #[serde(alias = "T12_18", default)]
    pub t12_18: String,
    #[serde(alias = "T18_24", default)]
    pub t18_24: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Image {
    #[serde(alias = "title")]
    pub title: String,
    #[serde(alias = "url")]
    pub url: String,
    #[serde(alias = "width")]
    pub width: u32,
    #[serde(alias = "height")]
    pub height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    #[serde(alias = "area")]
    pub area: String,
    #[serde(alias = "prefecture")]
    pub prefecture: String,
    #[serde(alias = "district")]
    pub district: String,
    #[serde(alias = "city")]
    pub city: String,
}
