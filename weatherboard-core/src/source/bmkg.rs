use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ForecastSource, SourceError, truncate_body};
use crate::model::{ForecastPoint, RegionSeries};

/// Public BMKG three-hourly forecast endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.bmkg.go.id/publik/prakiraan-cuaca";

/// Administrative area (adm1) code for Lampung province.
pub const DEFAULT_AREA: &str = "18";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Forecast source backed by BMKG's regional forecast API.
///
/// One GET per fetch, no parameters beyond the configured area code. The
/// response carries every region of the province with several days of
/// three-hourly points grouped per day.
#[derive(Debug, Clone)]
pub struct BmkgSource {
    endpoint: String,
    area: String,
    english_descriptions: bool,
    http: Client,
}

impl BmkgSource {
    pub fn new(
        endpoint: impl Into<String>,
        area: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            area: area.into(),
            english_descriptions: false,
            http,
        })
    }

    /// Prefer the English condition description over the localized one.
    pub fn with_english_descriptions(mut self, english: bool) -> Self {
        self.english_descriptions = english;
        self
    }
}

#[async_trait]
impl ForecastSource for BmkgSource {
    async fn fetch(&self) -> Result<Vec<RegionSeries>, SourceError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("adm1", self.area.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: BmkgResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .data
            .into_iter()
            .map(|entry| entry.into_series(self.english_descriptions))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct BmkgResponse {
    data: Vec<BmkgLocationEntry>,
}

#[derive(Debug, Deserialize)]
struct BmkgLocationEntry {
    lokasi: BmkgLocation,
    cuaca: Vec<Vec<BmkgPoint>>,
}

#[derive(Debug, Deserialize)]
struct BmkgLocation {
    kotkab: String,
}

#[derive(Debug, Deserialize)]
struct BmkgPoint {
    local_datetime: String,
    t: f64,
    hu: f64,
    weather: i32,
    weather_desc: String,
    #[serde(default)]
    weather_desc_en: String,
    image: String,
}

impl BmkgLocationEntry {
    /// Maps one location entry to a region series. Only the first daily
    /// group of `cuaca` feeds the series; points whose timestamp does not
    /// parse are dropped.
    fn into_series(self, english_descriptions: bool) -> RegionSeries {
        let points = self
            .cuaca
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|point| point.into_point(english_descriptions))
            .collect();

        RegionSeries {
            region: self.lokasi.kotkab,
            points,
        }
    }
}

impl BmkgPoint {
    fn into_point(self, english_descriptions: bool) -> Option<ForecastPoint> {
        let Some(local_time) = parse_local_datetime(&self.local_datetime) else {
            debug!(
                timestamp = %self.local_datetime,
                "dropping forecast point with unparseable timestamp"
            );
            return None;
        };

        let description = if english_descriptions && !self.weather_desc_en.is_empty() {
            self.weather_desc_en
        } else {
            self.weather_desc
        };

        Some(ForecastPoint {
            local_time,
            temperature_c: self.t,
            humidity_pct: self.hu,
            condition_code: self.weather,
            description,
            icon_url: self.image,
        })
    }
}

/// BMKG has served both `2024-01-01 13:00:00` and ISO `2024-01-01T13:00:00`
/// shapes for `local_datetime`.
fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
