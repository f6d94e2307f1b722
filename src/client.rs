//! Search-and-enrich orchestration against the proxy.
//!
//! One search call yields event stubs; each stub is then enriched with its
//! own detail call, strictly sequentially, sleeping a fixed delay between
//! calls so the upstream sees at most five requests a second. A stub whose
//! detail call fails is dropped and logged, never retried.

use std::time::Duration;

use anyhow::Context;
use anyhow::Result;

use crate::geo;
use crate::geo::GeoPoint;
use crate::model::Event;
use crate::model::Genre;
use crate::model::SearchResponse;

/// Pause between consecutive detail calls.
pub const DETAIL_DELAY: Duration = Duration::from_millis(200);

/// Proximity search radius, in miles.
const SEARCH_RADIUS_MILES: u32 = 200;

/// Stub count requested from the search endpoint.
const SEARCH_PAGE_SIZE: u32 = 100;

/// Coordinate used when the user supplied none.
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    latitude: 38.9072,
    longitude: 77.0369,
};

/// What the user asked for.
#[derive(Clone, Debug, Default)]
pub struct SearchCriteria {
    /// Genre restriction, `None` meaning all.
    pub genre: Option<Genre>,
    /// Free-text keyword forwarded to the upstream search.
    pub artist: String,
    /// Exact attraction name picked from the suggestion list.
    pub selected_artist: Option<String>,
}

/// Result of one search-and-enrich pass.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The filtered authoritative event set.
    pub events: Vec<Event>,
    /// Unique attraction names across the enriched set, in first-encountered
    /// order. Feeds the artist suggestion list.
    pub artist_names: Vec<String>,
}

pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
    public_key: Option<String>,
    detail_delay: Duration,
}

impl DashboardClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, public_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            public_key,
            detail_delay: DETAIL_DELAY,
        }
    }

    /// Overrides the inter-request pause. Tests use this to stay fast.
    #[must_use]
    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    /// Runs the full sequence: search, sequential enrichment, in-memory
    /// filtering. Fails only if the search call itself fails.
    pub async fn search(&self, criteria: &SearchCriteria, location: GeoPoint) -> Result<SearchOutcome> {
        let mut params = vec![
            ("keyword".to_string(), criteria.artist.clone()),
            ("segmentName".to_string(), "Music".to_string()),
            (
                "geoPoint".to_string(),
                geo::geohash(location, geo::GEOHASH_PRECISION),
            ),
            ("radius".to_string(), SEARCH_RADIUS_MILES.to_string()),
            ("unit".to_string(), "miles".to_string()),
            ("size".to_string(), SEARCH_PAGE_SIZE.to_string()),
        ];
        if let Some(genre) = criteria.genre {
            params.push(("classificationName".to_string(), genre.as_str().to_string()));
        }
        if let Some(key) = &self.public_key {
            params.push(("apikey".to_string(), key.clone()));
        }

        let response: SearchResponse = self
            .http
            .get(format!("{}/events", self.base_url))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("parsing search response")?;
        let stubs = response.into_events();
        tracing::info!("Search returned {} event stubs", stubs.len());

        let mut detailed = Vec::with_capacity(stubs.len());
        for stub in &stubs {
            match self.event_detail(stub.id()).await {
                Ok(event) => detailed.push(event),
                Err(e) => tracing::warn!("Skipping event {}: {e:#}", stub.id()),
            }
            tokio::time::sleep(self.detail_delay).await;
        }

        let mut artist_names: Vec<String> = Vec::new();
        for event in &detailed {
            for name in event.attraction_names() {
                if !artist_names.iter().any(|n| n == name) {
                    artist_names.push(name.to_string());
                }
            }
        }

        let events = filter_events(detailed, criteria);
        Ok(SearchOutcome { events, artist_names })
    }

    /// Fetches one event's full detail through the proxy.
    pub async fn event_detail(&self, id: &str) -> Result<Event> {
        self.http
            .get(format!("{}/event/{id}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("parsing detail for event {id}"))
    }
}

/// Projects the enriched set down to the events matching the criteria:
/// exact attraction-name match for a selected artist, case-insensitive exact
/// genre-name match for a selected genre.
#[must_use]
pub fn filter_events(events: Vec<Event>, criteria: &SearchCriteria) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| {
            criteria
                .selected_artist
                .as_deref()
                .is_none_or(|artist| event.attraction_names().iter().any(|n| *n == artist))
        })
        .filter(|event| {
            criteria.genre.is_none_or(|genre| {
                event
                    .genre_name()
                    .is_some_and(|n| n.eq_ignore_ascii_case(genre.as_str()))
            })
        })
        .collect()
}
