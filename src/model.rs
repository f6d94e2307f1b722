//! Response shapes of the Discovery API, plus the fixed genre list.
//!
//! Every nested level the upstream may omit is an `Option`; the accessor
//! methods walk the nesting and degrade to `None` rather than panicking, so a
//! sparse stub and a full detail record go through the same code paths.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use getset::Getters;
use serde::Deserialize;

use crate::geo::GeoPoint;

/// Genres offered by the criteria form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Genre {
    Pop,
    Rock,
    Rap,
    HipHop,
    Electronic,
    Jazz,
    Country,
    Classical,
    Alternative,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Pop,
        Genre::Rock,
        Genre::Rap,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Country,
        Genre::Classical,
        Genre::Alternative,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::Rap => "Rap",
            Genre::HipHop => "Hip-Hop",
            Genre::Electronic => "Electronic",
            Genre::Jazz => "Jazz",
            Genre::Country => "Country",
            Genre::Classical => "Classical",
            Genre::Alternative => "Alternative",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown genre `{s}`"))
    }
}

/// Envelope of the search endpoint. `_embedded` is absent when nothing
/// matched.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<SearchEmbedded>,
}

impl SearchResponse {
    /// The returned event stubs, empty when `_embedded` is absent.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.embedded.map(|e| e.events).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize)]
struct SearchEmbedded {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Clone, Debug, Deserialize, Getters)]
pub struct Event {
    #[getset(get = "pub")]
    id: String,
    #[getset(get = "pub")]
    name: Option<String>,
    #[getset(get = "pub")]
    url: Option<String>,
    dates: Option<Dates>,
    classifications: Option<Vec<Classification>>,
    images: Option<Vec<Image>>,
    #[serde(rename = "_embedded")]
    embedded: Option<EventEmbedded>,
}

#[derive(Clone, Debug, Deserialize)]
struct Dates {
    start: Option<StartDate>,
}

#[derive(Clone, Debug, Deserialize)]
struct StartDate {
    #[serde(rename = "localDate")]
    local_date: Option<String>,
    #[serde(rename = "localTime")]
    local_time: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct Classification {
    genre: Option<NamedField>,
}

#[derive(Clone, Debug, Deserialize)]
struct NamedField {
    name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct Image {
    url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct EventEmbedded {
    venues: Option<Vec<Venue>>,
    attractions: Option<Vec<Attraction>>,
}

#[derive(Clone, Debug, Deserialize)]
struct Venue {
    name: Option<String>,
    city: Option<NamedField>,
    state: Option<NamedField>,
    location: Option<VenueLocation>,
}

/// Coordinates arrive as strings upstream.
#[derive(Clone, Debug, Deserialize)]
struct VenueLocation {
    latitude: Option<String>,
    longitude: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct Attraction {
    name: Option<String>,
}

impl Event {
    #[must_use]
    pub fn local_date(&self) -> Option<&str> {
        self.dates.as_ref()?.start.as_ref()?.local_date.as_deref()
    }

    #[must_use]
    pub fn local_time(&self) -> Option<&str> {
        self.dates.as_ref()?.start.as_ref()?.local_time.as_deref()
    }

    /// Parsed start date; `None` when missing or unparseable.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.local_date()?.parse().ok()
    }

    /// Combined start date and time, for the detail view.
    #[must_use]
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.start_date()?;
        let time: NaiveTime = self.local_time()?.parse().ok()?;
        Some(date.and_time(time))
    }

    fn first_venue(&self) -> Option<&Venue> {
        self.embedded.as_ref()?.venues.as_ref()?.first()
    }

    #[must_use]
    pub fn venue_name(&self) -> Option<&str> {
        self.first_venue()?.name.as_deref()
    }

    #[must_use]
    pub fn city_name(&self) -> Option<&str> {
        self.first_venue()?.city.as_ref()?.name.as_deref()
    }

    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        self.first_venue()?.state.as_ref()?.name.as_deref()
    }

    /// "City, State" when both parts are present.
    #[must_use]
    pub fn city_state(&self) -> Option<String> {
        Some(format!("{}, {}", self.city_name()?, self.state_name()?))
    }

    /// Venue coordinates, parsed out of the upstream string fields.
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoPoint> {
        let location = self.first_venue()?.location.as_ref()?;
        Some(GeoPoint {
            latitude: location.latitude.as_deref()?.parse().ok()?,
            longitude: location.longitude.as_deref()?.parse().ok()?,
        })
    }

    #[must_use]
    pub fn genre_name(&self) -> Option<&str> {
        self.classifications
            .as_ref()?
            .first()?
            .genre
            .as_ref()?
            .name
            .as_deref()
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.images.as_ref()?.first()?.url.as_deref()
    }

    #[must_use]
    pub fn first_attraction(&self) -> Option<&str> {
        self.attraction_names().into_iter().next()
    }

    /// Names of every attraction attached to the event, in order.
    #[must_use]
    pub fn attraction_names(&self) -> Vec<&str> {
        self.embedded
            .as_ref()
            .and_then(|e| e.attractions.as_ref())
            .map(|list| list.iter().filter_map(|a| a.name.as_deref()).collect())
            .unwrap_or_default()
    }
}
