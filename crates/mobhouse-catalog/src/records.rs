//! Catalog records and the admin forms that create them.

use std::fmt;
use std::str::FromStr;

use mobhouse_protocol::{ContentId, DjId, EventId, MixId};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// The genres the mix catalog is filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "Afro House")]
    AfroHouse,
    #[serde(rename = "Amapiano")]
    Amapiano,
    #[serde(rename = "Tribal House")]
    TribalHouse,
}

impl Genre {
    pub const ALL: [Genre; 3] = [Genre::AfroHouse, Genre::Amapiano, Genre::TribalHouse];

    /// Parses a filter tab label. `"All"` means no filter.
    pub fn parse_filter(label: &str) -> Result<Option<Genre>, CatalogError> {
        if label.trim().eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        label.parse().map(Some)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Genre::AfroHouse => "Afro House",
            Genre::Amapiano => "Amapiano",
            Genre::TribalHouse => "Tribal House",
        })
    }
}

impl FromStr for Genre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Genre::ALL
            .into_iter()
            .find(|g| g.to_string().eq_ignore_ascii_case(wanted))
            .ok_or(CatalogError::Invalid {
                field: "genre",
                reason: "unknown genre",
            })
    }
}

// ---------------------------------------------------------------------------
// MixLength
// ---------------------------------------------------------------------------

/// Running time of a mix, shown as `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MixLength(pub u32);

impl MixLength {
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = (self.0 / 3600, (self.0 % 3600) / 60, self.0 % 60);
        if h > 0 {
            write!(f, "{h}:{m:02}:{s:02}")
        } else {
            write!(f, "{m}:{s:02}")
        }
    }
}

impl FromStr for MixLength {
    type Err = CatalogError;

    /// Accepts `MM:SS` or `H:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidLength(s.to_string());

        let parts = s
            .trim()
            .split(':')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let secs = match parts.as_slice() {
            [m, sec] if *sec < 60 => m.checked_mul(60).and_then(|s| s.checked_add(*sec)),
            [h, m, sec] if *m < 60 && *sec < 60 => h
                .checked_mul(3600)
                .and_then(|s| s.checked_add(m * 60 + sec)),
            _ => return Err(invalid()),
        };
        secs.map(Self).ok_or_else(invalid)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A resident DJ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dj {
    pub id: DjId,
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
}

/// A recorded mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mix {
    pub id: MixId,
    pub title: String,
    pub artist: String,
    pub genre: Genre,
    pub length: MixLength,
    pub plays: u64,
    pub description: String,
}

impl Mix {
    /// The id the session gate knows this mix by.
    pub fn content_id(&self) -> ContentId {
        ContentId::from(self.id)
    }
}

/// Ticket sales status shown on an event card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[serde(rename = "On Sale")]
    OnSale,
    #[serde(rename = "Early Bird")]
    EarlyBird,
    #[serde(rename = "VIP Available")]
    VipAvailable,
    #[serde(rename = "Sold Out")]
    SoldOut,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventStatus::OnSale => "On Sale",
            EventStatus::EarlyBird => "Early Bird",
            EventStatus::VipAvailable => "VIP Available",
            EventStatus::SoldOut => "Sold Out",
        })
    }
}

/// A ticketed event. Prices are whole Kenyan shillings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, local time.
    pub time: String,
    pub venue: String,
    pub price_kes: u32,
    pub status: EventStatus,
    pub description: String,
    pub capacity: u32,
    pub sold: u32,
}

impl Event {
    pub fn tickets_left(&self) -> u32 {
        self.capacity.saturating_sub(self.sold)
    }

    /// No tickets left, or marked sold out by an admin.
    pub fn is_sold_out(&self) -> bool {
        self.status == EventStatus::SoldOut || self.tickets_left() == 0
    }
}

// ---------------------------------------------------------------------------
// Admin forms
// ---------------------------------------------------------------------------

/// Input for adding a DJ from the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDj {
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
}

/// Input for adding a mix from the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMix {
    pub title: String,
    pub artist: String,
    pub genre: Genre,
    pub length: MixLength,
    pub description: String,
}

/// Input for adding an event from the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub price_kes: u32,
    pub description: String,
    pub capacity: u32,
}

fn required(value: &str, field: &'static str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Invalid {
            field,
            reason: "must not be empty",
        });
    }
    Ok(trimmed.to_string())
}

impl NewDj {
    pub(crate) fn into_dj(self, id: DjId) -> Result<Dj, CatalogError> {
        Ok(Dj {
            id,
            name: required(&self.name, "name")?,
            bio: self.bio.trim().to_string(),
            specialties: self
                .specialties
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl NewMix {
    pub(crate) fn into_mix(self, id: MixId) -> Result<Mix, CatalogError> {
        if self.length.as_secs() == 0 {
            return Err(CatalogError::Invalid {
                field: "length",
                reason: "must be longer than zero",
            });
        }
        Ok(Mix {
            id,
            title: required(&self.title, "title")?,
            artist: required(&self.artist, "artist")?,
            genre: self.genre,
            length: self.length,
            plays: 0,
            description: self.description.trim().to_string(),
        })
    }
}

impl NewEvent {
    pub(crate) fn into_event(self, id: EventId) -> Result<Event, CatalogError> {
        if self.price_kes == 0 {
            return Err(CatalogError::Invalid {
                field: "price",
                reason: "must be greater than zero",
            });
        }
        if self.capacity == 0 {
            return Err(CatalogError::Invalid {
                field: "capacity",
                reason: "must be greater than zero",
            });
        }
        Ok(Event {
            id,
            title: required(&self.title, "title")?,
            date: required(&self.date, "date")?,
            time: required(&self.time, "time")?,
            venue: required(&self.venue, "venue")?,
            price_kes: self.price_kes,
            status: EventStatus::OnSale,
            description: self.description.trim().to_string(),
            capacity: self.capacity,
            sold: 0,
        })
    }
}
