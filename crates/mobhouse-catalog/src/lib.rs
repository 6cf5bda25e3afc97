//! The Mob House catalog: DJ profiles, recorded mixes and ticketed
//! events, held in memory.
//!
//! [`Catalog::sample`] seeds the collective's published lineup. The
//! admin dashboard edits it through `add_*`/`remove_*`, and reads
//! [`CatalogStats`] and [`Catalog::popular_mixes`] for its overview.
//! Nothing here knows about identity: gating downloads and ticket
//! purchases is the session gate's job.

mod catalog;
mod error;
mod records;
mod sample;

pub use catalog::{Catalog, CatalogStats};
pub use error::CatalogError;
pub use records::{
    Dj, Event, EventStatus, Genre, Mix, MixLength, NewDj, NewEvent, NewMix,
};
