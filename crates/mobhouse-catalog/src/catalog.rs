//! The catalog store: lookups, admin edits and dashboard stats.

use std::collections::BTreeMap;

use mobhouse_protocol::{DjId, EventId, MixId};
use serde::{Deserialize, Serialize};

use crate::{CatalogError, Dj, Event, EventStatus, Genre, Mix, NewDj, NewEvent, NewMix};

/// Dashboard totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub dj_count: usize,
    pub mix_count: usize,
    pub event_count: usize,
    pub total_plays: u64,
    pub tickets_sold: u64,
    /// Sum of `price × sold` across events, in KES.
    pub ticket_revenue_kes: u64,
}

/// Everything the site lists, kept in memory and ordered by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    djs: BTreeMap<DjId, Dj>,
    mixes: BTreeMap<MixId, Mix>,
    events: BTreeMap<EventId, Event>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from records, keyed by their own ids.
    pub fn from_records(
        djs: impl IntoIterator<Item = Dj>,
        mixes: impl IntoIterator<Item = Mix>,
        events: impl IntoIterator<Item = Event>,
    ) -> Self {
        Self {
            djs: djs.into_iter().map(|d| (d.id, d)).collect(),
            mixes: mixes.into_iter().map(|m| (m.id, m)).collect(),
            events: events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    // -- queries ----------------------------------------------------------

    pub fn djs(&self) -> impl Iterator<Item = &Dj> {
        self.djs.values()
    }

    pub fn dj(&self, id: DjId) -> Result<&Dj, CatalogError> {
        self.djs.get(&id).ok_or(CatalogError::UnknownDj(id))
    }

    /// Mixes in id order, optionally restricted to one genre.
    /// `None` is the "All" tab.
    pub fn mixes(&self, genre: Option<Genre>) -> impl Iterator<Item = &Mix> {
        self.mixes
            .values()
            .filter(move |m| genre.is_none_or(|g| m.genre == g))
    }

    pub fn mix(&self, id: MixId) -> Result<&Mix, CatalogError> {
        self.mixes.get(&id).ok_or(CatalogError::UnknownMix(id))
    }

    /// Mixes credited to a DJ, matched by name.
    pub fn mixes_by(&self, dj: DjId) -> Result<Vec<&Mix>, CatalogError> {
        let name = &self.dj(dj)?.name;
        Ok(self.mixes.values().filter(|m| &m.artist == name).collect())
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn event(&self, id: EventId) -> Result<&Event, CatalogError> {
        self.events.get(&id).ok_or(CatalogError::UnknownEvent(id))
    }

    /// Counts one play of a mix and returns the new total.
    pub fn record_play(&mut self, id: MixId) -> Result<u64, CatalogError> {
        let mix = self.mixes.get_mut(&id).ok_or(CatalogError::UnknownMix(id))?;
        mix.plays += 1;
        Ok(mix.plays)
    }

    /// The event, if tickets can still be bought for it.
    ///
    /// # Errors
    /// [`CatalogError::SoldOut`] when no tickets are left.
    pub fn on_sale(&self, id: EventId) -> Result<&Event, CatalogError> {
        let event = self.event(id)?;
        if event.is_sold_out() {
            return Err(CatalogError::SoldOut(id));
        }
        Ok(event)
    }

    // -- admin ------------------------------------------------------------

    pub fn add_dj(&mut self, new: NewDj) -> Result<DjId, CatalogError> {
        let id = DjId(next_id("DJ", self.djs.keys().map(|k| k.0))?);
        let dj = new.into_dj(id)?;
        tracing::info!(%id, name = %dj.name, "DJ added");
        self.djs.insert(id, dj);
        Ok(id)
    }

    pub fn remove_dj(&mut self, id: DjId) -> Result<Dj, CatalogError> {
        let dj = self.djs.remove(&id).ok_or(CatalogError::UnknownDj(id))?;
        tracing::info!(%id, name = %dj.name, "DJ removed");
        Ok(dj)
    }

    pub fn add_mix(&mut self, new: NewMix) -> Result<MixId, CatalogError> {
        let id = MixId(next_id("mix", self.mixes.keys().map(|k| k.0))?);
        let mix = new.into_mix(id)?;
        tracing::info!(%id, title = %mix.title, "mix added");
        self.mixes.insert(id, mix);
        Ok(id)
    }

    pub fn remove_mix(&mut self, id: MixId) -> Result<Mix, CatalogError> {
        let mix = self.mixes.remove(&id).ok_or(CatalogError::UnknownMix(id))?;
        tracing::info!(%id, title = %mix.title, "mix removed");
        Ok(mix)
    }

    pub fn add_event(&mut self, new: NewEvent) -> Result<EventId, CatalogError> {
        let id = EventId(next_id("event", self.events.keys().map(|k| k.0))?);
        let event = new.into_event(id)?;
        tracing::info!(%id, title = %event.title, "event added");
        self.events.insert(id, event);
        Ok(id)
    }

    pub fn remove_event(&mut self, id: EventId) -> Result<Event, CatalogError> {
        let event = self
            .events
            .remove(&id)
            .ok_or(CatalogError::UnknownEvent(id))?;
        tracing::info!(%id, title = %event.title, "event removed");
        Ok(event)
    }

    /// Changes the status badge on an event card.
    pub fn set_event_status(
        &mut self,
        id: EventId,
        status: EventStatus,
    ) -> Result<(), CatalogError> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or(CatalogError::UnknownEvent(id))?;
        tracing::info!(%id, from = %event.status, to = %status, "event status changed");
        event.status = status;
        Ok(())
    }

    // -- analytics --------------------------------------------------------

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            dj_count: self.djs.len(),
            mix_count: self.mixes.len(),
            event_count: self.events.len(),
            total_plays: self.mixes.values().map(|m| m.plays).sum(),
            tickets_sold: self.events.values().map(|e| u64::from(e.sold)).sum(),
            ticket_revenue_kes: self
                .events
                .values()
                .map(|e| u64::from(e.price_kes) * u64::from(e.sold))
                .sum(),
        }
    }

    /// The `n` most played mixes, most played first. Ties keep id order.
    pub fn popular_mixes(&self, n: usize) -> Vec<&Mix> {
        let mut mixes: Vec<&Mix> = self.mixes.values().collect();
        mixes.sort_by(|a, b| b.plays.cmp(&a.plays));
        mixes.truncate(n);
        mixes
    }
}

/// One past the highest id in use. Removed ids are never reused while a
/// higher one exists.
fn next_id(kind: &'static str, ids: impl Iterator<Item = u32>) -> Result<u32, CatalogError> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(CatalogError::IdsExhausted(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MixLength;

    fn new_mix(title: &str) -> NewMix {
        NewMix {
            title: title.into(),
            artist: "SVMIK".into(),
            genre: Genre::AfroHouse,
            length: MixLength::from_secs(3600),
            description: String::new(),
        }
    }

    #[test]
    fn test_mixes_genre_filter_matches_only_that_genre() {
        let catalog = Catalog::sample();

        let amapiano: Vec<_> = catalog.mixes(Some(Genre::Amapiano)).collect();

        assert_eq!(amapiano.len(), 2);
        assert!(amapiano.iter().all(|m| m.genre == Genre::Amapiano));
    }

    #[test]
    fn test_mixes_no_filter_returns_all_in_id_order() {
        let catalog = Catalog::sample();

        let ids: Vec<u32> = catalog.mixes(None).map(|m| m.id.0).collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_mix_unknown_id_errors() {
        let catalog = Catalog::sample();
        assert_eq!(
            catalog.mix(MixId(99)).unwrap_err(),
            CatalogError::UnknownMix(MixId(99))
        );
    }

    #[test]
    fn test_mixes_by_dj_matches_artist() {
        let catalog = Catalog::sample();

        let svmik = catalog.mixes_by(DjId(1)).unwrap();

        let titles: Vec<&str> = svmik.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Sunset Vibes", "Uhuru Groove"]);
    }

    #[test]
    fn test_record_play_increments() {
        let mut catalog = Catalog::sample();
        let before = catalog.mix(MixId(3)).unwrap().plays;

        let after = catalog.record_play(MixId(3)).unwrap();

        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_on_sale_sold_out_event_errors() {
        let mut catalog = Catalog::sample();
        let id = catalog
            .add_event(NewEvent {
                title: "Tiny Room".into(),
                date: "2025-08-01".into(),
                time: "22:00".into(),
                venue: "Back room".into(),
                price_kes: 500,
                description: String::new(),
                capacity: 1,
            })
            .unwrap();
        catalog.events.get_mut(&id).unwrap().sold = 1;

        assert_eq!(catalog.on_sale(id).unwrap_err(), CatalogError::SoldOut(id));
        assert!(catalog.on_sale(EventId(1)).is_ok());
    }

    #[test]
    fn test_set_event_status_sold_out_stops_sales() {
        let mut catalog = Catalog::sample();

        catalog
            .set_event_status(EventId(2), EventStatus::SoldOut)
            .unwrap();

        assert_eq!(
            catalog.on_sale(EventId(2)).unwrap_err(),
            CatalogError::SoldOut(EventId(2))
        );
        assert!(catalog.set_event_status(EventId(9), EventStatus::OnSale).is_err());
    }

    #[test]
    fn test_add_mix_assigns_next_id() {
        let mut catalog = Catalog::sample();

        let id = catalog.add_mix(new_mix("Late Night")).unwrap();

        assert_eq!(id, MixId(7));
        assert_eq!(catalog.mix(id).unwrap().plays, 0);
    }

    #[test]
    fn test_add_mix_blank_title_rejected() {
        let mut catalog = Catalog::sample();

        let result = catalog.add_mix(new_mix(" "));

        assert!(matches!(result, Err(CatalogError::Invalid { field: "title", .. })));
        assert_eq!(catalog.stats().mix_count, 6);
    }

    #[test]
    fn test_add_to_empty_catalog_starts_at_one() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.add_mix(new_mix("First")).unwrap(), MixId(1));
    }

    #[test]
    fn test_add_mix_after_max_id_errors() {
        let mut catalog = Catalog::new();
        let id = catalog.add_mix(new_mix("First")).unwrap();
        let mut top = catalog.remove_mix(id).unwrap();
        top.id = MixId(u32::MAX);
        let mut catalog = Catalog::from_records(Vec::<Dj>::new(), [top], Vec::<Event>::new());

        let result = catalog.add_mix(new_mix("One Too Many"));

        assert_eq!(result, Err(CatalogError::IdsExhausted("mix")));
        assert_eq!(catalog.stats().mix_count, 1);
    }

    #[test]
    fn test_remove_dj_then_lookup_fails() {
        let mut catalog = Catalog::sample();

        let removed = catalog.remove_dj(DjId(2)).unwrap();

        assert_eq!(removed.name, "WAY$");
        assert!(catalog.dj(DjId(2)).is_err());
        assert!(catalog.remove_dj(DjId(2)).is_err());
    }

    #[test]
    fn test_remove_event_unknown_errors() {
        let mut catalog = Catalog::sample();
        assert_eq!(
            catalog.remove_event(EventId(42)).unwrap_err(),
            CatalogError::UnknownEvent(EventId(42))
        );
    }

    #[test]
    fn test_stats_sample_totals() {
        let stats = Catalog::sample().stats();

        assert_eq!(stats.dj_count, 4);
        assert_eq!(stats.mix_count, 6);
        assert_eq!(stats.event_count, 4);
        assert_eq!(stats.total_plays, 1247 + 2103 + 856 + 1432 + 967 + 1189);
        assert_eq!(stats.tickets_sold, 145 + 287 + 89 + 456);
        assert_eq!(
            stats.ticket_revenue_kes,
            145 * 2500 + 287 * 3000 + 89 * 4000 + 456 * 1500
        );
    }

    #[test]
    fn test_popular_mixes_sorted_by_plays() {
        let catalog = Catalog::sample();

        let top: Vec<&str> = catalog
            .popular_mixes(3)
            .iter()
            .map(|m| m.title.as_str())
            .collect();

        assert_eq!(top, vec!["Amapiano Nights", "Rooftop Sessions", "Sunset Vibes"]);
    }

    #[test]
    fn test_catalog_serde_keeps_records() {
        let catalog = Catalog::sample();

        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();

        assert_eq!(back.stats(), catalog.stats());
    }
}
