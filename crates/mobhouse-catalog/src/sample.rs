//! The collective's launch lineup: four DJs, six mixes and four events.

use mobhouse_protocol::{DjId, EventId, MixId};

use crate::{Catalog, Dj, Event, EventStatus, Genre, Mix, MixLength};

impl Catalog {
    /// A catalog seeded with the site's published lineup.
    pub fn sample() -> Self {
        Self::from_records(sample_djs(), sample_mixes(), sample_events())
    }
}

fn dj(id: u32, name: &str, bio: &str, specialties: [&str; 2]) -> Dj {
    Dj {
        id: DjId(id),
        name: name.into(),
        bio: bio.into(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
    }
}

fn sample_djs() -> Vec<Dj> {
    vec![
        dj(
            1,
            "SVMIK",
            "Master of Afro House with over 8 years of experience spinning the decks \
             across Nairobi's hottest venues. Known for his electrifying rooftop sets \
             that blend traditional African rhythms with modern house beats.",
            ["Afro House", "Deep House"],
        ),
        dj(
            2,
            "WAY$",
            "Amapiano pioneer bringing the authentic South African sound to Kenya's \
             vibrant music scene. Her sets create an irresistible groove that keeps \
             the dance floor moving all night long.",
            ["Amapiano", "Afro Tech"],
        ),
        dj(
            3,
            "DERIQ",
            "Tribal House specialist with a deep understanding of percussion and \
             rhythm. Creates hypnotic journeys through sound that connect listeners \
             to their African roots.",
            ["Tribal House", "Afro Beats"],
        ),
        dj(
            4,
            "ZHåI",
            "The versatile mixer who seamlessly blends all genres with a distinctly \
             Kenyan flavor. Known for reading the crowd and creating unforgettable \
             musical experiences at Nairobi's outdoor events.",
            ["All Genres", "Live Mixing"],
        ),
    ]
}

fn mix(
    id: u32,
    title: &str,
    artist: &str,
    genre: Genre,
    (min, sec): (u32, u32),
    plays: u64,
    description: &str,
) -> Mix {
    Mix {
        id: MixId(id),
        title: title.into(),
        artist: artist.into(),
        genre,
        length: MixLength::from_secs(min * 60 + sec),
        plays,
        description: description.into(),
    }
}

fn sample_mixes() -> Vec<Mix> {
    vec![
        mix(
            1,
            "Sunset Vibes",
            "SVMIK",
            Genre::AfroHouse,
            (45, 30),
            1247,
            "A journey through the golden hour with deep Afro House beats and \
             Nairobi skyline vibes",
        ),
        mix(
            2,
            "Amapiano Nights",
            "WAY$",
            Genre::Amapiano,
            (52, 15),
            2103,
            "South African groove meets Kenyan soul in this infectious Amapiano journey",
        ),
        mix(
            3,
            "Tribal Rhythms",
            "DERIQ",
            Genre::TribalHouse,
            (38, 45),
            856,
            "Deep percussive elements and ancestral beats for the modern dancefloor",
        ),
        mix(
            4,
            "Rooftop Sessions",
            "ZHåI",
            Genre::AfroHouse,
            (41, 20),
            1432,
            "Live from Westlands: the energy of Nairobi's rooftop scene captured",
        ),
        mix(
            5,
            "Uhuru Groove",
            "SVMIK",
            Genre::AfroHouse,
            (48, 10),
            967,
            "Named after Nairobi's iconic gardens: freedom through music",
        ),
        mix(
            6,
            "Karen Sessions",
            "WAY$",
            Genre::Amapiano,
            (44, 55),
            1189,
            "Exclusive vibes from Karen Country Club's intimate setting",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn event(
    id: u32,
    title: &str,
    (date, time): (&str, &str),
    venue: &str,
    price_kes: u32,
    status: EventStatus,
    description: &str,
    (capacity, sold): (u32, u32),
) -> Event {
    Event {
        id: EventId(id),
        title: title.into(),
        date: date.into(),
        time: time.into(),
        venue: venue.into(),
        price_kes,
        status,
        description: description.into(),
        capacity,
        sold,
    }
}

fn sample_events() -> Vec<Event> {
    vec![
        event(
            1,
            "Rooftop Sunset Sessions",
            ("2025-06-15", "18:00"),
            "Sky Lounge, Westlands, Nairobi",
            2500,
            EventStatus::OnSale,
            "Experience the magic of Afro House as the sun sets over Nairobi's \
             skyline. An unforgettable evening of music and vibes.",
            (200, 145),
        ),
        event(
            2,
            "Amapiano Night Live",
            ("2025-06-22", "20:00"),
            "Garden City Mall Amphitheater, Nairobi",
            3000,
            EventStatus::EarlyBird,
            "Dance the night away to the hottest Amapiano beats in an outdoor \
             setting with Kenya's finest DJs.",
            (500, 287),
        ),
        event(
            3,
            "Tribal House Experience",
            ("2025-07-05", "19:00"),
            "Karen Country Club, Nairobi",
            4000,
            EventStatus::VipAvailable,
            "Immerse yourself in deep tribal rhythms in an exclusive venue. A \
             premium experience for true house music lovers.",
            (150, 89),
        ),
        event(
            4,
            "Monthly Mix Marathon",
            ("2025-07-18", "15:00"),
            "Uhuru Gardens, Nairobi",
            1500,
            EventStatus::OnSale,
            "6-hour outdoor festival featuring all Mob House DJs back-to-back. The \
             ultimate celebration of Kenyan house music.",
            (1000, 456),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_every_mix_artist_is_a_dj() {
        let catalog = Catalog::sample();
        for mix in catalog.mixes(None) {
            assert!(
                catalog.djs().any(|dj| dj.name == mix.artist),
                "{} has no DJ profile",
                mix.artist
            );
        }
    }

    #[test]
    fn test_sample_no_event_is_sold_out() {
        let catalog = Catalog::sample();
        assert!(catalog.events().all(|e| !e.is_sold_out()));
        assert_eq!(catalog.event(EventId(3)).unwrap().tickets_left(), 61);
    }

    #[test]
    fn test_sample_mix_lengths_display_like_the_site() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.mix(MixId(2)).unwrap().length.to_string(), "52:15");
    }
}
