//! Static mock catalog
//!
//! The catalog provider returns fixed in-memory listings. Entries are
//! rebuilt on every call and never mutated.

use crate::types::{Cinema, Money, Movie, MovieId};

/// Number of promotional posters in the home carousel
pub const POSTER_COUNT: usize = 4;

/// The movies currently showing
#[must_use]
pub fn movies() -> Vec<Movie> {
    vec![
        Movie {
            id: MovieId::new(1),
            title: "Space Movie".to_string(),
            duration_min: 181,
            genres: vec![
                "Action".to_string(),
                "Sci-Fi".to_string(),
                "Adventure".to_string(),
            ],
            rating: 4.8,
            plot: "A movie about a man stuck in spcae".to_string(),
            poster: "posters/space_movie.png".to_string(),
            seat_price: Money::ugx(20_000),
        },
        Movie {
            id: MovieId::new(2),
            title: "The Batman".to_string(),
            duration_min: 122,
            genres: vec!["Drama".to_string(), "Crime".to_string()],
            rating: 4.7,
            plot: "The Riddler plays a dangerous game of cat and mouse with Batman."
                .to_string(),
            poster: "posters/the_batman.png".to_string(),
            seat_price: Money::ugx(18_500),
        },
        Movie {
            id: MovieId::new(3),
            title: "Dune".to_string(),
            duration_min: 134,
            genres: vec!["Action".to_string(), "Fantasy".to_string()],
            rating: 4.6,
            plot: "A noble family becomes embroiled in a war for a desert planet."
                .to_string(),
            poster: "posters/dune.png".to_string(),
            seat_price: Money::ugx(19_000),
        },
    ]
}

/// Look up a movie by its catalog ID
#[must_use]
pub fn movie(id: MovieId) -> Option<Movie> {
    movies().into_iter().find(|m| m.id == id)
}

/// The cinemas near the user
#[must_use]
pub fn cinemas() -> Vec<Cinema> {
    vec![
        Cinema {
            name: "Cinema City".to_string(),
            location: "Kampala Rd".to_string(),
            distance_km: 2.5,
            screens: 3,
        },
        Cinema {
            name: "SilverScreens".to_string(),
            location: "Garden City".to_string(),
            distance_km: 3.1,
            screens: 5,
        },
        Cinema {
            name: "Sunset Cinemas".to_string(),
            location: "Acacia Mall".to_string(),
            distance_km: 4.1,
            screens: 4,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_three_movies() {
        let listing = movies();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].title, "Space Movie");
        assert_eq!(listing[0].seat_price, Money::ugx(20_000));
        assert_eq!(listing[1].seat_price, Money::ugx(18_500));
        assert_eq!(listing[2].seat_price, Money::ugx(19_000));
    }

    #[test]
    fn movie_lookup_by_id() {
        let found = movie(MovieId::new(2));
        assert!(matches!(found, Some(m) if m.title == "The Batman"));
        assert!(movie(MovieId::new(99)).is_none());
    }

    #[test]
    fn catalog_has_three_cinemas() {
        let venues = cinemas();
        assert_eq!(venues.len(), 3);
        assert_eq!(venues[0].name, "Cinema City");
        assert_eq!(venues[1].screens, 5);
    }
}
