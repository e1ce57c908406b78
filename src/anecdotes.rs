//! Static country anecdote table
//!
//! The table is fixed at compile time and never mutated. Iteration
//! order is declaration order, which also defines detection order.

/// One entry in the anecdote table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnecdoteEntry {
    /// Country name, unique key
    pub country: &'static str,
    /// Capital city name
    pub capital: &'static str,
    /// The fact read aloud for this country
    pub anecdote: &'static str,
    /// Lowercase two-letter ISO code, used for flag images
    pub iso_code: &'static str,
}

/// An anecdote joined with its country key for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAnecdote {
    pub country: String,
    pub capital: String,
    pub anecdote: String,
    pub iso_code: String,
}

impl From<&AnecdoteEntry> for DisplayAnecdote {
    fn from(entry: &AnecdoteEntry) -> Self {
        Self {
            country: entry.country.to_string(),
            capital: entry.capital.to_string(),
            anecdote: entry.anecdote.to_string(),
            iso_code: entry.iso_code.to_string(),
        }
    }
}

/// URL template base for flag images
const FLAG_URL_BASE: &str = "https://flagcdn.com/w40";

/// The anecdote table
pub static ANECDOTES: &[AnecdoteEntry] = &[
    AnecdoteEntry {
        country: "Germany",
        capital: "Berlin",
        anecdote: "Berlin has more bridges than Venice, with an estimated 1,700 of them.",
        iso_code: "de",
    },
    AnecdoteEntry {
        country: "Russia",
        capital: "Moscow",
        anecdote: "The Moscow Kremlin is the largest active medieval fortress in the world.",
        iso_code: "ru",
    },
    AnecdoteEntry {
        country: "England",
        capital: "London",
        anecdote: "London is the first city to have hosted the Summer Olympics three times.",
        iso_code: "gb",
    },
    AnecdoteEntry {
        country: "United States",
        capital: "Washington, D.C.",
        anecdote: "Washington, D.C. was the first planned capital in the United States.",
        iso_code: "us",
    },
    AnecdoteEntry {
        country: "France",
        capital: "Paree",
        anecdote: "The Eiffel Tower can be 15 cm taller during the summer.",
        iso_code: "fr",
    },
    AnecdoteEntry {
        country: "Japan",
        capital: "Tokyo",
        anecdote: "Tokyo is the world's most populous metropolitan area.",
        iso_code: "jp",
    },
    AnecdoteEntry {
        country: "Luxembourg",
        capital: "Luxembourg City",
        anecdote: "It is the only remaining Grand Duchy in the world.",
        iso_code: "lu",
    },
    AnecdoteEntry {
        country: "Burkina Faso",
        capital: "Ouagadougou",
        anecdote: "Its name translates to \"Land of Incorruptible People\".",
        iso_code: "bf",
    },
    AnecdoteEntry {
        country: "Bhutan",
        capital: "Thimphu",
        anecdote: "It is the only country in the world to measure progress by Gross National Happiness.",
        iso_code: "bt",
    },
    AnecdoteEntry {
        country: "Kyrgyzstan",
        capital: "Bishkek",
        anecdote: "Bishkek is one of the greenest cities in Central Asia.",
        iso_code: "kg",
    },
    AnecdoteEntry {
        country: "Palestine",
        capital: "Ramallah",
        anecdote: "Ramallah hosts a vibrant cultural scene and is known for its many international music and film festivals.",
        iso_code: "ps",
    },
    AnecdoteEntry {
        country: "Samoa",
        capital: "Apia",
        anecdote: "In Samoa, it is considered a sign of respect to raise your eyebrows to say yes.",
        iso_code: "ws",
    },
];

/// Look up a table entry by country name
#[must_use]
pub fn lookup(country: &str) -> Option<&'static AnecdoteEntry> {
    ANECDOTES.iter().find(|e| e.country == country)
}

/// Flag image URL for an ISO code
#[must_use]
pub fn flag_url(iso_code: &str) -> String {
    format!("{FLAG_URL_BASE}/{iso_code}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_country_keys_unique() {
        let keys: HashSet<_> = ANECDOTES.iter().map(|e| e.country).collect();
        assert_eq!(keys.len(), ANECDOTES.len());
    }

    #[test]
    fn test_iso_codes_well_formed() {
        for entry in ANECDOTES {
            assert_eq!(entry.iso_code.len(), 2, "{}", entry.country);
            assert!(
                entry.iso_code.chars().all(|c| c.is_ascii_lowercase()),
                "{}",
                entry.country
            );
        }
    }

    #[test]
    fn test_entries_complete() {
        for entry in ANECDOTES {
            assert!(!entry.capital.is_empty());
            assert!(!entry.anecdote.is_empty());
        }
    }

    #[test]
    fn test_lookup() {
        let entry = lookup("Japan").unwrap();
        assert_eq!(entry.capital, "Tokyo");
        assert_eq!(entry.iso_code, "jp");

        assert!(lookup("Atlantis").is_none());
    }

    #[test]
    fn test_flag_url() {
        assert_eq!(flag_url("de"), "https://flagcdn.com/w40/de.png");
    }
}
