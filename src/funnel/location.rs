//! Static city table: place name → population → location tier.

use serde::Serialize;

use super::rates::LocationTier;

/// Maximum number of suggestions returned by [`search`].
pub const MAX_SEARCH_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub state: &'static str,
    pub population: u64,
    pub tier: LocationTier,
}

impl City {
    /// Display label, e.g. "Joinville - SC".
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.state)
    }
}

/// Result of classifying a place name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: LocationTier,
    /// Display-only.
    pub population: u64,
}

pub const CITIES: &[City] = &[
    City { name: "Florianópolis", state: "SC", population: 516_524, tier: LocationTier::Capital },
    City { name: "São Paulo", state: "SP", population: 12_325_232, tier: LocationTier::Capital },
    City { name: "Joinville", state: "SC", population: 597_658, tier: LocationTier::Large },
    City { name: "Blumenau", state: "SC", population: 361_855, tier: LocationTier::Large },
    City { name: "Chapecó", state: "SC", population: 224_013, tier: LocationTier::Medium },
    City { name: "Lages", state: "SC", population: 157_743, tier: LocationTier::Small },
    City { name: "Tubarão", state: "SC", population: 107_339, tier: LocationTier::Small },
    City { name: "Curitiba", state: "PR", population: 1_963_726, tier: LocationTier::Capital },
    City { name: "Porto Alegre", state: "RS", population: 1_492_530, tier: LocationTier::Capital },
];

/// Look up a place by city name or "Name - ST" label.
///
/// Matching ignores case, surrounding whitespace and Portuguese accents.
pub fn classify(place_name: &str) -> Option<Classification> {
    find(place_name).map(|city| Classification {
        tier: city.tier,
        population: city.population,
    })
}

/// Look up the full table row for a place name.
pub fn find(place_name: &str) -> Option<&'static City> {
    let wanted = fold(place_name);
    if wanted.is_empty() {
        return None;
    }
    CITIES
        .iter()
        .find(|city| fold(city.name) == wanted || fold(&city.label()) == wanted)
}

/// Substring search on city name or state, in table order.
pub fn search(query: &str) -> Vec<&'static City> {
    let needle = fold(query);
    if needle.is_empty() {
        return Vec::new();
    }
    CITIES
        .iter()
        .filter(|city| fold(city.name).contains(&needle) || fold(city.state).contains(&needle))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

/// Lowercase and strip the accents used in Brazilian place names.
fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
