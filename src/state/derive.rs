/// Pure view derivations over the collection
///
/// Filtering, sorting and aggregation never touch the store: they take
/// a snapshot of the records plus the current query parameters and are
/// recomputed whenever either changes.

use std::cmp::Ordering;
use std::fmt;

use super::coin::Coin;

/// How many countries the dashboard distribution shows
const TOP_COUNTRY_LIMIT: usize = 5;

/// Separators that end the primary material in a composition
/// ("Silver / Copper" -> "Silver")
const COMPOSITION_SEPARATORS: &[char] = &['/', ',', ';', '(', '+'];

/// Keys the collection can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Value,
    Year,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Date, SortKey::Value, SortKey::Year, SortKey::Name];
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Date => write!(f, "Date added"),
            SortKey::Value => write!(f, "Value"),
            SortKey::Year => write!(f, "Year"),
            SortKey::Name => write!(f, "Name"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "Ascending"),
            SortOrder::Desc => write!(f, "Descending"),
        }
    }
}

/// Aggregate summary of a collection snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub coin_count: usize,
    pub total_value: f64,
    /// The single most valuable coin; the first one wins on ties
    pub highest: Option<Coin>,
    pub rare_count: usize,
    /// Coins per primary material, in first-encounter order
    pub compositions: Vec<(String, usize)>,
    /// The most represented countries, largest first, at most
    /// TOP_COUNTRY_LIMIT entries, ties kept in encounter order
    pub top_countries: Vec<(String, usize)>,
}

/// Retain coins whose name or country contains the query,
/// case-insensitively. An empty query retains everything.
pub fn filter<'a>(coins: &'a [Coin], query: &str) -> Vec<&'a Coin> {
    let query = query.to_lowercase();
    coins
        .iter()
        .filter(|coin| {
            query.is_empty()
                || coin.name.to_lowercase().contains(&query)
                || coin.country.to_lowercase().contains(&query)
        })
        .collect()
}

/// Order a filtered snapshot in place.
///
/// The sort is stable, so ties keep their existing relative order.
/// Descending is the reversed ascending comparator, not a separately
/// defined order. Coins with an unknown year sort before every known
/// year when ascending.
pub fn sort(coins: &mut [&Coin], key: SortKey, order: SortOrder) {
    coins.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => a.date_added.cmp(&b.date_added),
            SortKey::Value => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Compute the dashboard summary for a collection snapshot.
/// An empty collection yields zero counts and no highest coin.
pub fn aggregate(coins: &[Coin]) -> Aggregates {
    let mut total_value = 0.0;
    let mut rare_count = 0;
    let mut highest: Option<&Coin> = None;
    let mut compositions: Vec<(String, usize)> = Vec::new();
    let mut countries: Vec<(String, usize)> = Vec::new();

    for coin in coins {
        total_value += coin.value;
        if coin.is_rare {
            rare_count += 1;
        }
        if highest.map_or(true, |best| coin.value > best.value) {
            highest = Some(coin);
        }
        count_bucket(&mut compositions, primary_material(&coin.composition));
        count_bucket(&mut countries, display_country(&coin.country));
    }

    // Stable sort keeps encounter order between equal counts
    countries.sort_by(|a, b| b.1.cmp(&a.1));
    countries.truncate(TOP_COUNTRY_LIMIT);

    Aggregates {
        coin_count: coins.len(),
        total_value,
        highest: highest.cloned(),
        rare_count,
        compositions,
        top_countries: countries,
    }
}

/// Primary material of a composition: the text before the first
/// separator, trimmed. Empty compositions group under "Unknown".
pub fn primary_material(composition: &str) -> String {
    let primary = composition
        .split(COMPOSITION_SEPARATORS)
        .next()
        .unwrap_or("")
        .trim();
    if primary.is_empty() {
        "Unknown".to_string()
    } else {
        primary.to_string()
    }
}

fn display_country(country: &str) -> String {
    let country = country.trim();
    if country.is_empty() {
        "Unknown".to_string()
    } else {
        country.to_string()
    }
}

/// Count an occurrence in an encounter-ordered bucket list.
/// Keys match case-insensitively; the first spelling seen is kept
/// for display.
fn count_bucket(buckets: &mut Vec<(String, usize)>, key: String) {
    match buckets
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
    {
        Some(entry) => entry.1 += 1,
        None => buckets.push((key, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(name: &str, country: &str, value: f64, year: Option<i32>) -> Coin {
        Coin {
            id: Coin::new_id(),
            name: name.to_string(),
            country: country.to_string(),
            year,
            denomination: String::new(),
            value,
            composition: String::new(),
            description: String::new(),
            condition: String::new(),
            is_rare: false,
            rarity_details: String::new(),
            date_added: 0,
            front_image_url: String::new(),
            back_image_url: String::new(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_filter_matches_name_or_country() {
        let coins = vec![
            coin("Morgan Dollar", "United States", 40.0, Some(1921)),
            coin("Sovereign", "United Kingdom", 500.0, Some(1901)),
            coin("Drachma", "Greece", 12.0, None),
        ];

        let matched = filter(&coins, "united");
        assert_eq!(matched.len(), 2);

        let matched = filter(&coins, "DRACH");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Drachma");
    }

    #[test]
    fn test_empty_query_retains_all() {
        let coins = vec![
            coin("A", "X", 1.0, None),
            coin("B", "Y", 2.0, None),
        ];

        let matched = filter(&coins, "");
        assert_eq!(matched.len(), coins.len());
    }

    #[test]
    fn test_value_desc_is_reversed_asc() {
        let coins = vec![
            coin("A", "", 5.0, None),
            coin("B", "", 20.0, None),
            coin("C", "", 1.0, None),
        ];

        let mut asc: Vec<&Coin> = coins.iter().collect();
        sort(&mut asc, SortKey::Value, SortOrder::Asc);
        asc.reverse();

        let mut desc: Vec<&Coin> = coins.iter().collect();
        sort(&mut desc, SortKey::Value, SortOrder::Desc);

        let asc_names: Vec<&str> = asc.iter().map(|c| c.name.as_str()).collect();
        let desc_names: Vec<&str> = desc.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(asc_names, desc_names);
    }

    #[test]
    fn test_unknown_year_sorts_first_ascending() {
        let coins = vec![
            coin("Known old", "", 1.0, Some(-50)),
            coin("Unknown", "", 1.0, None),
            coin("Known new", "", 1.0, Some(2001)),
        ];

        let mut snapshot: Vec<&Coin> = coins.iter().collect();
        sort(&mut snapshot, SortKey::Year, SortOrder::Asc);

        assert_eq!(snapshot[0].name, "Unknown");
        assert_eq!(snapshot[1].name, "Known old");
        assert_eq!(snapshot[2].name, "Known new");
    }

    #[test]
    fn test_value_ties_keep_prior_arrangement() {
        // A(5, 1990), B(20, unknown), C(20, 2001)
        let coins = vec![
            coin("A", "", 5.0, Some(1990)),
            coin("B", "", 20.0, None),
            coin("C", "", 20.0, Some(2001)),
        ];

        let mut by_value: Vec<&Coin> = coins.iter().collect();
        sort(&mut by_value, SortKey::Value, SortOrder::Desc);
        let names: Vec<&str> = by_value.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);

        let mut by_year: Vec<&Coin> = coins.iter().collect();
        sort(&mut by_year, SortKey::Year, SortOrder::Asc);
        let names: Vec<&str> = by_year.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let coins = vec![
            coin("denarius", "", 1.0, None),
            coin("Aureus", "", 1.0, None),
            coin("sestertius", "", 1.0, None),
        ];

        let mut snapshot: Vec<&Coin> = coins.iter().collect();
        sort(&mut snapshot, SortKey::Name, SortOrder::Asc);

        let names: Vec<&str> = snapshot.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aureus", "denarius", "sestertius"]);
    }

    #[test]
    fn test_aggregate_empty_collection() {
        let stats = aggregate(&[]);

        assert_eq!(stats.coin_count, 0);
        assert_eq!(stats.total_value, 0.0);
        assert_eq!(stats.highest, None);
        assert_eq!(stats.rare_count, 0);
        assert!(stats.compositions.is_empty());
        assert!(stats.top_countries.is_empty());
    }

    #[test]
    fn test_highest_keeps_first_of_ties() {
        let coins = vec![
            coin("First", "", 20.0, None),
            coin("Second", "", 20.0, None),
            coin("Cheap", "", 1.0, None),
        ];

        let stats = aggregate(&coins);
        assert_eq!(stats.highest.unwrap().name, "First");
        assert_eq!(stats.total_value, 41.0);
    }

    #[test]
    fn test_rare_count() {
        let mut rare = coin("Rare one", "", 1.0, None);
        rare.is_rare = true;
        let coins = vec![rare, coin("Common", "", 1.0, None)];

        assert_eq!(aggregate(&coins).rare_count, 1);
    }

    #[test]
    fn test_primary_material() {
        assert_eq!(primary_material("Silver / Copper"), "Silver");
        assert_eq!(primary_material("Gold, 22k"), "Gold");
        assert_eq!(primary_material("Bronze (early issue)"), "Bronze");
        assert_eq!(primary_material("  Nickel  "), "Nickel");
        assert_eq!(primary_material(""), "Unknown");
    }

    #[test]
    fn test_composition_distribution_groups_case_insensitively() {
        let mut a = coin("A", "", 1.0, None);
        a.composition = "Silver / Copper".to_string();
        let mut b = coin("B", "", 1.0, None);
        b.composition = "silver".to_string();
        let mut c = coin("C", "", 1.0, None);
        c.composition = "Gold".to_string();

        let stats = aggregate(&[a, b, c]);
        assert_eq!(
            stats.compositions,
            vec![("Silver".to_string(), 2), ("Gold".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_countries_truncates_to_five() {
        let mut coins = Vec::new();
        for (country, count) in [
            ("France", 1),
            ("Greece", 3),
            ("Italy", 2),
            ("Japan", 2),
            ("Kenya", 1),
            ("Peru", 4),
        ] {
            for _ in 0..count {
                coins.push(coin("x", country, 1.0, None));
            }
        }

        let stats = aggregate(&coins);
        assert_eq!(stats.top_countries.len(), 5);
        assert_eq!(stats.top_countries[0], ("Peru".to_string(), 4));
        assert_eq!(stats.top_countries[1], ("Greece".to_string(), 3));
        // Italy and Japan tie; encounter order breaks it
        assert_eq!(stats.top_countries[2], ("Italy".to_string(), 2));
        assert_eq!(stats.top_countries[3], ("Japan".to_string(), 2));
        // France and Kenya tie for the last slot; France was seen first
        assert_eq!(stats.top_countries[4], ("France".to_string(), 1));
    }
}
