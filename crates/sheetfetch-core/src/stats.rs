//! Dataset recognition for the stats command.
//!
//! Plugins are compiled in and consulted in a fixed priority order; the
//! first one whose `matches` accepts the profile wins.

/// Table and column names of a staged dataset, lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataProfile {
    pub tables: Vec<String>,
    pub columns: Vec<String>,
}

impl DataProfile {
    pub fn new<T, C>(tables: T, columns: C) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            tables: tables.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
            columns: columns.into_iter().map(|c| c.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

pub trait StatsPlugin: Sync {
    fn name(&self) -> &'static str;
    /// Short description of what the plugin recognizes.
    fn describe(&self) -> &'static str;
    fn matches(&self, profile: &DataProfile) -> bool;
}

pub struct ImdbStats;

impl StatsPlugin for ImdbStats {
    fn name(&self) -> &'static str {
        "imdb"
    }

    fn describe(&self) -> &'static str {
        "IMDB data (title_basics table or an imdb* table)"
    }

    fn matches(&self, profile: &DataProfile) -> bool {
        profile.has_table("title_basics") || profile.tables.iter().any(|t| t.contains("imdb"))
    }
}

pub struct CricketStats;

const CRICKET_COLUMNS: [&str; 3] = ["match_type", "striker", "batting_team"];

impl StatsPlugin for CricketStats {
    fn name(&self) -> &'static str {
        "cricket"
    }

    fn describe(&self) -> &'static str {
        "ball-by-ball cricket data (match_type, striker or batting_team column)"
    }

    fn matches(&self, profile: &DataProfile) -> bool {
        CRICKET_COLUMNS.iter().any(|c| profile.has_column(c))
    }
}

/// Registered plugins, highest priority first.
pub static PLUGINS: &[&dyn StatsPlugin] = &[&ImdbStats, &CricketStats];

pub fn select_plugin(profile: &DataProfile) -> Option<&'static dyn StatsPlugin> {
    let found = PLUGINS.iter().copied().find(|p| p.matches(profile));
    tracing::debug!(plugin = found.map(|p| p.name()), "stats plugin selection");
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imdb_by_table() {
        let p = DataProfile::new(["Title_Basics"], Vec::<String>::new());
        assert_eq!(select_plugin(&p).unwrap().name(), "imdb");
        let p = DataProfile::new(["my_IMDB_ratings"], Vec::<String>::new());
        assert_eq!(select_plugin(&p).unwrap().name(), "imdb");
    }

    #[test]
    fn cricket_by_column() {
        let p = DataProfile::new(["deliveries"], ["Match_ID", "Striker", "runs"]);
        assert_eq!(select_plugin(&p).unwrap().name(), "cricket");
    }

    #[test]
    fn imdb_wins_over_cricket() {
        let p = DataProfile::new(["title_basics"], ["batting_team"]);
        assert_eq!(select_plugin(&p).unwrap().name(), "imdb");
    }

    #[test]
    fn no_match() {
        let p = DataProfile::new(["sales"], ["region", "amount"]);
        assert!(select_plugin(&p).is_none());
    }
}
