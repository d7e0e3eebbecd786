// Player directory: the merged record set, searchable by name.

use std::collections::HashMap;

use crate::model::PlayerRecord;

/// Immutable collection of merged players with an id index.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: Vec<PlayerRecord>,
    index_by_id: HashMap<String, usize>,
}

impl PlayerDirectory {
    /// Ids are expected to be unique (as produced by `merge_players`); if
    /// not, lookups by id return the last record with that id.
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        let index_by_id = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        PlayerDirectory { players, index_by_id }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.index_by_id.get(id.trim()).map(|&i| &self.players[i])
    }

    /// Case-insensitive substring match on name, in directory order.
    ///
    /// An empty query matches nothing. `exclude_id` drops one player from the
    /// results (used when picking a second player to compare against).
    pub fn search(&self, query: &str, exclude_id: Option<&str>) -> Vec<&PlayerRecord> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.players
            .iter()
            .filter(|p| exclude_id != Some(p.id.as_str()))
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Resolve free text to a single player: exact id, then exact name
    /// (ignoring case), then the first substring match.
    pub fn resolve(&self, query: &str) -> Option<&PlayerRecord> {
        if let Some(p) = self.get(query) {
            return Some(p);
        }
        let wanted = query.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.players
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
            .or_else(|| self.search(query.trim(), None).into_iter().next())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.into(),
            name: name.into(),
            team: None,
            impact_score: Some(10.0),
            minutes_per_game: None,
            salary_schedule: None,
        }
    }

    fn directory() -> PlayerDirectory {
        PlayerDirectory::new(vec![
            record("1", "Jalen Brunson"),
            record("2", "Jalen Williams"),
            record("3", "Jaylen Brown"),
            record("4", "Brown Jr."),
        ])
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let dir = directory();
        let names: Vec<&str> = dir.search("JALEN", None).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Jalen Brunson", "Jalen Williams"]);

        let names: Vec<&str> = dir.search("brown", None).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Jaylen Brown", "Brown Jr."]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(directory().search("", None).is_empty());
    }

    #[test]
    fn search_can_exclude_selected_player() {
        let dir = directory();
        let ids: Vec<&str> = dir.search("jalen", Some("1")).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn lookup_by_id() {
        let dir = directory();
        assert_eq!(dir.get("3").map(|p| p.name.as_str()), Some("Jaylen Brown"));
        assert_eq!(dir.get(" 3 ").map(|p| p.name.as_str()), Some("Jaylen Brown"));
        assert!(dir.get("99").is_none());
        assert_eq!(dir.len(), 4);
    }

    #[test]
    fn resolve_prefers_id_then_exact_name() {
        let dir = directory();
        assert_eq!(dir.resolve("2").map(|p| p.id.as_str()), Some("2"));
        assert_eq!(dir.resolve("brown jr.").map(|p| p.id.as_str()), Some("4"));
        assert_eq!(dir.resolve("williams").map(|p| p.id.as_str()), Some("2"));
        assert!(dir.resolve("   ").is_none());
        assert!(dir.resolve("nobody").is_none());
    }
}
