//! Memoized milestone extraction for commands that build several charts.
//!
//! The cache is owned by a single command run and keyed by the exact match
//! set (ids in input order) and milestone configuration, so every chart in a
//! report reads the same extracted table.

use std::{collections::HashMap, rc::Rc};

use lawrace_engine::{
    AchievementTable, IntegrityError, MatchId, MatchRecord, MilestoneExtractor, MilestoneSet,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    match_ids: Vec<MatchId>,
    milestones: MilestoneSet,
}

impl CacheKey {
    fn new(matches: &[MatchRecord], milestones: &MilestoneSet) -> Self {
        Self {
            match_ids: matches.iter().map(|m| m.match_id.clone()).collect(),
            milestones: milestones.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AchievementCache {
    entries: HashMap<CacheKey, Rc<AchievementTable>>,
    hits: usize,
    misses: usize,
}

impl AchievementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for this (match set, milestone set), extracting on a miss.
    ///
    /// Match sets are identified by their ids alone, so the cache assumes the
    /// records behind an id do not change while it is alive. Commands create
    /// one cache per run over a single loaded collection.
    ///
    /// Faults are not cached; a repeated call with the same invalid input
    /// fails the same way.
    pub fn get_or_extract(
        &mut self,
        matches: &[MatchRecord],
        milestones: &MilestoneSet,
    ) -> Result<Rc<AchievementTable>, IntegrityError> {
        let key = CacheKey::new(matches, milestones);
        if let Some(table) = self.entries.get(&key) {
            self.hits += 1;
            log::debug!("achievement cache hit ({} matches)", matches.len());
            return Ok(Rc::clone(table));
        }

        self.misses += 1;
        let table = Rc::new(MilestoneExtractor::new(milestones.clone()).extract(matches)?);
        self.entries.insert(key, Rc::clone(&table));
        Ok(table)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use lawrace_engine::{Milestone, PlayerEntry, TurnObservation};

    use super::*;

    fn record(match_id: &str, counter_value: u32) -> MatchRecord {
        MatchRecord {
            match_id: match_id.into(),
            players: vec![PlayerEntry {
                player_id: "p".into(),
                civilization: "Rome".into(),
            }],
            observations: vec![TurnObservation {
                match_id: match_id.into(),
                player_id: "p".into(),
                turn_number: 1,
                counter_value,
            }],
        }
    }

    fn milestones(threshold: u32) -> MilestoneSet {
        MilestoneSet::new(vec![Milestone::new("goal", threshold)]).unwrap()
    }

    #[test]
    fn test_reuses_table_for_same_key() {
        let mut cache = AchievementCache::new();
        let matches = vec![record("m1", 4), record("m2", 1)];
        let first = cache.get_or_extract(&matches, &milestones(4)).unwrap();
        let second = cache.get_or_extract(&matches, &milestones(4)).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_distinct_keys_extract_separately() {
        let mut cache = AchievementCache::new();
        let matches = vec![record("m1", 4), record("m2", 1)];
        let four = cache.get_or_extract(&matches, &milestones(4)).unwrap();
        let one = cache.get_or_extract(&matches, &milestones(1)).unwrap();
        let subset = cache.get_or_extract(&matches[..1], &milestones(4)).unwrap();
        assert!(!Rc::ptr_eq(&four, &one));
        assert_eq!(subset.matches().len(), 1);
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn test_key_is_match_ids_not_contents() {
        let mut cache = AchievementCache::new();
        let first = cache
            .get_or_extract(&[record("m1", 4)], &milestones(4))
            .unwrap();
        let changed = cache
            .get_or_extract(&[record("m1", 1)], &milestones(4))
            .unwrap();
        assert!(Rc::ptr_eq(&first, &changed));
        assert_eq!(cache.hits(), 1);

        let fresh = AchievementCache::new()
            .get_or_extract(&[record("m1", 1)], &milestones(4))
            .unwrap();
        assert!(!fresh.matches()[0].players[0].turns[0].is_reached());
    }

    #[test]
    fn test_faults_are_not_cached() {
        let mut cache = AchievementCache::new();
        let matches = vec![record("m1", 4), record("m1", 5)];
        assert!(cache.get_or_extract(&matches, &milestones(4)).is_err());
        assert!(cache.get_or_extract(&matches, &milestones(4)).is_err());
        assert_eq!(cache.hits(), 0);
    }
}
