//! Episode-level metrics accumulation and export
//!
//! The wrapper updates one [`EpisodeMetrics`] record incrementally each
//! step; an external collector reads or persists it on demand, one record
//! per completed episode.

use std::{fs::File, io::Write, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Counters accumulated over one episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    /// Ticks survived
    pub time_alive: usize,

    /// Enemies killed (each enemy counted exactly once)
    pub enemies_killed: usize,

    /// Hit points lost to enemy contact
    pub damage_taken: u32,

    /// Rooms visited, including the starting room
    pub rooms_visited: usize,

    /// Shoot actions taken
    pub shots_fired: usize,

    /// 1 if the player died this episode, else 0
    pub deaths: usize,
}

impl EpisodeMetrics {
    /// Fresh accumulator for a new episode
    pub fn new(rooms_visited: usize) -> Self {
        Self { rooms_visited, ..Self::default() }
    }

    /// Serialize to a pretty-printed JSON record
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the record to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let metrics = EpisodeMetrics {
            time_alive: 200,
            enemies_killed: 7,
            damage_taken: 4,
            rooms_visited: 3,
            shots_fired: 52,
            deaths: 0,
        };

        let json = metrics.to_json().unwrap();
        let parsed: EpisodeMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metrics);
    }

    #[test]
    fn test_json_record_keys() {
        let json = EpisodeMetrics::new(1).to_json().unwrap();
        for key in
            ["time_alive", "enemies_killed", "damage_taken", "rooms_visited", "shots_fired", "deaths"]
        {
            assert!(json.contains(key), "metrics record must contain key {key}");
        }
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode_metrics.json");

        let metrics = EpisodeMetrics::new(2);
        metrics.save_json(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: EpisodeMetrics = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.rooms_visited, 2);
    }
}
