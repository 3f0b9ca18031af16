//! Snapshot Output
//!
//! Writes the end-of-run town state as pretty JSON.

use std::fs;
use std::path::Path;

use town_events::TownSnapshot;

/// Write snapshot to file, creating parent directories
pub fn write_snapshot(snapshot: &TownSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    crate::ensure_parent(path)?;
    let json = snapshot.to_json_pretty()?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_snapshot(path: impl AsRef<Path>) -> std::io::Result<TownSnapshot> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_events::{AgentSnapshot, Hour, SimTimestamp};

    #[test]
    fn test_snapshot_written_to_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("snapshot.json");
        let snapshot = TownSnapshot {
            run_id: "run_abc".to_string(),
            timestamp: SimTimestamp::new(3, Hour(11)),
            agents: vec![AgentSnapshot {
                name: "Ann".to_string(),
                description: "a baker".to_string(),
                location: "Cafe".to_string(),
                plans: "bake".to_string(),
                memory_count: 2,
                place_ratings: Vec::new(),
            }],
            locations: Vec::new(),
        };

        write_snapshot(&snapshot, &path).unwrap();
        let parsed = read_snapshot(&path).unwrap();

        assert_eq!(parsed.run_id, "run_abc");
        assert_eq!(parsed.timestamp.hour, Hour(11));
        assert_eq!(parsed.agent("Ann").map(|a| a.location.as_str()), Some("Cafe"));
    }
}
