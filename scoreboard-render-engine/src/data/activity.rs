use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

pub const MAX_ACTIVITY_ENTRIES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub team: String,
    pub message: String,
    pub time: String,
}

/// Most recent solve activity, newest first.
#[derive(Resource, Default, Debug)]
pub struct ActivityFeed {
    entries: VecDeque<ActivityEntry>,
    next_id: u64,
    revision: u64,
}

impl ActivityFeed {
    pub fn push(&mut self, team: String, message: String, time: String) -> ActivityEntry {
        self.next_id += 1;
        let entry = ActivityEntry {
            id: self.next_id,
            team,
            message,
            time,
        };
        self.entries.push_front(entry.clone());
        self.entries.truncate(MAX_ACTIVITY_ENTRIES);
        self.revision += 1;
        entry
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_twenty() {
        let mut feed = ActivityFeed::default();
        for i in 0..25 {
            feed.push(format!("team{i}"), "Solved x".into(), "12:00".into());
        }
        assert_eq!(feed.len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(feed.latest().map(|e| e.team.as_str()), Some("team24"));
    }
}
