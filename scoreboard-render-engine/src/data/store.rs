use bevy::prelude::*;

use super::schema::{AccountId, Challenge, ChallengeId, Team};

/// Latest challenge and team lists as seen by the scene.
///
/// Each list carries a revision that bumps on every replacement so node
/// synchronisation only runs after a list actually changed.
#[derive(Resource, Default, Debug)]
pub struct ScoreboardData {
    challenges: Vec<Challenge>,
    teams: Vec<Team>,
    challenge_revision: u64,
    team_revision: u64,
}

impl ScoreboardData {
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn challenge_revision(&self) -> u64 {
        self.challenge_revision
    }

    pub fn team_revision(&self) -> u64 {
        self.team_revision
    }

    pub fn challenge(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn team(&self, account: AccountId) -> Option<&Team> {
        self.teams.iter().find(|t| t.account_id == account)
    }

    pub fn replace_challenges(&mut self, challenges: Vec<Challenge>) {
        self.challenges = challenges;
        self.challenge_revision += 1;
    }

    pub fn replace_teams(&mut self, teams: Vec<Team>) {
        self.teams = teams;
        self.team_revision += 1;
    }

    /// Count a freshly animated solve until the next poll overwrites the
    /// value with the server's own count. Returns the new count.
    pub fn record_solve(&mut self, id: ChallengeId) -> Option<u64> {
        let challenge = self.challenges.iter_mut().find(|c| c.id == id)?;
        challenge.solves += 1;
        Some(challenge.solves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(id: u64, solves: u64) -> Challenge {
        Challenge {
            id: ChallengeId(id),
            name: format!("c{id}"),
            category: "web".into(),
            value: 100,
            solves,
            description: None,
        }
    }

    #[test]
    fn replacing_bumps_revision() {
        let mut data = ScoreboardData::default();
        data.replace_challenges(vec![challenge(1, 0)]);
        data.replace_challenges(vec![challenge(1, 0)]);
        assert_eq!(data.challenge_revision(), 2);
        assert_eq!(data.team_revision(), 0);
    }

    #[test]
    fn record_solve_increments_known_challenge_only() {
        let mut data = ScoreboardData::default();
        data.replace_challenges(vec![challenge(1, 4)]);
        assert_eq!(data.record_solve(ChallengeId(1)), Some(5));
        assert_eq!(data.record_solve(ChallengeId(9)), None);
        assert_eq!(data.challenge(ChallengeId(1)).map(|c| c.solves), Some(5));
    }
}
