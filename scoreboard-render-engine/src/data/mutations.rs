use bevy::prelude::*;
use thiserror::Error;

use super::detector::{Classification, SolveDetector};
use super::schema::{AccountId, Challenge, ChallengeId, ChallengeRef, Submission, Team, TeamRef};
use super::store::ScoreboardData;
use crate::engine::core::lifecycle::SceneOwned;
use crate::engine::effects::orchestrator::SolveAnimation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSource {
    Poll,
    /// Submission pushed by the embedding page.
    Host,
    /// Synthetic solve used to preview the effect.
    TestTrigger,
}

/// Every change to the scene's data or seen-event set.
#[derive(Event, Debug, Clone)]
pub enum SceneMutation {
    ReplaceChallenges(Vec<Challenge>),
    ReplaceTeams(Vec<Team>),
    SeedHistory(Vec<Submission>),
    Submissions {
        items: Vec<Submission>,
        source: SubmissionSource,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSolve {
    pub team: TeamRef,
    pub challenge: ChallengeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("team {0} is not on the scoreboard")]
    UnknownTeam(AccountId),
    #[error("challenge {0} is not known")]
    UnknownChallenge(ChallengeId),
}

/// Work out which team and challenge a solve refers to, preferring the
/// payloads embedded in the submission over the current lists.
pub fn resolve_solve(
    submission: &Submission,
    data: &ScoreboardData,
) -> Result<ResolvedSolve, ResolutionFailure> {
    let team = match &submission.team {
        Some(team) => team.clone(),
        None => {
            let team = data
                .team(submission.account)
                .ok_or(ResolutionFailure::UnknownTeam(submission.account))?;
            TeamRef {
                account_id: team.account_id,
                name: team
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Team {}", team.account_id)),
            }
        }
    };

    let challenge = match &submission.challenge {
        Some(challenge) => challenge.clone(),
        None => {
            let challenge = data
                .challenge(submission.challenge_id)
                .ok_or(ResolutionFailure::UnknownChallenge(submission.challenge_id))?;
            ChallengeRef {
                id: challenge.id,
                name: challenge.name.clone(),
                value: challenge.value,
            }
        }
    };

    Ok(ResolvedSolve { team, challenge })
}

/// Single writer for scoreboard data and solve detection.
pub fn apply_scene_mutations(
    mut commands: Commands,
    mut events: EventReader<SceneMutation>,
    mut data: ResMut<ScoreboardData>,
    mut detector: ResMut<SolveDetector>,
) {
    for mutation in events.read() {
        match mutation {
            SceneMutation::ReplaceChallenges(challenges) => {
                data.replace_challenges(challenges.clone());
            }
            SceneMutation::ReplaceTeams(teams) => {
                data.replace_teams(teams.clone());
            }
            SceneMutation::SeedHistory(history) => {
                let released = detector.seed(history);
                info!(
                    "Solve detector seeded with {} known solves, {} deferred",
                    detector.seen_len(),
                    released.len()
                );
                for submission in &released {
                    admit_submission(&mut commands, &data, &mut detector, submission);
                }
            }
            SceneMutation::Submissions { items, source } => {
                for submission in items {
                    if !detector.is_seeded() {
                        debug!("Deferring {:?} submission until history is loaded", source);
                        detector.defer(submission.clone());
                        continue;
                    }
                    admit_submission(&mut commands, &data, &mut detector, submission);
                }
            }
        }
    }
}

fn admit_submission(
    commands: &mut Commands,
    data: &ScoreboardData,
    detector: &mut SolveDetector,
    submission: &Submission,
) {
    match detector.classify(submission) {
        Classification::New => match resolve_solve(submission, data) {
            Ok(solve) => {
                info!(
                    "New solve: {} solved {}",
                    solve.team.name, solve.challenge.name
                );
                commands.spawn((
                    Name::new("Solve animation"),
                    SolveAnimation::new(solve),
                    SceneOwned,
                ));
            }
            Err(reason) => warn!("Skipping solve {}: {}", submission.key().as_str(), reason),
        },
        Classification::AlreadySeen | Classification::NotApplicable => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::SubmissionKind;

    fn scoreboard() -> ScoreboardData {
        let mut data = ScoreboardData::default();
        data.replace_challenges(vec![Challenge {
            id: ChallengeId(5),
            name: "sqli-101".into(),
            category: "web".into(),
            value: 100,
            solves: 2,
            description: None,
        }]);
        data.replace_teams(vec![Team {
            account_id: AccountId(1),
            name: Some("kappa".into()),
            score: 300,
        }]);
        data
    }

    fn correct(account: u64, challenge: u64, date: &str) -> Submission {
        Submission {
            kind: SubmissionKind::Correct,
            account: AccountId(account),
            challenge_id: ChallengeId(challenge),
            date: date.into(),
            team: None,
            challenge: None,
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<ScoreboardData>()
            .init_resource::<SolveDetector>()
            .add_event::<SceneMutation>()
            .add_systems(Update, apply_scene_mutations);
        app
    }

    fn animation_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&SolveAnimation>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn resolves_from_current_lists() {
        let solve = resolve_solve(&correct(1, 5, "t"), &scoreboard()).unwrap();
        assert_eq!(solve.team.name, "kappa");
        assert_eq!(solve.challenge.name, "sqli-101");
        assert_eq!(solve.challenge.value, 100);
    }

    #[test]
    fn unknown_entities_fail_resolution() {
        let data = scoreboard();
        assert_eq!(
            resolve_solve(&correct(9, 5, "t"), &data),
            Err(ResolutionFailure::UnknownTeam(AccountId(9)))
        );
        assert_eq!(
            resolve_solve(&correct(1, 8, "t"), &data),
            Err(ResolutionFailure::UnknownChallenge(ChallengeId(8)))
        );
    }

    #[test]
    fn poll_and_host_duplicate_start_one_animation() {
        let mut app = app();
        *app.world_mut().resource_mut::<ScoreboardData>() = scoreboard();
        app.world_mut().send_event(SceneMutation::SeedHistory(Vec::new()));
        app.update();

        let submission = correct(1, 5, "2024-05-01T10:00:00Z");
        app.world_mut().send_event(SceneMutation::Submissions {
            items: vec![submission.clone()],
            source: SubmissionSource::Poll,
        });
        app.world_mut().send_event(SceneMutation::Submissions {
            items: vec![submission],
            source: SubmissionSource::Host,
        });
        app.update();

        assert_eq!(animation_count(&mut app), 1);
    }

    #[test]
    fn submissions_before_history_wait_for_seeding() {
        let mut app = app();
        *app.world_mut().resource_mut::<ScoreboardData>() = scoreboard();

        app.world_mut().send_event(SceneMutation::Submissions {
            items: vec![correct(1, 5, "old"), correct(1, 5, "fresh")],
            source: SubmissionSource::Host,
        });
        app.update();
        assert_eq!(animation_count(&mut app), 0);

        app.world_mut()
            .send_event(SceneMutation::SeedHistory(vec![correct(1, 5, "old")]));
        app.update();
        assert_eq!(animation_count(&mut app), 1);
    }

    #[test]
    fn unresolvable_solve_is_skipped_once() {
        let mut app = app();
        app.world_mut().send_event(SceneMutation::SeedHistory(Vec::new()));
        app.world_mut().send_event(SceneMutation::Submissions {
            items: vec![correct(1, 5, "t")],
            source: SubmissionSource::Poll,
        });
        app.update();

        assert_eq!(animation_count(&mut app), 0);
        assert_eq!(app.world().resource::<SolveDetector>().seen_len(), 1);
    }
}
