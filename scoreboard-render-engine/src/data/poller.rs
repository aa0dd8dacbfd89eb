use std::collections::HashSet;
use std::time::Duration;

use bevy::prelude::*;
use serde::de::DeserializeOwned;

use super::backend::{Backend, Endpoint, FetchError, FetchOutcome, FetchQueue};
use super::mutations::{SceneMutation, SubmissionSource};
use super::schema::{
    ChallengeRecord, Envelope, SubmissionRecord, TeamRecord, Validate, Validated, decode_all,
};
use crate::engine::core::app_state::LoadingProgress;

/// Fixed-interval poll timer. The first tick after creation is always due
/// so the scene fills as soon as the engine is running.
#[derive(Resource)]
pub struct PollSchedule {
    timer: Timer,
    primed: bool,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            primed: false,
        }
    }

    pub fn due(&mut self, delta: Duration) -> bool {
        if !self.primed {
            self.primed = true;
            return true;
        }
        self.timer.tick(delta).just_finished()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    NotRequested,
    Requested,
    Loaded,
}

#[derive(Resource, Default, Debug)]
pub struct PollState {
    in_flight: HashSet<Endpoint>,
    history: HistoryState,
}

impl PollState {
    pub fn history(&self) -> HistoryState {
        self.history
    }

    pub fn is_in_flight(&self, endpoint: Endpoint) -> bool {
        self.in_flight.contains(&endpoint)
    }

    /// Issue a request unless the previous one for the endpoint has not
    /// answered yet.
    fn dispatch(&mut self, backend: &Backend, queue: &FetchQueue, endpoint: Endpoint) {
        if self.in_flight.insert(endpoint) {
            backend.0.request(endpoint, queue.sink());
        } else {
            debug!("Skipping {:?} poll, previous request still pending", endpoint);
        }
    }
}

pub fn schedule_polls(
    time: Res<Time>,
    schedule: Option<ResMut<PollSchedule>>,
    backend: Option<Res<Backend>>,
    queue: Res<FetchQueue>,
    mut state: ResMut<PollState>,
) {
    let (Some(mut schedule), Some(backend)) = (schedule, backend) else {
        return;
    };
    if !schedule.due(time.delta()) {
        return;
    }

    state.dispatch(&backend, &queue, Endpoint::Challenges);
    state.dispatch(&backend, &queue, Endpoint::Scoreboard);

    // Periodic submissions only make sense once history has been seeded.
    if state.history == HistoryState::Loaded {
        state.dispatch(&backend, &queue, Endpoint::Submissions);
    }
}

pub fn drain_fetch_results(
    queue: Res<FetchQueue>,
    backend: Option<Res<Backend>>,
    mut state: ResMut<PollState>,
    mut progress: ResMut<LoadingProgress>,
    mut mutations: EventWriter<SceneMutation>,
) {
    for FetchOutcome { endpoint, result } in queue.take() {
        state.in_flight.remove(&endpoint);

        match endpoint {
            Endpoint::Challenges => {
                progress.challenges_answered = true;
                match decode_batch::<ChallengeRecord>(result) {
                    Ok(batch) => {
                        mutations.write(SceneMutation::ReplaceChallenges(batch));
                    }
                    Err(err) => warn!("Challenge poll failed, keeping current nodes: {}", err),
                }
            }
            Endpoint::Scoreboard => {
                progress.scoreboard_answered = true;
                match decode_batch::<TeamRecord>(result) {
                    Ok(batch) => {
                        mutations.write(SceneMutation::ReplaceTeams(batch));

                        if state.history == HistoryState::NotRequested {
                            if let Some(backend) = backend.as_deref() {
                                state.history = HistoryState::Requested;
                                state.dispatch(backend, &queue, Endpoint::SubmissionHistory);
                            }
                        }
                    }
                    Err(err) => warn!("Scoreboard poll failed, keeping current nodes: {}", err),
                }
            }
            Endpoint::SubmissionHistory => match decode_batch::<SubmissionRecord>(result) {
                Ok(batch) => {
                    info!("Seeding solve history with {} submissions", batch.len());
                    state.history = HistoryState::Loaded;
                    mutations.write(SceneMutation::SeedHistory(batch));
                }
                Err(err) => {
                    warn!("Submission history failed, retrying after next scoreboard poll: {}", err);
                    state.history = HistoryState::NotRequested;
                }
            },
            Endpoint::Submissions => match decode_batch::<SubmissionRecord>(result) {
                Ok(batch) => {
                    mutations.write(SceneMutation::Submissions {
                        items: batch,
                        source: SubmissionSource::Poll,
                    });
                }
                Err(err) => warn!("Submission poll failed: {}", err),
            },
        }
    }
}

/// Parse an envelope and validate its records one by one, logging the
/// ones dropped.
pub fn decode_batch<R>(result: Result<String, FetchError>) -> Result<Vec<R::Output>, FetchError>
where
    R: Validate + DeserializeOwned,
{
    let body = result?;
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))?;
    if !envelope.success {
        return Err(FetchError::Rejected);
    }

    let Validated { items, skipped } = decode_all::<R>(envelope.data);
    for reason in &skipped {
        warn!("Dropping record: {}", reason);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::backend::scripted::ScriptedBackend;
    use crate::data::detector::SolveDetector;
    use crate::data::mutations::apply_scene_mutations;
    use crate::data::schema::{AccountId, ChallengeId};
    use crate::data::store::ScoreboardData;

    const CHALLENGES: &str = r#"{"success": true, "data": [
        {"id": 5, "name": "sqli-101", "category": "web", "value": 100, "solves": 1},
        {"id": 6, "name": "rop", "category": "pwn", "value": 300, "solves": 0}
    ]}"#;
    const TEAMS: &str =
        r#"{"success": true, "data": [{"account_id": 1, "name": "kappa", "score": 100}]}"#;
    const HISTORY: &str = r#"{"success": true, "data": [
        {"type": "correct", "account_id": 1, "challenge_id": 5, "date": "t0"}
    ]}"#;

    fn poll_app(backend: &ScriptedBackend) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<FetchQueue>()
            .init_resource::<PollState>()
            .init_resource::<LoadingProgress>()
            .init_resource::<ScoreboardData>()
            .init_resource::<SolveDetector>()
            .insert_resource(Backend(Box::new(backend.clone())))
            .insert_resource(PollSchedule::new(Duration::from_secs(30)))
            .add_event::<SceneMutation>()
            .add_systems(
                Update,
                (schedule_polls, drain_fetch_results, apply_scene_mutations).chain(),
            );
        app
    }

    /// Run the next poll interval; every later update is due as well.
    fn next_interval(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(30));
        app.update();
    }

    #[test]
    fn history_waits_for_a_successful_scoreboard() {
        let backend = ScriptedBackend::default();
        backend.respond(Endpoint::Scoreboard, Err(FetchError::Status(500)));
        let mut app = poll_app(&backend);

        app.update();
        assert_eq!(backend.requests(Endpoint::Scoreboard), 1);
        assert_eq!(backend.requests(Endpoint::SubmissionHistory), 0);
        assert_eq!(
            app.world().resource::<PollState>().history(),
            HistoryState::NotRequested
        );
        assert!(app.world().resource::<LoadingProgress>().scoreboard_answered);

        backend.respond(Endpoint::Scoreboard, Ok(TEAMS.into()));
        next_interval(&mut app);
        assert_eq!(backend.requests(Endpoint::Scoreboard), 2);
        assert_eq!(backend.requests(Endpoint::SubmissionHistory), 1);
        assert_eq!(
            app.world().resource::<PollState>().history(),
            HistoryState::Requested
        );

        // History is still pending: no second request for it.
        app.update();
        assert_eq!(backend.requests(Endpoint::SubmissionHistory), 1);
        assert_eq!(backend.requests(Endpoint::Submissions), 0);
    }

    #[test]
    fn failed_poll_keeps_state_and_retries_next_interval() {
        let backend = ScriptedBackend::default();
        backend.respond(Endpoint::Challenges, Ok(CHALLENGES.into()));
        backend.respond(Endpoint::Scoreboard, Ok(TEAMS.into()));
        backend.respond(Endpoint::SubmissionHistory, Ok(HISTORY.into()));
        let mut app = poll_app(&backend);

        app.update();
        let (challenge_revision, team_revision) = {
            let data = app.world().resource::<ScoreboardData>();
            assert_eq!(data.challenges().len(), 2);
            assert_eq!(data.teams().len(), 1);
            (data.challenge_revision(), data.team_revision())
        };

        backend.respond(Endpoint::Challenges, Err(FetchError::Network("reset".into())));
        backend.respond(Endpoint::Scoreboard, Ok("<html>".into()));
        next_interval(&mut app);

        let data = app.world().resource::<ScoreboardData>();
        assert_eq!(data.challenges().len(), 2);
        assert_eq!(data.teams().len(), 1);
        assert_eq!(data.challenge_revision(), challenge_revision);
        assert_eq!(data.team_revision(), team_revision);
        let detector = app.world().resource::<SolveDetector>();
        assert!(detector.is_seeded());
        assert_eq!(detector.seen_len(), 1);
        let state = app.world().resource::<PollState>();
        assert_eq!(state.history(), HistoryState::Loaded);
        assert!(!state.is_in_flight(Endpoint::Challenges));
        assert!(!state.is_in_flight(Endpoint::Scoreboard));

        app.update();
        assert_eq!(backend.requests(Endpoint::Challenges), 3);
        assert_eq!(backend.requests(Endpoint::Scoreboard), 3);
        assert_eq!(backend.requests(Endpoint::Submissions), 1);
    }

    #[test]
    fn first_check_is_due_immediately() {
        let mut schedule = PollSchedule::new(Duration::from_secs(30));
        assert!(schedule.due(Duration::ZERO));
        assert!(!schedule.due(Duration::from_secs(10)));
        assert!(schedule.due(Duration::from_secs(20)));
    }

    #[test]
    fn rejected_envelope_is_an_error() {
        let result = decode_batch::<ChallengeRecord>(Ok(r#"{"success": false, "data": []}"#.into()));
        assert_eq!(result, Err(FetchError::Rejected));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let result = decode_batch::<TeamRecord>(Ok("<html>".into()));
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn invalid_records_are_dropped_from_batch() {
        let body = r#"{"success": true, "data": [{"id": 1, "name": "a"}, {"name": "b"}, {"id": 2}]}"#;
        let items = decode_batch::<ChallengeRecord>(Ok(body.into())).unwrap();
        let ids: Vec<_> = items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ChallengeId(1), ChallengeId(2)]);
    }

    #[test]
    fn mistyped_record_is_dropped_alone() {
        let body = r#"{"success": true, "data": [
            {"account_id": 1, "name": "kappa", "score": 300},
            {"account_id": 2, "name": 7, "score": 50},
            {"account_id": 3, "name": "mu", "score": "100"}
        ]}"#;
        let items = decode_batch::<TeamRecord>(Ok(body.into())).unwrap();
        let scores: Vec<_> = items.iter().map(|t| (t.account_id, t.score)).collect();
        assert_eq!(scores, vec![(AccountId(1), 300), (AccountId(3), 100)]);
    }
}
