use bevy::prelude::*;

use super::fullscreen::FullscreenRequest;
use super::side_panels::PanelState;
use crate::data::mutations::{SceneMutation, SubmissionSource};
use crate::data::schema::{Submission, SubmissionKind};
use crate::data::store::ScoreboardData;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::clock::unix_millis;
use crate::engine::core::lifecycle::DisposeRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    ResetCamera,
    ToggleAutoRotate,
    TogglePanels,
    ToggleFullscreen,
    ExitFullscreen,
    /// Play the solve effect, for a given submission or a made-up one.
    TestSolve(Option<Submission>),
    CheckSubmission(Submission),
    Dispose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Keyboard,
    Rpc,
    DomEvent,
}

/// Every user or host request enters the engine through this event.
#[derive(Event, Debug, Clone)]
pub struct HostCommandEvent {
    pub command: HostCommand,
    pub source: CommandSource,
}

/// Correct submission by the first team on the first challenge, with a
/// date that never collides with a real or earlier synthetic one.
pub fn synthesize_test_solve(data: &ScoreboardData, nonce: u64) -> Option<Submission> {
    let team = data.teams().first()?;
    let challenge = data.challenges().first()?;
    Some(Submission {
        kind: SubmissionKind::Correct,
        account: team.account_id,
        challenge_id: challenge.id,
        date: format!("local-{:.0}-{}", unix_millis(), nonce),
        team: None,
        challenge: None,
    })
}

pub fn handle_host_commands(
    mut events: EventReader<HostCommandEvent>,
    mut orbit: ResMut<OrbitCamera>,
    mut panels: ResMut<PanelState>,
    data: Res<ScoreboardData>,
    mut fullscreen: EventWriter<FullscreenRequest>,
    mut mutations: EventWriter<SceneMutation>,
    mut dispose: EventWriter<DisposeRequest>,
    mut test_nonce: Local<u64>,
) {
    for event in events.read() {
        debug!("Host command {:?} from {:?}", event.command, event.source);

        match &event.command {
            HostCommand::ResetCamera => orbit.reset(),
            HostCommand::ToggleAutoRotate => {
                let enabled = orbit.toggle_auto_rotate();
                info!("Auto-rotate {}", if enabled { "on" } else { "off" });
            }
            HostCommand::TogglePanels => {
                panels.toggle();
            }
            HostCommand::ToggleFullscreen => {
                fullscreen.write(FullscreenRequest::Toggle);
            }
            HostCommand::ExitFullscreen => {
                fullscreen.write(FullscreenRequest::Exit);
            }
            HostCommand::TestSolve(submission) => {
                *test_nonce += 1;
                let submission = submission
                    .clone()
                    .or_else(|| synthesize_test_solve(&data, *test_nonce));
                match submission {
                    Some(submission) => {
                        mutations.write(SceneMutation::Submissions {
                            items: vec![submission],
                            source: SubmissionSource::TestTrigger,
                        });
                    }
                    None => warn!("Test solve ignored, no teams or challenges loaded yet"),
                }
            }
            HostCommand::CheckSubmission(submission) => {
                mutations.write(SceneMutation::Submissions {
                    items: vec![submission.clone()],
                    source: SubmissionSource::Host,
                });
            }
            HostCommand::Dispose => {
                dispose.write(DisposeRequest);
            }
        }
    }
}
