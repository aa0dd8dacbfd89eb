use bevy::prelude::*;

use scoreboard_constants::layout::MAX_TEAM_NODES;
use scoreboard_constants::timeline::PANEL_SLIDE_SECS;

use crate::data::activity::{ActivityFeed, MAX_ACTIVITY_ENTRIES};
use crate::data::store::ScoreboardData;
use crate::engine::core::app_state::LoadingProgress;
use crate::engine::core::config::EngineConfig;
use crate::engine::core::lifecycle::SceneOwned;
use crate::engine::effects::easing::ease_out_cubic;

const PANEL_MARGIN: f32 = 20.0;
const LEADERBOARD_WIDTH: f32 = 260.0;
const ACTIVITY_WIDTH: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Reveal {
    Waiting,
    Done,
}

/// Visibility flag for both side panels. Fullscreen suppresses them
/// without touching the flag.
#[derive(Resource, Debug)]
pub struct PanelState {
    visible: bool,
    suppressed: bool,
    reveal: Reveal,
    slide: f32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            visible: false,
            suppressed: false,
            reveal: Reveal::Waiting,
            slide: 0.0,
        }
    }
}

impl PanelState {
    pub fn toggle(&mut self) -> bool {
        // A manual toggle wins over the timed reveal.
        self.reveal = Reveal::Done;
        self.visible = !self.visible;
        self.visible
    }

    pub fn reveal(&mut self) {
        if self.reveal == Reveal::Waiting {
            self.reveal = Reveal::Done;
            self.visible = true;
        }
    }

    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    pub fn lift_suppression(&mut self) {
        self.suppressed = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_shown(&self) -> bool {
        self.visible && !self.suppressed
    }

    /// Move the slide fraction toward shown (1) or hidden (0).
    pub fn advance_slide(&mut self, dt: f32) -> f32 {
        let target = if self.is_shown() { 1.0 } else { 0.0 };
        let step = dt / PANEL_SLIDE_SECS;
        self.slide = if self.slide < target {
            (self.slide + step).min(target)
        } else {
            (self.slide - step).max(target)
        };
        self.slide
    }
}

#[derive(Component)]
pub struct LeaderboardPanel;

#[derive(Component)]
pub struct ActivityPanel;

#[derive(Component)]
pub struct LeaderboardRow(pub usize);

#[derive(Component)]
pub struct ActivityRow(pub usize);

fn panel_node(width: f32) -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: Val::Px(80.0),
        width: Val::Px(width),
        flex_direction: FlexDirection::Column,
        row_gap: Val::Px(4.0),
        padding: UiRect::all(Val::Px(12.0)),
        ..default()
    }
}

fn panel_title(text: &str) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.84, 0.0)),
    )
}

fn row_text() -> impl Bundle {
    (
        Text::new(""),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            display: Display::None,
            ..default()
        },
    )
}

pub fn spawn_side_panels(mut commands: Commands) {
    let hidden_offset = Val::Px(-LEADERBOARD_WIDTH - PANEL_MARGIN);
    commands
        .spawn((
            Name::new("Leaderboard panel"),
            LeaderboardPanel,
            Node {
                left: hidden_offset,
                ..panel_node(LEADERBOARD_WIDTH)
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            BorderRadius::all(Val::Px(8.0)),
            GlobalZIndex(10),
            SceneOwned,
        ))
        .with_children(|panel| {
            panel.spawn(panel_title("Leaderboard"));
            for row in 0..MAX_TEAM_NODES {
                panel.spawn((LeaderboardRow(row), row_text()));
            }
        });

    commands
        .spawn((
            Name::new("Activity panel"),
            ActivityPanel,
            Node {
                right: Val::Px(-ACTIVITY_WIDTH - PANEL_MARGIN),
                ..panel_node(ACTIVITY_WIDTH)
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            BorderRadius::all(Val::Px(8.0)),
            GlobalZIndex(10),
            SceneOwned,
        ))
        .with_children(|panel| {
            panel.spawn(panel_title("Recent activity"));
            for row in 0..MAX_ACTIVITY_ENTRIES {
                panel.spawn((ActivityRow(row), row_text()));
            }
        });
}

/// Show the panels once the first poll is in and the configured delay has
/// elapsed since start.
pub fn reveal_side_panels(
    time: Res<Time>,
    progress: Res<LoadingProgress>,
    config: Option<Res<EngineConfig>>,
    mut panels: ResMut<PanelState>,
) {
    if panels.reveal != Reveal::Waiting || !progress.first_poll_done() {
        return;
    }
    let delay = config.map_or(0.0, |c| c.panels_reveal_delay_secs);
    if time.elapsed_secs() >= delay {
        panels.reveal();
        info!("Side panels revealed");
    }
}

pub fn slide_side_panels(
    time: Res<Time>,
    mut panels: ResMut<PanelState>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<LeaderboardPanel>>,
        Query<&mut Node, With<ActivityPanel>>,
    )>,
) {
    let before = panels.slide;
    let slide = panels.advance_slide(time.delta_secs());
    if slide == before {
        return;
    }
    let eased = ease_out_cubic(slide);
    let offset = |width: f32| Val::Px(PANEL_MARGIN - (1.0 - eased) * (width + 2.0 * PANEL_MARGIN));

    for mut node in &mut nodes.p0() {
        node.left = offset(LEADERBOARD_WIDTH);
    }
    for mut node in &mut nodes.p1() {
        node.right = offset(ACTIVITY_WIDTH);
    }
}

pub fn leaderboard_line(rank: usize, name: &str, score: i64) -> String {
    format!("{:>2}. {}  {}", rank + 1, name, score)
}

pub fn refresh_leaderboard(
    data: Res<ScoreboardData>,
    mut last_revision: Local<Option<u64>>,
    mut rows: Query<(&LeaderboardRow, &mut Text, &mut Node)>,
) {
    if *last_revision == Some(data.team_revision()) {
        return;
    }
    *last_revision = Some(data.team_revision());

    for (row, mut text, mut node) in &mut rows {
        match data.teams().get(row.0) {
            Some(team) => {
                let name = team
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Team {}", team.account_id));
                text.0 = leaderboard_line(row.0, &name, team.score);
                node.display = Display::Flex;
            }
            None => node.display = Display::None,
        }
    }
}

pub fn refresh_activity_feed(
    feed: Res<ActivityFeed>,
    mut last_revision: Local<Option<u64>>,
    mut rows: Query<(&ActivityRow, &mut Text, &mut Node)>,
) {
    if *last_revision == Some(feed.revision()) {
        return;
    }
    *last_revision = Some(feed.revision());

    let entries: Vec<_> = feed.entries().collect();
    for (row, mut text, mut node) in &mut rows {
        match entries.get(row.0) {
            Some(entry) => {
                text.0 = format!("{}  {}: {}", entry.time, entry.team, entry.message);
                node.display = Display::Flex;
            }
            None => node.display = Display::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_visibility() {
        let mut panels = PanelState::default();
        assert!(panels.toggle());
        assert!(!panels.toggle());
    }

    #[test]
    fn toggle_cancels_pending_reveal() {
        let mut panels = PanelState::default();
        panels.toggle();
        panels.toggle();
        panels.reveal();
        assert!(!panels.is_visible());
    }

    #[test]
    fn suppression_keeps_the_flag() {
        let mut panels = PanelState::default();
        panels.reveal();
        panels.suppress();
        assert!(panels.is_visible());
        assert!(!panels.is_shown());
        panels.lift_suppression();
        assert!(panels.is_shown());
    }

    #[test]
    fn slide_takes_the_full_duration() {
        let mut panels = PanelState::default();
        panels.reveal();
        assert!((panels.advance_slide(0.3) - 0.5).abs() < 1e-6);
        assert_eq!(panels.advance_slide(0.5), 1.0);
        panels.toggle();
        assert!(panels.advance_slide(0.1) < 1.0);
    }

    #[test]
    fn slide_length_follows_timeline() {
        let mut panels = PanelState::default();
        panels.reveal();
        assert!(panels.advance_slide(PANEL_SLIDE_SECS * 0.99) < 1.0);
        assert_eq!(panels.advance_slide(PANEL_SLIDE_SECS * 0.1), 1.0);
    }

    #[test]
    fn leaderboard_line_is_one_based() {
        assert_eq!(leaderboard_line(0, "kappa", 1200), " 1. kappa  1200");
    }
}
