use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use super::side_panels::PanelState;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Toggle,
    Exit,
}

#[derive(Resource, Default, Debug)]
pub struct FullscreenState {
    pub active: bool,
}

impl FullscreenState {
    /// Returns the new mode when the request changes it.
    pub fn apply(&mut self, request: FullscreenRequest, panels: &mut PanelState) -> Option<bool> {
        let target = match request {
            FullscreenRequest::Toggle => !self.active,
            FullscreenRequest::Exit => false,
        };
        if target == self.active {
            return None;
        }
        self.active = target;
        if target {
            panels.suppress();
        } else {
            panels.lift_suppression();
        }
        Some(target)
    }

    /// Adopt a mode the window reached on its own, e.g. the user leaving
    /// fullscreen through the browser or the window manager. Returns
    /// whether anything changed.
    pub fn observe(&mut self, fullscreen: bool, panels: &mut PanelState) -> bool {
        if fullscreen == self.active {
            return false;
        }
        self.active = fullscreen;
        if fullscreen {
            panels.suppress();
        } else {
            panels.lift_suppression();
        }
        true
    }
}

pub fn window_mode(fullscreen: bool) -> WindowMode {
    if fullscreen {
        WindowMode::BorderlessFullscreen(MonitorSelection::Current)
    } else {
        WindowMode::Windowed
    }
}

/// The camera projection and viewport follow the window resize that the
/// mode switch causes.
pub fn apply_fullscreen_requests(
    mut requests: EventReader<FullscreenRequest>,
    mut state: ResMut<FullscreenState>,
    mut panels: ResMut<PanelState>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for request in requests.read() {
        let Some(active) = state.apply(*request, &mut panels) else {
            continue;
        };
        if let Ok(mut window) = windows.single_mut() {
            window.mode = window_mode(active);
        }
        info!("Fullscreen {}", if active { "entered" } else { "exited" });
    }
}

pub fn follow_window_mode(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut state: ResMut<FullscreenState>,
    mut panels: ResMut<PanelState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let fullscreen = !matches!(window.mode, WindowMode::Windowed);
    if state.observe(fullscreen, &mut panels) {
        info!(
            "Window {} fullscreen outside the engine",
            if fullscreen { "entered" } else { "left" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_restores_visible_panels() {
        let mut panels = PanelState::default();
        panels.toggle();
        let mut state = FullscreenState::default();

        assert_eq!(state.apply(FullscreenRequest::Toggle, &mut panels), Some(true));
        assert!(!panels.is_shown());
        assert_eq!(state.apply(FullscreenRequest::Toggle, &mut panels), Some(false));
        assert!(panels.is_shown());
    }

    #[test]
    fn round_trip_keeps_hidden_panels_hidden() {
        let mut panels = PanelState::default();
        let mut state = FullscreenState::default();

        state.apply(FullscreenRequest::Toggle, &mut panels);
        state.apply(FullscreenRequest::Exit, &mut panels);
        assert!(!panels.is_shown());
    }

    #[test]
    fn exit_when_windowed_is_a_no_op() {
        let mut panels = PanelState::default();
        let mut state = FullscreenState::default();
        assert_eq!(state.apply(FullscreenRequest::Exit, &mut panels), None);
    }

    #[test]
    fn mode_mapping() {
        assert_eq!(window_mode(false), WindowMode::Windowed);
        assert_eq!(
            window_mode(true),
            WindowMode::BorderlessFullscreen(MonitorSelection::Current)
        );
    }

    fn window_app() -> App {
        let mut app = App::new();
        app.init_resource::<FullscreenState>()
            .init_resource::<PanelState>()
            .add_event::<FullscreenRequest>()
            .add_systems(Update, (apply_fullscreen_requests, follow_window_mode).chain());
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app
    }

    fn primary_window(app: &mut App) -> Mut<'_, Window> {
        let entity = app
            .world_mut()
            .query_filtered::<Entity, With<PrimaryWindow>>()
            .single(app.world())
            .unwrap();
        app.world_mut().get_mut::<Window>(entity).unwrap()
    }

    #[test]
    fn leaving_fullscreen_outside_the_engine_restores_panels() {
        let mut app = window_app();
        app.world_mut().resource_mut::<PanelState>().toggle();
        app.world_mut().send_event(FullscreenRequest::Toggle);
        app.update();
        assert!(app.world().resource::<FullscreenState>().active);
        assert!(!app.world().resource::<PanelState>().is_shown());

        // The request itself is not mistaken for an outside change.
        app.update();
        assert!(app.world().resource::<FullscreenState>().active);

        primary_window(&mut app).mode = WindowMode::Windowed;
        app.update();
        assert!(!app.world().resource::<FullscreenState>().active);
        assert!(app.world().resource::<PanelState>().is_shown());
    }

    #[test]
    fn observing_the_current_mode_changes_nothing() {
        let mut panels = PanelState::default();
        panels.toggle();
        let mut state = FullscreenState::default();
        assert!(!state.observe(false, &mut panels));
        assert!(panels.is_shown());
        assert!(state.observe(true, &mut panels));
        assert!(!panels.is_shown());
    }
}
