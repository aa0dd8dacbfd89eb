use bevy::prelude::*;

use crate::engine::core::lifecycle::SceneOwned;

/// Seconds the banner stays up after the most recent show.
pub const BANNER_HIDE_SECS: f32 = 3.0;

#[derive(Resource, Default, Debug)]
pub struct SolveBanner {
    pub title: String,
    pub message: String,
    hide_at: Option<f32>,
}

impl SolveBanner {
    /// Each show pushes the hide deadline out again.
    pub fn show(&mut self, title: &str, message: &str, now: f32) {
        self.title = title.to_string();
        self.message = message.to_string();
        self.hide_at = Some(now + BANNER_HIDE_SECS);
    }

    pub fn is_visible(&self, now: f32) -> bool {
        self.hide_at.is_some_and(|at| now < at)
    }
}

#[derive(Component)]
pub struct BannerRoot;

#[derive(Component)]
pub struct BannerTitle;

#[derive(Component)]
pub struct BannerMessage;

pub fn spawn_banner(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Solve banner"),
            BannerRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(24.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-180.0)),
                width: Val::Px(360.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(12.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.05, 0.12, 0.9)),
            BorderColor(Color::srgb(1.0, 0.84, 0.0)),
            BorderRadius::all(Val::Px(8.0)),
            Visibility::Hidden,
            GlobalZIndex(20),
            SceneOwned,
        ))
        .with_children(|banner| {
            banner.spawn((
                BannerTitle,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            banner.spawn((
                BannerMessage,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
            ));
        });
}

pub fn update_banner(
    time: Res<Time>,
    banner: Res<SolveBanner>,
    mut root: Query<&mut Visibility, With<BannerRoot>>,
    mut texts: ParamSet<(
        Query<&mut Text, With<BannerTitle>>,
        Query<&mut Text, With<BannerMessage>>,
    )>,
) {
    if banner.is_changed() {
        for mut text in &mut texts.p0() {
            text.0.clone_from(&banner.title);
        }
        for mut text in &mut texts.p1() {
            text.0.clone_from(&banner.message);
        }
    }

    let target = if banner.is_visible(time.elapsed_secs()) {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut root {
        visibility.set_if_neq(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_three_seconds_after_last_show() {
        let mut banner = SolveBanner::default();
        assert!(!banner.is_visible(0.0));

        banner.show("kappa", "Solving: warmup", 1.0);
        assert!(banner.is_visible(3.5));

        banner.show("kappa", "Solving: heap", 3.5);
        assert!(banner.is_visible(5.0));
        assert!(!banner.is_visible(6.5));
        assert_eq!(banner.message, "Solving: heap");
    }
}
