use std::f32::consts::TAU;

use bevy::prelude::*;

use scoreboard_constants::layout::*;

use crate::data::schema::{Challenge, ChallengeId, Team};

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengePlacement {
    pub id: ChallengeId,
    pub category_index: usize,
    pub translation: Vec3,
}

/// Position of the `index`-th of `len` challenges on the ring of the
/// `category_index`-th category.
pub fn challenge_position(category_index: usize, index: usize, len: usize) -> Vec3 {
    let radius = CHALLENGE_RING_BASE_RADIUS + CHALLENGE_RING_STEP * category_index as f32;
    let angle = TAU * index as f32 / len.max(1) as f32;
    Vec3::new(
        angle.cos() * radius,
        (index as f32 * CHALLENGE_HEIGHT_FREQUENCY).sin() * CHALLENGE_HEIGHT_AMPLITUDE,
        angle.sin() * radius,
    )
}

/// Group by category in order of first appearance and lay every group
/// out on its own ring.
pub fn layout_challenges(challenges: &[Challenge]) -> Vec<ChallengePlacement> {
    let mut groups: Vec<(&str, Vec<ChallengeId>)> = Vec::new();
    for challenge in challenges {
        match groups.iter_mut().find(|(name, _)| *name == challenge.category) {
            Some((_, members)) => members.push(challenge.id),
            None => groups.push((&challenge.category, vec![challenge.id])),
        }
    }

    groups
        .iter()
        .enumerate()
        .flat_map(|(category_index, (_, members))| {
            members.iter().enumerate().map(move |(index, id)| ChallengePlacement {
                id: *id,
                category_index,
                translation: challenge_position(category_index, index, members.len()),
            })
        })
        .collect()
}

/// Teams that get a node, in scoreboard order.
pub fn visible_teams(teams: &[Team]) -> &[Team] {
    &teams[..teams.len().min(MAX_TEAM_NODES)]
}

pub fn team_position(index: usize, count: usize) -> Vec3 {
    let angle = TAU * index as f32 / count.clamp(1, MAX_TEAM_NODES) as f32;
    Vec3::new(angle.cos() * TEAM_RING_RADIUS, 0.0, angle.sin() * TEAM_RING_RADIUS)
}

/// Hue in degrees for the team at `index`.
pub fn team_hue(index: usize) -> f32 {
    (index as f32 * TEAM_HUE_STEP).fract() * 360.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::AccountId;

    fn challenge(id: u64, category: &str) -> Challenge {
        Challenge {
            id: ChallengeId(id),
            name: format!("c{id}"),
            category: category.into(),
            value: 100,
            solves: 0,
            description: None,
        }
    }

    #[test]
    fn categories_get_rings_in_order_of_appearance() {
        let challenges = vec![
            challenge(1, "web"),
            challenge(2, "crypto"),
            challenge(3, "web"),
        ];
        let placements = layout_challenges(&challenges);

        let web: Vec<_> = placements.iter().filter(|p| p.category_index == 0).collect();
        assert_eq!(web.len(), 2);
        assert!((web[0].translation - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-4);
        // Second of two on a ring of radius 15 lands opposite the first.
        assert!((web[1].translation.x + 15.0).abs() < 1e-4);
        assert!((web[1].translation.y - 0.5f32.sin() * 2.0).abs() < 1e-4);

        let crypto = placements.iter().find(|p| p.id == ChallengeId(2)).unwrap();
        assert_eq!(crypto.category_index, 1);
        assert!((crypto.translation - Vec3::new(20.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn placement_is_deterministic() {
        let challenges = vec![challenge(1, "web"), challenge(2, "pwn"), challenge(3, "web")];
        assert_eq!(layout_challenges(&challenges), layout_challenges(&challenges));
    }

    #[test]
    fn only_top_ten_teams_are_visible() {
        let teams: Vec<Team> = (0..14)
            .map(|i| Team {
                account_id: AccountId(i),
                name: None,
                score: 0,
            })
            .collect();
        assert_eq!(visible_teams(&teams).len(), 10);
        assert_eq!(visible_teams(&teams[..3]).len(), 3);
    }

    #[test]
    fn team_ring_spacing_uses_visible_count() {
        let p = team_position(1, 4);
        assert!((p - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-4);
        assert!((team_hue(3) - 108.0).abs() < 1e-3);
    }
}
