//! Scripted shots for headless sessions and demos

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::PhysicsSettings;
use crate::sim::{Game, ShotState};

/// Putts toward the hole with a little seeded jitter in strength
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Shot for the current player, if the game is waiting for one
    pub fn aim(&mut self, game: &Game, physics: &PhysicsSettings) -> Option<Vec3> {
        if game.shot_state() != ShotState::Aiming {
            return None;
        }
        let course = game.course()?;
        let player = game.players().get(game.current_player()?)?;

        let mut to_hole = course.hole_position - player.ball.position;
        to_hole.y = 0.0;
        let distance = to_hole.length();
        let strength: f32 = self.rng.random_range(0.9..1.3);
        Some(to_hole.normalize_or_zero() * distance * physics.rolling_resistance * strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::RuleSettings;
    use crate::sim::{Player, default_catalog};

    fn game() -> Game {
        Game::new(vec![Player::new("A")], default_catalog(), RuleSettings::default())
    }

    #[test]
    fn test_no_shot_unless_aiming() {
        let game = game();
        assert_eq!(game.shot_state(), ShotState::Ready);
        assert!(AutoPlayer::new(1).aim(&game, &PhysicsSettings::default()).is_none());
    }

    #[test]
    fn test_aims_at_hole_within_jitter() {
        let mut game = game();
        game.tick(SIM_DT);
        let physics = PhysicsSettings::default();
        let shot = AutoPlayer::new(7).aim(&game, &physics).expect("shot");

        let course = game.course().expect("course");
        let to_hole = course.hole_position - game.players()[0].ball.position;
        let distance = Vec3::new(to_hole.x, 0.0, to_hole.z).length();
        assert_eq!(shot.y, 0.0);
        assert!(shot.normalize().dot(to_hole.normalize()) > 0.999);
        let k = shot.length() / (distance * physics.rolling_resistance);
        assert!((0.899..1.301).contains(&k));
    }

    #[test]
    fn test_same_seed_same_shots() {
        let mut game = game();
        game.tick(SIM_DT);
        let physics = PhysicsSettings::default();
        let a = AutoPlayer::new(42).aim(&game, &physics);
        let b = AutoPlayer::new(42).aim(&game, &physics);
        assert_eq!(a, b);
    }
}
