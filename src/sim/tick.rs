//! Fixed timestep simulation step
//!
//! Moves every in-game ball under gravity, resolves floor, wall and
//! ball-ball contacts, then lets the game advance its turn logic.

use glam::Vec3;

use super::course::Course;
use super::game::Game;
use super::player::Player;
use super::sphere::Sphere;
use crate::settings::PhysicsSettings;

/// Smallest upward normal component used when resting on a slope
const MIN_FLOOR_NORMAL_Y: f32 = 1e-3;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Shot velocity for the current player
    pub shot: Option<Vec3>,
}

impl TickInput {
    pub fn shot(velocity: Vec3) -> Self {
        Self {
            shot: Some(velocity),
        }
    }
}

/// Advance the game by one timestep of `dt` seconds
pub fn step(game: &mut Game, input: &TickInput, physics: &PhysicsSettings, dt: f32) {
    let dt = dt * physics.time_scale;

    if let Some(velocity) = input.shot {
        if !game.shoot_ball(velocity) {
            log::debug!("Shot ignored in state {:?}", game.shot_state());
        }
    }

    if let (Some(course), players) = game.course_and_players_mut() {
        apply_gravity(players, physics, dt);
        for player in players.iter_mut().filter(|p| p.in_game()) {
            let displacement = player.ball.velocity * dt;
            player.ball.move_by(displacement);
            resolve_floor(course, &mut player.ball, physics, dt);
        }
        resolve_collisions(course, players);
    }

    game.tick(dt);
}

/// Gravity tilted by `gravity_direction_deg` about Z
fn gravity(physics: &PhysicsSettings) -> Vec3 {
    let theta = physics.gravity_direction_deg.to_radians();
    Vec3::new(theta.sin(), -theta.cos(), 0.0) * physics.gravity
}

fn apply_gravity(players: &mut [Player], physics: &PhysicsSettings, dt: f32) {
    let dv = gravity(physics) * dt;
    for player in players.iter_mut().filter(|p| p.in_game()) {
        player.ball.velocity += dv;
    }
}

/// Rest the ball on the floor under it, or let it fall
pub fn resolve_floor(course: &Course, ball: &mut Sphere, physics: &PhysicsSettings, dt: f32) {
    let radius = ball.radius();
    let Some(floor) = course.floor_below(ball.position, radius) else {
        ball.floor_normal = Vec3::ZERO;
        return;
    };

    let bottom = ball.position.y - radius;
    if bottom > floor.height + physics.floor_snap {
        ball.floor_normal = Vec3::ZERO;
        return;
    }

    let normal = floor.normal;
    ball.position.y = floor.height + radius / normal.y.max(MIN_FLOOR_NORMAL_Y);

    let into_floor = ball.velocity.dot(normal);
    if into_floor < 0.0 {
        ball.velocity -= normal * into_floor;
    }
    ball.floor_normal = normal;
    ball.velocity *= (1.0 - physics.rolling_resistance * dt).max(0.0);
}

/// Wall hits first, then ball-ball overlaps; a ball bounces at most once
fn resolve_collisions(course: &Course, players: &mut [Player]) {
    let mut bounced = vec![false; players.len()];
    for i in 0..players.len() {
        if !players[i].in_game() {
            continue;
        }
        course.collide(&mut players[i].ball);

        if bounced[i] {
            continue;
        }
        for j in (i + 1)..players.len() {
            if bounced[j] || !players[j].in_game() {
                continue;
            }
            let (head, tail) = players.split_at_mut(j);
            let (a, b) = (&mut head[i].ball, &mut tail[0].ball);
            if a.overlaps(b) {
                a.bounce(b);
                bounced[i] = true;
                bounced[j] = true;
                log::trace!("Balls {i} and {j} collided");
                break;
            }
        }
    }
}
