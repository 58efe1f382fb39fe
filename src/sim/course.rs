//! A single hole: obstacle subtree, hole sensing and par

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::scene::{FloorContact, SceneNode};
use super::scoring::ScoreTerm;
use super::sphere::Sphere;
use crate::consts::OFF_SCENE;
use crate::render::{Canvas, DebugConfig, HOLE_COLOR};

/// A player sank their ball this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCompletion {
    pub player: usize,
    pub strokes: u32,
    pub term: ScoreTerm,
}

/// One hole of the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub hole_position: Vec3,
    pub hole_radius: f32,
    pub start_position: Vec3,
    pub par: u32,
    root: SceneNode,
}

impl Course {
    pub fn new(name: impl Into<String>, par: u32) -> Self {
        Self {
            name: name.into(),
            hole_position: Vec3::ZERO,
            hole_radius: 0.5,
            start_position: Vec3::ZERO,
            par,
            root: SceneNode::group(),
        }
    }

    pub fn with_hole(mut self, position: Vec3, radius: f32) -> Self {
        self.hole_position = position;
        self.hole_radius = radius;
        self
    }

    pub fn with_start(mut self, position: Vec3) -> Self {
        self.start_position = position;
        self
    }

    /// Add an obstacle or floor node under the course root
    pub fn add(&mut self, node: SceneNode) -> usize {
        self.root.add_child(node)
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    /// Collide a ball with the obstacles; the first hit wins
    pub fn collide(&self, sphere: &mut Sphere) -> bool {
        self.root.collide(sphere)
    }

    /// Floor under `point`, looking at most `reach` above it
    pub fn floor_below(&self, point: Vec3, reach: f32) -> Option<FloorContact> {
        self.root.floor_below(point, point.y + reach)
    }

    /// Whether `ball` is close enough to the hole to drop in
    #[inline]
    pub fn is_sunk(&self, ball: &Sphere) -> bool {
        ball.position.distance(self.hole_position) < self.hole_radius + ball.radius()
    }

    /// Mark players whose ball reached the hole and bank their strokes
    pub fn check_hole(&self, players: &mut [Player]) -> Vec<HoleCompletion> {
        let mut completions = Vec::new();
        for (idx, player) in players.iter_mut().enumerate() {
            if player.finished_hole || !self.is_sunk(&player.ball) {
                continue;
            }
            player.finished_hole = true;
            player.ball.place(OFF_SCENE);
            player.ball.velocity = Vec3::ZERO;
            player.ball.floor_normal = Vec3::ZERO;
            player.score += player.strokes;
            completions.push(HoleCompletion {
                player: idx,
                strokes: player.strokes,
                term: ScoreTerm::classify(player.strokes, self.par),
            });
        }
        completions
    }

    /// Animate the scene, then sense the hole
    pub fn tick(&mut self, players: &mut [Player], dt: f32) -> Vec<HoleCompletion> {
        self.root.tick(dt);
        self.check_hole(players)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, players: &[Player], debug: &DebugConfig) {
        self.root.draw(canvas, &Mat4::IDENTITY);
        canvas.sphere(self.hole_position, self.hole_radius, Quat::IDENTITY, HOLE_COLOR);
        for player in players.iter().filter(|p| p.in_game()) {
            player.ball.draw(canvas, debug);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;
    use crate::sim::wall::{GroundTile, Wall};

    fn course() -> Course {
        let mut course = Course::new("test", 2)
            .with_hole(Vec3::new(0.0, 0.0, 5.0), 0.3)
            .with_start(Vec3::ZERO);
        course.add(SceneNode::ground(GroundTile::flat((-5.0, -5.0), (-5.0, 10.0), (5.0, -5.0))));
        course.add(SceneNode::wall(Wall::upright(1.0, -2.0, 1.0, 2.0, 2.0)));
        course
    }

    #[test]
    fn test_hole_boundary_is_strict() {
        let course = course();
        let r = 0.2;
        let mut ball = Sphere::new(course.hole_position + Vec3::X * (0.5 + 1e-3), r);
        assert!(!course.is_sunk(&ball));
        ball.place(course.hole_position + Vec3::X * 0.49);
        assert!(course.is_sunk(&ball));
    }

    #[test]
    fn test_check_hole_scores_exactly_once() {
        let course = course();
        let mut players = vec![Player::new("A"), Player::new("B")];
        players[0].strokes = 3;
        players[0].score = 4;
        players[0].ball.place(course.hole_position);
        players[1].ball.place(Vec3::new(0.0, 0.0, -3.0));

        let done = course.check_hole(&mut players);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].player, 0);
        assert_eq!(done[0].term, ScoreTerm::Bogey);
        assert!(players[0].finished_hole);
        assert_eq!(players[0].score, 7);
        assert_eq!(players[0].ball.position, OFF_SCENE);
        assert!(!players[1].finished_hole);

        // Parked far away and already finished: nothing more to bank
        players[0].ball.place(course.hole_position);
        assert!(course.check_hole(&mut players).is_empty());
        assert_eq!(players[0].score, 7);
    }

    #[test]
    fn test_collide_and_floor() {
        let course = course();
        let mut ball = Sphere::new(Vec3::new(0.9, 1.0, 0.0), 0.2);
        ball.velocity = Vec3::X;
        assert!(course.collide(&mut ball));

        let floor = course.floor_below(Vec3::new(0.0, 0.1, 0.0), 0.2).expect("floor");
        assert!(floor.height.abs() < 1e-6);
        assert!(course.floor_below(Vec3::new(20.0, 0.1, 0.0), 0.2).is_none());
    }

    #[test]
    fn test_draw_skips_finished_balls() {
        let course = course();
        let mut players = vec![Player::new("A"), Player::new("B")];
        players[1].finished_hole = true;
        let mut list = DrawList::new();
        course.draw(&mut list, &players, &DebugConfig::default());
        // Hole plus one ball
        assert_eq!(list.spheres().count(), 2);
    }
}
