//! Static course geometry: rectangular walls, wall rings and floor tiles
//!
//! Wall collision is tiered cheapest-first (plane, corners, edges, face) and
//! the response is applied to the sphere immediately.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::{Plane, push_out, reflect, triangle_normal};
use super::sphere::Sphere;
use crate::consts::*;
use crate::render::{Canvas, GROUND_COLOR, WALL_COLOR};

/// Which part of a wall the sphere touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Corner,
    Edge,
    Face,
}

/// Resolved wall contact: new velocity plus the push-out displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub kind: ContactKind,
    pub velocity: Vec3,
    pub push: Vec3,
}

/// A planar quad; consecutive corners form its edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    corners: [Vec3; 4],
    normal: Vec3,
}

impl Wall {
    pub fn new(corners: [Vec3; 4]) -> Self {
        let normal = triangle_normal(corners[0], corners[1], corners[2]);
        Self { corners, normal }
    }

    /// Vertical wall standing on the ground from (x1, z1) to (x2, z2)
    pub fn upright(x1: f32, z1: f32, x2: f32, z2: f32, height: f32) -> Self {
        Self::new([
            Vec3::new(x1, 0.0, z1),
            Vec3::new(x1, height, z1),
            Vec3::new(x2, height, z2),
            Vec3::new(x2, 0.0, z2),
        ])
    }

    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    /// Unit normal, zero for a degenerate wall
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Normal pointing toward the side `center` is on
    fn side_normal(&self, signed_dist: f32, velocity: Vec3) -> Vec3 {
        if signed_dist > 0.0 {
            self.normal
        } else if signed_dist < 0.0 {
            -self.normal
        } else if velocity.dot(self.normal) > 0.0 {
            -self.normal
        } else {
            self.normal
        }
    }

    /// Detect and resolve a contact without mutating anything
    ///
    /// `origin` is the effective position of the wall's scene node.
    pub fn contact(
        &self,
        origin: Vec3,
        center: Vec3,
        radius: f32,
        velocity: Vec3,
    ) -> Option<WallContact> {
        if self.normal == Vec3::ZERO {
            return None;
        }
        let corners = self.corners.map(|c| c + origin);
        let plane = Plane::new(self.normal, corners[0]);

        // Cheap plane distance reject
        let signed_dist = plane.signed_distance(center);
        let dist = signed_dist.abs();
        if dist > radius {
            return None;
        }
        let side = self.side_normal(signed_dist, velocity);

        // Corners
        if corners.iter().any(|corner| center.distance(*corner) < radius) {
            let reflected = plane.bounce(velocity);
            // Straight along the rebound; a resting ball goes out the near side
            let dir = reflected.try_normalize().unwrap_or(side);
            let push = dir * (radius - dist + COLLISION_EPSILON);
            return Some(WallContact {
                kind: ContactKind::Corner,
                velocity: reflected,
                push,
            });
        }

        // Edges
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let Some(dir) = (b - a).try_normalize() else {
                continue;
            };
            let closest = a + dir.dot(center - a) * dir;
            let cp_dist = closest.distance(center);
            if cp_dist > radius {
                continue;
            }
            // Closest point must lie on the segment, not its extension
            if closest.distance(a) + closest.distance(b) > a.distance(b) + CONTACT_TOLERANCE {
                continue;
            }

            let to_center = (center - closest).try_normalize().unwrap_or(side);
            let reflected = reflect(velocity, to_center);
            let push = push_out(reflected, to_center, radius - cp_dist + COLLISION_EPSILON);
            return Some(WallContact {
                kind: ContactKind::Edge,
                velocity: reflected,
                push,
            });
        }

        // Face: project onto the plane and test inside the rectangle
        let projected = plane.project(center);
        let v1 = (corners[1] - corners[0]).normalize_or_zero();
        let v2 = (corners[3] - corners[0]).normalize_or_zero();
        let n = v1.cross(v2).normalize_or_zero();

        let far = corners[2] - corners[0];
        let extent = Vec2::new(v1.dot(far), v2.dot(far));
        if extent.x.abs() < f32::EPSILON || extent.y.abs() < f32::EPSILON {
            return None;
        }

        let rel = projected - corners[0];
        let px = v1.dot(rel) / extent.x;
        let py = v2.dot(rel) / extent.y;
        let pz = n.dot(rel);
        if pz.abs() > CONTACT_TOLERANCE {
            return None;
        }
        if !(0.0..=1.0).contains(&px) || !(0.0..=1.0).contains(&py) {
            return None;
        }

        // Sign-aware: respects which side of the wall the ball is on
        let to_center = (center - projected).try_normalize().unwrap_or(side);
        let reflected = reflect(velocity, to_center);
        let push = push_out(reflected, to_center, radius - dist + COLLISION_EPSILON);
        Some(WallContact {
            kind: ContactKind::Face,
            velocity: reflected,
            push,
        })
    }

    /// Collide a sphere with this wall, applying the response in place
    pub fn collide(&self, origin: Vec3, sphere: &mut Sphere) -> bool {
        match self.contact(origin, sphere.position, sphere.radius(), sphere.velocity) {
            Some(contact) => {
                sphere.velocity = contact.velocity;
                sphere.move_by(contact.push);
                true
            }
            None => false,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, transform: &Mat4) {
        let corners = self.corners.map(|c| transform.transform_point3(c));
        let normal = transform.transform_vector3(self.normal).normalize_or_zero();
        canvas.quad(corners, normal, WALL_COLOR);
    }
}

/// A closed ring of upright walls around a polygon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    walls: Vec<Wall>,
}

impl WallBox {
    /// Build from alternating `[x0, z0, x1, z1, ...]` ground coordinates
    ///
    /// Wall `i` runs from point `i` to point `(i + 1) % n`, so the ring closes.
    pub fn new(xz: &[f32], height: f32) -> Self {
        let points: Vec<(f32, f32)> = xz.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        if points.len() < 2 {
            return Self::default();
        }
        let walls = (0..points.len())
            .map(|i| {
                let (x1, z1) = points[i];
                let (x2, z2) = points[(i + 1) % points.len()];
                Wall::upright(x1, z1, x2, z2, height)
            })
            .collect();
        Self { walls }
    }

    pub fn outer_wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn into_walls(self) -> Vec<Wall> {
        self.walls
    }
}

/// A flat floor triangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTile {
    corners: [Vec3; 3],
    normal: Vec3,
}

impl GroundTile {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let mut normal = triangle_normal(a, b, c);
        if normal.y < 0.0 {
            normal = -normal;
        }
        Self {
            corners: [a, b, c],
            normal,
        }
    }

    /// Tile on the y = 0 plane from three (x, z) points
    pub fn flat(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Self {
        Self::new(
            Vec3::new(a.0, 0.0, a.1),
            Vec3::new(b.0, 0.0, b.1),
            Vec3::new(c.0, 0.0, c.1),
        )
    }

    pub fn corners(&self) -> &[Vec3; 3] {
        &self.corners
    }

    /// Upward-facing unit normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Surface height above (x, z), if the point is over this tile
    pub fn height_at(&self, origin: Vec3, x: f32, z: f32) -> Option<f32> {
        // Vertical or degenerate tiles carry nothing
        if self.normal.y.abs() < 1e-4 {
            return None;
        }
        let [a, b, c] = self.corners.map(|p| p + origin);
        let flat = |p: Vec3| Vec2::new(p.x, p.z);
        let p = Vec2::new(x, z);

        let v0 = flat(c) - flat(a);
        let v1 = flat(b) - flat(a);
        let v2 = p - flat(a);
        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);
        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < f32::EPSILON {
            return None;
        }
        let u = (dot11 * dot02 - dot01 * dot12) / denom;
        let v = (dot00 * dot12 - dot01 * dot02) / denom;
        const EDGE_SLACK: f32 = 1e-5;
        if u < -EDGE_SLACK || v < -EDGE_SLACK || u + v > 1.0 + EDGE_SLACK {
            return None;
        }

        let n = self.normal;
        Some(a.y - (n.x * (x - a.x) + n.z * (z - a.z)) / n.y)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, transform: &Mat4) {
        let corners = self.corners.map(|c| transform.transform_point3(c));
        let normal = transform.transform_vector3(self.normal).normalize_or_zero();
        canvas.triangle(corners, normal, GROUND_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Wall in the x = 1 plane, z in [-2, 2], y in [0, 2], normal +X
    fn test_wall() -> Wall {
        Wall::upright(1.0, -2.0, 1.0, 2.0, 2.0)
    }

    fn ball(pos: Vec3, vel: Vec3) -> Sphere {
        let mut s = Sphere::new(pos, 0.2);
        s.velocity = vel;
        s
    }

    #[test]
    fn test_upright_normal_is_horizontal() {
        let wall = test_wall();
        assert!((wall.normal() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_far_sphere_misses() {
        let mut s = ball(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(!test_wall().collide(Vec3::ZERO, &mut s));
        assert_eq!(s.velocity, Vec3::X);
    }

    #[test]
    fn test_face_hit_reflects_and_pushes_out() {
        let wall = test_wall();
        let mut s = ball(Vec3::new(0.9, 1.0, 0.0), Vec3::X);
        let contact = wall
            .contact(Vec3::ZERO, s.position, s.radius(), s.velocity)
            .expect("face contact");
        assert_eq!(contact.kind, ContactKind::Face);

        assert!(wall.collide(Vec3::ZERO, &mut s));
        assert!((s.velocity - Vec3::NEG_X).length() < 1e-5);
        assert!((s.position.x - (1.0 - 0.2 - COLLISION_EPSILON)).abs() < 1e-5);
    }

    #[test]
    fn test_face_hit_from_the_back_side() {
        let wall = test_wall();
        let mut s = ball(Vec3::new(1.1, 1.0, 0.5), Vec3::NEG_X);
        assert!(wall.collide(Vec3::ZERO, &mut s));
        assert!((s.velocity - Vec3::X).length() < 1e-5);
        assert!(s.position.x > 1.2);
    }

    #[test]
    fn test_outside_face_extent_misses() {
        let mut s = ball(Vec3::new(0.9, 1.0, 3.0), Vec3::X);
        assert!(!test_wall().collide(Vec3::ZERO, &mut s));
    }

    #[test]
    fn test_corner_hit() {
        let wall = test_wall();
        let s = ball(Vec3::new(1.05, 0.05, -2.05), Vec3::NEG_X);
        let contact = wall
            .contact(Vec3::ZERO, s.position, s.radius(), s.velocity)
            .expect("corner contact");
        assert_eq!(contact.kind, ContactKind::Corner);
        assert!((contact.velocity - Vec3::X).length() < 1e-5);
        assert!(contact.push.x > 0.0);
    }

    #[test]
    fn test_corner_push_runs_along_rebound() {
        let wall = test_wall();
        let s = ball(Vec3::new(1.05, 0.05, -2.05), Vec3::new(-1.0, 0.0, -1.0));
        let contact = wall
            .contact(Vec3::ZERO, s.position, s.radius(), s.velocity)
            .expect("corner contact");
        assert_eq!(contact.kind, ContactKind::Corner);

        let depth = 0.2 - 0.05 + COLLISION_EPSILON;
        assert!((contact.push.length() - depth).abs() < 1e-5);
        let rebound = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert!((contact.push.normalize() - rebound).length() < 1e-5);
    }

    #[test]
    fn test_resting_ball_at_corner_goes_out_the_near_side() {
        let wall = test_wall();
        let s = ball(Vec3::new(0.95, 0.05, 2.05), Vec3::ZERO);
        let contact = wall
            .contact(Vec3::ZERO, s.position, s.radius(), s.velocity)
            .expect("corner contact");
        assert_eq!(contact.kind, ContactKind::Corner);
        assert_eq!(contact.velocity, Vec3::ZERO);
        assert!((contact.push - Vec3::NEG_X * (0.15 + COLLISION_EPSILON)).length() < 1e-5);
    }

    #[test]
    fn test_edge_hit() {
        let wall = test_wall();
        let v = Vec3::new(-1.0, -1.0, 0.0);
        let s = ball(Vec3::new(1.1, 2.1, 0.0), v);
        let contact = wall
            .contact(Vec3::ZERO, s.position, s.radius(), s.velocity)
            .expect("edge contact");
        assert_eq!(contact.kind, ContactKind::Edge);
        assert!((contact.velocity - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((contact.velocity.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn test_origin_offsets_the_wall() {
        let wall = test_wall();
        let mut s = ball(Vec3::new(0.9, 1.0, 0.0), Vec3::X);
        assert!(!wall.collide(Vec3::new(5.0, 0.0, 0.0), &mut s));
        let mut s = ball(Vec3::new(5.9, 1.0, 0.0), Vec3::X);
        assert!(wall.collide(Vec3::new(5.0, 0.0, 0.0), &mut s));
    }

    #[test]
    fn test_degenerate_wall_never_collides() {
        let wall = Wall::new([Vec3::ZERO; 4]);
        assert_eq!(wall.normal(), Vec3::ZERO);
        let mut s = ball(Vec3::ZERO, Vec3::X);
        assert!(!wall.collide(Vec3::ZERO, &mut s));
    }

    #[test]
    fn test_wall_box_ring_closes() {
        let ring = WallBox::new(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0], WALL_HEIGHT);
        assert_eq!(ring.outer_wall_count(), 4);
        let walls = ring.walls();
        for i in 0..walls.len() {
            let end = walls[i].corners()[3];
            let next_start = walls[(i + 1) % walls.len()].corners()[0];
            assert!((end - next_start).length() < 1e-6);
        }
        assert!((walls[0].corners()[1].y - WALL_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn test_wall_box_too_few_points() {
        assert_eq!(WallBox::new(&[1.0, 2.0], 2.0).outer_wall_count(), 0);
        assert_eq!(WallBox::new(&[1.0, 2.0, 3.0], 2.0).outer_wall_count(), 0);
    }

    #[test]
    fn test_ground_tile_height() {
        let tile = GroundTile::flat((0.0, 0.0), (0.0, 4.0), (4.0, 0.0));
        assert!((tile.normal() - Vec3::Y).length() < 1e-6);
        assert_eq!(tile.height_at(Vec3::ZERO, 1.0, 1.0), Some(0.0));
        assert_eq!(tile.height_at(Vec3::ZERO, 5.0, 5.0), None);
        assert_eq!(tile.height_at(Vec3::new(0.0, 1.0, 0.0), 1.0, 1.0), Some(1.0));
    }

    #[test]
    fn test_sloped_ground_tile() {
        let tile = GroundTile::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(4.0, 2.0, 0.0),
        );
        assert!(tile.normal().y > 0.0);
        let h = tile.height_at(Vec3::ZERO, 2.0, 1.0).expect("over tile");
        assert!((h - 1.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_face_reflection_conserves_speed(
            y in 0.3f32..1.7, z in -1.7f32..1.7, gap in 0.01f32..0.19,
            vx in 0.1f32..5.0, vy in -5.0f32..5.0, vz in -5.0f32..5.0,
        ) {
            let wall = test_wall();
            let v = Vec3::new(vx, vy, vz);
            let s = ball(Vec3::new(1.0 - gap, y, z), v);
            let contact = wall.contact(Vec3::ZERO, s.position, s.radius(), s.velocity);
            prop_assert!(contact.is_some());
            let contact = contact.unwrap();
            prop_assert!((contact.velocity.length() - v.length()).abs() < 1e-3);
        }

        #[test]
        fn prop_edge_reflection_conserves_speed(
            dx in -0.1f32..0.1, dy in -0.1f32..0.1, z in -1.5f32..1.5,
            vx in -5.0f32..5.0, vy in -5.0f32..5.0, vz in -5.0f32..5.0,
        ) {
            // Along the top edge, clear of both top corners
            let wall = test_wall();
            let v = Vec3::new(vx, vy, vz);
            let s = ball(Vec3::new(1.0 + dx, 2.0 + dy, z), v);
            let contact = wall.contact(Vec3::ZERO, s.position, s.radius(), s.velocity);
            prop_assert!(contact.is_some());
            let contact = contact.unwrap();
            prop_assert_eq!(contact.kind, ContactKind::Edge);
            prop_assert!((contact.velocity.length() - v.length()).abs() < 1e-3);
        }

        #[test]
        fn prop_corner_reflection_conserves_speed(
            dx in -0.1f32..0.1, dy in -0.1f32..0.1, dz in -0.1f32..0.1,
            vx in -5.0f32..5.0, vy in -5.0f32..5.0, vz in -5.0f32..5.0,
        ) {
            let wall = test_wall();
            let v = Vec3::new(vx, vy, vz);
            let s = ball(Vec3::new(1.0 + dx, 2.0 + dy, 2.0 + dz), v);
            let contact = wall.contact(Vec3::ZERO, s.position, s.radius(), s.velocity);
            prop_assert!(contact.is_some());
            let contact = contact.unwrap();
            prop_assert_eq!(contact.kind, ContactKind::Corner);
            prop_assert!((contact.velocity.length() - v.length()).abs() < 1e-3);
        }
    }
}
