//! Built-in holes
//!
//! Pure data: each builder lays out walls, floor tiles, hole and par. The
//! game walks the catalog in order, one hole per level.

use glam::Vec3;

use super::course::Course;
use super::scene::{Oscillation, SceneNode};
use super::wall::{GroundTile, Wall, WallBox};
use crate::consts::WALL_HEIGHT;

/// Constructs a fresh course instance
pub type CourseBuilder = fn() -> Course;

/// Every built-in hole, in play order
pub fn default_catalog() -> Vec<CourseBuilder> {
    vec![straight_lane, dogleg, sliding_gate]
}

/// Fill the polygon outline with walls
fn add_outline(course: &mut Course, xz: &[f32]) {
    for wall in WallBox::new(xz, WALL_HEIGHT).into_walls() {
        course.add(SceneNode::wall(wall));
    }
}

fn add_tiles(course: &mut Course, tiles: &[[(f32, f32); 3]]) {
    for [a, b, c] in tiles {
        course.add(SceneNode::ground(GroundTile::flat(*a, *b, *c)));
    }
}

/// Short straight lane, warm-up hole
pub fn straight_lane() -> Course {
    let mut course = Course::new("Straight Lane", 2)
        .with_hole(Vec3::new(0.0, 0.0, 7.0), 0.3)
        .with_start(Vec3::ZERO);
    add_outline(&mut course, &[-1.0, -1.0, -1.0, 9.0, 1.0, 9.0, 1.0, -1.0]);
    add_tiles(
        &mut course,
        &[
            [(-1.0, -1.0), (-1.0, 9.0), (1.0, 9.0)],
            [(-1.0, -1.0), (1.0, 9.0), (1.0, -1.0)],
        ],
    );
    course
}

/// L-shaped hole bending right after the first stretch
pub fn dogleg() -> Course {
    let mut course = Course::new("Dogleg", 3)
        .with_hole(Vec3::new(4.0, 0.0, 8.0), 0.5)
        .with_start(Vec3::ZERO);
    add_outline(
        &mut course,
        &[
            -2.0, -2.0, -2.0, 6.0, 2.0, 6.0, 2.0, 10.0, 6.0, 10.0, 6.0, 2.0, 2.0, 2.0, 2.0, -2.0,
        ],
    );
    let (p1, p2, p3, p4) = ((-2.0, -2.0), (-2.0, 6.0), (2.0, 6.0), (2.0, 10.0));
    let (p5, p6, p7, p8) = ((6.0, 10.0), (6.0, 2.0), (2.0, 2.0), (2.0, -2.0));
    add_tiles(
        &mut course,
        &[[p1, p2, p3], [p4, p5, p6], [p7, p4, p6], [p1, p8, p3]],
    );
    course
}

/// Long lane with a gate sliding across the middle
pub fn sliding_gate() -> Course {
    let mut course = Course::new("Sliding Gate", 3)
        .with_hole(Vec3::new(0.0, 0.0, 10.0), 0.4)
        .with_start(Vec3::ZERO);
    add_outline(&mut course, &[-1.5, -1.0, -1.5, 12.0, 1.5, 12.0, 1.5, -1.0]);
    add_tiles(
        &mut course,
        &[
            [(-1.5, -1.0), (-1.5, 12.0), (1.5, 12.0)],
            [(-1.5, -1.0), (1.5, 12.0), (1.5, -1.0)],
        ],
    );
    let gate = SceneNode::group()
        .with_position(Vec3::new(0.0, 0.0, 5.0))
        .with_oscillation(Oscillation::new(Vec3::X, 0.9, 3.0))
        .with_child(SceneNode::wall(Wall::upright(-0.5, 0.0, 0.5, 0.0, 0.6)));
    course.add(gate);
    course
}
