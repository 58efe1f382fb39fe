//! Scene graph for course geometry
//!
//! A strict tree: every node owns its children, and dropping a node drops
//! its subtree. Behavior per node is dispatched on [`NodeKind`].

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::sphere::Sphere;
use super::wall::{GroundTile, Wall};
use crate::render::Canvas;

/// What a node is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure grouping node
    Group,
    Wall(Wall),
    Ground(GroundTile),
}

/// Sinusoidal back-and-forth motion around a node's base position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: Vec3,
    pub amplitude: f32,
    /// Seconds per full cycle
    pub period: f32,
    /// Cycle fraction in [0, 1)
    pub phase: f32,
}

impl Oscillation {
    pub fn new(axis: Vec3, amplitude: f32, period: f32) -> Self {
        Self {
            axis: axis.normalize_or_zero(),
            amplitude,
            period,
            phase: 0.0,
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.period > 0.0 {
            self.phase = (self.phase + dt / self.period).fract();
        }
    }

    fn offset(&self) -> Vec3 {
        self.axis * self.amplitude * (TAU * self.phase).sin()
    }
}

/// Floor found under a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorContact {
    pub height: f32,
    pub normal: Vec3,
}

/// A node in the course scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    position: Vec3,
    /// Effective position of the parent
    world_position: Vec3,
    pub rotation: Quat,
    pub kind: NodeKind,
    motion: Option<(Vec3, Oscillation)>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            position: Vec3::ZERO,
            world_position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            kind,
            motion: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn wall(wall: Wall) -> Self {
        Self::new(NodeKind::Wall(wall))
    }

    pub fn ground(tile: GroundTile) -> Self {
        Self::new(NodeKind::Ground(tile))
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    /// Oscillate around the current position
    pub fn with_oscillation(mut self, oscillation: Oscillation) -> Self {
        self.motion = Some((self.position, oscillation));
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    /// Where this node's own geometry sits in the world
    pub fn effective_position(&self) -> Vec3 {
        self.world_position + self.position
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&SceneNode> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.children.get_mut(index)
    }

    /// Take ownership of `child` and return its index
    pub fn add_child(&mut self, mut child: SceneNode) -> usize {
        child.set_world_position(self.effective_position());
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.propagate();
    }

    fn set_world_position(&mut self, world_position: Vec3) {
        self.world_position = world_position;
        self.propagate();
    }

    fn propagate(&mut self) {
        let effective = self.effective_position();
        for child in &mut self.children {
            child.set_world_position(effective);
        }
    }

    /// Advance animation for this subtree
    pub fn tick(&mut self, dt: f32) {
        if let Some((base, mut oscillation)) = self.motion {
            oscillation.advance(dt);
            self.motion = Some((base, oscillation));
            self.set_position(base + oscillation.offset());
        }
        for child in &mut self.children {
            child.tick(dt);
        }
    }

    /// Collide a sphere with this subtree, stopping at the first hit
    pub fn collide(&self, sphere: &mut Sphere) -> bool {
        let hit = match &self.kind {
            NodeKind::Wall(wall) => wall.collide(self.effective_position(), sphere),
            NodeKind::Group | NodeKind::Ground(_) => false,
        };
        hit || self.children.iter().any(|child| child.collide(sphere))
    }

    /// Highest floor under `point` that is no higher than `max_height`
    pub fn floor_below(&self, point: Vec3, max_height: f32) -> Option<FloorContact> {
        let own = match &self.kind {
            NodeKind::Ground(tile) => tile
                .height_at(self.effective_position(), point.x, point.z)
                .filter(|h| *h <= max_height)
                .map(|height| FloorContact {
                    height,
                    normal: tile.normal(),
                }),
            NodeKind::Group | NodeKind::Wall(_) => None,
        };
        self.children
            .iter()
            .filter_map(|child| child.floor_below(point, max_height))
            .chain(own)
            .max_by(|a, b| a.height.total_cmp(&b.height))
    }

    /// Draw this subtree under `parent`'s transform
    pub fn draw(&self, canvas: &mut dyn Canvas, parent: &Mat4) {
        let transform = *parent * Mat4::from_rotation_translation(self.rotation, self.position);
        match &self.kind {
            NodeKind::Wall(wall) => wall.draw(canvas, &transform),
            NodeKind::Ground(tile) => tile.draw(canvas, &transform),
            NodeKind::Group => {}
        }
        for child in &self.children {
            child.draw(canvas, &transform);
        }
    }
}
