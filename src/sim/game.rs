//! Game session: players, course progression and the shot state machine
//!
//! The driving loop (see `tick.rs`) moves the balls; [`Game::tick`] decides
//! whose turn it is, when a shot is over and when a hole or the whole
//! session ends.

use std::collections::VecDeque;
use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::course::Course;
use super::courses::CourseBuilder;
use super::player::Player;
use super::scoring::{GameSummary, ScoreTerm};
use crate::render::{Color, DebugConfig, DrawList};
use crate::settings::RuleSettings;

/// Per-turn lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotState {
    /// Choosing the next player
    #[default]
    Ready,
    /// Waiting for input: only `shoot_ball` moves on to `Moving`
    Aiming,
    /// Physics owns the ball
    Moving,
    /// Session over, restarts on the next tick
    Finished,
}

/// Things worth reporting, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize, name: String, par: u32 },
    TurnStarted { player: String },
    ShotTaken { player: String, stroke: u32 },
    OutOfBounds { player: String, strokes: u32 },
    HoleCompleted { player: String, strokes: u32, term: ScoreTerm },
    GameOver { summary: GameSummary },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::LevelStarted { level, name, par } => {
                write!(f, "Hole {} - {name} (par {par})", level + 1)
            }
            GameEvent::TurnStarted { player } => write!(f, "{player} is up"),
            GameEvent::ShotTaken { player, stroke } => write!(f, "{player} takes stroke {stroke}"),
            GameEvent::OutOfBounds { player, strokes } => {
                write!(f, "{player} out of bounds, penalty stroke ({strokes})")
            }
            GameEvent::HoleCompleted {
                player,
                strokes,
                term,
            } => write!(f, "{player} holed out in {strokes}: {term}"),
            GameEvent::GameOver { summary } => match summary.winner() {
                Some(winner) => write!(
                    f,
                    "Game over - {} wins with {}\n{summary}",
                    winner.name, winner.score
                ),
                None => write!(f, "Game over"),
            },
        }
    }
}

/// Most events kept when nobody drains them
pub const MAX_PENDING_EVENTS: usize = 256;

/// Bounded event backlog; the oldest events are dropped when full
#[derive(Debug, Default)]
pub(crate) struct EventQueue(VecDeque<GameEvent>);

impl EventQueue {
    pub(crate) fn push(&mut self, event: GameEvent) {
        if self.0.len() >= MAX_PENDING_EVENTS {
            self.0.pop_front();
        }
        self.0.push_back(event);
    }

    pub(crate) fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.push(event);
        }
    }

    pub(crate) fn drain(&mut self) -> Vec<GameEvent> {
        self.0.drain(..).collect()
    }
}

/// Read-only view of a player for rendering and reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub radius: f32,
    pub color: Color,
    pub strokes: u32,
    pub score: u32,
    pub finished_hole: bool,
}

/// Everything a frontend needs for one frame, taken at a tick boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: usize,
    pub course: Option<String>,
    pub par: u32,
    pub shot_state: ShotState,
    pub current_player: Option<usize>,
    pub players: Vec<PlayerView>,
    pub draw_list: DrawList,
}

/// A game session
#[derive(Debug)]
pub struct Game {
    players: Vec<Player>,
    catalog: Vec<CourseBuilder>,
    course: Option<Course>,
    current_level: usize,
    current_player: Option<usize>,
    shot_state: ShotState,
    shot_start: Vec3,
    last_ball_position: Vec3,
    no_movement_counter: u32,
    rules: RuleSettings,
    events: EventQueue,
    last_summary: Option<GameSummary>,
}

impl Game {
    /// Create a session and load the first hole
    pub fn new(players: Vec<Player>, catalog: Vec<CourseBuilder>, rules: RuleSettings) -> Self {
        let mut game = Self {
            players,
            catalog,
            course: None,
            current_level: 0,
            current_player: None,
            shot_state: ShotState::Ready,
            shot_start: Vec3::ZERO,
            last_ball_position: Vec3::ZERO,
            no_movement_counter: 0,
            rules,
            events: EventQueue::default(),
            last_summary: None,
        };
        game.start();
        game
    }

    /// (Re)start the session from the first hole
    pub fn start(&mut self) {
        log::info!("Starting game with {} players", self.players.len());
        for player in &mut self.players {
            let at = player.ball.position;
            player.reset_all(at);
        }
        if !self.load_level(0) {
            log::warn!("No courses in catalog");
            self.end_game();
        }
    }

    /// Replace the current course with catalog entry `level`
    fn load_level(&mut self, level: usize) -> bool {
        let Some(build) = self.catalog.get(level) else {
            return false;
        };
        let course = build();
        for player in &mut self.players {
            player.reset(course.start_position);
        }

        log::info!("Hole {}: {} (par {})", level + 1, course.name, course.par);
        self.events.push(GameEvent::LevelStarted {
            level,
            name: course.name.clone(),
            par: course.par,
        });

        self.current_level = level;
        self.current_player = None;
        self.shot_state = ShotState::Ready;
        self.no_movement_counter = 0;
        // Previous course subtree is dropped here
        self.course = Some(course);
        true
    }

    /// Advance to the next hole; `false` when the catalog is exhausted
    pub fn next_level(&mut self) -> bool {
        self.load_level(self.current_level + 1)
    }

    /// Whether every player has holed out on the current course
    pub fn check_hole_ending(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.finished_hole)
    }

    /// Report standings, reset players and mark the session finished
    pub fn end_game(&mut self) {
        let summary = GameSummary::new(self.players.iter().map(|p| (p.name.as_str(), p.score)));
        match summary.winner() {
            Some(winner) => log::info!("Game over, {} wins with {}", winner.name, winner.score),
            None => log::info!("Game over"),
        }
        for line in summary.to_string().lines() {
            log::info!("{line}");
        }
        self.events.push(GameEvent::GameOver {
            summary: summary.clone(),
        });
        self.last_summary = Some(summary);

        for player in &mut self.players {
            let at = player.ball.position;
            player.reset_all(at);
        }
        self.course = None;
        self.current_player = None;
        self.shot_state = ShotState::Finished;
    }

    /// Submit a shot for the current player
    ///
    /// Ignored (returns `false`) while a ball is moving or nobody is up.
    pub fn shoot_ball(&mut self, velocity: Vec3) -> bool {
        if self.shot_state == ShotState::Moving {
            return false;
        }
        let Some(idx) = self.current_player else {
            return false;
        };
        let Some(player) = self.players.get_mut(idx) else {
            return false;
        };
        if player.finished_hole {
            return false;
        }

        self.shot_start = player.ball.position;
        self.last_ball_position = player.ball.position;
        self.no_movement_counter = 0;
        player.ball.velocity = velocity;
        player.strokes += 1;
        self.shot_state = ShotState::Moving;

        log::debug!("{} shoots {:?} (stroke {})", player.name, velocity, player.strokes);
        self.events.push(GameEvent::ShotTaken {
            player: player.name.clone(),
            stroke: player.strokes,
        });
        true
    }

    /// One turn-logic step; call after physics has moved the balls
    pub fn tick(&mut self, dt: f32) {
        if self.course.is_none() {
            // Nothing to restart into without courses
            if self.shot_state == ShotState::Finished && !self.catalog.is_empty() {
                self.start();
            }
            return;
        }

        if self.check_hole_ending() && !self.next_level() {
            self.end_game();
            return;
        }

        self.recover_strays();

        match self.shot_state {
            ShotState::Ready => self.get_next_player(),
            ShotState::Aiming => {
                let finished = self
                    .current_player
                    .and_then(|idx| self.players.get(idx))
                    .is_none_or(|p| p.finished_hole);
                if finished {
                    self.to_ready();
                }
            }
            ShotState::Moving => self.update_moving(),
            ShotState::Finished => {
                self.start();
                return;
            }
        }

        if let Some(course) = &mut self.course {
            for done in course.tick(&mut self.players, dt) {
                let name = self.players[done.player].name.clone();
                log::info!("{name} holed out in {}: {}", done.strokes, done.term);
                self.events.push(GameEvent::HoleCompleted {
                    player: name,
                    strokes: done.strokes,
                    term: done.term,
                });
            }
        }
    }

    /// Send balls that left the course outside their own shot back to the tee
    ///
    /// The ball in flight for the current shot is handled by `update_moving`.
    /// Players who already took a stroke on this hole pay one penalty stroke.
    fn recover_strays(&mut self) {
        let Some(course) = &self.course else {
            return;
        };
        let start = course.start_position;
        let limit = self.rules.out_of_bounds_y;

        for (idx, player) in self.players.iter_mut().enumerate() {
            let in_flight =
                self.shot_state == ShotState::Moving && self.current_player == Some(idx);
            if in_flight || !player.in_game() || player.ball.position.y >= limit {
                continue;
            }

            player.ball.place(start);
            player.ball.velocity = Vec3::ZERO;
            player.ball.floor_normal = Vec3::ZERO;
            if player.strokes > 0 {
                player.strokes += 1;
            }
            log::info!("{} knocked out of bounds, back to the tee", player.name);
            self.events.push(GameEvent::OutOfBounds {
                player: player.name.clone(),
                strokes: player.strokes,
            });

            if self.current_player == Some(idx) {
                self.shot_start = start;
                self.last_ball_position = start;
            }
        }
    }

    /// Pick who plays next
    ///
    /// Players who haven't teed off go first, in list order. After that the
    /// in-game player farthest from the hole is up; on a tie the first wins.
    fn get_next_player(&mut self) {
        let Some(course) = &self.course else {
            return;
        };
        let hole = course.hole_position;

        if let Some(idx) = self.players.iter().position(|p| !p.started_hole) {
            self.players[idx].started_hole = true;
            self.begin_turn(idx);
            return;
        }

        let mut farthest: Option<(usize, f32)> = None;
        for (idx, player) in self.players.iter().enumerate() {
            if !player.in_game() {
                continue;
            }
            let dist = player.ball.position.distance(hole);
            if farthest.is_none_or(|(_, max)| dist > max) {
                farthest = Some((idx, dist));
            }
        }
        if let Some((idx, _)) = farthest {
            self.begin_turn(idx);
        }
    }

    fn begin_turn(&mut self, idx: usize) {
        let player = &self.players[idx];
        self.current_player = Some(idx);
        self.shot_start = player.ball.position;
        self.last_ball_position = player.ball.position;
        self.no_movement_counter = 0;
        self.shot_state = ShotState::Aiming;

        log::debug!("{} is up", player.name);
        self.events.push(GameEvent::TurnStarted {
            player: player.name.clone(),
        });
    }

    fn to_ready(&mut self) {
        self.current_player = None;
        self.no_movement_counter = 0;
        self.shot_state = ShotState::Ready;
    }

    fn update_moving(&mut self) {
        let Some(player) = self.current_player.and_then(|idx| self.players.get_mut(idx)) else {
            self.to_ready();
            return;
        };
        if player.finished_hole {
            self.to_ready();
            return;
        }

        let position = player.ball.position;
        if position.distance(self.last_ball_position) < self.rules.stall_distance {
            self.no_movement_counter += 1;
        } else {
            self.no_movement_counter = 0;
        }
        self.last_ball_position = position;

        if self.no_movement_counter > self.rules.stall_ticks {
            log::debug!("{}'s ball came to rest", player.name);
            self.to_ready();
            return;
        }

        if position.y < self.rules.out_of_bounds_y {
            player.ball.place(self.shot_start);
            player.ball.velocity = Vec3::ZERO;
            player.ball.floor_normal = Vec3::ZERO;
            player.strokes += 1;

            log::info!("{} out of bounds, penalty stroke", player.name);
            self.events.push(GameEvent::OutOfBounds {
                player: player.name.clone(),
                strokes: player.strokes,
            });
            self.last_ball_position = self.shot_start;
            self.no_movement_counter = 0;
            self.shot_state = ShotState::Aiming;
        }
    }

    /// Take all events reported since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Capture a render/report view of the current state
    pub fn snapshot(&self, debug: &DebugConfig) -> Snapshot {
        let mut draw_list = DrawList::new();
        if let Some(course) = &self.course {
            course.draw(&mut draw_list, &self.players, debug);
        }
        Snapshot {
            level: self.current_level,
            course: self.course.as_ref().map(|c| c.name.clone()),
            par: self.course.as_ref().map_or(0, |c| c.par),
            shot_state: self.shot_state,
            current_player: self.current_player,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    name: p.name.clone(),
                    position: p.ball.position,
                    rotation: p.ball.rotation,
                    radius: p.ball.radius(),
                    color: p.ball.color,
                    strokes: p.strokes,
                    score: p.score,
                    finished_hole: p.finished_hole,
                })
                .collect(),
            draw_list,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Borrow the course and the players at the same time
    pub fn course_and_players_mut(&mut self) -> (Option<&Course>, &mut [Player]) {
        (self.course.as_ref(), &mut self.players)
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn current_player(&self) -> Option<usize> {
        self.current_player
    }

    pub fn shot_state(&self) -> ShotState {
        self.shot_state
    }

    pub fn shot_start(&self) -> Vec3 {
        self.shot_start
    }

    pub fn no_movement_counter(&self) -> u32 {
        self.no_movement_counter
    }

    pub fn rules(&self) -> &RuleSettings {
        &self.rules
    }

    /// Result of the most recently finished session
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }
}
