//! Per-frame game rules: gravity, flapping, pipe spawning, scoring and death.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    geometry::Rect,
    physics::{
        DESPAWN_X, FLOOR_MARGIN, MIN_MAX_TOP, MIN_PIPE_WIDTH, MIN_PLAYER_SIZE, MIN_TOP_HEIGHT,
        Physics, SPAWN_OFFSET,
    },
};

/// Drawing surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Canvas {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Canvas {
    /// Narrowest canvas the player page renders.
    pub const MIN_WIDTH: f64 = 320.0;
    /// Widest canvas the player page renders.
    pub const MAX_WIDTH: f64 = 480.0;
    /// Shortest canvas the player page renders.
    pub const MIN_HEIGHT: f64 = 560.0;

    /// Canvas of exactly `width` by `height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size the canvas for a browser viewport, leaving room for the page chrome.
    pub fn fit(viewport_width: f64, viewport_height: f64) -> Self {
        let width = (viewport_width - 24.0)
            .min(Self::MAX_WIDTH)
            .max(Self::MIN_WIDTH)
            .floor();
        let height = (viewport_height - 120.0).round().max(Self::MIN_HEIGHT);
        Self { width, height }
    }
}

/// Natural pixel size of the player sprite, used to keep its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpriteSize {
    /// Natural width.
    pub width: u32,
    /// Natural height.
    pub height: u32,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Player box overlapped an obstacle.
    Pipe,
    /// Player box rose above the top edge.
    Ceiling,
    /// Player box fell below the bottom edge.
    Floor,
}

/// Whether the world still advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The run is in progress.
    Running,
    /// The run ended; only a flap restarts it.
    Dead(DeathCause),
}

/// Result of a single [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The world was already dead and did not change.
    Halted,
    /// The run continues; `scored` pipe pairs were cleared during this step.
    Running { scored: u32 },
    /// The run ended during this step.
    Died(DeathCause),
}

/// The controllable box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Collision box.
    pub body: Rect,
    /// Vertical velocity (px/s, positive is down).
    pub vy: f64,
}

/// One half of an obstacle pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Collision box.
    pub rect: Rect,
    /// Top pipes hang from the ceiling and are the ones that award points.
    pub top: bool,
    /// Shared by the top and bottom pipe of a pair.
    pub pair_id: u64,
    /// Set once the pair has been scored.
    pub passed: bool,
}

/// Complete simulation state of one run.
pub struct World {
    physics: Physics,
    canvas: Canvas,
    sprite: Option<SpriteSize>,
    player: Player,
    pipes: Vec<Pipe>,
    pipe_speed: f64,
    gap: f64,
    since_spawn: f64,
    score: u32,
    status: Status,
    next_pair_id: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Start a run. Pipe placement is drawn from a PRNG seeded with `seed`.
    pub fn new(canvas: Canvas, physics: Physics, sprite: Option<SpriteSize>, seed: u64) -> Self {
        Self {
            player: spawn_player(&canvas, &physics, sprite),
            pipes: Vec::new(),
            pipe_speed: physics.pipe_speed_base,
            gap: physics.gap,
            since_spawn: 0.0,
            score: 0,
            status: Status::Running,
            next_pair_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            physics,
            canvas,
            sprite,
        }
    }

    /// Canvas the run is played on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Current player state.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Pipes on screen, oldest first.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Pipe pairs passed in this run.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether the run is still going.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Shorthand for a [`Status::Dead`] status.
    pub fn is_dead(&self) -> bool {
        matches!(self.status, Status::Dead(_))
    }

    /// Current horizontal pipe speed (px/s).
    pub fn pipe_speed(&self) -> f64 {
        self.pipe_speed
    }

    /// Current opening between the pipes of a pair (px).
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Player input. A flap on a dead world starts a new run instead.
    pub fn flap(&mut self) {
        if self.is_dead() {
            self.restart();
            return;
        }
        self.player.vy = self.physics.flap_velocity;
    }

    /// Reset the run in place. The PRNG stream continues, so the next run
    /// gets a fresh pipe layout.
    pub fn restart(&mut self) {
        self.player = spawn_player(&self.canvas, &self.physics, self.sprite);
        self.pipes.clear();
        self.pipe_speed = self.physics.pipe_speed_base;
        self.gap = self.physics.gap;
        self.since_spawn = 0.0;
        self.score = 0;
        self.status = Status::Running;
    }

    /// Advance the simulation by `dt` seconds (clamped to the maximum frame step).
    pub fn step(&mut self, dt: f64) -> StepOutcome {
        if self.is_dead() {
            return StepOutcome::Halted;
        }
        let dt = self.physics.clamp_step(dt);

        let player = &mut self.player;
        player.vy = (player.vy + self.physics.gravity * dt).min(self.physics.max_fall_speed);
        player.body.y += player.vy * dt;

        self.since_spawn += dt;
        if self.since_spawn >= self.physics.spawn_interval {
            self.since_spawn = 0.0;
            self.spawn_pair();
        }

        let body = self.player.body;
        let mut scored = 0;
        let mut hit = false;
        for index in (0..self.pipes.len()).rev() {
            let pipe = &mut self.pipes[index];
            pipe.rect.x -= self.pipe_speed * dt;
            let rect = pipe.rect;

            if pipe.top && !pipe.passed && rect.right() < body.x {
                let pair_id = pipe.pair_id;
                scored += 1;
                self.pipes
                    .iter_mut()
                    .filter(|candidate| candidate.pair_id == pair_id)
                    .for_each(|candidate| candidate.passed = true);
            }

            if rect.right() < DESPAWN_X {
                self.pipes.remove(index);
            }

            if rect.intersects(&body) {
                hit = true;
                break;
            }
        }
        self.score += scored;

        if hit {
            return self.die(DeathCause::Pipe);
        }
        if body.y < 0.0 {
            return self.die(DeathCause::Ceiling);
        }
        if body.bottom() > self.canvas.height {
            return self.die(DeathCause::Floor);
        }

        self.pipe_speed += self.physics.pipe_acceleration * dt;
        if self.gap > self.physics.min_gap {
            self.gap = (self.gap - self.physics.gap_shrink * dt).max(self.physics.min_gap);
        }

        StepOutcome::Running { scored }
    }

    fn die(&mut self, cause: DeathCause) -> StepOutcome {
        self.status = Status::Dead(cause);
        StepOutcome::Died(cause)
    }

    fn spawn_pair(&mut self) {
        let height = self.canvas.height;
        let max_top = (height - self.gap - FLOOR_MARGIN).max(MIN_MAX_TOP);
        // floor(u * (span + 1)) with u in [0, 1): a fractional span can still
        // reach ceil(span).
        let span = (max_top - MIN_TOP_HEIGHT).max(0.0);
        let offset = (self.rng.random::<f64>() * (span + 1.0)).floor();
        let top_height = MIN_TOP_HEIGHT + offset;

        let x = self.canvas.width + SPAWN_OFFSET;
        let width = (self.canvas.width * self.physics.pipe_width_ratio)
            .round()
            .max(MIN_PIPE_WIDTH);
        let bottom_y = top_height + self.gap;
        let pair_id = self.next_pair_id;
        self.next_pair_id += 1;

        self.pipes.push(Pipe {
            rect: Rect::new(x, 0.0, width, top_height),
            top: true,
            pair_id,
            passed: false,
        });
        self.pipes.push(Pipe {
            rect: Rect::new(x, bottom_y, width, height - bottom_y),
            top: false,
            pair_id,
            passed: false,
        });
    }
}

fn spawn_player(canvas: &Canvas, physics: &Physics, sprite: Option<SpriteSize>) -> Player {
    let width = (canvas.width * physics.player_width_ratio)
        .round()
        .max(MIN_PLAYER_SIZE);
    let height = match sprite {
        Some(SpriteSize {
            width: sw,
            height: sh,
        }) if sw > 0 && sh > 0 => (width * f64::from(sh) / f64::from(sw))
            .round()
            .max(MIN_PLAYER_SIZE),
        _ => MIN_PLAYER_SIZE,
    };
    let y = (canvas.height / 2.0 - height / 2.0).round();

    Player {
        body: Rect::new(physics.player_x, y, width, height),
        vy: 0.0,
    }
}
