//! Projectile physics
//!
//! Everything thrown in the game is a `Body`: a rotating sprite-sized box that
//! moves by whole pixels each tick and falls under gravity. Velocity is kept in
//! pixels per second and converted to a per-frame displacement on every step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FPS, GRAVITY, SLOW_GRAVITY};
use crate::{normalize_degrees, rotated_extent};

/// World-wide physics switches, owned by the running game
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimContext {
    /// Freeze power-up: gravity and observed velocity are slowed down
    pub slow_motion: bool,
}

impl SimContext {
    /// Gravity increment applied per tick
    #[inline]
    pub fn gravity(&self) -> f32 {
        if self.slow_motion { SLOW_GRAVITY } else { GRAVITY }
    }

    /// Divisor between stored and observed velocity
    #[inline]
    pub fn velocity_scale(&self) -> f32 {
        if self.slow_motion {
            GRAVITY / SLOW_GRAVITY
        } else {
            1.0
        }
    }
}

/// Per-frame displacement for a velocity in pixels/second
#[inline]
pub fn frame_displacement(velocity: Vec2) -> Vec2 {
    (velocity / FPS as f32).floor()
}

/// A gravity-affected, optionally rotating projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center of the sprite
    pub pos: Vec2,
    /// Stored velocity, always in normal-speed units
    vel: Vec2,
    /// Unrotated sprite size
    pub size: Vec2,
    /// Overrides world gravity when set (menu targets float at zero)
    pub personal_gravity: Option<f32>,
    /// Rotation in degrees
    pub angle: f32,
    /// Degrees added to `angle` each tick
    pub angle_delta: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            personal_gravity: None,
            angle: 0.0,
            angle_delta: 0.0,
        }
    }

    /// Velocity as observed under the current context.
    ///
    /// In slow motion the stored value is divided by the scale and floored.
    pub fn velocity(&self, ctx: &SimContext) -> Vec2 {
        if ctx.slow_motion {
            (self.vel / ctx.velocity_scale()).floor()
        } else {
            self.vel
        }
    }

    /// Store an observed velocity. Inverse of [`Body::velocity`], rounded up.
    pub fn set_velocity(&mut self, ctx: &SimContext, vel: Vec2) {
        self.vel = if ctx.slow_motion {
            (vel * ctx.velocity_scale()).ceil()
        } else {
            vel
        };
    }

    /// Raw stored velocity (normal-speed units)
    #[inline]
    pub fn stored_velocity(&self) -> Vec2 {
        self.vel
    }

    /// Advance one tick: move, then accelerate, then rotate
    pub fn step(&mut self, ctx: &SimContext) {
        let gravity = self.personal_gravity.unwrap_or_else(|| ctx.gravity());
        let vel = self.velocity(ctx);
        self.pos += frame_displacement(vel);
        self.set_velocity(ctx, Vec2::new(vel.x, vel.y + gravity));
        if self.angle_delta != 0.0 {
            self.angle = normalize_degrees(self.angle + self.angle_delta);
        }
    }

    /// Axis-aligned bounding size after rotation
    #[inline]
    pub fn extent(&self) -> Vec2 {
        rotated_extent(self.size, self.angle)
    }

    /// Top-left corner of the rotated bounding box
    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.pos - self.extent() / 2.0
    }

    /// Whether the body has left the play area.
    ///
    /// Crossing the top edge does not count: gravity brings it back.
    pub fn outside(&self, width: f32, height: f32) -> bool {
        let extent = self.extent();
        let corner = self.pos - extent / 2.0;
        !(-extent.x < corner.x && corner.x < width) || corner.y > height
    }

    /// Falling away (positive vertical velocity in screen space)
    #[inline]
    pub fn falling(&self) -> bool {
        self.vel.y > 0.0
    }
}
