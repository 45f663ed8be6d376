//! Live object sets and their lifecycle
//!
//! The world owns every projectile, fragment and effect on screen. It knows
//! what happens when something is cut or leaves the play area; scoring and
//! lives are the mode's business.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Effect, Fragment, Lifecycle, Projectile};
use super::physics::SimContext;
use super::state::Outbox;
use crate::audio::Cue;
use crate::consts::{EFFECT_FADE, HEIGHT, WIDTH};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Fruit, hazards and pickups, in spawn order
    pub projectiles: Vec<Projectile>,
    pub fragments: Vec<Fragment>,
    pub effects: Vec<Effect>,
    next_id: u32,
}

impl World {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Throw a projectile up from below the screen and play its launch cue
    pub fn spawn_thrown(
        &mut self,
        category: Category,
        ctx: &SimContext,
        tuning: &Tuning,
        rng: &mut impl Rng,
        events: &mut Outbox,
    ) -> u32 {
        let id = self.next_id();
        let projectile = Projectile::thrown(
            id,
            category,
            ctx,
            tuning.launch_speed_x.as_tuple(),
            tuning.launch_speed_y.as_tuple(),
            rng,
        );
        log::debug!("spawn {:?} #{} at x={}", category, id, projectile.body.pos.x);
        self.projectiles.push(projectile);

        if category.is_hazard() {
            events.play(Cue::BombThrow);
            events.play_looping(Cue::BombFuse(id));
        } else {
            events.play(Cue::FruitThrow);
        }
        id
    }

    /// Place a weightless projectile, centered at `pos` (menu targets)
    pub fn place(&mut self, category: Category, pos: Vec2, rng: &mut impl Rng) -> u32 {
        let id = self.next_id();
        let mut projectile = Projectile::new(id, category, pos, rng);
        projectile.body.personal_gravity = Some(0.0);
        self.projectiles.push(projectile);
        id
    }

    /// Advance every body one tick and fade effects
    pub fn step(&mut self, ctx: &SimContext) {
        for p in &mut self.projectiles {
            p.body.step(ctx);
        }
        for f in &mut self.fragments {
            f.body.step(ctx);
        }
        for e in &mut self.effects {
            e.alpha -= EFFECT_FADE;
        }
        self.effects.retain(|e| e.alpha > 0);
    }

    /// Run the cut behavior of the projectile at `index` and mark it cut.
    ///
    /// Cut projectiles stay in the list until [`World::purge_cut`] so
    /// indices from the same blade sample remain valid.
    pub fn cut(&mut self, index: usize, ctx: &SimContext, rng: &mut impl Rng, events: &mut Outbox) {
        let Some(projectile) = self.projectiles.get_mut(index) else {
            return;
        };
        if !projectile.is_alive() {
            return;
        }
        projectile.state = Lifecycle::Cut;
        let (id, category, pos) = (projectile.id, projectile.category, projectile.body.pos);
        let vel = projectile.body.velocity(ctx);
        log::debug!("cut {:?} #{}", category, id);

        if category.capabilities().fragments_on_cut {
            if let Some(kind) = category.fruit() {
                self.fragments.extend(Fragment::pair(kind, pos, vel, ctx, rng));
                self.effects.push(Effect::splash(pos, rng));
                events.play(Cue::FruitCut);
            }
        }
        if category.is_hazard() {
            events.stop(Cue::BombFuse(id));
            events.play(Cue::BombExplode);
        }
    }

    /// Drop projectiles that were cut
    pub fn purge_cut(&mut self) {
        self.projectiles.retain(|p| p.state == Lifecycle::Alive);
    }

    /// Remove everything that fell out of the play area.
    ///
    /// Returns how many of the removed projectiles count as misses.
    pub fn sweep_out_of_bounds(&mut self, events: &mut Outbox) -> u32 {
        let mut missed = 0;
        for p in &mut self.projectiles {
            if p.is_alive() && p.body.falling() && p.body.outside(WIDTH, HEIGHT) {
                p.state = Lifecycle::Removed;
                if p.category.is_hazard() {
                    events.stop(Cue::BombFuse(p.id));
                }
                if p.category.capabilities().counts_as_miss {
                    log::debug!("missed {:?} #{}", p.category, p.id);
                    missed += 1;
                }
            }
        }
        self.projectiles.retain(|p| p.state != Lifecycle::Removed);
        self.fragments
            .retain(|f| !(f.body.falling() && f.body.outside(WIDTH, HEIGHT)));
        missed
    }

    /// Remove all projectiles and fragments, stopping any fuse loops
    pub fn clear(&mut self, events: &mut Outbox) {
        for p in self.projectiles.drain(..) {
            if p.category.is_hazard() && p.state == Lifecycle::Alive {
                events.stop(Cue::BombFuse(p.id));
            }
        }
        self.fragments.clear();
    }

    /// [`World::clear`] plus effects
    pub fn clear_all(&mut self, events: &mut Outbox) {
        self.clear(events);
        self.effects.clear();
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn live(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.is_alive())
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.fragments.is_empty() && self.effects.is_empty()
    }
}
