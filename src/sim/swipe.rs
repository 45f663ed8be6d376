//! Swipe tracking, cut detection and straight-slash combos
//!
//! A session runs from pointer press to release (or until the session cycle
//! force-ends it). While it is open every pointer sample is recorded and the
//! blade is tested against live projectiles. Closing the session scores any
//! straight-line run of cuts.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Category;
use super::physics::SimContext;
use super::state::Outbox;
use super::world::World;
use crate::consts::{BLADE_SIZE, COMBO_CURVATURE_LIMIT, MAX_COMBO_TIER, MAX_TRACK_POINTS};

/// Deviation of `p1` from the straight line p0 -> p2.
///
/// Twice the triangle's height over the p0-p2 base, i.e. 2·|det| / |p2 - p0|.
/// Coincident endpoints give 1. Because of the factor of two, the
/// `COMBO_CURVATURE_LIMIT` of 125 admits a height of at most 62.5 px.
pub fn curvature(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    let base = p2 - p0;
    let len = base.length();
    if len == 0.0 {
        return 1.0;
    }
    2.0 * (p1 - p0).perp_dot(base).abs() / len
}

/// Longest run of consecutive near-straight triplets among the cut centers
pub fn max_combo_run(centers: &[Vec2]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for w in centers.windows(3) {
        if curvature(w[0], w[1], w[2]) <= COMBO_CURVATURE_LIMIT {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Bonus earned by a straight slash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAward {
    /// Longest run of straight triplets
    pub run: u32,
    pub bonus: i64,
    /// Combo cue tier, 1..=8
    pub tier: u8,
}

impl ComboAward {
    /// Fruits in the slash (a run of N triplets spans N + 2 cuts)
    pub fn fruits(&self) -> u32 {
        self.run + 2
    }

    pub fn text(&self) -> String {
        format!("Combo {} fruits", self.fruits())
    }
}

/// Combo bonus for a session's cut centers, if any
pub fn combo_award(centers: &[Vec2]) -> Option<ComboAward> {
    let run = max_combo_run(centers);
    (run >= 1).then(|| ComboAward {
        run,
        bonus: 2 * run as i64,
        tier: run.min(MAX_COMBO_TIER) as u8,
    })
}

/// One projectile the blade went through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutOutcome {
    pub id: u32,
    pub category: Category,
    pub center: Vec2,
}

/// Everything a single blade sample cut
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutReport {
    pub cuts: Vec<CutOutcome>,
    /// A hazard was among the cuts
    pub hazard: bool,
}

impl CutReport {
    #[inline]
    pub fn any_cut(&self) -> bool {
        !self.cuts.is_empty()
    }
}

/// Pointer track and cut history of the current swipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeTracker {
    active: bool,
    /// Top-left corner of the blade hit box; follows the pointer always
    blade: Vec2,
    /// Newest sample last
    track: Vec<Vec2>,
    /// Centers of everything cut this session, in cut order
    cuts: Vec<Vec2>,
}

impl SwipeTracker {
    /// Open a session. Does nothing if one is already open.
    pub fn begin_session(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.track.clear();
        self.cuts.clear();
    }

    /// Close the session and score its cuts.
    ///
    /// History is cleared whatever the outcome.
    pub fn end_session(&mut self) -> Option<ComboAward> {
        if !self.active {
            return None;
        }
        self.active = false;
        let award = if self.cuts.is_empty() {
            None
        } else {
            combo_award(&self.cuts)
        };
        self.track.clear();
        self.cuts.clear();
        award
    }

    /// Drop the session without scoring it
    pub fn reset(&mut self) {
        self.active = false;
        self.track.clear();
        self.cuts.clear();
    }

    /// Move the blade to `p`, recording it while a session is open
    pub fn add_position(&mut self, p: Vec2) {
        self.blade = p;
        if !self.active {
            return;
        }
        self.track.push(p);
        if self.track.len() > MAX_TRACK_POINTS {
            self.track.remove(0);
        }
    }

    /// Cut every live projectile under the blade.
    ///
    /// Each cut projectile's center is recorded and its category's cut
    /// behavior runs through the world. Nothing happens outside a session.
    pub fn test_cut(
        &mut self,
        world: &mut World,
        ctx: &SimContext,
        rng: &mut impl Rng,
        events: &mut Outbox,
    ) -> CutReport {
        let mut report = CutReport::default();
        if !self.active {
            return report;
        }

        let center = self.blade_center();
        let half = Vec2::splat(BLADE_SIZE / 2.0);
        let hits: Vec<usize> = world
            .projectiles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive() && p.mask().overlaps_box(center, half))
            .map(|(i, _)| i)
            .collect();

        for index in hits {
            let projectile = &world.projectiles[index];
            let outcome = CutOutcome {
                id: projectile.id,
                category: projectile.category,
                center: projectile.body.pos,
            };
            world.cut(index, ctx, rng, events);
            self.cuts.push(outcome.center);
            report.hazard |= outcome.category.is_hazard();
            report.cuts.push(outcome);
        }
        world.purge_cut();
        report
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn blade_center(&self) -> Vec2 {
        self.blade + Vec2::splat(BLADE_SIZE / 2.0)
    }

    pub fn track(&self) -> &[Vec2] {
        &self.track
    }

    pub fn cut_centers(&self) -> &[Vec2] {
        &self.cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::FruitKind;
    use crate::sim::state::test_rng;
    use proptest::prelude::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Vec2> {
        raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn test_gentle_zigzag_is_a_combo() {
        let centers = pts(&[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0), (30.0, 1.0), (40.0, 0.0)]);
        let award = combo_award(&centers).unwrap();
        assert_eq!(award.run, 3);
        assert_eq!(award.bonus, 6);
        assert_eq!(award.tier, 3);
        assert_eq!(award.text(), "Combo 5 fruits");
    }

    #[test]
    fn test_sharp_turn_is_not_a_combo() {
        let centers = pts(&[(0.0, 0.0), (10.0, 100.0), (20.0, 0.0)]);
        assert!(curvature(centers[0], centers[1], centers[2]) > COMBO_CURVATURE_LIMIT);
        assert_eq!(combo_award(&centers), None);
    }

    #[test]
    fn test_limit_is_half_the_curvature_height() {
        let (p0, p2) = (Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!((curvature(p0, Vec2::new(50.0, 62.5), p2) - 125.0).abs() < 1e-3);
        assert!(combo_award(&[p0, Vec2::new(50.0, 62.0), p2]).is_some());
        assert!(combo_award(&[p0, Vec2::new(50.0, 63.0), p2]).is_none());
    }

    #[test]
    fn test_coincident_endpoints() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(curvature(p, Vec2::new(300.0, 0.0), p), 1.0);
    }

    #[test]
    fn test_run_restarts_after_bend() {
        // straight, straight, bend, straight
        let centers = pts(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (200.0, 0.0),
            (300.0, 0.0),
            (300.0, 400.0),
            (300.0, 500.0),
        ]);
        assert_eq!(max_combo_run(&centers), 2);
    }

    #[test]
    fn test_tier_caps_at_eight() {
        let centers: Vec<Vec2> = (0..20).map(|i| Vec2::new(i as f32 * 30.0, 0.0)).collect();
        let award = combo_award(&centers).unwrap();
        assert_eq!(award.run, 18);
        assert_eq!(award.tier, 8);
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut rng = test_rng(1);
        let ctx = SimContext::default();
        let mut events = Outbox::default();
        let mut world = World::default();
        world.place(Category::Fruit(FruitKind::Orange), Vec2::new(300.0, 300.0), &mut rng);

        let mut swipe = SwipeTracker::default();
        swipe.begin_session();
        swipe.add_position(Vec2::new(295.0, 295.0));
        let report = swipe.test_cut(&mut world, &ctx, &mut rng, &mut events);
        assert_eq!(report.cuts.len(), 1);

        swipe.begin_session();
        assert_eq!(swipe.cut_centers(), &[Vec2::new(300.0, 300.0)]);
        assert_eq!(swipe.track().len(), 1);
    }

    #[test]
    fn test_no_cuts_outside_session() {
        let mut rng = test_rng(2);
        let ctx = SimContext::default();
        let mut events = Outbox::default();
        let mut world = World::default();
        world.place(Category::Hazard, Vec2::new(300.0, 300.0), &mut rng);

        let mut swipe = SwipeTracker::default();
        swipe.add_position(Vec2::new(295.0, 295.0));
        assert!(swipe.track().is_empty());
        assert!(!swipe.test_cut(&mut world, &ctx, &mut rng, &mut events).any_cut());
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_cut_hits_every_overlap_once() {
        let mut rng = test_rng(3);
        let ctx = SimContext::default();
        let mut events = Outbox::default();
        let mut world = World::default();
        world.place(Category::Fruit(FruitKind::Lime), Vec2::new(400.0, 400.0), &mut rng);
        world.place(Category::Hazard, Vec2::new(410.0, 400.0), &mut rng);
        world.place(Category::Fruit(FruitKind::Lemon), Vec2::new(900.0, 400.0), &mut rng);

        let mut swipe = SwipeTracker::default();
        swipe.begin_session();
        swipe.add_position(Vec2::new(400.0, 395.0));
        let report = swipe.test_cut(&mut world, &ctx, &mut rng, &mut events);
        assert_eq!(report.cuts.len(), 2);
        assert!(report.hazard);
        assert_eq!(world.projectiles.len(), 1);

        // Same sample again cuts nothing new
        let again = swipe.test_cut(&mut world, &ctx, &mut rng, &mut events);
        assert!(!again.any_cut());
        assert_eq!(swipe.cut_centers().len(), 2);
    }

    #[test]
    fn test_end_session_clears_history() {
        let mut swipe = SwipeTracker::default();
        swipe.begin_session();
        for i in 0..200 {
            swipe.add_position(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(swipe.track().len(), MAX_TRACK_POINTS);
        assert_eq!(swipe.track().last(), Some(&Vec2::new(199.0, 0.0)));
        assert_eq!(swipe.end_session(), None);
        assert!(swipe.track().is_empty());
        assert!(!swipe.is_active());
        assert_eq!(swipe.end_session(), None);
    }

    proptest! {
        #[test]
        fn prop_short_sequences_score_nothing(
            raw in proptest::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 0..3)
        ) {
            let centers: Vec<Vec2> = raw.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            prop_assert_eq!(combo_award(&centers), None);
        }

        #[test]
        fn prop_collinear_points_run_n_minus_two(n in 3usize..30, dx in 1.0f32..80.0, dy in -80.0f32..80.0) {
            let centers: Vec<Vec2> = (0..n).map(|i| Vec2::new(dx, dy) * i as f32).collect();
            let award = combo_award(&centers).unwrap();
            prop_assert_eq!(award.run as usize, n - 2);
            prop_assert_eq!(award.bonus, 2 * (n as i64 - 2));
        }
    }
}
