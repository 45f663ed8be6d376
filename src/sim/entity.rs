//! Entity types: projectiles, debris and fading effects
//!
//! There is a single `Projectile` type for everything that can be cut. What it
//! does when cut is decided by its `Category` through a capability table
//! rather than by subtype.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{Body, SimContext};
use super::sdf::HitMask;
use crate::consts::{HEIGHT, WIDTH};

/// The fruit catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    RedApple,
    GreenApple,
    Banana,
    Coconut,
    Watermelon,
    Lemon,
    Lime,
    Orange,
    Pineapple,
    Strawberry,
}

impl FruitKind {
    pub const ALL: [FruitKind; 10] = [
        FruitKind::RedApple,
        FruitKind::GreenApple,
        FruitKind::Banana,
        FruitKind::Coconut,
        FruitKind::Watermelon,
        FruitKind::Lemon,
        FruitKind::Lime,
        FruitKind::Orange,
        FruitKind::Pineapple,
        FruitKind::Strawberry,
    ];

    /// Uniformly random fruit
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Sprite size in pixels
    pub fn size(self) -> Vec2 {
        let (w, h) = match self {
            FruitKind::RedApple => (112.0, 112.0),
            FruitKind::GreenApple => (105.0, 113.0),
            FruitKind::Banana => (111.0, 152.0),
            FruitKind::Coconut => (140.0, 150.0),
            FruitKind::Watermelon => (150.0, 164.0),
            FruitKind::Lemon => (89.0, 105.0),
            FruitKind::Lime => (118.0, 118.0),
            FruitKind::Orange => (121.0, 123.0),
            FruitKind::Pineapple => (154.0, 176.0),
            FruitKind::Strawberry => (108.0, 125.0),
        };
        Vec2::new(w, h)
    }

    /// Sizes of the three debris sprites a cut fruit may break into
    pub fn fragment_sizes(self) -> [Vec2; 3] {
        let sizes = match self {
            FruitKind::RedApple => [(114.0, 86.0), (110.0, 87.0), (96.0, 103.0)],
            FruitKind::GreenApple => [(116.0, 95.0), (125.0, 99.0), (123.0, 121.0)],
            FruitKind::Banana => [(100.0, 110.0), (102.0, 108.0), (77.0, 99.0)],
            FruitKind::Coconut => [(141.0, 114.0), (147.0, 106.0), (139.0, 110.0)],
            FruitKind::Watermelon => [(114.0, 86.0), (149.0, 126.0), (144.0, 133.0)],
            FruitKind::Lemon => [(129.0, 110.0), (114.0, 97.0), (123.0, 117.0)],
            FruitKind::Lime => [(117.0, 105.0), (133.0, 109.0), (143.0, 109.0)],
            FruitKind::Orange => [(126.0, 118.0), (143.0, 106.0), (150.0, 120.0)],
            FruitKind::Pineapple => [(128.0, 158.0), (128.0, 104.0), (120.0, 100.0)],
            FruitKind::Strawberry => [(105.0, 138.0), (105.0, 142.0), (103.0, 142.0)],
        };
        sizes.map(|(w, h)| Vec2::new(w, h))
    }

    pub fn name(self) -> &'static str {
        match self {
            FruitKind::RedApple => "red apple",
            FruitKind::GreenApple => "green apple",
            FruitKind::Banana => "banana",
            FruitKind::Coconut => "coconut",
            FruitKind::Watermelon => "watermelon",
            FruitKind::Lemon => "lemon",
            FruitKind::Lime => "lime",
            FruitKind::Orange => "orange",
            FruitKind::Pineapple => "pineapple",
            FruitKind::Strawberry => "strawberry",
        }
    }
}

/// Arcade power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Slows gravity and motion
    Freeze,
    /// Near-continuous fruit, no hazards
    Blitz,
    /// Double score
    Double,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Freeze, PowerUpKind::Blitz, PowerUpKind::Double];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Freeze => "Freeze",
            PowerUpKind::Blitz => "Blitz",
            PowerUpKind::Double => "Double",
        }
    }
}

/// Bomb sprite size
pub const HAZARD_SIZE: Vec2 = Vec2::new(142.0, 170.0);
/// Power-up pickup diameter
pub const POWER_UP_SIZE: Vec2 = Vec2::new(110.0, 110.0);

/// What a projectile is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fruit(FruitKind),
    /// Fruit thrown while the world is frozen
    Chilled(FruitKind),
    Hazard,
    PowerUp(PowerUpKind),
}

/// Behavior flags selected by category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub rotates: bool,
    pub fragments_on_cut: bool,
    /// Points for cutting it (negative for hazards)
    pub score: i64,
    /// Letting it fall costs a life
    pub counts_as_miss: bool,
}

impl Category {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Category::Fruit(_) => Capabilities {
                rotates: true,
                fragments_on_cut: true,
                score: 5,
                counts_as_miss: true,
            },
            Category::Chilled(_) => Capabilities {
                rotates: true,
                fragments_on_cut: true,
                score: 10,
                counts_as_miss: true,
            },
            Category::Hazard => Capabilities {
                rotates: true,
                fragments_on_cut: false,
                score: -10,
                counts_as_miss: false,
            },
            Category::PowerUp(_) => Capabilities {
                rotates: false,
                fragments_on_cut: false,
                score: 0,
                counts_as_miss: false,
            },
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            Category::Fruit(kind) | Category::Chilled(kind) => kind.size(),
            Category::Hazard => HAZARD_SIZE,
            Category::PowerUp(_) => POWER_UP_SIZE,
        }
    }

    pub fn fruit(self) -> Option<FruitKind> {
        match self {
            Category::Fruit(kind) | Category::Chilled(kind) => Some(kind),
            _ => None,
        }
    }

    #[inline]
    pub fn is_hazard(self) -> bool {
        self == Category::Hazard
    }

    /// Popup caption for a cut
    pub fn label(self) -> &'static str {
        match self {
            Category::Fruit(_) => "Fruit",
            Category::Chilled(_) => "Frozen fruit",
            Category::Hazard => "Bomb",
            Category::PowerUp(kind) => kind.name(),
        }
    }
}

/// Lifecycle of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    Cut,
    Removed,
}

/// A thrown object that can be cut
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub category: Category,
    pub body: Body,
    pub state: Lifecycle,
}

impl Projectile {
    /// Create a projectile at rest, centered at `pos`
    pub fn new(id: u32, category: Category, pos: Vec2, rng: &mut impl Rng) -> Self {
        let mut body = Body::new(pos, category.size());
        if category.capabilities().rotates {
            body.angle_delta = rng.random_range(-2.0..=2.0);
        }
        Self {
            id,
            category,
            body,
            state: Lifecycle::Alive,
        }
    }

    /// Create a projectile thrown up from below the bottom edge.
    ///
    /// Objects on the right half fly left and vice versa so the arc crosses
    /// the screen. `speed_x` and `speed_y` are (min, max) magnitudes.
    pub fn thrown(
        id: u32,
        category: Category,
        ctx: &SimContext,
        speed_x: (f32, f32),
        speed_y: (f32, f32),
        rng: &mut impl Rng,
    ) -> Self {
        let size = category.size();
        let left = rng.random_range(0.0..WIDTH).floor();
        let pos = Vec2::new(left + size.x / 2.0, HEIGHT + 50.0 + size.y / 2.0);
        let mut projectile = Self::new(id, category, pos, rng);

        let direction = if left > WIDTH / 2.0 { -1.0 } else { 1.0 };
        let vx = sample_whole(rng, speed_x) * direction;
        let vy = -sample_whole(rng, speed_y);
        projectile.body.set_velocity(ctx, Vec2::new(vx, vy));
        projectile
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == Lifecycle::Alive
    }

    /// Precise hit mask for the current pose
    pub fn mask(&self) -> HitMask {
        match self.category {
            Category::PowerUp(_) => HitMask::Circle {
                center: self.body.pos,
                radius: self.body.size.x * 0.5,
            },
            _ => HitMask::for_sprite(self.body.pos, self.body.size, self.body.angle),
        }
    }
}

/// Whole-number sample from an inclusive (min, max) range
fn sample_whole(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    if max <= min {
        return min.round();
    }
    rng.random_range(min.round() as i32..=max.round() as i32) as f32
}

/// Debris left by a cut fruit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub kind: FruitKind,
    /// Which of the fruit's three debris sprites
    pub variant: u8,
    pub body: Body,
}

impl Fragment {
    /// The pair of fragments a cut fruit breaks into.
    ///
    /// Both start where the fruit was; one drifts left and one right, with a
    /// little vertical jitter.
    pub fn pair(
        kind: FruitKind,
        pos: Vec2,
        parent_vel: Vec2,
        ctx: &SimContext,
        rng: &mut impl Rng,
    ) -> [Fragment; 2] {
        [
            Self::half(kind, pos, parent_vel, -1.0, ctx, rng),
            Self::half(kind, pos, parent_vel, 1.0, ctx, rng),
        ]
    }

    fn half(
        kind: FruitKind,
        pos: Vec2,
        parent_vel: Vec2,
        sign: f32,
        ctx: &SimContext,
        rng: &mut impl Rng,
    ) -> Fragment {
        let sizes = kind.fragment_sizes();
        let variant = rng.random_range(0..sizes.len());
        let mut body = Body::new(pos, sizes[variant]);
        body.angle_delta = rng.random_range(-2.0..=2.0);
        let jitter_x = rng.random_range(0..200) as f32;
        let jitter_y = rng.random_range(-50..50) as f32;
        body.set_velocity(
            ctx,
            Vec2::new(parent_vel.x + sign * jitter_x, parent_vel.y - jitter_y),
        );
        Fragment {
            kind,
            variant: variant as u8,
            body,
        }
    }
}

/// Purely visual, fading objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Juice splash left where a fruit was cut
    Splash { variant: u8 },
    /// Floating "+5" style label
    Popup { text: String },
}

/// Number of splash sprites
pub const SPLASH_VARIANTS: u8 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// 255 = opaque; removed once it reaches zero
    pub alpha: i32,
}

impl Effect {
    pub fn splash(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            kind: EffectKind::Splash {
                variant: rng.random_range(0..SPLASH_VARIANTS),
            },
            pos,
            alpha: 255,
        }
    }

    /// Score label, e.g. "Fruit: 5 points" or "Bomb: -10 points"
    pub fn popup(label: &str, points: i64, pos: Vec2) -> Self {
        Self {
            kind: EffectKind::Popup {
                text: format!("{label}: {points} points"),
            },
            pos,
            alpha: 255,
        }
    }
}
