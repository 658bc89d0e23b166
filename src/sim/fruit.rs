//! Fruit kinds and the fruit entity

use glam::Vec2;

/// Fruit colors, one per rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Gray,
}

impl FruitColor {
    /// CSS color name for the canvas fill style
    pub fn as_css(&self) -> &'static str {
        match self {
            FruitColor::Red => "red",
            FruitColor::Orange => "orange",
            FruitColor::Yellow => "yellow",
            FruitColor::Green => "green",
            FruitColor::Blue => "blue",
            FruitColor::Purple => "purple",
            FruitColor::Pink => "pink",
            FruitColor::Gray => "gray",
        }
    }
}

/// Static description of one merge tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitKind {
    pub rank: u8,
    /// Text drawn on the fruit
    pub label: &'static str,
    pub radius: f32,
    pub color: FruitColor,
}

/// Number of merge tiers
pub const KIND_COUNT: usize = 8;

/// Merge tiers, smallest first
#[rustfmt::skip]
pub static FRUIT_KINDS: [FruitKind; KIND_COUNT] = [
    FruitKind { rank: 0, label: "F1.4", radius: 40.0, color: FruitColor::Red },
    FruitKind { rank: 1, label: "F2", radius: 50.0, color: FruitColor::Orange },
    FruitKind { rank: 2, label: "F2.8", radius: 60.0, color: FruitColor::Yellow },
    FruitKind { rank: 3, label: "F4", radius: 70.0, color: FruitColor::Green },
    FruitKind { rank: 4, label: "F5.6", radius: 80.0, color: FruitColor::Blue },
    FruitKind { rank: 5, label: "F8", radius: 90.0, color: FruitColor::Purple },
    FruitKind { rank: 6, label: "F11", radius: 100.0, color: FruitColor::Pink },
    FruitKind { rank: 7, label: "F16", radius: 110.0, color: FruitColor::Gray },
];

/// Highest rank in the table
pub const TOP_RANK: u8 = (KIND_COUNT - 1) as u8;

impl FruitKind {
    /// Look up a kind by rank (None past the top of the table)
    #[inline]
    pub fn get(rank: u8) -> Option<&'static FruitKind> {
        FRUIT_KINDS.get(rank as usize)
    }

    /// The tier two of these merge into, if any
    #[inline]
    pub fn next(&self) -> Option<&'static FruitKind> {
        Self::get(self.rank + 1)
    }

    pub fn is_top(&self) -> bool {
        self.rank == TOP_RANK
    }
}

/// A live fruit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fruit {
    pub id: u32,
    pub pos: Vec2,
    /// x = horizontal, y = vertical (positive is down), units per frame
    pub vel: Vec2,
    kind: &'static FruitKind,
    /// Landed or settled; stopped fruit skip movement and collision checks
    pub stopped: bool,
    /// Multiplier on the next bounce impulse (decays per bounce)
    pub bounce_damping: f32,
    pub bounce_count: u32,
    /// Mid-merge; excluded from the game-over line check
    pub merging: bool,
}

impl Fruit {
    /// Create a fruit falling straight down. Ranks past the table clamp to
    /// the top rank.
    pub fn new(id: u32, pos: Vec2, rank: u8, fall_speed: f32) -> Self {
        let kind = FruitKind::get(rank).unwrap_or(&FRUIT_KINDS[TOP_RANK as usize]);
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, fall_speed),
            kind,
            stopped: false,
            bounce_damping: 1.0,
            bounce_count: 0,
            merging: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> &'static FruitKind {
        self.kind
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        self.kind.rank
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.radius
    }

    /// Top edge (y grows downward)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.kind.radius
    }

    /// Move to the next tier. Returns the new rank, or None (unchanged) at
    /// the top rank.
    pub fn promote(&mut self) -> Option<u8> {
        let next = self.kind.next()?;
        self.kind = next;
        Some(next.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered() {
        for (i, kind) in FRUIT_KINDS.iter().enumerate() {
            assert_eq!(kind.rank as usize, i);
        }
        assert!(FRUIT_KINDS.windows(2).all(|w| w[0].radius < w[1].radius));
        assert!(FRUIT_KINDS[TOP_RANK as usize].is_top());
    }

    #[test]
    fn test_promote_stops_at_top() {
        let mut fruit = Fruit::new(1, Vec2::ZERO, 6, 2.0);
        assert_eq!(fruit.promote(), Some(7));
        assert_eq!(fruit.radius(), 110.0);
        assert_eq!(fruit.kind().label, "F16");

        assert_eq!(fruit.promote(), None);
        assert_eq!(fruit.rank(), TOP_RANK);
    }

    #[test]
    fn test_new_fruit_defaults() {
        let fruit = Fruit::new(3, Vec2::new(400.0, 0.0), 2, 2.0);
        assert_eq!(fruit.vel, Vec2::new(0.0, 2.0));
        assert_eq!(fruit.bounce_damping, 1.0);
        assert!(!fruit.stopped && !fruit.merging);
        assert_eq!(fruit.top(), -60.0);

        let clamped = Fruit::new(4, Vec2::ZERO, 42, 2.0);
        assert_eq!(clamped.rank(), TOP_RANK);
    }
}
