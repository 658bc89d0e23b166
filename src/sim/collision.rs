//! Collision detection for circular fruit
//!
//! Fruit are plain circles in a box, so everything here is circle-circle
//! overlap plus the three walls. Response is asymmetric: only the fruit
//! being stepped is corrected.

use glam::Vec2;
use std::f32::consts::FRAC_PI_4;

/// Contact between the fruit being stepped (A) and another fruit (B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// How far the circles interpenetrate
    pub overlap: f32,
    /// Direction from B's center to A's center, as atan2 (radians, -PI..=PI)
    pub angle: f32,
}

impl Contact {
    /// Unit vector from B toward A
    #[inline]
    pub fn normal(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Correction that moves A out of B
    #[inline]
    pub fn separation(&self) -> Vec2 {
        self.normal() * self.overlap
    }

    /// True when the contact is within 45 degrees of horizontal
    #[inline]
    pub fn is_side_on(&self) -> bool {
        let a = self.angle.abs();
        a < FRAC_PI_4 || a > 3.0 * FRAC_PI_4
    }
}

/// Circle-circle overlap test (strict: touching circles don't collide)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Contact geometry for two overlapping circles, None if they don't overlap
pub fn circle_contact(
    a_pos: Vec2,
    a_radius: f32,
    b_pos: Vec2,
    b_radius: f32,
) -> Option<Contact> {
    if !circles_overlap(a_pos, a_radius, b_pos, b_radius) {
        return None;
    }
    let delta = a_pos - b_pos;
    Some(Contact {
        overlap: (a_radius + b_radius) - delta.length(),
        angle: delta.y.atan2(delta.x),
    })
}

/// Horizontal velocity for a top/bottom contact
#[inline]
pub fn diagonal_kick(angle: f32, scale: f32) -> f32 {
    angle.cos() * scale
}

/// Side wall a fruit ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
}

/// Floor test: the fruit's bottom edge reached the field height
#[inline]
pub fn hits_floor(pos: Vec2, radius: f32, field_height: f32) -> bool {
    pos.y + radius >= field_height
}

/// Side wall test. Left wins when a fruit is wider than the field.
#[inline]
pub fn side_wall(pos: Vec2, radius: f32, field_width: f32) -> Option<Wall> {
    if pos.x - radius <= 0.0 {
        Some(Wall::Left)
    } else if pos.x + radius >= field_width {
        Some(Wall::Right)
    } else {
        None
    }
}

/// Center x that puts the fruit flush against a side wall
#[inline]
pub fn wall_clamp_x(wall: Wall, radius: f32, field_width: f32) -> f32 {
    match wall {
        Wall::Left => radius,
        Wall::Right => field_width - radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_circles_do_not_overlap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert!(!circles_overlap(a, 50.0, b, 50.0));
        assert!(circles_overlap(a, 50.0, b, 50.1));
        assert!(circle_contact(a, 50.0, b, 50.0).is_none());
    }

    #[test]
    fn test_contact_geometry() {
        // A sits directly above B (y grows downward)
        let a = Vec2::new(400.0, 1000.0);
        let b = Vec2::new(400.0, 1080.0);
        let contact = circle_contact(a, 50.0, b, 60.0).unwrap();

        assert!((contact.overlap - 30.0).abs() < 1e-4);
        assert!((contact.angle + std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert!(!contact.is_side_on());

        // Separating pushes A straight up, clear of B
        let moved = a + contact.separation();
        assert!((moved.distance(b) - 110.0).abs() < 1e-3);
        assert!(moved.y < a.y);
    }

    #[test]
    fn test_side_on_contacts() {
        let right = circle_contact(Vec2::new(150.0, 0.0), 50.0, Vec2::ZERO, 110.0).unwrap();
        assert!(right.is_side_on());
        let left = circle_contact(Vec2::new(-150.0, 5.0), 50.0, Vec2::ZERO, 110.0).unwrap();
        assert!(left.is_side_on());

        // Steeper than 45 degrees is a top/bottom contact
        let steep = circle_contact(Vec2::new(50.0, -100.0), 60.0, Vec2::ZERO, 60.0).unwrap();
        assert!(!steep.is_side_on());
        assert!((diagonal_kick(steep.angle, 2.0) - steep.angle.cos() * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_walls() {
        assert_eq!(side_wall(Vec2::new(40.0, 0.0), 40.0, 800.0), Some(Wall::Left));
        assert_eq!(side_wall(Vec2::new(760.0, 0.0), 40.0, 800.0), Some(Wall::Right));
        assert_eq!(side_wall(Vec2::new(400.0, 0.0), 40.0, 800.0), None);
        assert_eq!(wall_clamp_x(Wall::Right, 40.0, 800.0), 760.0);
        assert_eq!(wall_clamp_x(Wall::Left, 40.0, 800.0), 40.0);

        assert!(hits_floor(Vec2::new(0.0, 1160.0), 40.0, 1200.0));
        assert!(!hits_floor(Vec2::new(0.0, 1159.0), 40.0, 1200.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in 0.0f32..800.0, ay in 0.0f32..1200.0, ar in 40.0f32..110.0,
            bx in 0.0f32..800.0, by in 0.0f32..1200.0, br in 40.0f32..110.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ar, b, br), circles_overlap(b, br, a, ar));
            if let Some(contact) = circle_contact(a, ar, b, br) {
                prop_assert!(contact.overlap > 0.0);
            }
        }
    }
}
