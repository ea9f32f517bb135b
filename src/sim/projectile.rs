//! Thrown and fired projectiles
//!
//! Two motion profiles share one struct:
//! - Stone: parabolic arc (gravity > 0), expires on the floor, off-world or timeout
//! - Bolt: straight shot (gravity = 0, vy = 0), expires off-world or timeout
//!
//! Velocities are in pixels per second. `remaining_lifetime` is the only way a
//! projectile is cancelled; hits deactivate it and the cleanup pass removes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collidable, HitOutcome};
use super::enemy::Enemy;
use super::events::{EventSink, HitTarget};
use super::rect::Rect;
use crate::consts::{BOLT_HEIGHT, BOLT_WIDTH, STONE_SIZE};
use crate::tuning::Tuning;

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Stone,
    Bolt,
}

/// Why a projectile stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Lifetime,
    OutOfBounds,
    Floor,
}

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub rect: Rect,
    pub vel: Vec2,
    /// Downward acceleration (0 for straight shots)
    pub gravity: f32,
    pub damage: i32,
    pub remaining_lifetime: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(
        id: u32,
        kind: ProjectileKind,
        rect: Rect,
        vel: Vec2,
        gravity: f32,
        damage: i32,
        lifetime: f32,
    ) -> Self {
        Self {
            id,
            kind,
            rect,
            vel,
            gravity: gravity.max(0.0),
            damage,
            remaining_lifetime: lifetime,
            active: lifetime > 0.0,
        }
    }

    /// Throw a stone from `hand` (centre point) in the facing direction
    pub fn stone(id: u32, hand: Vec2, facing_right: bool, tuning: &Tuning) -> Self {
        let dir = if facing_right { 1.0 } else { -1.0 };
        Self::new(
            id,
            ProjectileKind::Stone,
            Rect::new(
                hand.x - STONE_SIZE / 2.0,
                hand.y - STONE_SIZE / 2.0,
                STONE_SIZE,
                STONE_SIZE,
            ),
            Vec2::new(dir * tuning.stone_speed, tuning.stone_lift),
            tuning.stone_gravity,
            tuning.stone_damage,
            tuning.stone_lifetime,
        )
    }

    /// Fire a staff bolt from `hand` (centre point) in the facing direction
    pub fn bolt(id: u32, hand: Vec2, facing_right: bool, tuning: &Tuning) -> Self {
        let dir = if facing_right { 1.0 } else { -1.0 };
        Self::new(
            id,
            ProjectileKind::Bolt,
            Rect::new(
                hand.x - BOLT_WIDTH / 2.0,
                hand.y - BOLT_HEIGHT / 2.0,
                BOLT_WIDTH,
                BOLT_HEIGHT,
            ),
            Vec2::new(dir * tuning.bolt_speed, 0.0),
            0.0,
            tuning.bolt_damage,
            tuning.bolt_lifetime,
        )
    }

    /// Integrate one frame; returns the expiry reason when it just stopped
    pub fn update(&mut self, dt: f32, world_width: f32, floor_y: f32) -> Option<Expiry> {
        if !self.active || dt <= 0.0 {
            return None;
        }

        self.remaining_lifetime -= dt;
        self.vel.y += self.gravity * dt;
        self.rect.x += self.vel.x * dt;
        self.rect.y += self.vel.y * dt;

        let expiry = if self.remaining_lifetime <= 0.0 {
            Some(Expiry::Lifetime)
        } else if self.rect.right() < 0.0 || self.rect.left() > world_width {
            Some(Expiry::OutOfBounds)
        } else if self.gravity > 0.0 && self.rect.bottom() >= floor_y {
            Some(Expiry::Floor)
        } else {
            None
        };

        if expiry.is_some() {
            self.active = false;
        }
        expiry
    }
}

impl Collidable for Projectile {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_hit(&mut self, _damage: i32) -> HitOutcome {
        if !self.active {
            return HitOutcome::Ignored;
        }
        self.active = false;
        HitOutcome::Destroyed
    }
}

/// Test every active projectile against the live enemies
///
/// The first overlapping enemy in iteration order takes the damage and the
/// projectile is spent, so one projectile damages at most one enemy per frame.
/// Nothing is removed here; defeated enemies and spent projectiles stay in
/// place for the cleanup pass.
pub fn resolve_projectile_hits(
    projectiles: &mut [Projectile],
    enemies: &mut [Enemy],
    sink: &mut dyn EventSink,
) {
    for projectile in projectiles.iter_mut() {
        if !projectile.is_active() {
            continue;
        }
        let bounds = projectile.bounds();

        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.is_active() && e.bounds().intersects(&bounds))
        else {
            continue;
        };

        let damage = projectile.damage;
        projectile.on_hit(damage);
        match enemy.on_hit(damage) {
            HitOutcome::Damaged { remaining } => {
                log::debug!(
                    "Projectile {} hit enemy {} ({} hp left)",
                    projectile.id,
                    enemy.id,
                    remaining
                );
                sink.on_hit(HitTarget::Enemy { id: enemy.id }, damage);
            }
            HitOutcome::Destroyed => {
                log::debug!("Projectile {} defeated enemy {}", projectile.id, enemy.id);
                sink.on_hit(HitTarget::Enemy { id: enemy.id }, damage);
                sink.on_defeat(enemy.id);
            }
            HitOutcome::Ignored => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::events::{GameEvent, NullSink};
    use crate::sim::level::EnemySpawn;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(id: u32, x: f32, y: f32, health: i32) -> Enemy {
        let spawn = EnemySpawn {
            x,
            y,
            kind: EnemyKind::Soldier,
            health,
            patrol_radius: Some(0.0),
        };
        let mut enemy = Enemy::spawn(id, &spawn, &Tuning::default(), &mut Pcg32::seed_from_u64(0));
        enemy.rect = Rect::new(x, y, 32.0, 32.0);
        enemy
    }

    #[test]
    fn test_arc_stone_hits_enemy_in_first_overlapping_frame() {
        let mut stones = vec![Projectile::new(
            1,
            ProjectileKind::Stone,
            Rect::new(200.0, 300.0, STONE_SIZE, STONE_SIZE),
            Vec2::new(300.0, -50.0),
            200.0,
            1,
            2.0,
        )];
        let mut enemies = vec![enemy_at(7, 210.0, 300.0, 3)];
        let mut events: Vec<GameEvent> = Vec::new();

        // Not overlapping yet at spawn (x 200..208 vs 210..242)
        assert!(!stones[0].rect.intersects(&enemies[0].rect));

        stones[0].update(FRAME_DT, 4000.0, 1000.0);
        assert!(stones[0].rect.intersects(&enemies[0].rect));
        resolve_projectile_hits(&mut stones, &mut enemies, &mut events);

        assert_eq!(enemies[0].health, 2);
        assert!(!stones[0].active);
        assert_eq!(
            events,
            vec![GameEvent::Hit {
                target: HitTarget::Enemy { id: 7 },
                damage: 1
            }]
        );
    }

    #[test]
    fn test_first_enemy_in_order_takes_the_hit() {
        let mut bolts = vec![Projectile::new(
            1,
            ProjectileKind::Bolt,
            Rect::new(100.0, 100.0, 16.0, 6.0),
            Vec2::ZERO,
            0.0,
            2,
            1.0,
        )];
        let mut enemies = vec![enemy_at(1, 90.0, 90.0, 2), enemy_at(2, 95.0, 90.0, 2)];
        let mut events: Vec<GameEvent> = Vec::new();
        resolve_projectile_hits(&mut bolts, &mut enemies, &mut events);

        assert!(enemies[0].defeated);
        assert_eq!(enemies[1].health, 2);
        assert!(events.contains(&GameEvent::Defeat { enemy_id: 1 }));
    }

    #[test]
    fn test_defeated_enemies_are_skipped() {
        let mut bolts = vec![Projectile::new(
            1,
            ProjectileKind::Bolt,
            Rect::new(100.0, 100.0, 16.0, 6.0),
            Vec2::ZERO,
            0.0,
            2,
            1.0,
        )];
        let mut enemies = vec![enemy_at(1, 90.0, 90.0, 2), enemy_at(2, 95.0, 90.0, 2)];
        enemies[0].defeated = true;
        resolve_projectile_hits(&mut bolts, &mut enemies, &mut NullSink);
        assert_eq!(enemies[1].health, 0);
        assert!(enemies[1].defeated);
    }

    #[test]
    fn test_stone_arcs_and_lands_on_floor() {
        let tuning = Tuning::default();
        let mut stone = Projectile::stone(1, Vec2::new(100.0, 500.0), true, &tuning);
        let mut expiry = None;
        let start_y = stone.rect.y;
        let mut lowest_y = start_y;
        for _ in 0..600 {
            lowest_y = lowest_y.min(stone.rect.y);
            expiry = stone.update(FRAME_DT, 4000.0, 520.0);
            if expiry.is_some() {
                break;
            }
        }
        // Rose before falling
        assert!(lowest_y < start_y);
        assert_eq!(expiry, Some(Expiry::Floor));
        assert!(!stone.active);
    }

    #[test]
    fn test_bolt_flies_straight_and_times_out() {
        let tuning = Tuning::default();
        let mut bolt = Projectile::bolt(1, Vec2::new(50_000.0, 300.0), false, &tuning);
        let y = bolt.rect.y;
        let mut frames = 0;
        while bolt.update(FRAME_DT, 100_000.0, 320.0).is_none() {
            frames += 1;
            assert_eq!(bolt.rect.y, y);
            assert!(bolt.vel.x < 0.0);
        }
        assert!(!bolt.active);
        assert!(bolt.remaining_lifetime <= 0.0);
        // 0.8s at 60 fps
        assert!((47..=48).contains(&frames));
    }

    #[test]
    fn test_bolt_leaves_world() {
        let tuning = Tuning::default();
        let mut bolt = Projectile::bolt(1, Vec2::new(5.0, 300.0), false, &tuning);
        let mut expiry = None;
        for _ in 0..10 {
            expiry = bolt.update(FRAME_DT, 4000.0, 1000.0);
            if expiry.is_some() {
                break;
            }
        }
        assert_eq!(expiry, Some(Expiry::OutOfBounds));
    }

    #[test]
    fn test_inactive_projectile_is_frozen() {
        let tuning = Tuning::default();
        let mut bolt = Projectile::bolt(1, Vec2::new(100.0, 300.0), true, &tuning);
        bolt.on_hit(1);
        let before = bolt.rect;
        assert_eq!(bolt.update(FRAME_DT, 4000.0, 1000.0), None);
        assert_eq!(bolt.rect, before);
        assert_eq!(bolt.on_hit(1), HitOutcome::Ignored);
    }

    proptest! {
        #[test]
        fn prop_lifetime_strictly_decreases_until_inactive(
            vx in -800.0f32..800.0,
            vy in -400.0f32..400.0,
            gravity in 0.0f32..1200.0,
            lifetime in 0.05f32..3.0,
            dt in 0.001f32..0.05,
        ) {
            let mut p = Projectile::new(
                1,
                ProjectileKind::Stone,
                Rect::new(1000.0, 400.0, 8.0, 8.0),
                Vec2::new(vx, vy),
                gravity,
                1,
                lifetime,
            );
            for _ in 0..10_000 {
                let before = p.remaining_lifetime;
                let expiry = p.update(dt, 2000.0, 900.0);
                prop_assert!(p.remaining_lifetime < before);
                // Expired and still moving never coexist
                prop_assert_eq!(expiry.is_some(), !p.active);
                if p.remaining_lifetime <= 0.0 {
                    prop_assert!(!p.active);
                }
                if !p.active {
                    break;
                }
            }
            prop_assert!(!p.active);

            // Frozen once inactive
            let frozen = p.remaining_lifetime;
            p.update(dt, 2000.0, 900.0);
            prop_assert_eq!(p.remaining_lifetime, frozen);
        }
    }
}
