//! Collision detection and response for the player body
//!
//! Per frame, after the body has applied input and gravity:
//! 1. [`move_horizontal`]: integrate x, stop against platform sides, clamp to the world
//! 2. [`check_support`]: a grounded walker that stepped off its platform starts falling
//! 3. [`move_vertical`]: integrate y, land on the nearest qualifying platform
//!    or the world floor
//!
//! Platforms are one-way: the body lands on them from above and passes
//! through from below. Ground state is recomputed every frame from what is
//! actually under the body, never carried over.

use super::body::KinematicBody;
use super::enemy::Enemy;
use super::events::{EventSink, GameEvent, HitTarget};
use super::items::{Inventory, Item};
use super::level::Platform;
use super::rect::Rect;
use crate::tuning::Tuning;

/// Result of applying a hit to something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Target was already spent or immune
    Ignored,
    Damaged { remaining: i32 },
    /// Target is now defeated / spent
    Destroyed,
}

/// Anything that occupies a rectangle and can be hit
pub trait Collidable {
    fn bounds(&self) -> Rect;

    /// Inactive entities are tombstones and skip all collision
    fn is_active(&self) -> bool {
        true
    }

    fn on_hit(&mut self, damage: i32) -> HitOutcome;
}

/// Platforms sorted by left edge for horizontal proximity queries
///
/// Built once per level. A query touches O(log n + k) platforms instead of
/// scanning the whole level every frame.
#[derive(Debug, Clone, Default)]
pub struct PlatformIndex {
    /// Platform indices ordered by left edge (ties keep level order)
    order: Vec<usize>,
    /// Left edges in `order`
    lefts: Vec<f32>,
    max_width: f32,
}

impl PlatformIndex {
    pub fn new(platforms: &[Platform]) -> Self {
        let mut order: Vec<usize> = (0..platforms.len()).collect();
        order.sort_by(|&a, &b| {
            platforms[a]
                .rect
                .left()
                .total_cmp(&platforms[b].rect.left())
                .then(a.cmp(&b))
        });
        let lefts = order.iter().map(|&i| platforms[i].rect.left()).collect();
        let max_width = platforms
            .iter()
            .map(|p| p.rect.width)
            .fold(0.0f32, f32::max);

        Self {
            order,
            lefts,
            max_width,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Indices of platforms whose horizontal span overlaps `(left, right)`,
    /// in level order
    pub fn candidates(&self, platforms: &[Platform], left: f32, right: f32) -> Vec<usize> {
        // A platform starting at or before `left - max_width` ends at or before `left`
        let start = self.lefts.partition_point(|&l| l <= left - self.max_width);
        let end = self.lefts.partition_point(|&l| l < right);

        let mut found: Vec<usize> = self.order[start..end.max(start)]
            .iter()
            .copied()
            .filter(|&i| platforms[i].rect.right() > left)
            .collect();
        found.sort_unstable();
        found
    }
}

/// Would a body with this rectangle be standing on `platform`?
///
/// Bottom within `landing_tolerance` of the top (coming from above) and
/// horizontal overlap greater than `landing_margin`.
pub fn lands_on(body: &Rect, prev_bottom: f32, platform: &Rect, tuning: &Tuning) -> bool {
    let top = platform.top();
    body.horizontal_overlap(platform) > tuning.landing_margin
        && body.bottom() >= top - tuning.landing_tolerance
        && prev_bottom <= top + tuning.landing_tolerance
}

/// Platforms near the body's span in the order landing should try them
///
/// A body that moved down this step tries surfaces in the order it crossed
/// them: tops it was already level with or below first, then the highest
/// top under its previous bottom. A body that did not move down tries the
/// top nearest its bottom first. Ties keep level order.
fn landing_order(
    body: &Rect,
    prev_bottom: f32,
    platforms: &[Platform],
    index: &PlatformIndex,
) -> Vec<usize> {
    let mut candidates = index.candidates(platforms, body.left(), body.right());
    let bottom = body.bottom();
    let swept = bottom > prev_bottom;
    let key = |i: usize| {
        let top = platforms[i].rect.top();
        let crossed_after = if swept { (top - prev_bottom).max(0.0) } else { 0.0 };
        (crossed_after, (top - bottom).abs())
    };
    candidates.sort_by(|&a, &b| {
        let (ka, kb) = (key(a), key(b));
        ka.0.total_cmp(&kb.0)
            .then(ka.1.total_cmp(&kb.1))
            .then(a.cmp(&b))
    });
    candidates
}

/// Integrate x and stop against platform sides; clamps to `[0, world_width]`
///
/// A platform only blocks when the body was clear of it horizontally before
/// the move and now overlaps it by more than `side_margin` vertically, so a
/// body standing on a platform or jumping up through one is never shoved.
pub fn move_horizontal(
    body: &mut KinematicBody,
    step: f32,
    platforms: &[Platform],
    index: &PlatformIndex,
    world_width: f32,
    tuning: &Tuning,
) {
    let before = body.rect();
    body.pos.x += body.vel.x * step;

    if body.vel.x != 0.0 {
        let after = body.rect();
        let sweep_left = before.left().min(after.left());
        let sweep_right = before.right().max(after.right());

        for i in index.candidates(platforms, sweep_left, sweep_right) {
            let wall = &platforms[i].rect;
            let rect = body.rect();
            let entering = before.horizontal_overlap(wall) <= 0.0;
            if entering && rect.intersects(wall) && rect.vertical_overlap(wall) > tuning.side_margin {
                body.pos.x = if body.vel.x > 0.0 {
                    wall.left() - body.size.x
                } else {
                    wall.right()
                };
                body.vel.x = 0.0;
                break;
            }
        }
    }

    let max_x = (world_width - body.size.x).max(0.0);
    body.pos.x = body.pos.x.clamp(0.0, max_x);
}

/// Is anything (platform or floor) holding the body up right now?
pub fn is_supported(
    body: &KinematicBody,
    platforms: &[Platform],
    index: &PlatformIndex,
    floor_y: f32,
    tuning: &Tuning,
) -> bool {
    let rect = body.rect();
    let bottom = rect.bottom();
    if (bottom - floor_y).abs() <= tuning.landing_tolerance {
        return true;
    }
    index
        .candidates(platforms, rect.left(), rect.right())
        .into_iter()
        .any(|i| lands_on(&rect, bottom, &platforms[i].rect, tuning))
}

/// Walk-off-edge detection
///
/// Runs after the horizontal move and before the vertical one. Landing only
/// re-confirms support when a platform is actually underneath, so a body that
/// walked past the end of its platform has to be flipped to falling here.
/// Returns true if support was lost this frame.
pub fn check_support(
    body: &mut KinematicBody,
    platforms: &[Platform],
    index: &PlatformIndex,
    floor_y: f32,
    tuning: &Tuning,
) -> bool {
    if !body.on_ground || body.vel.x == 0.0 {
        return false;
    }
    if is_supported(body, platforms, index, floor_y, tuning) {
        return false;
    }
    body.on_ground = false;
    true
}

/// Integrate y and resolve landing
///
/// With `vy >= 0` the first platform crossed that [`lands_on`] wins; with none, the
/// world floor catches anything at or below its top. Landing snaps the bottom
/// to the surface, zeroes `vy`, sets `on_ground` and clears `is_jumping`.
pub fn move_vertical(
    body: &mut KinematicBody,
    step: f32,
    platforms: &[Platform],
    index: &PlatformIndex,
    floor_y: f32,
    tuning: &Tuning,
    sink: &mut dyn EventSink,
) {
    let prev_bottom = body.bottom();
    body.pos.y += body.vel.y * step;
    resolve_vertical(body, prev_bottom, platforms, index, floor_y, tuning, sink);
}

/// Landing resolution for a body whose bottom was at `prev_bottom` last step
///
/// A fixed point: running it again on a resolved body changes nothing.
pub fn resolve_vertical(
    body: &mut KinematicBody,
    prev_bottom: f32,
    platforms: &[Platform],
    index: &PlatformIndex,
    floor_y: f32,
    tuning: &Tuning,
    sink: &mut dyn EventSink,
) {
    let was_grounded = body.on_ground;
    body.on_ground = false;

    if body.vel.y < 0.0 {
        return;
    }

    let rect = body.rect();
    let surface = landing_order(&rect, prev_bottom, platforms, index)
        .into_iter()
        .map(|i| &platforms[i].rect)
        .find(|p| lands_on(&rect, prev_bottom, p, tuning))
        .map(|p| p.top())
        .or_else(|| (rect.bottom() >= floor_y - tuning.landing_tolerance).then_some(floor_y));

    if let Some(top) = surface {
        body.pos.y = top - body.size.y;
        body.vel.y = 0.0;
        body.on_ground = true;
        body.is_jumping = false;
        if !was_grounded {
            sink.on_land();
        }
    }
}

/// Touching a live enemy hurts; returns true if the body took damage
pub fn resolve_enemy_contacts(
    body: &mut KinematicBody,
    enemies: &[Enemy],
    tuning: &Tuning,
    sink: &mut dyn EventSink,
) -> bool {
    let rect = body.rect();
    let Some(enemy) = enemies
        .iter()
        .find(|e| e.is_active() && e.bounds().intersects(&rect))
    else {
        return false;
    };

    if !body.is_active() {
        return false;
    }
    let damage = enemy.kind.contact_damage();
    match body.on_hit(damage) {
        HitOutcome::Ignored => false,
        outcome => {
            body.invulnerable_for = tuning.invulnerability_secs;
            log::debug!("Enemy {} touched the player: {:?}", enemy.id, outcome);
            sink.on_hit(HitTarget::Player, damage);
            true
        }
    }
}

/// Pick up every item the body overlaps (tombstoned, swept later)
pub fn collect_items(
    body: &KinematicBody,
    items: &mut [Item],
    inventory: &mut Inventory,
    sink: &mut dyn EventSink,
) -> usize {
    let rect = body.rect();
    let mut collected = 0;
    for item in items.iter_mut().filter(|i| !i.collected) {
        if item.rect.intersects(&rect) {
            item.collected = true;
            inventory.add(item.kind);
            collected += 1;
            log::debug!("Collected {:?} (item {})", item.kind, item.id);
            sink.emit(GameEvent::ItemCollected {
                item_id: item.id,
                kind: item.kind,
            });
        }
    }
    collected
}
