//! Targeting, firing, damage and shell flight

use glam::Vec2;

use super::rect::{Rect, hits_any};
use super::state::{Bullet, Tank};
use crate::audio::{SoundContext, SoundKind};
use crate::tuning::Tuning;
use crate::{bearing_degrees, shortest_angle_diff};

/// Nearest alive tank hostile to `tanks[shooter]`; the earliest wins a tie
pub fn find_target(tanks: &[Tank], shooter: usize) -> Option<usize> {
    let me = &tanks[shooter];
    let mut best: Option<(usize, f32)> = None;

    for (i, other) in tanks.iter().enumerate() {
        if i == shooter || !other.alive || !me.is_hostile_to(other) {
            continue;
        }
        let dist_sq = me.pos.distance_squared(other.pos);
        if best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((i, dist_sq));
        }
    }

    best.map(|(i, _)| i)
}

/// Whether an AI tank may shoot at `target` this tick
pub fn can_fire_at(tank: &Tank, target: Vec2, tuning: &Tuning) -> bool {
    if !tank.alive || tank.fire_cooldown > 0 {
        return false;
    }
    let bearing = bearing_degrees(tank.pos, target);
    let aimed = shortest_angle_diff(tank.turret_angle, bearing).abs() < tuning.firing_tolerance;
    let in_range = tank.pos.distance(target) < tuning.max_firing_distance;
    aimed && in_range
}

/// Fire the cannon if it is ready. Returns the new shell.
pub fn fire(tank: &mut Tank, tuning: &Tuning, sound: &mut SoundContext<'_>) -> Option<Bullet> {
    if !tank.alive || tank.fire_cooldown > 0 {
        return None;
    }

    sound.play(SoundKind::Fire, tank.pos, sound.base_volume);

    let bullet = Bullet::new(
        tank.muzzle(tuning),
        tank.turret_angle,
        tank.allegiance,
        tuning,
    );
    tank.fire_cooldown = tuning.fire_cooldown_frames;
    Some(bullet)
}

/// Apply damage. Returns true if this hit destroyed the tank.
pub fn take_damage(tank: &mut Tank, damage: u32, sound: &mut SoundContext<'_>) -> bool {
    if !tank.alive {
        return false;
    }

    tank.health = tank.health.saturating_sub(damage);
    if tank.health > 0 {
        return false;
    }

    sound.play(SoundKind::Explosion, tank.pos, sound.base_volume);
    tank.alive = false;
    tank.wreck = true;
    tank.stop();
    log::info!("Tank {} ({:?}) destroyed", tank.id, tank.allegiance);
    true
}

/// How a shell's flight ended this tick, checked in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    Flying,
    OutOfRange,
    BurnedOut,
    OutOfBounds,
    HitTerrain,
}

/// Move a shell one tick and decide whether it survives
pub fn advance_bullet(bullet: &mut Bullet, features: &[Rect], tuning: &Tuning) -> BulletFate {
    bullet.pos += bullet.vel;

    if bullet.pos.distance_squared(bullet.origin) > tuning.max_bullet_range * tuning.max_bullet_range {
        return BulletFate::OutOfRange;
    }

    bullet.lifespan = bullet.lifespan.saturating_sub(1);
    if bullet.lifespan == 0 {
        return BulletFate::BurnedOut;
    }

    let p = bullet.pos;
    if p.x < tuning.world_min_x
        || p.x > tuning.world_max_x
        || p.y < tuning.world_min_y
        || p.y > tuning.world_max_y
    {
        return BulletFate::OutOfBounds;
    }

    let size = tuning.bullet_radius * 2.0;
    if hits_any(&Rect::centered(p, size, size), features) {
        return BulletFate::HitTerrain;
    }

    BulletFate::Flying
}

/// Advance every shell, dropping the ones that expire
pub fn update_bullets(bullets: &mut Vec<Bullet>, features: &[Rect], tuning: &Tuning) {
    bullets.retain_mut(|b| advance_bullet(b, features, tuning) == BulletFate::Flying);
}

/// Shells that land inside a live tank's box damage it and are consumed.
///
/// Each shell hits at most one tank: the first alive one in roster order.
/// Friendly fire counts.
pub fn resolve_hits(
    bullets: &mut Vec<Bullet>,
    tanks: &mut [Tank],
    tuning: &Tuning,
    sound: &mut SoundContext<'_>,
) {
    let hit_volume = tuning.hit_volume(sound.base_volume);

    bullets.retain(|bullet| {
        let Some(tank) = tanks
            .iter_mut()
            .find(|t| t.alive && t.hitbox(tuning).contains_point(bullet.pos))
        else {
            return true;
        };

        take_damage(tank, tuning.bullet_damage, sound);
        sound.play(SoundKind::Hit, bullet.pos, hit_volume);
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SoundBank, SoundEvent};
    use crate::sim::state::{Allegiance, Controller};

    fn tank(id: u32, allegiance: Allegiance, x: f32, y: f32) -> Tank {
        Tank::new(
            id,
            allegiance,
            Controller::Passive,
            Vec2::new(x, y),
            &Tuning::default(),
        )
    }

    fn with_sound<T>(f: impl FnOnce(&mut SoundContext<'_>) -> T) -> (T, Vec<SoundEvent>) {
        let mut bank = SoundBank::silent();
        let mut events = Vec::new();
        let out = {
            let mut sound = SoundContext {
                bank: &mut bank,
                events: &mut events,
                listener: Vec2::ZERO,
                base_volume: 0.2,
                max_distance: 1000.0,
            };
            f(&mut sound)
        };
        (out, events)
    }

    #[test]
    fn test_find_target_nearest_hostile() {
        let tanks = vec![
            tank(0, Allegiance::Player, 0.0, 0.0),
            tank(1, Allegiance::Friendly, 50.0, 0.0),
            tank(2, Allegiance::Enemy, 400.0, 0.0),
            tank(3, Allegiance::Enemy, 200.0, 0.0),
        ];
        // Enemy 2 picks the friendly (closest hostile), not its fellow enemy
        assert_eq!(find_target(&tanks, 2), Some(1));
        assert_eq!(find_target(&tanks, 0), Some(3));
        assert_eq!(find_target(&tanks, 1), Some(3));
    }

    #[test]
    fn test_find_target_tie_goes_to_first() {
        let tanks = vec![
            tank(0, Allegiance::Player, -100.0, 0.0),
            tank(1, Allegiance::Friendly, 100.0, 0.0),
            tank(2, Allegiance::Enemy, 0.0, 0.0),
        ];
        assert_eq!(find_target(&tanks, 2), Some(0));
    }

    #[test]
    fn test_find_target_skips_dead() {
        let mut tanks = vec![
            tank(0, Allegiance::Friendly, 0.0, 0.0),
            tank(1, Allegiance::Enemy, 100.0, 0.0),
        ];
        tanks[1].alive = false;
        assert_eq!(find_target(&tanks, 0), None);
    }

    #[test]
    fn test_can_fire_requires_aim_range_and_cooldown() {
        let tuning = Tuning::default();
        let mut shooter = tank(0, Allegiance::Enemy, 0.0, 0.0);
        shooter.turret_angle = 0.0;

        assert!(can_fire_at(&shooter, Vec2::new(500.0, 0.0), &tuning));
        // 4 degrees off: still inside tolerance
        let off = crate::heading_vector(4.0) * 500.0;
        assert!(can_fire_at(&shooter, off, &tuning));
        // 6 degrees off
        let off = crate::heading_vector(-6.0) * 500.0;
        assert!(!can_fire_at(&shooter, off, &tuning));
        // Too far
        assert!(!can_fire_at(&shooter, Vec2::new(800.0, 0.0), &tuning));
        // Cooling down
        shooter.fire_cooldown = 1;
        assert!(!can_fire_at(&shooter, Vec2::new(500.0, 0.0), &tuning));
    }

    #[test]
    fn test_fire_spawns_at_muzzle_and_resets_cooldown() {
        let tuning = Tuning::default();
        let mut shooter = tank(0, Allegiance::Player, 0.0, 0.0);
        shooter.turret_angle = 0.0;

        let (bullet, events) = with_sound(|s| fire(&mut shooter, &tuning, s));
        let bullet = bullet.expect("ready cannon fires");
        assert!((bullet.pos - Vec2::new(50.0, 0.0)).length() < 1e-4);
        assert!((bullet.vel - Vec2::new(10.0, 0.0)).length() < 1e-4);
        assert_eq!(shooter.fire_cooldown, 180);
        assert_eq!(events.len(), 1);
        assert!((events[0].volume - 0.2).abs() < 1e-6);

        // Second shot the same tick is refused
        let (again, events) = with_sound(|s| fire(&mut shooter, &tuning, s));
        assert!(again.is_none());
        assert!(events.is_empty());
        assert_eq!(shooter.fire_cooldown, 180);
    }

    #[test]
    fn test_fire_out_of_earshot_has_no_event() {
        let tuning = Tuning::default();
        let mut shooter = tank(0, Allegiance::Enemy, 2000.0, 0.0);
        let (bullet, events) = with_sound(|s| fire(&mut shooter, &tuning, s));
        assert!(bullet.is_some());
        assert!(events.is_empty());
    }

    #[test]
    fn test_take_damage_to_wreck() {
        let mut target = tank(0, Allegiance::Enemy, 0.0, 0.0);
        target.health = 25;
        target.speed = 2.0;

        let (destroyed, events) = with_sound(|s| take_damage(&mut target, 25, s));
        assert!(destroyed);
        assert_eq!(target.health, 0);
        assert!(!target.alive && target.wreck);
        assert_eq!(target.speed, 0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SoundKind::Explosion);

        // Further damage is ignored and does not explode again
        let (destroyed, events) = with_sound(|s| take_damage(&mut target, 25, s));
        assert!(!destroyed);
        assert!(events.is_empty());
        assert_eq!(target.health, 0);
    }

    #[test]
    fn test_take_damage_partial() {
        let mut target = tank(0, Allegiance::Enemy, 0.0, 0.0);
        let (destroyed, events) = with_sound(|s| take_damage(&mut target, 25, s));
        assert!(!destroyed);
        assert_eq!(target.health, 75);
        assert!(target.alive);
        assert!(events.is_empty());
    }

    #[test]
    fn test_bullet_expiry_order() {
        let tuning = Tuning::default();

        // Range beats lifespan
        let mut b = Bullet::new(Vec2::ZERO, 0.0, Allegiance::Player, &tuning);
        b.pos = Vec2::new(495.0, 0.0);
        b.lifespan = 1;
        assert_eq!(advance_bullet(&mut b, &[], &tuning), BulletFate::OutOfRange);

        // Lifespan beats bounds
        let mut b = Bullet::new(Vec2::new(2995.0, 0.0), 0.0, Allegiance::Player, &tuning);
        b.lifespan = 1;
        assert_eq!(advance_bullet(&mut b, &[], &tuning), BulletFate::BurnedOut);

        // Bounds beats terrain
        let mut b = Bullet::new(Vec2::new(2995.0, 0.0), 0.0, Allegiance::Player, &tuning);
        let wall = [Rect::new(3000.0, -10.0, 20.0, 20.0)];
        assert_eq!(advance_bullet(&mut b, &wall, &tuning), BulletFate::OutOfBounds);

        let mut b = Bullet::new(Vec2::ZERO, 0.0, Allegiance::Player, &tuning);
        let wall = [Rect::new(12.0, -10.0, 20.0, 20.0)];
        assert_eq!(advance_bullet(&mut b, &wall, &tuning), BulletFate::HitTerrain);

        let mut b = Bullet::new(Vec2::ZERO, 0.0, Allegiance::Player, &tuning);
        assert_eq!(advance_bullet(&mut b, &[], &tuning), BulletFate::Flying);
        assert_eq!(b.lifespan, tuning.bullet_lifespan - 1);
    }

    #[test]
    fn test_bullet_never_outlives_range() {
        let tuning = Tuning::default();
        let mut bullets = vec![Bullet::new(Vec2::ZERO, 0.0, Allegiance::Enemy, &tuning)];
        let mut ticks = 0;
        while !bullets.is_empty() {
            update_bullets(&mut bullets, &[], &tuning);
            for b in &bullets {
                assert!(b.pos.distance(b.origin) <= tuning.max_bullet_range);
            }
            ticks += 1;
        }
        assert_eq!(ticks, 51);
    }

    #[test]
    fn test_hit_damages_first_tank_and_consumes_bullet() {
        let tuning = Tuning::default();
        let mut tanks = vec![
            tank(0, Allegiance::Player, 0.0, 0.0),
            tank(1, Allegiance::Enemy, 10.0, 0.0),
        ];
        let mut bullets = vec![
            Bullet::new(Vec2::new(5.0, 0.0), 0.0, Allegiance::Enemy, &tuning),
            Bullet::new(Vec2::new(500.0, 0.0), 0.0, Allegiance::Enemy, &tuning),
        ];

        let ((), events) = with_sound(|s| resolve_hits(&mut bullets, &mut tanks, &tuning, s));

        assert_eq!(bullets.len(), 1);
        assert_eq!(tanks[0].health, 75);
        assert_eq!(tanks[1].health, 100);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SoundKind::Hit);
        assert!((events[0].volume - 0.2 * 0.7 * (1.0 - 5.0 / 1000.0)).abs() < 1e-6);
    }

    #[test]
    fn test_wrecks_are_not_hit() {
        let tuning = Tuning::default();
        let mut tanks = vec![tank(0, Allegiance::Enemy, 0.0, 0.0)];
        tanks[0].alive = false;
        tanks[0].wreck = true;
        let mut bullets = vec![Bullet::new(Vec2::ZERO, 0.0, Allegiance::Player, &tuning)];
        with_sound(|s| resolve_hits(&mut bullets, &mut tanks, &tuning, s));
        assert_eq!(bullets.len(), 1);
    }
}
