//! Collision Detection
//!
//! Radius checks between points. Every check is strict: an entity exactly
//! at the radius is outside it.

use crate::core::vec2::Vec2;
use crate::game::state::Enemy;

/// Check if `b` is strictly inside the circle of `radius` around `a`.
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Indices of enemies strictly inside `radius` of `center`, in collection order.
pub fn enemies_within(enemies: &[Enemy], center: Vec2, radius: f32) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| within_radius(center, e.position, radius))
        .map(|(i, _)| i)
        .collect()
}

/// Nearest enemy to `from` as `(index, distance)`.
///
/// Ties resolve to the earliest enemy in the collection.
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, enemy) in enemies.iter().enumerate() {
        let d = from.distance(enemy.position);
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((i, d));
        }
    }
    best
}

/// Position of `target` after being pushed `distance` directly away from `source`.
///
/// Coincident points push along +X.
pub fn knockback(target: Vec2, source: Vec2, distance: f32) -> Vec2 {
    let away = source.direction_to(target);
    let dir = if away.is_zero() { Vec2::RIGHT } else { away };
    target + dir * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::EnemyId;

    fn enemy_at(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id: EnemyId(id),
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            health: 40.0,
            max_health: 40.0,
            speed: 1.47,
            wobble_offset: 0.0,
            size: 42.0,
        }
    }

    #[test]
    fn test_within_radius_is_strict() {
        let origin = Vec2::ZERO;
        assert!(within_radius(origin, Vec2::new(249.9, 0.0), 250.0));
        assert!(!within_radius(origin, Vec2::new(250.0, 0.0), 250.0));
        assert!(!within_radius(origin, Vec2::new(0.0, 300.0), 250.0));
    }

    #[test]
    fn test_enemies_within() {
        let enemies = vec![
            enemy_at(0, 10.0, 0.0),
            enemy_at(1, 180.0, 0.0),
            enemy_at(2, 0.0, -100.0),
        ];
        assert_eq!(enemies_within(&enemies, Vec2::ZERO, 180.0), vec![0, 2]);
    }

    #[test]
    fn test_nearest_enemy() {
        assert!(nearest_enemy(&[], Vec2::ZERO).is_none());

        let enemies = vec![
            enemy_at(0, 100.0, 0.0),
            enemy_at(1, 0.0, 50.0),
            enemy_at(2, -50.0, 0.0),
        ];
        let (idx, dist) = nearest_enemy(&enemies, Vec2::ZERO).unwrap();
        // Tie between 1 and 2 goes to the earlier one
        assert_eq!(idx, 1);
        assert!((dist - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_knockback() {
        let pushed = knockback(Vec2::new(10.0, 0.0), Vec2::ZERO, 80.0);
        assert!((pushed - Vec2::new(90.0, 0.0)).length() < 1e-4);

        let pushed = knockback(Vec2::new(0.0, -3.0), Vec2::ZERO, 150.0);
        assert!((pushed - Vec2::new(0.0, -153.0)).length() < 1e-3);

        let pushed = knockback(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 80.0);
        assert_eq!(pushed, Vec2::new(85.0, 5.0));
    }
}
