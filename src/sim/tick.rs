//! Fixed-step stepper
//!
//! One call advances every player and every bullet by one tick. Spawning is
//! the scheduler's job; see `spawner`.

use super::collision::{circles_overlap, outside_horizontal_span};
use super::state::{PlayerId, SimEvent, SimState};
use crate::consts::*;

/// Advance the simulation by one tick. Does nothing while paused.
pub fn tick(state: &mut SimState) {
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;

    move_players(state);
    move_bullets(state);
}

/// `y += dy`, then reflect at most once if the player left its band or sits
/// under the cursor.
///
/// Out of the band, `dy` always ends up pointing back inside. A blind flip
/// would strand a player whose speed shrank right after an overshoot.
fn move_players(state: &mut SimState) {
    let cursor = state.cursor;
    for player in state.players.iter_mut() {
        player.pos.y += player.dy;

        let outside = player.out_of_bounds();
        if outside || player.contains_point(cursor) {
            let dy = if outside {
                let inward = if player.pos.y < player.radius { 1.0 } else { -1.0 };
                inward * player.dy.abs()
            } else {
                -player.dy
            };
            if dy != player.dy {
                player.dy = dy;
                state.events.push(SimEvent::Reflected { player: player.id });
            }
        }
    }
}

/// Step each bullet toward the enemy; drop it off-canvas or on a hit
fn move_bullets(state: &mut SimState) {
    for owner in PlayerId::ALL {
        let enemy = state.player(owner.enemy());
        let (enemy_pos, enemy_radius) = (enemy.pos, enemy.radius);
        let step = BULLET_STEP * owner.fire_direction();

        let mut hits = 0u32;
        let mut expired = 0u32;
        state.player_mut(owner).bullets.retain_mut(|bullet| {
            bullet.pos.x += step;
            if outside_horizontal_span(bullet.pos.x, CANVAS_WIDTH) {
                expired += 1;
                return false;
            }
            if circles_overlap(bullet.pos, bullet.radius, enemy_pos, enemy_radius) {
                hits += 1;
                return false;
            }
            true
        });

        for _ in 0..hits {
            state.score.record_hit(owner);
            state.events.push(SimEvent::Hit { shooter: owner });
            log::debug!(
                "{:?} scored (total {})",
                owner,
                state.score.get(owner)
            );
        }
        for _ in 0..expired {
            state.events.push(SimEvent::BulletExpired { owner });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Bullet, Phase};
    use crate::sim::Color;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state() -> SimState {
        let mut s = SimState::new(&Settings::default());
        // Park the cursor away from both players
        s.set_cursor(Vec2::new(250.0, 250.0));
        s
    }

    fn bullet_at(x: f32, y: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(x, y),
            radius: BULLET_RADIUS,
            color: Color::RED,
        }
    }

    #[test]
    fn test_one_tick_inside_bounds() {
        let mut s = state();
        tick(&mut s);
        let one = s.player(PlayerId::One);
        assert_eq!(one.pos.y, 23.0);
        assert_eq!(one.dy, 3.0);
        assert_eq!(s.time_ticks, 1);
    }

    #[test]
    fn test_reflects_off_top_edge() {
        let mut s = state();
        let one = s.player_mut(PlayerId::One);
        one.pos.y = 19.0;
        one.dy = -3.0;
        tick(&mut s);
        let one = s.player(PlayerId::One);
        assert_eq!(one.pos.y, 16.0);
        assert_eq!(one.dy, 3.0);
        assert!(s.events.contains(&SimEvent::Reflected {
            player: PlayerId::One
        }));
    }

    #[test]
    fn test_player_two_reflects_off_bottom() {
        let mut s = state();
        // Starts at 480 moving down: 483 is out, so it turns around
        tick(&mut s);
        let two = s.player(PlayerId::Two);
        assert_eq!(two.pos.y, 483.0);
        assert_eq!(two.dy, -3.0);
        tick(&mut s);
        assert_eq!(s.player(PlayerId::Two).pos.y, 480.0);
    }

    #[test]
    fn test_cursor_reflects() {
        let mut s = state();
        s.set_cursor(Vec2::new(50.0, 30.0));
        tick(&mut s);
        assert_eq!(s.player(PlayerId::One).dy, -3.0);
    }

    #[test]
    fn test_out_of_bounds_under_cursor_inverts_once() {
        let mut s = state();
        let one = s.player_mut(PlayerId::One);
        one.pos.y = 19.0;
        one.dy = -3.0;
        s.set_cursor(Vec2::new(50.0, 16.0));
        tick(&mut s);
        assert_eq!(s.player(PlayerId::One).dy, 3.0);
        let reflections = s
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Reflected { player: PlayerId::One }))
            .count();
        assert_eq!(reflections, 1);
    }

    #[test]
    fn test_paused_tick_is_a_no_op() {
        let mut s = state();
        s.pause();
        let before = s.clone();
        tick(&mut s);
        assert_eq!(s.players, before.players);
        assert_eq!(s.time_ticks, 0);
        assert_eq!(
            s.phase,
            Phase::Paused {
                config_target: None
            }
        );
    }

    #[test]
    fn test_bullets_move_in_fire_direction() {
        let mut s = state();
        s.player_mut(PlayerId::One).bullets.push(bullet_at(100.0, 200.0));
        s.player_mut(PlayerId::Two).bullets.push(bullet_at(400.0, 200.0));
        for i in 1..=10 {
            tick(&mut s);
            assert_eq!(
                s.player(PlayerId::One).bullets[0].pos.x,
                100.0 + 5.0 * i as f32
            );
            assert_eq!(
                s.player(PlayerId::Two).bullets[0].pos.x,
                400.0 - 5.0 * i as f32
            );
        }
    }

    #[test]
    fn test_bullet_expires_off_canvas_without_scoring() {
        let mut s = state();
        s.player_mut(PlayerId::One).bullets.push(bullet_at(498.0, 100.0));
        s.player_mut(PlayerId::Two).bullets.push(bullet_at(2.0, 400.0));
        tick(&mut s);
        assert_eq!(s.bullet_count(), 0);
        assert_eq!(s.score.total(), 0);
        assert!(s.events.contains(&SimEvent::BulletExpired {
            owner: PlayerId::One
        }));
        assert!(s.events.contains(&SimEvent::BulletExpired {
            owner: PlayerId::Two
        }));
    }

    #[test]
    fn test_hit_scores_shooter_once() {
        let mut s = state();
        // Freeze player two so the geometry is exact
        s.player_mut(PlayerId::Two).dy = 0.0;
        s.player_mut(PlayerId::Two).pos = Vec2::new(450.0, 300.0);
        // After one step the bullet sits at 425: exactly 25 from the center
        s.player_mut(PlayerId::One).bullets.push(bullet_at(420.0, 300.0));

        tick(&mut s);
        assert_eq!(s.score.get(PlayerId::One), 1);
        assert_eq!(s.score.get(PlayerId::Two), 0);
        assert!(s.player(PlayerId::One).bullets.is_empty());

        for _ in 0..10 {
            tick(&mut s);
        }
        assert_eq!(s.score.get(PlayerId::One), 1);
    }

    #[test]
    fn test_hit_uses_post_move_enemy_position() {
        let mut s = state();
        let two = s.player_mut(PlayerId::Two);
        two.pos = Vec2::new(450.0, 270.0);
        two.dy = 10.0;
        // Bullet ends at (425, 280): 25 from (450, 280) only after the enemy moves
        s.player_mut(PlayerId::One).bullets.push(bullet_at(420.0, 280.0));
        tick(&mut s);
        assert_eq!(s.score.get(PlayerId::One), 1);
    }

    #[test]
    fn test_far_bullet_never_hits() {
        let mut s = state();
        s.player_mut(PlayerId::One).bullets.push(bullet_at(50.0, 20.0));

        for _ in 0..80 {
            tick(&mut s);
        }
        let bullet = &s.player(PlayerId::One).bullets[0];
        assert_eq!(bullet.pos.x, 450.0);
        assert_eq!(s.score.total(), 0);

        for _ in 0..20 {
            tick(&mut s);
        }
        assert!(s.player(PlayerId::One).bullets.is_empty());
        assert_eq!(s.score.total(), 0);
    }

    #[test]
    fn test_each_bullet_scores_independently() {
        let mut s = state();
        let two = s.player_mut(PlayerId::Two);
        two.pos = Vec2::new(50.0, 300.0);
        two.dy = 0.0;
        let one = s.player_mut(PlayerId::One);
        one.pos = Vec2::new(450.0, 100.0);
        one.dy = 0.0;
        // Two shots land on player one this tick, the third is still far away
        let shots = &mut s.player_mut(PlayerId::Two).bullets;
        shots.push(bullet_at(476.0, 100.0));
        shots.push(bullet_at(474.0, 105.0));
        shots.push(bullet_at(300.0, 100.0));

        tick(&mut s);
        assert_eq!(s.score.get(PlayerId::Two), 2);
        assert_eq!(s.score.get(PlayerId::One), 0);
        assert_eq!(s.player(PlayerId::Two).bullets.len(), 1);
    }

    #[test]
    fn test_slowdown_after_overshoot_heads_back_inside() {
        let mut s = state();
        let one = s.player_mut(PlayerId::One);
        one.pos.y = 20.0;
        one.dy = -10.0;
        tick(&mut s);
        assert_eq!(s.player(PlayerId::One).pos.y, 10.0);
        assert_eq!(s.player(PlayerId::One).dy, 10.0);

        // Slider drops the speed while the player is still outside
        s.set_move_speed(PlayerId::One, 3);
        let mut ys = Vec::new();
        for _ in 0..600 {
            tick(&mut s);
            ys.push(s.player(PlayerId::One).pos.y);
        }
        assert_eq!(&ys[..4], &[13.0, 16.0, 19.0, 22.0]);
        // From here on it is a normal bounce: one-tick overshoots at most
        assert!(ys[3..].iter().all(|y| (17.0..=483.0).contains(y)));
        let outside = |y: &f32| !(20.0..=480.0).contains(y);
        assert!(ys[3..].windows(2).all(|w| !(outside(&w[0]) && outside(&w[1]))));
    }

    #[test]
    fn test_out_of_bounds_moving_inward_keeps_direction() {
        let mut s = state();
        let one = s.player_mut(PlayerId::One);
        one.pos.y = 10.0;
        one.dy = 3.0;
        tick(&mut s);
        let one = s.player(PlayerId::One);
        assert_eq!(one.pos.y, 13.0);
        assert_eq!(one.dy, 3.0);
        assert!(!s.events.contains(&SimEvent::Reflected {
            player: PlayerId::One
        }));
    }

    #[derive(Debug, Clone)]
    enum Step {
        Cursor(f32, f32),
        Speed(u32),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => (0.0f32..500.0, 0.0f32..500.0).prop_map(|(x, y)| Step::Cursor(x, y)),
            1 => (MOVE_SPEED_MIN..=MOVE_SPEED_MAX).prop_map(Step::Speed),
        ]
    }

    proptest! {
        #[test]
        fn prop_motion_stays_within_one_overshoot(
            start_y in 20.0f32..=480.0,
            speed in 1u32..=10,
            down in any::<bool>(),
            cursors in prop::collection::vec((0.0f32..500.0, 0.0f32..500.0), 1..200),
        ) {
            let mut s = SimState::new(&Settings::default());
            let one = s.player_mut(PlayerId::One);
            one.pos.y = start_y;
            one.dy = if down { speed as f32 } else { -(speed as f32) };
            let slack = speed as f32;

            let mut was_out = false;
            for (cx, cy) in cursors {
                s.set_cursor(Vec2::new(cx, cy));
                let before = s.player(PlayerId::One).clone();
                tick(&mut s);
                let after = s.player(PlayerId::One);

                prop_assert!(after.pos.y >= PLAYER_RADIUS - slack);
                prop_assert!(after.pos.y <= CANVAS_HEIGHT - PLAYER_RADIUS + slack);
                prop_assert_eq!(after.dy.abs(), before.dy.abs());

                let is_out = after.out_of_bounds();
                prop_assert!(!(was_out && is_out), "two consecutive overshoots");
                if is_out {
                    prop_assert_eq!(after.dy, -before.dy);
                }
                was_out = is_out;
            }
        }

        #[test]
        fn prop_speed_changes_never_strand_a_player(
            start_y in 20.0f32..=480.0,
            down in any::<bool>(),
            steps in prop::collection::vec(step(), 1..300),
        ) {
            let mut s = SimState::new(&Settings::default());
            let one = s.player_mut(PlayerId::One);
            one.pos.y = start_y;
            one.dy = if down { 3.0 } else { -3.0 };
            let slack = MOVE_SPEED_MAX as f32;

            let mut out_streak = 0u32;
            for step in steps {
                match step {
                    Step::Cursor(x, y) => s.set_cursor(Vec2::new(x, y)),
                    Step::Speed(speed) => s.set_move_speed(PlayerId::One, speed),
                }
                tick(&mut s);
                let p = s.player(PlayerId::One);

                prop_assert!(p.pos.y >= PLAYER_RADIUS - slack);
                prop_assert!(p.pos.y <= CANVAS_HEIGHT - PLAYER_RADIUS + slack);
                if p.out_of_bounds() {
                    // Always heading back in
                    let inward = if p.pos.y < p.radius { 1.0 } else { -1.0 };
                    prop_assert!(p.dy * inward > 0.0);
                    out_streak += 1;
                    prop_assert!(out_streak <= MOVE_SPEED_MAX + 1, "stuck outside");
                } else {
                    out_streak = 0;
                }
            }
        }

        #[test]
        fn prop_bullet_x_is_monotonic(
            start_x in 0.0f32..=500.0,
            y in 0.0f32..500.0,
            owner_is_one in any::<bool>(),
        ) {
            let owner = if owner_is_one { PlayerId::One } else { PlayerId::Two };
            let mut s = state();
            s.player_mut(owner).bullets.push(bullet_at(start_x, y));
            let dir = owner.fire_direction();

            let mut last_x = start_x;
            for _ in 0..120 {
                tick(&mut s);
                match s.player(owner).bullets.first() {
                    Some(b) => {
                        prop_assert_eq!(b.pos.x, last_x + 5.0 * dir);
                        last_x = b.pos.x;
                    }
                    None => break,
                }
            }
            // Whatever ended it, at most one hit was credited, only to the owner
            prop_assert!(s.score.get(owner) <= 1);
            prop_assert_eq!(s.score.get(owner.enemy()), 0);
        }
    }
}
