//! Property tests for collision and movement limits

use fox_platformer::GameConfig;
use fox_platformer::consts::*;
use fox_platformer::sim::{
    Motion, PowerUp, PowerUpKind, Rect, TickInput, WorldState, overlaps, tick,
};
use glam::Vec2;
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (
        -500.0f32..500.0,
        -500.0f32..500.0,
        1.0f32..200.0,
        1.0f32..200.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(left, right, up, attack)| TickInput {
            left,
            right,
            up,
            attack,
        },
    )
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    #[test]
    fn rect_overlaps_itself(a in rect()) {
        prop_assert!(overlaps(&a, &a));
    }

    #[test]
    fn rects_sharing_an_edge_do_not_overlap(a in rect(), h in 1.0f32..200.0) {
        let right = Rect::new(a.x + a.width, a.y, 10.0, h);
        prop_assert!(!overlaps(&a, &right));
    }

    #[test]
    fn player_speed_stays_capped(
        seed in any::<u64>(),
        inputs in proptest::collection::vec(input(), 1..240),
    ) {
        let mut state = WorldState::new(GameConfig::default(), seed).unwrap();
        for input in &inputs {
            tick(&mut state, input);
            prop_assert!(state.player.vel.x.abs() <= MAX_RUN_SPEED);
            prop_assert!(state.player.vel.y <= MAX_FALL_SPEED);
            prop_assert!(state.player.pos.x >= 0.0);
            prop_assert!(state.player.pos.x + state.player.size.x <= state.config.level_width);
        }
    }

    #[test]
    fn mushroom_at_right_edge_keeps_player_in_level(
        offset in 0.0f32..200.0,
        input in input(),
    ) {
        let mut state = WorldState::new(GameConfig::default(), 7).unwrap();
        state.enemies.clear();
        state.bricks.clear();
        let width = state.config.level_width;
        state.player.pos = Vec2::new(
            width - PLAYER_NORMAL_SIZE - offset,
            GROUND_Y - PLAYER_NORMAL_SIZE,
        );
        state.player.vel = Vec2::ZERO;
        let id = state.next_entity_id();
        let pos = state.player.pos;
        state.powerups.push(PowerUp::new(
            id,
            pos,
            Vec2::splat(ITEM_SIZE),
            Motion::Static,
            PowerUpKind::Mushroom,
        ));

        tick(&mut state, &input);
        prop_assert!(state.player.is_super());
        prop_assert!(state.player.pos.x >= 0.0);
        prop_assert!(state.player.pos.x + state.player.size.x <= width);
    }
}
