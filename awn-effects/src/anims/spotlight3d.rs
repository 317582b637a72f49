//! spotlight3d 系列：聚光灯下的伪 3D 翻牌。
//!
//! 翻转部分复用 turn 的四分之一阶段插值，聚光灯部分与 spotlight 系列一致：
//! 发光强度始终跟随聚光灯不透明度。

use super::turn::{apply_quarter, warped_count};
use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    EPSILON, SPOTLIGHT3D_CLOSING_PERIOD, SPOTLIGHT3D_CLOSING_TURN_PERIOD, SPOTLIGHT3D_FADE_STEP,
    SPOTLIGHT3D_PERIOD,
};
use crate::state::{ClipRegion, Direction, IconVisualState};

const QUARTER: i32 = SPOTLIGHT3D_PERIOD / 4;

fn reset_turn(state: &mut IconVisualState) {
    state.count = 0;
    state.top_offset = 0.0;
    state.icon_depth = 0.0;
    state.depth_direction = 0;
    state.width_mod = 1.0;
    state.flip = false;
}

fn light_up(state: &mut IconVisualState) {
    reset_turn(state);
    state.spotlight = true;
    state.spotlight_alpha = 1.0;
    state.glow_amount = 1.0;
    state.direction = Direction::SpotlightOn;
}

pub(super) fn hover_init(state: &mut IconVisualState) {
    light_up(state);
}

/// 悬停：聚光灯下翻转一圈
///
/// 是栈顶时灯保持全亮，否则逐帧变暗。翻完一圈且灯全亮或全暗时结束周期；
/// 灯还在变暗时停在最后一帧等它暗下去。
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if state.direction == Direction::None {
        hover_init(state);
    }

    if ctx.check_top_effect() {
        state.spotlight_alpha = 1.0;
    } else {
        state.spotlight_alpha = (state.spotlight_alpha - SPOTLIGHT3D_FADE_STEP).max(0.0);
    }
    state.glow_amount = state.spotlight_alpha;

    let warped = warped_count(state.count, SPOTLIGHT3D_PERIOD);
    apply_quarter(state, warped, QUARTER);
    state.count = (state.count + 1).min(SPOTLIGHT3D_PERIOD);

    let settled = state.spotlight_alpha >= 1.0 || state.spotlight_alpha <= 0.0;
    if state.count >= SPOTLIGHT3D_PERIOD && settled {
        reset_turn(state);
        let outcome = ctx.end_cycle();
        if outcome == StepOutcome::Stop {
            state.reset_animation();
        }
        return outcome;
    }
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    light_up(state);
    state.clip = Some(ClipRegion {
        x: 0,
        y: 0,
        width: state.icon_width as i32,
        height: 0,
    });
}

/// 展开：前半圈翻转中露出图标，后半圈抬起再落下，最后一个四分之一熄灯
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if state.direction == Direction::None {
        opening_init(state);
    }

    let warped = warped_count(state.count, SPOTLIGHT3D_PERIOD);
    let icon_height = state.icon_height as i32;
    let max_offset = (icon_height / 2) as f32;
    let span = QUARTER as f32;

    if warped < QUARTER * 2 {
        state.clip = Some(ClipRegion {
            x: 0,
            y: 0,
            width: state.icon_width as i32,
            height: warped * icon_height / (SPOTLIGHT3D_PERIOD / 2),
        });
    } else if warped < QUARTER * 3 {
        state.clip = None;
        state.top_offset = (warped - QUARTER * 2) as f32 * max_offset / span;
    } else {
        state.clip = None;
        let progress = (warped - QUARTER * 3) as f32 / span;
        state.top_offset = max_offset - progress * max_offset;
        state.spotlight_alpha = 1.0 - progress;
    }

    apply_quarter(state, warped, QUARTER);
    state.glow_amount = state.spotlight_alpha;
    state.count += 1;

    if state.count >= SPOTLIGHT3D_PERIOD {
        state.reset_animation();
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    reset_turn(state);
    state.spotlight = true;
    state.spotlight_alpha = 0.0;
    state.glow_amount = 0.0;
    state.clip = Some(ClipRegion {
        x: 0,
        y: 0,
        width: state.icon_width as i32,
        height: state.icon_height as i32,
    });
    state.direction = Direction::SpotlightOn;
}

/// 收起：聚光灯亮起 → 图标边翻转边被裁剪、淡出 → 灯熄灭
pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let period = SPOTLIGHT3D_CLOSING_PERIOD as f32;
    let fade = 2.0 / period;

    if state.direction == Direction::None {
        closing_init(state);
    }

    match state.direction {
        Direction::SpotlightOn => {
            state.spotlight_alpha += 4.0 / period;
            if state.spotlight_alpha >= 1.0 - EPSILON {
                state.spotlight_alpha = 1.0;
                state.direction = Direction::Down;
            }
        }
        Direction::Down => {
            let clip_step = 2.0 * state.icon_height as f32 / period;
            if let Some(clip) = state.clip.as_mut() {
                clip.height = ((clip.height as f32 - clip_step) as i32).max(0);
            }
            state.alpha -= fade;

            let position = state.count % SPOTLIGHT3D_CLOSING_TURN_PERIOD;
            apply_quarter(state, position, SPOTLIGHT3D_CLOSING_TURN_PERIOD / 4);
            state.count += 1;

            let clipped_away = state.clip.is_none_or(|clip| clip.height <= 0);
            if state.alpha <= EPSILON || clipped_away {
                state.alpha = 0.0;
                state.clip = None;
                state.direction = Direction::SpotlightOff;
            } else if state.alpha <= 0.5 {
                state.spotlight_alpha -= fade;
            }
        }
        _ => {
            state.spotlight_alpha -= fade;
        }
    }
    state.glow_amount = state.spotlight_alpha;

    if state.direction == Direction::SpotlightOff && state.spotlight_alpha <= EPSILON {
        state.reset_animation();
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Driver;
    use super::*;

    #[test]
    fn test_hover_turns_under_full_light() {
        let mut driver = Driver::new("spotlight3d-hover", 1);
        let mut flipped = false;
        let mut ticks = 0;
        loop {
            ticks += 1;
            let outcome = driver.step();
            flipped |= driver.state.flip;
            if outcome != StepOutcome::Continue {
                assert_eq!(outcome, StepOutcome::Stop);
                break;
            }
            assert_eq!(driver.state.spotlight_alpha, 1.0);
            assert!(driver.state.spotlight);
        }
        assert!(flipped);
        assert_eq!(ticks, SPOTLIGHT3D_PERIOD);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_hover_dims_when_outranked() {
        let mut driver = Driver::new("spotlight3d-hover", 0);
        driver.higher_queued = true;
        driver.step();
        assert!((driver.state.spotlight_alpha - (1.0 - SPOTLIGHT3D_FADE_STEP)).abs() < 1e-5);
        assert_eq!(driver.state.glow_amount, driver.state.spotlight_alpha);

        // 灯全暗且翻完一圈后让位
        let (outcome, _) = driver.run_until_settled(200);
        assert_eq!(outcome, StepOutcome::Suspend);
        assert_eq!(driver.state.count, 0);
    }

    #[test]
    fn test_opening_reveals_then_lifts_and_goes_dark() {
        let mut driver = Driver::new("spotlight3d-opening", 1);
        assert_eq!(driver.state.clip.map(|c| c.height), Some(0));

        let mut saw_lift = false;
        let mut dimmed = false;
        loop {
            let outcome = driver.step();
            if driver.state.top_offset > 0.0 {
                saw_lift = true;
                assert!(driver.state.clip.is_none());
            }
            dimmed |= driver.state.spotlight && driver.state.spotlight_alpha < 1.0;
            if outcome != StepOutcome::Continue {
                assert_eq!(outcome, StepOutcome::Stop);
                break;
            }
        }
        assert!(saw_lift);
        assert!(dimmed);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_closing_clips_and_turns() {
        let mut driver = Driver::new("spotlight3d-closing", 1);
        let mut flipped = false;
        let mut min_clip = i32::MAX;
        loop {
            let outcome = driver.step();
            flipped |= driver.state.flip;
            if let Some(clip) = driver.state.clip {
                min_clip = min_clip.min(clip.height);
            }
            assert_eq!(driver.state.glow_amount, driver.state.spotlight_alpha);
            if outcome != StepOutcome::Continue {
                assert_eq!(outcome, StepOutcome::Stop);
                break;
            }
        }
        assert!(flipped);
        assert!(min_clip < 48);
        assert!(driver.state.is_neutral());
    }
}
