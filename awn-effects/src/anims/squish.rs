//! squish 系列：压扁 → 回弹 → 弹起 → 再压扁 → 回弹。
//!
//! 展开时先边长大边弹起、落地后压扁一次；收起时先压扁一次、再边缩小边弹起。

use std::f32::consts::PI;

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    EPSILON, SQUISH_ATTENTION_SCALE, SQUISH_HOP_PERIOD, SQUISH_MIN_HEIGHT, SQUISH_OFFSET_DIVISOR,
    SQUISH_PERIOD,
};
use crate::state::{Direction, IconVisualState};

const SQUISH_STEP: f32 = 3.0 / SQUISH_PERIOD as f32;

pub(super) fn init(state: &mut IconVisualState) {
    state.count = 0;
    state.width_mod = 1.0;
    state.height_mod = 1.0;
    state.top_offset = 0.0;
    state.direction = Direction::SquishDown;
}

/// 推进一帧；`scale_in_air` 为真时弹起阶段同时放大
fn advance(state: &mut IconVisualState, ctx: &mut StepContext<'_>, scale_in_air: bool) -> StepOutcome {
    match state.direction {
        Direction::None | Direction::SquishDown | Direction::SquishDown2 => {
            let second = state.direction == Direction::SquishDown2;
            state.width_mod += SQUISH_STEP;
            state.height_mod -= SQUISH_STEP;
            state.direction = if second {
                Direction::SquishDown2
            } else {
                Direction::SquishDown
            };
            if state.height_mod <= SQUISH_MIN_HEIGHT + EPSILON {
                state.direction = if second {
                    Direction::SquishUp2
                } else {
                    Direction::SquishUp
                };
            }
        }
        Direction::SquishUp | Direction::SquishUp2 => {
            state.width_mod -= SQUISH_STEP;
            state.height_mod += SQUISH_STEP;
            if state.height_mod >= 1.0 - EPSILON {
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                if state.direction == Direction::SquishUp2 {
                    state.count = 0;
                    state.direction = Direction::None;
                    return ctx.end_cycle();
                }
                state.direction = Direction::Up;
            }
        }
        _ => {
            // 弹起阶段
            state.count += 1;
            let wave = (state.count as f32 * 2.0 * PI / SQUISH_PERIOD as f32).sin();
            state.top_offset = wave * state.bounce_extent(ctx.orientation) / SQUISH_OFFSET_DIVISOR;
            if scale_in_air {
                state.width_mod = 1.0 + wave * SQUISH_ATTENTION_SCALE;
                state.height_mod = state.width_mod;
            }
            if state.count >= SQUISH_PERIOD / 2 {
                state.count = 0;
                state.top_offset = 0.0;
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.direction = Direction::SquishDown2;
            }
        }
    }
    StepOutcome::Continue
}

pub(super) fn squish(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    advance(state, ctx, false)
}

pub(super) fn attention(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    advance(state, ctx, true)
}

/// 展开/收起时的单次弹起高度
fn hop_offset(state: &IconVisualState, ctx: &StepContext<'_>) -> f32 {
    let wave = (state.count as f32 * PI / SQUISH_HOP_PERIOD as f32).sin();
    wave * state.bounce_extent(ctx.orientation) / SQUISH_OFFSET_DIVISOR
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.top_offset = 0.0;
    state.width_mod = 0.0;
    state.height_mod = 0.0;
    state.direction = Direction::Up;
}

pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let grow_step = 1.0 / SQUISH_HOP_PERIOD as f32;

    match state.direction {
        Direction::SquishDown => {
            state.width_mod += SQUISH_STEP;
            state.height_mod -= SQUISH_STEP;
            if state.height_mod <= SQUISH_MIN_HEIGHT + EPSILON {
                state.direction = Direction::SquishUp;
            }
        }
        Direction::SquishUp => {
            state.width_mod -= SQUISH_STEP;
            state.height_mod += SQUISH_STEP;
            if state.height_mod >= 1.0 - EPSILON {
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
        _ => {
            state.direction = Direction::Up;
            state.count += 1;
            state.top_offset = hop_offset(state, ctx);
            if state.width_mod < 1.0 {
                state.width_mod = (state.width_mod + grow_step).min(1.0);
                state.height_mod = state.width_mod;
            }
            if state.count >= SQUISH_HOP_PERIOD {
                state.count = 0;
                state.top_offset = 0.0;
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.direction = Direction::SquishDown;
            }
        }
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    init(state);
}

pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let shrink_step = 1.0 / SQUISH_HOP_PERIOD as f32;

    match state.direction {
        Direction::None | Direction::SquishDown => {
            state.direction = Direction::SquishDown;
            state.width_mod += SQUISH_STEP;
            state.height_mod -= SQUISH_STEP;
            if state.height_mod <= SQUISH_MIN_HEIGHT + EPSILON {
                state.direction = Direction::SquishUp;
            }
        }
        Direction::SquishUp => {
            state.width_mod -= SQUISH_STEP;
            state.height_mod += SQUISH_STEP;
            if state.height_mod >= 1.0 - EPSILON {
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.count = 0;
                state.direction = Direction::Down;
            }
        }
        _ => {
            state.count += 1;
            state.top_offset = hop_offset(state, ctx);
            state.width_mod = (state.width_mod - shrink_step).max(0.0);
            state.height_mod = state.width_mod;
            if state.count >= SQUISH_HOP_PERIOD {
                init(state);
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Driver;
    use super::*;

    #[test]
    fn test_squish_phases_in_order() {
        let mut driver = Driver::new("squish", 1);
        let mut phases = vec![driver.state.direction];
        loop {
            let outcome = driver.step();
            if phases.last() != Some(&driver.state.direction) {
                phases.push(driver.state.direction);
            }
            assert!(driver.state.height_mod >= SQUISH_MIN_HEIGHT - SQUISH_STEP);
            if outcome != StepOutcome::Continue {
                break;
            }
        }
        assert_eq!(
            phases,
            vec![
                Direction::SquishDown,
                Direction::SquishUp,
                Direction::Up,
                Direction::SquishDown2,
                Direction::SquishUp2,
                Direction::None,
            ]
        );
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_squish_bounce_height() {
        let mut driver = Driver::new("squish", 1);
        let mut peak: f32 = 0.0;
        loop {
            let outcome = driver.step();
            peak = peak.max(driver.state.top_offset);
            if outcome != StepOutcome::Continue {
                break;
            }
        }
        // 48 / 3.2 = 15
        assert!((peak - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_attention_scales_in_air() {
        let mut driver = Driver::new("squish-attention", 1);
        let mut max_scale: f32 = 1.0;
        loop {
            let outcome = driver.step();
            if driver.state.direction == Direction::Up {
                max_scale = max_scale.max(driver.state.height_mod);
            }
            if outcome != StepOutcome::Continue {
                break;
            }
        }
        assert!((max_scale - (1.0 + SQUISH_ATTENTION_SCALE)).abs() < 1e-3);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_opening_grows_while_hopping() {
        let mut driver = Driver::new("squish-opening", 1);
        assert_eq!(driver.state.width_mod, 0.0);

        driver.step();
        assert!((driver.state.width_mod - 1.0 / SQUISH_HOP_PERIOD as f32).abs() < 1e-5);
        assert_eq!(driver.state.height_mod, driver.state.width_mod);

        let mut peak: f32 = 0.0;
        let mut squished = false;
        loop {
            let outcome = driver.step();
            peak = peak.max(driver.state.top_offset);
            squished |= driver.state.direction == Direction::SquishUp;
            if outcome != StepOutcome::Continue {
                assert_eq!(outcome, StepOutcome::Stop);
                break;
            }
        }
        assert!((peak - 15.0).abs() < 1e-3);
        assert!(squished);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_closing_squishes_then_shrinks() {
        let mut driver = Driver::new("squish-closing", 1);
        let mut phases = vec![driver.state.direction];
        let mut min_width: f32 = 1.0;
        loop {
            let outcome = driver.step();
            if phases.last() != Some(&driver.state.direction) {
                phases.push(driver.state.direction);
            }
            if driver.state.direction == Direction::Down {
                min_width = min_width.min(driver.state.width_mod);
            }
            if outcome != StepOutcome::Continue {
                break;
            }
        }
        assert_eq!(
            phases,
            vec![
                Direction::SquishDown,
                Direction::SquishUp,
                Direction::Down,
                Direction::None,
            ]
        );
        assert!(min_width < 0.1);
        assert!(driver.state.is_neutral());
    }
}
