//! fade 系列：透明度往返脉冲、悬停脉冲、线性淡入、线性淡出。

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    EPSILON, FADE_ALPHA_STEP, FADE_MIN_ALPHA, FADE_RISE_FACTOR, OPEN_CLOSE_PERIOD,
};
use crate::state::{Direction, IconVisualState};

pub(super) fn fading_init(state: &mut IconVisualState) {
    state.alpha = 1.0;
    state.direction = Direction::Down;
}

/// 推进一帧透明度脉冲，返回是否刚回到上限
fn pulse(state: &mut IconVisualState) -> bool {
    match state.direction {
        Direction::Up => {
            state.alpha += FADE_ALPHA_STEP * FADE_RISE_FACTOR;
            if state.alpha >= 1.0 - EPSILON {
                state.alpha = 1.0;
                state.direction = Direction::None;
                return true;
            }
        }
        _ => {
            state.alpha -= FADE_ALPHA_STEP;
            if state.alpha <= FADE_MIN_ALPHA + EPSILON {
                state.direction = Direction::Up;
            }
        }
    }
    false
}

pub(super) fn fading(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if pulse(state) {
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

/// 悬停脉冲
///
/// 回到上限时：只有无限循环（`max_loops == 0`）且有更高优先级效果排队才挂起；
/// 有限循环的悬停脉冲不让位，只做循环计数。
pub(super) fn fading_hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if !pulse(state) {
        return StepOutcome::Continue;
    }

    if ctx.higher_queued && ctx.max_loops() == 0 {
        return StepOutcome::Suspend;
    }
    if ctx.handle_repeating() {
        StepOutcome::Continue
    } else {
        StepOutcome::Stop
    }
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.alpha = 0.0;
}

pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count += 1;
    state.alpha = state.count as f32 / OPEN_CLOSE_PERIOD as f32;

    if state.count >= OPEN_CLOSE_PERIOD {
        state.count = 0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    state.count = 0;
    state.alpha = 1.0;
}

pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count += 1;
    state.alpha = 1.0 - state.count as f32 / OPEN_CLOSE_PERIOD as f32;

    if state.count >= OPEN_CLOSE_PERIOD {
        state.count = 0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}
