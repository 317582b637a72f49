//! glow 系列：悬停发光、展开、收起、提醒脉冲。

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    EPSILON, GLOW_ATTENTION_MAX, GLOW_ATTENTION_PERIOD, GLOW_CLOSING_ALPHA_STEP,
    GLOW_CLOSING_GLOW_STEP, GLOW_CLOSING_START, GLOW_OPENING_ALPHA_STEP, GLOW_OPENING_GLOW_STEP,
    GLOW_OPENING_START, GLOW_STEP,
};
use crate::state::{Direction, IconVisualState};

pub(super) fn hover_init(state: &mut IconVisualState) {
    state.glow_amount = 1.0;
    state.direction = Direction::Down;
}

/// 悬停发光
///
/// 没有更高优先级效果时从 1.0 线性衰减到 0；一旦有更高优先级效果排队，
/// 立即回到 1.0 并挂起。
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if state.direction == Direction::None {
        hover_init(state);
    }

    if ctx.higher_queued {
        state.glow_amount = 1.0;
        return StepOutcome::Suspend;
    }

    state.glow_amount -= GLOW_STEP;
    if state.glow_amount <= 0.0 {
        state.glow_amount = 0.0;
        state.direction = Direction::None;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.direction = Direction::Up;
    state.alpha = 0.0;
    state.glow_amount = GLOW_OPENING_START;
}

/// 先淡入，再把强光衰减掉
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    match state.direction {
        Direction::Up => {
            state.alpha += GLOW_OPENING_ALPHA_STEP;
            if state.alpha > 1.0 - EPSILON {
                state.alpha = 1.0;
                state.direction = Direction::Down;
            }
        }
        Direction::Down => {
            state.glow_amount -= GLOW_OPENING_GLOW_STEP;
            if state.glow_amount < EPSILON {
                state.glow_amount = 0.0;
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
        _ => opening_init(state),
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    state.direction = Direction::Down;
    state.alpha = 1.0;
    state.glow_amount = GLOW_CLOSING_START;
}

/// 边变亮边淡出
pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if state.direction != Direction::Down {
        closing_init(state);
    }

    state.alpha -= GLOW_CLOSING_ALPHA_STEP;
    state.glow_amount += GLOW_CLOSING_GLOW_STEP;

    if state.alpha < 0.0 {
        state.alpha = 1.0;
        state.glow_amount = 0.0;
        state.direction = Direction::None;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn attention_init(state: &mut IconVisualState) {
    state.count = 0;
    state.direction = Direction::Up;
    state.glow_amount = 0.0;
}

/// 发光强度在 0 与峰值之间往返
pub(super) fn attention(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let step = GLOW_ATTENTION_MAX / GLOW_ATTENTION_PERIOD as f32;

    if state.direction == Direction::Down {
        state.glow_amount -= step;
    } else {
        state.glow_amount += step;
    }

    if state.glow_amount >= GLOW_ATTENTION_MAX - EPSILON {
        state.direction = Direction::Down;
    } else if state.glow_amount <= EPSILON {
        state.count = 0;
        state.glow_amount = 0.0;
        state.direction = Direction::None;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}
