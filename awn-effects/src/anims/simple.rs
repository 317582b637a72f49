//! simple 系列：悬停发光、sin² 淡入、cos² 淡出、高亮矩形闪烁。

use std::f32::consts::FRAC_PI_2;

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{SIMPLE_HOVER_PERIOD, SIMPLE_PERIOD};
use crate::state::IconVisualState;

fn phase(count: i32) -> f32 {
    count as f32 * FRAC_PI_2 / SIMPLE_PERIOD as f32
}

pub(super) fn hover_init(state: &mut IconVisualState) {
    state.count = 0;
    state.glow_amount = 1.0;
}

/// 悬停时保持满发光
///
/// 有更高优先级的效果排队时带着满发光挂起；循环用尽时熄灭。
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.glow_amount = 1.0;
    if ctx.higher_queued {
        return StepOutcome::Suspend;
    }

    state.count += 1;
    if state.count < SIMPLE_HOVER_PERIOD {
        return StepOutcome::Continue;
    }

    state.count = 0;
    let outcome = ctx.end_cycle();
    if outcome == StepOutcome::Stop {
        state.glow_amount = 0.0;
    }
    outcome
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.alpha = 0.0;
}

pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let sinus = phase(state.count).sin();
    state.count += 1;
    state.alpha = sinus * sinus;

    if state.count >= SIMPLE_PERIOD {
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
    let cosin = phase(state.count).cos();
    state.count += 1;
    state.alpha = cosin * cosin;

    if state.count >= SIMPLE_PERIOD {
        state.count = 0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn attention_init(state: &mut IconVisualState) {
    state.count = 0;
    state.highlight = false;
}

/// 高亮矩形闪烁
///
/// 第一帧只点亮高亮，之后每帧翻转一次并记一个周期。循环用尽时熄灭高亮。
pub(super) fn attention(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    if state.count == 0 {
        state.count = 1;
        state.highlight = true;
        return StepOutcome::Continue;
    }

    state.highlight = !state.highlight;
    let outcome = ctx.end_cycle();
    if outcome == StepOutcome::Stop {
        attention_init(state);
    }
    outcome
}
