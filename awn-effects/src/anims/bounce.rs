//! bounce 系列：基于正弦的弹跳、悬停弹跳、裁剪展开后弹跳、上滑淡出。

use std::f32::consts::PI;

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    BOUNCE_HOVER_OFFSET_DIVISOR, BOUNCE_HOVER_PERIOD, BOUNCE_OFFSET_DIVISOR,
    BOUNCE_OPENING_BOUNCE_PERIOD, BOUNCE_OPENING_OFFSET_DIVISOR, BOUNCE_OPENING_REVEAL_PERIOD,
    BOUNCE_PERIOD, FADE_OUT_MAX_OFFSET, FADE_OUT_PERIOD,
};
use crate::state::{ClipRegion, IconVisualState};

/// 第 `count` 帧的弹跳偏移：`sin(count·π / period) · max_offset`
pub fn bounce_offset(count: i32, period: i32, max_offset: f32) -> f32 {
    (count as f32 * PI / period as f32).sin() * max_offset
}

pub(super) fn init(state: &mut IconVisualState) {
    state.count = 0;
    state.top_offset = 0.0;
}

pub(super) fn bounce(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let max_offset = state.bounce_extent(ctx.orientation) / BOUNCE_OFFSET_DIVISOR;

    state.count += 1;
    state.top_offset = bounce_offset(state.count, BOUNCE_PERIOD, max_offset);

    if state.count >= BOUNCE_PERIOD {
        state.count = 0;
        state.top_offset = 0.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

/// 悬停弹跳：最高点是挂起检查点
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let max_offset = state.bounce_extent(ctx.orientation) / BOUNCE_HOVER_OFFSET_DIVISOR;

    state.count += 1;
    state.top_offset = bounce_offset(state.count, BOUNCE_HOVER_PERIOD, max_offset);

    if state.count == BOUNCE_HOVER_PERIOD / 2 && ctx.higher_queued {
        return StepOutcome::Suspend;
    }

    if state.count >= BOUNCE_HOVER_PERIOD {
        state.count = 0;
        state.top_offset = 0.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.top_offset = 0.0;
    state.clip = Some(ClipRegion {
        x: 0,
        y: 0,
        width: state.icon_width as i32,
        height: 0,
    });
}

/// 先自下而上露出图标，再弹跳一次
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    const REVEAL: i32 = BOUNCE_OPENING_REVEAL_PERIOD;
    const TOTAL: i32 = BOUNCE_OPENING_REVEAL_PERIOD + BOUNCE_OPENING_BOUNCE_PERIOD;

    if state.count < REVEAL {
        state.count += 1;
        state.clip = Some(ClipRegion {
            x: 0,
            y: 0,
            width: state.icon_width as i32,
            height: state.icon_height as i32 * state.count / REVEAL,
        });
    } else if state.count < TOTAL {
        let max_offset = state.bounce_extent(ctx.orientation) / BOUNCE_OPENING_OFFSET_DIVISOR;
        state.clip = None;
        state.count += 1;
        state.top_offset = bounce_offset(
            state.count - REVEAL,
            BOUNCE_OPENING_BOUNCE_PERIOD,
            max_offset,
        );
    }

    if state.count >= TOTAL {
        state.count = 0;
        state.top_offset = 0.0;
        state.clip = None;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn fade_out_init(state: &mut IconVisualState) {
    state.count = 0;
    state.alpha = 1.0;
}

/// 上滑并淡出
pub(super) fn fade_out(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count += 1;
    state.top_offset = state.count as f32 * (FADE_OUT_MAX_OFFSET / FADE_OUT_PERIOD as f32);
    state.alpha = 1.0 - state.count as f32 / FADE_OUT_PERIOD as f32;

    if state.count >= FADE_OUT_PERIOD {
        state.count = 0;
        state.top_offset = 0.0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}
