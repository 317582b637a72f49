//! turn 系列：伪 3D 翻牌。
//!
//! 帧计数先经过正弦扭曲（开头快、结尾慢），扭曲后的计数落在四个四分之一阶段里，
//! 每个阶段线性插值宽度压缩并切换镜像，厚度由宽度推出。

use std::f32::consts::FRAC_PI_2;

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{TURN_DEPTH_FACTOR, TURN_MIN_WIDTH, TURN_PERIOD};
use crate::state::{ClipRegion, IconVisualState};

const QUARTER: i32 = TURN_PERIOD / 4;

/// 正弦扭曲后的帧计数，取整
pub(super) fn warped_count(count: i32, period: i32) -> i32 {
    ((count as f32 * FRAC_PI_2 / period as f32).sin() * period as f32) as i32
}

/// 按翻转进度所在的四分之一阶段写入宽度、镜像、厚度
pub(super) fn apply_quarter(state: &mut IconVisualState, position: i32, quarter: i32) {
    let span = quarter as f32;
    let (width, flip, depth_direction) = if position < quarter {
        (1.0 - position as f32 / span, false, 0)
    } else if position < quarter * 2 {
        ((position - quarter) as f32 / span, true, 1)
    } else if position < quarter * 3 {
        (1.0 - (position - quarter * 2) as f32 / span, true, 0)
    } else {
        ((position - quarter * 3) as f32 / span, false, 1)
    };

    state.flip = flip;
    state.depth_direction = depth_direction;
    // 厚度用钳制前的宽度计算
    state.icon_depth = TURN_DEPTH_FACTOR * (1.0 - width);
    state.width_mod = width.clamp(TURN_MIN_WIDTH, 1.0);
}

fn reset(state: &mut IconVisualState) {
    state.count = 0;
    state.top_offset = 0.0;
    state.icon_depth = 0.0;
    state.depth_direction = 0;
    state.width_mod = 1.0;
    state.flip = false;
    state.clip = None;
}

pub(super) fn init(state: &mut IconVisualState) {
    reset(state);
}

pub(super) fn turn(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let warped = warped_count(state.count, TURN_PERIOD);
    apply_quarter(state, warped, QUARTER);
    state.count += 1;

    if state.count >= TURN_PERIOD {
        reset(state);
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    reset(state);
    state.clip = Some(ClipRegion {
        x: 0,
        y: 0,
        width: state.icon_width as i32,
        height: 0,
    });
}

/// 前半程翻转中自下而上露出图标，后半程先抬起再落回
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let warped = warped_count(state.count, TURN_PERIOD);
    let icon_height = state.icon_height as i32;
    let max_offset = (icon_height / 2) as f32;

    if warped < QUARTER * 2 {
        state.clip = Some(ClipRegion {
            x: 0,
            y: 0,
            width: state.icon_width as i32,
            height: warped * icon_height / (TURN_PERIOD / 2),
        });
    } else if warped < QUARTER * 3 {
        state.clip = None;
        state.top_offset = (warped - QUARTER * 2) as f32 * max_offset / QUARTER as f32;
    } else {
        state.clip = None;
        state.top_offset = max_offset - (warped - QUARTER * 3) as f32 * max_offset / QUARTER as f32;
    }

    apply_quarter(state, warped, QUARTER);
    state.count += 1;

    if state.count >= TURN_PERIOD {
        reset(state);
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    reset(state);
    state.alpha = 1.0;
}

/// 翻转的同时上移并淡出
pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let warped = warped_count(state.count, TURN_PERIOD);
    state.top_offset = (warped * state.icon_height as i32 / TURN_PERIOD) as f32;
    state.alpha = 1.0 - warped as f32 / TURN_PERIOD as f32;

    apply_quarter(state, warped, QUARTER);
    state.count += 1;

    if state.count >= TURN_PERIOD {
        reset(state);
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}
