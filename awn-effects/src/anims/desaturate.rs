//! desaturate：饱和度降到 0 再回到 1。

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{DESATURATE_STEP, EPSILON};
use crate::state::{Direction, IconVisualState};

pub(super) fn init(state: &mut IconVisualState) {
    state.saturation = 1.0;
    state.direction = Direction::Down;
}

/// 下降阶段是挂起检查点：有更高优先级效果排队时冻结当前饱和度
pub(super) fn desaturate(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    match state.direction {
        Direction::Up => {
            state.saturation += DESATURATE_STEP;
            if state.saturation >= 1.0 - EPSILON {
                state.saturation = 1.0;
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
        _ => {
            state.direction = Direction::Down;
            if ctx.higher_queued {
                return StepOutcome::Suspend;
            }
            state.saturation -= DESATURATE_STEP;
            if state.saturation <= EPSILON {
                state.saturation = 0.0;
                state.direction = Direction::Up;
            }
        }
    }
    StepOutcome::Continue
}
