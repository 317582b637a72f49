//! spotlight 系列：聚光灯亮起、抖动、熄灭；提醒时半强度往返。
//!
//! 展开时图标在聚光灯下自下而上露出；收起时聚光灯先亮起，图标在灯下收窄淡出。

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{
    EPSILON, SPOTLIGHT_CLOSING_ON_FACTOR, SPOTLIGHT_CLOSING_PERIOD,
    SPOTLIGHT_CLOSING_SHRINK_FACTOR, SPOTLIGHT_HALF_FADE_MAX, SPOTLIGHT_HALF_FADE_PERIOD,
    SPOTLIGHT_OPENING_FADE_FACTOR, SPOTLIGHT_OPENING_PERIOD, SPOTLIGHT_OPENING_START_WIDTH,
    SPOTLIGHT_OPENING_WIDTH_FACTOR, SPOTLIGHT_PERIOD, SPOTLIGHT_TREMBLE_HEIGHT,
    SPOTLIGHT_TREMBLE_PERIOD,
};
use crate::state::{ClipRegion, Direction, IconVisualState};

pub(super) fn init(state: &mut IconVisualState) {
    state.count = 0;
    state.spotlight = true;
    state.spotlight_alpha = 0.0;
    state.glow_amount = 0.0;
    state.direction = Direction::SpotlightOn;
}

fn finish_cycle(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count = 0;
    state.spotlight = false;
    state.spotlight_alpha = 0.0;
    state.glow_amount = 0.0;
    state.direction = Direction::None;
    ctx.end_cycle()
}

/// 悬停聚光灯
///
/// 亮起后抖动一次（暗到 `1 - TREMBLE_HEIGHT` 再回到 1），然后熄灭。
/// 抖动阶段是挂起检查点。发光强度始终跟随聚光灯不透明度。
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let tremble_step = SPOTLIGHT_TREMBLE_HEIGHT / SPOTLIGHT_TREMBLE_PERIOD as f32;
    let ramp_step = 1.0 / SPOTLIGHT_PERIOD as f32;

    if state.direction == Direction::None {
        init(state);
    }

    match state.direction {
        Direction::SpotlightTrembleDown | Direction::SpotlightTrembleUp if ctx.higher_queued => {
            return StepOutcome::Suspend;
        }
        Direction::SpotlightTrembleDown => {
            state.spotlight_alpha -= tremble_step;
            if state.spotlight_alpha <= 1.0 - SPOTLIGHT_TREMBLE_HEIGHT + EPSILON {
                state.direction = Direction::SpotlightTrembleUp;
            }
        }
        Direction::SpotlightTrembleUp => {
            state.spotlight_alpha += tremble_step;
            if state.spotlight_alpha >= 1.0 - EPSILON {
                state.spotlight_alpha = 1.0;
                state.direction = Direction::SpotlightOff;
            }
        }
        Direction::SpotlightOff => {
            state.spotlight_alpha -= ramp_step;
            if state.spotlight_alpha <= EPSILON {
                return finish_cycle(state, ctx);
            }
        }
        _ => {
            state.direction = Direction::SpotlightOn;
            state.spotlight_alpha += ramp_step;
            if state.spotlight_alpha >= 1.0 - EPSILON {
                state.spotlight_alpha = 1.0;
                state.direction = Direction::SpotlightTrembleDown;
            }
        }
    }

    state.glow_amount = state.spotlight_alpha;
    StepOutcome::Continue
}

/// 提醒：聚光灯在 0 与 0.75 之间往返
pub(super) fn half_fade(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let step = SPOTLIGHT_HALF_FADE_MAX / SPOTLIGHT_HALF_FADE_PERIOD as f32;

    if state.direction == Direction::None {
        init(state);
    }

    if state.direction == Direction::SpotlightOff {
        state.spotlight_alpha -= step;
        if state.spotlight_alpha <= EPSILON {
            return finish_cycle(state, ctx);
        }
    } else {
        state.spotlight_alpha += step;
        if state.spotlight_alpha >= SPOTLIGHT_HALF_FADE_MAX - EPSILON {
            state.spotlight_alpha = SPOTLIGHT_HALF_FADE_MAX;
            state.direction = Direction::SpotlightOff;
        }
    }

    state.glow_amount = state.spotlight_alpha;
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.spotlight = true;
    state.spotlight_alpha = 1.0;
    state.glow_amount = 1.0;
    state.width_mod = SPOTLIGHT_OPENING_START_WIDTH;
    state.clip = Some(ClipRegion {
        x: 0,
        y: 0,
        width: state.icon_width as i32,
        height: 0,
    });
    state.direction = Direction::SpotlightOn;
}

/// 展开：宽度从一半长到完整、裁剪区域逐帧露出图标，之后聚光灯熄灭
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let period = SPOTLIGHT_OPENING_PERIOD as f32;
    let icon_height = state.icon_height as i32;
    let reveal = (icon_height / SPOTLIGHT_OPENING_PERIOD).max(1);

    if state.direction == Direction::None {
        opening_init(state);
    }

    let clip = state.clip;
    match clip {
        Some(mut clip) if state.width_mod < 1.0 => {
            clip.height += reveal;
            state.clip = Some(clip);
            state.width_mod =
                (state.width_mod + SPOTLIGHT_OPENING_WIDTH_FACTOR / period).min(1.0);
        }
        Some(mut clip) if clip.height < icon_height => {
            clip.height = (clip.height + reveal).min(icon_height);
            state.clip = Some(clip);
            state.width_mod = 1.0;
        }
        _ => {
            state.clip = None;
            state.width_mod = 1.0;
            state.direction = Direction::SpotlightOff;
            state.spotlight_alpha -= SPOTLIGHT_OPENING_FADE_FACTOR / period;
        }
    }
    state.glow_amount = state.spotlight_alpha;

    if state.spotlight_alpha <= EPSILON {
        state.reset_animation();
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    state.count = 0;
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

/// 收起：聚光灯亮起 → 图标收窄、裁剪、淡出（透明度过半后灯开始变暗）→ 灯熄灭
pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let period = SPOTLIGHT_CLOSING_PERIOD as f32;
    let shrink = SPOTLIGHT_CLOSING_SHRINK_FACTOR / period;

    if state.direction == Direction::None {
        closing_init(state);
    }

    match state.direction {
        Direction::SpotlightOn => {
            state.spotlight_alpha += SPOTLIGHT_CLOSING_ON_FACTOR / period;
            if state.spotlight_alpha >= 1.0 - EPSILON {
                state.spotlight_alpha = 1.0;
                state.direction = Direction::Down;
            }
        }
        Direction::Down => {
            let clip_step = SPOTLIGHT_CLOSING_SHRINK_FACTOR as i32 * state.icon_height as i32
                / SPOTLIGHT_CLOSING_PERIOD;
            if let Some(clip) = state.clip.as_mut() {
                clip.height = (clip.height - clip_step).max(0);
            }
            state.width_mod -= shrink;
            state.alpha -= shrink;

            if state.alpha <= EPSILON {
                state.alpha = 0.0;
                state.width_mod = 1.0;
                state.direction = Direction::SpotlightOff;
            } else if state.alpha <= 0.5 {
                state.spotlight_alpha -= shrink;
            }
        }
        _ => {
            state.clip = None;
            state.spotlight_alpha -= shrink;
        }
    }
    state.glow_amount = state.spotlight_alpha;

    if state.direction == Direction::SpotlightOff && state.spotlight_alpha <= EPSILON {
        state.reset_animation();
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}
