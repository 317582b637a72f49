//! zoom 系列：悬停放大、提醒放大、缩放展开、缩放收起。

use super::{StepContext, StepOutcome};
use crate::registry::defaults::{EPSILON, OPEN_CLOSE_PERIOD, ZOOM_ATTENTION_INCREMENT, ZOOM_INCREMENT};
use crate::state::{Direction, IconVisualState};

pub(super) fn init(state: &mut IconVisualState) {
    state.count = 0;
    state.width_mod = 1.0;
    state.height_mod = 1.0;
    state.top_offset = 0.0;
    state.direction = Direction::Up;
}

/// 悬停放大
///
/// 放大阶段是挂起检查点：有更高优先级效果排队时保持当前缩放并挂起。
pub(super) fn hover(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let ceiling = ctx.zoom_ceiling(state);

    match state.direction {
        Direction::Down => {
            state.width_mod -= ZOOM_INCREMENT;
            state.height_mod -= ZOOM_INCREMENT;
            if state.width_mod <= 1.0 + EPSILON {
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
        _ => {
            state.direction = Direction::Up;
            if ctx.higher_queued {
                return StepOutcome::Suspend;
            }
            if state.width_mod + ZOOM_INCREMENT < ceiling + EPSILON {
                state.width_mod += ZOOM_INCREMENT;
                state.height_mod += ZOOM_INCREMENT;
            } else {
                state.direction = Direction::Down;
            }
        }
    }
    StepOutcome::Continue
}

/// 提醒放大：放大的同时逐帧抬高 1 像素
pub(super) fn attention(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    let ceiling = ctx.zoom_ceiling(state);

    match state.direction {
        Direction::Down => {
            state.width_mod -= ZOOM_ATTENTION_INCREMENT;
            state.height_mod -= ZOOM_ATTENTION_INCREMENT;
            state.top_offset -= 1.0;
            if state.width_mod <= 1.0 + EPSILON {
                state.width_mod = 1.0;
                state.height_mod = 1.0;
                state.top_offset = 0.0;
                state.direction = Direction::None;
                return ctx.end_cycle();
            }
        }
        _ => {
            if state.width_mod + ZOOM_ATTENTION_INCREMENT < ceiling + EPSILON {
                state.direction = Direction::Up;
                state.width_mod += ZOOM_ATTENTION_INCREMENT;
                state.height_mod += ZOOM_ATTENTION_INCREMENT;
                state.top_offset += 1.0;
            } else {
                state.direction = Direction::Down;
            }
        }
    }
    StepOutcome::Continue
}

pub(super) fn opening_init(state: &mut IconVisualState) {
    state.count = 0;
    state.width_mod = 0.0;
    state.height_mod = 0.0;
    state.alpha = 0.0;
}

/// 从 0 线性放大到原始尺寸，同时淡入
pub(super) fn opening(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count += 1;
    let t = state.count as f32 / OPEN_CLOSE_PERIOD as f32;
    state.width_mod = t;
    state.height_mod = t;
    state.alpha = t;

    if state.count >= OPEN_CLOSE_PERIOD {
        state.count = 0;
        state.width_mod = 1.0;
        state.height_mod = 1.0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

pub(super) fn closing_init(state: &mut IconVisualState) {
    state.count = 0;
    state.width_mod = 1.0;
    state.height_mod = 1.0;
    state.alpha = 1.0;
}

/// 从原始尺寸线性缩小到 0，同时淡出
pub(super) fn closing(state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
    state.count += 1;
    let t = 1.0 - state.count as f32 / OPEN_CLOSE_PERIOD as f32;
    state.width_mod = t;
    state.height_mod = t;
    state.alpha = t;

    if state.count >= OPEN_CLOSE_PERIOD {
        state.count = 0;
        state.width_mod = 1.0;
        state.height_mod = 1.0;
        state.alpha = 1.0;
        return ctx.end_cycle();
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Driver;
    use super::*;
    use crate::state::Orientation;

    fn peak_width(driver: &mut Driver) -> f32 {
        let mut peak: f32 = 1.0;
        loop {
            let outcome = driver.step();
            peak = peak.max(driver.state.width_mod);
            if outcome != StepOutcome::Continue {
                return peak;
            }
        }
    }

    #[test]
    fn test_hover_peaks_at_container_ratio() {
        // 容器宽 144，图标宽 48
        let mut driver = Driver::new("zoom-hover", 1);
        let peak = peak_width(&mut driver);
        assert!(peak <= 3.0 + 1e-4);
        assert!(peak > 3.0 - ZOOM_INCREMENT - 1e-4);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_hover_ceiling_follows_vertical_panel() {
        // 竖向面板取容器高度：96 / 48 = 2
        let mut driver = Driver::new("zoom-hover", 1);
        driver.orientation = Orientation::Left;
        let peak = peak_width(&mut driver);
        assert!(peak <= 2.0 + 1e-4);
        assert!(peak > 2.0 - ZOOM_INCREMENT - 1e-4);
    }

    #[test]
    fn test_hover_suspends_while_growing() {
        let mut driver = Driver::new("zoom-hover", 0);
        for _ in 0..3 {
            driver.step();
        }
        let frozen = driver.state.width_mod;
        assert!(frozen > 1.0);

        driver.higher_queued = true;
        assert_eq!(driver.step(), StepOutcome::Suspend);
        assert_eq!(driver.state.width_mod, frozen);
    }

    #[test]
    fn test_hover_small_container_still_closes() {
        let mut driver = Driver::new("zoom-hover", 1);
        driver.container = (32, 32);
        let (outcome, _) = driver.run_until_settled(10);
        assert_eq!(outcome, StepOutcome::Stop);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_attention_lifts_icon() {
        let mut driver = Driver::new("zoom-attention", 1);
        driver.step();
        driver.step();
        assert_eq!(driver.state.top_offset, 2.0);
        assert!((driver.state.width_mod - (1.0 + 2.0 * ZOOM_ATTENTION_INCREMENT)).abs() < 1e-5);

        let (outcome, _) = driver.run_until_settled(200);
        assert_eq!(outcome, StepOutcome::Stop);
        assert!(driver.state.is_neutral());
    }

    #[test]
    fn test_opening_and_closing_are_linear() {
        let mut driver = Driver::new("zoom-opening", 1);
        for _ in 0..OPEN_CLOSE_PERIOD / 2 {
            driver.step();
        }
        assert!((driver.state.width_mod - 0.5).abs() < 1e-5);
        assert!((driver.state.alpha - 0.5).abs() < 1e-5);
        let (_, rest) = driver.run_until_settled(100);
        assert_eq!(rest, (OPEN_CLOSE_PERIOD / 2) as usize);

        let mut driver = Driver::new("zoom-closing", 1);
        for _ in 0..OPEN_CLOSE_PERIOD / 4 {
            driver.step();
        }
        assert!((driver.state.height_mod - 0.75).abs() < 1e-5);
        let (outcome, _) = driver.run_until_settled(100);
        assert_eq!(outcome, StepOutcome::Stop);
        assert!(driver.state.is_neutral());
    }
}
