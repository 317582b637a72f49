//! # Anims 模块
//!
//! 各效果的逐帧步进函数。
//!
//! ## 步进约定
//!
//! ```text
//! init(state)               ← 每次运行只调用一次（挂起/恢复不会重新触发）
//! step(state, ctx) -> StepOutcome
//!   Continue  继续接收 tick
//!   Suspend   冻结当前状态，停止接收 tick，等待重新成为栈顶后恢复
//!   Stop      本次运行结束，由控制器出队并复位状态
//! ```
//!
//! 步进函数只读写 [`IconVisualState`] 与 [`StepContext`]，不接触调度器，
//! 也不负责重绘；重绘由控制器在每次 step 之后统一发出。
//!
//! 一个周期结束时，效果先把自己改过的字段恢复为中性值，再调用
//! [`StepContext::end_cycle`]（或带自定义挂起规则的 [`StepContext::handle_repeating`]）
//! 决定是否继续。

mod bounce;
mod desaturate;
mod fade;
mod glow;
mod simple;
mod spotlight;
mod spotlight3d;
mod squish;
mod turn;
mod zoom;

use std::time::Duration;

use tracing::warn;

use crate::config::EffectSettings;
use crate::registry::{EffectId, EffectStyle, EffectVariant, defaults};
use crate::state::{IconVisualState, Orientation};

/// 步进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 继续接收 tick
    Continue,
    /// 冻结状态并停止接收 tick
    Suspend,
    /// 本次运行结束
    Stop,
}

/// 循环计数
///
/// `max_loops == 0` 表示无限循环，只能被显式 stop。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopCounter {
    /// 最大循环次数（0 = 无限）
    pub max_loops: u32,
    /// 已完成的周期数
    pub completed: u32,
}

impl LoopCounter {
    /// 创建循环计数
    pub fn new(max_loops: u32) -> Self {
        Self {
            max_loops,
            completed: 0,
        }
    }

    /// 记录一个完成的周期，返回是否还需要继续
    pub fn record_cycle(&mut self) -> bool {
        if self.max_loops == 0 {
            return true;
        }
        self.completed += 1;
        self.completed < self.max_loops
    }

    /// 是否为无限循环
    pub fn is_infinite(&self) -> bool {
        self.max_loops == 0
    }
}

/// 步进上下文
///
/// 由控制器为每次 tick 构造，携带效果需要的队列信息与宿主几何信息。
#[derive(Debug)]
pub struct StepContext<'a> {
    /// 队列中是否有优先级更高的效果排在当前效果之前
    pub higher_queued: bool,
    /// 面板容器尺寸（宽，高）
    pub container: (u32, u32),
    /// 面板朝向
    pub orientation: Orientation,
    loops: &'a mut LoopCounter,
}

impl<'a> StepContext<'a> {
    /// 创建步进上下文
    pub fn new(
        loops: &'a mut LoopCounter,
        higher_queued: bool,
        container: (u32, u32),
        orientation: Orientation,
    ) -> Self {
        Self {
            higher_queued,
            container,
            orientation,
            loops,
        }
    }

    /// 当前效果是否是队列栈顶
    pub fn check_top_effect(&self) -> bool {
        !self.higher_queued
    }

    /// 最大循环次数（0 = 无限）
    pub fn max_loops(&self) -> u32 {
        self.loops.max_loops
    }

    /// 循环计数：记录一个完成的周期，返回是否继续
    ///
    /// 只做计数，不考虑队列优先级。
    pub fn handle_repeating(&mut self) -> bool {
        self.loops.record_cycle()
    }

    /// 通用的周期结束检查点
    ///
    /// 循环用尽时返回 `Stop`；仍需继续但有更高优先级效果在排队时返回 `Suspend`；
    /// 否则返回 `Continue`。
    pub fn end_cycle(&mut self) -> StepOutcome {
        if !self.handle_repeating() {
            StepOutcome::Stop
        } else if self.higher_queued {
            StepOutcome::Suspend
        } else {
            StepOutcome::Continue
        }
    }

    /// zoom 类效果的放大上限
    ///
    /// 容器尺寸与图标尺寸之比，竖向面板取高度，横向面板取宽度。
    pub fn zoom_ceiling(&self, state: &IconVisualState) -> f32 {
        let (container, icon) = if self.orientation.is_vertical() {
            (self.container.1, state.icon_height)
        } else {
            (self.container.0, state.icon_width)
        };
        if icon == 0 {
            return 1.0;
        }
        container as f32 / icon as f32
    }
}

impl EffectId {
    /// 初始化本次运行的起始状态
    pub fn init(&self, state: &mut IconVisualState) {
        use EffectStyle as S;
        use EffectVariant as V;

        match (self.style, self.variant) {
            (S::Simple, V::Hover) => simple::hover_init(state),
            (S::Simple, V::Opening) => simple::opening_init(state),
            (S::Simple, V::Closing) => simple::closing_init(state),
            (S::Simple, V::Attention) => simple::attention_init(state),
            (S::Bounce, V::Plain | V::Hover) => bounce::init(state),
            (S::Bounce, V::Opening) => bounce::opening_init(state),
            (S::Bounce, V::Closing) => bounce::fade_out_init(state),
            (S::Fade, V::Plain | V::Hover) => fade::fading_init(state),
            (S::Fade, V::Opening) => fade::opening_init(state),
            (S::Fade, V::Closing) => fade::closing_init(state),
            (S::Glow, V::Hover) => glow::hover_init(state),
            (S::Glow, V::Opening) => glow::opening_init(state),
            (S::Glow, V::Closing) => glow::closing_init(state),
            (S::Glow, V::Attention) => glow::attention_init(state),
            (S::Zoom, V::Hover | V::Attention) => zoom::init(state),
            (S::Zoom, V::Opening) => zoom::opening_init(state),
            (S::Zoom, V::Closing) => zoom::closing_init(state),
            (S::Turn, V::Plain | V::Hover) => turn::init(state),
            (S::Turn, V::Opening) => turn::opening_init(state),
            (S::Turn, V::Closing) => turn::closing_init(state),
            (S::Squish, V::Plain | V::Attention) => squish::init(state),
            (S::Squish, V::Opening) => squish::opening_init(state),
            (S::Squish, V::Closing) => squish::closing_init(state),
            (S::Spotlight, V::Hover | V::Attention) => spotlight::init(state),
            (S::Spotlight, V::Opening) => spotlight::opening_init(state),
            (S::Spotlight, V::Closing) => spotlight::closing_init(state),
            (S::Spotlight3d, V::Hover) => spotlight3d::hover_init(state),
            (S::Spotlight3d, V::Opening) => spotlight3d::opening_init(state),
            (S::Spotlight3d, V::Closing) => spotlight3d::closing_init(state),
            (S::Desaturate, V::Plain) => desaturate::init(state),
            _ => warn!(effect = %self, "初始化了不存在的效果组合"),
        }
    }

    /// 推进一帧
    pub fn step(&self, state: &mut IconVisualState, ctx: &mut StepContext<'_>) -> StepOutcome {
        use EffectStyle as S;
        use EffectVariant as V;

        match (self.style, self.variant) {
            (S::Simple, V::Hover) => simple::hover(state, ctx),
            (S::Simple, V::Opening) => simple::opening(state, ctx),
            (S::Simple, V::Closing) => simple::closing(state, ctx),
            (S::Simple, V::Attention) => simple::attention(state, ctx),
            (S::Bounce, V::Plain) => bounce::bounce(state, ctx),
            (S::Bounce, V::Hover) => bounce::hover(state, ctx),
            (S::Bounce, V::Opening) => bounce::opening(state, ctx),
            (S::Bounce, V::Closing) => bounce::fade_out(state, ctx),
            (S::Fade, V::Plain) => fade::fading(state, ctx),
            (S::Fade, V::Hover) => fade::fading_hover(state, ctx),
            (S::Fade, V::Opening) => fade::opening(state, ctx),
            (S::Fade, V::Closing) => fade::closing(state, ctx),
            (S::Glow, V::Hover) => glow::hover(state, ctx),
            (S::Glow, V::Opening) => glow::opening(state, ctx),
            (S::Glow, V::Closing) => glow::closing(state, ctx),
            (S::Glow, V::Attention) => glow::attention(state, ctx),
            (S::Zoom, V::Hover) => zoom::hover(state, ctx),
            (S::Zoom, V::Attention) => zoom::attention(state, ctx),
            (S::Zoom, V::Opening) => zoom::opening(state, ctx),
            (S::Zoom, V::Closing) => zoom::closing(state, ctx),
            (S::Turn, V::Plain | V::Hover) => turn::turn(state, ctx),
            (S::Turn, V::Opening) => turn::opening(state, ctx),
            (S::Turn, V::Closing) => turn::closing(state, ctx),
            (S::Squish, V::Plain) => squish::squish(state, ctx),
            (S::Squish, V::Opening) => squish::opening(state, ctx),
            (S::Squish, V::Closing) => squish::closing(state, ctx),
            (S::Squish, V::Attention) => squish::attention(state, ctx),
            (S::Spotlight, V::Hover) => spotlight::hover(state, ctx),
            (S::Spotlight, V::Opening) => spotlight::opening(state, ctx),
            (S::Spotlight, V::Closing) => spotlight::closing(state, ctx),
            (S::Spotlight, V::Attention) => spotlight::half_fade(state, ctx),
            (S::Spotlight3d, V::Hover) => spotlight3d::hover(state, ctx),
            (S::Spotlight3d, V::Opening) => spotlight3d::opening(state, ctx),
            (S::Spotlight3d, V::Closing) => spotlight3d::closing(state, ctx),
            (S::Desaturate, V::Plain) => desaturate::desaturate(state, ctx),
            _ => {
                warn!(effect = %self, "步进了不存在的效果组合");
                StepOutcome::Stop
            }
        }
    }

    /// 该效果的 tick 间隔
    pub fn tick_interval(&self, settings: &EffectSettings) -> Duration {
        match (self.style, self.variant) {
            (EffectStyle::Simple, EffectVariant::Attention) => defaults::SIMPLE_BLINK_INTERVAL,
            _ => settings.frame_interval(),
        }
    }
}
