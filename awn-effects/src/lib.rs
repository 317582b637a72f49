//! # AWN Effects
//!
//! 面板图标动画效果引擎。
//!
//! ## 架构概述
//!
//! `awn-effects` 是纯逻辑核心，不依赖任何窗口系统或绘图库。
//! 它按帧推进每个图标的视觉状态，宿主负责计时与绘制：
//!
//! ```text
//! Host                               Engine
//!   │                                   │
//!   │──── start / stop ────────────────►│
//!   │◄─── TickSource::register ─────────│
//!   │──── tick(icon) ──────────────────►│ step()
//!   │◄─── IconHost::request_redraw ─────│
//!   │                                   │
//! ```
//!
//! ## 核心类型
//!
//! - [`IconVisualState`]：单个图标的视觉参数（偏移、缩放、透明度、发光、裁剪……）
//! - [`EffectId`]：效果标识（风格 × 变体），带优先级
//! - [`IconEffects`]：单个图标的效果队列与状态机
//! - [`EffectEngine`]：多图标门面，连接 [`IconHost`] 与 [`TickSource`]
//!
//! ## 使用示例
//!
//! ```ignore
//! use awn_effects::{EffectEngine, EffectSettings, ManualTicks};
//!
//! let mut engine = EffectEngine::new(host, ManualTicks::new(), EffectSettings::default());
//! let icon = engine.add_icon();
//! engine.start_named(icon, "bounce", 1, true)?;
//!
//! // 宿主的时钟按注册的间隔调用
//! while engine.tick(icon)?.is_some() {}
//! ```
//!
//! ## 模块结构
//!
//! - [`state`]：视觉状态
//! - [`registry`]：效果目录、优先级、常量
//! - [`anims`]：各效果的步进函数
//! - [`controller`]：单图标队列与状态机
//! - [`engine`]：多图标门面与宿主接缝
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod anims;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod registry;
pub mod state;

// 重导出核心类型
pub use anims::{LoopCounter, StepContext, StepOutcome};
pub use config::{ConfigError, EffectSettings, EventStyles};
pub use controller::{EffectEntry, EffectEvent, EffectQueue, EntryPhase, IconEffects};
pub use engine::{EffectEngine, IconHost, ManualTicks, TickSource};
pub use error::{EffectsError, EffectsResult};
pub use registry::{EffectId, EffectPriority, EffectStyle, EffectVariant, defaults};
pub use state::{ClipRegion, Direction, IconId, IconVisualState, Orientation};
