//! # Error 模块
//!
//! 定义 awn-effects 中使用的错误类型。
//!
//! 效果函数本身不会失败；这里的错误只出现在控制器边界（宿主传入了
//! 未知的效果名、已注销的图标，或破坏状态机前置条件的调用）。

use thiserror::Error;

use crate::registry::{EffectId, EffectStyle, EffectVariant};
use crate::state::IconId;

/// 效果引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectsError {
    /// 无法识别的效果名
    #[error("未知效果 '{name}'")]
    UnknownEffect { name: String },

    /// 该风格不提供此变体
    #[error("效果风格 '{style}' 不支持变体 '{variant}'")]
    UnsupportedVariant {
        style: EffectStyle,
        variant: EffectVariant,
    },

    /// 图标未注册
    #[error("图标 {icon} 未注册")]
    IconNotFound { icon: IconId },

    /// 对未挂起的效果调用 resume
    #[error("效果 '{effect}' 未处于挂起状态，无法恢复")]
    ResumeWithoutSuspend { effect: EffectId },

    /// 无效的状态转换
    #[error("效果 '{effect}' 的状态转换无效: {message}")]
    InvalidTransition { effect: EffectId, message: String },
}

/// Result 类型别名
pub type EffectsResult<T> = Result<T, EffectsError>;
