//! # Config 模块
//!
//! 效果引擎配置。
//!
//! ## 配置优先级
//!
//! 1. 宿主显式传入的 `EffectSettings`（最高）
//! 2. 配置文件 (effects.json)
//! 3. 默认值（最低）
//!
//! 周期、步长等效果常量不在这里配置，它们是 [`defaults`](crate::registry::defaults)
//! 中的具名常量。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::registry::{EffectId, EffectStyle, EffectVariant, defaults};

/// 各触发场景使用的效果风格
///
/// 未配置的场景使用 [`EffectSettings::style`]。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStyles {
    #[serde(default)]
    pub launching: Option<EffectStyle>,
    #[serde(default)]
    pub hover: Option<EffectStyle>,
    #[serde(default)]
    pub opening: Option<EffectStyle>,
    #[serde(default)]
    pub closing: Option<EffectStyle>,
    #[serde(default)]
    pub attention: Option<EffectStyle>,
}

impl EventStyles {
    fn get(&self, variant: EffectVariant) -> Option<EffectStyle> {
        match variant {
            EffectVariant::Plain => self.launching,
            EffectVariant::Hover => self.hover,
            EffectVariant::Opening => self.opening,
            EffectVariant::Closing => self.closing,
            EffectVariant::Attention => self.attention,
        }
    }
}

/// 效果引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSettings {
    /// 帧率（帧/秒），决定大多数效果的 tick 间隔
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 默认效果风格
    #[serde(default = "default_style")]
    pub style: EffectStyle,

    /// 按场景覆盖的效果风格
    #[serde(default)]
    pub events: EventStyles,
}

fn default_frame_rate() -> u32 {
    defaults::FRAME_RATE
}

fn default_style() -> EffectStyle {
    EffectStyle::Bounce
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            style: default_style(),
            events: EventStyles::default(),
        }
    }
}

impl EffectSettings {
    /// 加载配置文件
    ///
    /// 如果文件不存在、解析失败或校验不通过，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "效果配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => {
                        info!(path = %path.display(), "效果配置加载成功");
                        settings
                    }
                    Err(e) => {
                        warn!(error = %e, "效果配置无效，使用默认配置");
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "效果配置解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "效果配置读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 || self.frame_rate > 120 {
            return Err(ConfigError::ValidationFailed(format!(
                "帧率必须在 1 - 120 之间，实际为 {}",
                self.frame_rate
            )));
        }
        Ok(())
    }

    /// 常规效果的 tick 间隔
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate.max(1)))
    }

    /// 某个触发场景实际播放的效果
    ///
    /// 配置的风格不提供该变体时：提醒退回到同风格的基础效果，
    /// 其余场景退回到固定的兜底风格。
    pub fn effect_for(&self, variant: EffectVariant) -> EffectId {
        let style = self.events.get(variant).unwrap_or(self.style);

        if style.supports(variant) {
            return EffectId { style, variant };
        }
        if variant == EffectVariant::Attention && style.supports(EffectVariant::Plain) {
            return EffectId {
                style,
                variant: EffectVariant::Plain,
            };
        }

        let fallback = match variant {
            EffectVariant::Plain => EffectStyle::Bounce,
            EffectVariant::Hover | EffectVariant::Attention => EffectStyle::Glow,
            EffectVariant::Opening | EffectVariant::Closing => EffectStyle::Simple,
        };
        EffectId {
            style: fallback,
            variant,
        }
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
