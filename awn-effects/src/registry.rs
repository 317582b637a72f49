//! # Effect Registry
//!
//! 效果标识、优先级与默认参数。
//! 这是所有效果名称、周期、步长常量的**唯一来源**。
//!
//! ## 命名
//!
//! 效果由"风格 × 变体"组成：
//!
//! ```text
//! bounce          → Bounce × Plain
//! glow-hover      → Glow × Hover
//! zoom-opening    → Zoom × Opening
//! ```
//!
//! 并非所有组合都存在，支持的组合见 [`EffectId::all`]。

use serde::{Deserialize, Serialize};

use crate::error::{EffectsError, EffectsResult};

/// 效果风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectStyle {
    Simple,
    Bounce,
    Fade,
    Glow,
    Zoom,
    Turn,
    Squish,
    Spotlight,
    Spotlight3d,
    Desaturate,
}

impl EffectStyle {
    /// 所有风格
    pub const ALL: [EffectStyle; 10] = [
        Self::Simple,
        Self::Bounce,
        Self::Fade,
        Self::Glow,
        Self::Zoom,
        Self::Turn,
        Self::Squish,
        Self::Spotlight,
        Self::Spotlight3d,
        Self::Desaturate,
    ];

    /// 风格名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Bounce => "bounce",
            Self::Fade => "fade",
            Self::Glow => "glow",
            Self::Zoom => "zoom",
            Self::Turn => "turn",
            Self::Squish => "squish",
            Self::Spotlight => "spotlight",
            Self::Spotlight3d => "spotlight3d",
            Self::Desaturate => "desaturate",
        }
    }

    /// 该风格提供的变体
    pub fn variants(&self) -> &'static [EffectVariant] {
        use EffectVariant::*;
        match self {
            Self::Simple => &[Hover, Opening, Closing, Attention],
            Self::Bounce => &[Plain, Hover, Opening, Closing],
            Self::Fade => &[Plain, Hover, Opening, Closing],
            Self::Glow => &[Hover, Opening, Closing, Attention],
            Self::Zoom => &[Hover, Attention, Opening, Closing],
            Self::Turn => &[Plain, Hover, Opening, Closing],
            Self::Squish => &[Plain, Opening, Closing, Attention],
            Self::Spotlight => &[Hover, Opening, Closing, Attention],
            Self::Spotlight3d => &[Hover, Opening, Closing],
            Self::Desaturate => &[Plain],
        }
    }

    /// 是否提供某个变体
    pub fn supports(&self, variant: EffectVariant) -> bool {
        self.variants().contains(&variant)
    }
}

impl std::fmt::Display for EffectStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EffectStyle {
    type Err = EffectsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| EffectsError::UnknownEffect {
                name: s.to_string(),
            })
    }
}

/// 效果变体（触发场景）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectVariant {
    /// 基础效果（启动应用时播放）
    Plain,
    /// 鼠标悬停
    Hover,
    /// 图标出现
    Opening,
    /// 图标消失
    Closing,
    /// 请求注意
    Attention,
}

impl EffectVariant {
    /// 变体名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Hover => "hover",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Attention => "attention",
        }
    }
}

impl std::fmt::Display for EffectVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EffectVariant {
    type Err = EffectsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "hover" => Ok(Self::Hover),
            "opening" => Ok(Self::Opening),
            "closing" => Ok(Self::Closing),
            "attention" => Ok(Self::Attention),
            other => Err(EffectsError::UnknownEffect {
                name: other.to_string(),
            }),
        }
    }
}

/// 效果优先级
///
/// 声明顺序即从低到高，可以直接比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectPriority {
    Lowest,
    Low,
    BelowNormal,
    Normal,
    AboveNormal,
    High,
    Highest,
}

/// 效果标识
///
/// 序列化为效果名字符串（如 `"glow-hover"`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EffectId {
    pub style: EffectStyle,
    pub variant: EffectVariant,
}

impl EffectId {
    /// 创建效果标识，组合不存在时返回错误
    pub fn new(style: EffectStyle, variant: EffectVariant) -> EffectsResult<Self> {
        if style.supports(variant) {
            Ok(Self { style, variant })
        } else {
            Err(EffectsError::UnsupportedVariant { style, variant })
        }
    }

    /// 所有支持的效果，按风格、变体声明顺序排列
    pub fn all() -> Vec<EffectId> {
        EffectStyle::ALL
            .iter()
            .flat_map(|style| {
                style.variants().iter().map(|variant| EffectId {
                    style: *style,
                    variant: *variant,
                })
            })
            .collect()
    }

    /// 效果优先级
    pub fn priority(&self) -> EffectPriority {
        if self.style == EffectStyle::Desaturate {
            return EffectPriority::BelowNormal;
        }
        match self.variant {
            EffectVariant::Closing => EffectPriority::Highest,
            EffectVariant::Opening => EffectPriority::High,
            EffectVariant::Plain => EffectPriority::AboveNormal,
            EffectVariant::Attention => EffectPriority::Normal,
            EffectVariant::Hover => EffectPriority::Low,
        }
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.variant {
            EffectVariant::Plain => write!(f, "{}", self.style),
            variant => write!(f, "{}-{}", self.style, variant),
        }
    }
}

impl std::str::FromStr for EffectId {
    type Err = EffectsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let unknown = || EffectsError::UnknownEffect {
            name: s.to_string(),
        };

        let (style, variant) = match name.split_once('-') {
            Some((style, variant)) => (style, variant),
            None => (name.as_str(), "plain"),
        };
        let style: EffectStyle = style.parse().map_err(|_| unknown())?;
        let variant: EffectVariant = variant.parse().map_err(|_| unknown())?;
        Self::new(style, variant)
    }
}

impl TryFrom<String> for EffectId {
    type Error = EffectsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EffectId> for String {
    fn from(value: EffectId) -> Self {
        value.to_string()
    }
}

/// 各效果的默认参数
///
/// 这些常量是效果参数的**唯一来源**，效果函数不应硬编码数字。
/// 周期以帧（tick）为单位。
pub mod defaults {
    use std::time::Duration;

    /// 默认帧率（帧/秒）
    pub const FRAME_RATE: u32 = 25;
    /// simple 风格提醒闪烁间隔
    pub const SIMPLE_BLINK_INTERVAL: Duration = Duration::from_millis(750);

    /// 浮点比较容差
    pub const EPSILON: f32 = 1e-4;

    // ── bounce ──
    /// bounce 周期
    pub const BOUNCE_PERIOD: i32 = 16;
    /// bounce 最大偏移 = 参考边长 / 该值
    pub const BOUNCE_OFFSET_DIVISOR: f32 = 1.5;
    /// 悬停 bounce 周期
    pub const BOUNCE_HOVER_PERIOD: i32 = 14;
    /// 悬停 bounce 最大偏移 = 参考边长 / 该值
    pub const BOUNCE_HOVER_OFFSET_DIVISOR: f32 = 3.0;
    /// 展开阶段（裁剪区域逐渐露出）周期
    pub const BOUNCE_OPENING_REVEAL_PERIOD: i32 = 15;
    /// 展开后弹跳阶段周期
    pub const BOUNCE_OPENING_BOUNCE_PERIOD: i32 = 20;
    /// 展开后弹跳最大偏移 = 参考边长 / 该值
    pub const BOUNCE_OPENING_OFFSET_DIVISOR: f32 = 3.0;
    /// 上滑淡出周期
    pub const FADE_OUT_PERIOD: i32 = 20;
    /// 上滑淡出最大偏移（像素）
    pub const FADE_OUT_MAX_OFFSET: f32 = 50.0;

    // ── fade ──
    /// 淡化步长
    pub const FADE_ALPHA_STEP: f32 = 0.05;
    /// 淡化下限
    pub const FADE_MIN_ALPHA: f32 = 0.45;
    /// 回升步长倍数
    pub const FADE_RISE_FACTOR: f32 = 1.5;

    // ── glow ──
    /// 悬停发光衰减步长
    pub const GLOW_STEP: f32 = 0.08;
    /// 展开时起始发光强度
    pub const GLOW_OPENING_START: f32 = 1.95;
    /// 展开时透明度步长
    pub const GLOW_OPENING_ALPHA_STEP: f32 = 0.04;
    /// 展开时发光衰减步长
    pub const GLOW_OPENING_GLOW_STEP: f32 = 0.05;
    /// 收起时起始发光强度
    pub const GLOW_CLOSING_START: f32 = 0.8;
    /// 收起时透明度步长
    pub const GLOW_CLOSING_ALPHA_STEP: f32 = 0.03;
    /// 收起时发光增长步长
    pub const GLOW_CLOSING_GLOW_STEP: f32 = 0.085;
    /// 提醒发光周期
    pub const GLOW_ATTENTION_PERIOD: i32 = 20;
    /// 提醒发光峰值
    pub const GLOW_ATTENTION_MAX: f32 = 1.5;

    // ── zoom ──
    /// 悬停放大步长
    pub const ZOOM_INCREMENT: f32 = 1.0 / 8.0;
    /// 提醒放大步长
    pub const ZOOM_ATTENTION_INCREMENT: f32 = 1.0 / 12.0;
    /// 展开/收起周期（zoom 与 fade 共用）
    pub const OPEN_CLOSE_PERIOD: i32 = 20;

    // ── turn ──
    /// 翻转周期
    pub const TURN_PERIOD: i32 = 36;
    /// 厚度系数：depth = 系数 × (1 - width_mod)
    pub const TURN_DEPTH_FACTOR: f32 = 10.0;
    /// 最小宽度（避免图标闪烁）
    pub const TURN_MIN_WIDTH: f32 = 0.1;

    // ── desaturate ──
    /// 去饱和步长
    pub const DESATURATE_STEP: f32 = 0.04;

    // ── squish ──
    /// 挤压周期
    pub const SQUISH_PERIOD: i32 = 28;
    /// 挤压下限（高度倍数）
    pub const SQUISH_MIN_HEIGHT: f32 = 0.75;
    /// 挤压弹跳最大偏移 = 参考边长 / 该值
    pub const SQUISH_OFFSET_DIVISOR: f32 = 3.2;
    /// 提醒挤压时的额外缩放幅度
    pub const SQUISH_ATTENTION_SCALE: f32 = 1.0 / 8.0;
    /// 展开/收起时弹跳段的周期
    pub const SQUISH_HOP_PERIOD: i32 = 20;

    // ── spotlight ──
    /// 聚光灯淡入/淡出周期
    pub const SPOTLIGHT_PERIOD: i32 = 15;
    /// 颤动周期
    pub const SPOTLIGHT_TREMBLE_PERIOD: i32 = 5;
    /// 颤动幅度
    pub const SPOTLIGHT_TREMBLE_HEIGHT: f32 = 0.4;
    /// 半淡化峰值
    pub const SPOTLIGHT_HALF_FADE_MAX: f32 = 0.75;
    /// 半淡化周期
    pub const SPOTLIGHT_HALF_FADE_PERIOD: i32 = 20;
    /// 展开周期：裁剪区域每帧露出图标高度的 1/该值
    pub const SPOTLIGHT_OPENING_PERIOD: i32 = 20;
    /// 展开时的起始宽度
    pub const SPOTLIGHT_OPENING_START_WIDTH: f32 = 0.5;
    /// 展开时宽度步长倍数
    pub const SPOTLIGHT_OPENING_WIDTH_FACTOR: f32 = 1.5;
    /// 展开后聚光灯熄灭的步长倍数
    pub const SPOTLIGHT_OPENING_FADE_FACTOR: f32 = 3.0;
    /// 收起周期
    pub const SPOTLIGHT_CLOSING_PERIOD: i32 = 40;
    /// 收起前聚光灯亮起的步长倍数
    pub const SPOTLIGHT_CLOSING_ON_FACTOR: f32 = 4.0;
    /// 收起时裁剪、宽度、透明度的步长倍数
    pub const SPOTLIGHT_CLOSING_SHRINK_FACTOR: f32 = 2.0;

    // ── spotlight3d ──
    /// 聚光灯下翻转的周期
    pub const SPOTLIGHT3D_PERIOD: i32 = 44;
    /// 悬停失去栈顶后聚光灯每帧变暗的步长
    pub const SPOTLIGHT3D_FADE_STEP: f32 = 0.04;
    /// 收起周期
    pub const SPOTLIGHT3D_CLOSING_PERIOD: i32 = 80;
    /// 收起时的翻转周期
    pub const SPOTLIGHT3D_CLOSING_TURN_PERIOD: i32 = 20;

    // ── simple ──
    /// 展开/收起周期
    pub const SIMPLE_PERIOD: i32 = 10;
    /// 悬停发光一个周期保持的帧数
    pub const SIMPLE_HOVER_PERIOD: i32 = 10;
}
