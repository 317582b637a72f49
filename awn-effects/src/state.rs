//! # State 模块
//!
//! 单个图标的可变视觉状态。
//!
//! ## 设计原则
//!
//! - 每个图标独占一份 [`IconVisualState`]，随图标创建、随图标销毁
//! - 同一时刻只有一个效果函数写入它（由控制器保证）
//! - 宿主只读取计算结果（偏移、缩放、透明度、裁剪、深度、翻转）来绘制

use serde::{Deserialize, Serialize};

/// 图标唯一标识符
///
/// 由 `EffectEngine` 在图标注册时分配，保证不重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IconId(pub u64);

impl IconId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IconId({})", self.0)
    }
}

/// 面板朝向
///
/// 决定 zoom 类效果的放大上限取容器宽度还是高度，以及 bounce 的参考边长。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Orientation {
    /// 是否为竖向面板（左/右）
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("未知朝向 '{other}'")),
        }
    }
}

/// 效果方向 / 子阶段
///
/// 通用的往返方向标记，被多个效果复用。squish 与 spotlight 需要更多的
/// 具名子阶段，也放在这里。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    SquishDown,
    SquishDown2,
    SquishUp,
    SquishUp2,
    SpotlightOn,
    SpotlightTrembleUp,
    SpotlightTrembleDown,
    SpotlightOff,
}

/// 裁剪矩形（图标坐标系，像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClipRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// 图标视觉状态
///
/// 每帧由当前效果函数写入，宿主据此绘制。字段的中性值见
/// [`reset_animation`](IconVisualState::reset_animation)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconVisualState {
    /// 垂直方向偏移（像素，正值远离面板）
    pub top_offset: f32,
    /// 水平方向偏移（像素）
    pub side_offset: f32,
    /// 宽度缩放倍数
    pub width_mod: f32,
    /// 高度缩放倍数
    pub height_mod: f32,
    /// 不透明度（0.0 - 1.0）
    pub alpha: f32,
    /// 发光强度
    pub glow_amount: f32,
    /// 饱和度（0.0 - 1.0）
    pub saturation: f32,
    /// 聚光灯不透明度
    pub spotlight_alpha: f32,
    /// 是否绘制聚光灯
    pub spotlight: bool,
    /// simple 风格提醒时绘制的高亮矩形
    pub highlight: bool,
    /// 裁剪区域（用于展开/收起类效果）
    pub clip: Option<ClipRegion>,
    /// 伪 3D 厚度
    pub icon_depth: f32,
    /// 厚度绘制方向（0 / 1）
    pub depth_direction: i8,
    /// 水平镜像绘制
    pub flip: bool,
    /// 方向 / 子阶段标记
    pub direction: Direction,
    /// 帧计数
    pub count: i32,
    /// 图标固有宽度（宿主输入）
    pub icon_width: u32,
    /// 图标固有高度（宿主输入）
    pub icon_height: u32,
}

impl Default for IconVisualState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl IconVisualState {
    /// 创建处于中性状态的视觉状态
    pub fn new(icon_width: u32, icon_height: u32) -> Self {
        Self {
            top_offset: 0.0,
            side_offset: 0.0,
            width_mod: 1.0,
            height_mod: 1.0,
            alpha: 1.0,
            glow_amount: 0.0,
            saturation: 1.0,
            spotlight_alpha: 0.0,
            spotlight: false,
            highlight: false,
            clip: None,
            icon_depth: 0.0,
            depth_direction: 0,
            flip: false,
            direction: Direction::None,
            count: 0,
            icon_width,
            icon_height,
        }
    }

    /// 把所有动画字段恢复为中性值，保留图标尺寸
    pub fn reset_animation(&mut self) {
        *self = Self::new(self.icon_width, self.icon_height);
    }

    /// 所有动画字段是否处于中性值
    pub fn is_neutral(&self) -> bool {
        *self == Self::new(self.icon_width, self.icon_height)
    }

    /// 设置图标固有尺寸
    pub fn set_icon_size(&mut self, width: u32, height: u32) {
        self.icon_width = width;
        self.icon_height = height;
    }

    /// bounce 类效果的参考边长
    ///
    /// 横向面板取图标高度，竖向面板取图标宽度。
    pub fn bounce_extent(&self, orientation: Orientation) -> f32 {
        if orientation.is_vertical() {
            self.icon_width as f32
        } else {
            self.icon_height as f32
        }
    }

    /// 从挂起时的快照恢复动画字段，保留当前图标尺寸
    pub(crate) fn restore_from(&mut self, snapshot: &IconVisualState) {
        let (width, height) = (self.icon_width, self.icon_height);
        *self = snapshot.clone();
        self.icon_width = width;
        self.icon_height = height;
    }
}
