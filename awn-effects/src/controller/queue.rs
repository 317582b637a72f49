//! 单个图标的效果队列
//!
//! 队列按排名从高到低排列，排名 = (前台标记, 优先级)；排名相同的条目
//! 保持插入顺序。队首即"栈顶"效果。

use serde::{Deserialize, Serialize};

use crate::anims::LoopCounter;
use crate::registry::{EffectId, EffectPriority};
use crate::state::IconVisualState;

/// 条目阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPhase {
    /// 已入队，尚未开始
    Queued,
    /// 正在接收 tick
    Active,
    /// 运行中途冻结，等待恢复
    Suspended,
}

/// 队列条目
#[derive(Debug, Clone)]
pub struct EffectEntry {
    /// 效果
    pub effect: EffectId,
    /// 循环计数
    pub loops: LoopCounter,
    /// 是否为前台效果
    pub foreground: bool,
    /// 当前阶段
    pub phase: EntryPhase,
    /// 本次运行是否已经初始化
    pub initialized: bool,
    /// 挂起时冻结的视觉状态
    pub snapshot: Option<IconVisualState>,
}

impl EffectEntry {
    /// 创建处于 Queued 阶段的条目
    pub fn new(effect: EffectId, max_loops: u32, foreground: bool) -> Self {
        Self {
            effect,
            loops: LoopCounter::new(max_loops),
            foreground,
            phase: EntryPhase::Queued,
            initialized: false,
            snapshot: None,
        }
    }

    /// 队列排名，越大越靠前
    pub fn rank(&self) -> (bool, EffectPriority) {
        (self.foreground, self.effect.priority())
    }
}

/// 效果队列
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    entries: Vec<EffectEntry>,
}

impl EffectQueue {
    /// 创建空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 按排名插入，返回插入位置
    pub fn insert(&mut self, entry: EffectEntry) -> usize {
        let rank = entry.rank();
        let index = self
            .entries
            .iter()
            .position(|existing| existing.rank() < rank)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        index
    }

    /// 移除指定效果的条目
    pub fn remove(&mut self, effect: EffectId) -> Option<EffectEntry> {
        let index = self.position(effect)?;
        Some(self.entries.remove(index))
    }

    /// 指定效果在队列中的位置
    pub fn position(&self, effect: EffectId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.effect == effect)
    }

    /// 当前 Active 条目的位置
    pub fn active_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.phase == EntryPhase::Active)
    }

    pub fn get(&self, effect: EffectId) -> Option<&EffectEntry> {
        self.entries.iter().find(|entry| entry.effect == effect)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut EffectEntry> {
        self.entries.get_mut(index)
    }

    /// 队首（栈顶）条目
    pub fn top(&self) -> Option<&EffectEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空队列，返回被移除的条目
    pub fn drain(&mut self) -> Vec<EffectEntry> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, foreground: bool) -> EffectEntry {
        EffectEntry::new(name.parse().unwrap(), 1, foreground)
    }

    fn names(queue: &EffectQueue) -> Vec<String> {
        queue.iter().map(|e| e.effect.to_string()).collect()
    }

    #[test]
    fn test_insert_orders_by_priority() {
        let mut queue = EffectQueue::new();
        queue.insert(entry("glow-hover", false));
        queue.insert(entry("bounce", false));
        queue.insert(entry("desaturate", false));
        queue.insert(entry("fade-closing", false));

        assert_eq!(
            names(&queue),
            vec!["fade-closing", "bounce", "desaturate", "glow-hover"]
        );
    }

    #[test]
    fn test_foreground_outranks_priority() {
        let mut queue = EffectQueue::new();
        queue.insert(entry("zoom-closing", false));
        assert_eq!(queue.insert(entry("glow-hover", true)), 0);
        assert_eq!(queue.top().unwrap().effect.to_string(), "glow-hover");
    }

    #[test]
    fn test_equal_rank_keeps_insertion_order() {
        let mut queue = EffectQueue::new();
        queue.insert(entry("bounce", false));
        queue.insert(entry("turn", false));
        queue.insert(entry("squish", false));
        assert_eq!(names(&queue), vec!["bounce", "turn", "squish"]);
    }

    #[test]
    fn test_equal_rank_lands_after_existing_peers() {
        let mut queue = EffectQueue::new();
        queue.insert(entry("fade-closing", false));
        queue.insert(entry("bounce", false));
        queue.insert(entry("glow-hover", false));

        assert_eq!(queue.insert(entry("turn", false)), 2);
        assert_eq!(
            names(&queue),
            vec!["fade-closing", "bounce", "turn", "glow-hover"]
        );
    }

    #[test]
    fn test_remove_and_position() {
        let mut queue = EffectQueue::new();
        queue.insert(entry("bounce", false));
        queue.insert(entry("glow-hover", false));

        let bounce = "bounce".parse().unwrap();
        assert_eq!(queue.position(bounce), Some(0));
        assert!(queue.remove(bounce).is_some());
        assert!(queue.remove(bounce).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.active_index().is_none());
    }
}
