//! # Controller 模块
//!
//! 单个图标的效果队列与状态机。
//!
//! ## 状态机
//!
//! ```text
//! Queued ──promote──▶ Active ──Suspend──▶ Suspended
//!                       │  ▲                  │
//!                       │  └─────promote──────┘
//!                       │
//!                       └──Stop / stop()──▶ Finished（出队，状态复位）
//! ```
//!
//! - 同一时刻最多一个条目处于 Active
//! - 更高排名的效果入队后，当前效果在自己的安全点返回 `Suspend` 让位
//! - Active 条目结束或被挂起后，立即提升队首条目：未初始化的先 `init`，
//!   已挂起的从快照恢复
//! - 生命周期事件积累在内部，由调用方通过 [`IconEffects::take_events`] 取走

mod queue;

pub use queue::{EffectEntry, EffectQueue, EntryPhase};

use tracing::{debug, warn};

use crate::anims::{StepContext, StepOutcome};
use crate::error::{EffectsError, EffectsResult};
use crate::registry::EffectId;
use crate::state::{IconVisualState, Orientation};

/// 控制器事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// 效果第一次获得 tick（初始化之后）
    Started(EffectId),
    /// 效果冻结
    Suspended(EffectId),
    /// 效果从冻结处继续
    Resumed(EffectId),
    /// 效果结束（自然结束或被 stop），只对已开始的效果发出
    Ended(EffectId),
}

/// 单个图标的效果控制器
#[derive(Debug, Clone)]
pub struct IconEffects {
    state: IconVisualState,
    queue: EffectQueue,
    events: Vec<EffectEvent>,
}

impl IconEffects {
    /// 创建控制器
    pub fn new(icon_width: u32, icon_height: u32) -> Self {
        Self {
            state: IconVisualState::new(icon_width, icon_height),
            queue: EffectQueue::new(),
            events: Vec::new(),
        }
    }

    // ========== 查询 ==========

    /// 当前视觉状态
    pub fn state(&self) -> &IconVisualState {
        &self.state
    }

    /// 宿主更新图标尺寸时使用
    pub fn set_icon_size(&mut self, width: u32, height: u32) {
        self.state.set_icon_size(width, height);
    }

    pub fn queue(&self) -> &EffectQueue {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 效果是否在队列中（任何阶段）
    pub fn is_active(&self, effect: EffectId) -> bool {
        self.queue.position(effect).is_some()
    }

    /// 效果所处阶段
    pub fn phase(&self, effect: EffectId) -> Option<EntryPhase> {
        self.queue.get(effect).map(|entry| entry.phase)
    }

    /// 正在接收 tick 的效果
    pub fn active_effect(&self) -> Option<EffectId> {
        self.queue
            .active_index()
            .and_then(|index| self.queue.iter().nth(index))
            .map(|entry| entry.effect)
    }

    /// 效果是否为队首（栈顶）
    pub fn check_top_effect(&self, effect: EffectId) -> bool {
        self.queue.top().is_some_and(|entry| entry.effect == effect)
    }

    /// 取走积累的事件
    pub fn take_events(&mut self) -> Vec<EffectEvent> {
        std::mem::take(&mut self.events)
    }

    // ========== 控制 ==========

    /// 请求一个效果
    ///
    /// 同名效果已在队列中时不做任何事并返回 `false`。没有 Active 条目时
    /// 新效果立即被提升；否则只入队，由当前效果在安全点让位。
    pub fn start(&mut self, effect: EffectId, max_loops: u32, foreground: bool) -> bool {
        if self.is_active(effect) {
            debug!(effect = %effect, "效果已在队列中，忽略重复请求");
            return false;
        }

        let index = self
            .queue
            .insert(EffectEntry::new(effect, max_loops, foreground));
        debug!(effect = %effect, max_loops, foreground, index, "效果入队");

        if self.queue.active_index().is_none() {
            self.promote();
        }
        true
    }

    /// 移除一个效果
    ///
    /// 被移除的是 Active 条目时复位状态并提升下一个条目。返回效果是否在队列中。
    pub fn stop(&mut self, effect: EffectId) -> bool {
        let Some(index) = self.queue.position(effect) else {
            return false;
        };
        let was_active = self.queue.active_index() == Some(index);
        self.remove_at(effect, was_active);
        true
    }

    /// 清空队列并复位状态
    pub fn clear(&mut self) {
        for entry in self.queue.drain() {
            if entry.initialized {
                self.events.push(EffectEvent::Ended(entry.effect));
            }
        }
        self.state.reset_animation();
    }

    /// 推进一帧
    ///
    /// 没有 Active 条目时先尝试提升队首；队列为空时返回 `None`。
    pub fn tick(&mut self, container: (u32, u32), orientation: Orientation) -> Option<StepOutcome> {
        if self.queue.active_index().is_none() {
            self.promote();
        }
        let index = self.queue.active_index()?;
        let higher_queued = index > 0;

        let entry = self.queue.entry_mut(index)?;
        let effect = entry.effect;
        let mut ctx = StepContext::new(&mut entry.loops, higher_queued, container, orientation);
        let outcome = effect.step(&mut self.state, &mut ctx);

        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Suspend => {
                self.suspend();
                self.promote();
            }
            StepOutcome::Stop => {
                debug!(effect = %effect, "效果运行结束");
                self.remove_at(effect, true);
            }
        }
        Some(outcome)
    }

    /// 循环计数
    ///
    /// 给 Active 条目记一个完成的周期；循环用尽时结束该条目并返回 `false`。
    /// 没有 Active 条目时返回 `false`。
    pub fn handle_repeating(&mut self) -> bool {
        let Some(index) = self.queue.active_index() else {
            return false;
        };
        let Some(entry) = self.queue.entry_mut(index) else {
            return false;
        };
        if entry.loops.record_cycle() {
            return true;
        }
        let effect = entry.effect;
        self.remove_at(effect, true);
        false
    }

    /// 冻结 Active 条目
    ///
    /// 保存视觉状态快照，保留初始化标记，不复位状态。下一次 tick 时提升
    /// 队首条目；若队首就是刚挂起的条目，它会立即恢复。
    pub fn suspend(&mut self) -> Option<EffectId> {
        let index = self.queue.active_index()?;
        let snapshot = self.state.clone();
        let entry = self.queue.entry_mut(index)?;
        entry.phase = EntryPhase::Suspended;
        entry.snapshot = Some(snapshot);
        let effect = entry.effect;

        debug!(effect = %effect, "效果挂起");
        self.events.push(EffectEvent::Suspended(effect));
        Some(effect)
    }

    /// 恢复一个挂起的效果
    ///
    /// 另一个效果正在运行时返回 [`EffectsError::InvalidTransition`]。
    pub fn resume(&mut self, effect: EffectId) -> EffectsResult<()> {
        let index = match self.queue.position(effect) {
            Some(index) if self.phase(effect) == Some(EntryPhase::Suspended) => index,
            _ => return Err(EffectsError::ResumeWithoutSuspend { effect }),
        };

        if let Some(active) = self.active_effect() {
            return Err(EffectsError::InvalidTransition {
                effect,
                message: format!("效果 '{active}' 正在运行"),
            });
        }

        self.activate(index);
        Ok(())
    }

    // ========== 内部 ==========

    /// 没有 Active 条目时提升队首
    fn promote(&mut self) {
        if self.queue.active_index().is_some() || self.queue.is_empty() {
            return;
        }
        self.activate(0);
    }

    /// 把指定位置的条目设为 Active
    fn activate(&mut self, index: usize) {
        let Some(entry) = self.queue.entry_mut(index) else {
            warn!(index, "提升了不存在的队列位置");
            return;
        };
        let effect = entry.effect;

        match entry.phase {
            EntryPhase::Active => {}
            EntryPhase::Queued => {
                entry.phase = EntryPhase::Active;
                if !entry.initialized {
                    entry.initialized = true;
                    effect.init(&mut self.state);
                    debug!(effect = %effect, "效果开始");
                    self.events.push(EffectEvent::Started(effect));
                }
            }
            EntryPhase::Suspended => {
                entry.phase = EntryPhase::Active;
                match entry.snapshot.take() {
                    Some(snapshot) => self.state.restore_from(&snapshot),
                    None => warn!(effect = %effect, "挂起的效果没有快照，从当前状态继续"),
                }
                debug!(effect = %effect, "效果恢复");
                self.events.push(EffectEvent::Resumed(effect));
            }
        }
    }

    /// 移除条目；`was_active` 时复位状态并提升下一个条目
    fn remove_at(&mut self, effect: EffectId, was_active: bool) {
        let Some(entry) = self.queue.remove(effect) else {
            return;
        };
        if entry.initialized {
            self.events.push(EffectEvent::Ended(effect));
        }
        if was_active {
            self.state.reset_animation();
            self.promote();
        }
    }
}
