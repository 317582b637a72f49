//! # Engine 模块
//!
//! 多图标门面与宿主接缝。
//!
//! ## 职责划分
//!
//! - [`IconHost`]：宿主提供图标尺寸、容器尺寸、面板朝向，接收重绘请求与生命周期通知
//! - [`TickSource`]：宿主的帧时钟，引擎只告诉它"哪个图标需要以什么间隔 tick"
//! - [`EffectEngine`]：为每个图标持有一个 [`IconEffects`]，把宿主调用转发给它，
//!   并在每次调用后同步时钟注册、分发事件
//!
//! 宿主的回调只拿到宿主自己的 `&mut self`，无法在回调里再次调用引擎。
//!
//! ```rust,ignore
//! let mut engine = EffectEngine::new(host, ManualTicks::new(), EffectSettings::default());
//! let icon = engine.add_icon();
//! engine.start_named(icon, "bounce", 1, true)?;
//! while engine.tick(icon)?.is_some() {}
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::anims::StepOutcome;
use crate::config::EffectSettings;
use crate::controller::{EffectEvent, EntryPhase, IconEffects};
use crate::error::{EffectsError, EffectsResult};
use crate::registry::{EffectId, EffectVariant};
use crate::state::{IconId, IconVisualState, Orientation};

/// 宿主接口
pub trait IconHost {
    /// 按当前视觉状态重绘图标
    fn request_redraw(&mut self, icon: IconId, state: &IconVisualState);

    /// 图标固有尺寸（宽，高）
    fn icon_size(&self, icon: IconId) -> (u32, u32);

    /// 面板容器尺寸（宽，高）
    fn container_extent(&self, icon: IconId) -> (u32, u32);

    /// 面板朝向
    fn orientation(&self, icon: IconId) -> Orientation;

    /// 效果开始
    fn on_effect_started(&mut self, _icon: IconId, _effect: EffectId) {}

    /// 效果结束
    fn on_effect_ended(&mut self, _icon: IconId, _effect: EffectId) {}
}

/// 帧时钟接口
pub trait TickSource {
    /// 以给定间隔为图标安排 tick；已注册时更新间隔
    fn register(&mut self, icon: IconId, interval: Duration);

    /// 停止为图标安排 tick
    fn unregister(&mut self, icon: IconId);
}

/// 手动驱动的时钟
///
/// 只记录注册情况，tick 由调用方显式调用 [`EffectEngine::tick`]。
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    registered: BTreeMap<IconId, Duration>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 图标的 tick 间隔，未注册时为 `None`
    pub fn interval(&self, icon: IconId) -> Option<Duration> {
        self.registered.get(&icon).copied()
    }

    pub fn is_registered(&self, icon: IconId) -> bool {
        self.registered.contains_key(&icon)
    }

    /// 所有已注册的图标
    pub fn registered(&self) -> impl Iterator<Item = IconId> + '_ {
        self.registered.keys().copied()
    }
}

impl TickSource for ManualTicks {
    fn register(&mut self, icon: IconId, interval: Duration) {
        self.registered.insert(icon, interval);
    }

    fn unregister(&mut self, icon: IconId) {
        self.registered.remove(&icon);
    }
}

/// 效果引擎
pub struct EffectEngine<H: IconHost, T: TickSource> {
    host: H,
    ticks: T,
    settings: EffectSettings,
    icons: BTreeMap<IconId, IconEffects>,
    /// 已向时钟注册的间隔
    intervals: HashMap<IconId, Duration>,
    next_icon_id: u64,
}

impl<H: IconHost, T: TickSource> std::fmt::Debug for EffectEngine<H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectEngine")
            .field("icons", &self.icons.len())
            .field("ticking", &self.intervals.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<H: IconHost, T: TickSource> EffectEngine<H, T> {
    /// 创建引擎
    ///
    /// 配置校验失败时记录警告并改用默认配置。
    pub fn new(host: H, ticks: T, settings: EffectSettings) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!(error = %e, "效果配置无效，使用默认配置");
                EffectSettings::default()
            }
        };
        Self {
            host,
            ticks,
            settings,
            icons: BTreeMap::new(),
            intervals: HashMap::new(),
            next_icon_id: 1,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    // ========== 图标管理 ==========

    /// 注册图标，返回引擎分配的 ID
    pub fn add_icon(&mut self) -> IconId {
        let icon = IconId(self.next_icon_id);
        self.next_icon_id += 1;

        let (width, height) = self.host.icon_size(icon);
        self.icons.insert(icon, IconEffects::new(width, height));
        debug!(icon = %icon, width, height, "注册图标");
        icon
    }

    /// 注销图标
    ///
    /// 队列中已开始的效果会收到结束通知。
    pub fn remove_icon(&mut self, icon: IconId) -> EffectsResult<()> {
        let mut effects = self
            .icons
            .remove(&icon)
            .ok_or(EffectsError::IconNotFound { icon })?;
        effects.clear();
        for event in effects.take_events() {
            if let EffectEvent::Ended(effect) = event {
                self.host.on_effect_ended(icon, effect);
            }
        }
        if self.intervals.remove(&icon).is_some() {
            self.ticks.unregister(icon);
        }
        debug!(icon = %icon, "注销图标");
        Ok(())
    }

    /// 所有已注册的图标
    pub fn icons(&self) -> impl Iterator<Item = IconId> + '_ {
        self.icons.keys().copied()
    }

    // ========== 效果控制 ==========

    /// 请求效果，返回是否新入队（同名效果已在队列中时为 `false`）
    pub fn start(
        &mut self,
        icon: IconId,
        effect: EffectId,
        max_loops: u32,
        foreground: bool,
    ) -> EffectsResult<bool> {
        self.ensure_registered(icon)?;
        let (width, height) = self.host.icon_size(icon);
        let effects = self.effects_mut(icon)?;
        effects.set_icon_size(width, height);
        let queued = effects.start(effect, max_loops, foreground);
        self.dispatch(icon);
        Ok(queued)
    }

    /// 按名字请求效果
    pub fn start_named(
        &mut self,
        icon: IconId,
        name: &str,
        max_loops: u32,
        foreground: bool,
    ) -> EffectsResult<bool> {
        let effect: EffectId = name.parse()?;
        self.start(icon, effect, max_loops, foreground)
    }

    /// 按触发场景请求效果
    ///
    /// 风格取自配置，返回实际播放的效果。
    pub fn start_event(
        &mut self,
        icon: IconId,
        variant: EffectVariant,
        max_loops: u32,
        foreground: bool,
    ) -> EffectsResult<EffectId> {
        let effect = self.settings.effect_for(variant);
        self.start(icon, effect, max_loops, foreground)?;
        Ok(effect)
    }

    /// 停止效果，返回它是否在队列中
    pub fn stop(&mut self, icon: IconId, effect: EffectId) -> EffectsResult<bool> {
        let removed = self.effects_mut(icon)?.stop(effect);
        self.dispatch(icon);
        Ok(removed)
    }

    /// 按名字停止效果
    pub fn stop_named(&mut self, icon: IconId, name: &str) -> EffectsResult<bool> {
        let effect: EffectId = name.parse()?;
        self.stop(icon, effect)
    }

    /// 推进图标一帧
    ///
    /// 有效果步进时发出一次重绘请求并返回步进结果；队列为空时返回 `None`。
    pub fn tick(&mut self, icon: IconId) -> EffectsResult<Option<StepOutcome>> {
        self.ensure_registered(icon)?;
        let (width, height) = self.host.icon_size(icon);
        let container = self.host.container_extent(icon);
        let orientation = self.host.orientation(icon);

        let effects = self
            .icons
            .get_mut(&icon)
            .ok_or(EffectsError::IconNotFound { icon })?;
        effects.set_icon_size(width, height);
        let outcome = effects.tick(container, orientation);

        if let Some(outcome) = outcome {
            trace!(icon = %icon, ?outcome, "tick");
            self.host.request_redraw(icon, effects.state());
        }
        self.dispatch(icon);
        Ok(outcome)
    }

    // ========== 查询 ==========

    /// 效果是否在图标的队列中；未注册的图标返回 `false`
    pub fn is_active(&self, icon: IconId, effect: EffectId) -> bool {
        self.icons
            .get(&icon)
            .is_some_and(|effects| effects.is_active(effect))
    }

    pub fn state(&self, icon: IconId) -> Option<&IconVisualState> {
        self.icons.get(&icon).map(|effects| effects.state())
    }

    pub fn active_effect(&self, icon: IconId) -> Option<EffectId> {
        self.icons.get(&icon).and_then(|effects| effects.active_effect())
    }

    pub fn phase(&self, icon: IconId, effect: EffectId) -> Option<EntryPhase> {
        self.icons.get(&icon).and_then(|effects| effects.phase(effect))
    }

    pub fn queue_len(&self, icon: IconId) -> usize {
        self.icons.get(&icon).map_or(0, |effects| effects.len())
    }

    // ========== 内部 ==========

    /// 未注册的图标不向宿主查询
    fn ensure_registered(&self, icon: IconId) -> EffectsResult<()> {
        if self.icons.contains_key(&icon) {
            Ok(())
        } else {
            Err(EffectsError::IconNotFound { icon })
        }
    }

    fn effects_mut(&mut self, icon: IconId) -> EffectsResult<&mut IconEffects> {
        self.icons
            .get_mut(&icon)
            .ok_or(EffectsError::IconNotFound { icon })
    }

    /// 分发控制器事件并同步时钟注册
    fn dispatch(&mut self, icon: IconId) {
        let Some(effects) = self.icons.get_mut(&icon) else {
            return;
        };
        let events = effects.take_events();
        let wanted = effects
            .active_effect()
            .or_else(|| effects.queue().top().map(|entry| entry.effect))
            .map(|effect| effect.tick_interval(&self.settings));

        for event in events {
            match event {
                EffectEvent::Started(effect) => self.host.on_effect_started(icon, effect),
                EffectEvent::Ended(effect) => self.host.on_effect_ended(icon, effect),
                EffectEvent::Suspended(effect) | EffectEvent::Resumed(effect) => {
                    trace!(icon = %icon, effect = %effect, ?event, "效果阶段变化");
                }
            }
        }

        match wanted {
            Some(interval) if self.intervals.get(&icon) != Some(&interval) => {
                self.ticks.register(icon, interval);
                self.intervals.insert(icon, interval);
            }
            Some(_) => {}
            None => {
                if self.intervals.remove(&icon).is_some() {
                    self.ticks.unregister(icon);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Default)]
    struct StubHost {
        queried: RefCell<Vec<IconId>>,
        redraws: usize,
        started: Vec<EffectId>,
        ended: Vec<EffectId>,
    }

    impl IconHost for StubHost {
        fn request_redraw(&mut self, _icon: IconId, _state: &IconVisualState) {
            self.redraws += 1;
        }

        fn icon_size(&self, icon: IconId) -> (u32, u32) {
            self.queried.borrow_mut().push(icon);
            (48, 48)
        }

        fn container_extent(&self, icon: IconId) -> (u32, u32) {
            self.queried.borrow_mut().push(icon);
            (144, 96)
        }

        fn orientation(&self, icon: IconId) -> Orientation {
            self.queried.borrow_mut().push(icon);
            Orientation::Bottom
        }

        fn on_effect_started(&mut self, _icon: IconId, effect: EffectId) {
            self.started.push(effect);
        }

        fn on_effect_ended(&mut self, _icon: IconId, effect: EffectId) {
            self.ended.push(effect);
        }
    }

    fn engine() -> EffectEngine<StubHost, ManualTicks> {
        EffectEngine::new(
            StubHost::default(),
            ManualTicks::new(),
            EffectSettings::default(),
        )
    }

    #[test]
    fn test_icon_ids_are_unique() {
        let mut engine = engine();
        let a = engine.add_icon();
        let b = engine.add_icon();
        assert_ne!(a, b);
        assert_eq!(engine.icons().count(), 2);
        assert_eq!(engine.state(a).map(|s| s.icon_width), Some(48));
    }

    #[test]
    fn test_unknown_icon_is_an_error() {
        let mut engine = engine();
        let ghost = IconId(99);
        assert_eq!(
            engine.start_named(ghost, "bounce", 1, true),
            Err(EffectsError::IconNotFound { icon: ghost })
        );
        assert!(engine.tick(ghost).is_err());
        assert!(!engine.is_active(ghost, "bounce".parse().unwrap()));
        assert_eq!(engine.queue_len(ghost), 0);
    }

    #[test]
    fn test_unknown_icon_never_reaches_host() {
        let mut engine = engine();
        let icon = engine.add_icon();
        let ghost = IconId(99);

        assert!(engine.start_named(ghost, "bounce", 1, true).is_err());
        assert!(engine.tick(ghost).is_err());
        assert!(!engine.host().queried.borrow().contains(&ghost));

        engine.start_named(icon, "bounce", 1, true).unwrap();
        engine.tick(icon).unwrap();
        assert!(engine.host().queried.borrow().iter().all(|id| *id == icon));
    }

    #[test]
    fn test_invalid_settings_fall_back_to_default() {
        let settings = EffectSettings {
            frame_rate: 5000,
            ..EffectSettings::default()
        };
        let mut engine = EffectEngine::new(StubHost::default(), ManualTicks::new(), settings);
        assert_eq!(engine.settings(), &EffectSettings::default());

        let icon = engine.add_icon();
        engine.start_named(icon, "bounce", 0, false).unwrap();
        assert_eq!(engine.ticks().interval(icon), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let mut engine = engine();
        let icon = engine.add_icon();
        assert!(matches!(
            engine.start_named(icon, "wobble", 1, true),
            Err(EffectsError::UnknownEffect { .. })
        ));
        assert_eq!(engine.queue_len(icon), 0);
    }

    #[test]
    fn test_tick_registration_follows_queue() {
        let mut engine = engine();
        let icon = engine.add_icon();
        assert!(!engine.ticks().is_registered(icon));

        engine.start_named(icon, "bounce", 0, false).unwrap();
        assert_eq!(engine.ticks().interval(icon), Some(Duration::from_millis(40)));

        engine.stop_named(icon, "bounce").unwrap();
        assert!(!engine.ticks().is_registered(icon));
    }

    #[test]
    fn test_blink_uses_its_own_interval() {
        let mut engine = engine();
        let icon = engine.add_icon();
        engine.start_named(icon, "simple-attention", 0, false).unwrap();
        assert_eq!(
            engine.ticks().interval(icon),
            Some(Duration::from_millis(750))
        );

        // 更高优先级的效果接管后，间隔切换
        engine.start_named(icon, "bounce", 1, false).unwrap();
        engine.tick(icon).unwrap();
        engine.tick(icon).unwrap();
        assert_eq!(engine.active_effect(icon), Some("bounce".parse().unwrap()));
        assert_eq!(engine.ticks().interval(icon), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_start_event_uses_configured_style() {
        let mut engine = engine();
        let icon = engine.add_icon();
        let effect = engine
            .start_event(icon, EffectVariant::Hover, 0, false)
            .unwrap();
        assert_eq!(effect.to_string(), "bounce-hover");
        assert!(engine.is_active(icon, effect));
    }

    #[test]
    fn test_remove_icon_ends_running_effects() {
        let mut engine = engine();
        let icon = engine.add_icon();
        engine.start_named(icon, "glow-hover", 0, false).unwrap();
        engine.tick(icon).unwrap();

        engine.remove_icon(icon).unwrap();
        assert_eq!(engine.host().ended, vec!["glow-hover".parse().unwrap()]);
        assert!(!engine.ticks().is_registered(icon));
        assert!(engine.remove_icon(icon).is_err());
    }
}
