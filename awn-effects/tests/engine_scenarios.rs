//! # 引擎场景集成测试
//!
//! 通过 EffectEngine 的公开接口驱动完整的效果生命周期，
//! 用记录型宿主检查重绘次数、回调和队列状态。

use awn_effects::{
    EffectEngine, EffectId, EffectSettings, EntryPhase, IconHost, IconId, IconVisualState,
    ManualTicks, Orientation, StepOutcome,
};

/// 记录所有回调的宿主
#[derive(Debug, Default)]
struct RecordingHost {
    frames: Vec<IconVisualState>,
    started: Vec<EffectId>,
    ended: Vec<EffectId>,
}

impl IconHost for RecordingHost {
    fn request_redraw(&mut self, _icon: IconId, state: &IconVisualState) {
        self.frames.push(state.clone());
    }

    fn icon_size(&self, _icon: IconId) -> (u32, u32) {
        (48, 48)
    }

    fn container_extent(&self, _icon: IconId) -> (u32, u32) {
        (48 * 3, 48 + 48 / 2)
    }

    fn orientation(&self, _icon: IconId) -> Orientation {
        Orientation::Bottom
    }

    fn on_effect_started(&mut self, _icon: IconId, effect: EffectId) {
        self.started.push(effect);
    }

    fn on_effect_ended(&mut self, _icon: IconId, effect: EffectId) {
        self.ended.push(effect);
    }
}

type Engine = EffectEngine<RecordingHost, ManualTicks>;

fn setup() -> (Engine, IconId) {
    let mut engine = EffectEngine::new(
        RecordingHost::default(),
        ManualTicks::new(),
        EffectSettings::default(),
    );
    let icon = engine.add_icon();
    (engine, icon)
}

fn id(name: &str) -> EffectId {
    name.parse().unwrap()
}

/// tick 直到队列为空，返回 tick 次数
fn drain(engine: &mut Engine, icon: IconId, limit: usize) -> usize {
    for n in 1..=limit {
        engine.tick(icon).unwrap();
        if engine.queue_len(icon) == 0 {
            return n;
        }
    }
    panic!("队列在 {limit} 帧内没有清空");
}

#[test]
fn test_single_bounce_on_bottom_panel() {
    let (mut engine, icon) = setup();
    assert!(engine.start_named(icon, "bounce", 1, true).unwrap());

    let ticks = drain(&mut engine, icon, 100);
    assert_eq!(ticks, 16);

    let host = engine.host();
    assert_eq!(host.frames.len(), 16);
    // sin(8π/16) · 48/1.5 = 32
    assert!((host.frames[7].top_offset - 32.0).abs() < 1e-3);
    assert_eq!(host.frames[15].top_offset, 0.0);
    assert_eq!(host.started, vec![id("bounce")]);
    assert_eq!(host.ended, vec![id("bounce")]);
    assert!(engine.state(icon).unwrap().is_neutral());
    assert!(!engine.ticks().is_registered(icon));
}

#[test]
fn test_duplicate_start_is_ignored() {
    let (mut engine, icon) = setup();
    assert!(engine.start_named(icon, "glow-hover", 0, false).unwrap());
    engine.tick(icon).unwrap();
    engine.tick(icon).unwrap();
    let glow = engine.state(icon).unwrap().glow_amount;

    assert!(!engine.start_named(icon, "glow-hover", 0, false).unwrap());
    assert_eq!(engine.queue_len(icon), 1);
    assert_eq!(engine.host().started.len(), 1);
    assert_eq!(engine.state(icon).unwrap().glow_amount, glow);
}

#[test]
fn test_glow_survives_higher_priority_bounce() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "glow-hover", 0, false).unwrap();
    for _ in 0..5 {
        engine.tick(icon).unwrap();
    }

    engine.start_named(icon, "bounce", 1, false).unwrap();
    assert_eq!(engine.tick(icon).unwrap(), Some(StepOutcome::Suspend));
    let before = engine.state(icon).unwrap().glow_amount;
    assert_eq!(engine.phase(icon, id("glow-hover")), Some(EntryPhase::Suspended));
    assert_eq!(engine.active_effect(icon), Some(id("bounce")));

    for _ in 0..16 {
        engine.tick(icon).unwrap();
    }
    // bounce 结束，glow-hover 从冻结处恢复
    assert_eq!(engine.active_effect(icon), Some(id("glow-hover")));
    let after = engine.state(icon).unwrap().glow_amount;
    assert_eq!(before, after);
    assert_eq!(after, 1.0);

    engine.tick(icon).unwrap();
    assert!(engine.state(icon).unwrap().glow_amount < after);
    assert_eq!(engine.host().ended, vec![id("bounce")]);
}

#[test]
fn test_loop_accounting() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "bounce", 3, true).unwrap();

    for _ in 0..(3 * 16 - 1) {
        engine.tick(icon).unwrap();
    }
    assert!(engine.host().ended.is_empty());
    assert_eq!(engine.queue_len(icon), 1);

    assert_eq!(engine.tick(icon).unwrap(), Some(StepOutcome::Stop));
    assert_eq!(engine.host().ended, vec![id("bounce")]);
    assert_eq!(engine.queue_len(icon), 0);
}

#[test]
fn test_infinite_loops_only_end_on_stop() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "bounce", 0, true).unwrap();
    for _ in 0..16 * 20 {
        assert_ne!(engine.tick(icon).unwrap(), Some(StepOutcome::Stop));
    }
    assert!(engine.host().ended.is_empty());

    assert!(engine.stop_named(icon, "bounce").unwrap());
    assert_eq!(engine.host().ended, vec![id("bounce")]);
    assert!(engine.state(icon).unwrap().is_neutral());
    assert_eq!(engine.tick(icon).unwrap(), None);
}

#[test]
fn test_stop_higher_effect_resumes_lower() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "desaturate", 0, false).unwrap();
    for _ in 0..4 {
        engine.tick(icon).unwrap();
    }

    engine.start_named(icon, "zoom-opening", 0, false).unwrap();
    assert_eq!(engine.tick(icon).unwrap(), Some(StepOutcome::Suspend));
    let frozen = engine.state(icon).unwrap().saturation;
    assert!(frozen < 1.0);

    engine.tick(icon).unwrap();
    assert_eq!(engine.active_effect(icon), Some(id("zoom-opening")));

    engine.stop_named(icon, "zoom-opening").unwrap();
    assert_eq!(engine.active_effect(icon), Some(id("desaturate")));
    assert_eq!(engine.state(icon).unwrap().saturation, frozen);
    assert_eq!(engine.state(icon).unwrap().width_mod, 1.0);
}

#[test]
fn test_fade_hover_infinite_yields_at_ceiling() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "fade-hover", 0, false).unwrap();
    engine.tick(icon).unwrap();
    engine.start_named(icon, "bounce", 1, false).unwrap();

    let mut ticks = 1;
    loop {
        ticks += 1;
        if engine.tick(icon).unwrap() == Some(StepOutcome::Suspend) {
            break;
        }
        assert!(ticks < 100);
    }
    assert_eq!(engine.state(icon).unwrap().alpha, 1.0);
    assert_eq!(engine.active_effect(icon), Some(id("bounce")));
}

#[test]
fn test_fade_hover_finite_never_yields() {
    let (mut engine, icon) = setup();
    engine.start_named(icon, "fade-hover", 2, false).unwrap();
    engine.tick(icon).unwrap();
    engine.start_named(icon, "bounce", 1, false).unwrap();

    // 两个完整周期后才结束，期间从不挂起
    loop {
        let outcome = engine.tick(icon).unwrap();
        assert_ne!(outcome, Some(StepOutcome::Suspend));
        if outcome == Some(StepOutcome::Stop) {
            break;
        }
    }
    assert_eq!(engine.host().ended, vec![id("fade-hover")]);
    assert_eq!(engine.active_effect(icon), Some(id("bounce")));
}

#[test]
fn test_icons_are_independent() {
    let (mut engine, a) = setup();
    let b = engine.add_icon();

    engine.start_named(a, "turn", 1, true).unwrap();
    engine.start_named(b, "zoom-hover", 0, false).unwrap();
    engine.tick(a).unwrap();

    assert_eq!(engine.state(b).unwrap().width_mod, 1.0);
    assert!(engine.is_active(a, id("turn")));
    assert!(!engine.is_active(a, id("zoom-hover")));
    assert_eq!(engine.ticks().registered().count(), 2);
}
