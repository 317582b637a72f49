//! 场景脚本
//!
//! 一个场景是一串对单个图标的操作与断言，JSON 格式：
//!
//! ```json
//! {
//!   "name": "glow 让位给 bounce",
//!   "icon": { "size": [48, 48], "container": [144, 72], "orientation": "bottom" },
//!   "steps": [
//!     { "start": { "effect": "glow-hover", "loops": 0 } },
//!     { "tick": 5 },
//!     { "start": { "effect": "bounce" } },
//!     { "tick": 1 },
//!     { "expect": { "active": "bounce", "phases": { "glow-hover": "suspended" } } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use awn_effects::{
    EffectEngine, EffectId, EffectSettings, EffectVariant, EntryPhase, IconHost, IconId,
    IconVisualState, ManualTicks, Orientation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 浮点断言的容差
const TOLERANCE: f32 = 1e-3;

/// 场景中的图标几何
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconSetup {
    #[serde(default = "default_size")]
    pub size: (u32, u32),
    #[serde(default = "default_container")]
    pub container: (u32, u32),
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_size() -> (u32, u32) {
    (48, 48)
}

fn default_container() -> (u32, u32) {
    (144, 72)
}

impl Default for IconSetup {
    fn default() -> Self {
        Self {
            size: default_size(),
            container: default_container(),
            orientation: Orientation::default(),
        }
    }
}

fn default_loops() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartStep {
    pub effect: EffectId,
    #[serde(default = "default_loops")]
    pub loops: u32,
    #[serde(default)]
    pub foreground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStep {
    pub variant: EffectVariant,
    #[serde(default = "default_loops")]
    pub loops: u32,
    #[serde(default)]
    pub foreground: bool,
}

/// 视觉状态断言，未给出的字段不检查
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateExpectation {
    pub top_offset: Option<f32>,
    pub width_mod: Option<f32>,
    pub height_mod: Option<f32>,
    pub alpha: Option<f32>,
    pub glow_amount: Option<f32>,
    pub saturation: Option<f32>,
}

/// 断言
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// 正在接收 tick 的效果
    pub active: Option<EffectId>,
    /// 没有效果在接收 tick
    pub idle: Option<bool>,
    pub queue_len: Option<usize>,
    /// 视觉状态是否为中性值
    pub neutral: Option<bool>,
    /// 效果名 → 阶段
    #[serde(default)]
    pub phases: BTreeMap<String, EntryPhase>,
    pub state: Option<StateExpectation>,
}

/// 场景步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start(StartStep),
    Event(EventStep),
    Stop(EffectId),
    Tick(usize),
    /// tick 直到队列为空，参数为帧数上限
    Drain(usize),
    Expect(Expectation),
}

/// 场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub icon: IconSetup,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// 从 JSON 文件读取
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取场景失败: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析场景失败: {}", path.display()))
    }
}

/// 预览宿主：单个图标，记录每一帧
#[derive(Debug, Default)]
pub struct PreviewHost {
    pub icon: IconSetup,
    pub frames: Vec<IconVisualState>,
    pub started: Vec<EffectId>,
    pub ended: Vec<EffectId>,
}

impl PreviewHost {
    pub fn new(icon: IconSetup) -> Self {
        Self {
            icon,
            ..Self::default()
        }
    }
}

impl IconHost for PreviewHost {
    fn request_redraw(&mut self, _icon: IconId, state: &IconVisualState) {
        self.frames.push(state.clone());
    }

    fn icon_size(&self, _icon: IconId) -> (u32, u32) {
        self.icon.size
    }

    fn container_extent(&self, _icon: IconId) -> (u32, u32) {
        self.icon.container
    }

    fn orientation(&self, _icon: IconId) -> Orientation {
        self.icon.orientation
    }

    fn on_effect_started(&mut self, icon: IconId, effect: EffectId) {
        debug!(icon = %icon, effect = %effect, "效果开始");
        self.started.push(effect);
    }

    fn on_effect_ended(&mut self, icon: IconId, effect: EffectId) {
        debug!(icon = %icon, effect = %effect, "效果结束");
        self.ended.push(effect);
    }
}

pub type PreviewEngine = EffectEngine<PreviewHost, ManualTicks>;

/// 创建只有一个图标的预览引擎
pub fn preview_engine(icon: IconSetup, settings: EffectSettings) -> (PreviewEngine, IconId) {
    let mut engine = EffectEngine::new(PreviewHost::new(icon), ManualTicks::new(), settings);
    let id = engine.add_icon();
    (engine, id)
}

/// 场景运行结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub ticks: usize,
    pub redraws: usize,
    pub started: Vec<String>,
    pub ended: Vec<String>,
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 运行场景
///
/// 引擎错误（未知图标等）直接返回；断言失败记录在报告里，场景继续执行。
pub fn run(scenario: &Scenario, settings: EffectSettings) -> anyhow::Result<ScenarioReport> {
    let (mut engine, icon) = preview_engine(scenario.icon, settings);
    let mut report = ScenarioReport {
        name: scenario.name.clone(),
        ..ScenarioReport::default()
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        match step {
            Step::Start(start) => {
                engine.start(icon, start.effect, start.loops, start.foreground)?;
            }
            Step::Event(event) => {
                let effect =
                    engine.start_event(icon, event.variant, event.loops, event.foreground)?;
                debug!(variant = %event.variant, effect = %effect, "按场景启动效果");
            }
            Step::Stop(effect) => {
                engine.stop(icon, *effect)?;
            }
            Step::Tick(count) => {
                for _ in 0..*count {
                    engine.tick(icon)?;
                    report.ticks += 1;
                }
            }
            Step::Drain(limit) => {
                let mut drained = false;
                for _ in 0..*limit {
                    engine.tick(icon)?;
                    report.ticks += 1;
                    if engine.queue_len(icon) == 0 {
                        drained = true;
                        break;
                    }
                }
                if !drained {
                    report
                        .failures
                        .push(format!("步骤 {index}: 队列在 {limit} 帧内没有清空"));
                }
            }
            Step::Expect(expect) => {
                for failure in check(&engine, icon, expect) {
                    report.failures.push(format!("步骤 {index}: {failure}"));
                }
            }
        }
    }

    let host = engine.host();
    report.redraws = host.frames.len();
    report.started = host.started.iter().map(ToString::to_string).collect();
    report.ended = host.ended.iter().map(ToString::to_string).collect();
    info!(
        scenario = %report.name,
        ticks = report.ticks,
        failures = report.failures.len(),
        "场景运行完成"
    );
    Ok(report)
}

fn check(engine: &PreviewEngine, icon: IconId, expect: &Expectation) -> Vec<String> {
    let mut failures = Vec::new();
    let active = engine.active_effect(icon);

    if let Some(wanted) = expect.active
        && active != Some(wanted)
    {
        failures.push(format!("期望 active = {wanted}，实际 {}", describe(active)));
    }
    if let Some(idle) = expect.idle
        && idle != active.is_none()
    {
        failures.push(format!("期望 idle = {idle}，实际 active = {}", describe(active)));
    }
    if let Some(len) = expect.queue_len {
        let actual = engine.queue_len(icon);
        if actual != len {
            failures.push(format!("期望 queue_len = {len}，实际 {actual}"));
        }
    }

    for (name, phase) in &expect.phases {
        match name.parse::<EffectId>() {
            Ok(effect) => {
                let actual = engine.phase(icon, effect);
                if actual != Some(*phase) {
                    failures.push(format!("期望 {name} 处于 {phase:?}，实际 {actual:?}"));
                }
            }
            Err(e) => failures.push(e.to_string()),
        }
    }

    let Some(state) = engine.state(icon) else {
        failures.push(format!("图标 {icon} 不存在"));
        return failures;
    };
    if let Some(neutral) = expect.neutral
        && neutral != state.is_neutral()
    {
        failures.push(format!("期望 neutral = {neutral}"));
    }
    if let Some(fields) = &expect.state {
        let pairs = [
            ("top_offset", fields.top_offset, state.top_offset),
            ("width_mod", fields.width_mod, state.width_mod),
            ("height_mod", fields.height_mod, state.height_mod),
            ("alpha", fields.alpha, state.alpha),
            ("glow_amount", fields.glow_amount, state.glow_amount),
            ("saturation", fields.saturation, state.saturation),
        ];
        for (field, wanted, actual) in pairs {
            if let Some(wanted) = wanted
                && (wanted - actual).abs() > TOLERANCE
            {
                failures.push(format!("期望 {field} = {wanted}，实际 {actual}"));
            }
        }
    }
    failures
}

fn describe(effect: Option<EffectId>) -> String {
    effect.map_or_else(|| "无".to_string(), |effect| effect.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOW_YIELDS: &str = r#"{
        "name": "glow yields",
        "steps": [
            { "start": { "effect": "glow-hover", "loops": 0 } },
            { "tick": 5 },
            { "start": { "effect": "bounce" } },
            { "tick": 1 },
            { "expect": {
                "active": "bounce",
                "queue_len": 2,
                "phases": { "glow-hover": "suspended" },
                "state": { "glow_amount": 1.0 }
            } },
            { "tick": 16 },
            { "expect": { "active": "glow-hover", "state": { "glow_amount": 1.0 } } },
            { "stop": "glow-hover" },
            { "expect": { "idle": true, "queue_len": 0, "neutral": true } }
        ]
    }"#;

    #[test]
    fn test_parse_defaults() {
        let scenario: Scenario = serde_json::from_str(GLOW_YIELDS).unwrap();
        assert_eq!(scenario.icon, IconSetup::default());
        assert_eq!(scenario.steps.len(), 9);
        assert_eq!(
            scenario.steps[2],
            Step::Start(StartStep {
                effect: "bounce".parse().unwrap(),
                loops: 1,
                foreground: false,
            })
        );
    }

    #[test]
    fn test_run_passes() {
        let scenario: Scenario = serde_json::from_str(GLOW_YIELDS).unwrap();
        let report = run(&scenario, EffectSettings::default()).unwrap();
        assert!(report.passed(), "{:?}", report.failures);
        assert_eq!(report.ticks, 22);
        assert_eq!(report.ended, vec!["bounce", "glow-hover"]);
    }

    #[test]
    fn test_failed_expectation_is_reported() {
        let scenario = Scenario {
            name: "wrong".to_string(),
            icon: IconSetup::default(),
            steps: vec![
                Step::Start(StartStep {
                    effect: "bounce".parse().unwrap(),
                    loops: 1,
                    foreground: true,
                }),
                Step::Expect(Expectation {
                    queue_len: Some(3),
                    ..Expectation::default()
                }),
                Step::Drain(10),
            ],
        };
        let report = run(&scenario, EffectSettings::default()).unwrap();
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_unknown_effect_is_a_parse_error() {
        let json = r#"{ "name": "x", "steps": [ { "stop": "wobble" } ] }"#;
        assert!(serde_json::from_str::<Scenario>(json).is_err());
    }
}
