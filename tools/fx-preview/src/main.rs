//! # fx-preview
//!
//! 效果预览工具 - 用手动时钟驱动 awn-effects，输出逐帧视觉参数，
//! 或运行场景脚本检查队列行为。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p fx-preview -- list
//! cargo run -p fx-preview -- run --effect bounce --loops 1
//! cargo run -p fx-preview -- run --effect zoom-hover --orientation left --format json
//! cargo run -p fx-preview -- scenario tools/fx-preview/scenarios/glow-yields.json
//! cargo run -p fx-preview -- check tools/fx-preview/scenarios
//! ```

mod scenario;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use awn_effects::{EffectId, EffectSettings, IconVisualState, Orientation, StepOutcome};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{Level, info, warn};
use walkdir::WalkDir;

use scenario::{IconSetup, Scenario, ScenarioReport, preview_engine};

#[derive(Parser)]
#[command(name = "fx-preview")]
#[command(about = "效果预览工具 - 逐帧输出图标动画参数")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 效果配置文件（JSON）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出所有效果
    List {
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// 运行单个效果并输出每一帧
    Run {
        /// 效果名（如 bounce、glow-hover）
        #[arg(short, long)]
        effect: EffectId,

        /// 循环次数（0 = 无限，需要配合 --max-ticks）
        #[arg(short, long, default_value_t = 1)]
        loops: u32,

        /// 图标尺寸，WxH
        #[arg(long, default_value = "48x48", value_parser = parse_size)]
        size: (u32, u32),

        /// 面板容器尺寸，WxH
        #[arg(long, default_value = "144x72", value_parser = parse_size)]
        container: (u32, u32),

        /// 面板朝向
        #[arg(long, default_value = "bottom")]
        orientation: Orientation,

        /// 最多 tick 次数
        #[arg(long, default_value_t = 2000)]
        max_ticks: usize,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// 运行一个场景脚本
    Scenario {
        /// 场景文件路径
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// 运行目录下的所有场景脚本
    Check {
        /// 场景目录
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("尺寸格式应为 WxH: '{s}'"))?;
    let w = w.trim().parse().map_err(|e| format!("宽度无效 '{w}': {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("高度无效 '{h}': {e}"))?;
    Ok((w, h))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = real_main(cli) {
        eprintln!("❌ {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::List { format } => list(&settings, format),
        Commands::Run {
            effect,
            loops,
            size,
            container,
            orientation,
            max_ticks,
            format,
        } => {
            let icon = IconSetup {
                size,
                container,
                orientation,
            };
            run_effect(effect, loops, icon, max_ticks, settings, format)
        }
        Commands::Scenario { file, format } => {
            let script = Scenario::load(&file)?;
            let report = scenario::run(&script, settings)?;
            print_report(&report, format)?;
            if !report.passed() {
                anyhow::bail!("场景 '{}' 有 {} 处断言失败", report.name, report.failures.len());
            }
            Ok(())
        }
        Commands::Check { dir } => check_dir(&dir, settings),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<EffectSettings> {
    let Some(path) = path else {
        return Ok(EffectSettings::default());
    };
    let settings = EffectSettings::load(path);
    settings
        .validate()
        .with_context(|| format!("配置无效: {}", path.display()))?;
    Ok(settings)
}

#[derive(Serialize)]
struct CatalogRow {
    name: String,
    priority: String,
    interval_ms: u128,
}

fn list(settings: &EffectSettings, format: Format) -> anyhow::Result<()> {
    let rows: Vec<CatalogRow> = EffectId::all()
        .into_iter()
        .map(|effect| CatalogRow {
            name: effect.to_string(),
            priority: format!("{:?}", effect.priority()),
            interval_ms: effect.tick_interval(settings).as_millis(),
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        Format::Table => {
            println!("{:<22} {:<12} {:>8}", "EFFECT", "PRIORITY", "TICK ms");
            for row in &rows {
                println!("{:<22} {:<12} {:>8}", row.name, row.priority, row.interval_ms);
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct FrameRow<'a> {
    tick: usize,
    outcome: String,
    #[serde(flatten)]
    state: &'a IconVisualState,
}

fn run_effect(
    effect: EffectId,
    loops: u32,
    icon: IconSetup,
    max_ticks: usize,
    settings: EffectSettings,
    format: Format,
) -> anyhow::Result<()> {
    let (mut engine, id) = preview_engine(icon, settings);
    engine.start(id, effect, loops, true)?;
    info!(effect = %effect, loops, "开始预览");

    let mut outcomes = Vec::new();
    while outcomes.len() < max_ticks {
        match engine.tick(id)? {
            Some(outcome) => outcomes.push(outcome),
            None => break,
        }
        if engine.queue_len(id) == 0 {
            break;
        }
    }
    if engine.queue_len(id) > 0 {
        warn!(effect = %effect, max_ticks, "达到 tick 上限，效果仍在运行");
    }

    let frames = &engine.host().frames;
    match format {
        Format::Json => {
            let rows: Vec<FrameRow<'_>> = frames
                .iter()
                .zip(&outcomes)
                .enumerate()
                .map(|(index, (state, outcome))| FrameRow {
                    tick: index + 1,
                    outcome: format!("{outcome:?}"),
                    state,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Format::Table => {
            println!(
                "{:>5} {:>9} {:>8} {:>6} {:>6} {:>6} {:>6} {:>6} {:>5} {:>9}",
                "TICK", "OFFSET", "WIDTH", "HEIGHT", "ALPHA", "GLOW", "SAT", "DEPTH", "FLIP", "OUTCOME"
            );
            for (index, (state, outcome)) in frames.iter().zip(&outcomes).enumerate() {
                println!(
                    "{:>5} {:>9.3} {:>8.3} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>6.2} {:>5} {:>9}",
                    index + 1,
                    state.top_offset,
                    state.width_mod,
                    state.height_mod,
                    state.alpha,
                    state.glow_amount,
                    state.saturation,
                    state.icon_depth,
                    state.flip,
                    describe_outcome(*outcome),
                );
            }
        }
    }
    Ok(())
}

fn describe_outcome(outcome: StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Continue => "continue",
        StepOutcome::Suspend => "suspend",
        StepOutcome::Stop => "stop",
    }
}

fn print_report(report: &ScenarioReport, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Table => {
            let mark = if report.passed() { "✔" } else { "✘" };
            println!(
                "{mark} {}  ({} ticks, {} redraws)",
                report.name, report.ticks, report.redraws
            );
            println!("  started: {}", report.started.join(", "));
            println!("  ended:   {}", report.ended.join(", "));
            for failure in &report.failures {
                println!("  ✘ {failure}");
            }
        }
    }
    Ok(())
}

fn check_dir(dir: &Path, settings: EffectSettings) -> anyhow::Result<()> {
    let mut total = 0;
    let mut failed = 0;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        total += 1;

        let result = Scenario::load(path).and_then(|s| scenario::run(&s, settings.clone()));
        match result {
            Ok(report) if report.passed() => println!("✔ {}", path.display()),
            Ok(report) => {
                failed += 1;
                println!("✘ {}", path.display());
                for failure in &report.failures {
                    println!("    {failure}");
                }
            }
            Err(e) => {
                failed += 1;
                println!("✘ {}: {e:#}", path.display());
            }
        }
    }

    println!("\n{total} 个场景，{failed} 个失败");
    if failed > 0 {
        anyhow::bail!("{failed} 个场景失败");
    }
    if total == 0 {
        warn!(dir = %dir.display(), "目录中没有场景文件");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("48x32"), Ok((48, 32)));
        assert_eq!(parse_size("64X64"), Ok((64, 64)));
        assert!(parse_size("48").is_err());
        assert!(parse_size("ax4").is_err());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "fx-preview",
            "run",
            "--effect",
            "glow-hover",
            "--orientation",
            "left",
            "--size",
            "32x32",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                effect,
                orientation,
                size,
                loops,
                ..
            } => {
                assert_eq!(effect.to_string(), "glow-hover");
                assert_eq!(orientation, Orientation::Left);
                assert_eq!(size, (32, 32));
                assert_eq!(loops, 1);
            }
            _ => panic!("应解析为 run 子命令"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_effect() {
        assert!(Cli::try_parse_from(["fx-preview", "run", "--effect", "wobble"]).is_err());
    }
}
