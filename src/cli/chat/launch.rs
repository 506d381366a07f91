//! Cosmetic "application launch" sequence.
//!
//! Nothing is actually started. A launch is a fixed list of timed steps
//! (progress ticks, a system-check log, a final info panel) that a single
//! renderer walks through, pausing on the supplied [`Pacer`] between steps.

use std::io::Write;
use std::time::Duration;

use color_print::cformat;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use eyre::Result;
use tracing::info;

use super::pacer::Pacer;

const PROGRESS_TICKS: u8 = 100;
const TICK_DELAY: Duration = Duration::from_millis(10);
const SETTLE_DELAY: Duration = Duration::from_millis(500);
const CHECK_DELAY: Duration = Duration::from_millis(500);
const BAR_WIDTH: usize = 40;

/// Static panel shown once an app is "running", picked by keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoPanel {
    Security,
    Audio,
    MarketData,
    Generic(String),
}

impl InfoPanel {
    /// Case-insensitive keyword match on the app name, first hit wins:
    /// "security", "audio", "stock".
    pub fn for_app(app_name: &str) -> Self {
        let lower = app_name.to_lowercase();
        if lower.contains("security") {
            InfoPanel::Security
        } else if lower.contains("audio") {
            InfoPanel::Audio
        } else if lower.contains("stock") {
            InfoPanel::MarketData
        } else {
            InfoPanel::Generic(app_name.to_string())
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            InfoPanel::Security => vec![
                "Aegis Guard: Monitoring active threats.".to_string(),
                "Status: System Safe.".to_string(),
            ],
            InfoPanel::Audio => vec![
                "Audio Workbench: Input channels open.".to_string(),
                "Frequency: 44.1kHz.".to_string(),
            ],
            InfoPanel::MarketData => vec![
                "Market Data Link: Connection Established.".to_string(),
                "Data Feed: Live.".to_string(),
            ],
            InfoPanel::Generic(app) => {
                vec![format!("System: {} is running in the main viewport.", app)]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStep {
    Header(String),
    Progress { percent: u8, caption: String },
    ClearProgress,
    CheckLog(String),
    Check(String),
    Ready(String),
    ActiveSession(String),
    Panel(InfoPanel),
}

/// A step and the pause that precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedStep {
    pub delay: Duration,
    pub step: LaunchStep,
}

impl TimedStep {
    fn now(step: LaunchStep) -> Self {
        Self::after(Duration::ZERO, step)
    }

    fn after(delay: Duration, step: LaunchStep) -> Self {
        Self { delay, step }
    }
}

/// Build the full step list for launching `app`. Identical for every name
/// apart from the labels and the final panel.
pub fn launch_plan(app: &str) -> Vec<TimedStep> {
    let caption = format!("Initializing {} protocols...", app);
    let mut plan = vec![TimedStep::now(LaunchStep::Header(app.to_string()))];

    plan.extend((1..=PROGRESS_TICKS).map(|percent| {
        TimedStep::after(
            TICK_DELAY,
            LaunchStep::Progress {
                percent,
                caption: caption.clone(),
            },
        )
    }));

    plan.push(TimedStep::after(SETTLE_DELAY, LaunchStep::ClearProgress));
    plan.push(TimedStep::now(LaunchStep::CheckLog("System Check".to_string())));
    plan.push(TimedStep::now(LaunchStep::Check(
        "Loading Aegis Security protocols...".to_string(),
    )));
    plan.push(TimedStep::after(
        CHECK_DELAY,
        LaunchStep::Check("Verifying User Permissions...".to_string()),
    ));
    plan.push(TimedStep::after(
        CHECK_DELAY,
        LaunchStep::Check(format!("Launching {} interface...", app)),
    ));
    plan.push(TimedStep::after(
        CHECK_DELAY,
        LaunchStep::Ready(format!("{} is Ready", app)),
    ));
    plan.push(TimedStep::now(LaunchStep::ActiveSession(app.to_string())));
    plan.push(TimedStep::now(LaunchStep::Panel(InfoPanel::for_app(app))));
    plan
}

/// Play the launch sequence for `app` onto `out`. Always runs to the end.
pub async fn simulate_launch<W: Write>(app: &str, out: &mut W, pacer: &dyn Pacer) -> Result<()> {
    info!("Simulating launch of {}", app);
    run_plan(&launch_plan(app), out, pacer).await
}

pub async fn run_plan<W: Write>(plan: &[TimedStep], out: &mut W, pacer: &dyn Pacer) -> Result<()> {
    for timed in plan {
        if !timed.delay.is_zero() {
            pacer.pause(timed.delay).await;
        }
        render_step(&timed.step, out)?;
        out.flush()?;
    }
    Ok(())
}

fn render_step<W: Write>(step: &LaunchStep, out: &mut W) -> Result<()> {
    match step {
        LaunchStep::Header(app) => {
            writeln!(out, "{}", "─".repeat(BAR_WIDTH + 10))?;
            writeln!(out, "{}", cformat!("<bold><cyan>Executing:</></> {}", app))?;
        }
        LaunchStep::Progress { percent, caption } => {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            write!(out, "{} {:>3}% {}", progress_bar(*percent), percent, caption)?;
        }
        LaunchStep::ClearProgress => {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        LaunchStep::CheckLog(label) => {
            writeln!(out, "{}", cformat!("<bold>{}</>", label))?;
        }
        LaunchStep::Check(label) => {
            writeln!(out, "  • {}", label)?;
        }
        LaunchStep::Ready(label) => {
            writeln!(out, "{}", cformat!("  <green>✔</> {}", label))?;
        }
        LaunchStep::ActiveSession(app) => {
            writeln!(out, "{}", cformat!("<green>Active Session: {}</>", app))?;
        }
        LaunchStep::Panel(panel) => {
            for line in panel.lines() {
                writeln!(out, "{}", cformat!("  <blue>│</> {}", line))?;
            }
        }
    }
    Ok(())
}

fn progress_bar(percent: u8) -> String {
    let filled = BAR_WIDTH * usize::from(percent.min(100)) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::chat::pacer::RecordingPacer;

    #[test]
    fn panel_matches_keywords_in_any_case() {
        assert_eq!(InfoPanel::for_app("Security suite"), InfoPanel::Security);
        assert_eq!(InfoPanel::for_app("the SECURITY thing"), InfoPanel::Security);
        assert_eq!(InfoPanel::for_app("Audio lab"), InfoPanel::Audio);
        assert_eq!(InfoPanel::for_app("Stocks"), InfoPanel::MarketData);
        assert_eq!(
            InfoPanel::for_app("Weather app"),
            InfoPanel::Generic("Weather app".to_string())
        );
    }

    #[test]
    fn security_outranks_other_keywords() {
        assert_eq!(InfoPanel::for_app("stock audio security"), InfoPanel::Security);
        assert_eq!(InfoPanel::for_app("stock audio"), InfoPanel::Audio);
    }

    #[test]
    fn plan_has_fixed_shape() {
        let plan = launch_plan("Weather app");
        let ticks = plan
            .iter()
            .filter(|t| matches!(t.step, LaunchStep::Progress { .. }))
            .count();
        let checks = plan
            .iter()
            .filter(|t| matches!(t.step, LaunchStep::Check(_)))
            .count();

        assert_eq!(ticks, 100);
        assert_eq!(checks, 3);
        assert_eq!(plan.first().map(|t| &t.step), Some(&LaunchStep::Header("Weather app".to_string())));
        assert_eq!(
            plan.last().map(|t| &t.step),
            Some(&LaunchStep::Panel(InfoPanel::Generic("Weather app".to_string())))
        );

        let total: Duration = plan.iter().map(|t| t.delay).sum();
        assert_eq!(total, Duration::from_millis(3000));
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}]", "░".repeat(40)));
        assert_eq!(progress_bar(100), format!("[{}]", "█".repeat(40)));
        assert_eq!(progress_bar(50).matches('█').count(), 20);
    }

    #[tokio::test]
    async fn simulation_renders_every_stage_without_sleeping() {
        let pacer = RecordingPacer::default();
        let mut out = Vec::new();

        simulate_launch("Security suite", &mut out, &pacer).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Security suite"));
        assert!(text.contains("Initializing Security suite protocols..."));
        assert!(text.contains("100% Initializing"));
        assert!(text.contains("Loading Aegis Security protocols..."));
        assert!(text.contains("Verifying User Permissions..."));
        assert!(text.contains("Launching Security suite interface..."));
        assert!(text.contains("Security suite is Ready"));
        assert!(text.contains("Active Session: Security suite"));
        assert!(text.contains("Aegis Guard: Monitoring active threats."));

        assert_eq!(pacer.pauses().len(), 104);
        assert_eq!(pacer.total(), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn unknown_app_gets_generic_panel() {
        let pacer = RecordingPacer::default();
        let mut out = Vec::new();

        simulate_launch("Weather app", &mut out, &pacer).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("System: Weather app is running in the main viewport."));
        assert!(!text.contains("Aegis Guard:"));
    }
}
