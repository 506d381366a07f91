use std::io::Write;
use std::time::Duration;

use color_print::cformat;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use eyre::Result;

use super::pacer::Pacer;

pub const CHILDRENS_MODE_NOTICE: &str = "Children's Mode Activated. Parental Controls Locked.";
pub const DIAGNOSTICS_NOTICE: &str = "All systems nominal.";
const DIAGNOSTICS_CAPTION: &str = "Scanning system files...";
const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_TICK: Duration = Duration::from_millis(100);
const DIAGNOSTICS_DURATION: Duration = Duration::from_millis(1500);

/// Fixed facts shown in the status panel.
pub struct SystemProfile {
    pub title: String,
    pub caption: String,
    pub status: String,
    pub security: String,
    pub user: String,
}

impl SystemProfile {
    pub fn new() -> Self {
        Self {
            title: "PAPI 3.0-1".to_string(),
            caption: "System Interface".to_string(),
            status: "Online".to_string(),
            security: "Aegis Guard Active".to_string(),
            user: "Troy Walker".to_string(),
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", cformat!("<bold>{}</>", self.title))?;
        writeln!(out, "{}", cformat!("<dim>{}</>", self.caption))?;
        writeln!(out, "{}", "─".repeat(32))?;
        writeln!(out, "{}", cformat!("<bold>System Status:</> <green>●</> {}", self.status))?;
        writeln!(out, "{}", cformat!("<bold>Security:</> {}", self.security))?;
        writeln!(out, "{}", cformat!("<bold>User:</> {}", self.user))?;
        writeln!(out)?;
        writeln!(out, "{}", cformat!("<bold>Quick Commands</>"))?;
        for command in QuickCommand::ALL {
            writeln!(out, "  {:<14} {}", command.slash(), command.label())?;
        }
        Ok(())
    }
}

impl Default for SystemProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidebar buttons. They only print a notification; no state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickCommand {
    ChildrensMode,
    Diagnostics,
}

impl QuickCommand {
    pub const ALL: [QuickCommand; 2] = [QuickCommand::ChildrensMode, QuickCommand::Diagnostics];

    pub fn from_slash(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slash() == input)
    }

    pub fn slash(&self) -> &'static str {
        match self {
            QuickCommand::ChildrensMode => "/kids",
            QuickCommand::Diagnostics => "/diagnostics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickCommand::ChildrensMode => "Activate Children's Mode",
            QuickCommand::Diagnostics => "Run Diagnostics",
        }
    }

    pub async fn run<W: Write>(&self, out: &mut W, pacer: &dyn Pacer) -> Result<()> {
        match self {
            QuickCommand::ChildrensMode => notify(out, CHILDRENS_MODE_NOTICE),
            QuickCommand::Diagnostics => {
                let frames = (DIAGNOSTICS_DURATION.as_millis() / SPINNER_TICK.as_millis()) as usize;
                for frame in SPINNER_FRAMES.iter().cycle().take(frames) {
                    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                    write!(out, "{} {}", frame, DIAGNOSTICS_CAPTION)?;
                    out.flush()?;
                    pacer.pause(SPINNER_TICK).await;
                }
                queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                notify(out, DIAGNOSTICS_NOTICE)
            }
        }
    }
}

fn notify<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<yellow>🔔</> {}", message))?;
    Ok(())
}
