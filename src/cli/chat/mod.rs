pub mod conversation_state;
pub mod launch;
pub mod pacer;
pub mod parser;
pub mod playback;
pub mod prompt;
pub mod response;
pub mod sidebar;
pub mod speech;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use color_print::cformat;
use conversation_state::ConversationState;
use eyre::Result;
use launch::simulate_launch;
use pacer::{Pacer, TokioPacer};
use parser::parse_command;
use prompt::generate_prompt;
use response::respond;
use rustyline::error::ReadlineError;
use sidebar::{QuickCommand, SystemProfile};
use speech::{SpeechEmitter, SpeechOutcome};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::speech_client::GoogleTranslateTts;

const WELCOME_TEXT: &str = "
Type a command or just chat.

Things to try
• hello
• status
• run security suite
• execute audio workbench

/help         Show the help dialogue
/quit         Quit the application
";

const HELP_TEXT: &str = "
P.A.P.I. 3.0-1

run {app}       Launch an application (also: execute {app})
hello           Greet the system
status          Report system status

/sidebar        Show the system status panel
/history        Show this session's messages
/kids           Activate Children's Mode
/diagnostics    Run diagnostics
/help           Show this help dialogue
/quit           Quit the application

Slash commands are controls, not chat: they are not added to /history.
";

pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    conversation_state: ConversationState,
    profile: SystemProfile,
    speech: Option<SpeechEmitter>,
    player: Option<String>,
    pacer: Arc<dyn Pacer>,
    history_path: Option<PathBuf>,
}

impl ChatContext {
    /// With `input` set, a single turn is processed and the context exits;
    /// otherwise it runs the interactive prompt.
    pub fn new(output: Box<dyn Write>, input: Option<String>, settings: &Settings) -> Self {
        let speech = if settings.speech_enabled {
            match GoogleTranslateTts::new(&settings.tts_endpoint, settings.tts_timeout) {
                Ok(tts) => Some(SpeechEmitter::new(Box::new(tts), settings.audio_path.clone())),
                Err(e) => {
                    warn!("Speech output disabled, synthesizer setup failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            output,
            interactive: input.is_none(),
            input,
            conversation_state: ConversationState::new(),
            profile: SystemProfile::new(),
            speech,
            player: settings.player.clone(),
            pacer: Arc::new(TokioPacer),
            history_path: settings.history_path.clone(),
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        if let Some(input) = self.input.take() {
            self.handle_input(&input).await?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.interactive {
            self.print_welcome()?;
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", cformat!("<bold><cyan>P.A.P.I. 3.0-1</></>"))?;
        writeln!(self.output, "{}", cformat!("<bold>Programmable Artificial Personal Intelligence</>"))?;
        writeln!(self.output)?;
        self.profile.render(&mut self.output)?;
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl(self.history_path.as_deref())?;

        loop {
            let prompt_text = generate_prompt(None);
            let readline = rl.readline(&prompt_text);

            match readline {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }

                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str());
                    }

                    match self.handle_input(&line).await {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => writeln!(self.output, "Error: {}", e)?,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    writeln!(self.output, "^C")?;
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            if let Err(e) = rl.save_history(path) {
                debug!("Could not save input history to {}: {}", path.display(), e);
            }
        }
        writeln!(self.output, "Goodbye.")?;

        Ok(())
    }

    /// Returns `true` when the user asked to quit. Whitespace-only input is
    /// still a chat turn; only a completely empty line is ignored.
    async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.is_empty() {
            return Ok(false);
        }
        let trimmed = input.trim();

        if let Some(command) = QuickCommand::from_slash(trimmed) {
            command.run(&mut self.output, self.pacer.as_ref()).await?;
            return Ok(false);
        }

        match trimmed {
            "/quit" => return Ok(true),
            "/help" => writeln!(self.output, "{}", HELP_TEXT)?,
            "/sidebar" => self.profile.render(&mut self.output)?,
            "/history" => self.print_history()?,
            _ => self.process_chat_input(input).await?,
        }

        Ok(false)
    }

    fn print_history(&mut self) -> Result<()> {
        if self.conversation_state.is_empty() {
            writeln!(self.output, "No messages yet.")?;
            return Ok(());
        }

        for message in self.conversation_state.get_messages() {
            writeln!(
                self.output,
                "[{}] {:>9}: {}",
                message.timestamp().format("%H:%M:%S"),
                message.role().as_str(),
                message.content()
            )?;
        }
        Ok(())
    }

    /// One chat turn: classify, reply, record, then speak and launch.
    async fn process_chat_input(&mut self, input: &str) -> Result<()> {
        let intent = parse_command(input);
        debug!("Classified {:?} as {:?}", input, intent);
        let reply = respond(&intent);

        // Record the pair before rendering: every turn leaves exactly one
        // user and one assistant message, whatever happens on screen.
        self.conversation_state.add_user_message(input);
        self.conversation_state.add_assistant_message(&reply.text);
        self.log_last_turn();

        writeln!(self.output, "{}", cformat!("<bold><magenta>PAPI:</></> {}", reply.text))?;
        self.speak(&reply.text).await?;

        if let Some(app) = &reply.launch {
            simulate_launch(app, &mut self.output, self.pacer.as_ref()).await?;
        }

        Ok(())
    }

    async fn speak(&mut self, text: &str) -> Result<()> {
        let Some(speech) = &self.speech else {
            return Ok(());
        };

        match speech.emit(text).await {
            SpeechOutcome::Silent => {}
            SpeechOutcome::Spoken(clip) => {
                writeln!(
                    self.output,
                    "{}",
                    cformat!("<dim>🔊 Voice clip: {} ({} bytes)</>", clip.path.display(), clip.bytes.len())
                )?;
                if let Some(player) = &self.player {
                    if let Err(e) = playback::play_clip(player, &clip.path) {
                        warn!("Audio playback failed: {}", e);
                        writeln!(self.output, "{}", cformat!("<yellow>⚠ Audio playback unavailable: {}</>", e))?;
                    }
                }
            }
            SpeechOutcome::Degraded(warning) => {
                writeln!(self.output, "{}", cformat!("<yellow>⚠ {}</>", warning))?;
            }
        }
        Ok(())
    }

    fn log_last_turn(&self) {
        let messages = self.conversation_state.get_messages();
        let turn = &messages[messages.len().saturating_sub(2)..];
        match serde_json::to_string(turn) {
            Ok(json) => debug!("Appended turn {}: {}", self.conversation_state.len() / 2, json),
            Err(e) => debug!("Could not serialize turn: {}", e),
        }
    }
}
