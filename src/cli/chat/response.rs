use super::parser::{Intent, LaunchRequest};

pub const GREETING: &str = "Greetings, Troy. Systems are online and awaiting your command.";
pub const STATUS_REPORT: &str = "All systems operational. Battery at 98%. Security active.";
pub const MISSING_TARGET: &str = "Which application would you like me to execute?";
pub const UNIDENTIFIED_TARGET: &str = "I couldn't identify the application name.";

/// Assistant text for one turn, plus the app to launch if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub launch: Option<String>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            launch: None,
        }
    }
}

pub fn respond(intent: &Intent) -> Reply {
    match intent {
        Intent::RunApp(LaunchRequest::Target(app)) => Reply {
            text: format!("Acknowledged. Initiating launch sequence for {}.", app),
            launch: Some(app.clone()),
        },
        Intent::RunApp(LaunchRequest::MissingTarget) => Reply::text(MISSING_TARGET),
        Intent::RunApp(LaunchRequest::Unidentified) => Reply::text(UNIDENTIFIED_TARGET),
        Intent::Greet => Reply::text(GREETING),
        Intent::Status => Reply::text(STATUS_REPORT),
        Intent::Generic(input) => Reply::text(format!("Processing command: {}", input)),
    }
}
