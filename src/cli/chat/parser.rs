use thiserror::Error;

/// Classified purpose of one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Input mentioned "run" or "execute".
    RunApp(LaunchRequest),
    Greet,
    Status,
    /// Anything else, carrying the input verbatim.
    Generic(String),
}

/// Outcome of looking for an application name after a launch keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    Target(String),
    /// The keyword was the last word.
    MissingTarget,
    Unidentified,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("keyword '{0}' does not appear as a standalone word")]
    KeywordNotStandalone(&'static str),
}

/// Classify one line of input.
///
/// Checks are case-insensitive substring matches evaluated in a fixed
/// order: "execute"/"run", then "hello", then "status". So "run status"
/// is a launch, and "brunch" counts as mentioning "run".
pub fn parse_command(input: &str) -> Intent {
    let lower = input.to_lowercase();

    if lower.contains("execute") || lower.contains("run") {
        let keyword = if lower.contains("execute") { "execute" } else { "run" };
        let request = match extract_target(input, keyword) {
            Ok(Some(target)) => LaunchRequest::Target(target),
            Ok(None) => LaunchRequest::MissingTarget,
            Err(e) => {
                tracing::debug!("Could not extract application name: {}", e);
                LaunchRequest::Unidentified
            }
        };
        return Intent::RunApp(request);
    }

    if lower.contains("hello") {
        Intent::Greet
    } else if lower.contains("status") {
        Intent::Status
    } else {
        Intent::Generic(input.to_string())
    }
}

/// Find `keyword` among the whitespace-separated words of `input` and return
/// everything after it, capitalized. `Ok(None)` means nothing follows.
fn extract_target(input: &str, keyword: &'static str) -> Result<Option<String>, ExtractError> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let idx = words
        .iter()
        .position(|w| w.to_lowercase() == keyword)
        .ok_or(ExtractError::KeywordNotStandalone(keyword))?;

    if idx + 1 >= words.len() {
        return Ok(None);
    }

    Ok(Some(capitalize(&words[idx + 1..].join(" "))))
}

/// Upper-case the first character and lower-case the rest of the string.
/// Only the very first letter of a multi-word name ends up capitalized.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
