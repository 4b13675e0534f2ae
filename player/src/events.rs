use anyhow::{Context, Result, bail};

/// A scripted activation event for the demo page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Activate the play control.
    Open,
    /// Activate the close control.
    Close,
    /// Fire the simulated SDK ready callback.
    SdkReady,
    /// Advance the native video element to a position.
    Seek(f64),
}

/// Parse a comma-separated action script, e.g. `open,ready,close` or
/// `open,seek:42,close,open`.
pub fn parse_script(script: &str) -> Result<Vec<Action>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_action)
        .collect()
}

fn parse_action(token: &str) -> Result<Action> {
    if let Some(secs) = token.strip_prefix("seek:") {
        let secs: f64 = secs
            .parse()
            .with_context(|| format!("invalid seek position '{secs}'"))?;
        return Ok(Action::Seek(secs));
    }
    match token {
        "open" => Ok(Action::Open),
        "close" => Ok(Action::Close),
        "ready" => Ok(Action::SdkReady),
        other => bail!("unknown action '{other}' (expected open, close, ready or seek:<secs>)"),
    }
}
