//! RTLS Display replay: drive the scene view headlessly from a JSON script.
//!
//! Builds the anchors and tags a script describes, feeds its input events
//! through the view, and prints every notification plus the final view state
//! as JSON. Set `RUST_LOG=debug` to trace routing decisions.

mod script;

use script::Script;
use std::process::ExitCode;

const USAGE: &str = "usage: rtls-replay [--pretty] <script.json>";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rtls-replay: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut path = None;
    let mut pretty = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--pretty" => pretty = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag `{flag}`\n{USAGE}")),
            _ => path = Some(arg),
        }
    }
    let path = path.ok_or_else(|| USAGE.to_string())?;

    let text = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    let script = Script::from_json(&text)?;
    log::info!(
        "replaying {} event(s) over {} item(s)",
        script.events.len(),
        script.items.len()
    );
    let report = script.replay()?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    println!("{}", json.map_err(|e| e.to_string())?);
    Ok(())
}
