//! Make command handlers

use std::path::Path;

use anyhow::Result;

use vaws::application::{make_cluster, make_image};
use vaws::infrastructure::{Interrupt, RunOutcome};

use crate::ui::json::emit;
use crate::ui::output::describe_status;

pub fn cmd_make_ami(spec: &Path, json: bool) -> Result<()> {
    let interrupt = Interrupt::new();
    interrupt.install_ctrlc()?;
    let outcome = make_image(spec, &interrupt)?;
    report("make ami", outcome, json);
    Ok(())
}

pub fn cmd_make_cluster(config: &Path, json: bool) -> Result<()> {
    let interrupt = Interrupt::new();
    interrupt.install_ctrlc()?;
    let outcome = make_cluster(config, &interrupt)?;
    report("make cluster", outcome, json);
    Ok(())
}

fn report(command: &str, outcome: RunOutcome, json: bool) {
    let status = describe_status(outcome.status());
    if json {
        let _ = emit(serde_json::json!({
            "event": "complete",
            "command": command,
            "interrupted": outcome.was_interrupted(),
            "status": status,
        }));
    } else if outcome.was_interrupted() {
        eprintln!("Interrupted; the process ended with {}", status);
    } else {
        println!("✓ {} finished", command);
    }
}
