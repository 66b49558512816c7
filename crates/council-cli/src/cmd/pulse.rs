use anyhow::Context;
use council_core::{capture, interaction::StdConsole, paths::Layout};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<crate::Outcome> {
    let layout = Layout::new(root);
    let today = chrono::Utc::now().date_naive();

    let stdin = std::io::stdin();
    let mut console = StdConsole::new(stdin.lock(), std::io::stdout());
    let pulse = capture::capture(&mut console, today).context("pulse capture interrupted")?;

    pulse.save(&layout).context("failed to save pulse")?;

    if json {
        crate::output::print_json(&pulse)?;
    } else {
        println!("---");
        println!("Pulse saved for {}.", pulse.date);
    }
    Ok(crate::Outcome::Done)
}
