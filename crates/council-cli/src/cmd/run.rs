use anyhow::Context;
use council_core::{
    interaction::StdConsole,
    orchestrator::{Orchestrator, RunMode, RunOptions},
    paths::Layout,
};
use council_llm::GenerationClient;
use std::io::Write;
use std::path::Path;

pub fn run(root: &Path, batch: bool, json: bool) -> anyhow::Result<crate::Outcome> {
    let layout = Layout::new(root);
    let client = GenerationClient::from_env().context("failed to build generation client")?;
    let options = RunOptions {
        today: chrono::Utc::now().date_naive(),
        mode: if batch {
            RunMode::Batch
        } else {
            RunMode::Interactive
        },
    };

    if client.config().api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every generation call will fail");
    }

    // With --json, stdout carries only the record; the conversation goes to stderr.
    let conversation: Box<dyn Write> = if json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let stdin = std::io::stdin();
    let mut console = StdConsole::new(stdin.lock(), conversation);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = rt.block_on(async {
        Orchestrator::new(&layout, &client, &mut console)
            .run(options)
            .await
    })?;

    if json {
        crate::output::print_json(&report.output)?;
    } else {
        if let Some(responses) = &report.output.responses {
            for (role, response) in responses {
                println!("\n[{role}] confidence {:.2}", response.confidence);
                for item in &response.recommendations {
                    println!("  + {item}");
                }
                for item in response.concerns.iter().chain(&response.flags) {
                    println!("  ! {item}");
                }
            }
        }
        println!("\nSaved: {}", report.json_path.display());
        if let Some(summary) = &report.summary_path {
            println!("Saved: {}", summary.display());
        }
    }

    if report.is_degraded() {
        eprintln!(
            "warning: degraded roles: {}",
            report.degraded.join(", ")
        );
        return Ok(crate::Outcome::Degraded);
    }
    Ok(crate::Outcome::Done)
}
