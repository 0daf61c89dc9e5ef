use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Bare-metal target the library crates must keep building for.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

const LIB_CRATES: [&str; 2] = ["codec-platform", "codec-dev"];

struct Step {
    label: &'static str,
    args: Vec<&'static str>,
    /// Report failure without aborting the run.
    advisory: bool,
}

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking codec crates...".cyan().bold());
    println!();

    let total_start = Instant::now();

    let mut steps = vec![Step {
        label: "host build (std + tracing)",
        args: vec!["check", "--workspace", "--features", "codec-dev/std,codec-dev/tracing"],
        advisory: false,
    }];
    for krate in LIB_CRATES {
        steps.push(Step {
            label: if krate == "codec-platform" {
                "codec-platform (no_std)"
            } else {
                "codec-dev (no_std)"
            },
            args: vec!["check", "-p", krate, "--target", EMBEDDED_TARGET, "--no-default-features"],
            advisory: false,
        });
    }
    steps.push(Step {
        label: "codec-dev (no_std + defmt)",
        args: vec!["check", "-p", "codec-dev", "--target", EMBEDDED_TARGET, "--features", "defmt"],
        advisory: false,
    });
    steps.push(Step {
        label: "clippy",
        args: vec!["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        advisory: true,
    });
    steps.push(Step {
        label: "formatting",
        args: vec!["fmt", "--all", "--check"],
        advisory: true,
    });

    for step in &steps {
        run_step(step)?;
    }

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

fn run_step(step: &Step) -> Result<()> {
    println!("{}", format!("  Checking {}...", step.label).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(&step.args)
        .output()
        .with_context(|| format!("Failed to run cargo for {}", step.label))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {} passed in {:.2}s", step.label, start.elapsed().as_secs_f64()).green()
        );
    } else if step.advisory {
        eprintln!("{}", format!("  ⚠ {} reported problems", step.label).yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    } else {
        eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{} failed", step.label);
    }
    println!();
    Ok(())
}
