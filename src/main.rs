// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI entry point for bind-engine
//!
//! Provides a command-line interface for inspecting the control table,
//! checking bind profiles for conflicts, listing binds, and replaying
//! recorded input through the engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bind_engine::config::load_profile;
use bind_engine::core::parser::parse_script;
use bind_engine::core::{
    BindEventKind, BindRegistry, Control, ControlId, ControlRegistry, ControlSample, GroupId,
    Tick,
};

#[derive(Parser)]
#[command(name = "bind-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every bindable control
    Controls,

    /// Check a bind profile for conflicting combos
    Check {
        /// Path to the JSON bind profile
        #[arg(short, long)]
        profile: PathBuf,
    },

    /// List all binds in a profile
    List {
        /// Path to the JSON bind profile
        #[arg(short, long)]
        profile: PathBuf,
    },

    /// Replay an input script and print bind transitions
    Simulate {
        /// Path to the JSON bind profile
        #[arg(short, long)]
        profile: PathBuf,

        /// Path to the input script
        #[arg(short, long)]
        script: PathBuf,

        /// Load the profile even if combos conflict
        #[arg(long)]
        allow_conflicts: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Controls => list_controls(),
        Commands::Check { profile } => check_conflicts(&profile)?,
        Commands::List { profile } => list_binds(&profile)?,
        Commands::Simulate {
            profile,
            script,
            allow_conflicts,
        } => simulate(&profile, &script, !allow_conflicts)?,
    }

    Ok(())
}

/// Console logging, filtered by RUST_LOG (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter),
        )
        .init();
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let raw = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?;
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Load a profile into a fresh registry
fn load_registry(profile_path: &Path, strict: bool) -> anyhow::Result<(BindRegistry, Vec<GroupId>)> {
    let path = expand_path(profile_path)?;
    println!("{} Loading profile: {}", "→".cyan(), path.display());

    let profile = load_profile(&path)?;
    let mut registry = BindRegistry::with_config(profile.settings.clone());
    let groups = profile.apply(&mut registry, strict)?;

    Ok((registry, groups))
}

fn group_label(registry: &BindRegistry, id: GroupId) -> String {
    format!(
        "{}/{}",
        registry.client_name(id.client()),
        registry.group(id).name()
    )
}

fn combo_label(controls: &ControlRegistry, ids: &[ControlId]) -> String {
    ids.iter()
        .map(|id| controls.control(*id).display_name())
        .collect::<Vec<_>>()
        .join("+")
}

/// Print the bindable control table
fn list_controls() {
    let controls = ControlRegistry::new();
    println!("{}", "Bindable controls\n".bold());

    for control in controls.bindable_controls() {
        let kind = if control.is_analog() {
            "analog".magenta()
        } else {
            "digital".dimmed()
        };
        println!(
            "{:>4}  {:<20} {:<20} {}",
            control.index(),
            control.name().cyan(),
            control.display_name(),
            kind
        );
    }

    println!(
        "\n{} {} bindable controls",
        "Total:".bold(),
        controls.bindable_controls().count()
    );
}

/// Check a profile for exact-match conflicts
fn check_conflicts(profile_path: &Path) -> anyhow::Result<()> {
    let (registry, groups) = load_registry(profile_path, false)?;
    let controls = registry.controls();

    let mut total = 0;
    for id in groups {
        let group = registry.group(id);
        let conflicts = group.find_conflicts();
        if conflicts.is_empty() {
            continue;
        }

        for conflict in &conflicts {
            total += 1;
            println!(
                "{} {} in {}",
                format!("Conflict {}", total).yellow().bold(),
                combo_label(controls, &conflict.controls).cyan(),
                group_label(&registry, id)
            );

            for (idx, bind) in conflict.binds.iter().enumerate() {
                println!(
                    "  {} {}",
                    format!("{}.", idx + 1).dimmed(),
                    group.bind(*bind).name().magenta()
                );
            }
            println!();
        }
    }

    if total == 0 {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
    } else {
        println!(
            "{} Found {} conflict{}",
            "✗".red().bold(),
            total,
            if total == 1 { "" } else { "s" }
        );
        println!("{}", "⚠ Only one of each conflicting set can ever fire!".yellow());
        std::process::exit(1);
    }

    Ok(())
}

/// List every bind with its combos
fn list_binds(profile_path: &Path) -> anyhow::Result<()> {
    let (registry, groups) = load_registry(profile_path, false)?;
    let controls = registry.controls();
    let mut total = 0;

    for id in groups {
        println!("\n{}", group_label(&registry, id).bold());
        let group = registry.group(id);

        for bind in group.binds() {
            total += 1;
            let combos = group
                .bind_combos(bind.id())
                .map(|combo| {
                    if combo.is_empty() {
                        "(unbound)".dimmed().to_string()
                    } else {
                        combo_label(controls, combo.controls()).cyan().bold().to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");

            println!("  {} → {}", bind.name().green(), combos);
        }
    }

    println!("\n{} {} binds", "Total:".bold(), total);
    Ok(())
}

/// Replay an input script frame by frame
fn simulate(profile_path: &Path, script_path: &Path, strict: bool) -> anyhow::Result<()> {
    let (mut registry, groups) = load_registry(profile_path, strict)?;

    let script_path = expand_path(script_path)?;
    let content = fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script: {}", script_path.display()))?;
    let frames = parse_script(&content)?;

    println!(
        "{} Replaying {} frames from {}\n",
        "→".cyan(),
        frames.len(),
        script_path.display()
    );

    let mut transitions = 0;
    for (number, frame) in frames.iter().enumerate() {
        let samples = frame.resolve(registry.controls())?;
        let mut source = |control: &Control| {
            samples
                .iter()
                .find(|(id, _)| id.index() == control.index())
                .map(|(_, sample)| *sample)
                .unwrap_or_else(ControlSample::released)
        };

        let tick = Tick::from_millis(number as u64 + 1, frame.elapsed_ms);
        registry.poll_and_update(&mut source, tick);

        for &id in &groups {
            let group = registry.group(id);
            for event in group.events() {
                transitions += 1;
                let bind = group.bind(event.bind);
                let kind = match event.kind {
                    BindEventKind::NewPress => event.kind.to_string().green(),
                    BindEventKind::Held => event.kind.to_string().yellow(),
                    BindEventKind::Released => event.kind.to_string().red(),
                };
                let analog = if bind.analog_value() != 0.0 {
                    format!(" ({:.2})", bind.analog_value())
                } else {
                    String::new()
                };

                println!(
                    "{} {} {} {}{}",
                    format!("[{:>6}ms]", frame.elapsed_ms).dimmed(),
                    group_label(&registry, id),
                    bind.name().bold(),
                    kind,
                    analog
                );
            }
        }
    }

    println!("\n{} {} transitions", "Total:".bold(), transitions);
    Ok(())
}
