// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Catalog command - browse built-in components

use colored::Colorize;
use miette::Result;

use super::CatalogAction;
use crate::pipeline::{catalog, ComponentKind};
use crate::utils::{print_bullet, print_header, print_section};

/// Run the catalog command
pub async fn run(action: CatalogAction, _verbose: bool) -> Result<()> {
    match action {
        CatalogAction::List { kind } => list(kind),
        CatalogAction::Show { id } => show(&id),
    }
}

fn list(kind: Option<String>) -> Result<()> {
    let entries: Vec<&catalog::CatalogEntry> = match kind {
        Some(kind) => {
            let kind = ComponentKind::from(kind.to_lowercase());
            if kind.is_unknown() {
                return Err(miette::miette!(
                    "Unknown component kind: '{}'\n\nKinds: {}",
                    kind,
                    ComponentKind::RECOGNIZED
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            catalog::by_kind(&kind).collect()
        }
        None => catalog::entries().iter().collect(),
    };

    for entry in entries {
        println!(
            "  {} {:<22} {:<16} {}",
            entry.icon,
            entry.id.bold(),
            entry.kind.as_str().cyan(),
            entry.display_name
        );
    }

    Ok(())
}

fn show(id: &str) -> Result<()> {
    let entry = catalog::require(id)?;

    print_header(&format!("{} {}", entry.icon, entry.display_name));
    println!("{}", entry.description);
    println!();
    println!("  Id:   {}", entry.id);
    println!("  Kind: {}", entry.kind);

    print_section("Agent");
    println!("  {} ({})", entry.agent.name.bold(), entry.agent.role);
    println!("  {}", format!("\"{}\"", entry.agent.quote).dimmed());

    if !entry.dependencies.is_empty() {
        print_section("Dependencies");
        for dep in entry.dependencies {
            print_bullet(dep);
        }
    }

    if !entry.environments.is_empty() {
        print_section("Environments");
        for env in entry.environments {
            print_bullet(env);
        }
    }

    if !entry.alternatives.is_empty() {
        print_section("Alternatives");
        for alt in entry.alternatives.iter().filter_map(|id| catalog::get(id)) {
            print_bullet(&format!("{} ({})", alt.display_name, alt.id));
        }
    }

    Ok(())
}
