use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::warn;

use crate::error::ProviderError;
use crate::provider::gh::run_captured;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncState {
    InSync,
    Ahead(u32),
    Behind(u32),
    Diverged { ahead: u32, behind: u32 },
    NoUpstream,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchStatus {
    /// `None` for a detached HEAD.
    pub branch: Option<String>,
    pub sync: SyncState,
    pub dirty: usize,
}

pub struct RepoReport {
    pub name: String,
    pub result: Result<BranchStatus, ProviderError>,
}

/// Parses `git status --porcelain=v1 --branch`.
pub fn parse_porcelain(output: &str) -> BranchStatus {
    let mut lines = output.lines();
    let header = lines
        .next()
        .and_then(|line| line.strip_prefix("## "))
        .unwrap_or("");
    let dirty = lines.filter(|line| !line.trim().is_empty()).count();
    let (branch, sync) = parse_branch_header(header);
    BranchStatus {
        branch,
        sync,
        dirty,
    }
}

fn parse_branch_header(header: &str) -> (Option<String>, SyncState) {
    if header.starts_with("HEAD (no branch)") {
        return (None, SyncState::NoUpstream);
    }
    if let Some(branch) = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
    {
        return (Some(branch.to_string()), SyncState::NoUpstream);
    }

    let (refs, tracking) = match header.split_once(" [") {
        Some((refs, rest)) => (refs, rest.trim_end_matches(']')),
        None => (header, ""),
    };
    let Some((branch, _upstream)) = refs.split_once("...") else {
        return (Some(refs.to_string()), SyncState::NoUpstream);
    };
    let branch = Some(branch.to_string());
    if tracking == "gone" {
        return (branch, SyncState::NoUpstream);
    }

    let mut ahead = 0;
    let mut behind = 0;
    for part in tracking.split(", ").filter(|p| !p.is_empty()) {
        if let Some(n) = part.strip_prefix("ahead ") {
            ahead = n.parse().unwrap_or(0);
        } else if let Some(n) = part.strip_prefix("behind ") {
            behind = n.parse().unwrap_or(0);
        }
    }
    let sync = match (ahead, behind) {
        (0, 0) => SyncState::InSync,
        (a, 0) => SyncState::Ahead(a),
        (0, b) => SyncState::Behind(b),
        (a, b) => SyncState::Diverged {
            ahead: a,
            behind: b,
        },
    };
    (branch, sync)
}

/// Git checkouts directly under `root`, sorted by name.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("failed to read projects root {}", root.display()))?;
    let mut repos: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.join(".git").exists())
        .collect();
    repos.sort();
    Ok(repos)
}

pub fn inspect(git_program: &str, repo: &Path, fetch: bool) -> Result<BranchStatus, ProviderError> {
    if fetch {
        let fetched = run_captured(
            Command::new(git_program)
                .args(["fetch", "--quiet"])
                .current_dir(repo),
            git_program,
        );
        if let Err(err) = fetched {
            warn!(repo = %repo.display(), error = %err, "git fetch failed");
        }
    }
    let output = run_captured(
        Command::new(git_program)
            .args(["status", "--porcelain=v1", "--branch"])
            .current_dir(repo),
        git_program,
    )?;
    Ok(parse_porcelain(&String::from_utf8_lossy(&output.stdout)))
}

pub fn collect(git_program: &str, root: &Path, fetch: bool) -> Result<Vec<RepoReport>> {
    Ok(discover(root)?
        .into_iter()
        .map(|path| RepoReport {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            result: inspect(git_program, &path, fetch),
        })
        .collect())
}

pub fn describe(status: &BranchStatus) -> String {
    let sync = match &status.sync {
        SyncState::InSync => "in sync".to_string(),
        SyncState::Ahead(n) => format!("ahead {n}"),
        SyncState::Behind(n) => format!("behind {n}"),
        SyncState::Diverged { ahead, behind } => format!("diverged (+{ahead}/-{behind})"),
        SyncState::NoUpstream => "no upstream".to_string(),
    };
    let branch = status.branch.as_deref().unwrap_or("(detached)");
    if status.dirty > 0 {
        format!("{branch}: {sync}, {} changed", status.dirty)
    } else {
        format!("{branch}: {sync}")
    }
}

pub fn run(git_program: &str, root: &Path, fetch: bool) -> Result<()> {
    let reports = collect(git_program, root, fetch)?;
    if reports.is_empty() {
        println!("No repositories under {}", root.display());
        return Ok(());
    }

    let width = reports.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let mut attention = 0;
    for report in &reports {
        let name = format!("{:width$}", report.name);
        match &report.result {
            Ok(status) => {
                let text = describe(status);
                let clean = status.sync == SyncState::InSync && status.dirty == 0;
                if clean {
                    println!("{}  {}", name.bold(), text.green());
                } else {
                    attention += 1;
                    println!("{}  {}", name.bold(), text.yellow());
                }
            }
            Err(err) => {
                attention += 1;
                println!("{}  {}", name.bold(), format!("error: {err}").red());
            }
        }
    }
    println!();
    println!(
        "{} repositories, {} need attention",
        reports.len(),
        attention
    );
    Ok(())
}
