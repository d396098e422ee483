use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::orchestrator::CloneExecutor;
use crate::error::ProviderError;

/// Source of repositories that could be cloned.
pub trait RepoDirectory {
    fn list_candidates(&self) -> Result<Vec<String>, ProviderError>;
}

#[derive(Deserialize)]
struct RepoEntry {
    name: String,
}

/// Lists the account's repositories through the GitHub CLI and drops those
/// already checked out under the projects root.
pub struct GhRepoDirectory {
    program: String,
    owner: Option<String>,
    limit: usize,
    projects_root: PathBuf,
}

impl GhRepoDirectory {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.gh_program.clone(),
            owner: config.github_owner.clone(),
            limit: config.list_limit,
            projects_root: config.projects_root_path(),
        }
    }

    fn list_args(&self) -> Vec<String> {
        let mut args = vec!["repo".to_string(), "list".to_string()];
        if let Some(owner) = &self.owner {
            args.push(owner.clone());
        }
        args.extend([
            "--limit".to_string(),
            self.limit.to_string(),
            "--json".to_string(),
            "name".to_string(),
        ]);
        args
    }
}

impl RepoDirectory for GhRepoDirectory {
    fn list_candidates(&self) -> Result<Vec<String>, ProviderError> {
        let output = run_captured(Command::new(&self.program).args(self.list_args()), &self.program)?;
        let remote = parse_repo_list(&output.stdout).map_err(|source| ProviderError::Output {
            program: self.program.clone(),
            source,
        })?;
        let existing = existing_entries(&self.projects_root)?;
        let candidates = filter_candidates(remote, &existing);
        info!(
            candidates = candidates.len(),
            existing = existing.len(),
            "listed repositories"
        );
        Ok(candidates)
    }
}

pub fn parse_repo_list(json: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<RepoEntry> = serde_json::from_slice(json)?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.name)
        .filter(|name| !name.is_empty())
        .collect())
}

/// Names of everything directly under `root`. A root that does not exist yet
/// has no entries.
pub fn existing_entries(root: &Path) -> Result<HashSet<String>, ProviderError> {
    let read_error = |source: io::Error| ProviderError::ProjectsRoot {
        path: root.to_path_buf(),
        source,
    };
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(err) => return Err(read_error(err)),
    };
    let mut names = HashSet::new();
    for entry in entries {
        let entry = entry.map_err(read_error)?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

pub fn filter_candidates(remote: Vec<String>, existing: &HashSet<String>) -> Vec<String> {
    remote
        .into_iter()
        .filter(|name| !existing.contains(name))
        .collect()
}

/// Clones with `gh repo clone`. Output is captured so it never reaches the
/// terminal UI; failures are logged and reported as `false`.
pub struct GhCloneExecutor {
    program: String,
    owner: Option<String>,
}

impl GhCloneExecutor {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.gh_program.clone(),
            owner: config.github_owner.clone(),
        }
    }

    pub fn repository_arg(&self, identifier: &str) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}/{identifier}"),
            None => identifier.to_string(),
        }
    }
}

impl CloneExecutor for GhCloneExecutor {
    fn clone_repo(&self, identifier: &str, destination: &Path) -> bool {
        let repository = self.repository_arg(identifier);
        let mut command = Command::new(&self.program);
        command
            .args(["repo", "clone", repository.as_str()])
            .arg(destination);
        match run_captured(&mut command, &self.program) {
            Ok(_) => {
                debug!(repo = %repository, "gh repo clone succeeded");
                true
            }
            Err(err) => {
                warn!(repo = %repository, error = %err, "gh repo clone failed");
                false
            }
        }
    }
}

/// Runs a command with no stdin and captured output; a non-zero exit is an
/// error carrying stderr.
pub(crate) fn run_captured(command: &mut Command, program: &str) -> Result<Output, ProviderError> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ProviderError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(ProviderError::Failed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
