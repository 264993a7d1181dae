//! External commands: cargo, git and configlet.
//!
//! Every command runs to completion before the next one starts, and a
//! non-zero exit aborts the run.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

pub const PROBLEM_SPECIFICATIONS_GIT: &str = "https://github.com/exercism/problem-specifications.git";

/// Run `cmd` in `dir` and return its trimmed stdout.
pub fn run(cmd: &mut Command, dir: &Path) -> Result<String> {
    let shown = format!("{cmd:?}");
    debug!(command = %shown, dir = %dir.display(), "running");

    let output = cmd
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to run {shown}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{shown} failed ({}): {}", output.status, stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn git(dir: &Path, args: &[&str]) -> Result<String> {
    run(Command::new("git").args(args), dir)
}

pub fn track_root_from_git(dir: &Path) -> Result<PathBuf> {
    let root = git(dir, &["rev-parse", "--show-toplevel"])
        .context("Not inside a git checkout of the track; pass --track-dir")?;
    Ok(PathBuf::from(root))
}

/// Format a generated source file in place.
pub fn rustfmt(file: &Path) -> Result<()> {
    let dir = file.parent().unwrap_or(Path::new("."));
    run(Command::new("rustfmt").arg("--edition").arg("2021").arg(file), dir)
        .with_context(|| format!("Failed to format {}", file.display()))?;
    Ok(())
}

pub fn cargo_new_lib(path: &Path) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    run(Command::new("cargo").arg("new").arg("--lib").arg(path), parent)?;
    Ok(())
}

/// Puts a checkout on an up to date `master` and puts it back on drop.
pub struct GitMaster {
    dir: PathBuf,
    branch: String,
    stashed: bool,
}

impl GitMaster {
    pub fn enter(dir: &Path) -> Result<Self> {
        let stashed = !git(dir, &["status", "--porcelain"])?.is_empty();
        if stashed {
            git(dir, &["stash"])?;
        }
        let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        if branch != "master" {
            git(dir, &["checkout", "master"])?;
        }
        git(dir, &["pull"])?;

        Ok(Self {
            dir: dir.to_path_buf(),
            branch,
            stashed,
        })
    }
}

impl Drop for GitMaster {
    fn drop(&mut self) {
        if self.branch != "master" {
            if let Err(e) = git(&self.dir, &["checkout", &self.branch]) {
                warn!(error = %e, branch = %self.branch, "could not restore branch");
            }
        }
        if self.stashed {
            if let Err(e) = git(&self.dir, &["stash", "pop"]) {
                warn!(error = %e, "could not restore stashed changes");
            }
        }
    }
}

/// Locate the configlet binary, fetching it once if the track has none.
pub fn find_configlet(track: &Path, configured: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(PathBuf::from(path));
    }

    let candidates = || {
        ["configlet", "configlet.exe"]
            .into_iter()
            .map(|name| track.join("bin").join(name))
            .find(|path| path.exists())
    };

    if let Some(path) = candidates() {
        return Ok(path);
    }

    info!("configlet not found, running bin/fetch-configlet");
    run(&mut Command::new(track.join("bin").join("fetch-configlet")), track)?;

    candidates().context("Could not locate configlet after bin/fetch-configlet")
}

/// `configlet generate` for one exercise. With `with_specifications` the
/// README is built from a `problem-specifications` checkout next to the track.
pub fn generate_readme(
    track: &Path,
    configlet: &Path,
    exercise: &str,
    with_specifications: bool,
) -> Result<()> {
    info!(exercise, "generating README via configlet");

    if !with_specifications {
        run(
            Command::new(configlet).args(["generate", ".", "--only", exercise]),
            track,
        )?;
        return Ok(());
    }

    let spec_path = track.join("..").join("problem-specifications");
    let _master = if spec_path.exists() {
        Some(GitMaster::enter(&spec_path)?)
    } else {
        info!(url = PROBLEM_SPECIFICATIONS_GIT, "cloning problem-specifications");
        let parent = track.join("..");
        run(
            Command::new("git").args(["clone", PROBLEM_SPECIFICATIONS_GIT]),
            &parent,
        )?;
        None
    };

    run(
        Command::new(configlet)
            .args(["generate", ".", "--only", exercise, "--spec-path"])
            .arg(&spec_path),
        track,
    )?;
    Ok(())
}
