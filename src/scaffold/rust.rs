use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use toml::{Table, Value};

use crate::testgen::item_name::to_crate_name;

const GITIGNORE: &str = "# Generated by init-exercise
# will have compiled files and executables
/target/
**/*.rs.bk

# This is a library, so Cargo.lock stays out of version control
Cargo.lock
";

const EXAMPLE_RS: &str = "//! Example implementation
//!
//! - Implement the solution to your exercise here.
//! - Put the stubs for any tested functions in `src/lib.rs`,
//!   whose variable names are `_` and
//!   whose contents are `unimplemented!()`.
//! - If your example implementation has dependencies, copy
//!   `Cargo.toml` into `Cargo-example.toml` and then make
//!   any modifications necessary to the latter so your example will run.
//! - Test your example by running `../../bin/test-exercise`
";

pub const MAPLIT_VERSION: &str = "1.0";

pub fn tests_path(exercise_dir: &Path, exercise: &str) -> PathBuf {
    exercise_dir.join("tests").join(format!("{exercise}.rs"))
}

/// Turn a fresh `cargo new --lib` crate into an exercise skeleton and return
/// the path of its test file.
pub fn write_skeleton(exercise_dir: &Path, exercise: &str, use_maplit: bool) -> Result<PathBuf> {
    std::fs::write(exercise_dir.join(".gitignore"), GITIGNORE)
        .context("Failed to write .gitignore")?;

    // Students start from an empty lib.rs
    let lib_rs = exercise_dir.join("src").join("lib.rs");
    std::fs::write(&lib_rs, "")
        .with_context(|| format!("Failed to truncate {}", lib_rs.display()))?;

    std::fs::write(exercise_dir.join("example.rs"), EXAMPLE_RS)
        .context("Failed to write example.rs")?;

    if use_maplit {
        edit_manifest(exercise_dir, |manifest| {
            let deps = manifest
                .entry("dependencies")
                .or_insert(Value::Table(Table::new()));
            if let Value::Table(deps) = deps {
                deps.insert("maplit".into(), Value::String(MAPLIT_VERSION.into()));
            }
        })?;
    }

    let tests_dir = exercise_dir.join("tests");
    std::fs::create_dir_all(&tests_dir)
        .with_context(|| format!("Failed to create {}", tests_dir.display()))?;

    let mut src = String::new();
    if use_maplit {
        src.push_str("use maplit::hashmap;\n");
    }
    src.push_str(&format!("use {}::*;\n\n", to_crate_name(exercise)));

    let tests = tests_path(exercise_dir, exercise);
    std::fs::write(&tests, src)
        .with_context(|| format!("Failed to write {}", tests.display()))?;
    Ok(tests)
}

/// Align the package name with the exercise and, when the canonical data
/// carries one, the package version with the data's version.
pub fn update_package(exercise_dir: &Path, exercise: &str, version: Option<&str>) -> Result<()> {
    edit_manifest(exercise_dir, |manifest| {
        if let Some(Value::Table(package)) = manifest.get_mut("package") {
            package.insert("name".into(), Value::String(to_crate_name(exercise)));
            if let Some(version) = version {
                package.insert("version".into(), Value::String(version.into()));
            }
        }
    })
}

fn edit_manifest(exercise_dir: &Path, edit: impl FnOnce(&mut Table)) -> Result<()> {
    let path = exercise_dir.join("Cargo.toml");
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut manifest: Table = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    edit(&mut manifest);

    let contents = toml::to_string(&manifest).context("Failed to serialize Cargo.toml")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
