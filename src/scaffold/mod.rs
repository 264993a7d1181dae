pub mod rust;

use anyhow::{Context, Result, bail};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::types::CanonicalData;
use crate::testgen::{self, literal::MapStyle};
use crate::tools;

/// Canonical data for an exercise together with where it came from.
pub struct Specification<'a> {
    pub data: &'a CanonicalData,
    pub url: &'a str,
}

pub fn exercise_dir(track: &Path, exercise: &str) -> PathBuf {
    track.join("exercises").join(exercise)
}

/// Create `exercises/<exercise>` in the track and fill it in. Returns the
/// path of the generated test file.
pub fn scaffold_exercise(
    track: &Path,
    exercise: &str,
    spec: Option<&Specification>,
    map_style: MapStyle,
) -> Result<PathBuf> {
    let dir = exercise_dir(track, exercise);
    if dir.exists() {
        bail!("{} already exists; aborting", dir.display());
    }

    info!(path = %dir.display(), "generating a new exercise");
    std::fs::create_dir_all(track.join("exercises"))
        .context("Failed to create the exercises directory")?;
    tools::cargo_new_lib(&dir)?;

    let tests = populate(&dir, exercise, spec, map_style)?;
    if spec.is_some() {
        tools::rustfmt(&tests)?;
    }
    Ok(tests)
}

/// Everything after `cargo new`: skeleton files, then either the generated
/// suite or the hand-written template.
pub fn populate(
    dir: &Path,
    exercise: &str,
    spec: Option<&Specification>,
    map_style: MapStyle,
) -> Result<PathBuf> {
    let tests = rust::write_skeleton(dir, exercise, map_style == MapStyle::Maplit)?;

    match spec {
        Some(spec) => {
            info!("Generating tests from canonical data");
            write_generated_tests(dir, &tests, exercise, spec, map_style)?;
        }
        None => {
            info!(
                exercise,
                "No canonical data found. Generating standard exercise template."
            );
            write_default_meta(dir, &tests, exercise)?;
        }
    }
    Ok(tests)
}

fn write_generated_tests(
    dir: &Path,
    tests: &Path,
    exercise: &str,
    spec: &Specification,
    map_style: MapStyle,
) -> Result<()> {
    // Render first: a bad case must not leave a half-written file behind.
    let suite = testgen::generate_suite(spec.data, map_style)
        .with_context(|| format!("Failed to generate tests for {exercise}"))?;

    rust::update_package(dir, exercise, spec.data.version.as_deref())?;

    let existing = std::fs::read_to_string(tests)
        .with_context(|| format!("Failed to read {}", tests.display()))?;
    let mut src = testgen::suite_header(exercise, spec.data, spec.url);
    src.push_str(&existing);
    src.push_str(&suite);

    std::fs::write(tests, src).with_context(|| format!("Failed to write {}", tests.display()))?;
    Ok(())
}

fn write_default_meta(dir: &Path, tests: &Path, exercise: &str) -> Result<()> {
    let meta = dir.join(".meta");
    std::fs::create_dir_all(&meta)
        .with_context(|| format!("Failed to create {}", meta.display()))?;

    std::fs::write(
        meta.join("description.md"),
        "Describe your exercise here.\n\n\
         Don't forget that `README.md` is automatically generated; update this within `.meta/description.md`.\n",
    )
    .context("Failed to write .meta/description.md")?;

    std::fs::write(
        meta.join("metadata.yml"),
        format!("---\nblurb: \"{exercise}\"\nsource: \"\"\nsource_url: \"\"\n"),
    )
    .context("Failed to write .meta/metadata.yml")?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(tests)
        .with_context(|| format!("Failed to open {}", tests.display()))?;
    file.write_all(b"// Add your tests here\n")
        .with_context(|| format!("Failed to write {}", tests.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgen::GenerateError;
    use pretty_assertions::assert_eq;
    use rust::tests::fake_cargo_new;
    use serde_json::json;

    fn data(value: serde_json::Value) -> CanonicalData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn generated_test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        fake_cargo_new(dir.path(), "reverse-string");
        let data = data(json!({
            "exercise": "reverse-string",
            "version": "1.1.0",
            "cases": [
                {"description": "a word", "property": "reverse", "input": {"value": "robot"}, "expected": "tobor"},
                {"description": "a palindrome", "property": "reverse", "input": {"value": "racecar"}, "expected": "racecar"}
            ]
        }));
        let spec = Specification {
            data: &data,
            url: "https://example.test/reverse-string/canonical-data.json",
        };

        let tests = populate(dir.path(), "reverse-string", Some(&spec), MapStyle::Maplit).unwrap();
        let src = std::fs::read_to_string(&tests).unwrap();

        assert!(src.starts_with("//! Tests for reverse-string\n"));
        let header_end = src.find("\n\n\nuse maplit::hashmap;\nuse reverse_string::*;\n\n").unwrap();
        let stub = src.find("fn process_reverse_case").unwrap();
        assert!(header_end < stub);
        assert!(src.ends_with(
            "#[test]\n\
             #[ignore]\n\
             /// a palindrome\n\
             fn test_a_palindrome() {\n    \
             process_reverse_case(hashmap!{\"value\"=>\"racecar\"}, \"racecar\");\n\
             }\n\
             \n"
        ));

        let manifest = std::fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"reverse_string\""));
        assert!(manifest.contains("version = \"1.1.0\""));
        assert!(!dir.path().join(".meta").exists());
    }

    #[test]
    fn template_without_canonical_data() {
        let dir = tempfile::tempdir().unwrap();
        fake_cargo_new(dir.path(), "paasio");

        let tests = populate(dir.path(), "paasio", None, MapStyle::Insert).unwrap();

        assert_eq!(
            std::fs::read_to_string(&tests).unwrap(),
            "use paasio::*;\n\n// Add your tests here\n"
        );
        let metadata = std::fs::read_to_string(dir.path().join(".meta/metadata.yml")).unwrap();
        assert_eq!(metadata, "---\nblurb: \"paasio\"\nsource: \"\"\nsource_url: \"\"\n");
        assert!(dir.path().join(".meta/description.md").exists());
    }

    #[test]
    fn generation_failure_leaves_test_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fake_cargo_new(dir.path(), "bowling");
        let data = data(json!({
            "version": "9.9.9",
            "cases": [{"description": "!!!", "property": "score", "input": {}, "expected": 0}]
        }));
        let spec = Specification { data: &data, url: "u" };

        let err = populate(dir.path(), "bowling", Some(&spec), MapStyle::Insert).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::EmptyItemName { .. })
        ));
        let tests = rust::tests_path(dir.path(), "bowling");
        assert_eq!(std::fs::read_to_string(tests).unwrap(), "use bowling::*;\n\n");
        let manifest = std::fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(!manifest.contains("9.9.9"));
    }

    #[test]
    fn existing_exercise_is_refused() {
        let track = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(exercise_dir(track.path(), "grep")).unwrap();

        let err = scaffold_exercise(track.path(), "grep", None, MapStyle::Insert).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
