use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir()
            .join(format!("ore-cli-{prefix}-{}-{unique}", std::process::id()));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_ore<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_ore"))
        .args(args)
        .output()
        .expect("ore command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) -> String {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout),
        );
    }
    assert_eq!(output.status.code(), Some(1));
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not json: {e}\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

const PATH2: &str = r#"{
  "name": "path2",
  "objects": ["A", "B", "C"],
  "arrows": [
    { "name": "f", "source": "A", "target": "B" },
    { "name": "g", "source": "B", "target": "C" },
    { "name": "h", "source": "A", "target": "C" }
  ],
  "compositions": [{ "after": "g", "before": "f", "result": "h" }]
}"#;

#[test]
fn toys_lists_every_category() {
    let output = run_ore(["toys", "--json"]);
    assert_success(&output);
    let toys = parse_json_stdout(&output);
    let names: Vec<&str> = toys
        .as_array()
        .expect("array")
        .iter()
        .map(|t| t["name"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&"walking_arrow"));
    assert!(names.contains(&"cospan"));
    assert_eq!(names.len(), 6);
}

#[test]
fn toy_inverts_every_arrow_by_default() {
    let output = run_ore(["toy", "walking_arrow", "--json"]);
    assert_success(&output);
    let summary = parse_json_stdout(&output);
    assert_eq!(summary["category"], "walking_arrow[S⁻¹]");
    assert_eq!(summary["arrows"].as_array().map(Vec::len), Some(4));
    assert_eq!(summary["diagnostics"]["holds"], true);
    assert!(
        summary["fingerprint"]
            .as_str()
            .is_some_and(|f| f.starts_with("sha256:"))
    );
}

#[test]
fn toy_text_output_lists_obstructions() {
    let output = run_ore(["toy", "cospan"]);
    assert_success(&output);
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.starts_with("ore toy cospan"));
    assert!(text.contains("Ore condition: no"));
    assert!(text.contains("Lawful: no"));
    assert!(text.contains("Ore obstructions:"));
}

#[test]
fn localize_reads_category_json() {
    let dir = TempDirGuard::new("localize");
    let path = dir.path().join("path2.json");
    fs::write(&path, PATH2).expect("write category");

    let output = run_ore([
        OsStr::new("localize"),
        path.as_os_str(),
        OsStr::new("-d"),
        OsStr::new("id_A"),
        OsStr::new("-d"),
        OsStr::new("id_B"),
        OsStr::new("-d"),
        OsStr::new("id_C"),
        OsStr::new("-d"),
        OsStr::new("g"),
        OsStr::new("--json"),
    ]);
    assert_success(&output);
    let summary = parse_json_stdout(&output);
    assert_eq!(summary["arrows"].as_array().map(Vec::len), Some(7));
    assert_eq!(summary["diagnostics"]["holds"], true);
    assert_eq!(summary["functor"]["holds"], true);
}

#[test]
fn config_can_skip_the_ore_check() {
    let dir = TempDirGuard::new("config");
    let config = dir.path().join("options.toml");
    fs::write(&config, "check-ore = false\ndocumentation = [\"smoke\"]\n")
        .expect("write config");

    let output = run_ore([
        OsStr::new("toy"),
        OsStr::new("cospan"),
        OsStr::new("--config"),
        config.as_os_str(),
    ]);
    assert_success(&output);
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Ore condition: skipped"));
    assert!(text.contains("Lawful: yes"));
}

#[test]
fn missing_inputs_exit_with_error() {
    let stderr = assert_failure(&run_ore(["localize", "/nonexistent/ore/category.json", "--all"]));
    assert!(stderr.starts_with("error: failed to read"));

    let stderr = assert_failure(&run_ore(["toy", "no_such_toy"]));
    assert!(stderr.contains("unknown toy category"));

    let stderr = assert_failure(&run_ore(["toy", "walking_arrow", "-d", "k"]));
    assert!(stderr.contains("arrow not found"));
}

#[test]
fn localize_requires_denominators() {
    let dir = TempDirGuard::new("no-denominators");
    let path = dir.path().join("path2.json");
    fs::write(&path, PATH2).expect("write category");

    let stderr = assert_failure(&run_ore([OsStr::new("localize"), path.as_os_str()]));
    assert!(stderr.contains("no denominators given"));
}
