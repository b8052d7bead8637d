//! Integration tests for non-interactive mode (--output, --list, --stats)

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const YOUTH_CSV: &str = "\
First Name,Last Name,Gender,Nationality,Age,Degree,Qualification,Email,Status
Amara,Okafor,Female,Nigeria,24,BSc,Engineering,amara@example.org,Active
Kofi,Mensah,Male,Ghana,31,MBA,Finance,kofi@example.org,Alumni
Awa,Diop,Female,Senegal,19,BA,Law,awa@example.org,Active
Thabo,Nkosi,Male,South Africa,27,BSc,Geology,thabo@example.org,Active
";

struct Fixture {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        // Tests must not depend on the user's config or write to their data dir.
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[logging]\nlevel = \"debug\"\ndirectory = {:?}\n",
                dir.path().join("logs")
            ),
        )
        .expect("Failed to write config");
        Fixture { dir, config }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write input");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_cohort"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .expect("Failed to execute command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code().unwrap_or(-1);

        (stdout, stderr, exit_code)
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn test_export_filtered_csv() {
    let fx = Fixture::new();
    let input = fx.write("youth.csv", YOUTH_CSV);
    let output = fx.path("females.csv");

    let (stdout, stderr, code) = fx.run(&[
        arg(&input),
        "--filter",
        "gender=Female",
        "--sort",
        "age",
        "-o",
        arg(&output),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Exported 2 records"));

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "First Name,Last Name,Gender,Nationality,Age,Degree,Qualification,Email,Status"
    );
    // Dataset order, not sort order
    assert!(lines[1].starts_with("\"Amara\""));
    assert!(lines[2].starts_with("\"Awa\""));
}

#[test]
fn test_export_to_directory_as_xlsx() {
    let fx = Fixture::new();
    let input = fx.write("youth.csv", YOUTH_CSV);
    let out_dir = fx.path("out");
    fs::create_dir(&out_dir).unwrap();
    let config = fx.write(
        "xlsx.toml",
        &format!(
            "[export]\nformat = \"xlsx\"\n\n[logging]\ndirectory = {:?}\n",
            fx.path("logs")
        ),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_cohort"))
        .args(["--config", arg(&config), arg(&input), "-o", arg(&out_dir)])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let entries: Vec<PathBuf> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("au-youth-data-filtered-"));
    assert!(name.ends_with(".xlsx"));
    assert!(fs::read(&entries[0]).unwrap().starts_with(b"PK"));
}

#[test]
fn test_stats() {
    let fx = Fixture::new();
    let input = fx.write("youth.csv", YOUTH_CSV);

    let (stdout, _, code) = fx.run(&[arg(&input), "--stats", "--age", "20:"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Records:        4\n"));
    assert!(stdout.contains("Filtered:       3\n"));
    assert!(stdout.contains("Countries:      4\n"));
    assert!(stdout.contains("Average age:    25\n"));
    assert!(stdout.contains("Active filters: 1\n"));
}

#[test]
fn test_list_is_sorted() {
    let fx = Fixture::new();
    let input = fx.write("youth.csv", YOUTH_CSV);

    let (stdout, _, code) = fx.run(&[arg(&input), "--list", "--sort", "age:desc"]);
    assert_eq!(code, 0);
    let firsts: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(firsts, vec!["Kofi", "Thabo", "Amara", "Awa"]);
}

#[test]
fn test_missing_columns_fail() {
    let fx = Fixture::new();
    let input = fx.write("partial.csv", "First Name,Last Name,Age\nAma,Mensah,20\n");

    let (_, stderr, code) = fx.run(&[arg(&input), "--stats"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Failed to load"));
    assert!(stderr.contains("missing required columns: Gender, Nationality, Degree"));
}

#[test]
fn test_unknown_option() {
    let fx = Fixture::new();
    let (_, stderr, code) = fx.run(&["--bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Unknown option: --bogus"));
    assert!(stderr.contains("Usage: cohort"));
}

#[test]
fn test_headless_without_file_fails() {
    let fx = Fixture::new();
    let (_, stderr, code) = fx.run(&["--stats"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("need an input file"));
}

#[test]
fn test_logs_go_to_configured_directory() {
    let fx = Fixture::new();
    let input = fx.write("youth.csv", YOUTH_CSV);
    let (_, _, code) = fx.run(&[arg(&input), "--stats"]);
    assert_eq!(code, 0);

    let logs: Vec<_> = fs::read_dir(fx.path("logs")).unwrap().collect();
    assert!(!logs.is_empty());
}
