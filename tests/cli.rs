use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 每個測試使用自己的設定檔位置
fn ccat(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccat").unwrap();
    cmd.env("CCAT_CONFIG", config);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ccat.json");
    (dir, config)
}

fn write_source(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_version() {
    let (_dir, config) = setup();
    ccat(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ColorCat v. "));
}

#[test]
fn test_help_lists_flags() {
    let (_dir, config) = setup();
    ccat(&config)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("--nosave"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_piped_output_is_plain() {
    let (dir, config) = setup();
    let text = "fn main() {\n    println!(\"hi\");\n}\n";
    let file = write_source(&dir, "main.rs", text);

    ccat(&config)
        .arg(&file)
        .arg("-n")
        .assert()
        .success()
        .stdout(text);
}

#[test]
fn test_forced_colors() {
    let (dir, config) = setup();
    let file = write_source(&dir, "main.rs", "fn main() {}\n");

    ccat(&config)
        .args(["--colors", "--nosave"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
}

#[test]
fn test_forced_colors_with_line_numbers() {
    let (dir, config) = setup();
    let text: String = (1..=10).map(|i| format!("line {}\n", i)).collect();
    let file = write_source(&dir, "notes.txt", &text);

    let output = ccat(&config)
        .args(["-c", "-n", "--nosave"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("\x1b[36m01\x1b[0m"));
    assert!(stdout.contains("\x1b[36m10\x1b[0m"));
}

#[test]
fn test_stdin_read_once() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-", "-", "-p"])
        .write_stdin("hello\n")
        .assert()
        .success()
        .stdout("\nstdin:\nhello\n");
}

#[test]
fn test_missing_file_fails_but_continues() {
    let (dir, config) = setup();
    let present = write_source(&dir, "present.txt", "still here\n");

    ccat(&config)
        .arg(dir.path().join("missing.txt"))
        .arg(&present)
        .arg("-s")
        .arg("Solarized (dark)")
        .assert()
        .code(1)
        .stdout("still here\n")
        .stderr(predicate::str::contains("Unable to read file"));

    // 有失敗時不保存設定
    assert!(!config.exists());
}

#[test]
fn test_bad_style() {
    let (dir, config) = setup();
    let file = write_source(&dir, "a.txt", "a\n");

    ccat(&config)
        .args(["-s", "no-such-style"])
        .arg(&file)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Invalid style name: no-such-style"))
        .stderr(predicate::str::contains("ccat --styles"));
}

#[test]
fn test_bad_formatter() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-f", "pdf"])
        .write_stdin("a\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad formatter name: pdf"));
}

#[test]
fn test_bad_lexer() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-c", "-l", "no-such-lexer"])
        .write_stdin("a\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad lexer name: no-such-lexer"));
}

#[test]
fn test_bad_lexer_without_colors() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-l", "no-such-lexer", "-p"])
        .write_stdin("a\n")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Bad lexer name: no-such-lexer"))
        .stderr(predicate::str::contains("ccat --lexers"));
    assert!(!config.exists());
}

#[test]
fn test_bad_lexer_falls_back_to_file_name() {
    let (dir, config) = setup();
    let file = write_source(&dir, "main.rs", "fn main() {}\n");

    ccat(&config)
        .args(["-l", "no-such-lexer", "--nosave"])
        .arg(&file)
        .assert()
        .success()
        .stdout("fn main() {}\n");
}

#[test]
fn test_explicit_lexer() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-c", "-l", "rust", "--nosave"])
        .write_stdin("fn main() {}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
}

#[test]
fn test_unknown_flag_shows_usage() {
    let (_dir, config) = setup();
    ccat(&config)
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown option: --bogus"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_conflicting_flags() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-n", "-N"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used together"));
}

#[test]
fn test_config_saved_and_reused() {
    let (dir, config) = setup();
    let file = write_source(&dir, "a.txt", "a\nb\n");

    ccat(&config)
        .args(["-s", "Solarized (dark)", "-n"])
        .arg(&file)
        .assert()
        .success();

    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("\"style\": \"Solarized (dark)\""));
    assert!(saved.contains("\"linenos\": true"));
    assert!(!saved.contains("printnames"));

    // 保存的 linenos 在強制著色時生效
    ccat(&config)
        .arg("-c")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[36m1\x1b[0m"));
}

#[test]
fn test_nosave() {
    let (dir, config) = setup();
    let file = write_source(&dir, "a.txt", "a\n");

    ccat(&config)
        .args(["-s", "InspiredGitHub", "--nosave"])
        .arg(&file)
        .assert()
        .success();
    assert!(!config.exists());
}

#[test]
fn test_html_output() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-f", "html", "-l", "rust", "-n", "--nosave"])
        .write_stdin("fn main() {}\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("class=\"lineno\""))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_html_line_numbers_by_default() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-f", "html", "--nosave"])
        .write_stdin("a\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("class=\"lineno\""));

    ccat(&config)
        .args(["-f", "html", "-N", "--nosave"])
        .write_stdin("a\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("class=\"lineno\"").not());
}

#[test]
fn test_eq_separator_and_combined_flags() {
    let (dir, config) = setup();
    let file = write_source(&dir, "a.txt", "a\n");

    ccat(&config)
        .args(["--style=InspiredGitHub", "-np"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt:\na\n"));
    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("\"style\": \"InspiredGitHub\""));
}

#[test]
fn test_list_styles() {
    let (_dir, config) = setup();
    ccat(&config)
        .arg("--styles")
        .assert()
        .success()
        .stdout(predicate::str::contains("base16-ocean.dark"));
}

#[test]
fn test_list_no_match() {
    let (_dir, config) = setup();
    ccat(&config)
        .args(["-F", "zzz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No formatters matching: 'zzz'"));
}

#[test]
fn test_files_after_double_dash() {
    let (dir, config) = setup();
    write_source(&dir, "-dash.txt", "dashed\n");

    ccat(&config)
        .current_dir(dir.path())
        .args(["--nosave", "--", "-dash.txt"])
        .assert()
        .success()
        .stdout("dashed\n");
}
