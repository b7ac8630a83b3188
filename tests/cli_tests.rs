// Binary-level behaviour of the safety-orientation CLI.
// Each test gets its own data directory and an endpoint nobody listens on,
// so every submission goes through the offline queue.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn orientation(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("safety-orientation").unwrap();
    cmd.current_dir(dir.path())
        .env("ORIENTATION_STORAGE__DATA_DIR", dir.path().join("data"))
        .env("ORIENTATION_SUBMISSION__ENDPOINT", "http://127.0.0.1:9/api/orientation")
        .env("ORIENTATION_SUBMISSION__TIMEOUT_SECONDS", "1")
        .env("ORIENTATION_SUBMISSION__MAX_RETRIES", "0")
        .env("RUST_LOG", "off");
    cmd
}

fn record_info(dir: &TempDir) {
    orientation(dir)
        .args([
            "info",
            "--full-name",
            "Sarah Williams",
            "--hire-date",
            "2026-01-27",
            "--supervisor",
            "Mike Johnson",
            "--status",
            "new-to-position",
            "--contact-name",
            "Tom Williams",
            "--contact-phone",
            "555-0134",
            "--contact-relationship",
            "Brother",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your information has been saved"));
}

#[test]
fn test_help_lists_the_flow() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("quiz"))
        .stdout(predicate::str::contains("acknowledge"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_no_command_points_to_the_first_step() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Safety Orientation"))
        .stdout(predicate::str::contains("safety-orientation info"));
}

#[test]
fn test_incomplete_info_reports_each_field() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .args(["info", "--full-name", "Sarah Williams", "--hire-date", "27/01/2026"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Hire date must be in YYYY-MM-DD format"))
        .stdout(predicate::str::contains("Supervisor name is required"))
        .stdout(predicate::str::contains("Please select your status"))
        .stdout(predicate::str::contains("Full name is required").not());
}

#[test]
fn test_steps_ahead_of_progress_redirect() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .args(["video", "--position", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Redirecting to info"));

    record_info(&dir);
    orientation(&dir)
        .args(["acknowledge", "--confirm", "--signature", "Sarah Williams"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Redirecting to video"));
}

#[test]
fn test_video_progress_is_saved_and_skipping_is_blocked() {
    let dir = TempDir::new().unwrap();
    record_info(&dir);

    orientation(&dir)
        .args(["video", "--position", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping ahead is not allowed"));

    orientation(&dir)
        .args(["video", "--ended"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Safety video complete"));

    orientation(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("100% (complete)"))
        .stdout(predicate::str::contains("Sarah Williams"));
}

#[test]
fn test_interrupted_quiz_still_counts_the_attempt() {
    let dir = TempDir::new().unwrap();
    record_info(&dir);
    orientation(&dir).args(["video", "--ended"]).assert().success();

    orientation(&dir)
        .arg("quiz")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz interrupted"));

    orientation(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not passed after 1 attempt(s)"));
}

#[test]
fn test_reset_clears_progress() {
    let dir = TempDir::new().unwrap();
    record_info(&dir);

    orientation(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("progress cleared"));

    orientation(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(not recorded)"))
        .stdout(predicate::str::contains("(not started)"));
}

#[test]
fn test_dashboard_filters_by_status() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .args(["dashboard", "--status", "in_progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("James Brown"))
        .stdout(predicate::str::contains("Sarah Williams").not());

    orientation(&dir)
        .args(["dashboard", "--status", "archived"])
        .assert()
        .failure();
}

#[test]
fn test_sync_while_offline_keeps_submissions() {
    let dir = TempDir::new().unwrap();
    orientation(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline"));
}
