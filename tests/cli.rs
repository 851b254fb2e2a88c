use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn solves_a_puzzle_file() {
    let mut cmd = Command::cargo_bin("picross").unwrap();

    cmd.arg("puzzles/cross.yml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Solved in"))
        .stdout(predicate::str::contains("Solved 1/1 puzzles"));
}

#[test]
fn solves_every_document_in_a_multi_puzzle_file() {
    let mut cmd = Command::cargo_bin("picross").unwrap();

    cmd.arg("puzzles/pair.yml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Solved 2/2 puzzles"));
}

#[test]
fn rejects_malformed_clues() {
    let mut cmd = Command::cargo_bin("picross").unwrap();

    cmd.arg("puzzles/invalid.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid clue"));
}

#[test]
fn reports_contradictory_clues_with_the_board_state() {
    let mut cmd = Command::cargo_bin("picross").unwrap();

    cmd.arg("puzzles/contradiction.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("puzzle #1"));
}

#[test]
fn reports_missing_input_files() {
    let mut cmd = Command::cargo_bin("picross").unwrap();

    cmd.arg("puzzles/does_not_exist.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
