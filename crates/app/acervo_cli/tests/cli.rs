//! CLI surface tests — no database required.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("acervo")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("serve")
                .and(predicate::str::contains("migrate"))
                .and(predicate::str::contains("admin")),
        );
}

#[test]
fn admin_create_requires_its_flags() {
    Command::cargo_bin("acervo")
        .unwrap()
        .args(["admin", "create"])
        .env_remove("ADMIN_PASSWORD")
        .assert()
        .failure();
}
