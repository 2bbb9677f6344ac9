use assert_cmd::Command;
use predicates::prelude::*;

/// Check if running as root
fn is_root() -> bool {
    unsafe { libc::getuid() == 0 }
}

#[test]
fn test_help_command() {
    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "interactive shell in a private mount namespace",
        ));
}

#[test]
fn test_version_command() {
    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("burrow"));
}

#[test]
fn test_rejects_arguments() {
    // Behavior is fixed at build time; any operand is a usage error
    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_isolation_denied_without_root() {
    // Skip if running as root
    if is_root() {
        return;
    }

    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Isolation denied"));
}

#[test]
#[ignore] // Requires root
fn test_shell_gets_private_mount_namespace() {
    // Skip if not root
    if !is_root() {
        return;
    }

    let parent_ns = std::fs::read_link("/proc/self/ns/mnt")
        .expect("readable on Linux")
        .to_string_lossy()
        .into_owned();

    // The spawned sh reads its commands from the wired-up stdin
    let assert = Command::new(env!("CARGO_BIN_EXE_burrow"))
        .write_stdin("readlink /proc/self/ns/mnt\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("mnt:["));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(
        !stdout.contains(&parent_ns),
        "shell reported the host mount namespace: {stdout}"
    );
}

#[test]
#[ignore] // Requires root
fn test_stream_wiring_and_exit_code() {
    // Skip if not root
    if !is_root() {
        return;
    }

    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .write_stdin("echo ok\nexit 7\n")
        .assert()
        .code(7)
        .stdout(predicate::str::contains("ok"));
}

#[test]
#[ignore] // Requires root
fn test_mounts_do_not_leak_to_host() {
    // Skip if not root
    if !is_root() {
        return;
    }

    let target = std::env::temp_dir().join("burrow-leak-check");
    std::fs::create_dir_all(&target).expect("temp dir is writable");
    let target_str = target.to_string_lossy().into_owned();

    Command::new(env!("CARGO_BIN_EXE_burrow"))
        .write_stdin(format!(
            "mount -t tmpfs burrow-test {target_str} && grep burrow-test /proc/mounts\n"
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("burrow-test"));

    // The mount was visible inside the shell but must not exist here
    let host_mounts = std::fs::read_to_string("/proc/mounts").expect("readable on Linux");
    assert!(
        !host_mounts.contains("burrow-test"),
        "mount leaked out of the namespace"
    );
}
