//! `kill(true)` ends the host process. Each case re-runs this test binary
//! as a child host and checks how that child exits.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::process::{Command, Output};
use std::time::Duration;

use traybridge::{Conf, Menu, MenuItem, SysTray};

const HOST_ENV: &str = "TRAYBRIDGE_EXIT_NODE_HOST";

fn menu() -> Menu {
    Menu {
        items: vec![MenuItem::new("Quit")],
        ..Menu::default()
    }
}

/// Runs `test` again in a fresh process acting as the tray host.
fn run_host(test: &str) -> Output {
    let exe = std::env::current_exe().unwrap();
    Command::new(exe)
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(HOST_ENV, "1")
        .output()
        .unwrap()
}

fn in_host() -> bool {
    std::env::var_os(HOST_ENV).is_some()
}

/// Body of the child host. Never returns normally: either `kill(true)`
/// exits the process or the panic fails it.
fn host(setup: impl FnOnce() -> SysTray) -> ! {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let tray = setup();
        println!("host: before kill");
        tray.kill(true);
        tokio::time::sleep(Duration::from_secs(10)).await;
    });
    panic!("host process still alive after kill(true)");
}

#[test]
fn exit_node_waits_for_renderer_then_exits() {
    if in_host() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("renderer.sh");
        fs::write(&script, "#!/bin/sh\necho '{\"type\":\"ready\"}'\ncat > /dev/null\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        host(|| {
            let tray = SysTray::with_executable(Conf::new(menu()), &script);
            let pid = tray.pid().unwrap();
            println!("host: renderer pid {pid}");
            tray
        });
    }

    let out = run_host("exit_node_waits_for_renderer_then_exits");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("host: before kill"), "stdout: {stdout}");

    let pid = stdout
        .lines()
        .find_map(|l| l.strip_prefix("host: renderer pid "))
        .expect("renderer pid reported");
    #[cfg(target_os = "linux")]
    assert!(
        !std::path::Path::new("/proc").join(pid.trim()).exists(),
        "renderer {pid} outlived the host"
    );
    let _ = pid;
}

#[test]
fn exit_node_without_renderer_exits_at_once() {
    if in_host() {
        host(|| {
            let (reader, _) = tokio::io::duplex(64);
            let (writer, _) = tokio::io::duplex(64);
            let tray = SysTray::with_io(Conf::new(menu()), reader, writer);
            assert!(tray.pid().is_none());
            tray
        });
    }

    let out = run_host("exit_node_without_renderer_exits_at_once");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("host: before kill"), "stdout: {stdout}");
}
