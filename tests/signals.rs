//! Reload and termination driven by real OS signals.
//!
//! Kept in its own test binary: signals go to the whole process, so any other
//! supervisor running alongside would see them too.

#![cfg(unix)]

use std::time::{Duration, Instant};

use vhost_proxy::config::{parse_routes, ListenerConfig, ReloadWatcher};
use vhost_proxy::lifecycle::{ShutdownReason, Supervisor, SupervisorState};
use vhost_proxy::routing::RouteTable;

mod common;

fn raise(signal: libc::c_int) {
    let rc = unsafe { libc::kill(libc::getpid(), signal) };
    assert_eq!(rc, 0, "kill failed");
}

#[tokio::test]
async fn sighup_reloads_and_sigterm_stops_cleanly() {
    let first = common::start_mock_backend("first").await;
    let second = common::start_mock_backend("second").await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proxy.conf");
    let initial = format!("a.com: {}\n", first.port());
    std::fs::write(&path, &initial).unwrap();

    let routes = RouteTable::shared(parse_routes(&initial).unwrap());
    let config = ListenerConfig {
        http_address: "127.0.0.1:0".to_string(),
        tls_address: String::new(),
        ..ListenerConfig::default()
    };
    let reload = ReloadWatcher::new(&path, routes.clone());
    let supervisor = Supervisor::new(&config, Duration::from_millis(200), routes, reload).unwrap();

    let mut state = supervisor.state();
    let handle = supervisor.listener_handles().remove(0).1;
    let run = tokio::spawn(supervisor.run());

    state
        .wait_for(|s| *s == SupervisorState::Running)
        .await
        .expect("supervisor never started");
    let proxy = handle.listening().await.expect("proxy failed to bind");
    let client = common::client();
    let url = format!("http://{}/", proxy);

    let res = client.get(&url).header("host", "a.com").send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "first");

    std::fs::write(&path, format!("a.com: {}\n", second.port())).unwrap();
    raise(libc::SIGHUP);

    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let res = client.get(&url).header("host", "a.com").send().await.unwrap();
        if res.text().await.unwrap() == "second" {
            break;
        }
        assert!(Instant::now() < deadline, "SIGHUP never reloaded the routing file");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    raise(libc::SIGTERM);
    let reason = tokio::time::timeout(Duration::from_secs(2), run)
        .await
        .expect("SIGTERM did not stop the supervisor")
        .unwrap();

    assert!(matches!(reason, ShutdownReason::Signal("SIGTERM")), "got {reason}");
    assert!(!reason.is_failure());
}
