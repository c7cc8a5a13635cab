//! Integration tests for graceful shutdown of the HTTP server

use piiguard::config::PiiGuardConfig;
use piiguard::server;
use std::time::Duration;
use tokio::sync::watch;

fn local_config() -> PiiGuardConfig {
    let mut config = PiiGuardConfig::default();
    config.server.host = "127.0.0.1".to_string();
    // Let the OS pick a free port
    config.server.port = 0;
    config
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_server_stops_on_signal() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(server::serve(local_config(), shutdown_rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    shutdown_tx.send(true).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop in time")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_server_stops_when_signal_already_sent() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        server::serve(local_config(), shutdown_rx),
    )
    .await
    .expect("server did not stop in time");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_bind_failure_reported() {
    let mut config = local_config();
    config.server.host = "256.0.0.1".to_string();

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let result = server::serve(config, shutdown_rx).await;
    assert!(result.is_err());
}
