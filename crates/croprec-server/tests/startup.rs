//! Startup behaviour: the model must load before anything is served

use croprec_server::{build_app, run, ServerConfig};
use std::io::Write;
use std::net::TcpListener;
use std::path::PathBuf;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_build_app_fails_without_artifact() {
    let config = ServerConfig {
        model_path: PathBuf::from("/nonexistent/crop_recommendation_model.json"),
        ..ServerConfig::default()
    };

    let err = build_app(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("crop_recommendation_model.json"));
}

#[test]
fn test_build_app_fails_on_corrupt_artifact() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"\x80\x04\x95pickle bytes are not an artifact").unwrap();

    let config = ServerConfig {
        model_path: file.path().to_path_buf(),
        ..ServerConfig::default()
    };

    assert!(build_app(&config).is_err());
}

#[tokio::test]
async fn test_run_fails_before_binding() {
    let port = free_port();
    let config = ServerConfig {
        model_path: PathBuf::from("/nonexistent/crop_recommendation_model.json"),
        port,
        ..ServerConfig::default()
    };

    assert!(run(config).await.is_err());

    // Nothing holds the port: the listener was never bound
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}
