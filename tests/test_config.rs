use std::net::SocketAddr;
use std::path::PathBuf;

use serv::config::ServerConfig;

#[test]
fn test_config_defaults() {
    let cfg = ServerConfig::from_args(["serv", "./public"]).unwrap();

    assert_eq!(cfg.root_path, PathBuf::from("./public"));
    assert_eq!(cfg.port, 80);
    assert!(!cfg.expose_network);
}

#[test]
fn test_config_custom_port() {
    let cfg = ServerConfig::from_args(["serv", "/www", "--port", "8080"]).unwrap();

    assert_eq!(cfg.port, 8080);
}

#[test]
fn test_config_host_flag() {
    let cfg = ServerConfig::from_args(["serv", "/www", "--host", "--port", "3000"]).unwrap();

    assert!(cfg.expose_network);
    assert_eq!(cfg.port, 3000);
}

#[test]
fn test_config_localhost_binding() {
    let cfg = ServerConfig::from_args(["serv", "/www", "--port", "8000"]).unwrap();

    assert_eq!(cfg.bind_addr(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_config_all_interfaces_binding() {
    let cfg = ServerConfig::from_args(["serv", "/www", "--port", "5000", "--host"]).unwrap();

    assert_eq!(cfg.bind_addr(), "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_config_requires_path() {
    assert!(ServerConfig::from_args(["serv"]).is_err());
}

#[test]
fn test_config_port_requires_value() {
    assert!(ServerConfig::from_args(["serv", "/www", "--port"]).is_err());
}

#[test]
fn test_config_port_must_be_numeric() {
    assert!(ServerConfig::from_args(["serv", "/www", "--port", "http"]).is_err());
    assert!(ServerConfig::from_args(["serv", "/www", "--port", "70000"]).is_err());
}

#[test]
fn test_config_rejects_unknown_flags() {
    let err = ServerConfig::from_args(["serv", "/www", "--verbose"]).unwrap_err();

    assert!(err.use_stderr());
}

#[test]
fn test_config_clone() {
    let cfg1 = ServerConfig::from_args(["serv", "/www"]).unwrap();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}

#[test]
fn test_version_flag_is_not_a_usage_error() {
    let err = ServerConfig::from_args(["serv", "--version"]).unwrap_err();

    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    assert!(!err.use_stderr());
    assert!(err.to_string().contains(env!("CARGO_PKG_VERSION")));
}
