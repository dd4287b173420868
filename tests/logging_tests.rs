// Logging initialization test (own binary: the subscriber is global)

use offshell::config::LoggingConfig;
use offshell::utils::logging;

#[test]
fn test_init_with_defaults() {
    let config = LoggingConfig::default();
    assert!(logging::init(&config).is_ok());
    // Second init would panic on the global subscriber; one per process.
    tracing::info!("logging initialized");
}
