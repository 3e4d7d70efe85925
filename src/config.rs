//! Operator configuration
//!
//! Every setting can be given as a flag or through its environment variable.

use std::time::Duration;

use clap::Parser;

/// Runtime configuration for the operator
#[derive(Clone, Debug, PartialEq, Parser)]
#[command(name = "memcached-operator")]
#[command(about = "Kubernetes operator for Memcached clusters")]
#[command(version)]
pub struct OperatorConfig {
    /// Namespace to watch; all namespaces when unset
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Port for the metrics and health server
    #[arg(long, env = "METRICS_PORT", default_value_t = 8080)]
    pub metrics_port: u16,

    /// Deadline for a single reconciliation pass, in seconds
    #[arg(
        long,
        env = "RECONCILE_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub reconcile_timeout_secs: u64,

    /// Field manager recorded on writes
    #[arg(long, env = "FIELD_MANAGER", default_value = "memcached-operator")]
    pub field_manager: String,
}

impl OperatorConfig {
    /// Deadline for a single reconciliation pass
    pub fn reconcile_timeout(&self) -> Duration {
        Duration::from_secs(self.reconcile_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = OperatorConfig::try_parse_from(["memcached-operator"]).unwrap();
        assert_eq!(config.metrics_port, 8080);
        assert_eq!(config.reconcile_timeout(), Duration::from_secs(30));
        assert_eq!(config.field_manager, "memcached-operator");
    }

    #[test]
    fn reads_all_flags() {
        let config = OperatorConfig::try_parse_from([
            "memcached-operator",
            "--watch-namespace",
            "cache-system",
            "--metrics-port",
            "9090",
            "--reconcile-timeout-secs",
            "10",
            "--field-manager",
            "mc-test",
        ])
        .unwrap();

        assert_eq!(config.watch_namespace.as_deref(), Some("cache-system"));
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.reconcile_timeout(), Duration::from_secs(10));
        assert_eq!(config.field_manager, "mc-test");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = OperatorConfig::try_parse_from(["memcached-operator", "--metrics-port", "http"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err =
            OperatorConfig::try_parse_from(["memcached-operator", "--reconcile-timeout-secs", "0"])
                .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
