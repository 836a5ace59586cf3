//! crates/logging/src/router.rs
//! Applies a resolved threshold and sink flags to the policy and transports.

use crate::policy::Policy;
use crate::selectors::Selectors;
use crate::severity::Severity;
use crate::transport::Transport;

/// Writes the threshold and selectors into `policy` and switches the syslog
/// and console transports.
///
/// Total and idempotent: routing the same arguments twice leaves the policy
/// and the transports unchanged. File output is handled separately because
/// it needs activation parameters.
pub fn route<T>(
    policy: &mut Policy,
    transport: &mut T,
    severity: Severity,
    selectors: Selectors,
    to_syslog: bool,
    to_console: bool,
) where
    T: Transport + ?Sized,
{
    policy.severity = severity;
    policy.selectors = selectors;
    policy.to_syslog = to_syslog;
    policy.to_console = to_console;

    transport.enable_syslog(to_syslog);
    transport.enable_console(to_console);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[test]
    fn route_updates_policy_and_transport() {
        let mut policy = Policy::default();
        let mut transport = MemoryTransport::new();

        route(
            &mut policy,
            &mut transport,
            Severity::Debug,
            Selectors::parse(["net"]),
            true,
            false,
        );

        assert_eq!(policy.severity, Severity::Debug);
        assert!(policy.selectors.is_enabled("net"));
        assert!(policy.to_syslog);
        assert!(!policy.to_console);
        assert!(transport.syslog_enabled());
        assert!(!transport.console_enabled());
    }

    #[test]
    fn route_is_idempotent() {
        let mut policy = Policy::default();
        let mut transport = MemoryTransport::new();

        for _ in 0..2 {
            route(
                &mut policy,
                &mut transport,
                Severity::Warning,
                Selectors::default(),
                false,
                true,
            );
        }

        let snapshot = policy.clone();
        route(
            &mut policy,
            &mut transport,
            Severity::Warning,
            Selectors::default(),
            false,
            true,
        );
        assert_eq!(policy, snapshot);
        assert!(transport.console_enabled());
        assert!(!transport.syslog_enabled());
    }
}
