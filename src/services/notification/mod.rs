use notify_rust::{Notification, Timeout};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    fn summary(self) -> &'static str {
        match self {
            Severity::Info => "AURA",
            Severity::Success => "AURA",
            Severity::Error => "AURA - something went wrong",
        }
    }
}

/// Capability interface for surfacing messages to the user.
///
/// Injected at construction; callers never probe for an implementation at
/// the call site. Fire-and-forget: implementations must not propagate
/// delivery failures back into the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Desktop notifications via the system notification daemon.
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if !self.enabled {
            return;
        }

        let timeout = match severity {
            Severity::Error => Timeout::Milliseconds(10000),
            Severity::Info | Severity::Success => Timeout::Milliseconds(5000),
        };

        if let Err(err) = Notification::new()
            .summary(severity.summary())
            .body(message)
            .timeout(timeout)
            .show()
        {
            log::warn!("Failed to show notification: {}", err);
        }
    }
}

/// Default implementation that drops every message.
#[derive(Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_notifier_accepts_messages() {
        let notifier = NoopNotifier;
        notifier.notify("Scheduled 3 tasks", Severity::Success);
    }

    #[test]
    fn test_error_summary_differs() {
        assert_ne!(Severity::Error.summary(), Severity::Info.summary());
    }
}
