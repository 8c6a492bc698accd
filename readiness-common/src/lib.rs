use serde::{Deserialize, Serialize};

pub mod events;

/// Lifecycle state name an instance must report to be considered ready.
pub const STATE_RUNNING: &str = "running";
/// Status check result required for both the instance and system checks.
pub const CHECK_OK: &str = "ok";
/// Placeholder for a signal the provider did not report.
pub const UNKNOWN: &str = "unknown";

// --- Enums ---

/// One of the three health signals reported per instance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthCheck {
    LifecycleState, // running / pending / stopped ...
    InstanceStatus, // OS-level reachability check
    SystemStatus,   // host / hypervisor check
}

impl HealthCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCheck::LifecycleState => "lifecycle_state",
            HealthCheck::InstanceStatus => "instance_status",
            HealthCheck::SystemStatus => "system_status",
        }
    }
}

// --- Entities ---

/// Status of one instance as returned by a single describe call.
/// Only lives for the duration of one poll round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct InstanceStatusSnapshot {
    pub instance_id: String,
    pub state: String,
    pub instance_status: String,
    pub system_status: String,
}

impl InstanceStatusSnapshot {
    pub fn new(
        instance_id: impl Into<String>,
        state: impl Into<String>,
        instance_status: impl Into<String>,
        system_status: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            state: state.into(),
            instance_status: instance_status.into(),
            system_status: system_status.into(),
        }
    }

    /// Shorthand for an instance that passes every check.
    pub fn healthy(instance_id: impl Into<String>) -> Self {
        Self::new(instance_id, STATE_RUNNING, CHECK_OK, CHECK_OK)
    }

    /// Checks that are not satisfied, in a stable order.
    pub fn failing_checks(&self) -> Vec<HealthCheck> {
        let mut out = Vec::new();
        if self.state != STATE_RUNNING {
            out.push(HealthCheck::LifecycleState);
        }
        if self.instance_status != CHECK_OK {
            out.push(HealthCheck::InstanceStatus);
        }
        if self.system_status != CHECK_OK {
            out.push(HealthCheck::SystemStatus);
        }
        out
    }

    pub fn is_ready(&self) -> bool {
        self.state == STATE_RUNNING
            && self.instance_status == CHECK_OK
            && self.system_status == CHECK_OK
    }
}

/// Diagnostic record for an instance that was not ready in the last round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PendingInstance {
    pub instance_id: String,
    pub state: String,
    pub instance_status: String,
    pub system_status: String,
    pub failing_checks: Vec<HealthCheck>,
}

impl PendingInstance {
    /// Log form, e.g. `i-002 [system_status]`.
    pub fn summary(&self) -> String {
        let checks: Vec<&str> = self.failing_checks.iter().map(|c| c.as_str()).collect();
        format!("{} [{}]", self.instance_id, checks.join(","))
    }
}

impl From<&InstanceStatusSnapshot> for PendingInstance {
    fn from(s: &InstanceStatusSnapshot) -> Self {
        Self {
            instance_id: s.instance_id.clone(),
            state: s.state.clone(),
            instance_status: s.instance_status.clone(),
            system_status: s.system_status.clone(),
            failing_checks: s.failing_checks(),
        }
    }
}

/// Instances from one round that are not ready. Empty means the round passed.
pub fn pending_instances(snapshots: &[InstanceStatusSnapshot]) -> Vec<PendingInstance> {
    snapshots
        .iter()
        .filter(|s| !s.is_ready())
        .map(PendingInstance::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_snapshot_is_ready() {
        let s = InstanceStatusSnapshot::healthy("i-001");
        assert!(s.is_ready());
        assert!(s.failing_checks().is_empty());
    }

    #[test]
    fn each_signal_is_required() {
        let cases = [
            (
                InstanceStatusSnapshot::new("i-1", "pending", "ok", "ok"),
                vec![HealthCheck::LifecycleState],
            ),
            (
                InstanceStatusSnapshot::new("i-1", "running", "initializing", "ok"),
                vec![HealthCheck::InstanceStatus],
            ),
            (
                InstanceStatusSnapshot::new("i-1", "running", "ok", "impaired"),
                vec![HealthCheck::SystemStatus],
            ),
            (
                InstanceStatusSnapshot::new("i-1", "stopped", UNKNOWN, UNKNOWN),
                vec![
                    HealthCheck::LifecycleState,
                    HealthCheck::InstanceStatus,
                    HealthCheck::SystemStatus,
                ],
            ),
        ];
        for (snapshot, expected) in cases {
            assert!(!snapshot.is_ready());
            assert_eq!(snapshot.failing_checks(), expected);
        }
    }

    #[test]
    fn comparison_is_exact() {
        // Provider values are lowercase; anything else is not a match.
        let s = InstanceStatusSnapshot::new("i-1", "Running", "OK", "ok");
        assert!(!s.is_ready());
    }

    #[test]
    fn pending_instances_keeps_only_unready() {
        let round = vec![
            InstanceStatusSnapshot::healthy("i-001"),
            InstanceStatusSnapshot::new("i-002", "running", "ok", "impaired"),
        ];
        let pending = pending_instances(&round);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].instance_id, "i-002");
        assert_eq!(pending[0].failing_checks, vec![HealthCheck::SystemStatus]);
    }

    #[test]
    fn pending_summary_names_failing_checks() {
        let booting = InstanceStatusSnapshot::new("i-003", "pending", "initializing", "ok");
        assert_eq!(
            PendingInstance::from(&booting).summary(),
            "i-003 [lifecycle_state,instance_status]"
        );
    }

    #[test]
    fn pending_instances_of_empty_round_is_empty() {
        assert!(pending_instances(&[]).is_empty());
    }

    #[test]
    fn health_check_serializes_snake_case() {
        let v = serde_json::to_value(HealthCheck::SystemStatus).unwrap();
        assert_eq!(v, serde_json::json!("system_status"));
        assert_eq!(HealthCheck::SystemStatus.as_str(), "system_status");
    }
}
