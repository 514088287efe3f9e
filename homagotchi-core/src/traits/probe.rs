//! Reachability probe

/// Reasons a probe reports the device as absent
///
/// None of these are surfaced beyond the presence monitor; they are logged
/// and folded into "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// Device did not answer
    Unreachable,
    /// No answer within the probe timeout
    Timeout,
    /// Probe tool could not be run
    Tool,
}

/// Single-shot reachability check
#[allow(async_fn_in_trait)]
pub trait Probe {
    /// Check once whether `address` answers within `timeout_ms`
    ///
    /// No retries.
    async fn probe(&mut self, address: &str, timeout_ms: u32) -> Result<(), ProbeError>;
}
