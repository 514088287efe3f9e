//! ICMP reachability probe
//!
//! Runs the system `ping` once per probe on a helper thread. The executor
//! only awaits a signal, so a slow ping never stalls the other loop.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::warn;

use homagotchi_core::traits::{Probe, ProbeError};

/// Completion of one probe, signalled from the helper thread
type ProbeSignal = Signal<CriticalSectionRawMutex, Result<(), ProbeError>>;

/// `ping` exit status for "no reply"
const EXIT_NO_REPLY: i32 = 1;

/// Single-shot `ping -c 1 -W <secs> <address>`
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
}

impl PingProbe {
    /// Probe with the system `ping`
    pub fn new() -> Self {
        Self::with_program("ping")
    }

    /// Probe with another ping-compatible program
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for PingProbe {
    async fn probe(&mut self, address: &str, timeout_ms: u32) -> Result<(), ProbeError> {
        let done: Arc<ProbeSignal> = Arc::new(Signal::new());
        let reply = done.clone();
        let program = self.program.clone();
        let target = address.to_owned();

        let spawned = thread::Builder::new()
            .name("ping".into())
            .spawn(move || reply.signal(ping(&program, &target, timeout_ms)));
        if let Err(e) = spawned {
            warn!("Could not start probe thread: {}", e);
            return Err(ProbeError::Tool);
        }

        done.wait().await
    }
}

fn ping(program: &str, address: &str, timeout_ms: u32) -> Result<(), ProbeError> {
    let wait_s = timeout_ms.div_ceil(1000).max(1);
    let status = Command::new(program)
        .args(["-c", "1", "-W"])
        .arg(wait_s.to_string())
        .arg(address)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) if status.code() == Some(EXIT_NO_REPLY) => Err(ProbeError::Unreachable),
        Ok(status) => {
            warn!("{} {} exited with {}", program, address, status);
            Err(ProbeError::Tool)
        }
        Err(e) => {
            warn!("Could not run {}: {}", program, e);
            Err(ProbeError::Tool)
        }
    }
}
