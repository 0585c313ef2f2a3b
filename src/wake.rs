//! Best-effort display-sleep inhibitor.
//!
//! Held while a countdown is actively ticking so the screen stays on
//! during a session. Failure to acquire is never surfaced; the timers work
//! fine without it.

pub struct WakeLock {
    #[cfg(target_os = "macos")]
    child: Option<std::process::Child>,
}

impl WakeLock {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "macos")]
            child: None,
        }
    }

    #[cfg(target_os = "macos")]
    pub fn acquire(&mut self) {
        if self.child.is_some() {
            return;
        }
        match std::process::Command::new("caffeinate").arg("-d").spawn() {
            Ok(child) => {
                log::debug!("Display sleep inhibited (caffeinate pid {})", child.id());
                self.child = Some(child);
            }
            Err(err) => log::warn!("Failed to inhibit display sleep: {err}"),
        }
    }

    #[cfg(not(target_os = "macos"))]
    pub fn acquire(&mut self) {
        log::debug!("Display sleep inhibitor not available on this platform");
    }

    #[cfg(target_os = "macos")]
    pub fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                log::warn!("Failed to release display sleep inhibitor: {err}");
            }
            let _ = child.wait();
        }
    }

    #[cfg(not(target_os = "macos"))]
    pub fn release(&mut self) {}
}

impl Drop for WakeLock {
    fn drop(&mut self) {
        self.release();
    }
}
