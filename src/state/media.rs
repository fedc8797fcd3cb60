//! External viewer processes

use std::io;
use std::process::{Child, Command, Stdio};

use tracing::{debug, info};

/// Spawn `command` through the platform shell, detached from the terminal.
pub fn launch(command: &str) -> io::Result<Child> {
    debug!(command, "launching external viewer");

    #[cfg(unix)]
    let mut cmd = {
        // exec so that killing the child stops the viewer itself
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(format!("exec {}", command));
        cmd
    };
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

/// The one media process allowed to play at a time
#[derive(Default)]
pub struct MediaPlayer {
    child: Option<Child>,
}

impl MediaPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop whatever plays and start `command`
    pub fn play(&mut self, command: &str) -> io::Result<()> {
        self.stop();
        self.child = Some(launch(command)?);
        Ok(())
    }

    /// Stop the playing process, if any
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
                info!(pid = child.id(), "stopped media player");
            }
            let _ = child.wait();
        }
    }

    #[cfg(test)]
    pub fn is_playing(&mut self) -> bool {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.child = None;
                false
            }
            None => false,
        }
    }
}

impl Drop for MediaPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
