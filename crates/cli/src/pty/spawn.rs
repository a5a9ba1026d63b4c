// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External handoff (C12, §4.11): spawn a child program (K8s viewer or
//! pager) on a fresh pseudo-terminal, forward stdin/stdout 1:1, and
//! tear it down on drop. Argonaut only ever spawns one kind of child
//! at a time, so this is a single concrete type rather than a trait
//! object over multiple backends.

use std::ffi::CString;
use std::os::fd::AsRawFd;

use bytes::Bytes;
use nix::libc;
use nix::pty::{forkpty, ForkptyResult, Winsize};
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execvp, Pid};
use tokio::io::unix::AsyncFd;
use tokio::sync::mpsc;

use super::nbio::{read_chunk, set_nonblocking, write_all, PtyFd};
use argonaut_core::ArgoError;

#[derive(Debug, Clone, Copy)]
pub struct ExitStatus {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

/// A spawned child on its own PTY.
#[derive(Debug)]
pub struct ExternalProcess {
    master: AsyncFd<PtyFd>,
    child_pid: Pid,
}

impl ExternalProcess {
    /// Spawn `command` on a fresh pseudo-terminal sized `cols`×`rows`.
    /// `command` must have at least one element (the program to run).
    // forkpty leaves the child partially initialized until exec; unsafe
    // is confined to this function and `resize`'s ioctl.
    #[allow(unsafe_code)]
    pub fn spawn(
        command: &[String],
        cols: u16,
        rows: u16,
        e2e: bool,
        config_path_override: Option<&str>,
    ) -> Result<Self, ArgoError> {
        if command.is_empty() {
            return Err(ArgoError::validation("external handoff command must not be empty"));
        }
        let winsize = Winsize { ws_col: cols, ws_row: rows, ws_xpixel: 0, ws_ypixel: 0 };

        // SAFETY: forkpty forks the process; the child branch below
        // execs immediately without touching any non-async-signal-safe
        // state beyond the C strings already prepared before the fork.
        let fork_result =
            unsafe { forkpty(&winsize, None) }.map_err(|e| ArgoError::internal(format!("forkpty failed: {e}")))?;

        match fork_result {
            ForkptyResult::Child => {
                // fork() inherits the full environment already, which
                // covers TERM/LC_ALL/LANG/HOME/PATH (§4.11); only the
                // conditional additions below need setting explicitly.
                if e2e {
                    std::env::set_var("ARGONAUT_E2E", "1");
                }
                if let Some(path) = config_path_override {
                    std::env::set_var("ARGONAUT_CONFIG", path);
                }

                let c_args: Vec<CString> = match command.iter().map(|s| CString::new(s.as_bytes())).collect() {
                    Ok(args) => args,
                    Err(_) => std::process::exit(127),
                };
                let _ = execvp(&c_args[0], &c_args);
                std::process::exit(127);
            }
            ForkptyResult::Parent { child, master } => {
                set_nonblocking(&master).map_err(|e| ArgoError::internal(format!("set_nonblocking failed: {e}")))?;
                let afd = AsyncFd::new(PtyFd(master))
                    .map_err(|e| ArgoError::internal(format!("AsyncFd::new failed: {e}")))?;
                Ok(Self { master: afd, child_pid: child })
            }
        }
    }

    /// Copy stdin bytes to the child (1:1, including escape sequences)
    /// and the child's stdout to `output_tx` until it exits, then reap
    /// it and report its [`ExitStatus`] (§4.11).
    pub async fn run(
        &mut self,
        output_tx: mpsc::Sender<Bytes>,
        mut input_rx: mpsc::Receiver<Bytes>,
    ) -> Result<ExitStatus, ArgoError> {
        let mut buf = vec![0u8; 8192];
        let mut input_closed = false;

        loop {
            if input_closed {
                match read_chunk(&self.master, &mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if output_tx.send(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                            break;
                        }
                    }
                    Err(e) if e.raw_os_error() == Some(libc::EIO) => break,
                    Err(e) => return Err(ArgoError::internal(format!("pty read failed: {e}"))),
                }
            } else {
                tokio::select! {
                    result = read_chunk(&self.master, &mut buf) => {
                        match result {
                            Ok(0) => break,
                            Ok(n) => {
                                if output_tx.send(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) if e.raw_os_error() == Some(libc::EIO) => break,
                            Err(e) => return Err(ArgoError::internal(format!("pty read failed: {e}"))),
                        }
                    }
                    input = input_rx.recv() => {
                        match input {
                            Some(data) => write_all(&self.master, &data).await
                                .map_err(|e| ArgoError::internal(format!("pty write failed: {e}")))?,
                            None => input_closed = true,
                        }
                    }
                }
            }
        }

        let pid = self.child_pid;
        tokio::task::spawn_blocking(move || wait_for_exit(pid))
            .await
            .map_err(|e| ArgoError::internal(format!("join wait thread: {e}")))?
    }

    /// `TIOCSWINSZ` on terminal resize (§4.11 "sets the window size").
    #[allow(unsafe_code)]
    pub fn resize(&self, cols: u16, rows: u16) -> Result<(), ArgoError> {
        let ws = Winsize { ws_col: cols, ws_row: rows, ws_xpixel: 0, ws_ypixel: 0 };
        // SAFETY: TIOCSWINSZ is a well-defined ioctl; `ws` is fully
        // initialized and the fd is the live PTY master.
        let ret = unsafe { libc::ioctl(self.master.as_raw_fd(), libc::TIOCSWINSZ, &ws) };
        if ret < 0 {
            return Err(ArgoError::internal(format!(
                "TIOCSWINSZ ioctl failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }

    /// Kill the child's process group immediately (§4.11 "Ctrl-C while
    /// the child is foreground kills the child group").
    pub fn kill_group(&self) {
        let _ = kill(Pid::from_raw(-self.child_pid.as_raw()), Signal::SIGKILL);
    }
}

impl Drop for ExternalProcess {
    fn drop(&mut self) {
        let _ = kill(self.child_pid, Signal::SIGHUP);
        std::thread::sleep(std::time::Duration::from_millis(50));
        let _ = kill(self.child_pid, Signal::SIGKILL);
        let _ = waitpid(self.child_pid, Some(WaitPidFlag::WNOHANG));
    }
}

fn wait_for_exit(pid: Pid) -> Result<ExitStatus, ArgoError> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus { code: Some(code), signal: None }),
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                return Ok(ExitStatus { code: None, signal: Some(sig as i32) })
            }
            Ok(_) => continue,
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(ArgoError::internal(format!("waitpid failed: {e}"))),
        }
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
