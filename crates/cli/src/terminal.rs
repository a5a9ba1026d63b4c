// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw-mode stdin handling for the top-level event loop. Terminal
//! rendering itself is an external collaborator (§1 Non-goals); this
//! module only owns what the UI state machine needs from the TTY: raw
//! byte capture and the restore-on-exit guarantee (§6 exit contract).

use std::io::Read;
use std::os::fd::{AsRawFd, BorrowedFd};

use nix::sys::termios;
use tokio::sync::mpsc;

use crate::message::KeyCode;

/// RAII guard that restores the original terminal attributes on drop,
/// including on an unwinding panic (§6: "must restore the terminal on
/// exit via any path, including crashes").
pub struct RawModeGuard {
    fd: i32,
    original: termios::Termios,
}

impl RawModeGuard {
    pub fn enter() -> Result<Self, std::io::Error> {
        let fd = std::io::stdin().as_raw_fd();
        let borrowed = borrow_fd(fd);
        let original = termios::tcgetattr(borrowed)?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(borrowed, termios::SetArg::TCSAFLUSH, &raw)?;
        Ok(Self { fd, original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let borrowed = borrow_fd(self.fd);
        let _ = termios::tcsetattr(borrowed, termios::SetArg::TCSAFLUSH, &self.original);
    }
}

fn borrow_fd(fd: i32) -> BorrowedFd<'static> {
    // SAFETY: stdin fd 0 outlives the process.
    #[allow(unsafe_code)]
    unsafe {
        BorrowedFd::borrow_raw(fd)
    }
}

/// Install a panic hook that restores `original` before unwinding
/// continues, so a reducer/dispatcher panic never leaves the user's
/// shell in raw mode.
pub fn install_panic_restore_hook(guard: &RawModeGuard) {
    let fd = guard.fd;
    let original: nix::libc::termios = guard.original.clone().into();
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // SAFETY: fd is stdin, valid for the process lifetime; `original`
        // was captured from a successful tcgetattr at startup.
        #[allow(unsafe_code)]
        unsafe {
            nix::libc::tcsetattr(fd, nix::libc::TCSAFLUSH, &original);
        }
        prev_hook(info);
    }));
}

/// Current terminal size via `TIOCGWINSZ`, falling back to 80x24.
pub fn terminal_size() -> (u16, u16) {
    let fd = std::io::stdout().as_raw_fd();
    let mut ws = nix::libc::winsize { ws_row: 0, ws_col: 0, ws_xpixel: 0, ws_ypixel: 0 };
    // SAFETY: TIOCGWINSZ reads into a fully-initialized stack winsize.
    #[allow(unsafe_code)]
    let ret = unsafe { nix::libc::ioctl(fd, nix::libc::TIOCGWINSZ, &mut ws) };
    if ret == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        (ws.ws_col, ws.ws_row)
    } else {
        (80, 24)
    }
}

/// Spawn a blocking thread reading raw stdin bytes into `tx`. Runs until
/// stdin closes or the channel's receiver is dropped.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Vec<u8>>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut handle = stdin.lock();
        let mut buf = [0u8; 4096];
        loop {
            match handle.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.blocking_send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

/// Decode a chunk of raw terminal bytes into zero or more [`KeyCode`]s.
/// Handles the escape sequences this client actually binds (§6 key
/// bindings): arrows, PgUp/PgDn, and bare control/printable bytes.
/// Unrecognised escape sequences are dropped rather than misread as
/// `Esc` followed by garbage characters.
pub fn decode_keys(bytes: &[u8]) -> Vec<KeyCode> {
    let mut keys = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => {
                if let Some((key, consumed)) = decode_escape(&bytes[i..]) {
                    keys.push(key);
                    i += consumed;
                } else {
                    keys.push(KeyCode::Escape);
                    i += 1;
                }
            }
            b'\r' | b'\n' => {
                keys.push(KeyCode::Enter);
                i += 1;
            }
            0x7f | 0x08 => {
                keys.push(KeyCode::Backspace);
                i += 1;
            }
            b'\t' => {
                keys.push(KeyCode::Tab);
                i += 1;
            }
            b @ 0x01..=0x1a => {
                keys.push(KeyCode::Ctrl((b'a' + (b - 1)) as char));
                i += 1;
            }
            b => {
                let ch_len = utf8_len(b);
                if let Ok(s) = std::str::from_utf8(&bytes[i..(i + ch_len).min(bytes.len())]) {
                    if let Some(c) = s.chars().next() {
                        keys.push(KeyCode::Char(c));
                    }
                }
                i += ch_len.max(1);
            }
        }
    }
    keys
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xe0 == 0xc0 {
        2
    } else if first_byte & 0xf0 == 0xe0 {
        3
    } else if first_byte & 0xf8 == 0xf0 {
        4
    } else {
        1
    }
}

fn decode_escape(bytes: &[u8]) -> Option<(KeyCode, usize)> {
    match bytes {
        [0x1b, b'[', b'A', ..] => Some((KeyCode::Up, 3)),
        [0x1b, b'[', b'B', ..] => Some((KeyCode::Down, 3)),
        [0x1b, b'[', b'C', ..] => Some((KeyCode::Right, 3)),
        [0x1b, b'[', b'D', ..] => Some((KeyCode::Left, 3)),
        [0x1b, b'[', b'5', b'~', ..] => Some((KeyCode::PageUp, 4)),
        [0x1b, b'[', b'6', b'~', ..] => Some((KeyCode::PageDown, 4)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
