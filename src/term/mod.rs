//! Terminal panel
//!
//! A full-screen local shell on a PTY, with the panels' context exported
//! through the environment. Two entry points: the interactive shell, and
//! running a single command that either closes the terminal on exit or
//! waits for a key behind a "press any key" notice.
//!
//! The main loop leaves the alternate screen before calling in here and
//! re-enters it afterwards; panels refresh on return.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use tracing::debug;

#[cfg(unix)]
const CLOSE_MESSAGE: &str = "Press any key to close Terminal...";

/// Panel context exported into the shell's environment
#[derive(Debug, Clone, Default)]
pub struct TermContext {
    pub active_dir: String,
    pub passive_dir: String,
    pub current_name: String,
    pub current_path: String,
}

/// Resolve which shell to use. A configured value wins; otherwise $SHELL,
/// then /bin/sh (COMSPEC / cmd.exe on Windows).
fn resolve_shell(configured: &str) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    if cfg!(windows) {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
    }
}

/// Run an interactive shell until it exits or the user presses Ctrl+O
pub fn run_interactive(shell_config: &str, ctx: &TermContext) -> io::Result<()> {
    run_pty(shell_config, None, true, ctx)
}

/// Run one command in the terminal. With `auto_close` the terminal closes
/// as soon as the command exits; otherwise a notice waits for a key.
pub fn run_command(
    shell_config: &str,
    command: &str,
    auto_close: bool,
    ctx: &TermContext,
) -> io::Result<()> {
    run_pty(shell_config, Some(command), auto_close, ctx)
}

#[cfg(unix)]
fn run_pty(
    shell_config: &str,
    command: Option<&str>,
    auto_close: bool,
    ctx: &TermContext,
) -> io::Result<()> {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));

    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| io::Error::other(e.to_string()))?;

    let shell = resolve_shell(shell_config);
    let mut cmd = CommandBuilder::new(&shell);
    if let Some(command) = command {
        cmd.arg("-c");
        cmd.arg(command);
    }
    cmd.env("ACTIVE_DIR", &ctx.active_dir);
    cmd.env("PASSIVE_DIR", &ctx.passive_dir);
    cmd.env("CURRENT_NAME", &ctx.current_name);
    cmd.env("CURRENT_PATH", &ctx.current_path);

    debug!(%shell, ?command, "starting terminal panel");

    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| io::Error::other(e.to_string()))?;

    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| io::Error::other(e.to_string()))?;
    let mut writer = pair
        .master
        .take_writer()
        .map_err(|e| io::Error::other(e.to_string()))?;

    // Raw byte forwarding (no event reader) so terminal responses flow
    // transparently between the real terminal and the shell.
    let orig_termios = unsafe {
        let mut orig: libc::termios = std::mem::zeroed();
        libc::tcgetattr(libc::STDIN_FILENO, &mut orig);
        let mut raw = orig;
        libc::cfmakeraw(&mut raw);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw);
        orig
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_reader = Arc::clone(&running);

    let stdout_handle = std::thread::spawn(move || {
        let mut buf = [0u8; 4096];
        let mut stdout = io::stdout();
        while running_reader.load(Ordering::Relaxed) {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let _ = stdout.write_all(&buf[..n]);
                    let _ = stdout.flush();
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    let mut command_exited = false;

    'term_loop: loop {
        if let Ok(Some(_)) = child.try_wait() {
            command_exited = true;
            break;
        }

        if let Some(data) = poll_stdin(50)? {
            if data.is_empty() {
                break; // EOF
            }
            // Ctrl+O returns to the panels from the interactive shell
            if command.is_none() && data.contains(&0x0F) {
                break 'term_loop;
            }
            let _ = writer.write_all(&data);
            let _ = writer.flush();
        }
    }

    // Single command, natural exit: hold the terminal open until a key
    // unless the caller asked for auto-close.
    if command.is_some() && command_exited && !auto_close {
        print!("\r\n{}", CLOSE_MESSAGE);
        let _ = io::stdout().flush();
        // Any key closes; EOF counts too
        while poll_stdin(100)?.is_none() {}
    }

    unsafe {
        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &orig_termios);
    }

    running.store(false, Ordering::Relaxed);
    let _ = child.kill();
    drop(writer);
    drop(pair.master);
    std::thread::sleep(Duration::from_millis(100));
    let _ = child.try_wait();
    let _ = stdout_handle.join();

    print!("\r\n");
    let _ = io::stdout().flush();

    Ok(())
}

/// Wait up to `timeout_ms` for stdin data; None on timeout, empty on EOF
#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> io::Result<Option<Vec<u8>>> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ret = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
    if ret <= 0 || (pfd.revents & libc::POLLIN) == 0 {
        return Ok(None);
    }

    let mut buf = [0u8; 4096];
    let n = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            buf.as_mut_ptr() as *mut libc::c_void,
            buf.len(),
        )
    };
    if n < 0 {
        return Ok(None); // transient read error, retry next tick
    }
    Ok(Some(buf[..n as usize].to_vec()))
}

#[cfg(not(unix))]
fn run_pty(
    _shell_config: &str,
    _command: Option<&str>,
    _auto_close: bool,
    _ctx: &TermContext,
) -> io::Result<()> {
    Err(io::Error::other(
        "the terminal panel requires a unix tty",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shell_prefers_configured() {
        assert_eq!(resolve_shell("zsh"), "zsh");
    }

    #[test]
    fn test_resolve_shell_fallback() {
        let shell = resolve_shell("");
        assert!(!shell.is_empty());
    }
}
