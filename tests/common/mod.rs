// Shared helpers: a pseudo-terminal standing in for a device shell
#![allow(dead_code)]

use rustix::pty::{grantpt, openpt, ptsname, unlockpt, OpenptFlags};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Master side of a pty plus the path of its slave
pub struct FakeDevice {
    pub master: File,
    pub path: PathBuf,
}

impl FakeDevice {
    pub fn new() -> Self {
        let master = openpt(OpenptFlags::RDWR | OpenptFlags::NOCTTY | OpenptFlags::CLOEXEC)
            .expect("openpt");
        grantpt(&master).expect("grantpt");
        unlockpt(&master).expect("unlockpt");
        let name = ptsname(&master, Vec::new()).expect("ptsname");
        let path = PathBuf::from(name.into_string().expect("pts name is UTF-8"));
        Self {
            master: File::from(master),
            path,
        }
    }

    /// Answer the first command line with whatever `reply` builds from it
    ///
    /// The thread hands the master back so the slave stays alive until the
    /// test joins it.
    pub fn respond<F>(self, reply: F) -> (PathBuf, JoinHandle<File>)
    where
        F: FnOnce(&[u8]) -> Vec<u8> + Send + 'static,
    {
        self.serve(move |command, master| {
            let answer = reply(command);
            if !answer.is_empty() {
                master.write_all(&answer).expect("device write");
                master.flush().expect("device flush");
            }
        })
    }

    /// Wait for the first command line, then hand the master to `script`
    pub fn serve<F>(self, script: F) -> (PathBuf, JoinHandle<File>)
    where
        F: FnOnce(&[u8], &mut File) + Send + 'static,
    {
        let path = self.path.clone();
        let mut master = self.master;
        let handle = thread::spawn(move || {
            let command = read_line(&mut master);
            script(&command, &mut master);
            master
        });
        (path, handle)
    }
}

/// Write `line` every `interval`, `count` times, stopping once the slave is gone
pub fn chatter(master: &mut File, line: &[u8], interval: Duration, count: usize) {
    for _ in 0..count {
        if master.write_all(line).and_then(|_| master.flush()).is_err() {
            break;
        }
        thread::sleep(interval);
    }
}

/// Echo the command back CRLF terminated, then print `body` and a prompt
pub fn shell_reply(body: &'static str) -> impl FnOnce(&[u8]) -> Vec<u8> {
    move |command| {
        let mut reply = b"\r\n".to_vec();
        reply.extend_from_slice(command.strip_suffix(b"\n").unwrap_or(command));
        reply.extend_from_slice(b"\r\n");
        reply.extend_from_slice(body.as_bytes());
        reply.extend_from_slice(b"mcu> ");
        reply
    }
}

fn read_line(master: &mut File) -> Vec<u8> {
    let started = Instant::now();
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while !line.ends_with(b"\n") {
        match master.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            // EIO until the slave side has been opened
            Err(_) if started.elapsed() < Duration::from_secs(5) => {
                thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("device read failed: {e}"),
        }
    }
    line
}
