use crate::core::assembler::{LineAssembler, LineEvent};
use crate::core::deadline::Deadline;
use crate::core::session::state::SessionState;
use crate::core::source::ByteSource;
use crate::domain::command::Command;
use crate::domain::config::SessionConfig;
use crate::domain::error::{McuxeqError, McuxeqResult};
use crate::infrastructure::serial::{
    Port, RetryPolicy, SerialPort, TransportControl, TransportOpener,
};
use std::io::Write;
use tracing::{debug, info};

/// One command/response exchange with a device
///
/// The session writes the command, waits for the device to echo it, then
/// streams every following line to the output until the prompt returns.
/// Each phase gets a fresh deadline of the configured timeout; the same
/// timeout bounds the wait for each individual read.
pub struct CommandSession<'a, P> {
    config: &'a SessionConfig,
    source: ByteSource<P>,
    assembler: LineAssembler<'a>,
    state: SessionState,
}

impl<'a> CommandSession<'a, SerialPort> {
    /// Open the configured device
    pub fn open(config: &'a SessionConfig) -> McuxeqResult<Self> {
        let opener = TransportOpener::new(RetryPolicy::new(config.timeout), config.force);
        Self::open_with(config, &opener)
    }

    /// Open the configured device with a specific opener
    pub fn open_with<C: TransportControl>(
        config: &'a SessionConfig,
        opener: &TransportOpener<C>,
    ) -> McuxeqResult<Self> {
        debug!("Session {} -> {}", SessionState::Idle, SessionState::Opening);
        match opener.open(&config.device) {
            Ok(port) => {
                let mut session = Self::with_port(config, port);
                session.state = SessionState::Opening;
                Ok(session)
            }
            Err(e) => {
                debug!("Session {} -> {}", SessionState::Opening, SessionState::Failed);
                Err(e)
            }
        }
    }

    /// Release the advisory lock and close the device
    pub fn close(self) -> McuxeqResult<()> {
        self.source.into_port().close()
    }
}

impl<'a, P: Port> CommandSession<'a, P> {
    /// Run a session over an already opened port
    pub fn with_port(config: &'a SessionConfig, port: P) -> Self {
        Self {
            config,
            source: ByteSource::new(port, config.timeout),
            assembler: LineAssembler::new(&config.prompt),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send `command` and stream its response to `out`
    pub fn run<W: Write>(&mut self, command: &Command, out: &mut W) -> McuxeqResult<()> {
        if self.state.is_terminal() {
            return Err(McuxeqError::Config {
                message: format!("Session already {}", self.state),
            });
        }

        let result = self.exchange(command, out);
        match &result {
            Ok(()) => self.transition(SessionState::Done),
            Err(e) => {
                debug!("Session failed in {}: {}", self.state, e);
                self.transition(SessionState::Failed);
            }
        }
        result
    }

    fn exchange<W: Write>(&mut self, command: &Command, out: &mut W) -> McuxeqResult<()> {
        self.send(command)?;
        self.transition(SessionState::EchoWait);
        self.wait_for_echo(command)?;
        self.transition(SessionState::ResponseCollect);
        self.collect_response(out)
    }

    fn send(&mut self, command: &Command) -> McuxeqResult<()> {
        debug!("Sending command...");
        let written = self
            .source
            .port_mut()
            .write(command.as_bytes())
            .map_err(McuxeqError::Write)?;
        if written < command.len() {
            return Err(McuxeqError::ShortWrite {
                written,
                expected: command.len(),
            });
        }
        Ok(())
    }

    fn wait_for_echo(&mut self, command: &Command) -> McuxeqResult<()> {
        debug!("Waiting for command echo...");
        let deadline = Deadline::after(self.config.timeout);
        loop {
            match self.assembler.next_line(&mut self.source)? {
                LineEvent::Line(line) if command.is_echoed_by(&line) => break,
                LineEvent::Line(line) => {
                    if deadline.is_expired() {
                        return Err(McuxeqError::EchoTimeout(self.timeout()));
                    }
                    debug!("Ignoring {}", String::from_utf8_lossy(&line).trim_end());
                }
                LineEvent::PromptSeen => return Err(McuxeqError::EchoNotFound),
            }
        }
        debug!("Command echo found.");
        Ok(())
    }

    fn collect_response<W: Write>(&mut self, out: &mut W) -> McuxeqResult<()> {
        let deadline = Deadline::after(self.config.timeout);
        let mut lines = 0usize;
        loop {
            match self.assembler.next_line(&mut self.source)? {
                LineEvent::PromptSeen => break,
                LineEvent::Line(line) => {
                    if deadline.is_expired() {
                        return Err(McuxeqError::ResponseTooLong(self.timeout()));
                    }
                    out.write_all(&line).map_err(McuxeqError::Output)?;
                    out.flush().map_err(McuxeqError::Output)?;
                    lines += 1;
                }
            }
        }
        info!("Response complete ({} lines)", lines);
        Ok(())
    }

    fn timeout(&self) -> std::time::Duration {
        self.config.timeout.unwrap_or_default()
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {} -> {}",
            self.state,
            next
        );
        debug!("Session {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn into_port(self) -> P {
        self.source.into_port()
    }
}

/// Open the configured device, run one exchange and release the device
pub fn run_command<W: Write>(
    config: &SessionConfig,
    command: &Command,
    out: &mut W,
) -> McuxeqResult<()> {
    let mut session = CommandSession::open(config)?;
    session.run(command, out)?;
    session.close()
}
