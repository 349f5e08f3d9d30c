//! Line-based command input.
//!
//! Reads commands from stdin (or any async reader in tests), parses them and
//! forwards them to the app loop over an mpsc channel.

use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

/// Forwards parsed input lines to the app.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Handler forwarding to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run until shutdown is signalled or the input ends.
    ///
    /// End of input is treated as `quit`, and no line is read after `quit`.
    /// Lines that do not parse are reported on stderr and skipped.
    #[instrument(skip_all)]
    pub async fn run<R>(&self, reader: R, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = lines.next_line() => {
                    match line? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => {
                            if self.handle_line(&line).await? == Some(AppCommand::Shutdown) {
                                break;
                            }
                        }
                        None => {
                            info!("Input closed, requesting shutdown");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Forward one line. Returns the command sent, `None` if rejected.
    #[instrument(skip(self))]
    async fn handle_line(&self, line: &str) -> AppResult<Option<AppCommand>> {
        match AppCommand::parse(line) {
            Ok(command) => {
                debug!(?command, "Command parsed");
                self.send(command.clone()).await?;
                Ok(Some(command))
            }
            Err(AppError::InvalidCommand { input, reason, .. }) => {
                warn!(input = %input, reason = %reason, "Rejected input");
                eprintln!("{}: {} (type `help` for the command list)", input, reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Send `command` to the app loop. A closed channel is reported at the
    /// call site.
    #[track_caller]
    fn send(&self, command: AppCommand) -> impl Future<Output = AppResult<()>> + '_ {
        let location = ErrorLocation::from(Location::caller());
        async move {
            self.command_tx
                .send(command)
                .await
                .map_err(|e| AppError::ChannelSendFailed {
                    message: format!("Failed to send {:?}: {}", e.0, e),
                    location,
                })
        }
    }
}
