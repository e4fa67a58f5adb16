//! TCP link to the simulation backend.
//!
//! The backend pushes one snapshot JSON object per line; the console sends
//! one command JSON object per line. Snapshots are published on a `watch`
//! channel so the UI always reads the latest one, and commands flow through
//! an unbounded channel so issuing one never blocks the UI.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};

use btdebug_protocol::{Command, Snapshot};

use crate::config::BackendConfig;

/// Connection state shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting { addr: String },
    Connected { addr: String },
    Disconnected { addr: String, reason: String },
    /// In-process demo backend.
    Demo,
}

/// Fire-and-forget command handle.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a command. There is no acknowledgment; the effect, if any,
    /// shows up in a later snapshot.
    pub fn send(&self, command: Command) {
        if let Err(e) = self.tx.send(command) {
            tracing::debug!(action = e.0.action(), "Backend gone, command dropped");
        }
    }
}

/// Everything the console needs from a backend.
pub struct BackendChannels {
    pub snapshots: watch::Receiver<Arc<Snapshot>>,
    pub status: watch::Receiver<LinkStatus>,
    pub commands: CommandSender,
}

/// Start the TCP link task. Must be called inside a tokio runtime.
pub fn spawn_link(config: &BackendConfig) -> BackendChannels {
    let (snapshot_tx, snapshots) = watch::channel(Arc::new(Snapshot::default()));
    let (status_tx, status) = watch::channel(LinkStatus::Connecting {
        addr: config.addr.clone(),
    });
    let (commands, command_rx) = CommandSender::channel();

    let link = BackendLink {
        addr: config.addr.clone(),
        reconnect_interval: Duration::from_secs(config.reconnect_interval_secs.max(1)),
        snapshot_tx,
        status_tx,
        command_rx,
    };
    tokio::spawn(link.run());

    BackendChannels {
        snapshots,
        status,
        commands,
    }
}

struct BackendLink {
    addr: String,
    reconnect_interval: Duration,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    status_tx: watch::Sender<LinkStatus>,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

impl BackendLink {
    async fn run(mut self) {
        loop {
            self.status_tx.send_replace(LinkStatus::Connecting {
                addr: self.addr.clone(),
            });

            let reason = match TcpStream::connect(&self.addr).await {
                Ok(stream) => {
                    tracing::info!(addr = %self.addr, "Connected to backend");
                    self.status_tx.send_replace(LinkStatus::Connected {
                        addr: self.addr.clone(),
                    });
                    match self.serve(stream).await {
                        Ok(ServeEnd::BackendClosed) => "backend closed the connection".to_string(),
                        Ok(ServeEnd::ConsoleClosed) => break,
                        Err(e) => e.to_string(),
                    }
                }
                Err(e) => e.to_string(),
            };

            tracing::warn!(addr = %self.addr, reason = %reason, "Backend link down");
            self.status_tx.send_replace(LinkStatus::Disconnected {
                addr: self.addr.clone(),
                reason,
            });

            if self.snapshot_tx.is_closed() {
                break;
            }
            self.drop_pending_commands();
            tokio::time::sleep(self.reconnect_interval).await;
            self.drop_pending_commands();
        }
        tracing::debug!("Backend link stopped");
    }

    /// Pump one connection until either side goes away.
    async fn serve(&mut self, stream: TcpStream) -> Result<ServeEnd, anyhow::Error> {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        publish_snapshot_line(&line, &self.snapshot_tx);
                    }
                    None => return Ok(ServeEnd::BackendClosed),
                },
                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        let line = command.to_message().to_json_line()?;
                        writer.write_all(line.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                        tracing::debug!(action = command.action(), "Command sent");
                    }
                    None => return Ok(ServeEnd::ConsoleClosed),
                },
            }
        }
    }

    // Commands are not retried across reconnects.
    fn drop_pending_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            tracing::warn!(action = command.action(), "Backend unreachable, command dropped");
        }
    }
}

enum ServeEnd {
    BackendClosed,
    ConsoleClosed,
}

/// Decode one snapshot line and publish it, replacing the previous snapshot.
///
/// Blank and malformed lines are skipped; the last good snapshot stays
/// displayed. Returns whether a snapshot was published.
pub fn publish_snapshot_line(line: &str, tx: &watch::Sender<Arc<Snapshot>>) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    match Snapshot::from_json(line) {
        Ok(snapshot) => {
            tx.send_replace(Arc::new(snapshot));
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed snapshot");
            false
        }
    }
}
