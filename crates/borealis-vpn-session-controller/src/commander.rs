// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use borealis_vpn_api_client::LoginCheckpoint;
use tokio::sync::{broadcast, mpsc::UnboundedSender, oneshot};
use url::Url;

use crate::{
    controller::SessionCommand,
    error::Error,
    models::HeartbeatFailed,
    shared_state::{SessionState, SharedSessionState},
};

pub(crate) struct ReturnSender<T> {
    tx: oneshot::Sender<Result<T, Error>>,
}

impl<T> ReturnSender<T> {
    pub(crate) fn new() -> (Self, oneshot::Receiver<Result<T, Error>>) {
        let (tx, rx) = oneshot::channel();
        (ReturnSender { tx }, rx)
    }

    pub(crate) fn send(self, result: Result<T, Error>) {
        if self.tx.send(result).is_err() {
            tracing::debug!("Result receiver dropped before the result was sent");
        }
    }
}

/// Handle used by the UI/navigation layer to talk to the controller task.
/// Cheap to clone; every method resolves once the controller has fully
/// applied (or rolled back) the operation.
#[derive(Clone)]
pub struct SessionCommander {
    command_tx: UnboundedSender<SessionCommand>,
    shared_state: SharedSessionState,
    heartbeat_tx: broadcast::Sender<HeartbeatFailed>,
}

impl SessionCommander {
    pub(crate) fn new(
        command_tx: UnboundedSender<SessionCommand>,
        shared_state: SharedSessionState,
        heartbeat_tx: broadcast::Sender<HeartbeatFailed>,
    ) -> Self {
        SessionCommander {
            command_tx,
            shared_state,
            heartbeat_tx,
        }
    }

    pub async fn start_login(&self) -> Result<LoginCheckpoint, Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::StartLogin(tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn complete_verification(&self, callback_url: Url) -> Result<(), Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::CompleteVerification(callback_url, tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn finish_bootstrap(&self) -> Result<(), Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::FinishBootstrap(tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn launch_resume(&self) -> Result<(), Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::LaunchResume(tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn logout(&self) -> Result<(), Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::Logout(tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn lookup_region_code(&self, city: &str) -> Result<Option<String>, Error> {
        let (tx, rx) = ReturnSender::new();
        self.send(SessionCommand::LookupRegionCode(city.to_string(), tx))?;
        rx.await.map_err(|_| Error::ControllerGone)?
    }

    pub async fn state(&self) -> SessionState {
        self.shared_state.current().await
    }

    pub fn subscribe_heartbeat_failed(&self) -> broadcast::Receiver<HeartbeatFailed> {
        self.heartbeat_tx.subscribe()
    }

    fn send(&self, command: SessionCommand) -> Result<(), Error> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::ControllerGone)
    }
}
