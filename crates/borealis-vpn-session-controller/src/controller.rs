// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc, time::Duration};

use borealis_vpn_api_client::{AccountApi, LoginCheckpoint, Region, User};
use borealis_vpn_store::{
    session::DeviceRecord,
    settings::SelectedCity,
    ClientStorage,
};
use futures::future;
use rand::seq::IteratorRandom as _;
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender},
};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    commander::{ReturnSender, SessionCommander},
    error::Error,
    models::{device_record_from, HeartbeatFailed, Session},
    shared_state::{SessionState, SharedSessionState},
    storage::ControllerStorage,
};

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3600);

/// Region used for the one-time default city selection after a first
/// successful bootstrap.
pub const FALLBACK_REGION_CODE: &str = "US";

const HEARTBEAT_CHANNEL_CAPACITY: usize = 10;

pub(crate) enum SessionCommand {
    StartLogin(ReturnSender<LoginCheckpoint>),
    CompleteVerification(Url, ReturnSender<()>),
    FinishBootstrap(ReturnSender<()>),
    LaunchResume(ReturnSender<()>),
    Logout(ReturnSender<()>),
    LookupRegionCode(String, ReturnSender<Option<String>>),
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommand::StartLogin(_) => write!(f, "StartLogin"),
            SessionCommand::CompleteVerification(..) => write!(f, "CompleteVerification"),
            SessionCommand::FinishBootstrap(_) => write!(f, "FinishBootstrap"),
            SessionCommand::LaunchResume(_) => write!(f, "LaunchResume"),
            SessionCommand::Logout(_) => write!(f, "Logout"),
            SessionCommand::LookupRegionCode(..) => write!(f, "LookupRegionCode"),
        }
    }
}

/// The single session authority. Owns the session aggregate and applies
/// every mutation on its own task; remote calls issued within one operation
/// may run concurrently, but their results are joined before the next state
/// transition is produced.
pub struct SessionController<S, A>
where
    S: ClientStorage,
    A: AccountApi,
{
    // The underlying storage for the device keypair, session credentials
    // and settings
    storage: ControllerStorage<S>,

    // The client used to talk to the account API
    api_client: A,

    // The session aggregate, only ever touched from the command loop
    session: Session,

    // The observable state used for navigation decisions
    shared_state: SharedSessionState,

    // Human-readable name sent along with device registrations
    device_name: String,

    heartbeat_interval: Duration,

    // Multicast channel for failed account polls
    heartbeat_tx: broadcast::Sender<HeartbeatFailed>,

    // Receiver channel used to receive commands from the consumer
    command_rx: UnboundedReceiver<SessionCommand>,

    // Sender channel handed out through the commander
    command_tx: UnboundedSender<SessionCommand>,

    // Listen for cancellation signals
    cancel_token: CancellationToken,
}

impl<S, A> SessionController<S, A>
where
    S: ClientStorage,
    A: AccountApi,
{
    pub async fn new(
        storage: Arc<tokio::sync::Mutex<S>>,
        api_client: A,
        device_name: String,
        cancel_token: CancellationToken,
    ) -> Result<Self, Error> {
        let storage = ControllerStorage::from(storage);
        storage.init_keys().await?;

        let (token, current_device) = load_reconciled_credentials(&storage).await?;

        let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
        let (heartbeat_tx, _) = broadcast::channel(HEARTBEAT_CHANNEL_CAPACITY);

        Ok(SessionController {
            storage,
            api_client,
            session: Session {
                token,
                current_device,
                ..Default::default()
            },
            shared_state: SharedSessionState::new(),
            device_name,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_tx,
            command_rx,
            command_tx,
            cancel_token,
        })
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn commander(&self) -> SessionCommander {
        SessionCommander::new(
            self.command_tx.clone(),
            self.shared_state.clone(),
            self.heartbeat_tx.clone(),
        )
    }

    pub fn shared_state(&self) -> SharedSessionState {
        self.shared_state.clone()
    }

    pub async fn run(mut self) {
        let first_tick = tokio::time::Instant::now() + self.heartbeat_interval;
        let mut heartbeat = tokio::time::interval_at(first_tick, self.heartbeat_interval);

        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    tracing::debug!("Received command: {}", command);
                    self.handle_command(command).await;
                }
                _ = heartbeat.tick() => {
                    self.poll_account().await;
                }
                _ = self.cancel_token.cancelled() => {
                    tracing::trace!("Received cancellation signal");
                    break;
                }
                else => {
                    tracing::debug!("Session controller channel closed");
                    break;
                }
            }
        }
        tracing::debug!("Session controller is exiting");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::StartLogin(tx) => tx.send(self.start_login().await),
            SessionCommand::CompleteVerification(url, tx) => {
                tx.send(self.complete_verification(url).await)
            }
            SessionCommand::FinishBootstrap(tx) => tx.send(self.finish_bootstrap().await),
            SessionCommand::LaunchResume(tx) => tx.send(self.launch_resume().await),
            SessionCommand::Logout(tx) => tx.send(self.logout().await),
            SessionCommand::LookupRegionCode(city, tx) => {
                tx.send(Ok(self.session.region_code_for_city(&city)))
            }
        }
    }

    async fn start_login(&mut self) -> Result<LoginCheckpoint, Error> {
        tracing::info!("Starting login");
        let checkpoint = self
            .api_client
            .initiate_login()
            .await
            .map_err(Error::InitiateLogin)?;
        self.shared_state
            .set(SessionState::AwaitingVerification)
            .await;
        Ok(checkpoint)
    }

    async fn complete_verification(&mut self, callback_url: Url) -> Result<(), Error> {
        tracing::info!("Completing login verification");
        let verify = match self.api_client.complete_login(&callback_url).await {
            Ok(verify) => verify,
            Err(err) => {
                self.teardown_session().await;
                return Err(Error::CompleteLogin(err));
            }
        };

        self.session.token = Some(verify.token.clone());
        self.session.user = Some(verify.user);
        if let Err(err) = self.storage.store_token(&verify.token).await {
            self.teardown_session().await;
            return Err(err);
        }
        self.shared_state.set(SessionState::Bootstrapping).await;
        Ok(())
    }

    async fn finish_bootstrap(&mut self) -> Result<(), Error> {
        let token = self.session.token.clone().ok_or(Error::EmptySession)?;
        tracing::info!("Finishing session bootstrap");

        let (registered, servers) = future::join(
            self.register_device_if_needed(&token),
            self.fetch_servers(&token),
        )
        .await;

        // Both branches always run to completion; when both fail the
        // registration error is the one reported.
        let (registered, servers) = match (registered, servers) {
            (Ok(registered), Ok(servers)) => (registered, servers),
            (Err(err), _) | (Ok(_), Err(err)) => {
                self.teardown_session().await;
                return Err(err);
            }
        };

        if let Some(device) = registered {
            if let Err(err) = self.storage.store_device(&device).await {
                self.teardown_session().await;
                return Err(err);
            }
            self.session.current_device = Some(device);
        }
        self.session.available_servers = Some(servers);

        self.select_default_city_if_unset().await;
        self.shared_state.set(SessionState::SignedIn).await;
        Ok(())
    }

    async fn launch_resume(&mut self) -> Result<(), Error> {
        let Some(token) = self.session.token.clone() else {
            self.teardown_session().await;
            return Err(Error::EmptySession);
        };
        if self.session.current_device.is_none() {
            self.teardown_session().await;
            return Err(Error::EmptySession);
        }

        tracing::info!("Resuming session from stored credentials");
        self.shared_state.set(SessionState::Bootstrapping).await;

        let (account, servers) =
            future::join(self.fetch_account(&token), self.fetch_servers(&token)).await;

        // Account-info failure is the one reported when both branches fail.
        let (user, servers) = match (account, servers) {
            (Ok(user), Ok(servers)) => (user, servers),
            (Err(err), _) | (Ok(_), Err(err)) => {
                self.teardown_session().await;
                return Err(err);
            }
        };

        self.session.user = Some(user);
        self.session.available_servers = Some(servers);

        self.select_default_city_if_unset().await;
        self.shared_state.set(SessionState::SignedIn).await;
        Ok(())
    }

    async fn logout(&mut self) -> Result<(), Error> {
        let Some(device) = self.session.current_device.clone() else {
            return Err(Error::EmptySession);
        };
        let token = self.session.token.clone().ok_or(Error::EmptySession)?;

        tracing::info!("Logging out, unregistering device {}", device.id);
        self.api_client
            .unregister_device(&token, &device.pubkey)
            .await
            .map_err(Error::UnregisterDevice)?;

        // The device keypair and the selected city both survive logout.
        self.session.user = None;
        self.session.available_servers = None;
        self.teardown_session().await;
        Ok(())
    }

    async fn poll_account(&mut self) {
        let Some(token) = self.session.token.clone() else {
            return;
        };

        tracing::debug!("Heartbeat: refreshing account info");
        match self.api_client.get_account(&token).await {
            Ok(user) => {
                self.session.user = Some(user);
            }
            Err(err) => {
                tracing::warn!("Heartbeat failed: {}", err);
                let event = HeartbeatFailed {
                    message: err.to_string(),
                };
                if self.heartbeat_tx.send(event).is_err() {
                    tracing::debug!("No heartbeat subscribers");
                }
            }
        }
    }

    async fn register_device_if_needed(&self, token: &str) -> Result<Option<DeviceRecord>, Error> {
        if self.session.current_device.is_some() {
            tracing::debug!("Device already registered, skipping registration");
            return Ok(None);
        }

        let keys = self.storage.load_keys().await?;
        let pubkey = keys.public_key_base64();
        let device = self
            .api_client
            .register_device(token, &self.device_name, &pubkey)
            .await
            .map_err(Error::RegisterDevice)?;
        tracing::info!("Device registered: {}", device.id);
        Ok(Some(device_record_from(&device)))
    }

    async fn fetch_account(&self, token: &str) -> Result<User, Error> {
        self.api_client
            .get_account(token)
            .await
            .map_err(Error::GetAccount)
    }

    async fn fetch_servers(&self, token: &str) -> Result<Vec<Region>, Error> {
        self.api_client
            .get_vpn_servers(token)
            .await
            .map_err(Error::GetVpnServers)
    }

    // Rollback of the durable credentials is best effort; a storage failure
    // here must not mask the error that triggered the teardown.
    async fn teardown_session(&mut self) {
        self.session.clear_credentials();
        if let Err(err) = self.storage.remove_token().await {
            tracing::error!("Failed to remove stored token during teardown: {}", err);
        }
        if let Err(err) = self.storage.remove_device().await {
            tracing::error!("Failed to remove stored device during teardown: {}", err);
        }
        self.shared_state.set(SessionState::SignedOut).await;
    }

    async fn select_default_city_if_unset(&self) {
        let Some(servers) = self.session.available_servers.as_ref() else {
            return;
        };
        match self.storage.load_selected_city().await {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("Failed to read selected city: {}", err);
                return;
            }
        }

        let Some(region) = servers
            .iter()
            .find(|region| region.code.eq_ignore_ascii_case(FALLBACK_REGION_CODE))
        else {
            tracing::warn!(
                "No {} region in the server list, leaving the default city unselected",
                FALLBACK_REGION_CODE
            );
            return;
        };
        let Some(city) = region.cities.iter().choose(&mut rand::thread_rng()) else {
            return;
        };

        let selected = SelectedCity {
            name: city.name.clone(),
            region_code: region.code.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
        };
        if let Err(err) = self.storage.store_selected_city(&selected).await {
            tracing::warn!("Failed to persist the default city: {}", err);
            return;
        }
        tracing::info!("Selected default city: {}", selected.name);
    }
}

async fn load_reconciled_credentials<S>(
    storage: &ControllerStorage<S>,
) -> Result<(Option<String>, Option<DeviceRecord>), Error>
where
    S: ClientStorage,
{
    let token = storage.load_token().await?;
    let device = storage.load_device().await?;
    match (token, device) {
        (Some(token), Some(device)) => Ok((Some(token), Some(device))),
        (None, None) => Ok((None, None)),
        // Half a stored session is no session: clear both entries.
        (token, device) => {
            tracing::warn!(
                "Inconsistent stored session (token present: {}, device present: {}), clearing",
                token.is_some(),
                device.is_some(),
            );
            storage.remove_token().await?;
            storage.remove_device().await?;
            Ok((None, None))
        }
    }
}
