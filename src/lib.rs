pub mod api;
#[cfg(feature = "client")]
pub mod cli;
pub mod domain;
pub mod dto;
pub mod events;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod services;
pub mod storage;

#[cfg(feature = "client")]
use crate::api::HttpApi;
#[cfg(feature = "client")]
use crate::events::RefreshBus;
#[cfg(feature = "client")]
use crate::models::config::ClientConfig;
#[cfg(feature = "client")]
use crate::services::{SearchController, ServiceResult, SubscriptionTracker};
#[cfg(feature = "client")]
use crate::storage::FileStore;

/// Wires the HTTP client, session store and services together and runs a
/// single command, writing its output to stdout.
#[cfg(feature = "client")]
pub fn run(config: ClientConfig, command: cli::Command) -> ServiceResult<()> {
    let api = HttpApi::new(&config)?;
    let store = FileStore::new(&config.session_file);
    let bus = RefreshBus::new();

    let mut search = SearchController::new(store, bus.clone());
    search.restore_from_persistence();
    let mut tracker = SubscriptionTracker::new(bus);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::dispatch(&api, &mut search, &mut tracker, command, &mut out)
}
