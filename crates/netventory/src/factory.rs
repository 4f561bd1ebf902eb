//! Builds the ingestion engine from configuration

use std::sync::Arc;

use eyre::{Result, WrapErr};
use netventory_core::{Classifier, Ingestor, InventoryStore, JsonFileStore, MemoryStore};
use netventory_probe::{DeviceProber, JunosProber, SshSessionFactory, Vendor};
use tracing::info;

use crate::config::{Config, ProbeConfig, StoreConfig};

/// Open the configured store
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn InventoryStore>> {
    match &config.path {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .await
                .wrap_err_with(|| format!("failed to open inventory {}", path.display()))?;
            info!(path = %path.display(), "using JSON inventory file");
            Ok(Arc::new(store))
        }
        None => {
            info!("no [store] path configured, inventory is kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Resolve credentials and build the prober for the configured vendor
pub fn build_prober(config: &ProbeConfig) -> Result<Arc<dyn DeviceProber>> {
    let credential = config
        .credential_source()?
        .resolve()
        .wrap_err("failed to resolve device credentials")?;
    info!(user = %config.user, auth = credential.kind(), vendor = %config.vendor, "device login configured");

    let sessions = SshSessionFactory::new(config.user.clone(), Arc::new(credential))
        .with_port(config.port)
        .with_connect_timeout(config.connect_timeout());

    match config.vendor {
        Vendor::Juniper => Ok(Arc::new(
            JunosProber::new(Arc::new(sessions)).with_command_timeout(config.command_timeout()),
        )),
    }
}

/// Build the ingestor with an explicit prober
pub async fn build_ingestor_with(config: &Config, prober: Arc<dyn DeviceProber>) -> Result<Ingestor> {
    let store = build_store(&config.store).await?;
    let classifier = Classifier::from_config(&config.classifier.rules)?;
    info!(rules = classifier.len(), "classifier ready");

    Ok(Ingestor::new(prober, store, classifier, config.ingest.clone()))
}

/// Build the full engine from configuration
pub async fn build_ingestor(config: &Config) -> Result<Ingestor> {
    let prober = build_prober(&config.probe)?;
    build_ingestor_with(config, prober).await
}
