//! `InventoryActor`: front door to the ingestion engine
//!
//! Owns the `Ingestor` and handles one request at a time; a bulk run
//! occupies the actor until its report is complete.

use kameo::actor::{ActorRef, WeakActorRef};
use kameo::error::ActorStopReason;
use kameo::message::{Context, Message};
use kameo::prelude::*;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::ingest::Ingestor;
use crate::message::{DeleteDevice, GetDevice, IngestBatch, IngestDevice, ListDevices};
use crate::record::DeviceRecord;
use crate::report::{IngestionOutcome, IngestionReport};

/// Arguments for spawning an `InventoryActor`
pub struct InventoryActorArgs {
    /// Engine shared with the actor
    pub ingestor: Ingestor,
}

/// Actor serializing inventory requests
pub struct InventoryActor {
    ingestor: Ingestor,
    bulk_runs: u64,
}

impl InventoryActor {
    /// Number of bulk runs handled so far
    #[must_use]
    pub fn bulk_runs(&self) -> u64 {
        self.bulk_runs
    }
}

impl Actor for InventoryActor {
    type Args = InventoryActorArgs;
    type Error = CoreError;

    async fn on_start(args: Self::Args, actor_ref: ActorRef<Self>) -> Result<Self, Self::Error> {
        info!(
            id = %actor_ref.id(),
            store = args.ingestor.store().backend(),
            "InventoryActor starting"
        );

        Ok(Self {
            ingestor: args.ingestor,
            bulk_runs: 0,
        })
    }

    async fn on_stop(
        &mut self,
        _actor_ref: WeakActorRef<Self>,
        reason: ActorStopReason,
    ) -> Result<(), Self::Error> {
        info!(reason = ?reason, bulk_runs = self.bulk_runs, "InventoryActor stopping");
        Ok(())
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Message<IngestBatch> for InventoryActor {
    type Reply = Result<IngestionReport, CoreError>;

    async fn handle(
        &mut self,
        msg: IngestBatch,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        self.bulk_runs += 1;
        let result = self.ingestor.ingest(&msg.addresses).await;
        if let Err(e) = &result {
            warn!(run = self.bulk_runs, error = %e, "bulk ingestion failed");
        }
        result
    }
}

impl Message<IngestDevice> for InventoryActor {
    type Reply = Result<IngestionOutcome, CoreError>;

    async fn handle(
        &mut self,
        msg: IngestDevice,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        let address = msg.address.trim();
        if address.is_empty() {
            return Err(CoreError::SourceError("empty device address".to_string()));
        }
        self.ingestor.store().ping().await?;
        self.ingestor.ingest_one(address).await
    }
}

impl Message<ListDevices> for InventoryActor {
    type Reply = Result<Vec<DeviceRecord>, CoreError>;

    async fn handle(
        &mut self,
        _msg: ListDevices,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        Ok(self.ingestor.store().all().await?)
    }
}

impl Message<GetDevice> for InventoryActor {
    type Reply = Result<DeviceRecord, CoreError>;

    async fn handle(
        &mut self,
        msg: GetDevice,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        self.ingestor
            .store()
            .find_by_hostname(&msg.hostname)
            .await?
            .ok_or(CoreError::DeviceNotFound(msg.hostname))
    }
}

impl Message<DeleteDevice> for InventoryActor {
    type Reply = Result<(), CoreError>;

    async fn handle(
        &mut self,
        msg: DeleteDevice,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        if self.ingestor.store().delete(&msg.hostname).await? {
            info!(hostname = %msg.hostname, "device removed from inventory");
            Ok(())
        } else {
            Err(CoreError::DeviceNotFound(msg.hostname))
        }
    }
}
