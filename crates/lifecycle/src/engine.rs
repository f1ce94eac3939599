//! Moderation and broadcast, each executed as one bounded transaction.

use std::sync::Arc;
use std::time::Duration;

use bulletin_core::error::CoreError;
use bulletin_core::lifecycle::{
    check_broadcastable, check_moderation_transition, plan_moderation, Channel,
    AUDIT_ACTION_BROADCAST_SUCCESSFUL,
};
use bulletin_core::types::DbId;
use bulletin_db::models::event::Event;
use bulletin_db::models::publish_audit::NewPublishAudit;
use bulletin_db::repositories::{EventRepo, PublishAuditRepo};
use bulletin_db::{with_deadline, DbPool, StoreError, StoreResult};

use crate::delivery::DeliveryRegistry;

/// Drives the event state machine and channel fanout.
///
/// Holds the pool and the delivery registry; cheap to clone.
#[derive(Debug, Clone)]
pub struct LifecycleEngine {
    pool: DbPool,
    deliveries: Arc<DeliveryRegistry>,
    tx_timeout: Duration,
}

impl LifecycleEngine {
    pub fn new(pool: DbPool, deliveries: Arc<DeliveryRegistry>, tx_timeout: Duration) -> Self {
        Self {
            pool,
            deliveries,
            tx_timeout,
        }
    }

    /// Approve or reject an event.
    ///
    /// `action` must be `approved` or `rejected`; approving requires a
    /// non-blank `channel`. Both are checked before the database is touched.
    /// The status change and its audit row commit together or not at all.
    pub async fn moderate(
        &self,
        event_id: DbId,
        action: &str,
        performed_by: DbId,
        channel: Option<&str>,
    ) -> StoreResult<Event> {
        let plan = plan_moderation(action, channel)?;

        with_deadline(self.tx_timeout, async {
            let mut tx = self.pool.begin().await?;

            let event = EventRepo::find_in_tx(&mut tx, event_id)
                .await?
                .ok_or_else(|| StoreError::event_not_found(event_id))?;
            check_moderation_transition(event.status()?, plan.action)?;

            EventRepo::set_status(&mut tx, event_id, plan.new_status).await?;
            PublishAuditRepo::insert(
                &mut tx,
                &NewPublishAudit {
                    event_id,
                    action: plan.audit_action,
                    performed_by,
                    channel: &plan.audit_channel,
                },
            )
            .await?;

            tx.commit().await?;
            Ok::<(), StoreError>(())
        })
        .await?;

        tracing::info!(
            event_id,
            performed_by,
            status = %plan.new_status,
            channel = %plan.audit_channel,
            "Event moderated"
        );
        self.reload(event_id).await
    }

    /// Fan an approved event out to every channel in its audit history.
    ///
    /// Each recorded channel is delivered once, in channel-name order, and
    /// gets a `broadcast successful` audit row. Channels with no deliverer
    /// are skipped. A delivery failure rolls back every row this call wrote.
    pub async fn broadcast(&self, event_id: DbId, performed_by: DbId) -> StoreResult<Event> {
        let delivered = with_deadline(self.tx_timeout, async {
            let mut tx = self.pool.begin().await?;

            let event = EventRepo::find_in_tx(&mut tx, event_id)
                .await?
                .ok_or_else(|| StoreError::event_not_found(event_id))?;
            check_broadcastable(event.status()?)?;

            let recorded = PublishAuditRepo::distinct_channels(&mut tx, event_id).await?;
            let mut delivered = Vec::with_capacity(recorded.len());

            for name in &recorded {
                let Some(channel) = Channel::from_recorded(name) else {
                    tracing::debug!(event_id, channel = %name, "Skipping unknown channel");
                    continue;
                };
                let Some(deliverer) = self.deliveries.get(channel) else {
                    tracing::debug!(event_id, %channel, "No deliverer registered, skipping");
                    continue;
                };

                if let Err(e) = deliverer.deliver(&event).await {
                    tracing::warn!(
                        event_id,
                        %channel,
                        error = %e,
                        "Delivery failed, rolling back broadcast"
                    );
                    return Err(StoreError::from(CoreError::DeliveryFailed {
                        channel: channel.to_string(),
                        message: e.to_string(),
                    }));
                }

                PublishAuditRepo::insert(
                    &mut tx,
                    &NewPublishAudit {
                        event_id,
                        action: AUDIT_ACTION_BROADCAST_SUCCESSFUL,
                        performed_by,
                        channel: channel.as_str(),
                    },
                )
                .await?;
                tracing::info!(event_id, %channel, "Delivery attempted");
                delivered.push(channel);
            }

            tx.commit().await?;
            Ok::<Vec<Channel>, StoreError>(delivered)
        })
        .await?;

        tracing::info!(
            event_id,
            performed_by,
            channels = ?delivered,
            "Event broadcast"
        );
        self.reload(event_id).await
    }

    /// Re-read an event after commit.
    async fn reload(&self, event_id: DbId) -> StoreResult<Event> {
        EventRepo::find_by_id(&self.pool, event_id)
            .await?
            .ok_or_else(|| StoreError::event_not_found(event_id))
    }
}
