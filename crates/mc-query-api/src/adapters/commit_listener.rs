//! Event-bus listener that feeds committed blocks into the service.

use shared_bus::{ChainEvent, EventFilter, EventTopic, InMemoryEventBus};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::QueryApiService;

/// Subscribe `service` to block-commit events on `bus`.
///
/// The returned task runs until the bus publishes a shutdown event or
/// every publisher is dropped. It only forwards commits into the
/// service's notification pipeline; it never blocks on subscriber
/// delivery, so a slow subscriber cannot back up the bus.
pub fn spawn_commit_listener(service: QueryApiService, bus: &InMemoryEventBus) -> JoinHandle<()> {
    let mut subscription = bus.subscribe(EventFilter::topics(vec![
        EventTopic::Commit,
        EventTopic::Control,
    ]));

    tokio::spawn(async move {
        info!("Commit listener started");
        loop {
            match subscription.recv().await {
                Some(ChainEvent::BlockApplied(block)) => {
                    debug!(block_num = block.block_num, "Commit event received");
                    service.on_block_applied(block);
                }
                Some(ChainEvent::ShuttingDown) => {
                    info!("Shutdown event received, stopping commit listener");
                    service.shutdown();
                    break;
                }
                None => {
                    info!("Event bus closed, stopping commit listener");
                    break;
                }
            }
        }
    })
}
