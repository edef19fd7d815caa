//! Refresh on backend change notifications
//!
//! The console receives create/update/delete notifications per entity over
//! a push channel. A table whose entity is concerned refreshes its rows.

use evdash_domain::{ChangeNotification, TableRecord};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::data_source::DataSource;

impl<R: TableRecord> DataSource<R> {
    /// Refresh whenever a notification concerns this table's entity.
    ///
    /// The task ends when the channel closes or the table is dropped. A
    /// lagging receiver refreshes once, since it cannot know what it missed.
    pub fn watch_changes(&self, mut notifications: Receiver<ChangeNotification>) -> JoinHandle<()> {
        let source = self.downgrade();
        let closed = self.shared.closed.clone();
        let entity = self.definition().def().entity.clone();

        tokio::spawn(async move {
            let Some(entity) = entity else {
                debug!("table has no entity, ignoring change notifications");
                return;
            };

            loop {
                let received = tokio::select! {
                    biased;
                    () = closed.cancelled() => break,
                    received = notifications.recv() => received,
                };
                let refresh = match received {
                    Ok(notification) => notification.concerns(&entity),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, entity = %entity, "change notifications lagged");
                        true
                    }
                    Err(RecvError::Closed) => break,
                };

                let Some(source) = source.upgrade() else {
                    break;
                };
                if refresh {
                    debug!(entity = %entity, "refreshing after change notification");
                    let _ = source.refresh_data().await;
                }
            }
            debug!(entity = %entity, "change watch ended");
        })
    }
}
