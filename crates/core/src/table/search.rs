//! Search box debounce
//!
//! Keystrokes are collected until the input has been quiet for the
//! table's debounce time. The settled text is applied as search and the
//! table reloads, unless it equals the previously applied text.

use std::time::Duration;

use evdash_common::{Debouncer, DebouncerConfig};
use evdash_domain::TableRecord;
use tracing::debug;

use super::data_source::DataSource;

pub struct SearchDebouncer {
    debouncer: Debouncer<String>,
}

impl SearchDebouncer {
    /// Debounce with the table's configured quiet period.
    pub fn new<R: TableRecord>(source: &DataSource<R>) -> Self {
        Self::with_quiet(source, source.definition().search_debounce())
    }

    pub fn with_quiet<R: TableRecord>(source: &DataSource<R>, quiet: Duration) -> Self {
        let source = source.downgrade();
        let debouncer = Debouncer::spawn(DebouncerConfig::new(quiet), move |text: String| {
            let source = source.clone();
            async move {
                let Some(source) = source.upgrade() else {
                    return;
                };
                debug!(search = %text, "search settled");
                source.apply_search(&text);
                let _ = source.load().await;
            }
        });
        Self { debouncer }
    }

    /// Feed the current content of the search box.
    pub fn on_input(&self, text: impl Into<String>) -> bool {
        self.debouncer.push(text.into())
    }

    pub async fn shutdown(self) {
        self.debouncer.shutdown().await;
    }
}
