//! Autocomplete search box backed by forward lookups.
//!
//! Each query takes a ticket from a monotonically increasing counter. When
//! the lookup returns, the result is only used if no newer query has been
//! issued in the meantime, so a slow early response cannot overwrite a
//! faster later one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use water_report_geocoder::{AddressResolver, Suggestion};

/// Identifies one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Address input with suggestion lookups.
pub struct AddressSearchBox {
    resolver: Arc<dyn AddressResolver>,
    latest: AtomicU64,
}

impl AddressSearchBox {
    #[must_use]
    pub fn new(resolver: Arc<dyn AddressResolver>) -> Self {
        Self {
            resolver,
            latest: AtomicU64::new(0),
        }
    }

    /// Issues a new ticket, superseding all earlier ones.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest query.
    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Looks up suggestions for `text`.
    ///
    /// A failed lookup yields an empty list. Returns `None` when a newer
    /// query was issued before this one completed; the caller should drop
    /// the result.
    pub async fn suggest(&self, text: &str) -> Option<Vec<Suggestion>> {
        let ticket = self.begin();

        let suggestions = match self.resolver.forward_lookup(text).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                log::debug!("No suggestions for {text:?}: {e}");
                Vec::new()
            }
        };

        if self.is_current(ticket) {
            Some(suggestions)
        } else {
            log::debug!("Discarding stale suggestions for {text:?}");
            None
        }
    }
}
