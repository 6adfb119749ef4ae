use crate::error::ApiError;
use crate::transport::PageTransport;
use configuration::OrderingPolicy;
use core_types::{PageRequest, PagedResult, QueryOutcome};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where the client is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPhase {
    /// Nothing has been requested yet.
    Idle,
    /// At least one request has not settled.
    Requesting,
    /// Every request issued so far has settled.
    Settled,
}

/// Everything an observer of a `PagedResourceClient` can see.
#[derive(Debug, Clone)]
pub struct PageSnapshot<T> {
    pub current_page: u32,
    /// `None` until the first response is accepted.
    pub last_outcome: Option<QueryOutcome<PagedResult<T>>>,
    pub phase: ClientPhase,
    pub in_flight: usize,
    /// Id of the most recently issued request; ids start at 1.
    pub latest_request_id: u64,
}

impl<T> PageSnapshot<T> {
    fn new() -> Self {
        Self {
            current_page: 1,
            last_outcome: None,
            phase: ClientPhase::Idle,
            in_flight: 0,
            latest_request_id: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Client-side state machine for one paginated resource.
///
/// Each submission runs as its own task and several may be in flight at once; there is no
/// cancellation. Which settled response becomes `last_outcome` is decided by the
/// `OrderingPolicy`. Dropping the client closes the state channel, and responses settling
/// afterwards are discarded.
pub struct PagedResourceClient<T> {
    transport: Arc<dyn PageTransport<T>>,
    limit: u32,
    policy: OrderingPolicy,
    state: Arc<watch::Sender<PageSnapshot<T>>>,
}

impl<T> PagedResourceClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(transport: Arc<dyn PageTransport<T>>, limit: u32, policy: OrderingPolicy) -> Self {
        let (state, _) = watch::channel(PageSnapshot::new());
        Self {
            transport,
            limit,
            policy,
            state: Arc::new(state),
        }
    }

    /// Requests the first page.
    pub fn initialize(&self) -> Result<JoinHandle<()>, ApiError> {
        self.change_page(1)
    }

    /// Moves to `page` right away and requests it. The returned handle completes once the
    /// response has settled; awaiting it is optional.
    pub fn change_page(&self, page: u32) -> Result<JoinHandle<()>, ApiError> {
        let request = PageRequest::new(page, self.limit)?;

        let mut request_id = 0;
        self.state.send_modify(|s| {
            s.current_page = page;
            s.latest_request_id += 1;
            request_id = s.latest_request_id;
            s.in_flight += 1;
            s.phase = ClientPhase::Requesting;
        });
        tracing::debug!(page, request_id, "Submitting page request.");

        let transport = Arc::clone(&self.transport);
        let state = Arc::downgrade(&self.state);
        let policy = self.policy;
        Ok(tokio::spawn(async move {
            let outcome = transport.fetch_page(request).await;
            settle(&state, policy, request_id, outcome);
        }))
    }

    /// A receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn current_page(&self) -> u32 {
        self.state.borrow().current_page
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

fn settle<T>(
    state: &Weak<watch::Sender<PageSnapshot<T>>>,
    policy: OrderingPolicy,
    request_id: u64,
    outcome: QueryOutcome<PagedResult<T>>,
) {
    let Some(state) = state.upgrade() else {
        tracing::debug!(request_id, "Client dropped before the response settled.");
        return;
    };
    state.send_modify(|s| {
        s.in_flight = s.in_flight.saturating_sub(1);
        let accept = match policy {
            OrderingPolicy::LastArrival => true,
            OrderingPolicy::LatestIssued => request_id == s.latest_request_id,
        };
        if accept {
            s.last_outcome = Some(outcome);
        } else {
            tracing::debug!(request_id, latest = s.latest_request_id, "Discarding stale response.");
        }
        s.phase = if s.in_flight == 0 {
            ClientPhase::Settled
        } else {
            ClientPhase::Requesting
        };
    });
}
