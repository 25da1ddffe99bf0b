//! Remote book lookup
//!
//! A lookup runs in two dependent stages: a metadata query for the identifier,
//! then a download of the cover thumbnail it links to. Each service instance
//! tracks at most one lookup; starting a new one cancels the previous one.

mod volumes;

pub use volumes::{parse_volumes, VolumeMatch, VolumesClient};

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::types::Book;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Result of a lookup, delivered exactly once per request
#[derive(Debug)]
pub enum LookupOutcome {
    /// Metadata and cover resolved (the cover is absent only when the
    /// thumbnail-less policy allowed it)
    Found(Book),

    /// Metadata resolved but the cover stage failed; the book has no cover
    Partial { book: Book, error: LookupError },

    /// The endpoint answered but had no usable volume
    NotFound,

    /// The metadata stage failed
    Failed(LookupError),
}

impl LookupOutcome {
    /// Split into the `(book, error)` pair; `(None, None)` means not found
    pub fn into_parts(self) -> (Option<Book>, Option<LookupError>) {
        match self {
            LookupOutcome::Found(book) => (Some(book), None),
            LookupOutcome::Partial { book, error } => (Some(book), Some(error)),
            LookupOutcome::NotFound => (None, None),
            LookupOutcome::Failed(error) => (None, Some(error)),
        }
    }

    pub fn book(&self) -> Option<&Book> {
        match self {
            LookupOutcome::Found(book) | LookupOutcome::Partial { book, .. } => Some(book),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupOutcome::Partial { error, .. } | LookupOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupOutcome::NotFound)
    }
}

/// Completion callback for [`BookLookup::lookup`]
pub type LookupCallback = Box<dyn FnOnce(LookupOutcome) + Send + 'static>;

/// Resolves identifiers (usually ISBNs) to books
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Resolve `identifier`, waiting for both stages
    async fn get_book(&self, identifier: &str) -> LookupOutcome;

    /// Start resolving `identifier` in the background; `callback` runs once
    /// with the outcome. Must be called from within a Tokio runtime.
    fn lookup(&self, identifier: &str, callback: LookupCallback);

    /// Cancel the most recent lookup. The cover download always observes
    /// this; an in-flight metadata request does on a best-effort basis.
    fn cancel(&self);
}

/// The single lookup a service is tracking
struct LookupHandle {
    generation: u64,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Lookup service backed by the remote volumes endpoint
pub struct LookupService {
    client: Arc<VolumesClient>,
    active: Mutex<Option<LookupHandle>>,
    generation: AtomicU64,
}

impl LookupService {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self::with_client(VolumesClient::new(config)?))
    }

    pub fn with_client(client: VolumesClient) -> Self {
        Self {
            client: Arc::new(client),
            active: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Whether a background lookup is still running
    pub fn is_busy(&self) -> bool {
        self.slot()
            .as_ref()
            .and_then(|handle| handle.task.as_ref())
            .is_some_and(|task| !task.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<LookupHandle>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancel whatever is tracked and install a fresh token
    fn begin(&self) -> (u64, CancellationToken) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            debug!("Cancelling previous lookup");
            previous.token.cancel();
        }
        let token = CancellationToken::new();
        *slot = Some(LookupHandle {
            generation,
            token: token.clone(),
            task: None,
        });
        (generation, token)
    }
}

#[async_trait]
impl BookLookup for LookupService {
    async fn get_book(&self, identifier: &str) -> LookupOutcome {
        let (_, token) = self.begin();
        resolve(&self.client, identifier, &token).await
    }

    fn lookup(&self, identifier: &str, callback: LookupCallback) {
        let (generation, token) = self.begin();
        let client = Arc::clone(&self.client);
        let identifier = identifier.to_string();

        let task = tokio::spawn(async move {
            let outcome = resolve(&client, &identifier, &token).await;
            callback(outcome);
        });

        if let Some(handle) = self.slot().as_mut() {
            if handle.generation == generation {
                handle.task = Some(task);
            }
        }
    }

    fn cancel(&self) {
        if let Some(handle) = self.slot().as_ref() {
            debug!("Cancelling lookup");
            handle.token.cancel();
        }
    }
}

/// Run both stages for `identifier`
async fn resolve(
    client: &VolumesClient,
    identifier: &str,
    token: &CancellationToken,
) -> LookupOutcome {
    info!("Looking up '{}'", identifier);

    let found = tokio::select! {
        biased;
        _ = token.cancelled() => return LookupOutcome::Failed(LookupError::Cancelled),
        result = client.find_volume(identifier) => result,
    };

    let volume = match found {
        Ok(Some(volume)) => volume,
        Ok(None) => {
            info!("No volume found for '{}'", identifier);
            return LookupOutcome::NotFound;
        }
        Err(e) => {
            info!("Lookup for '{}' failed: {}", identifier, e);
            return LookupOutcome::Failed(e);
        }
    };

    let book = volume.to_book();
    let Some(thumbnail) = volume.thumbnail else {
        return LookupOutcome::Found(book);
    };

    let cover = tokio::select! {
        biased;
        _ = token.cancelled() => Err(LookupError::Cancelled),
        result = client.download_cover(&thumbnail) => result,
    };

    match cover {
        Ok(cover) => {
            info!("Found '{}' with {} byte cover", book.title, cover.len());
            LookupOutcome::Found(book.with_cover(cover))
        }
        Err(error) => {
            info!("Found '{}' but cover failed: {}", book.title, error);
            LookupOutcome::Partial { book, error }
        }
    }
}
