use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks and DTOs)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;

    /// Whole-record replacement. The stored id must survive the call.
    fn on_replace(&mut self, next: Self) -> Result<(), String> {
        *self = next;
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> { Ok(()) }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Capacity exceeded: at most {capacity} items allowed")]
    CapacityExceeded { capacity: usize },
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Store is read-only")]
    ReadOnly,
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE ORDERED STORE
// =============================================================================

/// Insertion-ordered, capacity-bounded collection with a selection cursor.
///
/// Every mutation either commits completely or returns an error with the
/// store untouched. The selection is always `None` or the id of a stored item.
#[derive(Debug)]
pub struct OrderedStore<T: Entity> {
    items: Vec<T>,
    capacity: usize,
    selected: Option<T::Id>,
    read_only: bool,
}

impl<T: Entity> OrderedStore<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            selected: None,
            read_only: false,
        }
    }

    /// Seeds the store. The first item becomes the selection.
    pub fn with_items(capacity: usize, items: Vec<T>) -> Result<Self, FrameworkError> {
        if items.len() > capacity {
            return Err(FrameworkError::CapacityExceeded { capacity });
        }
        for (index, item) in items.iter().enumerate() {
            if items[..index].iter().any(|other| other.id() == item.id()) {
                return Err(FrameworkError::DuplicateId(item.id().to_string()));
            }
        }
        let selected = items.first().map(|item| item.id().clone());
        Ok(Self {
            items,
            capacity,
            selected,
            read_only: false,
        })
    }

    pub fn items(&self) -> &[T] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn capacity(&self) -> usize { self.capacity }
    pub fn is_full(&self) -> bool { self.items.len() >= self.capacity }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[cfg(test)]
    pub fn selected_id(&self) -> Option<&T::Id> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn ensure_writable(&self) -> Result<(), FrameworkError> {
        if self.read_only {
            Err(FrameworkError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Checks that one more item may be inserted.
    pub fn ensure_room(&self) -> Result<(), FrameworkError> {
        self.ensure_writable()?;
        if self.is_full() {
            return Err(FrameworkError::CapacityExceeded { capacity: self.capacity });
        }
        Ok(())
    }

    /// Appends an item and selects it.
    pub fn insert(&mut self, item: T) -> Result<(), FrameworkError> {
        self.ensure_room()?;
        if self.position(item.id()).is_some() {
            return Err(FrameworkError::DuplicateId(item.id().to_string()));
        }
        self.selected = Some(item.id().clone());
        self.items.push(item);
        Ok(())
    }

    /// Replaces the stored item carrying `next`'s id. `Ok(None)` if absent.
    pub fn replace(&mut self, next: T) -> Result<Option<&T>, FrameworkError> {
        self.ensure_writable()?;
        let Some(index) = self.position(next.id()) else {
            return Ok(None);
        };
        let mut candidate = self.items[index].clone();
        candidate.on_replace(next).map_err(FrameworkError::Rejected)?;
        self.commit(index, candidate).map(Some)
    }

    /// Applies a patch to the item with `id`. `Ok(None)` if absent.
    pub fn update(&mut self, id: &T::Id, patch: T::Patch) -> Result<Option<&T>, FrameworkError> {
        self.ensure_writable()?;
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut candidate = self.items[index].clone();
        candidate.on_update(patch).map_err(FrameworkError::Rejected)?;
        self.commit(index, candidate).map(Some)
    }

    fn commit(&mut self, index: usize, candidate: T) -> Result<&T, FrameworkError> {
        if candidate.id() != self.items[index].id() {
            return Err(FrameworkError::Rejected(format!(
                "id {} is immutable",
                self.items[index].id()
            )));
        }
        self.items[index] = candidate;
        Ok(&self.items[index])
    }

    /// Removes the item with `id`. `Ok(None)` if absent.
    ///
    /// Removing the selected item moves the selection to the first remaining
    /// item, or clears it when the store becomes empty.
    pub fn remove(&mut self, id: &T::Id) -> Result<Option<T>, FrameworkError> {
        self.ensure_writable()?;
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        self.items[index].on_delete().map_err(FrameworkError::Rejected)?;
        let removed = self.items.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = self.items.first().map(|item| item.id().clone());
        }
        Ok(Some(removed))
    }

    /// Selects `id` if it is stored. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: &T::Id) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Moves the selection one step forward, wrapping around.
    pub fn select_next(&mut self) -> Option<&T::Id> {
        self.step(true)
    }

    /// Moves the selection one step back, wrapping around.
    pub fn select_previous(&mut self) -> Option<&T::Id> {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> Option<&T::Id> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let current = self.selected.as_ref().and_then(|id| self.position(id));
        let index = match (current, forward) {
            (Some(index), true) => (index + 1) % len,
            (Some(index), false) => (index + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.selected = Some(self.items[index].id().clone());
        self.selected.as_ref()
    }
}

// =============================================================================
// 3. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Called with the full item list after every committed mutation.
pub type ChangeListener<T> = Box<dyn Fn(&[T]) + Send + Sync>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<Option<T>>,
    },
    Replace {
        item: T,
        respond_to: Response<Option<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
    Select {
        id: T::Id,
        respond_to: Response<bool>,
    },
    SelectNext {
        respond_to: Response<Option<T::Id>>,
    },
    SelectPrevious {
        respond_to: Response<Option<T::Id>>,
    },
    Selected {
        respond_to: Response<Option<T>>,
    },
    SetReadOnly {
        read_only: bool,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 4. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: OrderedStore<T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    on_change: ChangeListener<T>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        capacity: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: OrderedStore::new(capacity),
            next_id_fn: Box::new(next_id_fn),
            on_change: Box::new(|_: &[T]| {}),
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    /// Seeds the actor's store before it starts running.
    pub fn with_items(mut self, items: Vec<T>) -> Result<Self, FrameworkError> {
        self.store = OrderedStore::with_items(self.store.capacity(), items)?;
        Ok(self)
    }

    /// Registers the listener notified after each committed mutation.
    pub fn on_change(mut self, listener: impl Fn(&[T]) + Send + Sync + 'static) -> Self {
        self.on_change = Box::new(listener);
        self
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.items().to_vec()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = self.store.update(&id, patch).map(|item| item.cloned());
                    let _ = respond_to.send(self.settle(result));
                }
                ResourceRequest::Replace { item, respond_to } => {
                    let result = self.store.replace(item).map(|item| item.cloned());
                    let _ = respond_to.send(self.settle(result));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = self.store.remove(&id);
                    let _ = respond_to.send(self.settle(result).map(|removed| removed.is_some()));
                }
                ResourceRequest::Select { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.select(&id)));
                }
                ResourceRequest::SelectNext { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.select_next().cloned()));
                }
                ResourceRequest::SelectPrevious { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.select_previous().cloned()));
                }
                ResourceRequest::Selected { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.selected().cloned()));
                }
                ResourceRequest::SetReadOnly { read_only, respond_to } => {
                    self.store.set_read_only(read_only);
                    let _ = respond_to.send(Ok(()));
                }
            }
        }
        debug!("Resource actor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        if let Err(e) = self.store.ensure_room() {
            warn!(error = %e, "Create rejected");
            return Err(e);
        }
        // Seeded items may already use ids the generator will produce.
        let mut id = (self.next_id_fn)();
        while self.store.get(&id).is_some() {
            id = (self.next_id_fn)();
        }
        let mut item = T::from_create(id.clone(), payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(item)?;
        debug!(id = %id, len = self.store.len(), "Item created");
        self.notify();
        Ok(id)
    }

    /// Notifies the listener when a mutation touched an existing item.
    fn settle<R>(&self, result: Result<Option<R>, FrameworkError>) -> Result<Option<R>, FrameworkError> {
        match &result {
            Ok(Some(_)) => self.notify(),
            Ok(None) => debug!("Item not found, nothing changed"),
            Err(e) => warn!(error = %e, "Mutation rejected"),
        }
        result
    }

    fn notify(&self) {
        (self.on_change)(self.store.items());
    }
}

// =============================================================================
// 5. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(request(respond_to))
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn replace(&self, item: T) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Replace { item, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn select(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Select { id, respond_to }).await
    }

    pub async fn select_next(&self) -> Result<Option<T::Id>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::SelectNext { respond_to }).await
    }

    pub async fn select_previous(&self) -> Result<Option<T::Id>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::SelectPrevious { respond_to }).await
    }

    pub async fn selected(&self) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Selected { respond_to }).await
    }

    pub async fn set_read_only(&self, read_only: bool) -> Result<(), FrameworkError> {
        self.call(|respond_to| ResourceRequest::SetReadOnly { read_only, respond_to }).await
    }
}

// =============================================================================
// 6. EXAMPLE USAGE (Test)
// =============================================================================
