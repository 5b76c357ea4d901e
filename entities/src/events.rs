//! Entity lifecycle events and listener registration.

use std::fmt;

use fieldpath::FieldPath;

use crate::entity::Entity;

/// A lifecycle notification.
///
/// For one entity, events within a packet arrive in the order created,
/// entered, updated, left, deleted. `UpdatesCompleted` closes each packet.
#[derive(Debug, Clone, Copy)]
pub enum EntityEvent<'a> {
    Created(&'a Entity),
    Entered(&'a Entity),
    /// `changed` lists the paths written by the update, in decode order.
    Updated {
        entity: &'a Entity,
        changed: &'a [FieldPath],
    },
    Left(&'a Entity),
    Deleted(&'a Entity),
    UpdatesCompleted,
}

impl<'a> EntityEvent<'a> {
    /// The entity the event is about, if any.
    #[must_use]
    pub const fn entity(&self) -> Option<&'a Entity> {
        match *self {
            Self::Created(entity)
            | Self::Entered(entity)
            | Self::Updated { entity, .. }
            | Self::Left(entity)
            | Self::Deleted(entity) => Some(entity),
            Self::UpdatesCompleted => None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Created(_) => EventKind::Created,
            Self::Entered(_) => EventKind::Entered,
            Self::Updated { .. } => EventKind::Updated,
            Self::Left(_) => EventKind::Left,
            Self::Deleted(_) => EventKind::Deleted,
            Self::UpdatesCompleted => EventKind::UpdatesCompleted,
        }
    }
}

/// Discriminant of an [`EntityEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Entered,
    Updated,
    Left,
    Deleted,
    UpdatesCompleted,
}

/// A predicate restricting which entities a listener hears about.
pub struct EntityFilter(Box<dyn Fn(&Entity) -> bool>);

impl EntityFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Entity) -> bool + 'static,
    {
        Self(Box::new(predicate))
    }

    /// Matches entities whose class name equals `name`.
    pub fn class_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |entity| entity.class_name() == name)
    }

    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        (self.0)(entity)
    }
}

impl fmt::Debug for EntityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntityFilter(..)")
    }
}

/// Identifies a subscription for [`Listeners::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&EntityEvent<'_>)>;

struct Subscription {
    id: SubscriptionId,
    filter: Option<EntityFilter>,
    callback: Callback,
}

/// Registered listeners, dispatched synchronously in subscription order.
#[derive(Default)]
pub struct Listeners {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    muted: bool,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`, optionally restricted by `filter`.
    ///
    /// Filters apply to entity events only; `UpdatesCompleted` reaches every
    /// listener.
    pub fn subscribe<F>(&mut self, filter: Option<EntityFilter>, callback: F) -> SubscriptionId
    where
        F: FnMut(&EntityEvent<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Suppresses all delivery while set.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn emit(&mut self, event: &EntityEvent<'_>) {
        if self.muted {
            return;
        }
        let entity = event.entity();
        for sub in &mut self.subscriptions {
            if let (Some(filter), Some(entity)) = (&sub.filter, entity) {
                if !filter.matches(entity) {
                    continue;
                }
            }
            (sub.callback)(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("subscriptions", &self.subscriptions.len())
            .field("muted", &self.muted)
            .finish()
    }
}
