//! Navigation seam between the assistant and the host application
//!
//! The engine never routes anything itself. When a quick reply carrying a
//! target is chosen, the executor hands the target to the host's
//! [`Navigator`] once the assistant has closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a host page (e.g. `"contact"`, `"orders"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Host-supplied navigation collaborator
pub trait Navigator: Send + Sync {
    /// Route the host application to `page`
    fn navigate(&self, page: &PageId);

    /// Whether `page` is a route the host knows. Checked against every
    /// quick-reply target when an assistant is mounted.
    fn can_navigate(&self, _page: &PageId) -> bool {
        true
    }
}

impl<F> Navigator for F
where
    F: Fn(&PageId) + Send + Sync,
{
    fn navigate(&self, page: &PageId) {
        self(page);
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, page: &PageId) {
        (**self).navigate(page);
    }

    fn can_navigate(&self, page: &PageId) -> bool {
        (**self).can_navigate(page)
    }
}

/// Navigator restricted to a fixed set of known routes
pub struct RouteTable<N> {
    routes: Vec<PageId>,
    inner: N,
}

impl<N: Navigator> RouteTable<N> {
    pub fn new(routes: impl IntoIterator<Item = PageId>, inner: N) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            inner,
        }
    }
}

impl<N: Navigator> Navigator for RouteTable<N> {
    fn navigate(&self, page: &PageId) {
        self.inner.navigate(page);
    }

    fn can_navigate(&self, page: &PageId) -> bool {
        self.routes.contains(page)
    }
}

/// Fires the host callback for a resolved navigation
pub(crate) struct NavigationTrigger {
    navigator: Arc<dyn Navigator>,
}

impl NavigationTrigger {
    pub(crate) fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    pub(crate) fn can_navigate(&self, page: &PageId) -> bool {
        self.navigator.can_navigate(page)
    }

    pub(crate) fn fire(&self, page: &PageId) {
        tracing::info!(page = %page, "Navigating host");
        self.navigator.navigate(page);
    }
}
