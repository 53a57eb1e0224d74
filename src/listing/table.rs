//! Paginated table controller shared by the Tags, Topics, Roles, Problems and
//! Contests pages.
//!
//! A fetch is split into [`TableController::begin_fetch`] and
//! [`TableController::finish_fetch`] so the host can render the skeleton while
//! the request is in flight. Only the response to the latest request is
//! applied.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AdminError, AdminResult, ServiceResult};
use crate::listing::confirm::{PendingAction, RowAction};
use crate::listing::query::{ListEvent, ListQuery, SortKey};
use crate::models::{PageMeta, Paginated};
use crate::notify::{Notifier, Toast};

/// Anything that can serve one page of a table
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Send;
    type Sort: SortKey;

    async fn fetch(&self, query: &ListQuery<Self::Sort>) -> ServiceResult<Paginated<Self::Item>>;
}

/// A list source whose rows support confirmation-gated actions
#[async_trait]
pub trait ManagedSource: ListSource {
    /// Display name of the entity, e.g. "Tag"
    const ENTITY: &'static str;

    fn id_of(item: &Self::Item) -> uuid::Uuid;

    fn label_of(item: &Self::Item) -> String;

    /// Refuse actions the row does not allow, before any dialog is shown
    fn guard(_item: &Self::Item, _action: RowAction) -> AdminResult<()> {
        Ok(())
    }

    async fn perform(&self, id: uuid::Uuid, action: RowAction) -> ServiceResult<()>;
}

/// What the table should render right now
#[derive(Debug, PartialEq)]
pub enum TableView<'a, T> {
    /// Skeleton rows
    Loading,
    /// Empty-state message
    Empty,
    /// Nothing could be loaded; the host offers a retry
    Failed,
    Rows { rows: &'a [T], meta: &'a PageMeta },
}

/// Request handed out by [`TableController::begin_fetch`]
#[derive(Debug, Clone)]
pub struct FetchTicket<S: SortKey> {
    seq: u64,
    pub query: ListQuery<S>,
}

pub struct TableController<Src: ListSource + ?Sized> {
    source: Arc<Src>,
    notifier: Arc<dyn Notifier>,
    query: ListQuery<Src::Sort>,
    rows: Vec<Src::Item>,
    meta: PageMeta,
    loading: bool,
    /// A page has been applied at least once
    loaded: bool,
    /// The latest request failed
    failed: bool,
    seq: u64,
}

impl<Src: ListSource + ?Sized> TableController<Src> {
    pub fn new(source: Arc<Src>, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        let query = ListQuery::with_limit(page_size);
        let meta = PageMeta::empty(query.limit);
        Self {
            source,
            notifier,
            query,
            rows: Vec::new(),
            meta,
            loading: false,
            loaded: false,
            failed: false,
            seq: 0,
        }
    }

    pub fn query(&self) -> &ListQuery<Src::Sort> {
        &self.query
    }

    pub fn rows(&self) -> &[Src::Item] {
        &self.rows
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> TableView<'_, Src::Item> {
        if self.loading {
            TableView::Loading
        } else if self.failed && !self.loaded {
            TableView::Failed
        } else if self.rows.is_empty() {
            TableView::Empty
        } else {
            TableView::Rows {
                rows: &self.rows,
                meta: &self.meta,
            }
        }
    }

    /// Mark a request as in flight and return what to send
    pub fn begin_fetch(&mut self) -> FetchTicket<Src::Sort> {
        self.seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.seq,
            query: self.query.clone(),
        }
    }

    /// Apply a response. Returns false when a newer request superseded it.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket<Src::Sort>,
        result: ServiceResult<Paginated<Src::Item>>,
    ) -> AdminResult<bool> {
        if ticket.seq != self.seq {
            tracing::debug!(seq = ticket.seq, latest = self.seq, "dropping stale page");
            return Ok(false);
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.rows = page.data;
                self.meta = page.meta;
                self.loaded = true;
                self.failed = false;
                Ok(true)
            }
            Err(e) => {
                self.failed = true;
                let err = AdminError::from(e);
                tracing::error!(query = ?ticket.query, "failed to load table page: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Fetch the current query and apply it
    pub async fn refresh(&mut self) -> AdminResult<()> {
        let ticket = self.begin_fetch();
        let result = self.source.fetch(&ticket.query).await;
        self.finish_fetch(ticket, result).map(|_| ())
    }

    /// Apply a header/pager/search/filter event, refetching if the query changed
    pub async fn handle(&mut self, event: ListEvent<Src::Sort>) -> AdminResult<()> {
        if self.query.apply(event) {
            self.refresh().await?;
        }
        Ok(())
    }
}

impl<Src: ManagedSource + ?Sized> TableController<Src> {
    /// Open the confirmation dialog for `action` on `item`
    pub fn request(&self, item: &Src::Item, action: RowAction) -> AdminResult<PendingAction> {
        if let Err(e) = Src::guard(item, action) {
            tracing::warn!(entity = Src::ENTITY, ?action, "row action refused: {}", e);
            self.notifier.notify(Toast::warning(e.user_message()));
            return Err(e);
        }

        Ok(PendingAction::new(
            Src::id_of(item),
            action,
            Src::ENTITY,
            &Src::label_of(item),
        ))
    }

    /// Send a confirmed action, then reload the current page
    pub async fn confirm(&mut self, pending: PendingAction) -> AdminResult<()> {
        let (id, action) = (pending.id(), pending.action());

        if let Err(e) = self.source.perform(id, action).await {
            let err = AdminError::from(e);
            tracing::error!(entity = Src::ENTITY, %id, ?action, "row action failed: {}", err);
            self.notifier.notify(Toast::error(err.user_message()));
            return Err(err);
        }

        tracing::info!(entity = Src::ENTITY, %id, ?action, "row action applied");
        self.notifier
            .notify(Toast::success(action.success_message(Src::ENTITY)));
        self.refresh().await
    }

    /// Close the dialog without sending anything
    pub fn cancel(&self, pending: PendingAction) {
        tracing::debug!(entity = Src::ENTITY, id = %pending.id(), "row action cancelled");
    }
}
