//! Console state management
//!
//! This module contains the shared state handed to every controller: the REST
//! collaborators, the draft store, the toast sink and the configuration.

use std::sync::Arc;

use crate::config::{AdminConfig, CONFIG};
use crate::drafts::{DraftRepository, DraftStore};
use crate::notify::{Notifier, TracingNotifier};
use crate::services::{
    ContestsService, ProblemsService, RolesService, SubmissionsService, TagsService,
    TopicsService,
};

/// REST collaborators supplied by the host
#[derive(Clone)]
pub struct Services {
    pub tags: Arc<dyn TagsService>,
    pub topics: Arc<dyn TopicsService>,
    pub roles: Arc<dyn RolesService>,
    pub problems: Arc<dyn ProblemsService>,
    pub contests: Arc<dyn ContestsService>,
    pub submissions: Arc<dyn SubmissionsService>,
}

/// Shared console state
#[derive(Clone)]
pub struct AdminState {
    inner: Arc<AdminStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AdminStateInner {
    services: Services,

    /// Single-slot drafts for create flows
    drafts: Arc<dyn DraftRepository>,

    /// Toast sink
    notifier: Arc<dyn Notifier>,

    /// Console configuration
    config: AdminConfig,
}

impl AdminState {
    /// Create a new console state
    pub fn new(
        services: Services,
        drafts: Arc<dyn DraftRepository>,
        notifier: Arc<dyn Notifier>,
        config: AdminConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AdminStateInner {
                services,
                drafts,
                notifier,
                config,
            }),
        }
    }

    /// State with the global configuration, an in-memory draft store and a
    /// notifier that only logs
    pub fn from_env(services: Services) -> Self {
        Self::new(
            services,
            Arc::new(DraftStore::new()),
            Arc::new(TracingNotifier),
            CONFIG.clone(),
        )
    }

    pub fn tags(&self) -> Arc<dyn TagsService> {
        self.inner.services.tags.clone()
    }

    pub fn topics(&self) -> Arc<dyn TopicsService> {
        self.inner.services.topics.clone()
    }

    pub fn roles(&self) -> Arc<dyn RolesService> {
        self.inner.services.roles.clone()
    }

    pub fn problems(&self) -> Arc<dyn ProblemsService> {
        self.inner.services.problems.clone()
    }

    pub fn contests(&self) -> Arc<dyn ContestsService> {
        self.inner.services.contests.clone()
    }

    pub fn submissions(&self) -> Arc<dyn SubmissionsService> {
        self.inner.services.submissions.clone()
    }

    /// Get a clone of the draft repository
    pub fn drafts(&self) -> Arc<dyn DraftRepository> {
        self.inner.drafts.clone()
    }

    /// Get a clone of the toast sink
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.inner.notifier.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }
}
