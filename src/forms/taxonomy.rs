//! Tag and topic forms.
//!
//! Both entities share one schema. When no slug is typed, it is derived from
//! the name before the request is built.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::{MAX_NAME_LENGTH, MAX_TAXONOMY_DESCRIPTION_LENGTH, MIN_NAME_LENGTH};
use crate::error::{AdminError, AdminResult, ServiceResult};
use crate::models::{Tag, TagId, TagPayload, Topic, TopicId, TopicPayload};
use crate::notify::{Notifier, Toast};
use crate::state::AdminState;
use crate::utils::validation::{
    sanitize_optional, sanitize_string, slugify, validate_not_blank, validate_slug,
};

/// Values of the tag and topic dialogs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxonomyFormValues {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = MAX_TAXONOMY_DESCRIPTION_LENGTH, message = "Description is too long"))]
    pub description: Option<String>,
}

impl TaxonomyFormValues {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            slug: Some(tag.slug.clone()),
            description: tag.description.clone(),
        }
    }

    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            name: topic.name.clone(),
            slug: Some(topic.slug.clone()),
            description: topic.description.clone(),
        }
    }

    /// The typed slug, or one derived from the name
    pub fn effective_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&self.name),
        }
    }

    fn validate_for_submit(&self) -> Result<(), ValidationErrors> {
        let mut values = self.clone();
        // A blank slug means "derive it", not "invalid".
        values.slug = values.slug.filter(|s| !s.trim().is_empty());

        let mut errors = values.validate().err().unwrap_or_else(ValidationErrors::new);
        if !self.name.trim().is_empty() && self.effective_slug().is_empty() {
            let mut err = ValidationError::new("underivable_slug");
            err.message = Some("Name must contain a letter or digit".into());
            errors.add("slug", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_tag_payload(&self) -> AdminResult<TagPayload> {
        self.validate_for_submit()?;
        Ok(TagPayload {
            name: sanitize_string(&self.name),
            slug: Some(self.effective_slug()),
            description: sanitize_optional(self.description.as_deref()),
        })
    }

    pub fn to_topic_payload(&self) -> AdminResult<TopicPayload> {
        self.validate_for_submit()?;
        Ok(TopicPayload {
            name: sanitize_string(&self.name),
            slug: Some(self.effective_slug()),
            description: sanitize_optional(self.description.as_deref()),
        })
    }
}

fn report<T>(
    notifier: &dyn Notifier,
    entity: &str,
    created: bool,
    result: ServiceResult<T>,
) -> AdminResult<T> {
    match result {
        Ok(value) => {
            let verb = if created { "created" } else { "updated" };
            tracing::info!("{} {}", entity, verb);
            notifier.notify(Toast::success(format!("{entity} {verb}")));
            Ok(value)
        }
        Err(e) => {
            let err = AdminError::from(e);
            tracing::error!("failed to save {}: {}", entity.to_lowercase(), err);
            notifier.notify(Toast::error(err.user_message()));
            Err(err)
        }
    }
}

fn reject(notifier: &dyn Notifier, err: AdminError) -> AdminError {
    tracing::warn!("taxonomy form rejected: {}", err);
    notifier.notify(Toast::error(err.user_message()));
    err
}

/// Create (`id == None`) or update a tag
pub async fn save_tag(
    state: &AdminState,
    id: Option<TagId>,
    values: &TaxonomyFormValues,
) -> AdminResult<Tag> {
    let notifier = state.notifier();
    let payload = values
        .to_tag_payload()
        .map_err(|e| reject(notifier.as_ref(), e))?;

    let tags = state.tags();
    let result = match id {
        None => tags.create(&payload).await,
        Some(id) => tags.update(id, &payload).await,
    };
    report(notifier.as_ref(), "Tag", id.is_none(), result)
}

/// Create (`id == None`) or update a topic
pub async fn save_topic(
    state: &AdminState,
    id: Option<TopicId>,
    values: &TaxonomyFormValues,
) -> AdminResult<Topic> {
    let notifier = state.notifier();
    let payload = values
        .to_topic_payload()
        .map_err(|e| reject(notifier.as_ref(), e))?;

    let topics = state.topics();
    let result = match id {
        None => topics.create(&payload).await,
        Some(id) => topics.update(id, &payload).await,
    };
    report(notifier.as_ref(), "Topic", id.is_none(), result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastLevel;
    use crate::services::{MockTagsService, MockTopicsService};
    use crate::test_utils::{fixtures, TestHarness};

    #[test]
    fn test_slug_is_derived_from_name() {
        let values = TaxonomyFormValues::new("Graphs");
        assert_eq!(values.to_tag_payload().unwrap().slug.as_deref(), Some("graphs"));

        let values = TaxonomyFormValues::new("Dynamic Programming");
        assert_eq!(
            values.to_topic_payload().unwrap().slug.as_deref(),
            Some("dynamic-programming")
        );
    }

    #[test]
    fn test_explicit_slug_wins_and_is_checked() {
        let mut values = TaxonomyFormValues::new("Graphs");
        values.slug = Some("graph-theory".to_string());
        assert_eq!(values.effective_slug(), "graph-theory");

        values.slug = Some("Graph Theory".to_string());
        assert!(values.to_tag_payload().is_err());

        values.slug = Some("   ".to_string());
        assert_eq!(values.to_tag_payload().unwrap().slug.as_deref(), Some("graphs"));
    }

    #[test]
    fn test_name_required() {
        let err = TaxonomyFormValues::new("  ").to_tag_payload().unwrap_err();
        assert_eq!(err.failing_fields(), vec!["name".to_string()]);

        let err = TaxonomyFormValues::new("!!!").to_tag_payload().unwrap_err();
        assert_eq!(err.failing_fields(), vec!["slug".to_string()]);
    }

    #[tokio::test]
    async fn test_create_tag_sends_derived_slug() {
        let mut tags = MockTagsService::new();
        tags.expect_create()
            .times(1)
            .withf(|p| p.name == "Graphs" && p.slug.as_deref() == Some("graphs"))
            .returning(|p| Ok(fixtures::tag(&p.name, true)));

        let harness = TestHarness::new().with_tags(tags);
        let tag = save_tag(&harness.state(), None, &TaxonomyFormValues::new("Graphs"))
            .await
            .unwrap();
        assert_eq!(tag.slug, "graphs");
        assert_eq!(harness.notifier.last().unwrap().message, "Tag created");
    }

    #[test]
    fn test_invalid_topic_never_reaches_service() {
        let mut topics = MockTopicsService::new();
        topics.expect_create().never();
        topics.expect_update().never();

        let harness = TestHarness::new().with_topics(topics);
        let result = tokio_test::block_on(save_topic(
            &harness.state(),
            None,
            &TaxonomyFormValues::default(),
        ));
        assert!(matches!(result, Err(AdminError::Validation(_))));
        assert_eq!(harness.notifier.last().unwrap().level, ToastLevel::Error);
    }
}
