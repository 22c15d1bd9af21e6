//! Notification template catalogue with CRUD operations

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::channel::Channel;
use super::types::{
    CreateTemplateRequest, NotificationTemplate, TemplateError, TemplateFilter, TemplateResult,
    UpdateTemplateRequest, ValidationOptions,
};
use super::validator::validate;
use crate::metrics::TemplateMetrics;

const MAX_NAME_LENGTH: usize = 256;
const COPY_SUFFIX: &str = "_copy";

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, NotificationTemplate>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Create a new template
    pub fn create(&self, request: CreateTemplateRequest) -> TemplateResult<NotificationTemplate> {
        let now = Utc::now();
        let template = NotificationTemplate {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            title: request.title,
            variables: Vec::new(),
            content: request.content,
            channel: request.channel,
            language: request.language,
            is_active: request.is_active,
            created_at: now,
            updated_at: now,
        };

        let template = check_template(template)?;
        self.templates.insert(template.id.clone(), template.clone());
        self.publish_count();

        tracing::info!(
            template_id = %template.id,
            channel = %template.channel,
            "Notification template created"
        );
        Ok(template)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<NotificationTemplate> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List templates matching `filter`, oldest first
    pub fn list(&self, filter: &TemplateFilter) -> Vec<NotificationTemplate> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut templates: Vec<NotificationTemplate> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|t| filter.channel.map_or(true, |c| t.channel == c))
            .filter(|t| filter.active.map_or(true, |a| t.is_active == a))
            .filter(|t| search.as_deref().map_or(true, |s| matches_search(t, s)))
            .collect();

        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        templates
    }

    /// Update an existing template.
    ///
    /// The entry stays locked from read to write-back, so a concurrent
    /// delete or toggle is never undone by a stale copy.
    pub fn update(
        &self,
        id: &str,
        updates: UpdateTemplateRequest,
    ) -> TemplateResult<NotificationTemplate> {
        let mut entry = self
            .templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        let mut template = entry.clone();

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(title) = updates.title {
            template.title = title;
        }

        if let Some(content) = updates.content {
            template.content = content;
        }

        if let Some(channel) = updates.channel {
            template.channel = channel;
        }

        if let Some(language) = updates.language {
            template.language = language;
        }

        if let Some(is_active) = updates.is_active {
            template.is_active = is_active;
        }

        template.updated_at = Utc::now();
        let template = check_template(template)?;
        *entry = template.clone();

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| self.publish_count())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Copy a template under `"{name}_copy"`. The copy starts inactive.
    ///
    /// Long names are cut so the suffixed name still fits the name limit.
    pub fn duplicate(&self, id: &str) -> TemplateResult<NotificationTemplate> {
        let original = self.get(id)?;
        let base: String = original
            .name
            .chars()
            .take(MAX_NAME_LENGTH - COPY_SUFFIX.len())
            .collect();

        self.create(CreateTemplateRequest {
            name: format!("{}{}", base, COPY_SUFFIX),
            title: original.title,
            content: original.content,
            channel: original.channel,
            language: original.language,
            is_active: false,
        })
    }

    /// Flip the active flag of a template
    pub fn toggle_active(&self, id: &str) -> TemplateResult<NotificationTemplate> {
        let mut entry = self
            .templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        entry.is_active = !entry.is_active;
        entry.updated_at = Utc::now();

        Ok(entry.clone())
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Number of templates per channel, including empty channels
    pub fn count_by_channel(&self) -> HashMap<Channel, usize> {
        let mut counts: HashMap<Channel, usize> = Channel::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in self.templates.iter() {
            *counts.entry(entry.channel).or_default() += 1;
        }
        counts
    }

    fn publish_count(&self) {
        TemplateMetrics::set_stored(self.count());
    }
}

/// Validate name and content, then derive the variable list
fn check_template(mut template: NotificationTemplate) -> TemplateResult<NotificationTemplate> {
    let name_length = template.name.trim().chars().count();
    if name_length == 0 || name_length > MAX_NAME_LENGTH {
        return Err(TemplateError::InvalidTemplate(format!(
            "Name must be 1-{} characters",
            MAX_NAME_LENGTH
        )));
    }

    let result = validate(&template.content, template.channel, &ValidationOptions::default());
    if !result.is_valid {
        return Err(TemplateError::InvalidTemplate(result.errors.join("; ")));
    }

    template.variables = result.variables;
    Ok(template)
}

fn matches_search(template: &NotificationTemplate, needle: &str) -> bool {
    template.name.to_lowercase().contains(needle)
        || template.content.to_lowercase().contains(needle)
        || template
            .title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(needle))
}

/// Create an Arc-wrapped template store
pub fn create_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new())
}
