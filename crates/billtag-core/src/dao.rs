//! Tag definition DAO.
//!
//! Overlays the built-in [`ControlTagType`] enumeration on a persistent store
//! of user-defined definitions. Names are unique across both sets, and a
//! user-defined definition cannot be removed while tagged entities still
//! reference it. Mutations run inside a single store transaction so the
//! existence check and the write cannot interleave with a concurrent caller.
//!
//! Log levels: INFO for completed mutations, WARN for requests rejected by a
//! domain rule, ERROR for store failures, DEBUG for decision points. Events
//! carry `subsystem`, `component`, `op`, `tag_definition` and `user_token`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::call_context::CallContext;
use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::tags::{validate_tag_definition, ControlTagType, TagDefinition};
use crate::traits::{TagDefinitionSqlStore, TagDefinitionTransaction};

pub struct TagDefinitionDao<S> {
    store: S,
    event_bus: Arc<EventBus>,
}

impl<S: TagDefinitionSqlStore> TagDefinitionDao<S> {
    pub fn new(store: S, event_bus: Arc<EventBus>) -> Self {
        Self { store, event_bus }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Notification integration point for tag definition life-cycle events.
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// All user-defined definitions in store order, followed by every
    /// control tag in declaration order.
    pub async fn get_tag_definitions(&self) -> Result<Vec<TagDefinition>> {
        let mut definitions = self.store.get().await?;
        let user_defined = definitions.len();
        definitions.extend(ControlTagType::ALL.into_iter().map(TagDefinition::Control));

        debug!(
            subsystem = "dao",
            component = "tag_definitions",
            op = "get_tag_definitions",
            user_defined,
            result_count = definitions.len(),
            "Listed tag definitions"
        );
        Ok(definitions)
    }

    /// Resolve `name` to a definition.
    ///
    /// Control tags are matched first and never reach the store, so they
    /// shadow any stored row with the same name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<TagDefinition>> {
        if let Some(tag) = ControlTagType::from_name(name) {
            return Ok(Some(tag.to_definition()));
        }
        self.store.get_by_name(name).await
    }

    /// Create a user-defined tag definition.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        context: &CallContext,
    ) -> Result<TagDefinition> {
        if ControlTagType::is_control_tag_name(name) {
            let err = Error::TagDefinitionConflictsWithControlTag(name.to_string());
            log_failure("create", name, context, &err);
            return Err(err);
        }
        validate_tag_definition(name, description).map_err(Error::InvalidInput)?;

        let start = Instant::now();
        let definition = TagDefinition::user_defined(name, description);

        let record = definition.clone();
        let name_owned = name.to_string();
        let ctx = context.clone();
        let result: Result<()> = self
            .store
            .in_transaction(move |tx| {
                Box::pin(async move {
                    // Re-check under the transaction; a concurrent create may have won.
                    if tx.get_by_name(&name_owned).await?.is_some() {
                        return Err(Error::TagDefinitionAlreadyExists(name_owned));
                    }
                    tx.create(&record, &ctx).await
                })
            })
            .await;

        if let Err(err) = result {
            log_failure("create", name, context, &err);
            return Err(err);
        }

        info!(
            subsystem = "dao",
            component = "tag_definitions",
            op = "create",
            tag_definition = name,
            user_token = %context.user_token,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag definition created"
        );
        Ok(definition)
    }

    /// Delete a user-defined tag definition that no tagged entity references.
    pub async fn delete_tag_definition(&self, name: &str, context: &CallContext) -> Result<()> {
        let start = Instant::now();

        let name_owned = name.to_string();
        let ctx = context.clone();
        let result: Result<()> = self
            .store
            .in_transaction(move |tx| {
                Box::pin(async move {
                    if tx.get_by_name(&name_owned).await?.is_none() {
                        return Err(Error::TagDefinitionDoesNotExist(name_owned));
                    }

                    let usage_count = tx.tag_definition_usage_count(&name_owned).await?;
                    if usage_count > 0 {
                        debug!(
                            subsystem = "dao",
                            component = "tag_definitions",
                            op = "delete",
                            tag_definition = %name_owned,
                            usage_count,
                            "Tag definition still referenced"
                        );
                        return Err(Error::TagDefinitionInUse(name_owned));
                    }

                    tx.delete_tag_definition(&name_owned, &ctx).await
                })
            })
            .await;

        if let Err(err) = result {
            log_failure("delete", name, context, &err);
            return Err(err);
        }

        info!(
            subsystem = "dao",
            component = "tag_definitions",
            op = "delete",
            tag_definition = name,
            user_token = %context.user_token,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag definition deleted"
        );
        Ok(())
    }
}

fn log_failure(op: &str, name: &str, context: &CallContext, err: &Error) {
    match err.code() {
        Some(code) => warn!(
            subsystem = "dao",
            component = "tag_definitions",
            op,
            tag_definition = name,
            user_token = %context.user_token,
            error_code = code.as_str(),
            "Tag definition request rejected"
        ),
        None => error!(
            subsystem = "dao",
            component = "tag_definitions",
            op,
            tag_definition = name,
            user_token = %context.user_token,
            error = %err,
            "Tag definition request failed"
        ),
    }
}
