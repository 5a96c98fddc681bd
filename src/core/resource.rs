//! App Service Hybrid Connection lifecycle
//!
//! [`HybridConnectionResource`] implements the CreateOrUpdate, Read, Delete
//! and Import callbacks of the resource. Remote clients are injected, and
//! every remote call runs under an [`OperationContext`] built from the
//! configured time budgets and the process stop signal.
//!
//! Read is a two-step pipeline: the primary get populates every declared
//! field except the send key value, which is then recovered from the
//! Service Bus namespace authorization rule. A failed recovery is reported as
//! [`SendKeyLookup::Unavailable`] and never fails the read.

use crate::adapters::servicebus::NamespaceKeysClient;
use crate::adapters::web::{HybridConnection, HybridConnectionsClient};
use crate::adapters::ClientHandles;
use crate::config::{DeletePolicy, FeaturesConfig, HybridConnConfig, TimeoutsConfig};
use crate::core::context::{Operation, OperationContext, StopSignal};
use crate::domain::{
    ArmError, BindingState, HybridConnError, HybridConnectionBinding, HybridConnectionId, Result,
};
use crate::{log_operation_complete, log_operation_start};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of the send key recovery step of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendKeyLookup {
    /// The primary key was recovered into `send_key_value`
    Resolved,
    /// The key could not be recovered; `send_key_value` is unset
    Unavailable { reason: String },
}

impl SendKeyLookup {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SendKeyLookup::Resolved)
    }
}

/// Result of a successful read
#[derive(Debug, Clone)]
pub struct ResourceData {
    pub id: HybridConnectionId,
    pub state: BindingState,
    pub send_key: SendKeyLookup,
}

/// Lifecycle operations of one App Service Hybrid Connection
pub struct HybridConnectionResource {
    subscription_id: String,
    web: Arc<dyn HybridConnectionsClient>,
    namespaces: Arc<dyn NamespaceKeysClient>,
    timeouts: TimeoutsConfig,
    features: FeaturesConfig,
    stop: StopSignal,
}

impl HybridConnectionResource {
    pub fn new(
        subscription_id: impl Into<String>,
        clients: ClientHandles,
        timeouts: TimeoutsConfig,
        features: FeaturesConfig,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            web: clients.hybrid_connections,
            namespaces: clients.namespace_keys,
            timeouts,
            features,
            stop: StopSignal::never(),
        }
    }

    /// Creates the resource with the subscription, budgets and features of a configuration
    pub fn from_config(config: &HybridConnConfig, clients: ClientHandles) -> Self {
        Self::new(
            config.azure.subscription_id.clone(),
            clients,
            config.timeouts.clone(),
            config.features.clone(),
        )
    }

    /// Abandons in-flight remote calls once `stop` fires
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    fn context(&self, operation: Operation) -> OperationContext {
        OperationContext::new(
            operation,
            operation.budget(&self.timeouts),
            self.stop.clone(),
        )
    }

    /// Creates or updates the hybrid connection, then reads it back
    ///
    /// `existing_id` is the persisted identifier, `None` for a new resource.
    /// A new resource is checked for an unmanaged remote object first when
    /// `features.import_existing_check` is enabled.
    ///
    /// # Errors
    ///
    /// - [`HybridConnError::InvalidReference`] if `relay_id` does not parse
    /// - [`HybridConnError::Validation`] if any declared field is invalid
    /// - [`HybridConnError::AlreadyExists`] / [`HybridConnError::PrecheckFailed`] from the precheck
    /// - [`HybridConnError::RemoteOperationFailed`] if the upsert fails
    /// - [`HybridConnError::StoredButUnread`] if the upsert succeeded but the
    ///   concluding read, run under its own read budget, did not
    pub async fn create_or_update(
        &self,
        binding: &HybridConnectionBinding,
        existing_id: Option<&str>,
    ) -> Result<ResourceData> {
        let target = binding.target_id(&self.subscription_id)?;
        binding.validate()?;

        let operation = if existing_id.is_some() {
            Operation::Update
        } else {
            Operation::Create
        };

        let started = Instant::now();
        log_operation_start!(operation.as_str(), target);
        let ctx = self.context(operation);

        if existing_id.is_none() && self.features.import_existing_check {
            self.ensure_absent(&ctx, &target).await?;
        }

        let envelope = HybridConnection::from_binding(binding)?;
        let stored = ctx
            .run(self.web.create_or_update_hybrid_connection(
                &target.resource_group,
                &target.site_name,
                &target.namespace_name,
                &target.relay_name,
                &envelope,
            ))
            .await?
            .map_err(|e| {
                HybridConnError::RemoteOperationFailed(format!(
                    "Error creating App Service Hybrid Connection {:?} (resource group {:?}): {e}",
                    target.site_name, target.resource_group
                ))
            })?;

        let raw_id = stored.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            HybridConnError::RemoteOperationFailed(format!(
                "Error creating App Service Hybrid Connection {:?} (resource group {:?}): \
                 response did not include an ID",
                target.site_name, target.resource_group
            ))
        })?;
        let id = parse_id(&raw_id)?;
        tracing::info!(id = %id, "App Service Hybrid Connection stored");

        let read_ctx = self.context(Operation::Read);
        let data = match self.read_with(&read_ctx, &id).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                let source = HybridConnError::RemoteOperationFailed(format!(
                    "App Service Hybrid Connection {id} was not found after being stored"
                ));
                return Err(HybridConnError::StoredButUnread {
                    id,
                    source: Box::new(source),
                });
            }
            Err(source) => {
                return Err(HybridConnError::StoredButUnread {
                    id,
                    source: Box::new(source),
                })
            }
        };

        log_operation_complete!(operation.as_str(), id, started.elapsed());
        Ok(data)
    }

    /// Refreshes the observed state of the hybrid connection
    ///
    /// Returns `Ok(None)` when the remote object no longer exists, in which
    /// case the caller clears the persisted identifier.
    ///
    /// # Errors
    ///
    /// - [`HybridConnError::MalformedIdentifier`] if `id` does not parse
    /// - [`HybridConnError::RemoteOperationFailed`] if the primary get fails
    pub async fn read(&self, id: &str) -> Result<Option<ResourceData>> {
        let id = parse_id(id)?;
        let ctx = self.context(Operation::Read);
        self.read_with(&ctx, &id).await
    }

    /// Deletes the hybrid connection under the configured delete policy
    ///
    /// | outcome   | `legacy`                | `idempotent`            |
    /// |-----------|-------------------------|-------------------------|
    /// | success   | success                 | success                 |
    /// | not found | `RemoteOperationFailed` | success                 |
    /// | other     | logged, success         | `RemoteOperationFailed` |
    ///
    /// Deadline expiry and stop requests are always reported.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        let started = Instant::now();
        log_operation_start!(Operation::Delete.as_str(), id);

        let ctx = self.context(Operation::Delete);
        let outcome = ctx
            .run(self.web.delete_hybrid_connection(
                &id.resource_group,
                &id.site_name,
                &id.namespace_name,
                &id.relay_name,
            ))
            .await?;

        match (outcome, self.features.delete_policy) {
            (Ok(()), _) => {}
            (Err(e), DeletePolicy::Legacy) if e.is_not_found() => {
                return Err(delete_failed(&id, &e));
            }
            (Err(e), DeletePolicy::Legacy) => {
                tracing::warn!(
                    id = %id,
                    error = %e,
                    "Ignoring error while deleting App Service Hybrid Connection"
                );
            }
            (Err(e), DeletePolicy::Idempotent) if e.is_not_found() => {
                tracing::info!(id = %id, "App Service Hybrid Connection already absent");
            }
            (Err(e), DeletePolicy::Idempotent) => {
                return Err(delete_failed(&id, &e));
            }
        }

        log_operation_complete!(Operation::Delete.as_str(), id, started.elapsed());
        Ok(())
    }

    /// Adopts an existing remote object
    ///
    /// # Errors
    ///
    /// - [`HybridConnError::MalformedIdentifier`] if `id` is not a hybrid connection id
    /// - [`HybridConnError::ImportNotFound`] if the remote object does not exist
    pub async fn import(&self, id: &str) -> Result<ResourceData> {
        let parsed = parse_id(id)?;
        tracing::info!(id = %parsed, "Importing App Service Hybrid Connection");

        let ctx = self.context(Operation::Read);
        self.read_with(&ctx, &parsed)
            .await?
            .ok_or_else(|| HybridConnError::ImportNotFound(id.to_string()))
    }

    async fn ensure_absent(&self, ctx: &OperationContext, target: &HybridConnectionId) -> Result<()> {
        let existing = ctx
            .run(self.web.get_hybrid_connection(
                &target.resource_group,
                &target.site_name,
                &target.namespace_name,
                &target.relay_name,
            ))
            .await?;

        match existing {
            Ok(found) => match found.id.filter(|id| !id.is_empty()) {
                Some(id) => Err(HybridConnError::AlreadyExists { id }),
                None => Ok(()),
            },
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(HybridConnError::PrecheckFailed(format!(
                "{:?} (Resource Group {:?}, Namespace {:?}, Relay Name {:?}): {e}",
                target.site_name, target.resource_group, target.namespace_name, target.relay_name
            ))),
        }
    }

    async fn read_with(
        &self,
        ctx: &OperationContext,
        id: &HybridConnectionId,
    ) -> Result<Option<ResourceData>> {
        let started = Instant::now();
        log_operation_start!(Operation::Read.as_str(), id);

        let fetched = ctx
            .run(self.web.get_hybrid_connection(
                &id.resource_group,
                &id.site_name,
                &id.namespace_name,
                &id.relay_name,
            ))
            .await?;

        let resource = match fetched {
            Ok(resource) => resource,
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    id = %id,
                    "App Service Hybrid Connection no longer exists, removing from state"
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(HybridConnError::RemoteOperationFailed(format!(
                    "Error making Read request on App Service Hybrid Connection {:?} in Namespace {:?}, Resource Group {:?}: {e}",
                    id.site_name, id.namespace_name, id.resource_group
                )));
            }
        };

        let mut state = resource.to_state(id);
        let send_key = self.resolve_send_key(id, &resource, &mut state).await;

        log_operation_complete!(Operation::Read.as_str(), id, started.elapsed());
        Ok(Some(ResourceData {
            id: id.clone(),
            state,
            send_key,
        }))
    }

    /// Recovers the send key value from the namespace authorization rule
    ///
    /// Runs under a fresh read budget. Every failure becomes
    /// [`SendKeyLookup::Unavailable`].
    async fn resolve_send_key(
        &self,
        id: &HybridConnectionId,
        resource: &HybridConnection,
        state: &mut BindingState,
    ) -> SendKeyLookup {
        let props = resource.properties.as_ref();
        let namespace = props
            .and_then(|p| p.service_bus_namespace.as_deref())
            .filter(|s| !s.is_empty());
        let rule = props
            .and_then(|p| p.send_key_name.as_deref())
            .filter(|s| !s.is_empty());

        let (namespace, rule) = match (namespace, rule) {
            (Some(namespace), Some(rule)) => (namespace, rule),
            _ => {
                let reason =
                    "hybrid connection did not report a Service Bus namespace and send key name"
                        .to_string();
                tracing::warn!(id = %id, reason = %reason, "Send key value unavailable");
                return SendKeyLookup::Unavailable { reason };
            }
        };

        let ctx = self.context(Operation::Read);
        let outcome = match ctx
            .run(self.namespaces.list_keys(&id.resource_group, namespace, rule))
            .await
        {
            Ok(Ok(keys)) => keys
                .primary_key()
                .cloned()
                .ok_or_else(|| "listKeys response did not include a primary key".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(key) => {
                state.send_key_value = Some(key);
                SendKeyLookup::Resolved
            }
            Err(reason) => {
                tracing::warn!(
                    namespace = %namespace,
                    resource_group = %id.resource_group,
                    authorization_rule = %rule,
                    reason = %reason,
                    "Unable to list keys for Service Bus namespace, send_key_value left unset"
                );
                SendKeyLookup::Unavailable { reason }
            }
        }
    }
}

fn parse_id(id: &str) -> Result<HybridConnectionId> {
    HybridConnectionId::parse(id).map_err(|reason| HybridConnError::MalformedIdentifier {
        id: id.to_string(),
        reason,
    })
}

fn delete_failed(id: &HybridConnectionId, err: &ArmError) -> HybridConnError {
    HybridConnError::RemoteOperationFailed(format!(
        "Error deleting App Service Hybrid Connection {:?} (Resource Group {:?}, Relay {:?}): {err}",
        id.site_name, id.resource_group, id.relay_name
    ))
}
