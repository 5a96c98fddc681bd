//! Bearer tokens for Azure Resource Manager
//!
//! [`AccessTokenSource`] hides how a token is obtained. The client secret
//! flow goes through `azure_identity`; a pre-acquired token can be supplied
//! directly for pipelines that already hold one.

use super::ArmResult;
use crate::config::{AuthType, AzureConfig, SecretString};
use crate::domain::{ArmError, HybridConnError, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Source of bearer tokens for Resource Manager requests
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a token valid for the Resource Manager scope
    async fn token(&self) -> ArmResult<String>;
}

/// Azure AD client credentials flow
pub struct ClientSecretTokenSource {
    credential: Arc<ClientSecretCredential>,
    scope: String,
}

impl ClientSecretTokenSource {
    /// Creates the credential for a service principal
    ///
    /// # Errors
    ///
    /// Returns [`HybridConnError::Authentication`] if the credential cannot be built.
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        client_secret: &SecretString,
        resource_manager_endpoint: &str,
    ) -> Result<Self> {
        let client_secret: &str = client_secret.expose_secret().as_ref();
        let secret = azure_core::credentials::Secret::new(client_secret.to_string());

        let credential = ClientSecretCredential::new(tenant_id, client_id.to_string(), secret, None)
            .map_err(|e| {
                HybridConnError::Authentication(format!(
                    "Failed to create Azure AD credential: {e}"
                ))
            })?;

        Ok(Self {
            credential,
            scope: resource_manager_scope(resource_manager_endpoint),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ClientSecretTokenSource {
    async fn token(&self) -> ArmResult<String> {
        let token = TokenCredential::get_token(&*self.credential, &[self.scope.as_str()], None)
            .await
            .map_err(|e| {
                ArmError::AuthenticationFailed(format!("Failed to acquire Azure AD token: {e}"))
            })?;

        Ok(token.token.secret().to_string())
    }
}

/// Token supplied up front
pub struct StaticTokenSource {
    token: SecretString,
}

impl StaticTokenSource {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn token(&self) -> ArmResult<String> {
        let token: &str = self.token.expose_secret().as_ref();
        if token.is_empty() {
            return Err(ArmError::AuthenticationFailed(
                "access token is empty".to_string(),
            ));
        }
        Ok(token.to_string())
    }
}

/// Builds the token source selected by `azure.auth_type`
///
/// # Errors
///
/// Returns [`HybridConnError::Configuration`] if a credential required by the
/// selected auth type is missing.
pub fn token_source_from_config(config: &AzureConfig) -> Result<Arc<dyn AccessTokenSource>> {
    match config.auth_type {
        AuthType::ClientSecret => {
            let tenant_id = config.tenant_id.as_deref().ok_or_else(|| {
                HybridConnError::Configuration(
                    "azure.tenant_id is required when auth_type is 'client_secret'".to_string(),
                )
            })?;
            let client_id = config.client_id.as_deref().ok_or_else(|| {
                HybridConnError::Configuration(
                    "azure.client_id is required when auth_type is 'client_secret'".to_string(),
                )
            })?;
            let client_secret = config.client_secret.as_ref().ok_or_else(|| {
                HybridConnError::Configuration(
                    "azure.client_secret is required when auth_type is 'client_secret'".to_string(),
                )
            })?;

            tracing::debug!(tenant_id = %tenant_id, client_id = %client_id, "Using Azure AD client secret credential");
            Ok(Arc::new(ClientSecretTokenSource::new(
                tenant_id,
                client_id,
                client_secret,
                &config.resource_manager_endpoint,
            )?))
        }
        AuthType::AccessToken => {
            let token = config.access_token.clone().ok_or_else(|| {
                HybridConnError::Configuration(
                    "azure.access_token is required when auth_type is 'access_token'".to_string(),
                )
            })?;

            tracing::debug!("Using pre-acquired access token");
            Ok(Arc::new(StaticTokenSource::new(token)))
        }
    }
}

/// OAuth scope of a Resource Manager endpoint
pub fn resource_manager_scope(endpoint: &str) -> String {
    format!("{}/.default", endpoint.trim_end_matches('/'))
}
