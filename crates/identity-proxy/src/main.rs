//! Walks every proxy operation against a freshly started in-memory store.
//!
//! Set `IDENTITY_PROXY_CONFIG` to a TOML file to override [`SystemConfig`] defaults.

use identity_proxy::lifecycle::{setup_tracing, ProxySystem, SystemConfig};
use identity_proxy::model::backing::ApplyBehavior;
use identity_proxy::model::public::{IdentityProvider, SyncIdentityProvider};
use identity_proxy::model::{
    Condition, ConditionStatus, IdentityProviderConfig, SecretNameReference,
};
use proxy_framework::{
    ApiError, BackingClient, CreateOptions, DeleteOptions, GetOptions, ListOptions,
    NamespacedClient, ReplaceObject, RequestContext, Requirement, Selector, UpdateOptions,
};
use std::error::Error;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::var("IDENTITY_PROXY_CONFIG") {
        Ok(path) => SystemConfig::load(path)?,
        Err(_) => SystemConfig::default(),
    };
    setup_tracing(&config.log_filter);

    info!(namespace = %config.namespace, "Starting identity proxy demo");
    let system = ProxySystem::new(&config);
    let ctx = RequestContext::with_namespace(config.namespace.clone());

    let mut idp = SyncIdentityProvider::new(config.namespace.clone(), "corp-sso");
    idp.metadata = idp.metadata.with_label("team", "platform");
    idp.spec.identity_providers = vec![IdentityProvider::new(
        "htpasswd",
        IdentityProviderConfig::HtPasswd {
            file_data: SecretNameReference::new("htpass-secret"),
        },
    )];
    idp.spec.cluster_deployments = vec!["cluster-1".to_string()];

    let created = async {
        info!("Creating identity provider");
        system.proxy.create(&ctx, &idp, &CreateOptions::default()).await
    }
    .instrument(tracing::info_span!("create"))
    .await?;
    info!(
        name = %created.metadata.name,
        resource_version = %created.metadata.resource_version,
        "Created"
    );

    // The syncing controller owns stored-only fields and status.
    let stored = system.store.namespaced(&config.namespace);
    let mut live = stored.get("corp-sso", &GetOptions::default()).await?;
    live.spec.apply_behavior = ApplyBehavior::CreateOrUpdate;
    stored.update(live).await?;

    let span = tracing::info_span!("update");
    let (updated, _) = async {
        info!("Adding a cluster and reporting status in one update");
        system
            .proxy
            .update(
                &ctx,
                "corp-sso",
                &|old: &SyncIdentityProvider| {
                    let mut new = old.clone();
                    new.spec.cluster_deployments.push("cluster-2".to_string());
                    new.status.conditions =
                        vec![Condition::new("Applied", ConditionStatus::True)];
                    new.status.observed_generation = old.metadata.generation + 1;
                    Ok::<_, ApiError>(new)
                },
                false,
                &UpdateOptions::default(),
            )
            .await
    }
    .instrument(span)
    .await?;
    info!(
        clusters = ?updated.spec.cluster_deployments,
        generation = updated.metadata.generation,
        "Updated"
    );

    let after = stored.get("corp-sso", &GetOptions::default()).await?;
    info!(apply_behavior = ?after.spec.apply_behavior, "Stored-only field preserved");

    // A replacement built from a stale read is rejected.
    let stale = ReplaceObject::new(created.clone());
    match system
        .proxy
        .update(&ctx, "corp-sso", &stale, false, &UpdateOptions::default())
        .await
    {
        Err(e) if e.is_conflict() => info!(error = %e, "Stale replacement rejected"),
        Err(e) => error!(error = %e, "Unexpected update failure"),
        Ok(_) => error!("Stale replacement was accepted"),
    }

    let options = ListOptions {
        label_selector: Some(Selector::everything().and(Requirement::equals("team", "platform"))),
        ..Default::default()
    };
    let list = system.proxy.list(&ctx, &options).await?;
    info!(items = list.len(), resource_version = %list.metadata.resource_version, "Listed");

    let fetched = system.proxy.get(&ctx, "corp-sso", &GetOptions::default()).await?;
    info!(status = ?fetched.status, "Fetched");

    let (status, immediate) = system
        .proxy
        .delete(&ctx, "corp-sso", &DeleteOptions::default())
        .await?;
    info!(code = status.code, immediate, "Deleted");

    system.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
