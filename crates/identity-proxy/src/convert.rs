//! Mapping between the served and the stored `SyncIdentityProvider`.

use crate::model::backing::{self, LocalObjectReference, MappingMethod};
use crate::model::public;
use proxy_framework::{ConversionError, Converter};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncIdentityProviderConverter;

fn mapping_method_name(method: MappingMethod) -> &'static str {
    match method {
        MappingMethod::Claim => "claim",
        MappingMethod::Lookup => "lookup",
        MappingMethod::Add => "add",
    }
}

fn parse_mapping_method(value: &str) -> Result<MappingMethod, ConversionError> {
    match value {
        "claim" => Ok(MappingMethod::Claim),
        "lookup" => Ok(MappingMethod::Lookup),
        "add" => Ok(MappingMethod::Add),
        other => Err(ConversionError::new(
            "spec.identityProviders.mappingMethod",
            format!("unsupported mapping method {other:?}"),
        )),
    }
}

impl Converter for SyncIdentityProviderConverter {
    type Public = public::SyncIdentityProvider;
    type Backing = backing::SyncIdentityProvider;

    fn to_public(
        &self,
        stored: &backing::SyncIdentityProvider,
    ) -> Result<public::SyncIdentityProvider, ConversionError> {
        let identity_providers = stored
            .spec
            .identity_providers
            .iter()
            .map(|idp| public::IdentityProvider {
                name: idp.name.clone(),
                mapping_method: mapping_method_name(idp.mapping_method).to_string(),
                provider: idp.provider.clone(),
            })
            .collect();

        let cluster_deployments = stored
            .spec
            .cluster_deployment_refs
            .iter()
            .map(|reference| {
                if reference.name.is_empty() {
                    Err(ConversionError::new(
                        "spec.clusterDeploymentRefs",
                        "reference has an empty name",
                    ))
                } else {
                    Ok(reference.name.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(public::SyncIdentityProvider {
            metadata: stored.metadata.clone(),
            spec: public::SyncIdentityProviderSpec {
                identity_providers,
                cluster_deployments,
            },
            status: stored.status.clone(),
        })
    }

    fn to_backing(
        &self,
        served: &public::SyncIdentityProvider,
        target: &mut backing::SyncIdentityProvider,
    ) -> Result<(), ConversionError> {
        let identity_providers = served
            .spec
            .identity_providers
            .iter()
            .map(|idp| {
                Ok(backing::IdentityProvider {
                    name: idp.name.clone(),
                    mapping_method: parse_mapping_method(&idp.mapping_method)?,
                    provider: idp.provider.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConversionError>>()?;

        // Fields without a public counterpart (apply_behavior) are left as found.
        target.metadata = served.metadata.clone();
        target.spec.identity_providers = identity_providers;
        target.spec.cluster_deployment_refs = served
            .spec
            .cluster_deployments
            .iter()
            .map(|name| LocalObjectReference { name: name.clone() })
            .collect();
        target.status = served.status.clone();
        Ok(())
    }
}
