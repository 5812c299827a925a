use std::fmt::Debug;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_ec2::{
    config::Region,
    error::{ProvideErrorMetadata, SdkError},
    types::{InstanceType, Tag as Ec2Tag},
    Client,
};

use crate::{
    errors::{
        Error::{self, Network, API},
        Result,
    },
    provider::{Provider, Tag},
};

/// Name under which the static credentials are reported to the SDK.
const CREDENTIALS_PROVIDER_NAME: &str = "chaos-victims";

/// Loads an AWS config with the given static credentials and region.
/// The default credential chain is never consulted.
pub async fn load_config(access_key_id: &str, secret_access_key: &str, region: &str) -> SdkConfig {
    log::info!("loading AWS configuration for region {}", region);

    let creds = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );
    aws_config::from_env()
        .region(Region::new(region.to_string()))
        .credentials_provider(creds)
        .load()
        .await
}

/// Implements AWS EC2 manager.
#[derive(Debug, Clone)]
pub struct Manager {
    pub region: String,
    pub cli: Client,
}

impl Manager {
    pub fn new(shared_config: &SdkConfig) -> Self {
        Self {
            region: shared_config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_default(),
            cli: Client::new(shared_config),
        }
    }
}

#[async_trait]
impl Provider for Manager {
    async fn create_instances(
        &self,
        image_id: &str,
        instance_type: &str,
        min_count: i32,
        max_count: i32,
    ) -> Result<Vec<String>> {
        log::info!(
            "running {}-{} '{}' instances with image '{}' in {}",
            min_count,
            max_count,
            instance_type,
            image_id,
            self.region
        );
        let resp = self
            .cli
            .run_instances()
            .image_id(image_id)
            .instance_type(InstanceType::from(instance_type))
            .min_count(min_count)
            .max_count(max_count)
            .send()
            .await
            .map_err(|e| api_error("run_instances", e))?;

        let mut ids = Vec::new();
        for instance in resp.instances().unwrap_or_default() {
            match instance.instance_id() {
                Some(id) => ids.push(id.to_string()),
                None => {
                    return Err(API {
                        message: String::from("empty instance Id from run_instances response"),
                        is_retryable: false,
                    });
                }
            }
        }
        Ok(ids)
    }

    async fn tag_resources(&self, ids: &[String], tags: &[Tag]) -> Result<()> {
        log::debug!("tagging {:?} with {:?}", ids, tags);
        let tags = tags
            .iter()
            .map(|t| Ec2Tag::builder().key(&t.key).value(&t.value).build())
            .collect::<Vec<_>>();

        self.cli
            .create_tags()
            .set_resources(Some(ids.to_vec()))
            .set_tags(Some(tags))
            .send()
            .await
            .map_err(|e| api_error("create_tags", e))?;
        Ok(())
    }

    async fn terminate_instances(&self, ids: &[String]) -> Result<()> {
        log::info!("terminating {} instance(s) in {}", ids.len(), self.region);
        self.cli
            .terminate_instances()
            .set_instance_ids(Some(ids.to_vec()))
            .send()
            .await
            .map_err(|e| api_error("terminate_instances", e))?;
        Ok(())
    }
}

/// Maps an SDK failure into the crate error, by service error code
/// or by how the request failed to dispatch.
fn api_error<E, R>(op: &str, e: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    let message = format!("failed {} {:?}", op, e);
    match &e {
        SdkError::ServiceError(ctx) => Error::classify_code(ctx.err().code(), message),
        SdkError::TimeoutError(_) => Network { message },
        SdkError::DispatchFailure(d) => {
            if d.is_timeout() || d.is_io() {
                Network { message }
            } else {
                API {
                    message,
                    is_retryable: false,
                }
            }
        }
        SdkError::ResponseError(_) => API {
            message,
            is_retryable: true,
        },
        _ => API {
            message,
            is_retryable: false,
        },
    }
}
