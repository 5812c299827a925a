use crate::{
    errors::{Error::Other, Result},
    provider::{Provider, Tag, CHAOS_VICTIM_TAG_KEY, CHAOS_VICTIM_TAG_VALUE, NAME_TAG_KEY},
};

pub const DEFAULT_IMAGE_ID: &str = "ami-2a7d75c0";
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";
pub const DEFAULT_INSTANCES: u32 = 15;

/// Defines what to launch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Params {
    pub image_id: String,
    pub instance_type: String,
    pub count: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self::default()
    }
}

impl Params {
    pub fn default() -> Self {
        Self {
            image_id: String::from(DEFAULT_IMAGE_ID),
            instance_type: String::from(DEFAULT_INSTANCE_TYPE),
            count: DEFAULT_INSTANCES,
        }
    }
}

/// Returns the tags for the instance at "index" in the batch.
pub fn victim_tags(index: usize) -> Vec<Tag> {
    vec![
        Tag::new(NAME_TAG_KEY, format!("Test Instance {}", index)),
        Tag::new(CHAOS_VICTIM_TAG_KEY, CHAOS_VICTIM_TAG_VALUE),
    ]
}

/// Launches "count" instances and tags each one as a chaos victim.
/// Returns the instance IDs in creation order.
///
/// Instances created before a failure are neither terminated nor returned.
pub async fn provision(provider: &dyn Provider, params: &Params) -> Result<Vec<String>> {
    if params.count == 0 {
        return Err(Other {
            message: String::from("number of instances must be positive"),
            is_retryable: false,
        });
    }
    let count = i32::try_from(params.count).map_err(|_| Other {
        message: format!("number of instances {} is too large", params.count),
        is_retryable: false,
    })?;

    log::info!(
        "creating {} '{}' instance(s) with image '{}'",
        count,
        params.instance_type,
        params.image_id
    );
    let created = provider
        .create_instances(&params.image_id, &params.instance_type, count, count)
        .await?;

    let mut ids = Vec::with_capacity(created.len());
    for (index, id) in created.iter().enumerate() {
        if let Err(e) = provider
            .tag_resources(std::slice::from_ref(id), &victim_tags(index))
            .await
        {
            log::warn!(
                "tagging {} failed, leaving untracked instance(s) {:?}",
                id,
                created
            );
            return Err(e);
        }
        log::info!("[{}] created and tagged instance {}", index, id);
        ids.push(id.clone());
    }

    log::info!("created {} instance(s)", ids.len());
    Ok(ids)
}
