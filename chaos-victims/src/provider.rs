use async_trait::async_trait;

use crate::errors::Result;

/// Tag key for the human-readable instance name.
pub const NAME_TAG_KEY: &str = "Name";
/// Tag marking an instance as an expendable chaos-testing target.
pub const CHAOS_VICTIM_TAG_KEY: &str = "Chaos Victim";
pub const CHAOS_VICTIM_TAG_VALUE: &str = "true";

/// Key-value label attached to a cloud resource.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Instance-management operations required from a cloud provider.
/// Every call either fully succeeds or returns the provider error as is.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Launches between "min_count" and "max_count" instances
    /// and returns their IDs in the order the provider reports them.
    async fn create_instances(
        &self,
        image_id: &str,
        instance_type: &str,
        min_count: i32,
        max_count: i32,
    ) -> Result<Vec<String>>;

    async fn tag_resources(&self, ids: &[String], tags: &[Tag]) -> Result<()>;

    async fn terminate_instances(&self, ids: &[String]) -> Result<()>;
}
