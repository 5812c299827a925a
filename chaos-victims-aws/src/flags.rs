use std::fmt;

/// Defines flag options.
#[derive(Clone)]
pub struct Options {
    pub log_level: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub number_of_instances: u32,
    pub image_id: String,
    pub instance_type: String,
    /// Overrides the state file next to the executable.
    pub state_file: Option<String>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("log_level", &self.log_level)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("number_of_instances", &self.number_of_instances)
            .field("image_id", &self.image_id)
            .field("instance_type", &self.instance_type)
            .field("state_file", &self.state_file)
            .finish()
    }
}
