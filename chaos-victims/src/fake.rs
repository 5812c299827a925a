use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    errors::{Error, Result},
    provider::{Provider, Tag},
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
    Create {
        image_id: String,
        instance_type: String,
        min_count: i32,
        max_count: i32,
    },
    Tag {
        ids: Vec<String>,
        tags: Vec<Tag>,
    },
    Terminate {
        ids: Vec<String>,
    },
}

/// In-memory provider that hands out "i-1", "i-2", ... and records every call.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<usize>,
    /// Fails the n-th tag call (0-based) with a throttling error.
    fail_tag_at: Option<usize>,
    fail_create_with: Option<&'static str>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_tag_at(n: usize) -> Self {
        Self {
            fail_tag_at: Some(n),
            ..Default::default()
        }
    }

    /// Fails create calls with the given provider error code.
    pub fn failing_create_with(code: &'static str) -> Self {
        Self {
            fail_create_with: Some(code),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn terminate_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Terminate { ids } => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Provider for Recorder {
    async fn create_instances(
        &self,
        image_id: &str,
        instance_type: &str,
        min_count: i32,
        max_count: i32,
    ) -> Result<Vec<String>> {
        self.record(Call::Create {
            image_id: image_id.to_string(),
            instance_type: instance_type.to_string(),
            min_count,
            max_count,
        });
        if let Some(code) = self.fail_create_with {
            return Err(Error::classify_code(Some(code), format!("fake {}", code)));
        }

        let mut next_id = self.next_id.lock().unwrap();
        let mut ids = Vec::new();
        for _ in 0..max_count {
            *next_id += 1;
            ids.push(format!("i-{}", *next_id));
        }
        Ok(ids)
    }

    async fn tag_resources(&self, ids: &[String], tags: &[Tag]) -> Result<()> {
        let tagged_so_far = self
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Tag { .. }))
            .count();
        self.record(Call::Tag {
            ids: ids.to_vec(),
            tags: tags.to_vec(),
        });
        if self.fail_tag_at == Some(tagged_so_far) {
            return Err(Error::Throttling {
                message: "fake RequestLimitExceeded".to_string(),
            });
        }
        Ok(())
    }

    async fn terminate_instances(&self, ids: &[String]) -> Result<()> {
        self.record(Call::Terminate { ids: ids.to_vec() });
        Ok(())
    }
}
