//! Two-state toggle between "Idle" (no state file) and
//! "Provisioned" (state file present).

use crate::{
    decommission::decommission,
    errors::Result,
    provider::Provider,
    provision::{provision, Params},
    state::{Batch, Store},
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    Provision,
    Decommission,
}

impl Mode {
    pub fn select(store: &Store) -> Self {
        if store.exists() {
            Mode::Decommission
        } else {
            Mode::Provision
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Mode::Provision => "provision",
            Mode::Decommission => "decommission",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Provisioned(Batch),
    Decommissioned(Batch),
}

/// Idle -> Provisioned. The state path is checked before any instance
/// is created, so a successful launch can always be recorded.
pub async fn provision_and_save(
    provider: &dyn Provider,
    store: &Store,
    params: &Params,
) -> Result<Batch> {
    store.ensure_writable()?;
    let ids = provision(provider, params).await?;
    let batch = Batch::new(ids);
    store.save(&batch)?;
    Ok(batch)
}

/// Provisioned -> Idle. Fails with "NotFound" before any provider call
/// if there is no state file.
pub async fn load_and_decommission(provider: &dyn Provider, store: &Store) -> Result<Batch> {
    let batch = store.load()?;
    decommission(provider, &batch.instance_ids).await?;
    store.delete()?;
    Ok(batch)
}

pub async fn run(provider: &dyn Provider, store: &Store, params: &Params) -> Result<Outcome> {
    let mode = Mode::select(store);
    log::info!("selected '{}' mode ({})", mode.as_str(), store.path().display());

    match mode {
        Mode::Provision => Ok(Outcome::Provisioned(
            provision_and_save(provider, store, params).await?,
        )),
        Mode::Decommission => Ok(Outcome::Decommissioned(
            load_and_decommission(provider, store).await?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::Error,
        fake::{Call, Recorder},
        provider::Tag,
        state::DEFAULT_FILE_NAME,
    };

    #[tokio::test]
    async fn test_run_toggle() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .is_test(true)
            .try_init();

        let tmp_dir = tempfile::tempdir().unwrap();
        let store = Store::new(tmp_dir.path().join(DEFAULT_FILE_NAME));
        let provider = Recorder::new();
        let expected = vec!["i-1".to_string(), "i-2".to_string(), "i-3".to_string()];

        assert_eq!(Mode::select(&store), Mode::Provision);
        let params = Params {
            count: 3,
            ..Default::default()
        };
        let outcome = run(&provider, &store, &params).await.unwrap();
        assert_eq!(outcome, Outcome::Provisioned(Batch::new(expected.clone())));
        assert_eq!(store.load().unwrap().instance_ids, expected);

        let calls = provider.calls();
        for (i, id) in expected.iter().enumerate() {
            assert_eq!(
                calls[i + 1],
                Call::Tag {
                    ids: vec![id.clone()],
                    tags: vec![
                        Tag::new("Name", format!("Test Instance {}", i)),
                        Tag::new("Chaos Victim", "true"),
                    ],
                }
            );
        }

        // second invocation ignores the count and tears the batch down
        assert_eq!(Mode::select(&store), Mode::Decommission);
        let outcome = run(&provider, &store, &Params::default()).await.unwrap();
        assert_eq!(outcome, Outcome::Decommissioned(Batch::new(expected.clone())));
        assert_eq!(provider.terminate_calls(), vec![expected]);
        assert!(!store.exists());
        assert_eq!(provider.calls().len(), 1 + 3 + 1);

        assert_eq!(Mode::select(&store), Mode::Provision);
    }

    #[tokio::test]
    async fn test_decommission_without_state() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let store = Store::new(tmp_dir.path().join(DEFAULT_FILE_NAME));
        let provider = Recorder::new();

        let ret = load_and_decommission(&provider, &store).await;
        assert!(matches!(ret, Err(Error::NotFound { .. })));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_state_path_creates_nothing() {
        let tmp_dir = tempfile::tempdir().unwrap();
        // a directory is never a state file
        let store = Store::new(tmp_dir.path());
        let provider = Recorder::new();

        assert_eq!(Mode::select(&store), Mode::Provision);
        let ret = run(&provider, &store, &Params::default()).await;
        assert!(matches!(ret, Err(Error::Other { .. })));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_provision_saves_nothing() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let store = Store::new(tmp_dir.path().join(DEFAULT_FILE_NAME));
        let provider = Recorder::failing_create_with("RequestLimitExceeded");

        let ret = run(&provider, &store, &Params::default()).await;
        assert!(matches!(ret, Err(Error::Throttling { .. })));
        assert!(!store.exists());
    }
}
