use std::{
    env,
    io::{self, stdout},
    path::PathBuf,
};

use chaos_victims::{
    ec2,
    mode::{self, Outcome},
    provider::Provider,
    provision::Params,
    state::{self, Store},
};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::flags;

pub async fn execute(opts: flags::Options) -> io::Result<()> {
    println!("starting {} with {:?}", crate::APP_NAME, opts);

    // ref. <https://github.com/env-logger-rs/env_logger/issues/47>
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, &opts.log_level),
    );

    let store = Store::new(state_file_path(&opts)?);

    let shared_config =
        ec2::load_config(&opts.access_key_id, &opts.secret_access_key, &opts.region).await;
    let ec2_manager = ec2::Manager::new(&shared_config);

    run(&ec2_manager, &store, &opts).await
}

async fn run(provider: &dyn Provider, store: &Store, opts: &flags::Options) -> io::Result<()> {
    let params = Params {
        image_id: opts.image_id.clone(),
        instance_type: opts.instance_type.clone(),
        count: opts.number_of_instances,
    };
    log::info!("running with {:?}", params);
    execute!(
        stdout(),
        SetForegroundColor(Color::Green),
        Print(format!(
            "\nUsing state file {} in region {}\n",
            store.path().display(),
            opts.region
        )),
        ResetColor
    )?;

    match mode::run(provider, store, &params).await? {
        Outcome::Provisioned(batch) => {
            for id in batch.instance_ids.iter() {
                println!("{}", id);
            }
            execute!(
                stdout(),
                SetForegroundColor(Color::Green),
                Print(format!(
                    "\nCreated {} chaos victim(s), wrote their Ids to {}\n",
                    batch.instance_ids.len(),
                    store.path().display()
                )),
                ResetColor
            )?;

            println!("\n# [UNSAFE] terminate the chaos victims");
            println!("{}", teardown_command(opts));
        }
        Outcome::Decommissioned(batch) => {
            execute!(
                stdout(),
                SetForegroundColor(Color::Red),
                Print(format!(
                    "\nRequested termination of {} chaos victim(s), removed {}\n",
                    batch.instance_ids.len(),
                    store.path().display()
                )),
                ResetColor
            )?;
        }
    }

    Ok(())
}

/// Uses the "--state-file" flag if given, otherwise the file next to the executable.
fn state_file_path(opts: &flags::Options) -> io::Result<PathBuf> {
    match &opts.state_file {
        Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => Ok(state::default_file_path()?),
    }
}

/// Same invocation that triggers the tear-down, without the secret.
fn teardown_command(opts: &flags::Options) -> String {
    let exec_path = env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| String::from(crate::APP_NAME));
    let mut cmd = format!(
        "{} {} [SECRET_ACCESS_KEY] --region={}",
        exec_path, opts.access_key_id, opts.region
    );
    if let Some(p) = opts.state_file.as_ref().filter(|p| !p.is_empty()) {
        cmd.push_str(&format!(" --state-file={}", p));
    }
    cmd
}
