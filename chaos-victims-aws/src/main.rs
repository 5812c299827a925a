mod command;
mod flags;

use std::io;

use chaos_victims::provision;
use clap::{crate_version, value_parser, Arg, ArgMatches, Command};

pub const APP_NAME: &str = "chaos-victims-aws";

pub const DEFAULT_REGION: &str = "eu-west-1";

fn app() -> Command {
    Command::new(APP_NAME)
        .version(crate_version!())
        .about("Provisions or tears down a batch of EC2 chaos victims")
        .long_about(
            "

Creates a batch of EC2 instances tagged 'Chaos Victim=true' and records
their IDs in a state file next to the executable. Running the same command
again terminates the recorded instances and removes the state file.

chaos-victims-aws \
[ACCESS_KEY_ID] [SECRET_ACCESS_KEY] \
--region=eu-west-1 \
--number_of_instances=15

",
        )
        .arg(
            Arg::new("ACCESS_KEY_ID")
                .help("Sets the AWS access key Id")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("SECRET_ACCESS_KEY")
                .help("Sets the AWS secret access key")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("LOG_LEVEL")
                .long("log-level")
                .short('l')
                .help("Sets the log level")
                .required(false)
                .num_args(1)
                .value_parser(["debug", "info"])
                .default_value("info"),
        )
        .arg(
            Arg::new("REGION")
                .long("region")
                .short('r')
                .help("Sets the AWS region for API calls/endpoints")
                .required(false)
                .num_args(1)
                .default_value(DEFAULT_REGION),
        )
        .arg(
            Arg::new("NUMBER_OF_INSTANCES")
                .long("number_of_instances")
                .visible_alias("number-of-instances")
                .short('n')
                .help("Sets the number of instances to create (ignored on tear-down)")
                .required(false)
                .num_args(1)
                .value_parser(value_parser!(u32).range(1..))
                .default_value("15"),
        )
        .arg(
            Arg::new("IMAGE_ID")
                .long("image-id")
                .help("Sets the AMI to launch")
                .required(false)
                .num_args(1)
                .default_value(provision::DEFAULT_IMAGE_ID),
        )
        .arg(
            Arg::new("INSTANCE_TYPE")
                .long("instance-type")
                .help("Sets the EC2 instance type to launch")
                .required(false)
                .num_args(1)
                .default_value(provision::DEFAULT_INSTANCE_TYPE),
        )
        .arg(
            Arg::new("STATE_FILE")
                .long("state-file")
                .help("Sets the state file path (if empty, uses '.instances' next to the executable)")
                .required(false)
                .num_args(1),
        )
}

fn options(matches: &ArgMatches) -> flags::Options {
    flags::Options {
        log_level: matches
            .get_one::<String>("LOG_LEVEL")
            .unwrap_or(&String::from("info"))
            .clone(),
        access_key_id: matches
            .get_one::<String>("ACCESS_KEY_ID")
            .cloned()
            .unwrap_or_default(),
        secret_access_key: matches
            .get_one::<String>("SECRET_ACCESS_KEY")
            .cloned()
            .unwrap_or_default(),
        region: matches
            .get_one::<String>("REGION")
            .unwrap_or(&String::from(DEFAULT_REGION))
            .clone(),
        number_of_instances: *matches
            .get_one::<u32>("NUMBER_OF_INSTANCES")
            .unwrap_or(&provision::DEFAULT_INSTANCES),
        image_id: matches
            .get_one::<String>("IMAGE_ID")
            .unwrap_or(&String::from(provision::DEFAULT_IMAGE_ID))
            .clone(),
        instance_type: matches
            .get_one::<String>("INSTANCE_TYPE")
            .unwrap_or(&String::from(provision::DEFAULT_INSTANCE_TYPE))
            .clone(),
        state_file: matches.get_one::<String>("STATE_FILE").cloned(),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let matches = app().get_matches();
    command::execute(options(&matches)).await
}
