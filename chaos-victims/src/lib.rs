pub mod decommission;
pub mod ec2;
pub mod errors;
pub mod mode;
pub mod provider;
pub mod provision;
pub mod state;

#[cfg(test)]
pub(crate) mod fake;
