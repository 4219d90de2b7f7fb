pub mod provisioning;

pub use provisioning::{AccountProvisioner, ProvisionRequest, ProvisioningClient};
