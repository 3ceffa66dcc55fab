// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Deployment names, resource group names and image references.

mod app_name;
mod image_ref;
mod resource_group_name;

pub use app_name::{AppName, AppNameError};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use resource_group_name::{ResourceGroupName, ResourceGroupNameError};
