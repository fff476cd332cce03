//! Services - catalog coordination, asset storage and provisioning

pub mod asset_store;
pub mod catalog;
pub mod provisioning;

pub use asset_store::{AssetError, AssetStore};
pub use catalog::{AssetReport, CatalogService, ImageUpload, MissingAsset};
pub use provisioning::provision_default_maps;
