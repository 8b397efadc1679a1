pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ListsConfig, ProviderConfig, MAX_SOURCE_ITEMS};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
