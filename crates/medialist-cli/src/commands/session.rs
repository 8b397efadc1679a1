use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use medialist_config::{Config, CredentialStore, PathManager};
use medialist_core::{
    ActorDirectory, InMemoryStore, MedialistError, ReconcileContext, StoreSnapshot,
};
use medialist_models::{Actor, ActorId, Permission};
use medialist_sources::create_provider;
use std::sync::Arc;
use tracing::{debug, info};

/// Config, credentials and store for one CLI invocation
pub struct Session {
    pub paths: PathManager,
    pub config: Config,
    pub store: Arc<InMemoryStore>,
    snapshot: StoreSnapshot,
}

impl Session {
    pub async fn open() -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| {
                eyre!(
                    "Failed to create directories under {}: {}",
                    paths.config_dir().display(),
                    e
                )
            })?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let snapshot = StoreSnapshot::new(&paths.store_file());
        let store = Arc::new(snapshot.load()?);

        let session = Self {
            paths,
            config,
            store,
            snapshot,
        };
        session.seed_owner().await?;
        Ok(session)
    }

    /// First run gets an admin "owner" so there is someone to act as
    async fn seed_owner(&self) -> Result<()> {
        if !self.store.list_actors().await?.is_empty() {
            return Ok(());
        }
        let owner = self.store.insert_actor("owner", &[Permission::Admin]).await?;
        info!("Seeded actor {} '{}' with admin rights", owner.id, owner.display_name);
        self.save().await
    }

    pub async fn actor(&self, id: ActorId) -> Result<Actor> {
        self.store
            .find_actor(id)
            .await?
            .ok_or_else(|| report(MedialistError::NotFound(format!("Actor {}", id))))
    }

    /// Collaborators for add-item, with the provider built from config
    pub fn reconcile_context(&self) -> Result<ReconcileContext> {
        let mut credentials = CredentialStore::new(self.paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
        let provider = create_provider(&self.config, &credentials).map_err(|e| eyre!("{}", e))?;
        debug!("Metadata provider enabled: {}", provider.is_some());

        Ok(ReconcileContext {
            media: self.store.clone(),
            lists: self.store.clone(),
            actors: self.store.clone(),
            provider,
            provider_timeout: self.config.provider.timeout(),
        })
    }

    pub async fn save(&self) -> Result<()> {
        self.snapshot.save(&self.store).await?;
        Ok(())
    }
}

/// Error report carrying the HTTP status a server would answer with
pub fn report(err: MedialistError) -> Report {
    eyre!("{} (status {})", err, err.status_code())
}
