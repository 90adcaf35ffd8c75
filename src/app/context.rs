use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::normalizer::Normalizer;
use crate::pipeline::Pipeline;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub pipeline: Pipeline,
    pub normalizer: Normalizer,
}

impl AppContext {
    pub fn new(mut config: Config, db_path: Option<PathBuf>, workers: Option<usize>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        if let Some(workers) = workers {
            config.pipeline.workers = workers;
        }

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let pipeline = Pipeline::from_config(&config)?;
        let normalizer = Normalizer::with_utc_offset_minutes(config.harvest.utc_offset_minutes);

        Ok(Self {
            config,
            store,
            pipeline,
            normalizer,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let db_path = Config::default_database_path()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(db_path)
    }
}
