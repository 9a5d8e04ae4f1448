use async_trait::async_trait;
use nw_core::{ArticleStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized + 'static {
    fn get_error_message() -> &'static str;

    /// Opens the backend. `location` is backend specific (a file path for sqlite).
    async fn open(location: Option<&str>) -> Result<Self>;
}

async fn open_backend<T: StorageBackend>(location: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    let storage = T::open(location)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", T::get_error_message(), e)))?;
    info!("💾 Storage backend ready: {}", storage.name());
    Ok(Arc::new(storage))
}

/// Builds the storage backend named on the command line.
pub async fn create_storage(kind: &str, location: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind.to_ascii_lowercase().as_str() {
        "memory" => open_backend::<InMemoryStorage>(location).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => open_backend::<SQLiteStorage>(location).await,
        other => Err(Error::Config(format!(
            "Unknown storage backend '{}'. Available: {}",
            other,
            available_backends().join(", ")
        ))),
    }
}

pub fn available_backends() -> Vec<&'static str> {
    let mut backends = vec!["memory"];
    if cfg!(feature = "sqlite") {
        backends.push("sqlite");
    }
    backends
}
