use super::Db;
use crate::{
    cache::IdentityCache,
    registry::{NavigationConvention, Registration, Registry},
    Model, Result,
};

use rowmap_core::driver::Executor;

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Record types, in registration order
    models: Vec<Registration>,

    convention: NavigationConvention,

    /// Cache shared with other handles, if any
    cache: Option<Arc<IdentityCache>>,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.push(Registration::of::<M>());
        self
    }

    /// Sets the suffix stripped from foreign-key field names to name their
    /// navigations. Defaults to `_id`.
    pub fn foreign_key_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.convention = NavigationConvention::new(suffix);
        self
    }

    /// Shares an identity cache with other handles.
    pub fn cache(&mut self, cache: Arc<IdentityCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    pub fn build_registry(&self) -> Result<Registry> {
        Registry::build(&self.models, self.convention.clone())
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(super::connect(url)?).await
    }

    /// Builds the registry and opens `executor`.
    pub async fn build(&mut self, executor: impl Executor) -> Result<Db> {
        let registry = Arc::new(self.build_registry()?);
        let cache = self.cache.clone().unwrap_or_default();
        Db::open(Box::new(executor), registry, cache).await
    }
}
