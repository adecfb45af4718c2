use crate::pipeline::ReportCompiler;
use axum::http::HeaderName;
use genreport_source::FindingStore;
use std::sync::Arc;

/// Shared application state. Cloned per request; holds no mutable data.
pub struct AppState<R> {
    pub compiler: Arc<ReportCompiler<R>>,
    pub store: Arc<dyn FindingStore>,
    pub identity_header: HeaderName,
}

impl<R> AppState<R> {
    pub fn new(
        compiler: Arc<ReportCompiler<R>>,
        store: Arc<dyn FindingStore>,
        identity_header: HeaderName,
    ) -> Self {
        Self { compiler, store, identity_header }
    }
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            compiler: Arc::clone(&self.compiler),
            store: Arc::clone(&self.store),
            identity_header: self.identity_header.clone(),
        }
    }
}
