use crate::{classifier::Classifier, events::EventRepository, extractor::ContentExtractor};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub extractor: Arc<ContentExtractor>,
    pub events: Arc<dyn EventRepository>,
}

impl AppState {
    pub fn new(
        classifier: Classifier,
        extractor: ContentExtractor,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            extractor: Arc::new(extractor),
            events,
        }
    }
}
