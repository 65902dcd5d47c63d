use std::sync::Arc;

use idx_common::broker::BrokerClient;
use idx_common::Language;

use crate::config::Config;
use crate::index::InvertedIndex;
use crate::pending::PendingSet;

#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn BrokerClient>,
    pub index: Arc<InvertedIndex>,
    pub pending: Arc<PendingSet>,
    pub language: Language,
    pub config: Arc<Config>,
}
