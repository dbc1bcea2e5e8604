use url::form_urlencoded;

const SEARCH_ENDPOINT: &str = "https://www.bing.com/search";

pub type BatchId = u64;
pub type RequestId = u64;

/// Stable per-batch identity of one query card.
///
/// Two equal strings in the same batch still get distinct ids, and ids from a
/// replaced batch never match the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId {
    pub batch: BatchId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub id: QueryId,
    pub text: String,
}

/// Where the strings of a batch came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOrigin {
    Remote,
    /// Synthesized locally because the remote source failed.
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    id: BatchId,
    items: Vec<QueryItem>,
    origin: BatchOrigin,
}

impl Batch {
    pub fn new(id: BatchId, texts: Vec<String>, origin: BatchOrigin) -> Self {
        let items = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| QueryItem {
                id: QueryId { batch: id, index },
                text,
            })
            .collect();
        Self { id, items, origin }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn items(&self) -> &[QueryItem] {
        &self.items
    }

    pub fn origin(&self) -> &BatchOrigin {
        &self.origin
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.text.as_str())
    }
}

/// Search URL opened for a query.
pub fn search_url(query: &str) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query)
        .append_pair("qs", "PN")
        .append_pair("form", "TSFLBL")
        .finish();
    format!("{SEARCH_ENDPOINT}?{params}")
}
