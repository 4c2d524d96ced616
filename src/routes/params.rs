use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub q: Option<String>,
}

impl ProductQuery {
    /// The search text, or `None` when the listing should include everything.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }
}
