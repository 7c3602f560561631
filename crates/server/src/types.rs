use serde::Deserialize;

/// Query parameters for the history listing.
#[derive(Debug, Deserialize, Default)]
pub struct SortParams {
    /// "asc" or "desc" (default).
    pub sort: Option<String>,
}

impl SortParams {
    pub fn ascending(&self) -> bool {
        matches!(self.sort.as_deref(), Some(s) if s.eq_ignore_ascii_case("asc"))
    }
}
