use finrates_market_data::DirectoryEntry;

/// A tracked currency.
///
/// `id` is the rate site's internal currency id. `url_id` is the id used in
/// period history URLs, which may differ from `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub id: i32,
    pub url_id: i32,
    pub code: String,
    pub name: String,
    pub country: String,
}

impl From<DirectoryEntry> for Currency {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            id: entry.id,
            url_id: entry.url_id,
            code: entry.code,
            name: entry.name,
            country: entry.country,
        }
    }
}
