/// A currency listed on the directory (banknotes) page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Numeric currency id (ISO 4217 number)
    pub id: i32,
    /// Site-specific id taken from the row link, used to build period URLs
    pub url_id: i32,
    pub code: String,
    /// Name with embedded newlines removed and whitespace trimmed
    pub name: String,
    pub country: String,
}
