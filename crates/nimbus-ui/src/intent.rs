/// Everything the user can ask the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Look up a city by name (typed text, trimmed before use)
    Search(String),
    /// Weather for the user's own position
    UseLocation,
    /// Dictate a city name, then search for it
    VoiceSearch,
    /// Add or remove the displayed city from favorites
    ToggleFavorite,
    /// Switch metric/imperial and refetch the displayed city
    ToggleUnit,
    /// Search for the favorite at this position (0-based)
    OpenFavorite(usize),
}
