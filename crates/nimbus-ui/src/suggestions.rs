/// Cities offered for autocompletion when nothing else is configured.
pub const MAJOR_CITIES: [&str; 20] = [
    "London",
    "New York",
    "Tokyo",
    "Paris",
    "Sydney",
    "Dubai",
    "Singapore",
    "Los Angeles",
    "Chicago",
    "Toronto",
    "Berlin",
    "Moscow",
    "Beijing",
    "Shanghai",
    "Mumbai",
    "Delhi",
    "Cairo",
    "Rio de Janeiro",
    "Mexico City",
    "Buenos Aires",
];

#[derive(Debug, Clone)]
pub struct CitySuggestions {
    cities: Vec<String>,
}

impl CitySuggestions {
    /// Use `configured` when non-empty, otherwise the built-in list.
    pub fn new(configured: &[String]) -> Self {
        let cities = if configured.is_empty() {
            MAJOR_CITIES.iter().map(|c| c.to_string()).collect()
        } else {
            configured.to_vec()
        };
        Self { cities }
    }

    /// Case-insensitive prefix match; an empty prefix matches everything.
    pub fn matching(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|c| c.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

impl Default for CitySuggestions {
    fn default() -> Self {
        Self::new(&[])
    }
}
