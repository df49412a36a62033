// Shop list state.
// Tracks loading progress, the user-facing error and search text for the shop list.

use crate::error::Result;
use crate::shops::{ShopRecord, ShopRepository};

/// Message shown when the shop list cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load shops. Please try again later.";

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadingState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// State behind the searchable shop list and map.
#[derive(Debug, Clone, Default)]
pub struct ShopListState {
    pub shops: LoadingState<Vec<ShopRecord>>,
    pub search: String,
}

impl ShopListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load shops from `repository`, replacing whatever was shown.
    ///
    /// On failure the state carries [`LOAD_FAILED_MESSAGE`] and the
    /// underlying error is returned to the caller.
    pub async fn load(&mut self, repository: &dyn ShopRepository) -> Result<()> {
        self.shops = LoadingState::Loading;
        match repository.fetch_shops().await {
            Ok(shops) => {
                self.shops = LoadingState::Loaded(shops);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load shops");
                self.shops = LoadingState::Error(LOAD_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Shops matching the search text in name, address or description.
    pub fn filtered(&self) -> Vec<&ShopRecord> {
        let Some(shops) = self.shops.data() else {
            return Vec::new();
        };

        if self.search.is_empty() {
            return shops.iter().collect();
        }
        let needle = self.search.to_lowercase();

        shops
            .iter()
            .filter(|shop| {
                shop.name.to_lowercase().contains(&needle)
                    || shop.address.to_lowercase().contains(&needle)
                    || shop.details.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Look a shop up by its name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&ShopRecord> {
        self.shops
            .data()?
            .iter()
            .find(|shop| shop.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::error::{HoneyError, Result};
    use crate::shops::FixedShopRepository;

    fn shop(name: &str, address: &str, details: &str) -> ShopRecord {
        ShopRecord {
            name: name.to_string(),
            address: address.to_string(),
            details: details.to_string(),
            ..ShopRecord::sample()
        }
    }

    fn repository() -> FixedShopRepository {
        FixedShopRepository::new(vec![
            shop("The House of Honey", "Mariani Ave, Henley Brook WA", "Swan Valley cafe"),
            shop("Montana Honey Bee Company", "19 S Tracy Ave, Bozeman", "Raw honey"),
            shop("Beehive Store", "Main St", "Bee sanctuary near Bozeman"),
        ])
    }

    struct Unreachable;

    #[async_trait]
    impl ShopRepository for Unreachable {
        async fn fetch_shops(&self) -> Result<Vec<ShopRecord>> {
            Err(HoneyError::BadServerResponse(StatusCode::BAD_GATEWAY))
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut state = ShopListState::new();
        assert!(!state.shops.is_loaded());

        state.load(&repository()).await.unwrap();
        assert!(state.shops.is_loaded());
        assert_eq!(state.filtered().len(), 3);
    }

    #[tokio::test]
    async fn test_load_failure_message() {
        let mut state = ShopListState::new();
        let err = state.load(&Unreachable).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(state.shops.error(), Some(LOAD_FAILED_MESSAGE));
        assert!(state.filtered().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_any_field() {
        let mut state = ShopListState::new();
        state.load(&repository()).await.unwrap();

        state.set_search("BOZEMAN");
        let names: Vec<&str> = state.filtered().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Montana Honey Bee Company", "Beehive Store"]);

        state.set_search("mariani");
        assert_eq!(state.filtered().len(), 1);

        state.set_search("nothing like this");
        assert!(state.filtered().is_empty());

        state.set_search("");
        assert_eq!(state.filtered().len(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_search_is_literal() {
        let mut state = ShopListState::new();
        state.load(&repository()).await.unwrap();

        state.set_search("  ");
        assert!(state.filtered().is_empty());

        state.set_search(" ");
        assert_eq!(state.filtered().len(), 3);

        state.set_search(" honey");
        let names: Vec<&str> = state.filtered().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["The House of Honey", "Montana Honey Bee Company"]);
    }

    #[tokio::test]
    async fn test_find_ignores_case() {
        let mut state = ShopListState::new();
        state.load(&repository()).await.unwrap();
        assert!(state.find("the house of honey").is_some());
        assert!(state.find("Unknown").is_none());
    }
}
