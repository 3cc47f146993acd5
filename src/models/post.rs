use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// Category applied to entries the server left uncategorized
const DEFAULT_CATEGORY: &str = "Anime";

/// One anime entry from the `/posts` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "postId", alias = "_id")]
    pub post_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub picture: Option<String>,
}

impl Post {
    /// Fill the defaults the server omits: uncategorized entries display
    /// as "Anime", absent genre lists as empty.
    pub fn normalized(mut self) -> Self {
        if self.category.is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        self
    }

    /// Title match for the dashboard search box. Empty queries match all.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || contains_ignore_case(&self.title, query)
    }

    /// URL of the cover image, when the post has one
    pub fn image_url(&self, base_url: &str) -> Option<String> {
        self.picture
            .as_ref()
            .map(|picture| format!("{}/file/{}", base_url, picture))
    }
}
