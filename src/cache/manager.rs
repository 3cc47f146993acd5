use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::Post;

/// Consider cache stale after 1 hour.
/// The listing changes slowly; this avoids refetching on every launch.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew too
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// On-disk JSON cache of the last fetched post listing, for offline
/// display and fast cold starts.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;
        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;
        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(name), contents)?;
        Ok(())
    }

    pub fn load_posts(&self) -> Result<Option<CachedData<Vec<Post>>>> {
        self.load("posts")
    }

    pub fn save_posts(&self, posts: &[Post]) -> Result<()> {
        self.save("posts", &posts)
    }

    /// Drop all cached data
    pub fn clear(&self) -> Result<()> {
        let path = self.cache_path("posts");
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(id: &str, title: &str) -> Post {
        serde_json::from_value(serde_json::json!({"postId": id, "title": title}))
            .expect("build post")
    }

    #[test]
    fn test_posts_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("cache manager");

        assert!(cache.load_posts().expect("load").is_none());

        let posts = vec![post("p1", "Akira"), post("p2", "Paprika")];
        cache.save_posts(&posts).expect("save posts");

        let cached = cache.load_posts().expect("load").expect("cached entry");
        assert_eq!(cached.data.len(), 2);
        assert_eq!(cached.data[0].title, "Akira");
        assert!(!cached.is_stale());

        cache.clear().expect("clear");
        assert!(cache.load_posts().expect("load").is_none());
    }

    #[test]
    fn test_staleness() {
        let fresh = CachedData::new(vec![post("p1", "Akira")]);
        assert!(!fresh.is_stale());
        assert_eq!(fresh.age_display(), "just now");

        let old = CachedData {
            data: Vec::<Post>::new(),
            cached_at: Utc::now() - Duration::minutes(90),
        };
        assert!(old.is_stale());
        assert_eq!(old.age_display(), "1h ago");
    }
}
