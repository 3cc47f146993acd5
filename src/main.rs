//! AniBoard CLI - a terminal client for the AniBoard anime dashboard.
//!
//! Restores the saved session (or logs in interactively), then lists posts
//! with optional category and title-search filters, falling back to the
//! on-disk cache when the server is unreachable.

use std::collections::HashSet;
use std::io::{self, Write};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aniboard::auth::{CredentialStore, SessionManager};
use aniboard::cache::CacheManager;
use aniboard::config::Config;
use aniboard::models::Post;
use aniboard::utils::{cmp_ignore_case, truncate};

// ============================================================================
// Constants
// ============================================================================

/// Maximum concurrent category fetches.
/// Keeps multi-category listings fast without hammering the server.
const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Maximum login attempts before giving up
const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Display width for post titles
const TITLE_WIDTH: usize = 40;

/// Display width for post descriptions
const DESCRIPTION_WIDTH: usize = 60;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Parsed command-line arguments
struct CliArgs {
    logout: bool,
    categories: Vec<String>,
    search: Option<String>,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs {
        logout: false,
        categories: Vec::new(),
        search: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "logout" => args.logout = true,
            "--category" | "-c" => {
                if let Some(value) = iter.next() {
                    args.categories.push(value);
                }
            }
            "--search" | "-s" => args.search = iter.next(),
            other => warn!(arg = other, "Ignoring unknown argument"),
        }
    }
    args
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("AniBoard CLI starting");

    let args = parse_args();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let manager = SessionManager::new(config.base_url(), config.data_dir()?)?;
    let cache = CacheManager::new(config.cache_dir()?)?;

    if args.logout {
        manager.logout().await;
        println!("Logged out.");
        return Ok(());
    }

    if !config.offline_mode {
        manager.restore_session().await;

        if !manager.check_auth() {
            login_interactive(&manager, &mut config).await?;
        }

        if let Some(user) = manager.user() {
            println!("Signed in as {} <{}>\n", user.display_name, user.email);
        }
    }

    let posts = if config.offline_mode {
        cached_posts(&cache)?
    } else {
        match fetch_posts(&manager, &args.categories).await {
            Ok(posts) => {
                if let Err(e) = cache.save_posts(&posts) {
                    warn!(error = %e, "Failed to cache posts");
                }
                posts
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed, falling back to cache");
                cached_posts(&cache)?
            }
        }
    };

    print_posts(&posts, args.search.as_deref());
    Ok(())
}

/// Fetch posts for the requested categories (all posts when none given),
/// deduplicated and sorted by title.
async fn fetch_posts(manager: &SessionManager, categories: &[String]) -> Result<Vec<Post>> {
    let api = manager.api();

    let mut posts = if categories.is_empty() {
        api.fetch_posts(None).await?
    } else {
        let results: Vec<_> = stream::iter(categories)
            .map(|category| async move { api.fetch_posts(Some(category.as_str())).await })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for result in results {
            for post in result? {
                if seen.insert(post.post_id.clone()) {
                    merged.push(post);
                }
            }
        }
        merged
    };

    posts.sort_by(|a, b| cmp_ignore_case(&a.title, &b.title));
    Ok(posts)
}

/// Posts from the on-disk cache, with an age notice
fn cached_posts(cache: &CacheManager) -> Result<Vec<Post>> {
    match cache.load_posts()? {
        Some(cached) => {
            println!("Showing cached listing ({})\n", cached.age_display());
            Ok(cached.data)
        }
        None => {
            println!("No cached listing available.");
            Ok(Vec::new())
        }
    }
}

fn print_posts(posts: &[Post], search: Option<&str>) {
    let query = search.unwrap_or("");
    let mut shown = 0;

    for post in posts.iter().filter(|p| p.matches_search(query)) {
        shown += 1;
        let genres = if post.genres.is_empty() {
            String::new()
        } else {
            format!(" [{}]", post.genres.join(", "))
        };
        println!(
            "{:<width$}  {:<10}{}",
            truncate(&post.title, TITLE_WIDTH),
            post.category,
            genres,
            width = TITLE_WIDTH
        );
        if !post.description.is_empty() {
            println!("    {}", truncate(&post.description, DESCRIPTION_WIDTH));
        }
    }

    if shown == 0 {
        match search {
            Some(query) if !query.trim().is_empty() => {
                println!("No anime found for \"{}\"", query.trim());
            }
            _ => println!("No anime posts available"),
        }
    } else {
        println!("\n{} post(s)", shown);
    }
}

/// Prompt for credentials until login succeeds, remembering them on success
async fn login_interactive(manager: &SessionManager, config: &mut Config) -> Result<()> {
    println!("=== AniBoard Login ===\n");

    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let username = prompt_username(config.last_username.as_deref())?;

        let password = if CredentialStore::is_remembered(&username) {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if input.trim().to_lowercase() != "n" {
                CredentialStore::lookup(&username)?
            } else {
                rpassword::prompt_password("Password: ")?
            }
        } else {
            rpassword::prompt_password("Password: ")?
        };

        let outcome = manager.login(&username, &password).await;
        if outcome.success {
            println!("{}\n", outcome.message);

            if let Err(e) = CredentialStore::remember(&username, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
            config.last_username = Some(username);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            return Ok(());
        }

        println!("{}\n", outcome.message);
        if attempt == MAX_LOGIN_ATTEMPTS {
            anyhow::bail!("Login failed after {} attempts", MAX_LOGIN_ATTEMPTS);
        }
    }
    Ok(())
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(last_user) => print!("Username [{}]: ", last_user),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        match default {
            Some(last_user) => Ok(last_user.to_string()),
            None => Ok(String::new()),
        }
    } else {
        Ok(input.to_string())
    }
}
