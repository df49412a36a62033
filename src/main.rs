// honeyshops command-line entry point.
// Lists and searches shops through the cached repository and manages the stored sign-in.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use honeyshops::auth::{
    AppleIdCredential, AppleIdProvider, AuthProvider, AuthSessionManager, AuthorizationFlow,
    FileStore, FlowError, Scope,
};
use honeyshops::cache::CacheStore;
use honeyshops::shops::{CachedShopRepository, RemoteShopSource, ShopRecord};
use honeyshops::state::ShopListState;
use honeyshops::{Config, Result};

#[derive(Parser)]
#[command(name = "honeyshops", version, about = "Browse local honey shops")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List shops, optionally filtered by a search term
    Shops {
        /// Match against name, address and description
        #[arg(long, short)]
        search: Option<String>,
        /// Skip the local snapshot and fetch from the network
        #[arg(long)]
        live: bool,
    },
    /// Show one shop in detail
    Show {
        name: String,
        #[arg(long)]
        live: bool,
    },
    /// Inspect or clear the offline snapshot
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print the snapshot location and age
    Path,
    /// Delete the snapshot
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// List registered providers
    Providers,
    /// Show the restored session
    Status,
    /// Sign in with a provider
    SignIn { provider: String },
    /// Sign out of the active session
    SignOut,
}

/// Terminals have no window to present the Apple ID sheet in.
struct HeadlessFlow;

#[async_trait]
impl AuthorizationFlow for HeadlessFlow {
    fn is_available(&self) -> bool {
        false
    }

    async fn authorize(
        &self,
        _scopes: &[Scope],
    ) -> std::result::Result<AppleIdCredential, FlowError> {
        Err(FlowError::Failed(
            "interactive sign-in needs a graphical session".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "honeyshops=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Shops { search, live } => {
            let mut state = load_shops(live).await?;
            if let Some(search) = search {
                state.set_search(search);
            }
            let shops = state.filtered();
            if shops.is_empty() {
                println!("No shops found.");
            }
            for shop in shops {
                print_summary(shop);
            }
        }
        Command::Show { name, live } => {
            let state = load_shops(live).await?;
            match state.find(&name) {
                Some(shop) => print_detail(shop),
                None => println!("No shop named {name:?}."),
            }
        }
        Command::Cache { action } => {
            let cache = cache_store(&Config::from_env()?);
            match action {
                CacheAction::Path => match cache.path() {
                    Some(path) => {
                        println!("{}", path.display());
                        if let Some(age) = cache
                            .modified_at()
                            .and_then(|m| SystemTime::now().duration_since(m).ok())
                        {
                            println!("updated {}s ago", age.as_secs());
                        }
                    }
                    None => println!("No cache directory available."),
                },
                CacheAction::Clear => {
                    cache.clear()?;
                    println!("Cache cleared.");
                }
            }
        }
        Command::Auth { action } => {
            let apple = AppleIdProvider::new(HeadlessFlow, FileStore::open_default()?);
            let manager = AuthSessionManager::new(vec![Arc::new(apple) as Arc<dyn AuthProvider>]);
            match action {
                AuthAction::Providers => {
                    for provider in manager.providers() {
                        let availability = if provider.is_available() {
                            "available"
                        } else {
                            "unavailable"
                        };
                        println!(
                            "{:<8} {} [{}] ({availability})",
                            provider.id(),
                            provider.display_name(),
                            provider.icon()
                        );
                    }
                }
                AuthAction::Status => match manager.current_session() {
                    Some(session) => {
                        println!("Signed in with {} as {}", session.provider_id, session.id);
                        if let Some(name) = session.display_name {
                            println!("  name:  {name}");
                        }
                        if let Some(email) = session.email {
                            println!("  email: {email}");
                        }
                    }
                    None => println!("Not signed in."),
                },
                AuthAction::SignIn { provider } => {
                    let session = manager.sign_in(&provider).await?;
                    println!("Signed in as {}", session.display_name.unwrap_or(session.id));
                }
                AuthAction::SignOut => {
                    manager.sign_out().await?;
                    println!("Signed out.");
                }
            }
        }
    }
    Ok(())
}

fn cache_store(config: &Config) -> CacheStore {
    match &config.cache_file {
        Some(path) => CacheStore::new(path),
        None => CacheStore::default_location(),
    }
}

/// Load shops through the snapshot, or straight from the network when `live`.
///
/// The credential is only required when the network is actually used.
async fn load_shops(live: bool) -> Result<ShopListState> {
    let config = Config::from_env()?;
    let remote = RemoteShopSource::new(&config)?;

    let mut state = ShopListState::new();
    if live {
        state.load(&remote).await?;
    } else {
        let repository = CachedShopRepository::new(remote, cache_store(&config));
        state.load(&repository).await?;
    }
    Ok(state)
}

fn print_summary(shop: &ShopRecord) {
    println!("{:<40} {:>3.1}★  {}", shop.name, shop.rating, shop.address);
}

fn print_detail(shop: &ShopRecord) {
    println!("{}", shop.name);
    println!("  rating:   {:.1}", shop.rating);
    println!("  address:  {}", shop.address);
    if let Some(point) = shop.coordinate() {
        println!("  location: {:.4}, {:.4}", point.latitude, point.longitude);
    }
    println!("  map:      {}", shop.map_link);
    println!("  website:  {}", shop.website);
    if let Some(picture) = &shop.picture {
        println!("  picture:  {picture}");
    }
    println!();
    println!("{}", shop.details);
}
