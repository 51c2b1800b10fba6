//! Headless host for the Kuusi session core.
//!
//! Boots a session against file-backed flags, an offline identity provider,
//! and a headless router, runs the first routing decision, records an unload
//! boundary, and exits. Useful for exercising flag files and configuration
//! outside a frontend.
use anyhow::{Context, Result};
use clap::Parser;
use kuusi_app::{AppLifecycleEvent, AppSession, SessionConfig, SessionEffects};
use kuusi_core::effects::RouterEffects;
use kuusi_effects::{
    FileFlagStorage, HeadlessRouter, OfflineDocumentStore, OfflineIdentityProvider, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kuusi-host")]
#[command(about = "Run the Kuusi session bootstrap headlessly", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persisted flags file
    #[arg(short, long, default_value = ".kuusi/flags.json")]
    flags: PathBuf,

    /// Location to boot at
    #[arg(short, long, default_value = "/")]
    location: String,

    /// Invitation code to submit after boot
    #[arg(long)]
    invitation_code: Option<String>,
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    config.merge_with_env()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    if let Some(parent) = cli.flags.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let flags = FileFlagStorage::open(cli.flags.clone())
        .with_context(|| format!("opening {}", cli.flags.display()))?;

    let router = Arc::new(HeadlessRouter::new(&cli.location));
    let effects = SessionEffects {
        flags: Arc::new(flags),
        identity: Arc::new(OfflineIdentityProvider::new()),
        store: Arc::new(OfflineDocumentStore::new()),
        router: router.clone(),
        clock: Arc::new(SystemClock::new()),
    };
    let session = AppSession::new(effects, config)?;

    let guard = session.boot().await;
    println!("Booted at {}", router.current_location());

    if let Some(code) = cli.invitation_code.as_deref() {
        match session.submit_invitation_code(code) {
            Ok(to) => println!("Invitation accepted; now at {to}"),
            Err(e) => println!("Invitation rejected: {e} ({})", e.category().resolution_hint()),
        }
        tokio::task::yield_now().await;
    }

    session.on_lifecycle(AppLifecycleEvent::BeforeUnload);
    guard.unmount();
    println!("Final location {}", router.current_location());
    Ok(())
}
