use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tenant_presentation::{
    config::Config,
    editor::Editor,
    merge::ResolveRequest,
    model::TenantData,
    progress::create_reporter,
    store::{TenantRepository, local::LocalTenantDb},
    tenant::{FetchOutcome, FetchStatus, TenantStore},
    theme::ThemeCatalog,
};
use tracing::{error, info};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "TENANT_PRESENTATION_CONFIG")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a tenant payload read from a JSON file
    Import { path: PathBuf },
    /// Print the stored tenant payload
    Export,
    /// Print the merged configuration of one component instance
    Resolve {
        #[clap(long)]
        page: String,
        #[clap(long = "type")]
        kind: String,
        #[clap(long)]
        variant: String,
        #[clap(long)]
        id: Option<String>,
        /// Inline JSON object laid over everything else
        #[clap(long = "override")]
        overrides: Option<String>,
    },
    /// Switch every page to another theme
    SwitchTheme { theme: u32 },
    /// Restore a stored backup such as Theme1Backup
    Restore { key: String },
    /// List stored theme backups
    Backups,
}

async fn open_editor(
    config: &Config,
    db: &LocalTenantDb,
    catalog: ThemeCatalog,
) -> anyhow::Result<Editor> {
    let mut editor = Editor::new(TenantStore::new(&config.tenant), catalog)
        .with_reporter(create_reporter());
    editor.set_active_page(config.active_page.clone());
    if editor.load(db).await == FetchOutcome::Failed {
        let reason = match editor.tenant().status() {
            FetchStatus::Failed(reason) => reason.clone(),
            _ => "unknown".to_owned(),
        };
        bail!("load tenant {}: {reason}", config.tenant);
    }
    Ok(editor)
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = tokio::fs::read_to_string(&opts.config)
        .await
        .with_context(|| "read config")?;
    let config: Config = serde_yaml::from_str(&config)
        .with_context(|| format!("parse config from {}", opts.config.display()))?;
    config.validate().map_err(|msg| anyhow!("{msg}"))?;
    let db = LocalTenantDb::open(&config.database)
        .await
        .with_context(|| format!("open {}", config.database))?;

    match opts.command {
        Command::Import { path } => {
            let document = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            let data: TenantData = serde_json::from_str(&document)
                .with_context(|| format!("parse tenant payload from {}", path.display()))?;
            let changed = db.save(&config.tenant, &data).await?;
            info!(tenant = config.tenant, changed, "imported tenant payload");
        }
        Command::Export => {
            let data = db
                .load(&config.tenant)
                .await?
                .ok_or_else(|| anyhow!("tenant {} is not stored", config.tenant))?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Resolve {
            page,
            kind,
            variant,
            id,
            overrides,
        } => {
            let editor = open_editor(&config, &db, ThemeCatalog::new()).await?;
            let mut request = ResolveRequest::new(kind, variant).page(page);
            if let Some(id) = id {
                request = request.id(id);
            }
            if let Some(overrides) = overrides {
                let overrides =
                    serde_json::from_str(&overrides).with_context(|| "parse --override")?;
                request = request.overrides(overrides);
            }
            let merged = editor.resolve(&request);
            println!("{}", serde_json::to_string_pretty(merged.value())?);
        }
        Command::SwitchTheme { theme } => {
            let catalog = ThemeCatalog::load(&config.themes).await?;
            let mut editor = open_editor(&config, &db, catalog).await?;
            let outcome = editor.apply_theme_to_all_pages(theme)?;
            editor.persist(&db).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Restore { key } => {
            let catalog = ThemeCatalog::load(&config.themes).await?;
            let mut editor = open_editor(&config, &db, catalog).await?;
            let outcome = editor.restore_theme_from_backup(&key)?;
            editor.persist(&db).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Backups => {
            let editor = open_editor(&config, &db, ThemeCatalog::new()).await?;
            for key in editor.backup_keys() {
                println!("{key}");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts).await {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
