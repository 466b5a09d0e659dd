use anyhow::Context as _;
use client::ApiClient;
use configs::AppConfig;
use serde_json::Value;
use service::draft::{Draft, SubmitError, VendorSetup};
use service::{AppContext, LoadOutcome};
use tracing::{info, warn};

use crate::command::Command;
use crate::errors::StartupError;

/// Load config from `CONFIG_PATH`/`config.toml`.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config_from(&path)
}

/// Defaults apply only when the file does not exist; an unreadable or
/// malformed file is rejected so the stores never switch keys silently.
pub fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    let mut cfg = match configs::load_from_file(path) {
        Ok(cfg) => cfg,
        Err(e) if e.downcast_ref::<std::io::Error>().is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound) => {
            warn!(%path, "config file not found; using defaults");
            AppConfig::default()
        }
        Err(e) => return Err(StartupError::InvalidConfig(format!("{path}: {e}"))),
    };
    cfg.normalize_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

/// Public entry: open the device store, run one command, report its output.
pub async fn run(cfg: &AppConfig, cmd: Command) -> anyhow::Result<String> {
    let (ctx, language) = AppContext::open(cfg).await?;
    let language_note = match language {
        Ok(LoadOutcome::Restored(l)) => format!("restored {l}"),
        Ok(LoadOutcome::Missing) => "default".to_string(),
        Ok(LoadOutcome::Unrecognized(raw)) => format!("default (ignored stored {raw:?})"),
        Err(e) => format!("default (storage error: {e})"),
    };

    let out = execute(&ctx, cfg, cmd, &language_note).await;
    ctx.shutdown();
    out
}

async fn execute(ctx: &AppContext, cfg: &AppConfig, cmd: Command, language_note: &str) -> anyhow::Result<String> {
    let prefs = ctx.preferences()?;
    let drafts = ctx.drafts()?;

    match cmd {
        Command::Status => {
            drafts.load_draft().await?;
            let view: VendorSetup = drafts.typed().await?;
            let next = match view.resume_step() {
                Some(step) => format!("{step:?}"),
                None => "ready to submit".to_string(),
            };
            Ok(format!(
                "language: {} [{}]\ndraft fields: {}\nsetup: {}",
                prefs.language(),
                language_note,
                drafts.snapshot().await.len(),
                next
            ))
        }
        Command::Language(None) => Ok(prefs.language().to_string()),
        Command::Language(Some(lang)) => {
            prefs.set_language(lang).await.context("language changed for this session only")?;
            Ok(format!("language set to {lang}"))
        }
        Command::DraftShow => {
            drafts.load_draft().await?;
            Ok(pretty(drafts.snapshot().await))
        }
        Command::DraftSet(fields) => {
            drafts.load_draft().await?;
            drafts.update(fields.into_iter().collect::<Draft>()).await;
            drafts.save_draft().await?;
            Ok(pretty(drafts.snapshot().await))
        }
        Command::DraftSave => {
            // a fresh process starts empty; saving that would wipe the stored draft
            drafts.load_draft().await?;
            drafts.save_draft().await?;
            Ok("draft saved".to_string())
        }
        Command::DraftLoad => {
            let found = drafts.load_draft().await?;
            Ok(if found { pretty(drafts.snapshot().await) } else { "no saved draft".to_string() })
        }
        Command::DraftClear => {
            drafts.clear().await?;
            Ok("draft cleared".to_string())
        }
        Command::DraftSubmit => {
            drafts.load_draft().await?;
            let view: VendorSetup = drafts.typed().await?;
            let missing = view.missing_required();
            if !missing.is_empty() {
                return Err(StartupError::Usage(format!("setup incomplete, missing: {}", missing.join(", "))).into());
            }
            let api = ApiClient::new(&cfg.api)?;
            let response = drafts
                .submit_with(|draft| async move { api.submit_vendor_setup(&draft).await })
                .await
                .map_err(|e| match e {
                    SubmitError::Rejected(err) => anyhow::anyhow!("vendor setup rejected; draft kept: {err}"),
                    SubmitError::Cleanup(err) => anyhow::anyhow!("vendor setup submitted; draft not cleared: {err}"),
                })?;
            info!("vendor setup submitted");
            Ok(format!("submitted: {response}"))
        }
    }
}

fn pretty(draft: Draft) -> String {
    let value: Value = draft.into_value();
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
