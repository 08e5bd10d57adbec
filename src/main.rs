mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::error::AppError;
use crate::features::applications::dtos::SubscriptionForm;
use crate::features::applications::ApplicationService;
use crate::features::opportunities::dtos::{OpportunityField, OpportunityForm};
use crate::features::opportunities::services::{ModalMode, SubmitStatus};
use crate::features::opportunities::validator::validate_opportunity;
use crate::features::opportunities::{OpportunityModal, OpportunityService};
use crate::modules::backend::{BackendApi, HttpBackendClient};
use crate::shared::types::Alert;
use crate::shared::validation::FieldErrors;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "voluntariado-core")]
#[command(about = "Manage volunteering opportunities and applications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List published opportunities
    List,
    /// Validate an opportunity form without sending it
    Validate { file: PathBuf },
    /// Publish a new opportunity from a form file
    Create { file: PathBuf },
    /// Update an opportunity from a form file
    Update { id: i64, file: PathBuf },
    /// Delete an opportunity
    Delete { id: i64 },
    /// List volunteers who applied to an opportunity
    Applicants { id: i64 },
    /// Submit a volunteer application from a form file
    Subscribe {
        file: PathBuf,
        /// Target opportunity; defaults to the first listed one
        #[arg(long)]
        opportunity: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(Cli::parse()))
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded: api={}, close window={}..{}ms",
        config.api.base_url,
        config.submission.min_visible.as_millis(),
        config.submission.max_close.as_millis()
    );

    let api: Arc<dyn BackendApi> = Arc::new(HttpBackendClient::new(&config.api)?);
    let opportunities = Arc::new(OpportunityService::new(Arc::clone(&api)));
    let applications = ApplicationService::new(Arc::clone(&api));

    match cli.command {
        Commands::List => {
            for opportunity in opportunities.load().await? {
                println!(
                    "#{} {} [{}] {} | {} | {}",
                    opportunity
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    opportunity.title,
                    opportunity.status.as_str(),
                    opportunity.action_type.label(),
                    opportunity.organization_name,
                    opportunity.schedule_label()
                );
            }
        }
        Commands::Validate { file } => {
            let form: OpportunityForm = read_form(&file)?;
            let errors = validate_opportunity(&form.masked());
            if !errors.is_empty() {
                print_field_errors(&errors);
                anyhow::bail!("{} field(s) need attention", errors.len());
            }
            println!("Form is valid");
        }
        Commands::Create { file } => {
            let form: OpportunityForm = read_form(&file)?;
            let modal = OpportunityModal::new(Arc::clone(&opportunities), config.submission);
            modal.open_create();
            fill_modal(&modal, &form)?;
            finish_submit(&modal, &opportunities).await?;
        }
        Commands::Update { id, file } => {
            let form: OpportunityForm = read_form(&file)?;
            opportunities.load().await?;
            let record = opportunities
                .find(id)
                .await
                .ok_or_else(|| anyhow::anyhow!("Opportunity {} not found", id))?;

            let modal = OpportunityModal::new(Arc::clone(&opportunities), config.submission);
            modal.open_edit(&record)?;
            fill_modal(&modal, &form)?;
            finish_submit(&modal, &opportunities).await?;
        }
        Commands::Delete { id } => {
            let result = opportunities.delete(id).await;
            print_page_alert(&opportunities).await;
            result?;
        }
        Commands::Applicants { id } => {
            for applicant in applications.list_applicants(id).await? {
                println!(
                    "#{} {} <{}> applied {}",
                    applicant.volunteer.id,
                    applicant.volunteer.name.as_deref().unwrap_or("-"),
                    applicant.volunteer.email.as_deref().unwrap_or("-"),
                    applicant.application.applied_at.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Subscribe { file, opportunity } => {
            let form: SubscriptionForm = read_form(&file)?;
            match applications.subscribe(&form, opportunity).await {
                Ok(response) => println!(
                    "{}",
                    response
                        .message
                        .unwrap_or_else(|| "Application submitted".to_string())
                ),
                Err(AppError::Validation(errors)) => {
                    print_field_errors(&errors);
                    anyhow::bail!("Application not sent");
                }
                Err(e) => anyhow::bail!("Error: {}", e.user_message()),
            }
        }
    }

    Ok(())
}

fn read_form<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid form file {}: {}", path.display(), e))
}

/// Type every field of `form` into the modal
fn fill_modal(modal: &OpportunityModal, form: &OpportunityForm) -> anyhow::Result<()> {
    let editing = matches!(modal.state().mode, ModalMode::Edit { .. });
    for field in OpportunityField::ALL {
        if editing && field == OpportunityField::OrganizationName {
            let current = modal.state().form.organization_name;
            if !form.organization_name.is_empty() && form.organization_name != current {
                tracing::warn!(
                    "Ignoring organization name '{}': it cannot change after publishing",
                    form.organization_name
                );
            }
            continue;
        }
        modal.set_field(field, form.get(field))?;
    }
    Ok(())
}

async fn finish_submit(
    modal: &OpportunityModal,
    opportunities: &OpportunityService,
) -> anyhow::Result<()> {
    match modal.submit().await {
        Ok(SubmitStatus::Closed) => print_page_alert(opportunities).await,
        Ok(SubmitStatus::StillSaving(late)) | Ok(SubmitStatus::Superseded(late)) => {
            let alert = late.finish().await?;
            print_alert(&alert);
        }
        Err(AppError::Validation(errors)) => {
            print_field_errors(&errors);
            anyhow::bail!("Submission blocked by invalid fields");
        }
        Err(e) => {
            if let Some(alert) = modal.alert() {
                print_alert(&alert);
            }
            return Err(e.into());
        }
    }
    Ok(())
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{}: {}", field, message);
    }
}

fn print_alert(alert: &Alert) {
    println!("[{:?}] {}", alert.severity, alert.message);
}

async fn print_page_alert(opportunities: &OpportunityService) {
    if let Some(alert) = opportunities.page_alert().await {
        print_alert(&alert);
    }
}
