//! Folio workplace access control administration tool.

#![forbid(unsafe_code)]

mod command;
mod config;
mod dto;

use std::env;
use std::sync::Arc;

use folio_application::{AccessControlService, EditabilityService, LockService, ProjectRepository};
use folio_core::{AppError, AppResult, PrincipalId, ProjectId};
use folio_domain::{EditabilitySettings, PrincipalKind, ResourcePath};
use folio_infrastructure::{
    ConsoleAuditRepository, InMemoryContentRepository, SeedDirectory, SeedDocument,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::config::AccessctlConfig;
use crate::dto::{
    AclEntryResponse, EditabilityResponse, EffectivePermissionResponse, LockResponse,
    project_label,
};

struct Services {
    access_control: AccessControlService,
    locks: LockService,
    editability: EditabilityService,
    project: ProjectId,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AccessctlConfig::load()?;
    let command = Command::parse(env::args().skip(1))?;

    let repository = Arc::new(InMemoryContentRepository::new());
    let directory = SeedDocument::from_file(&config.seed_file)?
        .apply(&repository)
        .await?;
    let services = build_services(repository, config.editability).await?;

    info!(
        command = command.name(),
        seed_file = %config.seed_file.display(),
        project = %project_label(&directory, services.project),
        auto_lock_on_edit = config.editability.auto_lock_on_edit,
        temp_file_project_override = config.editability.temp_file_project_override,
        "folio-accessctl started"
    );

    let output = run(&services, &directory, command).await?;
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");

    Ok(())
}

async fn build_services(
    repository: Arc<InMemoryContentRepository>,
    settings: EditabilitySettings,
) -> AppResult<Services> {
    let project = repository.current_project().await?;
    let audit_repository = Arc::new(ConsoleAuditRepository::new());

    let access_control = AccessControlService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        audit_repository.clone(),
    );
    let locks = LockService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        audit_repository,
    );
    let editability = EditabilityService::new(locks.clone(), repository, settings);

    Ok(Services {
        access_control,
        locks,
        editability,
        project,
    })
}

async fn run(services: &Services, directory: &SeedDirectory, command: Command) -> AppResult<Value> {
    match command {
        Command::Acl { resource } => {
            let listings = services.access_control.access_control_list(&resource).await?;
            let rows: Vec<AclEntryResponse> =
                listings.iter().map(AclEntryResponse::from_listing).collect();
            to_json(&rows)
        }
        Command::Effective {
            resource,
            principal,
        } => {
            let principal_id = directory.principal(&principal)?.id();
            let permissions = services
                .access_control
                .effective_permission(&resource, principal_id)
                .await?;
            to_json(&EffectivePermissionResponse::new(
                &resource,
                &principal,
                permissions,
            ))
        }
        Command::Lock { resource, user } => {
            let actor = require_user(directory, &user)?;
            services.locks.lock(&resource, actor, services.project).await?;
            lock_output(services, directory, &resource).await
        }
        Command::Steal { resource, user } => {
            let actor = require_user(directory, &user)?;
            services
                .locks
                .change_lock(&resource, actor, services.project)
                .await?;
            lock_output(services, directory, &resource).await
        }
        Command::Unlock {
            resource,
            user,
            force,
        } => {
            let actor = require_user(directory, &user)?;
            services
                .locks
                .unlock(&resource, actor, services.project, force)
                .await?;
            lock_output(services, directory, &resource).await
        }
        Command::Editable { resource, user } => {
            let actor = require_user(directory, &user)?;
            let decision = services
                .editability
                .editability(&resource, actor, services.project)
                .await;
            to_json(&EditabilityResponse {
                resource: resource.to_string(),
                user,
                project: project_label(directory, services.project),
                editable: decision.is_editable(),
                requires_lock: decision.requires_lock(),
                decision,
            })
        }
        Command::Locks { folder } => {
            let records = services.locks.locked_resources(&folder).await?;
            let rows: Vec<LockResponse> = records
                .iter()
                .map(|record| LockResponse::new(record, directory))
                .collect();
            to_json(&rows)
        }
    }
}

async fn lock_output(
    services: &Services,
    directory: &SeedDirectory,
    resource: &ResourcePath,
) -> AppResult<Value> {
    let record = services.locks.effective_lock(resource).await?;
    to_json(&LockResponse::new(&record, directory))
}

fn require_user(directory: &SeedDirectory, name: &str) -> AppResult<PrincipalId> {
    let principal = directory.principal(name)?;
    if principal.kind() != PrincipalKind::User {
        return Err(AppError::Validation(format!(
            "'{name}' is a {}, only users can hold locks",
            principal.kind()
        )));
    }

    Ok(principal.id())
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to serialize output: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
