use anyhow::{Context, Result};
use smart_todo::cli::{
    Args, ExecutionMode, RecordFormat, RecordLoader, TerminalGate, export_tasks,
};
use smart_todo::config::{AppConfig, ConfigDiscovery};
use smart_todo::enrichment::{EnrichmentClient, HttpEnrichmentClient};
use smart_todo::orchestrator::{
    ReconcileOutcome, ReconciliationReport, ReprioritizationOrchestrator, SubmissionOutcome,
};
use smart_todo::store::{ContextStore, HttpTaskStore, TaskStore};
use smart_todo::task::{Task, TaskFilter};
use smart_todo::{BatchOperationCoordinator, ImportPipeline, ImportStatus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_directive = if args.verbose {
        "smart_todo=debug"
    } else {
        "smart_todo=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let ExecutionMode::ShowConfig = mode {
        ConfigDiscovery::show_discovery_info();
        return Ok(());
    }

    let config = ConfigDiscovery::load(args.config.as_deref())?;
    let app = App::new(&config)?;

    match mode {
        ExecutionMode::Suggest(form) => {
            let suggestion = app.orchestrator.suggest(&form).await?;
            println!("{}", serde_json::to_string_pretty(&suggestion)?);
        }
        ExecutionMode::Submit { form, confirmation } => {
            let suggestion = app.orchestrator.suggest(&form).await?;
            let outcome = app
                .orchestrator
                .submit_new_task(form, Some(&suggestion), &TerminalGate::new(confirmation))
                .await
                .inspect_err(|e| {
                    if let Some(report) = e.reconciliation() {
                        print_reconciliation(report);
                    }
                })?;
            print_submission(&outcome);
        }
        ExecutionMode::Import(path) => {
            let records = RecordLoader::load(&path)?;
            let summary = app.import.import_batch(records).await;
            println!(
                "📥 Imported {} of {} records ({} skipped, {} failed)",
                summary.created.len(),
                summary.total(),
                summary.skipped.len(),
                summary.failed.len()
            );
            for failure in &summary.failed {
                println!("  ❌ #{} '{}': {}", failure.index + 1, failure.title, failure.error);
            }
            if summary.status() == ImportStatus::Failed {
                anyhow::bail!("no records could be imported");
            }
        }
        ExecutionMode::Export { format, output } => {
            let tasks = app.store.list_tasks().await?;
            write_export(&tasks, format, output)?;
        }
        ExecutionMode::List(filter) => {
            let tasks = app.store.list_tasks().await?;
            print_tasks(&tasks, &filter);
        }
        ExecutionMode::Delete(ids) => {
            let report = app.batch.delete_many(&ids).await;
            for id in report.succeeded() {
                println!("🗑️  Deleted task {}", id);
            }
            for (id, error) in report.failed() {
                println!("❌ Task {} not deleted: {}", id, error);
            }
            if !report.is_complete_success() {
                println!("Run 'smart-todo list' to see the current state.");
            }
        }
        ExecutionMode::AddContext {
            content,
            source_type,
        } => {
            let entry = app.store.create_context(content, source_type).await?;
            println!("📝 Saved {} context #{}", entry.source_type, entry.id);
        }
        ExecutionMode::ListContexts => {
            for entry in app.store.list_contexts().await? {
                println!(
                    "#{} [{}] {}: {}",
                    entry.id,
                    entry.source_type,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.content
                );
            }
        }
        ExecutionMode::ListCategories => {
            for category in app.store.list_categories().await? {
                println!("{} (used {} times)", category.name, category.usage_frequency);
            }
        }
        ExecutionMode::ShowConfig => {}
    }

    Ok(())
}

struct App {
    store: Arc<HttpTaskStore>,
    orchestrator: ReprioritizationOrchestrator,
    import: ImportPipeline,
    batch: BatchOperationCoordinator,
}

impl App {
    fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(HttpTaskStore::new(&config.store)?);
        let service = HttpEnrichmentClient::new(&config.enrichment)?;
        let enrichment = EnrichmentClient::new(
            Arc::new(service),
            Duration::from_secs(config.enrichment.timeout_secs),
        );
        info!(
            "Using task store {} and enrichment service {}",
            config.store.base_url, config.enrichment.base_url
        );

        Ok(Self {
            orchestrator: ReprioritizationOrchestrator::new(
                store.clone(),
                enrichment.clone(),
                &config.orchestrator,
            ),
            import: ImportPipeline::new(store.clone(), enrichment, &config.import),
            batch: BatchOperationCoordinator::new(store.clone()),
            store,
        })
    }
}

fn print_submission(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Created {
            task,
            reconciliation,
        } => {
            println!(
                "✅ Created task {} '{}' (priority {}, category {})",
                task.id,
                task.title,
                task.priority_score,
                task.category_or_default()
            );
            if let Some(report) = reconciliation {
                print_reconciliation(report);
            }
        }
        SubmissionOutcome::Aborted(reason) => println!("⏹️  Nothing created: {:?}", reason),
    }
}

fn print_reconciliation(report: &ReconciliationReport) {
    println!(
        "🔁 Rescored: {} applied, {} skipped, {} failed",
        report.applied(),
        report.skipped(),
        report.failed()
    );
    for entry in &report.entries {
        match &entry.outcome {
            ReconcileOutcome::Applied {
                task_id,
                previous_priority,
                new_priority,
            } => println!(
                "  #{} {}: {} -> {}",
                task_id, entry.result.title, previous_priority, new_priority
            ),
            ReconcileOutcome::Skipped(skip) => {
                println!("  skipped '{}': {:?}", entry.result.title, skip)
            }
            ReconcileOutcome::Failed { task_id, error } => {
                println!("  ❌ #{} {}: {}", task_id, entry.result.title, error)
            }
        }
    }
}

fn print_tasks(tasks: &[Task], filter: &TaskFilter) {
    let visible = filter.apply(tasks);
    for task in &visible {
        println!(
            "#{:<4} [{:>2}] {:<40} {:>10} {:>3}%  {}",
            task.id,
            task.priority_score,
            task.title,
            task.deadline.map(|d| d.to_string()).unwrap_or_default(),
            task.status,
            task.category_or_default()
        );
    }
    println!("{} of {} tasks", visible.len(), tasks.len());
}

fn write_export(tasks: &[Task], format: RecordFormat, output: Option<PathBuf>) -> Result<()> {
    let content = export_tasks(tasks, format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            println!("📤 Exported {} tasks to {:?}", tasks.len(), path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
