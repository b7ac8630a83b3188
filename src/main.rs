use anyhow::Result;
use clap::Parser;
use tracing::Instrument;

use safety_orientation::cli::commands::{
    acknowledge::{AcknowledgeCommand, SignatureSource},
    dashboard::DashboardCommand,
    info::InfoCommand,
    quiz::QuizCommand,
    reset::ResetCommand,
    show_next_action,
    status::StatusCommand,
    summary::SummaryCommand,
    sync::SyncCommand,
    video::{VideoCommand, VideoEvent},
    AppContext,
};
use safety_orientation::cli::{Cli, Commands};
use safety_orientation::orientation::WorkerInfoForm;
use safety_orientation::{config, create_session_span, generate_correlation_id, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config()?.clone();
    init_telemetry(&config.observability)?;

    tokio::runtime::Runtime::new()?.block_on(async {
        let context = AppContext::open(config).await?;
        let session_id = context.session.current().await.session_id;
        let correlation_id = generate_correlation_id();
        let span = create_session_span(
            operation_name(&cli.command),
            session_id.as_deref(),
            &correlation_id,
        );
        run(cli.command, &context).instrument(span).await
    })
}

fn operation_name(command: &Option<Commands>) -> &'static str {
    match command {
        None => "next",
        Some(Commands::Info { .. }) => "info",
        Some(Commands::Video { .. }) => "video",
        Some(Commands::Quiz) => "quiz",
        Some(Commands::Acknowledge { .. }) => "acknowledge",
        Some(Commands::Summary) => "summary",
        Some(Commands::Status) => "status",
        Some(Commands::Reset) => "reset",
        Some(Commands::Sync { .. }) => "sync",
        Some(Commands::Dashboard { .. }) => "dashboard",
    }
}

async fn run(command: Option<Commands>, context: &AppContext) -> Result<()> {
    match command {
        // Default behavior: no subcommand - show progress and what to do next
        None => show_next_action(context).await,
        Some(Commands::Info {
            full_name,
            hire_date,
            supervisor,
            site,
            status,
            contact_name,
            contact_phone,
            contact_relationship,
        }) => {
            let form = WorkerInfoForm {
                full_name,
                hire_date,
                supervisor_name: supervisor,
                site_id: site,
                status_type: status,
                emergency_contact_name: contact_name,
                emergency_contact_phone: contact_phone,
                emergency_contact_relationship: contact_relationship,
            };
            InfoCommand::new(form).execute(context).await
        }
        Some(Commands::Video { position, ended }) => {
            let event = match position {
                Some(seconds) if !ended => VideoEvent::Position(seconds),
                _ => VideoEvent::Ended,
            };
            VideoCommand::new(event).execute(context).await
        }
        Some(Commands::Quiz) => QuizCommand::new().execute(context).await,
        Some(Commands::Acknowledge {
            confirm,
            signature,
            signature_file,
        }) => {
            let source = match (signature, signature_file) {
                (Some(text), _) => SignatureSource::Inline(text),
                (None, Some(path)) => SignatureSource::File(path),
                (None, None) => SignatureSource::Inline(String::new()),
            };
            AcknowledgeCommand::new(confirm, source).execute(context).await
        }
        Some(Commands::Summary) => SummaryCommand.execute(context).await,
        Some(Commands::Status) => StatusCommand.execute(context).await,
        Some(Commands::Reset) => ResetCommand.execute(context).await,
        Some(Commands::Sync { watch }) => SyncCommand::new(watch).execute(context).await,
        Some(Commands::Dashboard {
            search,
            status,
            remote,
        }) => {
            DashboardCommand {
                search,
                status,
                remote,
            }
            .execute(context)
            .await
        }
    }
}
