use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use booking_admin::api::{BookingApi, HttpBookingApi};
use booking_admin::config::AppConfig;
use booking_admin::controllers::dashboard::DashboardState;
use booking_admin::controllers::form::FormPhase;
use booking_admin::controllers::{
    BookingFormController, BookingListController, CancelOutcome, DashboardController,
    SubmitOutcome,
};
use booking_admin::models::booking::{format_wire_date, parse_user_date};
use booking_admin::models::{
    BookingId, BookingStatus, ListQuery, PerPage, QueryChange, SortBy, SortOrder,
};
use booking_admin::render;
use booking_admin::services::confirm::{AssumeYes, Confirm, StdinConfirm};
use booking_admin::services::notify::terminal::TerminalNotifier;
use booking_admin::services::notify::{Notifier, TracingNotifier};
use booking_admin::shell::{self, Route};
use booking_admin::validation::BookingField;

#[derive(Parser)]
#[command(name = "booking-admin")]
#[command(about = "Manage bookings through the booking API", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the booking API (overrides BOOKING_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides BOOKING_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[arg(long, global = true)]
    no_color: bool,

    /// Send notifications to the log instead of the terminal
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Booking counts per status
    Dashboard,
    /// List bookings with filters, sorting and pagination
    List(ListArgs),
    /// Show one booking
    Show { id: String },
    /// Create a booking
    Create(FormArgs),
    /// Edit a booking; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Cancel a booking
    Cancel {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the navigation menu
    Menu {
        #[arg(long, value_enum, default_value = "dashboard")]
        active: Section,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Customer name or email
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    status: Option<BookingStatus>,
    /// DD/MM/YYYY or YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// DD/MM/YYYY or YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    #[arg(long, value_enum)]
    sort_by: Option<SortArg>,
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// 10, 20, 30 or 50
    #[arg(long)]
    per_page: Option<PerPage>,
    #[arg(long)]
    page: Option<u32>,
}

#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// DD/MM/YYYY or YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// pending, confirmed or cancelled
    #[arg(long)]
    status: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    BookingDate,
    Status,
    CustomerName,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    Dashboard,
    Bookings,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_user_date(s).ok_or_else(|| format!("{s:?} is not a DD/MM/YYYY or YYYY-MM-DD date"))
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::BookingDate => SortBy::BookingDate,
            SortArg::Status => SortBy::Status,
            SortArg::CustomerName => SortBy::CustomerName,
        }
    }
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

struct Ctx {
    api: Arc<dyn BookingApi>,
    notifier: Arc<dyn Notifier>,
    color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()
        .context("failed to read configuration")?
        .with_overrides(cli.api_url.clone(), cli.token.clone());
    let api = HttpBookingApi::new(&config).context("failed to set up booking API client")?;
    tracing::debug!(api_url = api.base_url(), "booking api configured");

    let color = !cli.no_color && std::io::stdout().is_terminal();
    let notifier: Arc<dyn Notifier> = if cli.quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(TerminalNotifier::new(color))
    };
    let ctx = Ctx {
        api: Arc::new(api),
        notifier,
        color,
    };

    let ok = match cli.command {
        Command::Dashboard => dashboard(&ctx).await,
        Command::List(args) => list(&ctx, args).await,
        Command::Show { id } => show(&ctx, BookingId::new(id)).await,
        Command::Create(fields) => create(&ctx, fields).await,
        Command::Edit { id, fields } => edit(&ctx, BookingId::new(id), fields).await,
        Command::Cancel { id, yes } => {
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &StdinConfirm };
            cancel(&ctx, BookingId::new(id), confirm).await
        }
        Command::Menu { active } => {
            let route = match active {
                Section::Dashboard => Route::Dashboard,
                Section::Bookings => Route::Bookings,
            };
            print!("{}", render::menu(&shell::menu(&route)));
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn dashboard(ctx: &Ctx) -> bool {
    let mut dashboard = DashboardController::new(ctx.api.clone(), ctx.notifier.clone());
    match dashboard.load().await {
        DashboardState::Loaded(tiles) => {
            print!("{}", render::dashboard(tiles, ctx.color));
            true
        }
        _ => false,
    }
}

fn list_query(args: ListArgs) -> ListQuery {
    let mut query = ListQuery::default();
    let changes = [
        args.search.map(QueryChange::Search),
        args.status.map(|s| QueryChange::Status(Some(s))),
        args.from.map(|d| QueryChange::FromDate(Some(d))),
        args.to.map(|d| QueryChange::ToDate(Some(d))),
        args.sort_by.map(|s| QueryChange::SortBy(s.into())),
        args.order.map(|o| QueryChange::SortOrder(o.into())),
        args.per_page.map(QueryChange::PerPage),
        // last, so a filter change does not reset it
        args.page.map(QueryChange::Page),
    ];
    for change in changes.into_iter().flatten() {
        query.apply(change);
    }
    query
}

async fn list(ctx: &Ctx, args: ListArgs) -> bool {
    let controller =
        BookingListController::with_query(ctx.api.clone(), ctx.notifier.clone(), list_query(args));
    let loaded = controller.load().await;
    print_list(&controller);
    loaded
}

fn print_list(controller: &BookingListController) {
    let state = controller.snapshot();
    print!("{}", render::bookings_table(state.phase, &controller.rows()));
    if let Some(pages) = controller.pagination() {
        print!("{}", render::pagination(&pages));
    }
}

async fn show(ctx: &Ctx, id: BookingId) -> bool {
    match ctx.api.get(&id).await {
        Ok(booking) => {
            print!("{}", render::booking_detail(&booking));
            true
        }
        Err(e) => {
            ctx.notifier
                .error(e.server_message().unwrap_or("Failed to load booking"));
            false
        }
    }
}

fn apply_fields(form: &BookingFormController, fields: FormArgs) {
    if let Some(name) = fields.name {
        form.set(BookingField::CustomerName, name);
    }
    if let Some(email) = fields.email {
        form.set(BookingField::Email, email);
    }
    if let Some(date) = fields.date {
        // unparseable input is kept verbatim so the validator reports it
        let value = parse_user_date(&date).map(format_wire_date).unwrap_or(date);
        form.set(BookingField::BookingDate, value);
    }
    if let Some(status) = fields.status {
        form.set(BookingField::Status, status);
    }
}

async fn submit(form: &BookingFormController) -> bool {
    match form.submit().await {
        SubmitOutcome::Saved { booking, navigate } => {
            print!("{}", render::booking_detail(&booking));
            tracing::debug!(route = %navigate, "navigating after save");
            true
        }
        SubmitOutcome::Invalid | SubmitOutcome::Rejected => {
            eprint!("{}", render::field_errors(&form.snapshot().errors));
            false
        }
        SubmitOutcome::Failed(_) | SubmitOutcome::Busy | SubmitOutcome::NotReady => false,
    }
}

async fn create(ctx: &Ctx, fields: FormArgs) -> bool {
    let form = BookingFormController::create(ctx.api.clone(), ctx.notifier.clone());
    apply_fields(&form, fields);
    submit(&form).await
}

async fn edit(ctx: &Ctx, id: BookingId, fields: FormArgs) -> bool {
    let form = BookingFormController::edit(ctx.api.clone(), ctx.notifier.clone(), id);
    if !form.load().await {
        if let FormPhase::LoadFailed(reason) = form.snapshot().phase {
            tracing::debug!(%reason, "edit aborted");
        }
        return false;
    }
    apply_fields(&form, fields);
    submit(&form).await
}

async fn cancel(ctx: &Ctx, id: BookingId, confirm: &dyn Confirm) -> bool {
    let controller = BookingListController::new(ctx.api.clone(), ctx.notifier.clone());
    match controller.cancel(&id, confirm).await {
        CancelOutcome::Cancelled { .. } => {
            print_list(&controller);
            true
        }
        CancelOutcome::Declined => {
            eprintln!("Booking {id} left unchanged");
            true
        }
        CancelOutcome::Failed { .. } | CancelOutcome::AlreadyCancelling => false,
    }
}
