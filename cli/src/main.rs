use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use taskdesk::net::http::SessionEvent;
use taskdesk::net::types::{
    AreaCreate, AreaUpdate, ChangePasswordRequest, LoginRequest, ProjectCreate, ProjectUpdate, ProjectWithStats,
    RegisterRequest, Task, TaskCreate, TaskPriority, TaskStatus, TaskUpdate, UserRole, UserUpdate, timestamp,
};
use taskdesk::services::{area, project, task, telegram, user};
use taskdesk::views::deadline::DeadlineUrgency;
use taskdesk::views::projects::{AreaFilter, completion_percent, filter_by_area, project_stats};
use taskdesk::views::tasks::{DisplayMode, TaskDisplay, TaskViewFilters};
use taskdesk::views::users::search_users;
use taskdesk::{ApiError, ClientConfig, ErrorCode, TaskDeskClient};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;


const SESSION_EXPIRED_NOTICE: &str = "session expired, log in again with `taskdesk login`";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("the backend ended the session")]
    SessionExpired,
    #[error("invalid deadline '{0}': expected YYYY-MM-DD or an ISO-8601 timestamp")]
    InvalidDeadline(String),
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("interrupted before the load finished")]
    Interrupted,
    #[error("output encoding failed: {0}")]
    Output(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.error_code(),
            Self::SessionExpired => "E_SESSION_EXPIRED",
            Self::InvalidDeadline(_) => "E_INVALID_DEADLINE",
            Self::EmptyUpdate => "E_EMPTY_UPDATE",
            Self::Interrupted => "E_INTERRUPTED",
            Self::Output(_) => "E_OUTPUT",
        }
    }
}

impl CliError {
    fn requires_login(&self) -> bool {
        match self {
            Self::SessionExpired => true,
            Self::Api(e) => e.requires_login(),
            _ => false,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    fn exit_code(&self) -> u8 {
        if self.requires_login() { 2 } else { 1 }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "taskdesk", about = "TaskDesk task and project management client")]
struct Cli {
    /// Backend origin, without `/api/v1`.
    #[arg(long, env = "TASKDESK_API_URL")]
    api_url: Option<String>,

    /// Directory holding the persisted session.
    #[arg(long, env = "TASKDESK_SESSION_DIR")]
    session_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long, env = "TASKDESK_EMAIL")]
        email: String,
        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    /// Show the logged-in user.
    Whoami {
        /// Re-fetch from the backend instead of using the cached copy.
        #[arg(long)]
        refresh: bool,
    },
    Dashboard,
    Tasks(TasksCommand),
    Projects(ProjectsCommand),
    Areas(AreasCommand),
    Users(UsersCommand),
    Profile(ProfileCommand),
    Telegram(TelegramCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long = "name")]
    full_name: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    role: Option<UserRole>,
    #[arg(long)]
    area_id: Option<String>,
}

#[derive(Args, Debug)]
struct TasksCommand {
    #[command(subcommand)]
    command: TaskSubcommand,
}

#[derive(Subcommand, Debug)]
enum TaskSubcommand {
    List(TaskListArgs),
    Show {
        task_id: String,
    },
    Create(TaskCreateArgs),
    Update(TaskUpdateArgs),
    /// Set any status directly.
    Status {
        task_id: String,
        status: TaskStatus,
    },
    Complete {
        task_id: String,
    },
    Archive {
        task_id: String,
    },
    Unarchive {
        task_id: String,
    },
    Delete {
        task_id: String,
    },
}

#[derive(Args, Debug, Default)]
struct TaskListArgs {
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    /// Case-insensitive match on title and description, applied locally.
    #[arg(long)]
    search: Option<String>,
    /// Group by status instead of a flat list.
    #[arg(long)]
    kanban: bool,
}

#[derive(Args, Debug)]
struct TaskCreateArgs {
    #[arg(long)]
    project: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    #[arg(long)]
    responsible: Option<String>,
    #[arg(long)]
    deadline: Option<String>,
    #[arg(long)]
    reminder_hours: Option<u32>,
}

#[derive(Args, Debug)]
struct TaskUpdateArgs {
    task_id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    #[arg(long)]
    responsible: Option<String>,
    #[arg(long)]
    deadline: Option<String>,
    #[arg(long)]
    reminder_hours: Option<u32>,
}

#[derive(Args, Debug)]
struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectSubcommand {
    List {
        #[arg(long)]
        archived: bool,
        /// `all`, `none` (no area), or an area id.
        #[arg(long, default_value = "all")]
        area: String,
    },
    Show {
        project_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        area_id: Option<String>,
    },
    Update {
        project_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        area_id: Option<String>,
    },
    Archive {
        project_id: String,
    },
    Unarchive {
        project_id: String,
    },
    Delete {
        project_id: String,
    },
    /// Task counts computed from the project's tasks.
    Stats {
        project_id: String,
    },
}

#[derive(Args, Debug)]
struct AreasCommand {
    #[command(subcommand)]
    command: AreaSubcommand,
}

#[derive(Subcommand, Debug)]
enum AreaSubcommand {
    List {
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        stats: bool,
    },
    Show {
        area_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    Update {
        area_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        area_id: String,
    },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    List {
        /// Match on name or email, applied locally.
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        user_id: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Update {
        #[arg(long = "name")]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        area_id: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long = "new")]
        new_password: String,
    },
}

#[derive(Args, Debug)]
struct TelegramCommand {
    #[command(subcommand)]
    command: TelegramSubcommand,
}

#[derive(Subcommand, Debug)]
enum TelegramSubcommand {
    /// Generate a one-time link code for the bot.
    Code,
    Status,
    Unlink,
}

// =============================================================================
// ENTRY
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if e.requires_login() {
                eprintln!("{SESSION_EXPIRED_NOTICE}");
            } else {
                eprintln!("error[{}]: {}", e.error_code(), e.user_message());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.api_url, cli.session_dir)?;
    let client = TaskDeskClient::from_config(config)?;
    let mut events = client.subscribe();

    let result = dispatch(&client, cli.command).await;

    // Best-effort loads swallow their errors, so a 401 can end the session
    // while the command itself reports success.
    if matches!(events.try_recv(), Ok(SessionEvent::Unauthorized)) {
        return Err(CliError::SessionExpired);
    }
    result
}

fn load_config(api_url: Option<String>, session_dir: Option<String>) -> Result<ClientConfig, CliError> {
    let config = ClientConfig::from_vars(|key| match key {
        "TASKDESK_API_URL" if api_url.is_some() => api_url.clone(),
        "TASKDESK_SESSION_DIR" if session_dir.is_some() => session_dir.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

async fn dispatch(client: &TaskDeskClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            client.auth().login(&LoginRequest { email, password }).await?;
            print_json(&client.auth().user())
        }
        Command::Register(args) => run_register(client, args).await,
        Command::Logout => {
            client.auth().logout();
            print_json(&serde_json::json!({ "logged_out": true }))
        }
        Command::Whoami { refresh } => {
            client.require_session()?;
            if refresh {
                print_json(&client.auth().refresh_user().await?)
            } else {
                print_json(&client.auth().user())
            }
        }
        Command::Dashboard => {
            client.require_session()?;
            let summary = client.dashboard(&cancel_on_ctrl_c()).await?.ok_or(CliError::Interrupted)?;
            print_json(&summary)
        }
        Command::Tasks(cmd) => {
            client.require_session()?;
            run_tasks(client, cmd.command).await
        }
        Command::Projects(cmd) => {
            client.require_session()?;
            run_projects(client, cmd.command).await
        }
        Command::Areas(cmd) => {
            client.require_session()?;
            run_areas(client, cmd.command).await
        }
        Command::Users(cmd) => {
            client.require_session()?;
            run_users(client, cmd.command).await
        }
        Command::Profile(cmd) => {
            client.require_session()?;
            run_profile(client, cmd.command).await
        }
        Command::Telegram(cmd) => {
            client.require_session()?;
            run_telegram(client, cmd.command).await
        }
    }
}

async fn run_register(client: &TaskDeskClient, args: RegisterArgs) -> Result<(), CliError> {
    let request = RegisterRequest {
        email: args.email,
        password: args.password,
        full_name: args.full_name,
        phone_number: args.phone,
        role: args.role,
        area_id: args.area_id,
    };
    client.auth().register(&request, args.confirm_password.as_deref()).await?;
    print_json(&client.auth().user())
}

// =============================================================================
// TASKS
// =============================================================================

/// A task as printed, with its deadline urgency.
#[derive(Serialize)]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a Task,
    urgency: Option<DeadlineUrgency>,
}

fn task_rows(tasks: &[Task], now: OffsetDateTime) -> Vec<TaskRow<'_>> {
    tasks.iter().map(|task| TaskRow { task, urgency: DeadlineUrgency::for_task(task, now) }).collect()
}

async fn run_tasks(client: &TaskDeskClient, command: TaskSubcommand) -> Result<(), CliError> {
    let http = client.http();
    match command {
        TaskSubcommand::List(args) => {
            let filters = TaskViewFilters { project_id: args.project, status: args.status, priority: args.priority };
            let mut view = client.tasks_view(filters, &cancel_on_ctrl_c()).await?.ok_or(CliError::Interrupted)?;
            view.set_search(args.search.unwrap_or_default());
            view.set_mode(if args.kanban { DisplayMode::Kanban } else { DisplayMode::List });
            match view.display() {
                TaskDisplay::List(tasks) => print_json(&task_rows(&tasks, OffsetDateTime::now_utc())),
                board @ TaskDisplay::Kanban(_) => print_json(&board),
            }
        }
        TaskSubcommand::Show { task_id } => {
            let task = task::get_task(http, &task_id).await?;
            print_json(&TaskRow { urgency: DeadlineUrgency::for_task(&task, OffsetDateTime::now_utc()), task: &task })
        }
        TaskSubcommand::Create(args) => {
            let request = TaskCreate {
                description: args.description,
                status: args.status,
                priority: args.priority,
                responsible_id: args.responsible,
                deadline: args.deadline.as_deref().map(parse_deadline).transpose()?,
                reminder_hours_before: args.reminder_hours,
                ..TaskCreate::new(args.project, args.title)
            };
            print_json(&task::create_task(http, &request).await?)
        }
        TaskSubcommand::Update(args) => {
            let update = TaskUpdate {
                title: args.title,
                description: args.description,
                status: args.status,
                priority: args.priority,
                responsible_id: args.responsible,
                deadline: args.deadline.as_deref().map(parse_deadline).transpose()?,
                reminder_hours_before: args.reminder_hours,
            };
            if update == TaskUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&task::update_task(http, &args.task_id, &update).await?)
        }
        TaskSubcommand::Status { task_id, status } => {
            print_json(&task::update_task_status(http, &task_id, status).await?)
        }
        TaskSubcommand::Complete { task_id } => print_json(&task::complete_task(http, &task_id).await?),
        TaskSubcommand::Archive { task_id } => print_json(&task::archive_task(http, &task_id).await?),
        TaskSubcommand::Unarchive { task_id } => print_json(&task::unarchive_task(http, &task_id).await?),
        TaskSubcommand::Delete { task_id } => {
            task::delete_task(http, &task_id).await?;
            print_json(&serde_json::json!({ "deleted": task_id }))
        }
    }
}

/// Accept a bare date (end of that day, UTC) or any timestamp the backend
/// itself would send.
fn parse_deadline(raw: &str) -> Result<OffsetDateTime, CliError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.len() == 10 { format!("{trimmed}T23:59:59") } else { trimmed.to_owned() };
    timestamp::parse(&candidate).map_err(|_| CliError::InvalidDeadline(raw.to_owned()))
}

// =============================================================================
// PROJECTS
// =============================================================================

#[derive(Serialize)]
struct ProjectRow {
    #[serde(flatten)]
    project: ProjectWithStats,
    area_name: Option<String>,
}

fn parse_area_filter(raw: &str) -> AreaFilter {
    match raw.trim() {
        "" | "all" => AreaFilter::All,
        "none" => AreaFilter::Unassigned,
        id => AreaFilter::Area(id.to_owned()),
    }
}

async fn run_projects(client: &TaskDeskClient, command: ProjectSubcommand) -> Result<(), CliError> {
    let http = client.http();
    match command {
        ProjectSubcommand::List { archived, area } => {
            let (projects, areas) =
                tokio::join!(project::list_projects_with_stats(http, archived), area::list_areas_or_empty(http, None));
            let rows: Vec<ProjectRow> = filter_by_area(&projects?, &parse_area_filter(&area))
                .into_iter()
                .map(|project| {
                    let area_name = project
                        .project
                        .area_id
                        .as_deref()
                        .and_then(|id| areas.iter().find(|a| a.id == id))
                        .map(|a| a.name.clone());
                    ProjectRow { project, area_name }
                })
                .collect();
            print_json(&rows)
        }
        ProjectSubcommand::Show { project_id } => print_json(&project::get_project(http, &project_id).await?),
        ProjectSubcommand::Create { name, description, emoji, area_id } => {
            let request = ProjectCreate { name, description, emoji_icon: emoji, area_id };
            print_json(&project::create_project(http, &request).await?)
        }
        ProjectSubcommand::Update { project_id, name, description, emoji, area_id } => {
            let update = ProjectUpdate { name, description, emoji_icon: emoji, area_id, is_archived: None };
            if update == ProjectUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&project::update_project(http, &project_id, &update).await?)
        }
        ProjectSubcommand::Archive { project_id } => print_json(&project::archive_project(http, &project_id).await?),
        ProjectSubcommand::Unarchive { project_id } => {
            print_json(&project::unarchive_project(http, &project_id).await?)
        }
        ProjectSubcommand::Delete { project_id } => {
            project::delete_project(http, &project_id).await?;
            print_json(&serde_json::json!({ "deleted": project_id }))
        }
        ProjectSubcommand::Stats { project_id } => {
            let filters = task::TaskFilters { project_id: Some(project_id.clone()), ..task::TaskFilters::default() };
            let (found, tasks) = tokio::try_join!(project::get_project(http, &project_id), task::list_tasks(http, &filters))?;
            let stats = project_stats(&found.id, &tasks, OffsetDateTime::now_utc());
            print_json(&serde_json::json!({
                "project": ProjectWithStats { project: found, stats },
                "completion_percent": completion_percent(&stats),
            }))
        }
    }
}

// =============================================================================
// AREAS, USERS, PROFILE, TELEGRAM
// =============================================================================

async fn run_areas(client: &TaskDeskClient, command: AreaSubcommand) -> Result<(), CliError> {
    let http = client.http();
    match command {
        AreaSubcommand::List { active, stats: true } => print_json(&area::list_areas_with_stats(http, active).await?),
        AreaSubcommand::List { active, stats: false } => print_json(&area::list_areas(http, active).await?),
        AreaSubcommand::Show { area_id } => print_json(&area::get_area(http, &area_id).await?),
        AreaSubcommand::Create { name, description, color, icon } => {
            let request = AreaCreate { name, description, color, icon, is_active: None };
            print_json(&area::create_area(http, &request).await?)
        }
        AreaSubcommand::Update { area_id, name, description, color, icon, active } => {
            let update = AreaUpdate { name, description, color, icon, is_active: active };
            if update == AreaUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&area::update_area(http, &area_id, &update).await?)
        }
        AreaSubcommand::Delete { area_id } => {
            area::delete_area(http, &area_id).await?;
            print_json(&serde_json::json!({ "deleted": area_id }))
        }
    }
}

async fn run_users(client: &TaskDeskClient, command: UserSubcommand) -> Result<(), CliError> {
    let http = client.http();
    match command {
        UserSubcommand::List { search } => {
            let users = user::list_users(http).await?;
            print_json(&search_users(&users, search.as_deref().unwrap_or_default()))
        }
        UserSubcommand::Show { user_id } => print_json(&user::get_user(http, &user_id).await?),
    }
}

async fn run_profile(client: &TaskDeskClient, command: ProfileSubcommand) -> Result<(), CliError> {
    match command {
        ProfileSubcommand::Update { full_name, phone, area_id } => {
            let update = UserUpdate { full_name, phone_number: phone, area_id, ..UserUpdate::default() };
            if update == UserUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&client.auth().update_profile(&update).await?)
        }
        ProfileSubcommand::Password { current, new_password } => {
            let request = ChangePasswordRequest { current_password: current, new_password };
            client.auth().change_password(&request).await?;
            print_json(&serde_json::json!({ "password_changed": true }))
        }
    }
}

async fn run_telegram(client: &TaskDeskClient, command: TelegramSubcommand) -> Result<(), CliError> {
    let http = client.http();
    match command {
        TelegramSubcommand::Code => print_json(&telegram::generate_link_code(http).await?),
        TelegramSubcommand::Status => print_json(&telegram::link_status(http).await?),
        TelegramSubcommand::Unlink => {
            telegram::unlink(http).await?;
            print_json(&serde_json::json!({ "unlinked": true }))
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Token cancelled on Ctrl-C so an interrupted load discards its results.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
