use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use hireflow::api::ApiRequest;
use hireflow::auth::{self, AuthError, Credentials, Registration};
use hireflow::documents::DocumentChoice;
use hireflow::router::{History, NavAction, Navigator, Resolution, RouteTable, Router};
use hireflow::services::applications::{self, ReviewStatus};
use hireflow::services::{admin, interviews, job_offers};
use hireflow::session::{FileStorage, SessionRecord};
use hireflow::{ApiClient, ApiError, ClientConfig, Role, SessionStore};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not logged in; run `hireflow login` first")]
    NotLoggedIn,
    #[error("`{command}` is only available to {expected} users")]
    WrongRole { command: &'static str, expected: Role },
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "hireflow", about = "Job-application platform client")]
struct Cli {
    /// API base; a relative value is joined onto `--origin`.
    #[arg(long, env = "HIREFLOW_API_BASE_URL")]
    api_base_url: Option<String>,

    #[arg(long, env = "HIREFLOW_ORIGIN")]
    origin: Option<String>,

    /// Where the session is persisted between runs.
    #[arg(long, env = "HIREFLOW_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Logout,
    Whoami,
    Register(RegisterArgs),
    /// Show what the router does with a path for the current session.
    Route {
        path: String,
    },
    /// Show the navigation menu for the current session.
    Nav {
        #[arg(long, default_value = "/")]
        path: String,
    },
    Offers {
        #[arg(long)]
        keyword: Option<String>,
    },
    Apply(ApplyArgs),
    Applications,
    Interviews,
    Review {
        application_id: i64,
        status: ReviewStatus,
    },
    Evaluate {
        interview_id: i64,
        comment: String,
    },
    Users {
        role: Role,
    },
    /// Raw authenticated call against the API base.
    Api(ApiArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    email_or_username: String,
    #[arg(long, env = "HIREFLOW_PASSWORD", hide_env_values = true)]
    password: String,
    /// CANDIDATE, HR, PM or ADMIN.
    #[arg(long, default_value = "CANDIDATE")]
    role: Role,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "HIREFLOW_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    firstname: String,
    #[arg(long)]
    lastname: String,
    #[arg(long)]
    phone: Option<i64>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    job_offer_id: i64,
    /// Resume file; the profile's resume is used when omitted.
    #[arg(long)]
    resume: Option<PathBuf>,
    #[arg(long)]
    cover_letter: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ApiArgs {
    method: String,
    endpoint: String,
    #[arg(long)]
    data: Option<String>,
}

struct Shell {
    client: ApiClient,
    session: Arc<SessionStore>,
    history: Arc<History>,
    router: Router,
}

impl Shell {
    fn open(cli: &Cli) -> Result<Self, CliError> {
        let state_dir = cli.state_dir.clone().unwrap_or_else(ClientConfig::default_state_dir);
        let config = ClientConfig::new(cli.api_base_url.as_deref(), cli.origin.as_deref(), state_dir);
        let storage = Arc::new(FileStorage::new(config.state_dir.clone()));
        let session = Arc::new(SessionStore::new(storage));
        session.hydrate();
        let history = Arc::new(History::new());
        let client = ApiClient::new(config, session.clone(), history.clone())?;
        let router = Router::new(RouteTable::application(), session.clone(), history.clone());
        Ok(Self { client, session, history, router })
    }

    fn user(&self) -> Result<SessionRecord, CliError> {
        self.session.current_user().ok_or(CliError::NotLoggedIn)
    }

    fn user_with_role(&self, command: &'static str, expected: Role) -> Result<SessionRecord, CliError> {
        let user = self.user()?;
        if user.role != expected {
            return Err(CliError::WrongRole { command, expected });
        }
        Ok(user)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let shell = Shell::open(&cli)?;

    let result = run(&shell, cli.command).await;
    if matches!(result, Err(CliError::Api(ApiError::Unauthorized))) {
        tracing::warn!(redirect = %shell.history.current_path(), "session expired; log in again");
    }
    result
}

async fn run(shell: &Shell, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login(args) => run_login(shell, args).await,
        Command::Logout => {
            auth::logout(&shell.client);
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            match shell.session.current_user() {
                Some(user) => print_json(&serde_json::to_value(user)?)?,
                None => println!("anonymous"),
            }
            Ok(())
        }
        Command::Register(args) => run_register(shell, args).await,
        Command::Route { path } => {
            print_resolution(&path, &shell.router.resolve(&path));
            Ok(())
        }
        Command::Nav { path } => {
            shell.history.navigate(&path);
            print_menu(shell);
            Ok(())
        }
        Command::Offers { keyword } => run_offers(shell, keyword).await,
        Command::Apply(args) => run_apply(shell, args).await,
        Command::Applications => {
            let user = shell.user_with_role("applications", Role::Candidate)?;
            let list = applications::for_candidate(&shell.client, user.id).await?;
            let rows = list
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "id": a.id,
                        "status": a.status,
                        "score": a.score,
                        "jobOffer": a.job_offer.as_ref().map(|o| o.title.as_str()),
                    })
                })
                .collect();
            print_json(&Value::Array(rows))
        }
        Command::Interviews => run_interviews(shell).await,
        Command::Review { application_id, status } => {
            shell.user_with_role("review", Role::Hr)?;
            applications::review(&shell.client, application_id, status).await?;
            println!("application {application_id} marked {status}");
            Ok(())
        }
        Command::Evaluate { interview_id, comment } => {
            shell.user_with_role("evaluate", Role::Pm)?;
            let reply = interviews::evaluate(&shell.client, interview_id, &comment).await?;
            println!("{reply}");
            Ok(())
        }
        Command::Users { role } => {
            shell.user_with_role("users", Role::Admin)?;
            let users = admin::list_users(&shell.client, role).await?;
            print_json(&serde_json::to_value(users)?)
        }
        Command::Api(args) => run_api(shell, args).await,
    }
}

async fn run_login(shell: &Shell, args: LoginArgs) -> Result<(), CliError> {
    let credentials = Credentials {
        email_or_username: args.email_or_username,
        password: args.password,
        role: args.role,
    };
    let user = auth::login(&shell.client, &credentials).await?;
    let landing = user.role.landing_route();
    shell.router.navigate(landing);
    println!("logged in as {} ({}); landing page {landing}", user.display_name(), user.role);
    Ok(())
}

async fn run_register(shell: &Shell, args: RegisterArgs) -> Result<(), CliError> {
    let registration = Registration {
        username: args.username,
        email: args.email,
        password: args.password,
        firstname: args.firstname,
        lastname: args.lastname,
        phone: args.phone,
    };
    let created = auth::register_candidate(&shell.client, &registration).await?;
    print_json(&created)
}

async fn run_offers(shell: &Shell, keyword: Option<String>) -> Result<(), CliError> {
    let offers = if shell.session.has_role(Role::Candidate) {
        job_offers::search(&shell.client, keyword.as_deref()).await?
    } else if shell.session.has_role(Role::Hr) {
        job_offers::list_managed(&shell.client).await?
    } else {
        job_offers::list_public(&shell.client).await?
    };
    print_json(&serde_json::to_value(offers)?)
}

async fn run_apply(shell: &Shell, args: ApplyArgs) -> Result<(), CliError> {
    let user = shell.user_with_role("apply", Role::Candidate)?;
    let choice = |path: Option<PathBuf>| path.map_or(DocumentChoice::Default, DocumentChoice::Upload);
    let application = applications::apply(
        &shell.client,
        user.id,
        args.job_offer_id,
        &choice(args.resume),
        &choice(args.cover_letter),
    )
    .await?;
    println!("application {} submitted", application.id);
    Ok(())
}

async fn run_interviews(shell: &Shell) -> Result<(), CliError> {
    let user = shell.user()?;
    let list = match user.role {
        Role::Candidate => interviews::for_candidate(&shell.client, user.id).await?,
        Role::Pm => interviews::for_project_manager(&shell.client, user.id).await?,
        Role::Hr | Role::Admin => interviews::list(&shell.client).await?,
    };
    for interview in list {
        println!(
            "#{} {} {} {}",
            interview.id,
            interview.interview_date.as_deref().unwrap_or("-"),
            interview.status.as_deref().unwrap_or("-"),
            interview.meeting_link.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn run_api(shell: &Shell, args: ApiArgs) -> Result<(), CliError> {
    let method = match args.method.to_ascii_uppercase().as_str() {
        "GET" => reqwest::Method::GET,
        "POST" => reqwest::Method::POST,
        "PUT" => reqwest::Method::PUT,
        "DELETE" => reqwest::Method::DELETE,
        _ => return Err(CliError::UnsupportedMethod(args.method)),
    };
    let mut request = ApiRequest::new(method, args.endpoint).bearer(shell.session.token().as_deref());
    if let Some(data) = args.data {
        let body = serde_json::from_str::<Value>(&data)?;
        request = request.json(&body)?;
    }
    let json: Value = shell.client.send(request).await?;
    print_json(&json)
}

fn print_resolution(path: &str, resolution: &Resolution) {
    match resolution {
        Resolution::Loading => println!("{path}: loading"),
        Resolution::Redirect(to) => println!("{path}: redirect to {to}"),
        Resolution::Render { page, params } if params.is_empty() => println!("{path}: render {page}"),
        Resolution::Render { page, params } => println!("{path}: render {page} {params:?}"),
        Resolution::NotFound => println!("{path}: not found"),
    }
}

fn print_menu(shell: &Shell) {
    let menu = shell.router.menu();
    for item in &menu.items {
        match item.action {
            NavAction::Navigate => {
                let marker = if item.active { "*" } else { " " };
                println!("{marker} {:<18} {}", item.label, item.target);
            }
            NavAction::Logout => {
                let user = menu.user_label.as_deref().unwrap_or_default();
                println!("  {:<18} ({user})", item.label);
            }
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
