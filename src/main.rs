use nexora_session::{
    auth::{AuthError, DemoVerifier},
    config,
    gate::RouteTable,
    models::{AppConfig, Identity, RoutePaths},
    session::{ActivityTracker, InactivityMonitor, InteractionKind, SessionConfig, SessionStore},
    storage::MemoryBrowserStorage,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "commands: login <email> <password> <role> | \
    register <name> <email> <password> <role> | logout | visit <path> | \
    touch <pointer|key|scroll|move> | whoami | state | quit";

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays one JSON document per line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexora_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let app_config = match config::load_config_with_fallback() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let store = SessionStore::new(
        Arc::new(DemoVerifier),
        Arc::new(MemoryBrowserStorage::new()),
        SessionConfig::from(&app_config.session),
    );
    let tracker = ActivityTracker::new();
    let monitor = InactivityMonitor::attach(store.clone(), tracker.clone());
    let shell = Shell {
        routes: RouteTable::portal(app_config.routes.clone()),
        app_config,
        tracker,
    };

    tracing::info!(
        "Nexora session shell ready (inactivity window {}s)",
        shell.app_config.session.timeout_secs
    );
    eprintln!("{}", USAGE);

    store.scope(shell.run(&monitor)).await;

    monitor.detach();
    tracing::info!("Shell closed");
}

struct Shell {
    app_config: Arc<AppConfig>,
    routes: RouteTable,
    tracker: ActivityTracker,
}

impl Shell {
    async fn run(&self, monitor: &nexora_session::session::MonitorHandle) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            };

            let args: Vec<&str> = line.split_whitespace().collect();
            let Some((&command, rest)) = args.split_first() else {
                continue;
            };

            if command == "quit" || command == "exit" {
                break;
            }

            let output = match command {
                "state" => json!({ "monitor": format!("{:?}", monitor.state()) }),
                _ => self.dispatch(command, rest).await,
            };
            println!("{}", output);
        }
    }

    async fn dispatch(&self, command: &str, args: &[&str]) -> Value {
        let store = nexora_session::session::scope::current();
        let paths: &RoutePaths = &self.app_config.routes;

        match (command, args) {
            ("login", [email, password, role]) => {
                signed_in(store.login(email, password, role).await, paths)
            }
            ("register", [name, email, password, role]) => {
                signed_in(store.register(name, email, password, role).await, paths)
            }
            ("logout", []) => json!({ "signed_out": store.logout().await }),
            ("visit", [path]) => {
                let identity = store.current();
                match self.routes.resolve(identity.as_ref(), path) {
                    Some(decision) => json!(decision),
                    None => json!({ "error": format!("no such view: {}", path) }),
                }
            }
            ("touch", [kind]) => match parse_interaction(kind) {
                Some(kind) => {
                    self.tracker.record(kind);
                    json!({ "recorded": kind })
                }
                None => json!({ "error": format!("unknown interaction: {}", kind) }),
            },
            ("whoami", []) => match store.current() {
                Some(identity) => identity_json(&identity),
                None => json!({ "identity": null }),
            },
            _ => json!({ "error": USAGE }),
        }
    }
}

fn signed_in(result: Result<Identity, AuthError>, paths: &RoutePaths) -> Value {
    match result {
        Ok(identity) => {
            let mut output = identity_json(&identity);
            output["navigate"] = json!({ "to": paths.home_for(identity.role), "replace": true });
            output
        }
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn identity_json(identity: &Identity) -> Value {
    json!({
        "identity": identity,
        "display_name_html": identity.display_name_html(),
    })
}

fn parse_interaction(kind: &str) -> Option<InteractionKind> {
    match kind {
        "pointer" | "click" => Some(InteractionKind::PointerDown),
        "key" => Some(InteractionKind::KeyDown),
        "scroll" => Some(InteractionKind::Scroll),
        "move" => Some(InteractionKind::PointerMove),
        _ => None,
    }
}
