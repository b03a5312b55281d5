use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::{debug, info, warn};

use salvo::prelude::*;
use serde::{Deserialize, Serialize};

use chia_spend_analyzer::block::{analyze_block, CoinInfo};
use chia_spend_analyzer::common::types::{CoinsetSpendBundle, Error, Program, SpendBundle};
use chia_spend_analyzer::config::AnalyzerConfig;
use chia_spend_analyzer::decompile::{simplify_program, SimplifiedPuzzle};
use chia_spend_analyzer::runner::ClvmRunner;
use chia_spend_analyzer::signing::{combine_spend_bundles, init_signing};
use chia_spend_analyzer::templates::TemplateRegistry;

struct AppState {
    registry: Arc<TemplateRegistry>,
    runner: ClvmRunner,
    request_timeout: Duration,
}

static STATE: OnceLock<AppState> = OnceLock::new();

fn state() -> Result<&'static AppState, Error> {
    STATE
        .get()
        .ok_or_else(|| Error::StrErr("server state not initialized".to_string()))
}

#[derive(Deserialize)]
struct ParseBlockRequest {
    generator: String,
    #[serde(default)]
    ref_list: Vec<String>,
}

#[derive(Deserialize)]
struct ParsePuzzleRequest {
    puzzle: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Run analyzer work off the async threads, giving up after the configured
/// timeout.
async fn run_blocking<T, F>(what: &str, f: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&'static AppState) -> Result<T, Error> + Send + 'static,
{
    let app = state()?;
    let task = tokio::task::spawn_blocking(move || f(app));
    match tokio::time::timeout(app.request_timeout, task).await {
        Err(_) => Err(Error::Timeout(what.to_string())),
        Ok(Err(e)) => Err(Error::StrErr(format!("{what} failed: {e:?}"))),
        Ok(Ok(result)) => result,
    }
}

fn respond<T: Serialize + Send>(res: &mut Response, what: &str, result: Result<T, Error>) {
    match result {
        Ok(body) => res.render(Json(body)),
        Err(e) => {
            warn!("{what}: {e}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse {
                success: false,
                error: e.to_string(),
            }));
        }
    }
}

async fn do_parse_block(req: &mut Request) -> Result<Vec<CoinInfo>, Error> {
    let request: ParseBlockRequest = req
        .parse_json()
        .await
        .map_err(|e| Error::StrErr(format!("bad request: {e}")))?;
    run_blocking("parse_block", move |app| {
        analyze_block(
            &app.runner,
            &app.registry,
            &request.generator,
            &request.ref_list,
        )
    })
    .await
}

async fn do_parse_puzzle(req: &mut Request) -> Result<SimplifiedPuzzle, Error> {
    let request: ParsePuzzleRequest = req
        .parse_json()
        .await
        .map_err(|e| Error::StrErr(format!("bad request: {e}")))?;
    run_blocking("parse_puzzle", move |app| {
        let program = Program::from_hex(&request.puzzle)?;
        simplify_program(&app.registry, &program)
    })
    .await
}

async fn do_combine(req: &mut Request) -> Result<CoinsetSpendBundle, Error> {
    let request: Vec<CoinsetSpendBundle> = req
        .parse_json()
        .await
        .map_err(|e| Error::StrErr(format!("bad request: {e}")))?;
    run_blocking("combine", move |_| {
        let mut bundles = Vec::new();
        for bundle in request.iter() {
            bundles.push(SpendBundle::from_coinset(bundle)?);
        }
        combine_spend_bundles(&bundles)?.to_coinset()
    })
    .await
}

#[handler]
async fn parse_block(req: &mut Request, res: &mut Response) {
    let result = do_parse_block(req).await;
    if let Ok(coins) = &result {
        debug!("parse_block: {} coins", coins.len());
    }
    respond(res, "parse_block", result);
}

#[handler]
async fn parse_puzzle(req: &mut Request, res: &mut Response) {
    let result = do_parse_puzzle(req).await;
    respond(res, "parse_puzzle", result);
}

#[handler]
async fn combine(req: &mut Request, res: &mut Response) {
    let result = do_combine(req).await;
    respond(res, "combine", result);
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    chia_spend_analyzer::log::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("analyzer.toml"));
    let config = if config_path.exists() {
        AnalyzerConfig::load(&config_path)?
    } else {
        warn!("no config at {}, using defaults", config_path.display());
        AnalyzerConfig::default()
    };

    init_signing()?;
    let registry = if config.templates.exists() {
        TemplateRegistry::from_manifest(&config.templates)?
    } else {
        warn!(
            "no template manifest at {}, using built in templates",
            config.templates.display()
        );
        TemplateRegistry::builtin()?
    };
    info!("loaded {} templates", registry.len());

    let app = AppState {
        registry: Arc::new(registry),
        runner: ClvmRunner::new(config.max_cost),
        request_timeout: Duration::from_secs(config.request_timeout_secs),
    };
    if STATE.set(app).is_err() {
        return Err(Error::StrErr("server state already set".to_string()));
    }

    let router = Router::new()
        .push(Router::with_path("parse_block").post(parse_block))
        .push(Router::with_path("parse_puzzle").post(parse_puzzle))
        .push(Router::with_path("combine").post(combine));
    let acceptor = TcpListener::new(config.listen.clone()).bind().await;
    info!("listening on {}", config.listen);
    Server::new(acceptor).serve(router).await;
    Ok(())
}
