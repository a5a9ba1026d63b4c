// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `argonaut` — interactive terminal client for an ArgoCD deployment.
//!
//! Owns process startup, the bounded message queue, the raw-mode event
//! loop, and the dispatcher that turns reducer [`Intent`]s into
//! cancellable tasks against the typed API service. Screen rendering
//! itself is an external collaborator; this binary drives state, not
//! pixels.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use argonaut_cli::config::Config;
use argonaut_cli::message::{Message, OpResult};
use argonaut_cli::pty::ExternalProcess;
use argonaut_cli::terminal;
use argonaut_cli::{reduce, AppState, Intent, ReduceContext};

use argonaut_core::api::{RefreshMode, RollbackRequest, SyncOptions, SyncResource};
use argonaut_core::config::{default_app_config_path, default_argocd_config_path, AppConfig, ArgoCdConfig};
use argonaut_core::degrade::{Component, DegradationManager, Operation};
use argonaut_core::logger::{LogLevel, SessionLogger};
use argonaut_core::recovery::{RecoveryFn, StreamRecoveryManager};
use argonaut_core::scope;
use argonaut_core::store::{AppsStore, StoreEvent};
use argonaut_core::transport::stream::StreamOutcome;
use argonaut_core::transport::Transport;
use argonaut_core::{api, ArgoError, Scope};

/// Capacity of the single reducer-facing message queue (§5).
const MESSAGE_QUEUE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() {
    let code = run().await;
    std::process::exit(code);
}

/// Everything a spawned task needs to talk back to the event loop: the
/// current service/context (swapped out atomically on context switch,
/// §5 "read-copy-updated current server"), and the shared subsystems.
struct Shared {
    argocd_config: ArgoCdConfig,
    tls_overrides: argonaut_core::config::TlsOverrides,
    request_timeout: Duration,
    argocd_config_path: String,
    app_config_path: String,
    k9s_command: String,
    diff_formatter: String,
    sessions_dir: PathBuf,
    store: Arc<AppsStore>,
    degradation: Arc<DegradationManager>,
    recovery: Arc<StreamRecoveryManager>,
    logger: Arc<SessionLogger>,
    service: Mutex<Arc<api::ArgoApiService>>,
    server_label: Mutex<String>,
    /// Most recently loaded resource tree, keyed by the app it belongs
    /// to, so the ResourceTree view can derive its row count/highlight
    /// without threading tree data through `AppState` (§4.9, §8).
    last_tree: Mutex<Option<(String, argonaut_core::ResourceTree)>>,
    /// Cancellation token for whichever apps-watch task is currently
    /// running, so a scope-driven restart can tear down exactly that
    /// task without cancelling the rest of its generation (§4.8).
    apps_watch_cancel: Mutex<Option<CancellationToken>>,
    watch_debouncer: scope::WatchDebouncer,
    tx: mpsc::Sender<Message>,
}

impl Shared {
    fn current_service(&self) -> Arc<api::ArgoApiService> {
        Arc::clone(&self.service.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn current_server_label(&self) -> String {
        self.server_label.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_current(&self, service: api::ArgoApiService, server_label: impl Into<String>) {
        *self.service.lock().unwrap_or_else(|e| e.into_inner()) = Arc::new(service);
        *self.server_label.lock().unwrap_or_else(|e| e.into_inner()) = server_label.into();
    }

    fn set_tree(&self, app_name: String, tree: argonaut_core::ResourceTree) {
        *self.last_tree.lock().unwrap_or_else(|e| e.into_inner()) = Some((app_name, tree));
    }

    fn clear_tree(&self) {
        *self.last_tree.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// The cached tree, if it still belongs to `app_name` (a stale tree
    /// from a just-closed or just-switched app must not be shown).
    fn tree_for(&self, app_name: &str) -> Option<argonaut_core::ResourceTree> {
        let guard = self.last_tree.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().filter(|(name, _)| name == app_name).map(|(_, tree)| tree.clone())
    }

    async fn send(&self, message: Message) {
        let _ = self.tx.send(message).await;
    }

    /// Installs `new` as the running apps-watch's cancellation token,
    /// returning whatever token was previously installed (if any) so the
    /// caller can cancel the task it belonged to.
    fn replace_apps_watch_cancel(&self, new: CancellationToken) -> Option<CancellationToken> {
        self.apps_watch_cancel.lock().unwrap_or_else(|e| e.into_inner()).replace(new)
    }
}

/// Per-generation cancellation tokens (§5, §4.9 rule 1): every task
/// spawned under a generation is a child of that generation's token, so
/// [`Intent::CancelStaleTasks`] tears down exactly the tasks the reducer
/// means to abandon.
#[derive(Default)]
struct GenerationTokens {
    tokens: Mutex<HashMap<u64, CancellationToken>>,
}

impl GenerationTokens {
    fn token_for(&self, root: &CancellationToken, generation: u64) -> CancellationToken {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.entry(generation).or_insert_with(|| root.child_token()).clone()
    }

    fn cancel_below(&self, below_generation: u64) {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.retain(|generation, token| {
            if *generation < below_generation {
                token.cancel();
                false
            } else {
                true
            }
        });
    }
}

async fn run() -> i32 {
    let cli = Config::parse();
    if let Err(e) = cli.validate() {
        eprintln!("argonaut: {e}");
        return 1;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let argocd_config_path = cli.argocd_config.clone().unwrap_or_else(default_argocd_config_path);
    let app_config_path = cli.app_config.clone().unwrap_or_else(|| default_app_config_path("argonaut"));

    let argocd_config = match ArgoCdConfig::load(&argocd_config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("fatal: loading {}: {e}", argocd_config_path.display());
            return 1;
        }
    };
    let app_config = match AppConfig::load_or_default(&app_config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("fatal: loading {}: {e}", app_config_path.display());
            return 1;
        }
    };
    let request_timeout = match app_config.request_timeout_duration() {
        Ok(Some(d)) => d,
        Ok(None) => Duration::from_secs(5),
        Err(e) => {
            error!("fatal: {e}");
            return 1;
        }
    };

    let context_name = match cli.context.clone().or_else(|| argocd_config.current_context_name().map(str::to_string)) {
        Some(name) => name,
        None => {
            error!("fatal: no --context given and no current-context in the ArgoCD config");
            return 1;
        }
    };

    let tls_overrides = cli.tls_overrides();
    let context = match argocd_config.resolve(&context_name, &tls_overrides, request_timeout) {
        Ok(context) => context,
        Err(e) => {
            error!("fatal: {e}");
            return 1;
        }
    };

    let transport = match Transport::new(&context.server) {
        Ok(t) => t,
        Err(e) => {
            error!("fatal: {e}");
            return 1;
        }
    };

    let session_id = uuid::Uuid::now_v7().to_string();
    let sessions_dir = dirs::cache_dir().unwrap_or_default().join("argonaut").join("sessions");
    let logger = Arc::new(SessionLogger::new(&sessions_dir, session_id.clone()));
    logger.log(LogLevel::Info, "startup", format!("session {session_id} started against context {context_name}"));

    let (tx, mut rx) = mpsc::channel::<Message>(MESSAGE_QUEUE_CAPACITY);

    let shared = Arc::new(Shared {
        argocd_config,
        tls_overrides,
        request_timeout,
        argocd_config_path: argocd_config_path.display().to_string(),
        app_config_path: app_config_path.display().to_string(),
        k9s_command: cli.k9s_command.clone(),
        diff_formatter: cli.diff_formatter.clone(),
        sessions_dir: sessions_dir.clone(),
        store: Arc::new(AppsStore::new()),
        degradation: Arc::new(DegradationManager::new()),
        recovery: Arc::new(StreamRecoveryManager::new()),
        logger: Arc::clone(&logger),
        service: Mutex::new(Arc::new(api::ArgoApiService::new(transport, context.name.clone()))),
        server_label: Mutex::new(context.name.clone()),
        last_tree: Mutex::new(None),
        apps_watch_cancel: Mutex::new(None),
        watch_debouncer: scope::WatchDebouncer::new(),
        tx: tx.clone(),
    });

    let mut state = AppState::default();
    state.server.context_names = shared.argocd_config.context_names().iter().map(|s| s.to_string()).collect();
    let generation = state.server.switch_context(context);

    let root_cancel = CancellationToken::new();
    let generations = Arc::new(GenerationTokens::default());

    let raw_mode = match terminal::RawModeGuard::enter() {
        Ok(guard) => guard,
        Err(e) => {
            error!("fatal: entering raw mode: {e}");
            return 1;
        }
    };
    terminal::install_panic_restore_hook(&raw_mode);

    let (stdin_tx, mut stdin_rx) = mpsc::channel::<Vec<u8>>(64);
    terminal::spawn_stdin_reader(stdin_tx);

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
    let mut sighup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()).ok();
    let mut health_tick = tokio::time::interval(argonaut_core::recovery::HEALTH_CHECK_INTERVAL);

    {
        let shared = Arc::clone(&shared);
        let cancel = root_cancel.child_token();
        tokio::spawn(async move { shared.recovery.run_health_check_loop(cancel).await });
    }

    for intent in dispatch_initial(&shared, &generations, &root_cancel, generation, &state.nav.scope) {
        spawn_intent(intent, Arc::clone(&shared), Arc::clone(&generations), root_cancel.clone());
    }

    let exit_code = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break 130,
            _ = sigterm_recv(&mut sigterm) => break 143,
            _ = sighup_recv(&mut sighup) => break 129,

            bytes = stdin_rx.recv() => {
                let Some(bytes) = bytes else { break 0 };
                let mut exit = None;
                for key in terminal::decode_keys(&bytes) {
                    let ctx = build_reduce_context(&shared, &state);
                    let intents = reduce(&mut state, Message::Key(key), &ctx);
                    if let Some(code) =
                        handle_intents(intents, &shared, &generations, &root_cancel, &mut stdin_rx).await
                    {
                        exit = Some(code);
                    }
                }
                if let Some(code) = exit {
                    break code;
                }
            }

            message = rx.recv() => {
                let Some(message) = message else { break 0 };
                let ctx = build_reduce_context(&shared, &state);
                let intents = reduce(&mut state, message, &ctx);
                if let Some(code) =
                    handle_intents(intents, &shared, &generations, &root_cancel, &mut stdin_rx).await
                {
                    break code;
                }
            }

            _ = health_tick.tick() => {
                for id in shared.recovery.sweep_stale() {
                    let recovery = Arc::clone(&shared.recovery);
                    let id = id.clone();
                    tokio::spawn(async move {
                        recovery.recover(&id, ArgoError::unavailable("stream idle past health-check threshold")).await;
                    });
                }
            }
        }
    };

    root_cancel.cancel();
    logger.log(LogLevel::Info, "shutdown", format!("exiting with code {exit_code}"));
    drop(raw_mode);
    exit_code
}

async fn sigterm_recv(signal: &mut Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending().await,
    }
}

async fn sighup_recv(signal: &mut Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending().await,
    }
}

/// Derive the visible-row count and highlighted id for the current view
/// (C8, §4.8) directly from the store snapshot — kept out of [`AppState`]
/// since it is recomputed fresh every loop iteration, not retained state.
fn build_reduce_context(shared: &Shared, state: &AppState) -> ReduceContext {
    let apps = shared.store.all();
    let scoped = scope::apps_in_scope(&apps, &state.nav.scope);

    let (derived_len, highlighted_id) = match state.nav.view {
        argonaut_cli::state::View::Clusters => labelled(scope::derive_clusters(&scoped), state),
        argonaut_cli::state::View::Namespaces => labelled(scope::derive_namespaces(&scoped), state),
        argonaut_cli::state::View::Projects => labelled(scope::derive_projects(&scoped), state),
        argonaut_cli::state::View::Apps => {
            let sorted = scope::sort_apps(scoped, &state.nav.sort);
            let filtered = scope::search_filter(sorted, &state.ui.search_buffer, |app| app.name.as_str());
            let highlighted = filtered.get(state.nav.cursor).map(|app| app.name.clone());
            (filtered.len(), highlighted)
        }
        argonaut_cli::state::View::ResourceTree => match &state.nav.current_app {
            Some(app_name) => match shared.tree_for(app_name) {
                Some(tree) => {
                    let nodes = tree.depth_first_order();
                    let highlighted = nodes.get(state.nav.cursor).map(|node| node.uid.clone());
                    (nodes.len(), highlighted)
                }
                None => (0, None),
            },
            None => (0, None),
        },
    };

    ReduceContext { derived_len, viewport_height: terminal::terminal_size().1 as usize, highlighted_id }
}

fn labelled(items: Vec<scope::DerivedItem>, state: &AppState) -> (usize, Option<String>) {
    let filtered = scope::search_filter(items, &state.ui.search_buffer, |item| item.label.as_str());
    let highlighted = filtered.get(state.nav.cursor).map(|item| item.id.clone());
    (filtered.len(), highlighted)
}

/// The initial watch kicked off once startup has a generation (mirrors
/// what the reducer would otherwise emit for a fresh `ContextSwitched`).
fn dispatch_initial(
    _shared: &Shared,
    _generations: &GenerationTokens,
    _root_cancel: &CancellationToken,
    generation: u64,
    scope: &Scope,
) -> Vec<Intent> {
    vec![Intent::StartAppsWatch(argonaut_cli::intent::WatchSpec { generation, scope: scope.clone() })]
}

/// Runs a batch of intents, handling the kinds the event loop itself
/// must own rather than hand to a detached task: [`Intent::Quit`] (ends
/// the loop) and the two pty handoffs, [`Intent::SpawnExternalViewer`]
/// and [`Intent::SpawnDiffPager`] (each needs exclusive use of
/// `stdin_rx` for the duration of the handoff, §4.11). Returns the exit
/// code once [`Intent::Quit`] has been seen among the batch.
async fn handle_intents(
    intents: Vec<Intent>,
    shared: &Arc<Shared>,
    generations: &Arc<GenerationTokens>,
    root: &CancellationToken,
    stdin_rx: &mut mpsc::Receiver<Vec<u8>>,
) -> Option<i32> {
    let mut exit = None;
    for intent in intents {
        match intent {
            Intent::Quit => exit = Some(0),
            Intent::CancelStaleTasks { below_generation } => generations.cancel_below(below_generation),
            Intent::SpawnExternalViewer { app_name } => {
                let exit_code = run_external_viewer(shared, app_name, stdin_rx).await;
                shared.send(Message::ExternalExited { exit_code }).await;
            }
            Intent::SpawnDiffPager { app_name, diff_text } => {
                let exit_code = run_diff_pager(shared, app_name, diff_text, stdin_rx).await;
                shared.send(Message::ExternalExited { exit_code }).await;
            }
            other => spawn_intent(other, Arc::clone(shared), Arc::clone(generations), root.clone()),
        }
    }
    exit
}

fn spawn_intent(intent: Intent, shared: Arc<Shared>, generations: Arc<GenerationTokens>, root: CancellationToken) {
    match intent {
        Intent::StartAppsWatch(spec) => spawn_apps_watch(shared, &generations, &root, spec),
        Intent::RestartScopedWatch(spec) => {
            let shared = Arc::clone(&shared);
            let generations = Arc::clone(&generations);
            let root = root.clone();
            let shared_for_effect = Arc::clone(&shared);
            shared.watch_debouncer.schedule(move || async move {
                spawn_apps_watch(shared_for_effect, &generations, &root, spec);
            });
        }
        Intent::CancelStaleTasks { below_generation } => {
            generations.cancel_below(below_generation);
        }
        Intent::StartTreeWatch { generation, app_name } => {
            let cancel = generations.token_for(&root, generation);
            tokio::spawn(run_tree_watch(shared, generation, app_name, cancel));
        }
        Intent::StopTreeWatch => {}
        Intent::Sync { generation, targets, prune } => {
            tokio::spawn(run_sync(shared, generation, targets, prune));
        }
        Intent::Refresh { generation, app_name, hard } => {
            tokio::spawn(run_refresh(shared, generation, app_name, hard));
        }
        Intent::Rollback { generation, app_name, revision_id } => {
            tokio::spawn(run_rollback(shared, generation, app_name, revision_id));
        }
        Intent::Delete { generation, app_name, cascade, propagation_policy } => {
            tokio::spawn(run_delete(shared, generation, app_name, cascade, propagation_policy));
        }
        Intent::FetchDiff { generation, app_name } => {
            tokio::spawn(run_fetch_diff(shared, generation, app_name));
        }
        Intent::FetchRollbackHistory { generation, app_name } => {
            tokio::spawn(run_fetch_rollback_history(shared, generation, app_name));
        }
        Intent::SwitchContext { context_name } => {
            tokio::spawn(run_switch_context(shared, context_name));
        }
        Intent::OpenLogViewer => {
            tokio::spawn(run_open_log_viewer(shared));
        }
        Intent::SpawnExternalViewer { .. } | Intent::SpawnDiffPager { .. } => {
            // Intercepted in `handle_intents`, which runs the handoff
            // inline so it can borrow `stdin_rx`; never reaches here.
        }
        Intent::ShowStatus { message } => {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move {
                shared.logger.log(LogLevel::Info, "ui", message);
            });
        }
        Intent::Quit => {}
    }
}

/// Installs a fresh cancellation token for `spec`'s generation, cancels
/// whichever apps-watch task previously held that slot, and spawns the
/// watch. Shared by the immediate path ([`Intent::StartAppsWatch`]) and
/// the debounced scope-restart path ([`Intent::RestartScopedWatch`]) so
/// both leave exactly one apps-watch task running at a time.
fn spawn_apps_watch(
    shared: Arc<Shared>,
    generations: &GenerationTokens,
    root: &CancellationToken,
    spec: argonaut_cli::intent::WatchSpec,
) {
    let parent = generations.token_for(root, spec.generation);
    let cancel = parent.child_token();
    if let Some(old) = shared.replace_apps_watch_cancel(cancel.clone()) {
        old.cancel();
    }
    tokio::spawn(run_apps_watch(shared, spec.generation, spec.scope, cancel));
}

/// §5 WatchApps: an initial list seeds the store, then the change feed
/// is forwarded for the lifetime of this generation. Reconnection is
/// handled by [`StreamRecoveryManager`] via a registered recovery
/// closure that repeats this same sequence.
async fn run_apps_watch(shared: Arc<Shared>, generation: u64, scope: Scope, cancel: CancellationToken) {
    let stream_id = format!("apps-{generation}");
    let service = shared.current_service();

    match service.list_applications(&cancel).await {
        Ok(list) => {
            shared.store.apply(StoreEvent::AppsLoaded { apps: list.apps.clone(), resource_version: list.resource_version });
            shared.degradation.update_cache(list.apps.clone(), shared.current_server_label(), None);
            shared.degradation.report_health(Component::ArgoApi, true, None);
            shared.send(Message::AppsLoaded { generation, apps: list.apps }).await;
        }
        Err(e) => {
            shared.degradation.report_health(Component::ArgoApi, false, Some(&e));
            if e.kind == argonaut_core::ErrorKind::Auth {
                shared.send(Message::StreamAuthError { generation }).await;
                return;
            }
        }
    }

    let recovery_fn: RecoveryFn = {
        let shared = Arc::clone(&shared);
        let scope = scope.clone();
        Arc::new(move |cancel: CancellationToken| {
            let shared = Arc::clone(&shared);
            let scope = scope.clone();
            Box::pin(async move { run_apps_watch_once(&shared, generation, &scope, cancel).await })
        })
    };
    shared.recovery.register(stream_id.clone(), shared.current_server_label(), cancel.clone(), recovery_fn);

    match run_apps_watch_once(&shared, generation, &scope, cancel).await {
        Ok(()) => {}
        Err(e) => {
            warn!(stream = stream_id, error = %e, "apps watch broken, handing off to recovery");
            shared.recovery.recover(&stream_id, e).await;
        }
    }
}

async fn run_apps_watch_once(
    shared: &Arc<Shared>,
    generation: u64,
    scope: &Scope,
    cancel: CancellationToken,
) -> Result<(), ArgoError> {
    let service = shared.current_service();
    let projects: Vec<String> = scope.project.clone().into_iter().collect();
    let (handle, mut rx) = service.watch_applications(&projects, None, cancel.clone());
    let stream_id = format!("apps-{generation}");

    while let Some(record) = rx.recv().await {
        if let Some(event) = api::parse_watch_event(&record) {
            forward_watch_event(shared, generation, event).await;
            shared.recovery.mark_success(&stream_id);
            shared.degradation.report_health(Component::ArgoApi, true, None);
        }
    }

    match handle.await {
        Ok(StreamOutcome::Ended | StreamOutcome::Cancelled) => Ok(()),
        Ok(StreamOutcome::AuthError) => {
            shared.send(Message::StreamAuthError { generation }).await;
            Err(ArgoError::auth("apps stream authentication failed"))
        }
        Ok(StreamOutcome::HttpError { code, body }) => {
            shared.send(Message::StreamHttpError { generation, code, body: body.clone() }).await;
            Err(ArgoError::http(code, body))
        }
        Ok(StreamOutcome::Broken(e)) => {
            shared.degradation.report_health(Component::ArgoApi, false, Some(&e));
            Err(e)
        }
        Err(join_err) => Err(ArgoError::internal(format!("apps watch task panicked: {join_err}"))),
    }
}

async fn forward_watch_event(shared: &Arc<Shared>, generation: u64, event: api::WatchEvent) {
    match event {
        api::WatchEvent::Added(app) | api::WatchEvent::Modified(app) => {
            shared.store.apply(StoreEvent::AppUpdated { app: app.clone(), resource_version: None });
            shared.send(Message::AppUpdated { generation, app }).await;
        }
        api::WatchEvent::Deleted { namespace, name } => {
            shared.store.apply(StoreEvent::AppDeleted {
                namespace: namespace.clone(),
                name: name.clone(),
                resource_version: None,
            });
            shared.send(Message::AppDeleted { generation, namespace, name }).await;
        }
    }
}

/// §5 WatchTree: loads the tree once, then follows the watch feed,
/// sending a fresh [`Message::ResourceTreeLoaded`] on every update.
async fn run_tree_watch(shared: Arc<Shared>, generation: u64, app_name: String, cancel: CancellationToken) {
    let service = shared.current_service();

    match service.get_resource_tree(&app_name, &cancel).await {
        Ok(tree) => {
            shared.set_tree(app_name.clone(), tree.clone());
            shared.send(Message::ResourceTreeLoaded { generation, app_name: app_name.clone(), tree }).await;
        }
        Err(e) => {
            shared.degradation.report_health(Component::ArgoApi, false, Some(&e));
            return;
        }
    }

    let (handle, mut rx) = service.watch_resource_tree(&app_name, cancel);
    while rx.recv().await.is_some() {
        if let Ok(tree) = service.get_resource_tree(&app_name, &CancellationToken::new()).await {
            shared.set_tree(app_name.clone(), tree.clone());
            shared.send(Message::ResourceTreeLoaded { generation, app_name: app_name.clone(), tree }).await;
        }
    }
    shared.clear_tree();
    let _ = handle.await;
}

async fn run_sync(shared: Arc<Shared>, generation: u64, targets: argonaut_cli::state::SyncTargets, prune: bool) {
    if let Err(e) = shared.degradation.check_operation(Operation::Sync) {
        shared.send(Message::OpCompleted {
            generation,
            result: OpResult::Sync { app_name: String::new(), ok: false, error: Some(e.message) },
        })
        .await;
        return;
    }

    let service = shared.current_service();
    let names: Vec<String> = match targets {
        argonaut_cli::state::SyncTargets::Single(name) => vec![name],
        argonaut_cli::state::SyncTargets::Many(names) => names,
    };

    for name in names {
        let opts = SyncOptions { prune, resources: None::<Vec<SyncResource>> };
        let result = service.sync_application(&name, &opts, &CancellationToken::new()).await;
        let (ok, error) = match result {
            Ok(()) => (true, None),
            Err(e) => (false, Some(e.message)),
        };
        shared.send(Message::OpCompleted { generation, result: OpResult::Sync { app_name: name, ok, error } }).await;
    }
}

async fn run_refresh(shared: Arc<Shared>, generation: u64, app_name: String, hard: bool) {
    if let Err(e) = shared.degradation.check_operation(Operation::Refresh) {
        shared
            .send(Message::OpCompleted { generation, result: OpResult::Refresh { app_name, ok: false, error: Some(e.message) } })
            .await;
        return;
    }
    let service = shared.current_service();
    let mode = if hard { RefreshMode::Hard } else { RefreshMode::Normal };
    let result = service.refresh(&app_name, mode, &CancellationToken::new()).await;
    let (ok, error) = match result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.message)),
    };
    shared.send(Message::OpCompleted { generation, result: OpResult::Refresh { app_name, ok, error } }).await;
}

async fn run_rollback(shared: Arc<Shared>, generation: u64, app_name: String, revision_id: i64) {
    if let Err(e) = shared.degradation.check_operation(Operation::Rollback) {
        shared
            .send(Message::OpCompleted { generation, result: OpResult::Rollback { app_name, ok: false, error: Some(e.message) } })
            .await;
        return;
    }
    let service = shared.current_service();
    let req = RollbackRequest { id: revision_id, prune: None };
    let result = service.rollback_application(&app_name, &req, &CancellationToken::new()).await;
    let (ok, error) = match result {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.message)),
    };
    shared.send(Message::OpCompleted { generation, result: OpResult::Rollback { app_name, ok, error } }).await;
}

async fn run_delete(shared: Arc<Shared>, generation: u64, app_name: String, cascade: bool, propagation_policy: String) {
    if let Err(e) = shared.degradation.check_operation(Operation::Delete) {
        shared
            .send(Message::OpCompleted { generation, result: OpResult::Delete { app_name, ok: false, error: Some(e.message) } })
            .await;
        return;
    }
    let service = shared.current_service();
    let result = service.delete_application(&app_name, cascade, &propagation_policy, &CancellationToken::new()).await;
    let (ok, error) = match result {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.message)),
    };
    shared.send(Message::OpCompleted { generation, result: OpResult::Delete { app_name, ok, error } }).await;
}

async fn run_fetch_diff(shared: Arc<Shared>, generation: u64, app_name: String) {
    if shared.degradation.check_operation(Operation::GetDiffs).is_err() {
        return;
    }
    let service = shared.current_service();
    match service.get_managed_resources(&app_name, &CancellationToken::new()).await {
        Ok(diffs) => {
            shared.send(Message::DiffLoaded { generation, app_name, diffs }).await;
        }
        Err(e) => {
            shared.logger.log(LogLevel::Warn, "diff", format!("fetching diff for {app_name}: {e}"));
        }
    }
}

async fn run_fetch_rollback_history(shared: Arc<Shared>, generation: u64, app_name: String) {
    if shared.degradation.check_operation(Operation::Get).is_err() {
        return;
    }
    let service = shared.current_service();
    match service.get_revision_history(&app_name, &CancellationToken::new()).await {
        Ok(history) => {
            shared.send(Message::RollbackHistoryLoaded { generation, app_name, history }).await;
        }
        Err(e) => {
            shared.logger.log(LogLevel::Warn, "rollback", format!("fetching history for {app_name}: {e}"));
        }
    }
}

/// §4.10 `logs`: reads back the current session's own records (no other
/// session is readable from inside a running process, §4.12).
async fn run_open_log_viewer(shared: Arc<Shared>) {
    let session_id = shared.logger.session_id().to_string();
    let lines = match argonaut_core::logger::read_session(&shared.sessions_dir, &session_id) {
        Ok(records) => records
            .into_iter()
            .map(|r| format!("[{:?}] {}: {}", r.level, r.component, r.message))
            .collect(),
        Err(e) => {
            shared.logger.log(LogLevel::Warn, "logs", format!("reading session log: {e}"));
            vec![format!("failed to read session log: {e}")]
        }
    };
    shared.send(Message::SessionLogLoaded { lines }).await;
}

/// §4.10 `context [name]`: resolves the name with config this task owns
/// (the reducer has none), then reports success/failure back for the
/// reducer to apply; on success also swaps in a fresh service/transport
/// for the new server before the reducer starts its fresh watch.
async fn run_switch_context(shared: Arc<Shared>, context_name: String) {
    let context = match shared.argocd_config.resolve(&context_name, &shared.tls_overrides, shared.request_timeout) {
        Ok(context) => context,
        Err(e) => {
            shared.send(Message::ContextSwitchFailed { message: e.message }).await;
            return;
        }
    };

    let transport = match Transport::new(&context.server) {
        Ok(t) => t,
        Err(e) => {
            shared.send(Message::ContextSwitchFailed { message: e.message }).await;
            return;
        }
    };

    shared.store.clear();
    shared.clear_tree();
    shared.set_current(api::ArgoApiService::new(transport, context.name.clone()), context.name.clone());
    shared.send(Message::ContextSwitched { context }).await;
}

/// §4.11 external handoff: hands the real terminal to the child for the
/// duration of its run — the caller holds `stdin_rx` for us, so our own
/// key decoding is paused while bytes go straight to the child's pty
/// and its output goes straight to our stdout. Restoring raw mode
/// afterward happens naturally since [`terminal::RawModeGuard`] is held
/// for the whole process lifetime and the child runs on its own pty.
async fn run_external_viewer(
    shared: &Arc<Shared>,
    app_name: String,
    stdin_rx: &mut mpsc::Receiver<Vec<u8>>,
) -> i32 {
    let command = vec![shared.k9s_command.clone(), "--namespace".to_string(), app_name.clone()];
    let (cols, rows) = terminal::terminal_size();
    let status_bar = format!("\r\n argonaut: {app_name} \r\n").into_bytes();

    let mut process = match ExternalProcess::spawn(&command, cols, rows, false, Some(&shared.app_config_path)) {
        Ok(p) => p,
        Err(e) => {
            shared.logger.log(LogLevel::Error, "viewer", format!("spawning {}: {e}", shared.k9s_command));
            return 127;
        }
    };

    let (output_tx, mut output_rx) = mpsc::channel::<Bytes>(256);
    let (input_tx, input_rx) = mpsc::channel::<Bytes>(256);

    let run_fut = process.run(output_tx, input_rx);
    tokio::pin!(run_fut);
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            result = &mut run_fut => {
                return match result {
                    Ok(status) => status.code.unwrap_or(1),
                    Err(e) => {
                        shared.logger.log(LogLevel::Error, "viewer", format!("running {}: {e}", shared.k9s_command));
                        1
                    }
                };
            }
            bytes = stdin_rx.recv() => {
                let Some(bytes) = bytes else { return 1 };
                if input_tx.send(Bytes::from(bytes)).await.is_err() {
                    // child already stopped reading; keep waiting on run_fut for its exit.
                }
            }
            chunk = output_rx.recv() => {
                if let Some(chunk) = chunk {
                    let chunk = argonaut_cli::pty::inject_status_bar(&chunk, &status_bar);
                    if stdout.write_all(&chunk).await.is_ok() {
                        let _ = stdout.flush().await;
                    }
                }
            }
        }
    }
}

/// §4.10 `diff`: the pty handoff forwards input bytes as keystrokes, not
/// as piped stdin (§4.11), so the rendered diff is written to a file
/// under the cache directory and handed to the formatter by path, the
/// same way [`run_external_viewer`] hands `k9s` a `--namespace` value.
async fn run_diff_pager(
    shared: &Arc<Shared>,
    app_name: String,
    diff_text: String,
    stdin_rx: &mut mpsc::Receiver<Vec<u8>>,
) -> i32 {
    let diff_dir = shared.sessions_dir.join("diffs");
    if let Err(e) = std::fs::create_dir_all(&diff_dir) {
        shared.logger.log(LogLevel::Error, "diff", format!("creating {}: {e}", diff_dir.display()));
        return 127;
    }
    let diff_path = diff_dir.join(format!("{app_name}.diff"));
    if let Err(e) = std::fs::write(&diff_path, diff_text) {
        shared.logger.log(LogLevel::Error, "diff", format!("writing {}: {e}", diff_path.display()));
        return 127;
    }

    let command = vec![shared.diff_formatter.clone(), diff_path.display().to_string()];
    let (cols, rows) = terminal::terminal_size();

    let mut process = match ExternalProcess::spawn(&command, cols, rows, false, Some(&shared.app_config_path)) {
        Ok(p) => p,
        Err(e) => {
            shared.logger.log(LogLevel::Error, "diff", format!("spawning {}: {e}", shared.diff_formatter));
            return 127;
        }
    };

    let (output_tx, mut output_rx) = mpsc::channel::<Bytes>(256);
    let (input_tx, input_rx) = mpsc::channel::<Bytes>(256);

    let run_fut = process.run(output_tx, input_rx);
    tokio::pin!(run_fut);
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            result = &mut run_fut => {
                return match result {
                    Ok(status) => status.code.unwrap_or(1),
                    Err(e) => {
                        shared.logger.log(LogLevel::Error, "diff", format!("running {}: {e}", shared.diff_formatter));
                        1
                    }
                };
            }
            bytes = stdin_rx.recv() => {
                let Some(bytes) = bytes else { return 1 };
                if input_tx.send(Bytes::from(bytes)).await.is_err() {
                    // child already stopped reading; keep waiting on run_fut for its exit.
                }
            }
            chunk = output_rx.recv() => {
                if let Some(chunk) = chunk {
                    if stdout.write_all(&chunk).await.is_ok() {
                        let _ = stdout.flush().await;
                    }
                }
            }
        }
    }
}
