// src/lib.rs

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod filter;
pub mod fs;
pub mod logging;
pub mod path;
pub mod types;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{SyncConfig, config_base_dir, load_or_default, validate_config};
use crate::engine::{CoreOrchestrator, Runtime, RuntimeEvent, RuntimeOptions, SyncPlanner};
use crate::exec::RealTransportBackend;
use crate::fs::RealFileSystem;
use crate::path::PathTranslator;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and command-line overrides
/// - planner / core / runtime
/// - transport backend
/// - (optional) file watcher
/// - Ctrl-C and SIGHUP handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let mut raw = load_or_default(&fs, &args.config)?;
    args.apply_overrides(&mut raw);
    let cfg = validate_config(raw, &config_base_dir(&args.config), &fs)?;

    let translator = PathTranslator::for_platform();
    let planner = SyncPlanner::from_config(&cfg, translator);

    if args.dry_run {
        print_dry_run(&cfg, &planner);
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let transport = RealTransportBackend::new(rt_tx.clone());

    // The watcher starts before the initial sync so nothing changed during it
    // is missed; those batches are queued behind it.
    let _watcher_handle = if !args.once {
        Some(crate::watch::spawn_watcher(
            cfg.local_dir(),
            cfg.latency(),
            rt_tx.clone(),
        )?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // SIGHUP → full resync.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let tx = rt_tx.clone();
        let mut hangup = signal(SignalKind::hangup())?;
        tokio::spawn(async move {
            while hangup.recv().await.is_some() {
                if tx.send(RuntimeEvent::ResyncRequested).await.is_err() {
                    break;
                }
            }
        });
    }

    info!(
        local = %cfg.local_dir().display(),
        remote = %cfg.remote_dir(),
        simulate = cfg.simulate(),
        "syncwatch starting"
    );

    let options = RuntimeOptions {
        exit_when_idle: args.once,
    };

    // Construct the pure core (single source of truth for semantics).
    let core = CoreOrchestrator::new(planner, options);

    // Construct the async IO shell around the core.
    let runtime = Runtime::new(core, rt_rx, transport);
    let summary = runtime.run().await?;

    if args.once && summary.failed > 0 {
        anyhow::bail!("initial sync failed");
    }
    Ok(())
}

/// Simple dry-run output: print the resolved settings and the invocation the
/// initial sync would use.
fn print_dry_run(cfg: &SyncConfig, planner: &SyncPlanner) {
    println!("syncwatch dry-run");
    println!("  local_dir = {}", cfg.local_dir().display());
    println!("  remote_dir = {}", cfg.remote_dir());
    println!("  simulate = {}", cfg.simulate());
    println!("  latency_ms = {}", cfg.latency().as_millis());
    println!();

    println!("exclusions ({}):", cfg.filters().len());
    for pattern in cfg.filters().patterns() {
        println!("  - {pattern}");
    }
    println!();

    let initial = planner.full();
    println!("initial sync:");
    println!("  {}", initial.command_line());
    if !initial.stdin.is_empty() {
        println!("  stdin:");
        for line in initial.stdin.lines() {
            println!("    {line}");
        }
    }

    debug!("dry-run complete (no execution)");
}
