/*
 *  main.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::{debug, error, info, warn};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

use hmi_panel::config;
use hmi_panel::demo::DemoProducer;
use hmi_panel::{AcquireTimeout, DisplayLoop, FrameBufferDisplay, ModelStore};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Resolves when the display loop should stop.
///
/// Falls back to `fallback` (Ctrl-C) when the unix handlers cannot be
/// installed. With no handler at all an unbounded run stops at once, while a
/// frame-limited run never resolves here and finishes on its own.
async fn shutdown_requested<E1, E2>(
    primary: impl Future<Output = Result<(), E1>>,
    fallback: impl Future<Output = Result<(), E2>>,
    bounded: bool,
) where
    E1: Display,
    E2: Display,
{
    let Err(e) = primary.await else { return };
    warn!("Signal handling unavailable ({}), falling back to Ctrl-C", e);

    match fallback.await {
        Ok(()) => info!("Ctrl-C received. Initiating graceful shutdown."),
        Err(e) if bounded => {
            warn!("Ctrl-C handling unavailable ({}), running to the frame limit", e);
            std::future::pending::<()>().await;
        }
        Err(e) => error!("Ctrl-C handling unavailable ({}), stopping", e),
    }
}

/// Input/level context: publishes synthetic updates until stopped.
fn spawn_demo(store: Arc<ModelStore>, timeout_ms: u64, stop: Arc<AtomicBool>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut demo = DemoProducer::new(AcquireTimeout::from_millis(timeout_ms));
        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = demo.step(&store) {
                debug!("Demo update dropped: {}", e);
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        info!("Demo producer stopped after {} steps", demo.steps());
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_millis()
        .init();

    info!("hmi-panel v{} built {} ({})", env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_PROFILE);

    let store = Arc::new(ModelStore::new());
    store.init()?;
    store
        .acquire(AcquireTimeout::Forever)?
        .set_gain(cfg.initial_gain());

    let (width, height) = cfg.display_size();
    let mut display = FrameBufferDisplay::new(width, height);
    info!("Display: {}x{} framebuffer @ {} FPS", width, height, cfg.frame_rate_hz());

    let mut display_loop = DisplayLoop::new(Arc::clone(&store), cfg.frame_rate_hz())
        .with_frame_limit(cfg.frames());
    let stop = display_loop.stop_handle();

    let demo = cfg
        .demo()
        .then(|| spawn_demo(Arc::clone(&store), cfg.input_timeout_ms(), Arc::clone(&stop)));

    let mut render = tokio::task::spawn_blocking(move || {
        let stats = display_loop.run(&mut display);
        (stats, display)
    });

    let (stats, display) = tokio::select! {
        joined = &mut render => joined?,
        _ = shutdown_requested(signal_handler(), tokio::signal::ctrl_c(), cfg.frames() > 0) => {
            stop.store(true, Ordering::Relaxed);
            render.await?
        }
    };
    stop.store(true, Ordering::Relaxed);

    if let Some(handle) = demo {
        if handle.join().is_err() {
            warn!("Demo producer panicked");
        }
    }

    info!(
        "Rendered {} frames ({} skipped, {} ticks skipped)",
        stats.frames_drawn, stats.frames_skipped, stats.ticks_skipped
    );

    if let Some(path) = cfg.snapshot.as_ref() {
        display
            .save_ppm(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!("Snapshot saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tokio::time::timeout;

    fn failed() -> impl Future<Output = Result<(), io::Error>> {
        async { Err(io::Error::other("no handler")) }
    }

    fn fired() -> impl Future<Output = Result<(), io::Error>> {
        async { Ok(()) }
    }

    async fn resolves(fut: impl Future<Output = ()>) -> bool {
        timeout(Duration::from_millis(50), fut).await.is_ok()
    }

    #[tokio::test]
    async fn test_signal_requests_shutdown() {
        assert!(resolves(shutdown_requested(fired(), std::future::pending::<Result<(), io::Error>>(), false)).await);
    }

    #[tokio::test]
    async fn test_failed_signals_wait_on_ctrl_c() {
        let pending = std::future::pending::<Result<(), io::Error>>();
        assert!(!resolves(shutdown_requested(failed(), pending, false)).await);
        assert!(resolves(shutdown_requested(failed(), fired(), false)).await);
    }

    #[tokio::test]
    async fn test_no_handlers_stops_unbounded_run() {
        assert!(resolves(shutdown_requested(failed(), failed(), false)).await);
        // a frame-limited run is left to reach its limit
        assert!(!resolves(shutdown_requested(failed(), failed(), true)).await);
    }
}
