//! OMNISIGHT Console runner
//!
//! Headless smoke-path for the console core: builds a sync client,
//! subscribes to the event push channel, fetches a full frame per tick
//! and reports the resulting view geometry through tracing. The real
//! browser views replay the same draw commands onto a canvas.

use clap::Parser;
use omnisight_console::models::PushMessage;
use omnisight_console::render::{heatmap, timeline, topology, CanvasSize};
use omnisight_console::transport::poller;
use omnisight_console::transport::push_channel::PushHandler;
use omnisight_console::{Error, SyncClient};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "omnisight-console", about = "OMNISIGHT monitoring console (headless)")]
struct Args {
    /// Backend REST base address
    #[arg(long, default_value = "http://localhost:8080")]
    api_url: String,

    /// Backend push-channel base address
    #[arg(long, default_value = "ws://localhost:8081")]
    ws_url: String,

    /// Refresh cadence in milliseconds
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// Heatmap time range in seconds
    #[arg(long, default_value_t = 60)]
    time_range: u32,

    /// Fetch and render a single frame, then exit
    #[arg(long)]
    once: bool,
}

struct EventLogger;

impl PushHandler for EventLogger {
    fn on_open(&self) {
        tracing::info!("push channel connected");
    }

    fn on_message(&self, msg: PushMessage) {
        match msg {
            PushMessage::Event(event) => {
                tracing::info!(
                    event_type = ?event.event_type,
                    severity = %event.severity,
                    probability = event.probability(),
                    "live event"
                );
            }
            PushMessage::Unknown => {}
        }
    }

    fn on_error(&self, err: Error) {
        tracing::warn!(error = %err, "push channel error");
    }

    fn on_close(&self, terminal: bool) {
        if terminal {
            tracing::warn!("push channel exhausted; continuing on polling only");
        } else {
            tracing::info!("push channel closed, reconnecting");
        }
    }
}

async fn render_frame(client: &SyncClient, time_range: u32) {
    let (status, tracks, events, cameras, heatmap_data, timelines) = tokio::join!(
        client.get_status(),
        client.get_tracks(),
        client.get_events(),
        client.get_cameras(),
        client.get_heatmap(time_range),
        client.get_timelines(),
    );

    let topology_size = CanvasSize::new(700.0, 600.0);
    let heatmap_size = CanvasSize::new(800.0, 600.0);

    let selected = cameras.cameras.first().map(|c| c.id.clone());
    let topology_commands =
        topology::render(&cameras.cameras, selected.as_deref(), topology_size);

    let frame = heatmap::HeatmapFrame {
        grid: &heatmap_data.grid,
        tracks: &tracks.tracks,
        events: &events.events,
        show_tracks: true,
        show_events: true,
    };
    let heatmap_commands = heatmap::render(&frame, heatmap_size);

    let now_ms = chrono::Utc::now().timestamp_millis();
    let markers: usize = timelines
        .timelines
        .iter()
        .map(|t| timeline::render(t, t.horizon_seconds, now_ms).len())
        .sum();

    let state = client.state().await;
    tracing::info!(
        state = %state,
        backend_status = %status.status,
        cameras = cameras.cameras.len(),
        tracks = tracks.tracks.len(),
        events = events.events.len(),
        timelines = timelines.timelines.len(),
        topology_commands = topology_commands.len(),
        heatmap_commands = heatmap_commands.len(),
        timeline_markers = markers,
        "frame rendered"
    );
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omnisight_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(api_url = %args.api_url, ws_url = %args.ws_url, "starting console");

    let client = Arc::new(SyncClient::new(&args.api_url, &args.ws_url));
    client.connect_events(Arc::new(EventLogger));

    if args.once {
        render_frame(&client, args.time_range).await;
        client.shutdown();
        return;
    }

    let poll_client = client.clone();
    let time_range = args.time_range;
    let handle = poller::poll(
        move || {
            let client = poll_client.clone();
            async move {
                render_frame(&client, time_range).await;
                Ok(())
            }
        },
        Duration::from_millis(args.interval_ms),
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "signal handler failed");
    }
    tracing::info!("shutting down");
    handle.stop();
    client.shutdown();
}
