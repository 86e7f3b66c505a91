#![deny(warnings)]

mod sim;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use speech_coach_core::config::{
    MetricsRate, NoiseFloor, SessionConfig, DEFAULT_MAX_HISTORY, DEFAULT_METRICS_HZ,
    DEFAULT_NOISE_FLOOR, DEFAULT_WINDOW_CAPACITY, DEFAULT_WPM_WINDOW_SECS,
};
use speech_coach_core::metrics::MetricsEvent;
use speech_coach_core::session::{MetricStats, Session, SessionSummary};
use speech_coach_core::transcript::{AlwaysAvailable, RecognitionSource, Unavailable};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speech-coach")]
#[command(about = "Live delivery-metrics fusion demo driven by synthetic producers")]
struct Args {
    /// How long to run the simulated session.
    #[arg(long, default_value_t = 15)]
    duration_secs: u64,

    #[arg(long, default_value_t = DEFAULT_METRICS_HZ)]
    metrics_hz: u32,

    #[arg(long, default_value_t = DEFAULT_NOISE_FLOOR)]
    noise_floor: f64,

    #[arg(long, default_value_t = DEFAULT_WPM_WINDOW_SECS)]
    wpm_window_secs: u64,

    /// Simulate a session where no face is ever detected.
    #[arg(long, default_value_t = false)]
    no_face: bool,

    /// Simulate an unavailable speech recognizer.
    #[arg(long, default_value_t = false)]
    no_asr: bool,

    /// Emit one JSON object per event instead of the plain line format.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = build_config(&args)?;
    tracing::info!(
        metrics_hz = config.metrics_rate.hz(),
        duration_secs = args.duration_secs,
        no_face = args.no_face,
        no_asr = args.no_asr,
        "config loaded"
    );

    let recognition: Arc<dyn RecognitionSource> = if args.no_asr {
        Arc::new(Unavailable)
    } else {
        Arc::new(AlwaysAvailable)
    };
    let session = Arc::new(Session::new(config, recognition));

    let mut stream = session.event_stream();
    session.start().context("starting session")?;

    let producers = sim::spawn_producers(Arc::clone(&session), args.no_face, args.no_asr);

    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            print_event(&event, json);
        }
    });

    tokio::time::sleep(Duration::from_secs(args.duration_secs)).await;
    let summary = session.stop().await.context("stopping session")?;

    for handle in producers {
        let _ = handle.await;
    }
    drop(session);
    printer.await.context("event printer")?;

    print_summary(&summary, json)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SessionConfig> {
    Ok(SessionConfig {
        metrics_rate: MetricsRate::new(args.metrics_hz)?,
        window_capacity: DEFAULT_WINDOW_CAPACITY,
        wpm_window: Duration::from_secs(args.wpm_window_secs),
        noise_floor: NoiseFloor::new(args.noise_floor)?,
        max_history: DEFAULT_MAX_HISTORY,
    })
}

fn print_event(event: &MetricsEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "event not serializable"),
        }
        return;
    }

    let wpm = event
        .wpm
        .map(|w| w.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let pause = event
        .pause_ratio
        .map(|p| format!("{:.0}%", p * 100.0))
        .unwrap_or_else(|| "-".to_owned());
    let tone = event
        .tone_score
        .map(|t| format!("{t:+.2}"))
        .unwrap_or_else(|| "-".to_owned());
    println!(
        "[{:>6} ms] wpm {:>3}  pause {:>4}  fillers/min {:>4.1}  tone {:>5}",
        event.t_ms, wpm, pause, event.fillers_per_min, tone
    );
}

fn print_summary(summary: &SessionSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("serializing summary")?
        );
        return Ok(());
    }

    println!();
    println!(
        "session: {} ticks over {:.1} s",
        summary.ticks,
        summary.duration_ms as f64 / 1000.0
    );
    print_stat("wpm", &summary.wpm);
    print_stat("pitch_hz", &summary.pitch_hz);
    print_stat("loudness", &summary.loudness);
    print_stat("pause_ratio", &summary.pause_ratio);
    print_stat("fillers_per_min", &summary.fillers_per_min);
    print_stat("blink_per_min", &summary.blink_per_min);
    print_stat("gaze_jitter", &summary.gaze_jitter);
    print_stat("smile", &summary.smile);
    print_stat("tone_score", &summary.tone_score);
    println!("fillers total: {}", summary.total_fillers);
    println!("words spoken:  {}", summary.word_count);
    if !summary.transcript.is_empty() {
        println!("transcript:    {}", summary.transcript);
    }
    Ok(())
}

fn print_stat(name: &str, stat: &Option<MetricStats>) {
    match stat {
        Some(s) => println!(
            "{name:>16}: mean {:>7.2}  median {:>7.2}  min {:>7.2}  max {:>7.2}  sd {:>6.2}",
            s.mean, s.median, s.min, s.max, s.std_dev
        ),
        None => println!("{name:>16}: (no data)"),
    }
}
