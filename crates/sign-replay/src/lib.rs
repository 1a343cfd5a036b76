//! Sign Replay
//!
//! Feeds recorded per-frame sign classifications (JSON Lines) through a
//! [`SignTracker`] and writes the stabilized sign row for every frame.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sign_classification::{FrameSignClassifications, SignTracker, UiSign};
use temporal_tracker::TrackerConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Environment variable prefix, e.g. `SIGN_REPLAY__TRACKER__MAX_CAPACITY=3`
pub const ENV_PREFIX: &str = "SIGN_REPLAY";

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Tracker thresholds
    pub tracker: TrackerConfig,

    /// Frame pacing (frames per second, 0 = as fast as possible)
    pub rate_hz: u32,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit one JSON object per frame instead of text
    pub json: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            rate_hz: 0,
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl ReplayConfig {
    /// Time between paced frames, `None` when pacing is off
    ///
    /// Rates above 1 GHz are clamped to a 1ns period.
    pub fn frame_period(&self) -> Option<Duration> {
        (self.rate_hz > 0).then(|| {
            Duration::from_secs_f64(1.0 / f64::from(self.rate_hz)).max(Duration::from_nanos(1))
        })
    }

    /// Apply command-line flags on top of file and environment settings
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(rate_hz) = overrides.rate_hz {
            self.rate_hz = rate_hz;
        }
        if let Some(capacity) = overrides.capacity {
            self.tracker.max_capacity = capacity;
        }
        self.json |= overrides.json;
    }
}

/// Settings given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub rate_hz: Option<u32>,
    pub capacity: Option<usize>,
    pub json: bool,
}

/// Load configuration from an optional file, then the process environment
pub fn load_config(path: Option<&Path>) -> Result<ReplayConfig> {
    load_config_with_env(path, None)
}

/// Load configuration from an optional file, then `env`
///
/// `env` replaces the process environment when given.
pub fn load_config_with_env(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ReplayConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Failed to load configuration")?;

    settings
        .try_deserialize()
        .context("Invalid configuration")
}

/// Initialize logging
pub fn init_logging(level: &str) -> Result<()> {
    let (max_level, unknown) = match Level::from_str(level) {
        Ok(max_level) => (max_level, false),
        Err(_) => (Level::INFO, true),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if unknown {
        warn!("Unknown log level {:?}, using info", level);
    }
    Ok(())
}

/// One line of JSON output
#[derive(Debug, Serialize)]
struct FrameRow<'a> {
    frame: u64,
    signs: &'a [UiSign],
}

/// Totals of a finished replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Frames pushed through the tracker
    pub frames: u64,
    /// Signs still tracked at the end
    pub tracked: usize,
    /// Signs displayed after the last frame
    pub displayed: usize,
}

/// Replay every frame of `reader` through `tracker`, writing one row per frame
pub async fn replay<R, W>(
    reader: R,
    tracker: &mut SignTracker,
    config: &ReplayConfig,
    out: &mut W,
) -> Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut ticker = config.frame_period().map(tokio::time::interval);
    let mut line_number = 0usize;
    let mut displayed = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read frame")? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let frame: FrameSignClassifications = serde_json::from_str(&line)
            .with_context(|| format!("Malformed frame on line {}", line_number))?;

        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        let signs = tracker
            .on_frame(&frame)
            .with_context(|| format!("Rejected frame on line {}", line_number))?;
        displayed = signs.len();

        write_row(out, tracker.frames(), &signs, config.json)?;
    }

    debug!("Reached end of input after {} lines", line_number);

    Ok(ReplaySummary {
        frames: tracker.frames(),
        tracked: tracker.tracked(),
        displayed,
    })
}

/// Replay a JSON Lines file
pub async fn replay_file<W: Write>(
    path: &Path,
    config: &ReplayConfig,
    out: &mut W,
) -> Result<ReplaySummary> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut tracker = SignTracker::new(config.tracker.clone())?;
    info!("Replaying {} at {} Hz", path.display(), config.rate_hz);

    replay(tokio::io::BufReader::new(file), &mut tracker, config, out).await
}

fn write_row<W: Write>(out: &mut W, frame: u64, signs: &[UiSign], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &FrameRow { frame, signs })?;
        writeln!(out)?;
    } else if signs.is_empty() {
        writeln!(out, "frame {}: -", frame)?;
    } else {
        let row: Vec<String> = signs.iter().map(UiSign::to_string).collect();
        writeln!(out, "frame {}: {}", frame, row.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(frames: &[&str], repeat: usize) -> String {
        let mut data = String::new();
        for _ in 0..repeat {
            for frame in frames {
                data.push_str(frame);
                data.push('\n');
            }
        }
        data
    }

    #[tokio::test]
    async fn test_replay_text_output() {
        let data = recording(&[r#"{"signs": [{"sign_type": "SpeedLimit", "number": 50}]}"#], 5);
        let config = ReplayConfig::default();
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        let summary = replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "frame 4: -");
        assert_eq!(lines[4], "frame 5: SpeedLimit 50");
        assert_eq!(
            summary,
            ReplaySummary {
                frames: 5,
                tracked: 1,
                displayed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_replay_json_output_skips_blank_lines() {
        let data = recording(&[r#"{"signs": [{"sign_type": "RegulatoryStop"}]}"#, ""], 5);
        let config = ReplayConfig {
            json: true,
            ..Default::default()
        };
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["frame"], 5);
        assert_eq!(last["signs"][0]["sign_type"], "RegulatoryStop");
        assert_eq!(last["signs"][0]["sign_number"], "Unknown");
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() {
        let data = "{\"signs\": []}\nnot json\n";
        let config = ReplayConfig::default();
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        let err = replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("line 2"));
        assert_eq!(tracker.frames(), 1);
    }

    #[tokio::test]
    async fn test_illegal_sign_aborts_replay() {
        let data = r#"{"signs": [{"sign_type": "Bogus"}]}"#;
        let config = ReplayConfig::default();
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        let err = replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("line 1"));
        assert!(out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_replay() {
        let data = recording(&[r#"{"signs": []}"#], 3);
        let config = ReplayConfig {
            rate_hz: 10,
            ..Default::default()
        };
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        let start = tokio::time::Instant::now();
        let summary = replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap();

        assert_eq!(summary.frames, 3);
        // first tick is immediate, two more at 100ms spacing
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml");
        std::fs::write(
            &path,
            "rate_hz = 10\n\n[tracker]\nmax_capacity = 3\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.rate_hz, 10);
        assert_eq!(config.tracker.max_capacity, 3);
        assert_eq!(config.tracker.expiry_deadline, 300);
        assert_eq!(config.log_level, "info");
    }

    #[tokio::test(start_paused = true)]
    async fn test_extreme_rate_does_not_stall_pacing() {
        let data = recording(&[r#"{"signs": []}"#], 3);
        let config = ReplayConfig {
            rate_hz: u32::MAX,
            ..Default::default()
        };
        let mut tracker = SignTracker::new(config.tracker.clone()).unwrap();
        let mut out = Vec::new();

        let summary = replay(data.as_bytes(), &mut tracker, &config, &mut out)
            .await
            .unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(config.frame_period(), Some(Duration::from_nanos(1)));
    }

    #[test]
    fn test_frame_period() {
        let mut config = ReplayConfig::default();
        assert_eq!(config.frame_period(), None);

        config.rate_hz = 4;
        assert_eq!(config.frame_period(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml");
        std::fs::write(&path, "rate_hz = 10\n\n[tracker]\nmax_capacity = 3\n").unwrap();

        let env = HashMap::from([
            ("SIGN_REPLAY__TRACKER__MAX_CAPACITY".to_string(), "2".to_string()),
            ("SIGN_REPLAY__LOG_LEVEL".to_string(), "debug".to_string()),
        ]);

        let config = load_config_with_env(Some(&path), Some(env)).unwrap();
        assert_eq!(config.tracker.max_capacity, 2);
        assert_eq!(config.rate_hz, 10);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml");
        std::fs::write(&path, "rate_hz = 10\n\n[tracker]\nmax_capacity = 3\n").unwrap();

        let env = HashMap::from([(
            "SIGN_REPLAY__TRACKER__MAX_CAPACITY".to_string(),
            "2".to_string(),
        )]);
        let mut config = load_config_with_env(Some(&path), Some(env)).unwrap();

        config.apply_overrides(&ConfigOverrides {
            rate_hz: Some(0),
            capacity: Some(4),
            json: true,
        });
        assert_eq!(config.tracker.max_capacity, 4);
        assert_eq!(config.rate_hz, 0);
        assert!(config.json);

        // absent flags leave loaded values alone
        let mut config = load_config_with_env(Some(&path), Some(HashMap::new())).unwrap();
        config.apply_overrides(&ConfigOverrides::default());
        assert_eq!(config.tracker.max_capacity, 3);
        assert_eq!(config.rate_hz, 10);
        assert!(!config.json);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
