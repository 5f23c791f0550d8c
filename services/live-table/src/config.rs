use std::net::IpAddr;

use clap::Parser;
use luckyeight_execution::PhaseConfig;
use luckyeight_types::{DEFAULT_FIRST_ROUND, DEFAULT_HISTORY_CAPACITY};

#[derive(Parser, Debug)]
#[command(about = "Serve a luckyeight round engine over HTTP and WebSocket")]
pub struct Args {
    /// Host interface to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short, long, default_value_t = 9123)]
    pub port: u16,

    /// Base URL of the config provider and ledger backend (built-in defaults when omitted).
    #[arg(long)]
    pub config_url: Option<String>,

    #[arg(long, default_value = "local-player")]
    pub player_id: String,

    #[arg(long, default_value_t = 1_000_000)]
    pub initial_balance: u64,

    /// Attempts per config endpoint before falling back to defaults.
    #[arg(long, default_value_t = 3)]
    pub fetch_attempts: usize,

    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_capacity: usize,

    /// Number assigned to the first round.
    #[arg(long, default_value_t = DEFAULT_FIRST_ROUND)]
    pub round_seed: u64,

    /// Seed for deterministic draws (entropy when omitted).
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

fn read_ms(key: &str, fallback: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(fallback)
}

/// Phase timing with `LIVE_TABLE_*_MS` overrides applied.
pub fn phase_config_from_env() -> PhaseConfig {
    let defaults = PhaseConfig::default();
    PhaseConfig {
        banner_ms: read_ms("LIVE_TABLE_BANNER_MS", defaults.banner_ms),
        get_ready_ms: read_ms("LIVE_TABLE_GET_READY_MS", defaults.get_ready_ms),
        betting_ms: read_ms("LIVE_TABLE_BETTING_MS", defaults.betting_ms),
        drawing_ms: read_ms("LIVE_TABLE_DRAWING_MS", defaults.drawing_ms),
        jackpot_drawing_ms: read_ms("LIVE_TABLE_JACKPOT_DRAWING_MS", defaults.jackpot_drawing_ms),
        showtime_ms: read_ms("LIVE_TABLE_SHOWTIME_MS", defaults.showtime_ms),
        jackpot_showtime_ms: read_ms(
            "LIVE_TABLE_JACKPOT_SHOWTIME_MS",
            defaults.jackpot_showtime_ms,
        ),
        tick_ms: read_ms("LIVE_TABLE_TICK_MS", defaults.tick_ms),
        hint_ceiling_ms: read_ms("LIVE_TABLE_HINT_CEILING_MS", defaults.hint_ceiling_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["live-table"]);
        assert_eq!(args.port, 9123);
        assert_eq!(args.player_id, "local-player");
        assert_eq!(args.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(args.round_seed, DEFAULT_FIRST_ROUND);
        assert!(args.config_url.is_none());
        assert!(args.rng_seed.is_none());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "live-table",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--config-url",
            "http://config.local/api",
            "--initial-balance",
            "500",
            "--rng-seed",
            "7",
            "--round-seed",
            "1000",
        ]);
        assert_eq!(args.host.to_string(), "127.0.0.1");
        assert_eq!(args.port, 8080);
        assert_eq!(args.config_url.as_deref(), Some("http://config.local/api"));
        assert_eq!(args.initial_balance, 500);
        assert_eq!(args.rng_seed, Some(7));
        assert_eq!(args.round_seed, 1_000);
    }

    #[test]
    fn env_overrides_phase_timing() {
        std::env::set_var("LIVE_TABLE_JACKPOT_SHOWTIME_MS", "9000");
        std::env::set_var("LIVE_TABLE_BANNER_MS", "not a number");
        let phases = phase_config_from_env();
        assert_eq!(phases.jackpot_showtime_ms, 9_000);
        assert_eq!(phases.banner_ms, PhaseConfig::default().banner_ms);
        std::env::remove_var("LIVE_TABLE_JACKPOT_SHOWTIME_MS");
        std::env::remove_var("LIVE_TABLE_BANNER_MS");
    }
}
