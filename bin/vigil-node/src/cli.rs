use clap::Parser;
use tracing::Level;

/// Mirrors the teacher's `1..=5` verbosity convention (error..trace), kept
/// to a single flag since this binary has no subcommands.
#[derive(Debug, Clone, Copy)]
pub struct Verbosity(pub u8);

impl Verbosity {
    pub fn level(self) -> Level {
        match self.0 {
            1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.parse().map_err(|_| format!("not a number: {s}"))?;
        if !(1..=5).contains(&value) {
            return Err("verbosity must be between 1 and 5".to_string());
        }
        Ok(Verbosity(value))
    }
}

#[derive(Debug, Parser)]
#[command(author, about = "Demo wiring of the attestation pool and status handshake")]
pub struct Cli {
    /// Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace).
    #[arg(short, long, default_value = "3")]
    pub verbosity: Verbosity,

    /// Our fork digest, as 8 hex characters (e.g. `deadbeef`).
    #[arg(long, default_value = "00000000")]
    pub fork_digest: String,

    /// Pruning horizon for the attestation cache, in slots.
    #[arg(long, default_value_t = 3)]
    pub slots_retained: u64,

    /// Bad-response count at which a peer is permanently banned.
    #[arg(long, default_value_t = 5)]
    pub bad_response_threshold: u32,
}

impl Cli {
    pub fn parsed_fork_digest(&self) -> Result<[u8; 4], String> {
        let bytes = hex_to_bytes(&self.fork_digest)?;
        bytes
            .try_into()
            .map_err(|_| "fork digest must be exactly 4 bytes".to_string())
    }
}

fn hex_to_bytes(s: &str) -> Result<Vec<u8>, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() % 2 != 0 {
        return Err("hex string must have an even length".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|err| err.to_string()))
        .collect()
}
