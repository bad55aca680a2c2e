//! Command-line interface for `xorwow-jump`.

#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jump_gen::{
    jump_matrix, jump_poly, write_artifact, Generator, GeneratorConfig, JumpArtifact, JumpKind,
    PackedMatrix, PackedPoly, DEFAULT_EXP, DEFAULT_SIZE,
};
use jump_runtime::{apply_matrix, apply_poly, JumpRuntime};
use num_bigint::BigUint;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xorwow_core::{advance, Shifts, State, XorwowParams};

/// Largest distance `check` verifies by stepping the recurrence directly.
const DIRECT_STEP_LIMIT: u64 = 1 << 16;

/// xorwow jump-ahead constant generator.
#[derive(Parser)]
#[command(
    name = "xorwow-jump",
    version,
    author,
    about = "Jump matrices and jump polynomials for the xorwow generator"
)]
struct Cli {
    #[command(flatten)]
    params: ParamsArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Recurrence parameters (production xorwow by default).
#[derive(Args)]
struct ParamsArgs {
    /// Bits per state word.
    #[arg(long, global = true, default_value_t = 32)]
    word_bits: u32,
    /// Number of state words.
    #[arg(long, global = true, default_value_t = 5)]
    words: usize,
    /// Shift triple `a,b,c`.
    #[arg(long, global = true, value_parser = parse_shifts, default_value = "2,1,4")]
    shifts: Shifts,
}

impl ParamsArgs {
    fn params(&self) -> Result<XorwowParams> {
        XorwowParams::new(self.word_bits, self.words, self.shifts).context("invalid parameters")
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    /// Precomputed transition-matrix powers.
    Matrix,
    /// Jump polynomials.
    Poly,
}

impl From<TypeArg> for JumpKind {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Matrix => JumpKind::Matrix,
            TypeArg::Poly => JumpKind::Poly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the `jump` and `jump_subsequence` tables.
    Gen {
        /// Whether to generate jump matrices or polynomials.
        #[arg(short = 't', long = "type", value_enum, default_value_t = TypeArg::Poly)]
        kind: TypeArg,
        /// Entries per table.
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        count: usize,
        /// Ratio between consecutive jump distances.
        #[arg(long, default_value_t = DEFAULT_EXP)]
        exp: u32,
        /// Write the C arrays here instead of stdout.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Also save the computed tables in binary form.
        #[arg(long, value_name = "FILE")]
        artifact: Option<PathBuf>,
    },
    /// Re-emit the C arrays from a saved artifact.
    Emit {
        /// Path to the saved artifact.
        #[arg(long, value_name = "FILE")]
        artifact: PathBuf,
        /// Write the C arrays here instead of stdout.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the characteristic polynomial of the transition matrix.
    Charpoly,
    /// Verify that jump matrices and jump polynomials agree.
    Check {
        /// Entries per table.
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        count: usize,
        /// Random states tested per entry.
        #[arg(long, default_value_t = 4)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Jump a single state ahead.
    Advance {
        /// State words as hex, 8 digits per word, oldest word first.
        #[arg(long, value_name = "HEX")]
        state: String,
        /// Jump distance, in decimal or as `base^exp`.
        #[arg(long, value_parser = parse_distance)]
        distance: BigUint,
        /// Representation used to jump.
        #[arg(short = 't', long = "type", value_enum, default_value_t = TypeArg::Poly)]
        kind: TypeArg,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let params = cli.params.params()?;
    match cli.command {
        Commands::Gen {
            kind,
            count,
            exp,
            out,
            artifact,
        } => cmd_gen(
            params,
            kind.into(),
            count,
            exp,
            out.as_deref(),
            artifact.as_deref(),
        ),
        Commands::Emit { artifact, out } => cmd_emit(&artifact, out.as_deref()),
        Commands::Charpoly => cmd_charpoly(params),
        Commands::Check {
            count,
            samples,
            seed,
        } => cmd_check(params, count, samples, seed),
        Commands::Advance {
            state,
            distance,
            kind,
        } => cmd_advance(params, &state, &distance, kind.into()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_gen(
    params: XorwowParams,
    kind: JumpKind,
    count: usize,
    exp: u32,
    out: Option<&Path>,
    artifact_path: Option<&Path>,
) -> Result<()> {
    let config = GeneratorConfig {
        params,
        kind,
        size: count,
        exp,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(config).context("build generator")?;
    let artifact = generator.generate().context("compute jump tables")?;
    if let Some(path) = artifact_path {
        let bytes = artifact.to_bytes().context("serialize artifact")?;
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "saved artifact");
    }
    emit(&artifact, out)
}

fn cmd_emit(artifact_path: &Path, out: Option<&Path>) -> Result<()> {
    let artifact = load_artifact(artifact_path)?;
    emit(&artifact, out)
}

fn cmd_charpoly(params: XorwowParams) -> Result<()> {
    let config = GeneratorConfig {
        params,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(config).context("build generator")?;
    let charpoly = generator.charpoly();
    let degree = charpoly.degree().unwrap_or(0);
    println!("degree: {degree}");
    println!("poly: {}", hex::encode(charpoly.to_be_bytes()));
    Ok(())
}

fn cmd_check(params: XorwowParams, count: usize, samples: usize, seed: Option<u64>) -> Result<()> {
    let build = |kind: JumpKind| -> Result<JumpRuntime> {
        let config = GeneratorConfig {
            params,
            kind,
            size: count,
            ..GeneratorConfig::default()
        };
        let artifact = Generator::new(config)
            .and_then(|g| g.generate())
            .with_context(|| format!("compute {kind} tables"))?;
        Ok(JumpRuntime::new(artifact))
    };
    let matrices = build(JumpKind::Matrix)?;
    let polys = build(JumpKind::Poly)?;
    let mut rng = seeded_rng(seed);

    for table in &polys.artifact().tables {
        let by_matrix = matrices.table(&table.name)?;
        let by_poly = polys.table(&table.name)?;
        let mut direct = 0usize;
        for index in 0..by_poly.len() {
            let distance = by_poly.distance(index);
            let small = u64::try_from(&distance)
                .ok()
                .filter(|d| *d <= DIRECT_STEP_LIMIT);
            for _ in 0..samples {
                let state = random_state(&params, &mut rng);
                let expected = by_matrix.apply_entry(index, &state)?;
                if by_poly.apply_entry(index, &state)? != expected {
                    bail!("{}[{index}]: matrix and polynomial jumps disagree", table.name);
                }
                if let Some(steps) = small {
                    if advance(&params, &state, steps) != expected {
                        bail!("{}[{index}]: jump differs from {steps} direct steps", table.name);
                    }
                    direct += 1;
                }
            }
        }
        debug!(table = %table.name, direct, "direct-step comparisons");
        println!("{}: {} entries ok", table.name, by_poly.len());
    }
    Ok(())
}

fn cmd_advance(
    params: XorwowParams,
    state_hex: &str,
    distance: &BigUint,
    kind: JumpKind,
) -> Result<()> {
    let state = parse_state_hex(&params, state_hex)?;
    let generator = Generator::new(GeneratorConfig {
        params,
        ..GeneratorConfig::default()
    })
    .context("build generator")?;
    let jumped = match kind {
        JumpKind::Matrix => {
            let matrix = jump_matrix(generator.transition().matrix(), distance);
            apply_matrix(&params, &PackedMatrix::from_matrix(&params, &matrix), &state)
        }
        JumpKind::Poly => {
            let poly = jump_poly(generator.charpoly(), distance);
            let packed = PackedPoly::from_poly(&params, &poly).context("pack jump polynomial")?;
            apply_poly(&params, &packed, &state)
        }
    };
    println!("{}", format_state_hex(&jumped));
    Ok(())
}

fn emit(artifact: &JumpArtifact, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let mut file =
                fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_artifact(&mut file, artifact).with_context(|| format!("write {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_artifact(&mut lock, artifact).context("write stdout")?;
            lock.flush().context("flush stdout")
        }
    }
}

fn load_artifact(path: &Path) -> Result<JumpArtifact> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    JumpArtifact::from_bytes(&bytes).context("deserialize artifact")
}

fn parse_shifts(value: &str) -> Result<Shifts, String> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [a, b, c] => Ok(Shifts::new(*a, *b, *c)),
        _ => Err(format!("expected three comma-separated shifts, got `{value}`")),
    }
}

fn parse_distance(value: &str) -> Result<BigUint, String> {
    let value = value.trim();
    match value.split_once('^') {
        Some((base, exp)) => {
            let base: BigUint = base.trim().parse().map_err(|e| format!("`{base}`: {e}"))?;
            let exp: u32 = exp.trim().parse().map_err(|e| format!("`{exp}`: {e}"))?;
            Ok(base.pow(exp))
        }
        None => value.parse().map_err(|e| format!("`{value}`: {e}")),
    }
}

fn parse_state_hex(params: &XorwowParams, hex_str: &str) -> Result<State> {
    let bytes = hex::decode(hex_str.trim()).context("decode state hex")?;
    if bytes.len() != params.words * 4 {
        bail!(
            "state must be {} bytes ({} hex characters)",
            params.words * 4,
            params.words * 8
        );
    }
    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    State::from_words(params, &words).context("invalid state")
}

fn format_state_hex(state: &State) -> String {
    let bytes: Vec<u8> = state.words().iter().flat_map(|w| w.to_be_bytes()).collect();
    hex::encode(bytes)
}

fn random_state(params: &XorwowParams, rng: &mut impl RngCore) -> State {
    let words: Vec<u32> = (0..params.words)
        .map(|_| rng.next_u32() & params.word_mask())
        .collect();
    State::from_words(params, &words).expect("masked words fit the word width")
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
