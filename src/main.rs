//! Whitelist Merkle CLI
//!
//! Offline setup tool: builds the root and per-entry proofs from a
//! whitelist file, looks proofs up, and checks claims.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use whitelist_merkle::{
    config::TreeConfig,
    core::{parse_hash32, to_hex},
    encode_leaf, verify, Address, LeafOrder, OddNodePolicy, ProofBook, TokenId, Whitelist,
    VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "whitelist-merkle")]
#[command(about = "Merkle root and proof tooling for identifier/address whitelists")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the root and a proof for every whitelist entry
    Build {
        /// Whitelist JSON (record array or identifier -> address map)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the proof book
        #[arg(short, long)]
        output: PathBuf,

        /// Odd node policy (carry-up | duplicate), overrides MERKLE_ODD_NODES
        #[arg(long)]
        odd_nodes: Option<OddNodePolicy>,

        /// Leaf order (sorted | as-given), overrides MERKLE_LEAF_ORDER
        #[arg(long)]
        leaf_order: Option<LeafOrder>,
    },

    /// Print the proof for one entry from a proof book
    Prove {
        /// Proof book written by `build`
        #[arg(short, long)]
        book: PathBuf,

        /// Entry identifier (decimal or 0x hex)
        #[arg(long)]
        identifier: TokenId,

        /// Entry account
        #[arg(long)]
        account: Address,
    },

    /// Check a claim against a root
    Verify {
        /// Published root (hex)
        #[arg(short, long)]
        root: String,

        /// Claimed identifier (decimal or 0x hex)
        #[arg(long)]
        identifier: TokenId,

        /// Claiming account
        #[arg(long)]
        account: Address,

        /// Proof elements, leaf to root (repeat or comma-separate)
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Whitelist Merkle v{}", VERSION);

    match cli.command {
        Commands::Build {
            input,
            output,
            odd_nodes,
            leaf_order,
        } => build(input, output, odd_nodes, leaf_order),
        Commands::Prove {
            book,
            identifier,
            account,
        } => prove(book, identifier, account),
        Commands::Verify {
            root,
            identifier,
            account,
            proof,
        } => check(&root, identifier, account, &proof),
    }
}

fn build(
    input: PathBuf,
    output: PathBuf,
    odd_nodes: Option<OddNodePolicy>,
    leaf_order: Option<LeafOrder>,
) -> Result<ExitCode> {
    let mut config = TreeConfig::from_env().context("Invalid tree configuration")?;
    if let Some(policy) = odd_nodes {
        config = config.with_odd_nodes(policy);
    }
    if let Some(order) = leaf_order {
        config = config.with_leaf_order(order);
    }

    info!("Reading whitelist from {:?}...", input);
    let whitelist = Whitelist::load(&input).context("Failed to load whitelist")?;
    info!(
        "Total entries: {} (odd nodes: {}, leaf order: {})",
        whitelist.len(),
        config.odd_nodes,
        config.leaf_order
    );

    let book = ProofBook::generate(&whitelist, config).context("Failed to build merkle tree")?;

    info!("Writing proof book to {:?}...", output);
    book.save(&output).context("Failed to write proof book")?;

    println!("{}", book.root_hex());
    Ok(ExitCode::SUCCESS)
}

fn prove(book: PathBuf, identifier: TokenId, account: Address) -> Result<ExitCode> {
    let book = ProofBook::load(&book).context("Failed to load proof book")?;
    let record = book
        .find(&identifier, &account)
        .with_context(|| format!("Entry {} -> {} not found in proof book", identifier, account))?;

    let proof: Vec<String> = record.proof.iter().map(to_hex).collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&proof).context("Failed to serialize proof")?
    );
    Ok(ExitCode::SUCCESS)
}

fn check(root: &str, identifier: TokenId, account: Address, proof: &[String]) -> Result<ExitCode> {
    let root = parse_hash32(root).context("Invalid root")?;
    let proof = proof
        .iter()
        .enumerate()
        .map(|(i, s)| parse_hash32(s).with_context(|| format!("Invalid proof element {}", i)))
        .collect::<Result<Vec<_>>>()?;

    let leaf = encode_leaf(&identifier, &account);
    if verify(&leaf, &proof, &root) {
        println!("eligible");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("Leaf {} does not verify against {}", to_hex(leaf), to_hex(root));
        println!("not eligible");
        Ok(ExitCode::FAILURE)
    }
}
