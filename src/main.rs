//! Generate an RSA key pair, issue a token with it, verify the token and print it
//!
//! # Usage
//!
//! Run with the stock settings, writing `private.key` and `public_base64.key` to
//! the current directory:
//! ```bash
//! cargo run --bin jwtsmith
//! ```
//!
//! Override any value with a flag or its `JWTSMITH_*` environment variable:
//! ```bash
//! cargo run --bin jwtsmith -- \
//!   --key-dir /tmp/keys \
//!   --key-bits 4096 \
//!   --algorithm RS512 \
//!   --audience SalesPlatformCampaigns,Billing \
//!   --claim-value US
//! ```

use clap::Parser;
use jwtsmith::config::{
    DEFAULT_AUDIENCE, DEFAULT_CLAIM_NAME, DEFAULT_CLAIM_VALUE, DEFAULT_ISSUER,
    DEFAULT_KEY_ALGORITHM, DEFAULT_KEY_BITS, DEFAULT_SUBJECT, DEFAULT_VALIDITY_MONTHS,
};
use jwtsmith::keys::{DEFAULT_PRIVATE_KEY, DEFAULT_PUBLIC_KEY};
use jwtsmith::{
    AlgorithmId, AudienceOutcome, FileKeyStore, KeyLocation, LENIENT_LEEWAY_SECONDS, Pipeline,
    PipelineConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

fn parse_algorithm(s: &str) -> Result<AlgorithmId, String> {
    AlgorithmId::from_str(s).map_err(|e| e.to_string())
}

/// Generate RSA keys and issue, verify and inspect a signed JWT
#[derive(Debug, Parser)]
#[command(name = "jwtsmith")]
#[command(version)]
struct Args {
    /// Directory holding the key files
    #[arg(long, env = "JWTSMITH_KEY_DIR", default_value = ".")]
    key_dir: PathBuf,

    /// Private key file name (PKCS#8 DER)
    #[arg(long, env = "JWTSMITH_PRIVATE_KEY", default_value = DEFAULT_PRIVATE_KEY)]
    private_key: String,

    /// Public key file name (Base64 X.509 SubjectPublicKeyInfo)
    #[arg(long, env = "JWTSMITH_PUBLIC_KEY", default_value = DEFAULT_PUBLIC_KEY)]
    public_key: String,

    /// Key pair algorithm
    #[arg(long, env = "JWTSMITH_KEY_ALGORITHM", default_value = DEFAULT_KEY_ALGORITHM)]
    key_algorithm: String,

    /// Key size in bits (a multiple of 512 from 2048 to 4096)
    #[arg(long, env = "JWTSMITH_KEY_BITS", default_value_t = DEFAULT_KEY_BITS)]
    key_bits: usize,

    /// Token signature algorithm (RS256, RS384 or RS512)
    #[arg(long, env = "JWTSMITH_ALGORITHM", value_parser = parse_algorithm, default_value = "RS256")]
    algorithm: AlgorithmId,

    /// Issuer (iss)
    #[arg(long, env = "JWTSMITH_ISSUER", default_value = DEFAULT_ISSUER)]
    issuer: String,

    /// Subject (sub)
    #[arg(long, env = "JWTSMITH_SUBJECT", default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// Audiences (aud), comma separated
    #[arg(long, env = "JWTSMITH_AUDIENCE", value_delimiter = ',', default_value = DEFAULT_AUDIENCE)]
    audience: Vec<String>,

    /// Custom claim name
    #[arg(long, env = "JWTSMITH_CLAIM_NAME", default_value = DEFAULT_CLAIM_NAME)]
    claim_name: String,

    /// Custom claim value
    #[arg(long, env = "JWTSMITH_CLAIM_VALUE", default_value = DEFAULT_CLAIM_VALUE)]
    claim_value: String,

    /// Token lifetime in months
    #[arg(long, env = "JWTSMITH_VALIDITY_MONTHS", default_value_t = DEFAULT_VALIDITY_MONTHS)]
    validity_months: u32,

    /// Clock skew tolerated by the per-audience check, in seconds
    #[arg(long, env = "JWTSMITH_LEEWAY", default_value_t = LENIENT_LEEWAY_SECONDS)]
    leeway: u64,
}

impl Args {
    fn into_config(self) -> (FileKeyStore, PipelineConfig) {
        let config = PipelineConfig::new()
            .key(self.key_algorithm, self.key_bits)
            .algorithm(self.algorithm)
            .location(KeyLocation::new(self.private_key, self.public_key))
            .issuer(self.issuer)
            .subject(self.subject)
            .audience(self.audience)
            .claim(self.claim_name, self.claim_value)
            .validity_months(self.validity_months)
            .lenient_leeway(self.leeway);
        (FileKeyStore::new(self.key_dir), config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (store, config) = Args::parse().into_config();

    let report = match Pipeline::new(config).run(&store) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "pipeline failed");
            return ExitCode::FAILURE;
        }
    };

    println!("JWT token: {}", report.token);
    println!("Payload structure is valid: {}", report.structure_valid);
    match &report.verification.audience {
        AudienceOutcome::Matched { audience } => {
            println!("JWT token verified for audience '{audience}'")
        }
        AudienceOutcome::NoMatch { tried } => {
            println!("JWT token not addressed to any of {tried:?}")
        }
        AudienceOutcome::Failed(e) => println!("JWT token verification failed: {e}"),
    }
    print!("{}", report.summary);

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
