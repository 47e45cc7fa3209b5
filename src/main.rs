// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use veraison_integ::config::Config;
use veraison_integ::generate::{corrupt_signature, ArtifactGenerator, ExpectedResults};
use veraison_integ::policy::{check_policy, check_policy_list, Policy};
use veraison_integ::result::{
    check_trust_values, compare_ear, load_expected, ResultDecoder, SessionResponse,
    VerificationKey, AFFIRMING_CLAIMS,
};
use veraison_integ::scheme::{KeyRef, Scheme};
use veraison_integ::store::StoreResetter;
use veraison_integ::tool::ProcessToolRunner;

#[derive(Parser)]
#[command(author, version, long_about = None,
    about = "Generate attestation test vectors and check Veraison results")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root of the generated artifacts tree (overrides the configuration)
    #[arg(short, long, global = true)]
    generated_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Evidence(EvidenceArgs),
    Endorsements(EndorsementsArgs),
    CcaEndorsements(CcaEndorsementsArgs),
    Expected(ExpectedArgs),
    SaveResult(SaveResultArgs),
    CheckResult(CheckResultArgs),
    CheckPolicy(CheckPolicyArgs),
    CheckPolicyList(CheckPolicyListArgs),
    Corrupt(CorruptArgs),
    Reset(ResetArgs),
}

#[derive(Debug, clap::Args)]
#[command(about = "Generate signed evidence from the {scheme}.{label} claims template")]
struct EvidenceArgs {
    #[arg(short, long)]
    scheme: Scheme,

    #[arg(short, long)]
    label: String,

    /// Session nonce, as returned by the service
    #[arg(short, long)]
    nonce: Option<String>,

    /// Signing key name(s): `key` or `iak,rak`
    #[arg(short, long)]
    keys: String,

    /// Mark the artifact as bound to a nonce handed out by the service
    #[arg(long)]
    server_nonce: bool,

    /// Alter the measurement of this PSA software component
    #[arg(long)]
    tamper_swcomp: Option<usize>,

    /// Flip a bit of the generated token's signature
    #[arg(long)]
    corrupt_signature: bool,
}

#[derive(Debug, clap::Args)]
#[command(about = "Generate the corim-{scheme}-{tag}.cbor endorsements")]
struct EndorsementsArgs {
    #[arg(short, long)]
    scheme: Scheme,

    #[arg(short, long)]
    tag: String,

    /// CoRIM template name followed by CoMID template names, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    parts: Vec<String>,

    /// Sign the CoRIM
    #[arg(long)]
    sign: bool,
}

#[derive(Debug, clap::Args)]
#[command(about = "Generate the platform and realm CoRIMs of an end-to-end CCA scenario")]
struct CcaEndorsementsArgs {
    #[arg(short, long)]
    name: String,

    #[arg(long)]
    sign: bool,
}

#[derive(Debug, clap::Args)]
#[command(about = "Materialise the expected result of a server-nonce scenario")]
struct ExpectedArgs {
    #[arg(short, long)]
    scheme: Scheme,

    #[arg(short, long)]
    label: String,

    /// Session response to take the nonce from
    #[arg(short, long, conflicts_with = "nonce")]
    response: Option<PathBuf>,

    /// Session nonce, as returned by the service
    #[arg(short, long)]
    nonce: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(about = "Save the token and decoded claims of a session response")]
struct SaveResultArgs {
    #[arg(short, long)]
    scheme: Scheme,

    #[arg(short, long)]
    label: String,

    #[arg(short, long, default_value = "response.json")]
    response: PathBuf,
}

#[derive(Debug, clap::Args)]
#[command(about = "Authenticate a session response's result and compare it with the expected one")]
struct CheckResultArgs {
    #[arg(short, long, default_value = "response.json")]
    response: PathBuf,

    #[arg(short, long)]
    expected: PathBuf,

    /// Verifier public key (JWK)
    #[arg(short, long)]
    key: PathBuf,

    /// Also require every trust claim to be an affirming one
    #[arg(long)]
    affirming: bool,
}

#[derive(Debug, clap::Args)]
#[command(about = "Check a policy resource")]
struct CheckPolicyArgs {
    #[arg(short, long, default_value = "policy.json")]
    policy: PathBuf,

    #[arg(short, long)]
    active: Option<bool>,

    #[arg(short, long)]
    name: Option<String>,

    /// File holding the expected rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
#[command(about = "Check a list of policy resources")]
struct CheckPolicyListArgs {
    #[arg(short, long, default_value = "policies.json")]
    policies: PathBuf,

    /// Exactly one policy must be active (otherwise none)
    #[arg(long)]
    have_active: bool,
}

#[derive(Debug, clap::Args)]
#[command(about = "Flip a bit of an evidence token's signature, in place")]
struct CorruptArgs {
    #[arg(short, long)]
    scheme: Scheme,

    #[arg(short, long)]
    token: PathBuf,
}

#[derive(Debug, clap::Args)]
#[command(about = "Clear the endorsement and policy stores")]
struct ResetArgs {}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (op, r) = match &cli.command {
        Command::Evidence(args) => ("evidence generation", evidence(&config, args)),
        Command::Endorsements(args) => ("endorsements generation", endorsements(&config, args)),
        Command::CcaEndorsements(args) => {
            ("endorsements generation", cca_endorsements(&config, args))
        }
        Command::Expected(args) => ("expected result generation", expected(&config, args)),
        Command::SaveResult(args) => ("result saving", save_result(&config, args)),
        Command::CheckResult(args) => ("result check", check_result(&config, args)),
        Command::CheckPolicy(args) => ("policy check", policy(args)),
        Command::CheckPolicyList(args) => ("policy list check", policy_list(args)),
        Command::Corrupt(args) => ("signature corruption", corrupt(args)),
        Command::Reset(_) => ("store reset", reset(&config)),
    };

    match r {
        Ok(()) => {
            println!("{op} successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{op} failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load_file(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.generated_dir {
        config.generated_dir = dir.clone();
    }

    Ok(config)
}

fn evidence(config: &Config, args: &EvidenceArgs) -> Result<(), Box<dyn Error>> {
    let g = ArtifactGenerator::new(config, ProcessToolRunner::new());
    let keys = KeyRef::parse(&args.keys);
    let nonce = args.nonce.as_deref();

    let a = match args.tamper_swcomp {
        Some(i) => g.evidence_with(args.scheme, &args.label, nonce, &keys, args.server_nonce, |c| {
            c.tamper_measurement(i)
        })?,
        None => g.evidence_for(args.scheme, &args.label, nonce, &keys, args.server_nonce)?,
    };

    if args.corrupt_signature {
        a.corrupt_signature()?;
    }

    println!("{}", a.path.display());

    Ok(())
}

fn endorsements(config: &Config, args: &EndorsementsArgs) -> Result<(), Box<dyn Error>> {
    let g = ArtifactGenerator::new(config, ProcessToolRunner::new());

    let a = g.scheme_endorsements(args.scheme, &args.tag, &args.parts, args.sign)?;

    println!("{}", a.path.display());

    Ok(())
}

fn cca_endorsements(config: &Config, args: &CcaEndorsementsArgs) -> Result<(), Box<dyn Error>> {
    let g = ArtifactGenerator::new(config, ProcessToolRunner::new());

    for a in g.cca_end_to_end_endorsements(&args.name, args.sign)? {
        println!("{}", a.path.display());
    }

    Ok(())
}

fn expected(config: &Config, args: &ExpectedArgs) -> Result<(), Box<dyn Error>> {
    let nonce = match &args.response {
        Some(path) => SessionResponse::load(path)?.nonce,
        None => args.nonce.clone(),
    };

    let p = ExpectedResults::new(&config.layout()).from_response(
        args.scheme,
        &args.label,
        nonce.as_deref(),
    )?;

    println!("{}", p.display());

    Ok(())
}

fn save_result(config: &Config, args: &SaveResultArgs) -> Result<(), Box<dyn Error>> {
    let response = SessionResponse::load(&args.response)?;

    let (jwt, json) =
        ResultDecoder::new(&config.layout()).save(&response, args.scheme, &args.label)?;

    println!("{}\n{}", jwt.display(), json.display());

    Ok(())
}

fn check_result(config: &Config, args: &CheckResultArgs) -> Result<(), Box<dyn Error>> {
    let response = SessionResponse::load(&args.response)?;
    let key = VerificationKey::load(&args.key, config.result_alg)?;

    let ear = ResultDecoder::new(&config.layout()).decode(&response, &key)?;
    let expected = load_expected(&args.expected)?;

    compare_ear(&ear, &expected)?;

    if args.affirming {
        for name in expected.keys() {
            check_trust_values(name, ear.submod(name)?, &AFFIRMING_CLAIMS)?;
        }
    }

    Ok(())
}

fn policy(args: &CheckPolicyArgs) -> Result<(), Box<dyn Error>> {
    let p = Policy::from_json(&fs::read_to_string(&args.policy)?)?;

    check_policy(&p, args.active, args.name.as_deref(), args.rules.as_deref())?;

    Ok(())
}

fn policy_list(args: &CheckPolicyListArgs) -> Result<(), Box<dyn Error>> {
    let policies = Policy::list_from_json(&fs::read_to_string(&args.policies)?)?;

    check_policy_list(&policies, args.have_active)?;

    Ok(())
}

fn corrupt(args: &CorruptArgs) -> Result<(), Box<dyn Error>> {
    let token = fs::read(&args.token)?;

    fs::write(&args.token, corrupt_signature(args.scheme, &token)?)?;

    Ok(())
}

fn reset(config: &Config) -> Result<(), Box<dyn Error>> {
    StoreResetter::new(config, ProcessToolRunner::new()).reset()?;

    Ok(())
}
