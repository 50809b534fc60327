use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use lreg_crypto::ContentHasher;
use lreg_events::{EventKind, RegistryEvent};
use lreg_publish::{
    FileKvStore, KeyValueStore, PublishConfig, PublishOutcome, Publisher, UnreachableKvStore,
};
use lreg_registry::{RegistryReader, RegistryStore, RegistryWriter, SystemClock};
use lreg_types::{ContentHash, Identity, OrganizationId};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Deploy(args) => cmd_deploy(args, json),
        Command::Digest(args) => cmd_digest(args, json),
        Command::Demo(args) => cmd_demo(args, json),
    }
}

fn resolve_config(args: &DeployArgs) -> anyhow::Result<PublishConfig> {
    let mut config = PublishConfig::load(args.config.as_deref())?;
    if let Some(namespace) = &args.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(network) = &args.network {
        config.network = network.clone();
    }
    if let Some(cache) = &args.cache {
        config.cache_path = Some(cache.clone());
    }
    if let Some(attempts) = args.max_attempts {
        config.max_attempts = attempts;
    }
    Ok(config)
}

/// Create the registry and hand its address to the configured cache.
fn deploy(
    deployer: &Identity,
    nonce: u64,
    config: &PublishConfig,
) -> (RegistryStore, PublishOutcome) {
    let store = RegistryStore::deploy(deployer.clone(), nonce, Arc::new(SystemClock));
    let outcome = match &config.cache_path {
        Some(path) => publish_with(FileKvStore::new(path), config, &store, deployer),
        None => publish_with(UnreachableKvStore::not_configured(), config, &store, deployer),
    };
    (store, outcome)
}

fn publish_with<S: KeyValueStore>(
    kv: S,
    config: &PublishConfig,
    store: &RegistryStore,
    deployer: &Identity,
) -> PublishOutcome {
    Publisher::new(kv, config).publish(&store.address(), deployer)
}

fn deploy_json(outcome: &PublishOutcome) -> anyhow::Result<String> {
    let body = match outcome {
        PublishOutcome::Published { record, .. } => {
            json!({ "published": true, "record": record })
        }
        PublishOutcome::Fallback { record, line, error } => json!({
            "published": false,
            "record": record,
            "fallback": line,
            "error": error.to_string(),
        }),
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

fn cmd_deploy(args: DeployArgs, json: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let deployer = Identity::named(&args.deployer);
    let (store, outcome) = deploy(&deployer, args.nonce, &config);

    if json {
        println!("{}", deploy_json(&outcome)?);
        return Ok(());
    }

    println!("{} Registry deployed", "✓".green().bold());
    println!("  Address:  {}", store.address().to_string().cyan());
    println!("  Owner:    {}", store.owner().short_id().yellow());
    println!("  Network:  {}", config.network);
    match outcome {
        PublishOutcome::Published {
            address_key,
            info_key,
            ..
        } => {
            println!("  Published {} and {}", address_key.bold(), info_key.bold());
        }
        PublishOutcome::Fallback { line, error, .. } => {
            println!("{} Address not published: {}", "!".yellow().bold(), error);
            println!("  Set this in downstream configuration:");
            println!("  {line}");
        }
    }
    Ok(())
}

fn digest_file(path: &Path, record: bool) -> anyhow::Result<ContentHash> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let hasher = if record {
        ContentHasher::RECORD
    } else {
        ContentHasher::DOCUMENT
    };
    Ok(hasher.hash_reader(BufReader::new(file))?)
}

fn digest_json(path: &Path, hash: &ContentHash) -> String {
    json!({ "path": path.display().to_string(), "hash": hash.to_hex() }).to_string()
}

fn cmd_digest(args: DigestArgs, json: bool) -> anyhow::Result<()> {
    let hash = digest_file(&args.path, args.record)?;
    if json {
        println!("{}", digest_json(&args.path, &hash));
    } else {
        println!("{}  {}", hash.to_hex().yellow(), args.path.display());
    }
    Ok(())
}

/// Summary of a demo run, for assertions and JSON output.
struct DemoReport {
    store: RegistryStore,
    sample: ContentHash,
    steps: Vec<(String, bool)>,
}

fn run_demo(org: OrganizationId) -> anyhow::Result<DemoReport> {
    let owner = Identity::named("demo-owner");
    let registrant = Identity::named("demo-registrant");
    let outsider = Identity::named("demo-outsider");
    let store = RegistryStore::new(owner.clone());
    let sample = ContentHasher::DOCUMENT.hash(b"certificate #1001");
    let mut steps = Vec::new();

    let mut step = |label: &str, result: Result<(), lreg_registry::RegistryError>| {
        let ok = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(reason = %e.reason(), "demo step rejected");
                false
            }
        };
        steps.push((label.to_string(), ok));
    };

    step(
        "outsider registers sample",
        store.register_hash(&outsider, sample, org),
    );
    step(
        "owner authorizes registrant",
        store.set_authorized_registrant(&owner, &registrant, true),
    );
    step(
        "registrant registers sample",
        store.register_hash(&registrant, sample, org),
    );
    step(
        "owner registers sample again",
        store.register_hash(&owner, sample, OrganizationId::new(org.get() + 1)),
    );
    step(
        "owner revokes registrant",
        store.set_authorized_registrant(&owner, &registrant, false),
    );
    step(
        "registrant registers another hash",
        store.register_hash(&registrant, ContentHash::of(b"certificate #1002"), org),
    );

    store.verify_journal()?;
    Ok(DemoReport {
        store,
        sample,
        steps,
    })
}

fn describe_event(event: &RegistryEvent) -> String {
    match &event.kind {
        EventKind::HashRegistered {
            hash,
            organization_id,
            registered_by,
        } => format!(
            "registered {} ({}) by {}",
            hash.short_hex(),
            organization_id,
            registered_by.short_id()
        ),
        EventKind::RegistrantUpdated {
            identity,
            authorized,
            ..
        } => format!("registrant {} authorized={}", identity.short_id(), authorized),
        EventKind::OwnershipTransferred {
            previous_owner,
            new_owner,
        } => format!(
            "owner {} -> {}",
            previous_owner.short_id(),
            new_owner.short_id()
        ),
    }
}

fn demo_json(report: &DemoReport) -> anyhow::Result<String> {
    let steps: Vec<_> = report
        .steps
        .iter()
        .map(|(label, ok)| json!({ "step": label, "ok": ok }))
        .collect();
    let body = json!({
        "address": report.store.address().to_hex(),
        "steps": steps,
        "verification": report.store.verify_hash(&report.sample),
        "entry": report.store.entry(&report.sample),
        "events": report.store.events().len(),
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

fn cmd_demo(args: DemoArgs, json: bool) -> anyhow::Result<()> {
    let report = run_demo(OrganizationId::new(args.org))?;

    if json {
        println!("{}", demo_json(&report)?);
        return Ok(());
    }

    println!("Registry {}", report.store.address().to_string().cyan());
    for (label, ok) in &report.steps {
        let mark = if *ok { "✓".green() } else { "✗".red() };
        println!("  {mark} {label}");
    }
    let verification = report.store.verify_hash(&report.sample);
    println!(
        "Sample {}: exists={} timestamp={}",
        report.sample.short_hex().yellow(),
        verification.exists,
        verification.timestamp
    );
    println!("Journal ({} events, {}):", report.store.events().len(), "verified".green());
    for event in report.store.events() {
        println!(
            "  #{} {} {}",
            event.seq,
            event.short_hash().dimmed(),
            describe_event(&event)
        );
    }
    Ok(())
}
