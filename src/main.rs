use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use framehash::collection::file::{load_directory, output_path};
use framehash::config::{AppConfig, Mode};
use framehash::index::order_ties_by_ordinal;
use framehash::source::fingerprint_video;
use framehash::{compare, FingerprintCollection, FrameExtractor, VpTree};

fn init_logging(filter: &str) -> Result<()> {
    let subscriber = Registry::default()
        .with(EnvFilter::try_new(filter).context("invalid log filter")?)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> Result<()> {
    let conf = AppConfig::load().context("failed to load config")?;
    init_logging(&conf.log_filter)?;

    let start = Instant::now();
    log::info!("start {:?} on {:?}", conf.mode, conf.input);

    match conf.mode {
        Mode::Write => write(&conf)?,
        Mode::Read => read(&conf.input)?,
        Mode::Check => check(&conf)?,
        Mode::Vptree => vptree(&conf)?,
        Mode::Compare => {
            let other = conf
                .compare_with
                .as_deref()
                .ok_or_else(|| anyhow!("compare mode needs FRAMEHASH_COMPARE_WITH"))?;
            compare_files(&conf.input, other)?;
        }
    }

    log::info!("fin in {:?}", start.elapsed());
    Ok(())
}

fn write(conf: &AppConfig) -> Result<()> {
    let extractor = FrameExtractor::new(conf.fps);
    let collection = fingerprint_video(&extractor, &conf.input)
        .with_context(|| format!("making hash from video {:?}", conf.input))?;
    log::info!("hashing complete: {} fingerprints", collection.len());

    collection.save(&conf.input).context("writing fingerprints")?;
    Ok(())
}

fn load(path: &Path) -> Result<FingerprintCollection> {
    FingerprintCollection::load(path).with_context(|| format!("reading fingerprints from {:?}", path))
}

/// Loads `<input>.tur`, writes it back out as `new-<input>.tur` and checks
/// the copy reads back the same.
fn read(input: &Path) -> Result<()> {
    let original = load(&output_path(input))?;
    log::info!("read {} fingerprints", original.len());

    let name = input
        .file_name()
        .ok_or_else(|| anyhow!("input {:?} has no file name", input))?;
    let copy_base: PathBuf = input.with_file_name(format!("new-{}", name.to_string_lossy()));
    let written = original.save(&copy_base).context("writing copy")?;

    let copy = load(&written)?;
    log::info!("read back {} fingerprints", copy.len());
    compare(&original, &copy).context("copy differs from original")?;
    log::info!("copy matches original");
    Ok(())
}

fn check(conf: &AppConfig) -> Result<()> {
    let extractor = FrameExtractor::new(conf.fps);
    let fresh = fingerprint_video(&extractor, &conf.input)
        .with_context(|| format!("making hash from video {:?}", conf.input))?;
    let stored = load(&output_path(&conf.input))?;

    compare(&fresh, &stored).context("stored fingerprints are out of date")?;
    log::info!("{} fingerprints match the stored file", fresh.len());
    Ok(())
}

fn compare_files(left: &Path, right: &Path) -> Result<()> {
    let left_collection = load(left)?;
    let right_collection = load(right)?;
    compare(&left_collection, &right_collection)
        .with_context(|| format!("{:?} and {:?} differ", left, right))?;
    log::info!("{:?} and {:?} hold the same hashes", left, right);
    Ok(())
}

fn vptree(conf: &AppConfig) -> Result<()> {
    let fingerprints = load_directory(&conf.input).context("collecting fingerprints")?;
    if fingerprints.is_empty() {
        return Err(anyhow!("no fingerprints found in {:?}", conf.input));
    }

    let seed = conf.seed.unwrap_or_else(rand::random);
    log::info!("using seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let query = fingerprints[rng.random_range(0..fingerprints.len())];
    log::info!("random query: {:?}", query);

    let build_start = Instant::now();
    let tree = VpTree::build(fingerprints, &mut rng);
    log::info!(
        "built tree with {} nodes, depth {} in {:?}",
        tree.len(),
        tree.depth(),
        build_start.elapsed()
    );

    let mut closest = tree.nearest_n(&query, conf.neighbors);
    order_ties_by_ordinal(&mut closest, query.ordinal);
    log::info!("closest to {:?}", query);
    for neighbor in &closest {
        log::info!("\t{} {:?}", neighbor.distance, neighbor.fingerprint);
    }

    if let Some(nearest) = tree.nearest(&query) {
        log::info!("closest item: {} {:?}", nearest.distance, nearest.fingerprint);
    }
    Ok(())
}
