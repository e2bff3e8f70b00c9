//! `ned2oc translate`: run the translators over one device and write the
//! per-feature source, leftover and OpenConfig files plus the notes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config_tree_core::{parse_file, write_file};
use ned2oc::context::TranslationContext;
use ned2oc::mappings::{default_xe_mappings, load_xe_mappings, XeMappings};
use ned2oc::notes::Notes;
use ned2oc::report::render_notes;
use ned2oc::summary::{render as render_summary, summarize, TranslationSummary};
use ned2oc::translate::{translate_device, Feature};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{OutputFormat, TranslateArgs};
use crate::path_guard::ensure_outputs_distinct;

/// Files written for one feature family.
#[derive(Debug, Serialize)]
struct FeatureFiles {
    feature: Feature,
    ned_configuration: PathBuf,
    remaining: PathBuf,
    openconfig: PathBuf,
}

impl FeatureFiles {
    fn new(dir: &Path, device: &str, feature: Feature) -> Self {
        let stem = feature.file_stem();
        Self {
            feature,
            ned_configuration: dir.join(format!("{device}_ned_configuration_{stem}.json")),
            remaining: dir.join(format!("{device}_ned_configuration_remaining_{stem}.json")),
            openconfig: dir.join(format!("{device}_openconfig_{stem}.json")),
        }
    }

    fn paths(&self) -> [&PathBuf; 3] {
        [&self.ned_configuration, &self.remaining, &self.openconfig]
    }
}

#[derive(Debug, Serialize)]
struct TranslateReport<'a> {
    device: &'a str,
    summary: TranslationSummary,
    files: &'a [FeatureFiles],
    notes_file: &'a Path,
    notes: &'a Notes,
}

pub fn run_translate(args: TranslateArgs) -> Result<()> {
    let before = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let device = device_name(&args);
    let mut features: Vec<Feature> = Vec::new();
    for feature in args.features.iter().map(|&f| Feature::from(f)) {
        if !features.contains(&feature) {
            features.push(feature);
        }
    }
    if features.is_empty() {
        features = Feature::ALL.to_vec();
    }

    let files: Vec<FeatureFiles> = features
        .iter()
        .map(|&feature| FeatureFiles::new(&args.output_dir, &device, feature))
        .collect();
    let notes_file = args
        .output_dir
        .join(format!("{device}_translation_notes.txt"));
    let mut outputs: Vec<PathBuf> = files
        .iter()
        .flat_map(|f| f.paths())
        .cloned()
        .collect();
    outputs.push(notes_file.clone());
    ensure_outputs_distinct(&args.input, &args.output_dir, &outputs)?;

    let mut ctx = TranslationContext::new(resolve_mappings(args.mappings_file.as_deref()));
    let translation = translate_device(&before, &features, &mut ctx)
        .with_context(|| format!("failed to translate {}", args.input.display()))?;

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;
    for (feature, paths) in translation.features.iter().zip(&files) {
        let leftover = if args.keep_tombstones {
            feature.leftover.root().clone()
        } else {
            feature.leftover.compact()
        };
        for (value, path) in [
            (&translation.source, &paths.ned_configuration),
            (&leftover, &paths.remaining),
            (&feature.openconfig, &paths.openconfig),
        ] {
            write_file(value, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    fs::write(&notes_file, ctx.notes.render())
        .with_context(|| format!("failed to write notes file {}", notes_file.display()))?;
    info!(device = %device, dir = %args.output_dir.display(), "translation written");

    let summary = summarize(&translation, &ctx.notes);
    match args.format {
        OutputFormat::Text => {
            println!("{}", render_summary(summary));
            println!("{}", render_notes(&ctx.notes));
        }
        OutputFormat::Json => {
            let report = TranslateReport {
                device: &device,
                summary,
                files: &files,
                notes_file: &notes_file,
                notes: &ctx.notes,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if args.strict && !ctx.notes.is_empty() {
        bail!(
            "translate failed in strict mode: {} notes recorded",
            ctx.notes.len()
        );
    }
    Ok(())
}

fn device_name(args: &TranslateArgs) -> String {
    args.device
        .clone()
        .or_else(|| {
            args.input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "device".to_string())
}

fn resolve_mappings(path: Option<&Path>) -> XeMappings {
    let Some(path) = path else {
        return default_xe_mappings();
    };
    match load_xe_mappings(path) {
        Ok(mappings) => mappings,
        Err(err) => {
            warn!(
                "failed to load mappings from {} ({err}); using embedded defaults",
                path.display()
            );
            default_xe_mappings()
        }
    }
}
