use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an output directory that is the input file itself, and any
/// generated file that would overwrite the input.
pub fn ensure_outputs_distinct(input: &Path, output_dir: &Path, outputs: &[PathBuf]) -> Result<()> {
    let in_norm = normalize_for_compare(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;

    let dir_norm = normalize_for_compare(output_dir)
        .with_context(|| format!("failed to normalize output directory {}", output_dir.display()))?;
    if dir_norm == in_norm {
        bail!(
            "refusing to use the input file as output directory: {}",
            output_dir.display()
        );
    }

    for output in outputs {
        let out_norm = normalize_for_compare(output)
            .with_context(|| format!("failed to normalize output path {}", output.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite source file: output {} matches input {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: join with cwd. `..` is not resolved here.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    Ok(base.join(path))
}
