use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use srx2mist::documents::ALL_DOCUMENTS;

/// Refuse an output directory where a document would land on the source dump.
pub fn ensure_documents_spare_input(out_dir: &Path, input: &Path) -> Result<()> {
    let in_norm = normalize_for_compare(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;

    for doc in ALL_DOCUMENTS {
        let target = out_dir.join(doc);
        let out_norm = normalize_for_compare(&target)
            .with_context(|| format!("failed to normalize output path {}", target.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite source file: document {} matches input {}",
                target.display(),
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

    // Paths that don't exist yet can't be canonicalized; `..` stays unresolved.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };

    Ok(base.join(path))
}

#[cfg(test)]
mod tests {
    use super::ensure_documents_spare_input;

    #[test]
    fn rejects_dump_named_like_a_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("mist_apps.json");
        std::fs::write(&input, "set version 21.4\n").expect("write input");

        let err = ensure_documents_spare_input(dir.path(), &input).expect_err("must refuse");
        assert!(err.to_string().contains("refusing to overwrite source file"));
    }

    #[test]
    fn allows_ordinary_dump_in_output_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("srx.conf");
        std::fs::write(&input, "set version 21.4\n").expect("write input");
        ensure_documents_spare_input(dir.path(), &input).expect("distinct paths");
    }
}
