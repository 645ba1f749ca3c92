use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR")?);
    let schemas_dir = manifest_dir.join("schemas");
    println!("cargo:rerun-if-changed={}", schemas_dir.display());

    let mut paths = Vec::new();
    for entry in fs::read_dir(&schemas_dir)
        .with_context(|| format!("read schemas dir: {}", schemas_dir.display()))?
    {
        let path = entry.context("read schemas dir entry")?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in &paths {
        generate(path, &out_dir).with_context(|| format!("generate {}", path.display()))?;
    }
    Ok(())
}

fn generate(schema_path: &Path, out_dir: &Path) -> Result<()> {
    println!("cargo:rerun-if-changed={}", schema_path.display());
    let schema = colgen_core::load_schema_file(schema_path)?;
    let src = colgen_core::emit_module(&schema, &colgen_core::GenOptions::default())?;
    let out_path = out_dir.join(format!("{}.rs", schema.table));
    fs::write(&out_path, src.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    Ok(())
}
