use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colgen_core::schema::Schema;
use colgen_core::{variant, GenOptions};

#[derive(Parser, Debug)]
#[command(name = "colgen")]
#[command(about = "Deterministic row encoder generator: column schema -> Rust encoder + test oracle.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the encoder module for one schema.
    Gen {
        #[arg(long)]
        schema: PathBuf,
        /// Output directory (writes <out>/<table>.rs).
        #[arg(long)]
        out: PathBuf,
        /// If set, fail if output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
        #[command(flatten)]
        gen: GenArgs,
    },
    /// Generate modules for every entry of a manifest.
    Batch {
        #[arg(long)]
        manifest: PathBuf,
        /// If set, fail if any output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Print a JSON report of how each field maps to generated code.
    Describe {
        #[arg(long)]
        schema: PathBuf,
        #[arg(long)]
        type_prefix: Option<String>,
    },
    /// Print the diagnostics catalog as Markdown.
    Diagnostics,
}

#[derive(Args, Debug)]
struct GenArgs {
    /// Zone used by the test oracle to render Date/DateTime values.
    #[arg(long, default_value = colgen_core::options::DEFAULT_REFERENCE_TIMEZONE)]
    timezone: String,
    /// Path the generated `use` lines import runtime modules from.
    #[arg(long, default_value = colgen_core::options::DEFAULT_RUNTIME_CRATE)]
    runtime_crate: String,
    #[arg(long)]
    type_prefix: Option<String>,
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

impl GenArgs {
    fn options(&self) -> GenOptions {
        GenOptions {
            reference_timezone: self.timezone.clone(),
            runtime_crate: self.runtime_crate.clone(),
            type_prefix: self.type_prefix.clone(),
        }
    }
}

fn main() -> Result<()> {
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Gen {
            schema,
            out,
            check,
            gen,
        } => run_gen(&schema, &out, check, &gen.options(), gen.quiet),
        Command::Batch {
            manifest,
            check,
            quiet,
        } => run_batch(&manifest, check, quiet),
        Command::Describe {
            schema,
            type_prefix,
        } => run_describe(&schema, type_prefix),
        Command::Diagnostics => {
            print!("{}", colgen_core::diagnostics::render_diagnostics_md());
            Ok(())
        }
    }
}

fn run_gen(
    schema_path: &Path,
    out_root: &Path,
    check: bool,
    opts: &GenOptions,
    quiet: bool,
) -> Result<()> {
    let schema = colgen_core::load_schema_file(schema_path)?;
    let out_src = colgen_core::emit_module(&schema, opts)
        .with_context(|| format!("generate table {:?}", schema.table))?;
    let out_path = write_module(out_root, &schema.table, &out_src, check)?;
    if !quiet {
        let verb = if check { "up to date" } else { "wrote" };
        eprintln!(
            "colgen: {verb} {} ({} fields)",
            out_path.display(),
            schema.fields.len()
        );
    }
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    schema_version: String,
    entries: Vec<ManifestEntry>,
    #[serde(default)]
    options: GenOptions,
}

#[derive(Debug, serde::Deserialize)]
struct ManifestEntry {
    schema: String,
    out_root: String,
}

fn run_batch(manifest_path: &Path, check: bool, quiet: bool) -> Result<()> {
    let bytes = std::fs::read(manifest_path)
        .with_context(|| format!("read manifest: {}", manifest_path.display()))?;
    let m: Manifest = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON: {}", manifest_path.display()))?;
    if m.schema_version.trim() != colgen_contracts::MANIFEST_SCHEMA_VERSION {
        anyhow::bail!(
            "manifest schema_version mismatch: expected {} got {:?}",
            colgen_contracts::MANIFEST_SCHEMA_VERSION,
            m.schema_version
        );
    }

    // Entry paths are relative to the manifest's directory.
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    for (idx, e) in m.entries.iter().enumerate() {
        run_gen(
            &base.join(&e.schema),
            &base.join(&e.out_root),
            check,
            &m.options,
            quiet,
        )
        .with_context(|| format!("manifest entry[{idx}] {}", e.schema))?;
    }
    Ok(())
}

fn write_module(out_root: &Path, table: &str, src: &str, check: bool) -> Result<PathBuf> {
    let out_path = out_root.join(format!("{table}.rs"));

    if check {
        let cur = std::fs::read_to_string(&out_path)
            .with_context(|| format!("read existing output: {}", out_path.display()))?;
        if cur != src {
            anyhow::bail!("generated output differs: {}", out_path.display());
        }
        return Ok(out_path);
    }

    std::fs::create_dir_all(out_root)
        .with_context(|| format!("create output dir: {}", out_root.display()))?;
    std::fs::write(&out_path, src.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    Ok(out_path)
}

#[derive(Debug, serde::Serialize)]
struct DescribeReport {
    schema_version: &'static str,
    table: String,
    source_sha256: Option<String>,
    encoder: String,
    test_encoder: String,
    fields: Vec<DescribeField>,
}

#[derive(Debug, serde::Serialize)]
struct DescribeField {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    type_name: String,
    native_type: String,
    oracle_shape: String,
    has_helper: bool,
}

fn describe(schema: &Schema, opts: &GenOptions) -> DescribeReport {
    let fields = schema
        .fields
        .iter()
        .map(|f| DescribeField {
            name: f.name.clone(),
            ty: f.ty.to_string(),
            type_name: variant::type_name(f, opts),
            native_type: variant::native_type_name(&f.ty),
            oracle_shape: variant::oracle_shape(&f.ty),
            has_helper: !variant::helper(f, &f.ty).is_empty(),
        })
        .collect();
    DescribeReport {
        schema_version: colgen_contracts::DESCRIBE_REPORT_SCHEMA_VERSION,
        table: schema.table.clone(),
        source_sha256: schema.source_sha256.clone(),
        encoder: colgen_core::emit::encoder_name(schema),
        test_encoder: colgen_core::emit::test_encoder_name(schema),
        fields,
    }
}

fn run_describe(schema_path: &Path, type_prefix: Option<String>) -> Result<()> {
    let schema = colgen_core::load_schema_file(schema_path)?;
    let opts = GenOptions {
        type_prefix,
        ..GenOptions::default()
    };
    opts.validate()?;
    let report = describe(&schema, &opts);
    let out = serde_json::to_string_pretty(&report).context("serialize describe report")?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        colgen_core::parse_schema_json(
            br#"{"schema_version": "colgen.schema@0.1.0", "table": "hits",
                 "fields": [
                    {"name": "url", "type": "String"},
                    {"name": "kind", "type": "Nullable(Enum16('a' = 1))"}
                 ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn describe_reports_every_field() {
        let report = describe(&schema(), &GenOptions::default());
        assert_eq!(report.encoder, "HitsEncoder");
        assert_eq!(report.test_encoder, "HitsTestEncoder");
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.fields[0].native_type, "String");
        assert!(!report.fields[0].has_helper);
        assert_eq!(report.fields[1].type_name, "Kind");
        assert_eq!(report.fields[1].native_type, "Option<i16>");
        assert!(report.fields[1].has_helper);

        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["schema_version"], "colgen.describe@0.1.0");
        assert_eq!(v["fields"][1]["type"], "Nullable(Enum16('a' = 1))");
    }

    #[test]
    fn check_mode_detects_drift() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let path = write_module(&dir, "hits", "a", false).unwrap();
        assert!(path.ends_with("hits.rs"));
        assert!(write_module(&dir, "hits", "a", true).is_ok());
        let err = write_module(&dir, "hits", "b", true).unwrap_err();
        assert!(format!("{err:#}").contains("generated output differs"));
    }

    #[test]
    fn manifest_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, br#"{"schema_version": "colgen.manifest@9", "entries": []}"#).unwrap();
        let err = run_batch(&path, false, true).unwrap_err();
        assert!(format!("{err:#}").contains("manifest schema_version mismatch"));
    }
}
