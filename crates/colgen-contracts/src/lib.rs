//! Shared, version-pinned identifiers.
//!
//! These constants are the single source of truth for schema/version strings that
//! appear in machine-readable I/O (schema files, batch manifests, reports).

pub const SCHEMA_SCHEMA_VERSION: &str = "colgen.schema@0.1.0";
pub const MANIFEST_SCHEMA_VERSION: &str = "colgen.manifest@0.1.0";
pub const DESCRIBE_REPORT_SCHEMA_VERSION: &str = "colgen.describe@0.1.0";

pub const GENERATED_BY: &str = "colgen";
