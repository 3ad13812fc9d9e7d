//! Writes the OpenAPI document for the HTTP endpoints.
//!
//! Usage: `generate-openapi [OUTPUT]`. Defaults to `specs/lobby-api.json` at
//! the workspace root.

use std::path::PathBuf;

use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = std::env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../specs/lobby-api.json")
    });

    let doc = lobby_api::routes::ApiDoc::openapi();
    let paths = doc.paths.paths.len();

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, doc.to_pretty_json()?)?;
    println!("Wrote {} ({paths} paths)", out.display());
    Ok(())
}
