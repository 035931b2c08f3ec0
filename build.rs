//! Build script for setlistify.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory (`<data_local_dir>/setlistify/.env.example`), next to where the
//! application looks for its `.env` file.
//!
//! Every failure is reported as a cargo warning; the template is a convenience
//! and never breaks the build.

use std::{env, fs, path::PathBuf};

fn main() {
    // Re-run if the template changes
    println!("cargo:rerun-if-changed=.env.example");

    if let Err(e) = copy_template() {
        println!("cargo:warning=could not install .env.example: {e}");
    }
}

fn copy_template() -> Result<(), Box<dyn std::error::Error>> {
    // Where to copy FROM (crate root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("setlistify");
    fs::create_dir_all(&out_dir)?;

    let contents = fs::read_to_string(&env_example_path)?;
    fs::write(out_dir.join(".env.example"), contents)?;
    Ok(())
}
