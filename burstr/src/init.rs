use std::path::Path;

use anyhow::Context as _;
use burstr_core::runner::{DEFAULT_CONCURRENCY, DEFAULT_CYCLES, DEFAULT_FAN_OUT, DEFAULT_URL};

use crate::cli::{DEFAULT_CONFIG_FILE, DEFAULT_REPORT_PATH, InitArgs};

pub async fn init(args: InitArgs) -> anyhow::Result<()> {
    let root = &args.dir;
    tokio::fs::create_dir_all(root)
        .await
        .with_context(|| format!("failed to create dir: {}", root.display()))?;

    let path = root.join(DEFAULT_CONFIG_FILE);
    write_file(&path, &config_template(), args.force).await?;

    println!("created {}", path.display());
    println!("run it with: burstr run --config {}", path.display());
    Ok(())
}

fn config_template() -> String {
    format!(
        "\
# burstr run configuration.
# Every key is optional; flags passed to `burstr run` override these values.

# Target for every GET request (http or https).
url: \"{DEFAULT_URL}\"

# Requests launched per cycle.
fanOut: {DEFAULT_FAN_OUT}

# Maximum requests in flight at once, shared by all cycles.
concurrency: {DEFAULT_CONCURRENCY}

# Sequential cycles; the next one starts after every request of the previous one finished.
cycles: {DEFAULT_CYCLES}

# Per-request timeout. Slower requests count as errors. Unset means no timeout.
# timeout: 10s

# TCP connect timeout.
connectTimeout: 3s

# Detailed JSON report written after the run.
report: {DEFAULT_REPORT_PATH}
"
    )
}

async fn write_file(path: &Path, contents: &str, force: bool) -> anyhow::Result<()> {
    if !force
        && tokio::fs::try_exists(path)
            .await
            .with_context(|| format!("failed to check file existence: {}", path.display()))?
    {
        anyhow::bail!(
            "refusing to overwrite existing file (use --force): {}",
            path.display()
        );
    }

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write file: {}", path.display()))?;

    Ok(())
}
