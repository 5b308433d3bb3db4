use anyhow::{Context, Result};
use jhatpat_core::ai::{AiCache, AiConfig};

pub fn stats() {
    let dir = AiConfig::cache_dir_from_env();
    let stats = AiCache::new(dir.clone()).stats();
    println!("AI cache: {}", dir.display());
    println!("  Cached responses: {}", stats.cached_responses);
    for (prompt_name, count) in &stats.by_prompt {
        println!("    {:<20} {}", prompt_name, count);
    }
}

pub fn clear() -> Result<()> {
    let dir = AiConfig::cache_dir_from_env();
    AiCache::new(dir.clone())
        .clear()
        .with_context(|| format!("Failed to clear {}", dir.display()))?;
    println!("Cleared AI cache at {}", dir.display());
    Ok(())
}
