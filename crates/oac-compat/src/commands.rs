//! CLI subcommands. Thin over the library: read files, call adapters,
//! write files, report. Batch work is sequential; one bad file never
//! aborts a migration.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::adapter::{ConversionOutput, Platform, adapter_for};
use crate::analyzer::{CompatStatus, analyze, capabilities_for, compare};
use crate::config::ConvertCfg;
use crate::merge::merge_agents;
use crate::model::AgentModel;

#[derive(Debug, Parser)]
#[command(name = "oac", version, about = "Convert agent definitions between platform formats")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert one agent file to another platform's format
    Convert {
        input: PathBuf,
        /// Source format; detected from the path when omitted
        #[arg(long)]
        from: Option<String>,
        /// Target format: oac, claude, cursor, or windsurf
        #[arg(long)]
        to: String,
        /// Directory to write generated files into (default: current dir)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Fail instead of degrading when features would be lost
        #[arg(long)]
        strict: bool,
        /// Suppress degradation warnings
        #[arg(long)]
        quiet: bool,
    },
    /// Analyze a file's compatibility with a target platform without writing
    Validate {
        input: PathBuf,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: String,
        #[arg(long)]
        strict: bool,
    },
    /// Convert every agent file under a directory
    Migrate {
        dir: PathBuf,
        /// Source format applied to every file; detected per file when omitted
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Merge all agents into one before converting
        #[arg(long)]
        merge: bool,
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        quiet: bool,
    },
    /// Show platform capabilities
    Info {
        /// Platform to describe; all platforms when omitted
        platform: Option<String>,
        /// Second platform to compare against
        #[arg(long)]
        compare: Option<String>,
    },
}

/// Run a parsed command. Returns the process exit code.
pub async fn run(cli: Cli, defaults: &ConvertCfg) -> anyhow::Result<u8> {
    match cli.command {
        Command::Convert {
            input,
            from,
            to,
            output,
            strict,
            quiet,
        } => {
            let source = parse_platform_arg(from.as_deref(), Some(&input))?;
            let target: Platform = to.parse().map_err(anyhow::Error::msg)?;
            let strict = strict || defaults.strict.unwrap_or(false);
            let quiet = quiet || defaults.quiet.unwrap_or(false);
            let out_dir = output_dir(output, defaults);

            let model = load_model(&input, source).await?;
            let written = convert_model(&model, target, strict, quiet, &out_dir).await?;
            for path in &written {
                println!("{}", path.display());
            }
            Ok(0)
        }
        Command::Validate {
            input,
            from,
            to,
            strict,
        } => {
            let source = parse_platform_arg(from.as_deref(), Some(&input))?;
            let target: Platform = to.parse().map_err(anyhow::Error::msg)?;
            let strict = strict || defaults.strict.unwrap_or(false);

            let model = load_model(&input, source).await?;
            let report = analyze(&model, target, strict);
            println!("{}", render_report(&model, target, &report));
            for warning in adapter_for(target).validate_conversion(&model) {
                println!("  warning: {warning}");
            }
            Ok(match report.status {
                CompatStatus::Incompatible => 1,
                _ => 0,
            })
        }
        Command::Migrate {
            dir,
            from,
            to,
            output,
            merge,
            strict,
            quiet,
        } => {
            let forced = match from.as_deref() {
                Some(s) => Some(parse_platform_arg(Some(s), None)?),
                None => None,
            };
            let target: Platform = to.parse().map_err(anyhow::Error::msg)?;
            let strict = strict || defaults.strict.unwrap_or(false);
            let quiet = quiet || defaults.quiet.unwrap_or(false);
            let out_dir = output_dir(output, defaults);

            let failed = migrate_dir(&dir, forced, target, merge, strict, quiet, &out_dir).await?;
            Ok(if failed > 0 { 1 } else { 0 })
        }
        Command::Info { platform, compare: other } => {
            match (platform, other) {
                (Some(a), Some(b)) => {
                    let a: Platform = a.parse().map_err(anyhow::Error::msg)?;
                    let b: Platform = b.parse().map_err(anyhow::Error::msg)?;
                    println!("{}", render_comparison(a, b));
                }
                (Some(p), None) => {
                    let p: Platform = p.parse().map_err(anyhow::Error::msg)?;
                    println!("{}", render_capabilities(p));
                }
                (None, _) => {
                    for p in Platform::ALL {
                        println!("{}", render_capabilities(p));
                    }
                }
            }
            Ok(0)
        }
    }
}

/// Resolve an explicit `--from` value, falling back to path-based
/// detection when a path is available.
fn parse_platform_arg(from: Option<&str>, path: Option<&Path>) -> anyhow::Result<Platform> {
    if let Some(s) = from {
        return s.parse().map_err(anyhow::Error::msg);
    }
    match path {
        Some(p) => detect_format(p),
        None => anyhow::bail!("no source format given; pass --from"),
    }
}

/// Guess the source format from file-path conventions.
pub fn detect_format(path: &Path) -> anyhow::Result<Platform> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if file_name == ".cursorrules" {
        return Ok(Platform::Cursor);
    }
    let in_dir = |needle: &str| {
        path.components()
            .any(|c| c.as_os_str().to_str() == Some(needle))
    };
    if in_dir(".claude") {
        return Ok(Platform::Claude);
    }
    if in_dir(".windsurf") {
        return Ok(Platform::Windsurf);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") => Ok(Platform::Oac),
        Some("json") => Ok(Platform::Claude),
        _ => anyhow::bail!(
            "cannot detect source format of {}; pass --from",
            path.display()
        ),
    }
}

async fn load_model(path: &Path, platform: Platform) -> anyhow::Result<AgentModel> {
    let source = tokio::fs::read_to_string(path).await?;
    let model = adapter_for(platform).to_canonical(&source)?;
    tracing::debug!(path = %path.display(), %platform, "parsed agent");
    Ok(model)
}

/// Convert one canonical model and write the generated files. Returns
/// the paths written. Incompatibility only blocks under `strict`; the
/// default path lets adapters substitute their documented fallbacks and
/// surface the damage as warnings.
async fn convert_model(
    model: &AgentModel,
    target: Platform,
    strict: bool,
    quiet: bool,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let report = analyze(model, target, strict);
    if strict && report.status == CompatStatus::Incompatible {
        let mut reasons = report.blockers.clone();
        for f in &report.lost {
            reasons.push(format!("{} would be lost", f.as_str()));
        }
        anyhow::bail!("conversion to {target} blocked: {}", reasons.join("; "));
    }

    let output = adapter_for(target).from_canonical(model)?;
    if !quiet {
        for warning in &output.warnings {
            eprintln!("warning: {warning}");
        }
    }
    write_output(&output, out_dir).await
}

async fn write_output(output: &ConversionOutput, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(output.configs.len());
    for file in &output.configs {
        let path = out_dir.join(&file.file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &file.content).await?;
        tracing::debug!(path = %path.display(), "wrote config");
        written.push(path);
    }
    Ok(written)
}

/// Convert every agent file under `dir`. Returns the failure count;
/// individual failures are reported and skipped.
async fn migrate_dir(
    dir: &Path,
    forced: Option<Platform>,
    target: Platform,
    merge: bool,
    strict: bool,
    quiet: bool,
    out_dir: &Path,
) -> anyhow::Result<usize> {
    let files = collect_agent_files(dir, forced).await?;
    if files.is_empty() {
        anyhow::bail!("no agent files found under {}", dir.display());
    }
    tracing::info!(count = files.len(), "migrating agent files");

    if merge {
        let mut models = Vec::new();
        let mut failed = 0usize;
        for (path, platform) in &files {
            match load_model(path, *platform).await {
                Ok(model) => models.push(model),
                Err(e) => {
                    eprintln!("error: {}: {e}", path.display());
                    failed += 1;
                }
            }
        }
        if models.is_empty() {
            anyhow::bail!("every input failed to parse");
        }
        let merged = merge_agents(&models)?;
        let written = convert_model(&merged, target, strict, quiet, out_dir).await?;
        for path in &written {
            println!("{}", path.display());
        }
        return Ok(failed);
    }

    let mut converted = 0usize;
    let mut failed = 0usize;
    for (path, platform) in &files {
        let result = async {
            let model = load_model(path, *platform).await?;
            convert_model(&model, target, strict, quiet, out_dir).await
        }
        .await;
        match result {
            Ok(written) => {
                converted += 1;
                for p in &written {
                    println!("{}", p.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("error: {}: {e}", path.display());
            }
        }
    }
    tracing::info!(converted, failed, "migration finished");
    Ok(failed)
}

/// Walk `dir` and collect convertible files with their detected formats,
/// in stable sorted order. With a forced format, every regular file
/// qualifies; otherwise only files the detector recognizes.
async fn collect_agent_files(
    dir: &Path,
    forced: Option<Platform>,
) -> anyhow::Result<Vec<(PathBuf, Platform)>> {
    const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target"];

    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut entries = Vec::new();
        let mut rd = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = rd.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();
        for path in entries {
            if path.is_dir() {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if !SKIP_DIRS.contains(&name) {
                    pending.push(path);
                }
            } else if let Some(platform) = forced.or_else(|| detect_format(&path).ok()) {
                files.push((path, platform));
            }
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn output_dir(flag: Option<PathBuf>, defaults: &ConvertCfg) -> PathBuf {
    flag.or_else(|| {
        defaults
            .output_dir
            .as_deref()
            .map(crate::config::expand_home)
    })
    .unwrap_or_else(|| PathBuf::from("."))
}

fn render_report(
    model: &AgentModel,
    target: Platform,
    report: &crate::analyzer::CompatibilityReport,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} -> {target}: {} (score {})",
        model.name_or("unnamed agent"),
        report.status.as_str(),
        report.score
    );
    let list = |label: &str, features: &[crate::analyzer::Feature]| -> Option<String> {
        if features.is_empty() {
            return None;
        }
        let names: Vec<&str> = features.iter().map(|f| f.as_str()).collect();
        Some(format!("  {label}: {}", names.join(", ")))
    };
    for line in [
        list("preserved", &report.preserved),
        list("degraded", &report.degraded),
        list("lost", &report.lost),
    ]
    .into_iter()
    .flatten()
    {
        let _ = writeln!(out, "{line}");
    }
    for blocker in &report.blockers {
        let _ = writeln!(out, "  blocker: {blocker}");
    }
    out.trim_end().to_string()
}

fn render_capabilities(platform: Platform) -> String {
    let caps = capabilities_for(platform);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{platform} ({}, {} output)",
        caps.config_format.as_str(),
        caps.output_structure.as_str()
    );
    let supported: Vec<&str> = caps
        .flags()
        .into_iter()
        .filter_map(|(name, flag)| flag.then_some(name))
        .collect();
    let _ = writeln!(out, "  supports: {}", supported.join(", "));
    for note in caps.notes {
        let _ = writeln!(out, "  note: {note}");
    }
    out.trim_end().to_string()
}

fn render_comparison(a: Platform, b: Platform) -> String {
    let cmp = compare(a, b);
    let mut out = String::new();
    let _ = writeln!(out, "{a} vs {b}");
    if !cmp.better_in_a.is_empty() {
        let _ = writeln!(out, "  only {a}: {}", cmp.better_in_a.join(", "));
    }
    if !cmp.better_in_b.is_empty() {
        let _ = writeln!(out, "  only {b}: {}", cmp.better_in_b.join(", "));
    }
    let _ = writeln!(out, "  same: {}", cmp.identical.join(", "));
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_follows_path_conventions() {
        assert_eq!(
            detect_format(Path::new("proj/.cursorrules")).unwrap(),
            Platform::Cursor
        );
        assert_eq!(
            detect_format(Path::new("proj/.claude/agents/helper.md")).unwrap(),
            Platform::Claude
        );
        assert_eq!(
            detect_format(Path::new(".windsurf/config.json")).unwrap(),
            Platform::Windsurf
        );
        assert_eq!(
            detect_format(Path::new("agents/reviewer.md")).unwrap(),
            Platform::Oac
        );
        assert_eq!(
            detect_format(Path::new("config.json")).unwrap(),
            Platform::Claude
        );
        assert!(detect_format(Path::new("notes.txt")).is_err());
    }

    #[tokio::test]
    async fn convert_writes_files_under_output_dir() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let input = src_dir.path().join("reviewer.md");
        tokio::fs::write(&input, "---\nname: reviewer\n---\n\nReview code.\n")
            .await
            .unwrap();

        let model = load_model(&input, Platform::Oac).await.unwrap();
        let written = convert_model(&model, Platform::Claude, false, true, out_dir.path())
            .await
            .unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with(".claude/config.json"));
        let content = tokio::fs::read_to_string(&written[0]).await.unwrap();
        assert!(content.contains("\"name\": \"reviewer\""));
    }

    #[tokio::test]
    async fn strict_conversion_blocks_on_loss() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("x".into());
        model.frontmatter.max_steps = Some(5);
        let result = convert_model(&model, Platform::Claude, true, true, dir.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn nameless_agent_converts_best_effort_without_strict() {
        let dir = tempfile::tempdir().unwrap();
        let model = AgentModel::default();
        let written = convert_model(&model, Platform::Claude, false, true, dir.path())
            .await
            .unwrap();
        assert_eq!(written.len(), 1);
        let content = tokio::fs::read_to_string(&written[0]).await.unwrap();
        assert!(content.contains("\"name\": \"claude-agent\""));

        // Under strict the missing-name blocker refuses the conversion.
        let result = convert_model(&model, Platform::Claude, true, true, dir.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn migration_skips_bad_files_and_counts_them() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        tokio::fs::write(src.path().join("good.md"), "---\nname: good\n---\nBody.\n")
            .await
            .unwrap();
        // Detected as claude by extension but not valid JSON either, so it
        // falls back to the markdown subagent path and still parses; use a
        // bad OAC permission to force a real failure.
        tokio::fs::write(
            src.path().join("bad.md"),
            "---\nname: bad\npermission.read: maybe\n---\nBody.\n",
        )
        .await
        .unwrap();

        let failed = migrate_dir(
            src.path(),
            None,
            Platform::Windsurf,
            false,
            false,
            true,
            out.path(),
        )
        .await
        .unwrap();
        assert_eq!(failed, 1);
        assert!(out.path().join(".windsurf/config.json").exists());
    }

    #[tokio::test]
    async fn merge_migration_emits_single_cursorrules() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        tokio::fs::write(src.path().join("a.md"), "---\nname: a\n---\nOne.\n")
            .await
            .unwrap();
        tokio::fs::write(src.path().join("b.md"), "---\nname: b\n---\nTwo.\n")
            .await
            .unwrap();

        let failed = migrate_dir(
            src.path(),
            None,
            Platform::Cursor,
            true,
            false,
            true,
            out.path(),
        )
        .await
        .unwrap();
        assert_eq!(failed, 0);
        let rules = tokio::fs::read_to_string(out.path().join(".cursorrules"))
            .await
            .unwrap();
        assert!(rules.contains("# Agent 1: a"));
        assert!(rules.contains("# Agent 2: b"));
    }

    #[tokio::test]
    async fn collection_is_sorted_and_skips_noise_dirs() {
        let src = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(src.path().join(".git")).await.unwrap();
        tokio::fs::write(src.path().join(".git/ignored.md"), "x").await.unwrap();
        tokio::fs::write(src.path().join("b.md"), "x").await.unwrap();
        tokio::fs::write(src.path().join("a.md"), "x").await.unwrap();
        tokio::fs::write(src.path().join(".cursorrules"), "x").await.unwrap();
        tokio::fs::write(src.path().join("notes.txt"), "x").await.unwrap();

        let files = collect_agent_files(src.path(), None).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, [".cursorrules", "a.md", "b.md"]);
        assert_eq!(files[0].1, Platform::Cursor);
    }
}
