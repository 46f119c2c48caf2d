//! 程序入口：初始化日志、解析参数，处理单个源文件或整个目录

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use i18n_fenli::{process_dir, process_file, DocumentReport, SplitConfig};

/// Split a nested translation source into per-language, per-namespace JSON files
#[derive(Parser, Debug)]
#[command(name = "i18n_fenli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file (.json / .jsonc) or a directory of source files [default: src/i18n]
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output directory [default: public/locales]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON config file with `inputDir` / `outputDir`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every written file
    #[arg(short, long)]
    verbose: bool,
}

fn print_document(doc: &DocumentReport) {
    println!(
        "{}: {} namespace(s) x {} language(s), {} file(s) written, {} warning(s)",
        doc.source.display(),
        doc.namespaces.len(),
        doc.languages.len(),
        doc.summary.written.len(),
        doc.warnings.len()
    );
    if let Some(report) = &doc.summary.warnings_file {
        println!("  warnings: {}", report.display());
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => SplitConfig::from_file(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?,
        None => SplitConfig::default(),
    }
    .with_overrides(cli.input, cli.output);

    if config.is_batch() {
        let report = process_dir(&config.input_dir, &config.output_dir)
            .with_context(|| format!("无法处理目录 {}", config.input_dir.display()))?;
        for doc in &report.documents {
            print_document(doc);
        }
        for (file, err) in &report.failures {
            eprintln!("Error: {}: {}", file.display(), err);
        }
        Ok(report.is_success())
    } else {
        let doc = process_file(&config.input_dir, &config.output_dir)
            .with_context(|| format!("无法处理 {}", config.input_dir.display()))?;
        print_document(&doc);
        Ok(true)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
