//! `translate`: run a statement through the pipeline and show the result.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use cqlbridge_common::BridgeConfig;
use cqlbridge_sql::{StatementConfiguration, StatementParser, Translation};
use owo_colors::OwoColorize;

pub fn translate(text: &str, config: &BridgeConfig, format: OutputFormat) -> Result<()> {
    let parser = StatementParser::from_settings(&config.cache);
    let translation = parser.translate(&config.connection, text);
    tracing::debug!(
        rewritten = translation.statement.was_rewritten(),
        fallback = ?translation.fallback,
        "Translated statement"
    );

    if format.is_machine_readable() {
        return output::print_success(format, &translation);
    }

    print_human(&translation);
    Ok(())
}

fn print_human(translation: &Translation) {
    let statement = &translation.statement;
    let cfg = statement.configuration();

    println!(
        "{} {} {}",
        "[Statement:".dimmed(),
        format!("{} / {}", cfg.statement_type(), cfg.statement_category()).yellow(),
        "]".dimmed()
    );
    println!("{}", statement.text().bold());

    if statement.was_rewritten() {
        println!("{}", "Rewritten to native dialect.".green());
    } else {
        match translation.fallback.as_ref().and_then(|f| f.to_error()) {
            Some(reason) => println!("{} {}", "Passed through:".yellow(), reason),
            None => println!("{}", "Passed through as written.".dimmed()),
        }
    }

    print_configuration(cfg);
}

fn print_configuration(cfg: &StatementConfiguration) {
    let serial = cfg
        .serial_consistency_level()
        .map(|cl| cl.to_string())
        .unwrap_or_else(|| "-".to_string());
    let fetch = if cfg.fetch_size() == cqlbridge_sql::FETCH_SIZE_INHERIT {
        "inherit".to_string()
    } else {
        cfg.fetch_size().to_string()
    };

    let rows = [
        ("consistency", cfg.consistency_level().to_string()),
        ("serial consistency", serial),
        ("fetch size", fetch),
        ("read timeout", format!("{}ms", cfg.read_timeout_ms())),
        ("no limit", cfg.no_limit().to_string()),
        ("no wait", cfg.no_wait().to_string()),
        ("tracing", cfg.tracing().to_string()),
        ("replace nulls", cfg.replace_null_value().to_string()),
        ("sql parser", cfg.sql_parser().to_string()),
    ];
    for (label, value) in rows {
        println!("  {:<20} {}", label.dimmed(), value);
    }
}
