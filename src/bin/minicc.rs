extern crate log;
extern crate simplelog;

use std::fs::File;
use std::io::Write;

use log::info;

use minic::compiler::{parse, parser, tokenize_with_tracing, translate};
use minic::*;

const MANIFEST_EXT: &str = "manifest";

fn main() {
    if let Err(code) = run() {
        std::process::exit(code)
    }
}

fn run() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(e) = configure_logging(level) {
            print_errs(&[format!("Failed to configure logger: {}", e)]);
        }
    }

    let stop_stage = get_stage(&config).map_err(|e| {
        print_errs(&[e]);
        ERR_INVALID_ARGUMENT
    })?;
    let trace_parser = get_parser_tracing(&config).map_err(|e| {
        print_errs(&[e]);
        ERR_INVALID_ARGUMENT
    })?;
    parser::set_tracing(trace_parser);
    let trace_lexer = get_lexer_tracing(&config).map_err(|e| {
        print_errs(&[e]);
        ERR_INVALID_ARGUMENT
    })?;

    // Both are required arguments
    let input = config.value_of("input").unwrap_or_default();
    let output = config.value_of("output").unwrap_or_default();

    let text = std::fs::read_to_string(input).map_err(|e| {
        print_errs(&[format!("Could not read {}: {}", input, e)]);
        ERR_IO_ERROR
    })?;

    let tokens = tokenize_with_tracing(&text, trace_lexer).map_err(|e| {
        print_errs(&[format!("Lexer error @ {}", e)]);
        ERR_LEXER_ERROR
    })?;
    if stop_stage == Some(Stage::Lexer) {
        return Ok(());
    }

    let program = parse(&tokens).map_err(|e| {
        print_errs(&[format!("Parser error @ {}", e)]);
        ERR_PARSER_ERROR
    })?;
    if stop_stage == Some(Stage::Parser) {
        return Ok(());
    }

    let assembly = translate(&program).map_err(|e| {
        print_errs(&[format!("Semantic error @ {}", e)]);
        ERR_TRANSLATION_ERROR
    })?;

    File::create(output)
        .and_then(|mut f| {
            assembly.print(&mut f)?;
            f.flush()
        })
        .map_err(|e| {
            print_errs(&[format!("Could not write {}: {}", output, e)]);
            ERR_IO_ERROR
        })?;
    info!("Wrote {}", output);

    if config.is_present("manifest") {
        let path = format!("{}.{}", output, MANIFEST_EXT);
        let manifest = Manifest::extract(&program);
        File::create(&path)
            .map_err(|e| format!("{}", e))
            .and_then(|f| manifest.write(f).map_err(|e| format!("{}", e)))
            .map_err(|e| {
                print_errs(&[format!("Failed to write manifest file: {}", e)]);
                ERR_MANIFEST_WRITE_ERROR
            })?;
        info!("Wrote {}", path);
    }

    Ok(())
}
