//! This is the command line tool that loads '.dot' files, parses them with
//! the configured limits, and prints them back in canonical form.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{value_parser, Arg, ArgAction, Command};
use dotgraph::gv;
use dotgraph::gv::parser::error::snippet;
use dotgraph::gv::{Limits, ParseOptions, StartRule};
use std::fs;
use std::process::ExitCode;

struct CLIOptions {
    dump_ast: bool,
    start_rule: StartRule,
    limits: Limits,
    output_path: Option<String>,
}

impl CLIOptions {
    pub fn new() -> Self {
        Self {
            dump_ast: false,
            start_rule: StartRule::Dot,
            limits: Limits::default(),
            output_path: None,
        }
    }
}

fn limit_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help(help)
}

fn write_output(content: &str, options: &CLIOptions) -> bool {
    let path = match &options.output_path {
        Some(path) => path,
        None => {
            println!("{}", content);
            return true;
        }
    };
    let res = fs::write(path, format!("{}\n", content));
    if let Result::Err(err) = res {
        log::error!("Could not write the file {}", path);
        log::error!("Error {}", err);
        return false;
    }
    log::info!("Wrote {}", path);
    true
}

fn main() -> ExitCode {
    let matches = Command::new("dotfmt")
        .version("0.1")
        .about("Parses GraphViz files and prints them in canonical form")
        .arg(
            Arg::new("ast")
                .short('a')
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Dump the graph AST instead of the DOT text"),
        )
        .arg(
            Arg::new("start-rule")
                .long("start-rule")
                .value_name("RULE")
                .help(
                    "Grammar rule to parse the input as: dot, graph, node, \
                     edge, attribute, attribute-list or statements",
                ),
        )
        .arg(limit_arg(
            "max-input-size",
            "Maximum input size in bytes (0 disables the check)",
        ))
        .arg(limit_arg(
            "max-ast-nodes",
            "Maximum number of AST nodes (0 disables the check)",
        ))
        .arg(limit_arg(
            "max-html-depth",
            "Maximum nesting of HTML-like strings (0 disables the check)",
        ))
        .arg(limit_arg(
            "max-edge-chain",
            "Maximum edge operators in one statement (0 disables the check)",
        ))
        .arg(limit_arg(
            "max-subgraph-depth",
            "Maximum nesting of subgraphs (0 disables the check)",
        ))
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let mut cli = CLIOptions::new();
    cli.dump_ast = matches.get_flag("ast");
    cli.output_path = matches.get_one::<String>("output").cloned();

    if let Some(rule) = matches.get_one::<String>("start-rule") {
        match rule.parse::<StartRule>() {
            Result::Ok(rule) => cli.start_rule = rule,
            Result::Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    let limit = |name: &str| matches.get_one::<usize>(name).copied();
    if let Some(n) = limit("max-input-size") {
        cli.limits.max_input_size = n;
    }
    if let Some(n) = limit("max-ast-nodes") {
        cli.limits.max_ast_nodes = n;
    }
    if let Some(n) = limit("max-html-depth") {
        cli.limits.max_html_nesting_depth = n;
    }
    if let Some(n) = limit("max-edge-chain") {
        cli.limits.max_edge_chain_depth = n;
    }
    if let Some(n) = limit("max-subgraph-depth") {
        cli.limits.max_subgraph_depth = n;
    }

    let input_path = match matches.get_one::<String>("INPUT") {
        Some(path) => path.clone(),
        None => return ExitCode::FAILURE,
    };
    let contents = match fs::read_to_string(&input_path) {
        Result::Ok(contents) => contents,
        Result::Err(err) => {
            log::error!("Can't open the file {}: {}", input_path, err);
            return ExitCode::FAILURE;
        }
    };

    let options = ParseOptions::new(cli.start_rule)
        .filename(&input_path)
        .limits(cli.limits);

    match gv::parse(&contents, &options) {
        Result::Err(err) => {
            if let Some(loc) = err.location() {
                eprintln!("{}", snippet(&contents, &loc));
            }
            log::error!("Error: {}", err);
            if err.is_limit() {
                log::info!("The limits can be raised with the --max-* flags");
            }
            ExitCode::FAILURE
        }

        Result::Ok(tree) => {
            if cli.dump_ast {
                gv::dump_ast(&tree);
                return ExitCode::SUCCESS;
            }
            if write_output(&gv::stringify(&tree), &cli) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
