use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use cargo_symmap::{
    resolve_all, Decl, Declarations, FunctionDecl, NameCase, NamingRule, ReceiverPolicy,
    ResolveError, ResolveOptions, RuleTable, TypeDecl,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(help = "C functions to map, in declaration order")]
    functions: Vec<String>,
    #[arg(short = 't', long = "type", help = "declared C type a function can be a method of")]
    types: Vec<String>,
    #[arg(
        short = 'r',
        long = "rule",
        help = "naming rule `PATTERN=DIRECTIVE[,DIRECTIVE]`, e.g. `Foo_ForBar=rename:Bar` or `Foo_*=strip`"
    )]
    rules: Vec<NamingRule>,
    #[arg(long = "trim-prefix", help = "prefix stripped from plain function names")]
    trim_prefixes: Vec<String>,
    #[arg(long, value_enum, default_value_t = NameCase::Keep)]
    case: NameCase,
    #[arg(
        long,
        help = "only turn a function into a method if its first parameter can be the receiver"
    )]
    require_receiver: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "more logs, repeat for more")]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ResolveOptions {
        ResolveOptions {
            trim_prefixes: self.trim_prefixes.clone(),
            case: self.case,
            receiver: if self.require_receiver {
                ReceiverPolicy::RequireReceiver
            } else {
                ReceiverPolicy::ByName
            },
        }
    }

    fn decls(&self) -> Vec<Decl> {
        // receivers are unknown from the command line, so only names are given
        self.types
            .iter()
            .map(|name| Decl::Type(TypeDecl::new(name.as_str())))
            .chain(
                self.functions
                    .iter()
                    .map(|name| Decl::Function(FunctionDecl::new(name.as_str()))),
            )
            .collect()
    }
}

fn run(args: &Cli) -> Result<(), ResolveError> {
    let rules = RuleTable::new(args.rules.clone())?;
    let decls = Declarations::new(args.decls())?;
    let options = args.options();
    info!(
        "mapping {} functions with {} rules",
        decls.functions().len(),
        rules.len()
    );
    let resolution = resolve_all(&decls, &rules, &options);
    for sym in &resolution.symbols {
        println!("{sym}");
    }
    for warning in &resolution.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
