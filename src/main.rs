use std::process::ExitCode;

use clap::Parser;
use clap_stdin::FileOrStdin;
use tracing::Level;

use shmoptix::exec::{ArgValue, ExecutionEnvironment};

/// Compiles a surface shader and runs it once.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Shader source file, or '-' for stdin
    input: FileOrStdin,

    /// Print the AST
    #[arg(long)]
    dump_ast: bool,

    /// Print the generated IR module
    #[arg(long)]
    emit_ir: bool,

    /// Compile and verify without running
    #[arg(long)]
    no_run: bool,

    /// Shader argument, VALUE is `f` or `r,g,b`
    #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_binding)]
    args: Vec<(String, ArgValue)>,

    /// Initial value of a global
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_binding)]
    globals: Vec<(String, ArgValue)>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_binding(s: &str) -> Result<(String, ArgValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", s))?;
    Ok((name.trim().to_string(), value.parse()?))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let source = cli.input.contents().map_err(|e| format!("Couldn't read input: {}", e))?;
    let shader = shmoptix::compile(&source).map_err(|e| e.to_string())?;

    if cli.dump_ast {
        print!("{}", shader.definition.describe());
    }
    if cli.emit_ir {
        print!("{}", shader.module);
    }
    if cli.no_run {
        return Ok(());
    }

    let name = shader.name().to_string();
    let mut env = ExecutionEnvironment::new(shader.module).map_err(|e| e.to_string())?;
    for (global, value) in cli.globals {
        env.set_global(&global, value).map_err(|e| e.to_string())?;
    }

    println!("{}", env.dump());
    env.run_function_named(&name, &cli.args).map_err(|e| e.to_string())?;
    println!("{}", env.dump());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
