// semlang file runner
// Thin host: sources text, evaluates it against a standard context with the
// bundled numeric primitives, prints the result.

use std::path::PathBuf;

use clap::Parser;
use yansi::Paint;

use semlang::StandardLibrary;

#[derive(Parser)]
#[command(name = "semlang")]
#[command(about = "Evaluate semantics-lang source")]
struct Args {
    /// Source file to evaluate
    file: Option<PathBuf>,

    /// Evaluate an expression given on the command line
    #[arg(short, long)]
    expr: Option<String>,
}

fn main() {
    let args = Args::parse();

    let source = match (&args.file, &args.expr) {
        (_, Some(expr)) => expr.clone(),
        (Some(path), None) => match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{} cannot read {}: {}", "error:".red().bold(), path.display(), e);
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("{} no input; pass a file or --expr", "error:".red().bold());
            std::process::exit(2);
        }
    };

    let context = StandardLibrary::create_host_context();
    match context.evaluate_program(&source) {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
