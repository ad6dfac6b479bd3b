// semlang interactive REPL
// Line editing over a persistent context; definitions survive across lines.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use yansi::Paint;

use semlang::StandardLibrary;

fn main() {
    let context = StandardLibrary::create_host_context();

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} cannot start line editor: {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("semlang REPL - :quit to exit");
    loop {
        match editor.readline("semlang> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == ":quit" || line == ":q" {
                    break;
                }
                let _ = editor.add_history_entry(line);
                match context.evaluate_program(line) {
                    Ok(Some(value)) => println!("{}", value),
                    Ok(None) => {}
                    Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }
}
