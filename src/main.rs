use argh::FromArgs;
use osh::Interpreter;

/// An interactive command interpreter with redirection, a two-stage
/// pipeline, background execution and a `!!` history shortcut.
#[derive(FromArgs)]
struct Options {
    /// prompt printed before each input line
    #[argh(option, default = "default_prompt()")]
    prompt: String,
}

fn default_prompt() -> String {
    "osh> ".to_string()
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    Interpreter::new(options.prompt).repl()
}
