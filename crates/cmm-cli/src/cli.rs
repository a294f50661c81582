//! Command-line argument surface for `cmmc`.

use std::path::PathBuf;

use clap::Parser;

/// Compiles a C-- source file to MIPS assembly.
#[derive(Parser, Debug)]
#[command(name = "cmmc", version, about = "Compiles C-- source to MIPS assembly")]
pub struct Cli {
    /// C-- source file to compile.
    pub input: PathBuf,

    /// Where to write the generated assembly. Defaults to the input
    /// path with its extension replaced by `.s`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the parsed AST instead of compiling.
    #[arg(long)]
    pub emit_ast: bool,

    /// Run the front end and print diagnostics, writing no assembly
    /// even on success.
    #[arg(long)]
    pub emit_diagnostics_only: bool,

    /// Colorize diagnostic output.
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("s"))
    }
}

/// Color output mode for diagnostic rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_defaults_to_input_with_s_extension() {
        let cli = Cli {
            input: PathBuf::from("prog.cmm"),
            output: None,
            emit_ast: false,
            emit_diagnostics_only: false,
            color: ColorChoice::Auto,
        };
        assert_eq!(cli.output_path(), PathBuf::from("prog.s"));
    }

    #[test]
    fn explicit_output_overrides_the_default() {
        let cli = Cli {
            input: PathBuf::from("prog.cmm"),
            output: Some(PathBuf::from("out.s")),
            emit_ast: false,
            emit_diagnostics_only: false,
            color: ColorChoice::Auto,
        };
        assert_eq!(cli.output_path(), PathBuf::from("out.s"));
    }

    #[test]
    fn always_and_never_bypass_terminal_detection() {
        assert!(ColorChoice::Always.should_colorize());
        assert!(!ColorChoice::Never.should_colorize());
    }
}
