//! Command-line interface for `slrtab`.
//!
//! This binary compiles a grammar file into an SLR(1) table, prints the
//! intermediate artifacts, and optionally parses a sentence with it,
//! printing the step trace and the parse tree.

#[cfg(feature = "cli")]
mod real {
    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};
    use slrtab::{CompiledGrammar, compile, reconstruct_tree, report, run};
    use std::io::{self, Write};
    use std::path::PathBuf;

    const SAMPLE_GRAMMAR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";
    const SAMPLE_SENTENCE: &str = "id * id + id";

    #[derive(Parser)]
    #[command(version, about = "Build SLR(1) parse tables and run them")]
    struct Args {
        /// Enable debug logging when RUST_LOG is not set.
        #[arg(short = 'd', long, global = true)]
        debug: bool,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Prints rules, FIRST/FOLLOW sets, the item collection and the table
        Table {
            /// Path to the grammar file
            #[arg(short = 'g', long)]
            grammar: PathBuf,
        },
        /// Parses a sentence and prints the trace and parse tree
        Parse {
            /// Path to the grammar file
            #[arg(short = 'g', long)]
            grammar: PathBuf,

            /// Sentence to parse
            #[arg(short = 's', long, conflicts_with = "input")]
            sentence: Option<String>,

            /// File holding the sentence to parse
            #[arg(short = 'i', long)]
            input: Option<PathBuf>,
        },
        /// Compiles and parses the built-in expression grammar example
        Example,
    }

    fn load(path: &PathBuf) -> Result<CompiledGrammar> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("can't read grammar {:?}", path))?;
        compile(&text).with_context(|| format!("can't compile grammar {:?}", path))
    }

    fn print_tables<W: Write>(out: &mut W, compiled: &CompiledGrammar) -> Result<()> {
        writeln!(out, "Grammar:")?;
        report::write_rules(out, compiled.grammar())?;
        writeln!(out, "\nFIRST/FOLLOW:")?;
        report::write_first_follow(out, compiled.grammar())?;
        writeln!(out, "\nLR(0) collection:")?;
        report::write_collection(out, compiled.grammar(), compiled.collection())?;
        writeln!(out, "\nParse table:")?;
        report::write_table(out, compiled)?;
        Ok(())
    }

    fn print_parse<W: Write>(out: &mut W, compiled: &CompiledGrammar, sentence: &str) -> Result<()> {
        let trace = run(compiled, sentence);
        writeln!(out, "Parse steps:")?;
        report::write_trace(out, compiled.grammar(), &trace)?;
        if let Some(err) = trace.error() {
            bail!("{}", err);
        }
        if let Some(tree) = reconstruct_tree(&trace, compiled.rules()) {
            writeln!(out, "\nParse tree:")?;
            report::write_tree(out, compiled.grammar(), &tree)?;
        }
        Ok(())
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();
        let level = if args.debug { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match args.command {
            Commands::Table { grammar } => {
                let compiled = load(&grammar)?;
                print_tables(&mut out, &compiled)?;
            }
            Commands::Parse {
                grammar,
                sentence,
                input,
            } => {
                let compiled = load(&grammar)?;
                let sentence = match (sentence, input) {
                    (Some(s), _) => s,
                    (None, Some(path)) => std::fs::read_to_string(&path)
                        .with_context(|| format!("can't read sentence {:?}", path))?,
                    (None, None) => bail!("either --sentence or --input is required"),
                };
                log::info!("parsing {:?}", sentence.trim());
                print_parse(&mut out, &compiled, &sentence)?;
            }
            Commands::Example => {
                let compiled = compile(SAMPLE_GRAMMAR)?;
                print_tables(&mut out, &compiled)?;
                writeln!(out, "\nSentence: {}\n", SAMPLE_SENTENCE)?;
                print_parse(&mut out, &compiled, SAMPLE_SENTENCE)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("slrtab disabled (compiled without `cli` feature)");
}
