use clap::Parser;

fn main() -> anyhow::Result<()> {
    vocab_reviewer::run(vocab_reviewer::cli::Cli::parse())
}
