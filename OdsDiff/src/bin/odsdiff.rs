fn main() -> anyhow::Result<()> {
    odsdiff::cli::run_cli()
}
