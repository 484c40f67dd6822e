fn main() -> anyhow::Result<()> {
    ledistrib::cli::run_cli()
}
