use anyhow::Result;

fn main() -> Result<()> {
    config_cli::main_entry()
}
