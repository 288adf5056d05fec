use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = fscode::cli::parse();
    app::run(args)
}
