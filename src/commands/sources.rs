use anyhow::Result;
use owo_colors::OwoColorize;
use parish_cal_core::ScraperConfig;

use crate::render::Render;

pub fn run(config: &ScraperConfig) -> Result<()> {
    for source in &config.sources {
        println!("{}", source.render());
    }

    println!(
        "\n{}",
        format!(
            "Links resolved against {}, times in {}",
            config.base_url, config.timezone
        )
        .dimmed()
    );

    Ok(())
}
