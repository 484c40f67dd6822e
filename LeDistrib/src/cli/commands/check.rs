//! CLI command for checking a distribution

use std::path::Path;

use console::style;

use crate::cli::progress::{TROPHY, print_step};
use crate::codec::Format;
use crate::cups::CupType;

pub fn execute(input: &Path, from: Option<Format>, config: Option<&Path>) -> anyhow::Result<()> {
    let mut distrib = super::new_distribution(config)?;
    super::load_into(&mut distrib, input, from)?;

    let failed = distrib.check_tracks();
    print_step(1, 1, TROPHY, "Updating cups...");
    let mut filled = 0;
    for cup_type in CupType::ALL {
        filled += distrib.update_cups(cup_type)?.filled;
    }

    let stats = distrib.stats();
    println!("Distribution: {}", input.display());
    println!();
    println!("Race tracks:   {:>5}", stats.versus);
    println!("Arenas:        {:>5}", stats.battle);
    println!("Random slots:  {:>5}", stats.random);
    println!("Exported:      {:>5}", stats.exported);
    println!("Groups:        {:>5}", stats.groups);
    println!("Race cups:     {:>5}", stats.versus_cups);
    println!("Battle cups:   {:>5}", stats.battle_cups);
    println!();

    if failed > 0 || filled > 0 {
        println!(
            "{} {} tracks failed the property check, {} cup cells were filled",
            style("Warnings:").yellow().bold(),
            failed,
            filled
        );
    } else {
        println!("{}", style("Check: PASSED").green().bold());
    }
    Ok(())
}
