use pomotick_core::{format_clock, Config};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Config::load()?.registry()?;

    if json {
        let modes: Vec<_> = registry.modes().collect();
        println!("{}", serde_json::to_string_pretty(&modes)?);
        return Ok(());
    }

    for mode in registry.modes() {
        println!(
            "{:<12} {:<14} {}  ({})",
            mode.id.as_str(),
            mode.label,
            format_clock(mode.duration_secs())?,
            mode.id.accent()
        );
    }
    Ok(())
}
