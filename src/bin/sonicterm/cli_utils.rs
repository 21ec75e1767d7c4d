use anyhow::{Context, Result};
use sonicterm::audio::Mixer;
use sonicterm::catalog::catalog;

fn parse_device_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub(crate) fn list_output_devices() -> Result<()> {
    // SONICTERM_TEST_DEVICES stands in for real hardware in tests.
    let devices = match std::env::var("SONICTERM_TEST_DEVICES") {
        Ok(raw) => parse_device_list(&raw),
        Err(_) => Mixer::list_devices().unwrap_or_else(|err| {
            eprintln!("Failed to list audio output devices: {err:#}");
            Vec::new()
        }),
    };

    if devices.is_empty() {
        println!("No audio output devices detected.");
    } else {
        println!("Available audio output devices:");
        for name in devices {
            println!("  - {name}");
        }
    }
    Ok(())
}

pub(crate) fn print_terms() -> Result<()> {
    let json = serde_json::to_string_pretty(catalog()).context("failed to serialize catalog")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_list_skips_blank_entries() {
        assert_eq!(
            parse_device_list(" Speakers , ,USB DAC"),
            vec!["Speakers".to_string(), "USB DAC".to_string()]
        );
        assert!(parse_device_list("   ").is_empty());
    }
}
