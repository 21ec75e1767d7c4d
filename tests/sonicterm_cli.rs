use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn sonicterm_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_sonicterm").expect("sonicterm test binary not built")
}

#[test]
fn sonicterm_help_mentions_name() {
    let output = Command::new(sonicterm_bin())
        .arg("--help")
        .output()
        .expect("run sonicterm --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("SonicTerm"));
    assert!(combined.contains("--media-root"));
}

#[test]
fn sonicterm_list_terms_prints_catalog_json() {
    let output = Command::new(sonicterm_bin())
        .arg("--list-terms")
        .output()
        .expect("run sonicterm --list-terms");
    assert!(output.status.success());
    let terms: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("catalog is valid JSON");
    let terms = terms.as_array().expect("catalog is an array");
    assert_eq!(terms.len(), 10);
    assert_eq!(terms[0]["number"], 1);
    assert_eq!(terms[0]["audio_file"], "audio/term-1.wav");
    assert_eq!(terms[0]["circle_position"], "left");
    assert_eq!(terms[9]["number"], 10);
}

#[test]
fn sonicterm_list_output_devices_uses_override() {
    let output = Command::new(sonicterm_bin())
        .arg("--list-output-devices")
        .env("SONICTERM_TEST_DEVICES", "Speakers, USB DAC")
        .output()
        .expect("run sonicterm --list-output-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Available audio output devices"));
    assert!(combined.contains("  - Speakers"));
    assert!(combined.contains("  - USB DAC"));
}

#[test]
fn sonicterm_list_output_devices_reports_none() {
    let output = Command::new(sonicterm_bin())
        .arg("--list-output-devices")
        .env("SONICTERM_TEST_DEVICES", "")
        .output()
        .expect("run sonicterm --list-output-devices");
    assert!(output.status.success());
    assert!(combined_output(&output).contains("No audio output devices detected."));
}

#[test]
fn sonicterm_rejects_missing_media_root() {
    let output = Command::new(sonicterm_bin())
        .args(["--media-root", "/definitely/not/a/sonicterm/dir"])
        .output()
        .expect("run sonicterm with bad media root");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--media-root"));
}

#[test]
fn sonicterm_doctor_lists_media() {
    let output = Command::new(sonicterm_bin())
        .args(["--doctor", "--mute"])
        .env("SONICTERM_MEDIA_ROOT", std::env::temp_dir())
        .output()
        .expect("run sonicterm --doctor");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("SonicTerm Doctor"));
    assert!(combined.contains("Media:"));
    assert!(combined.contains("term 10"));
}
